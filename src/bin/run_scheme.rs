//! Project a single savings scheme and write its monthly ledger
//!
//! Reads the scheme configuration (JSON), rate history (CSV) and optional
//! deposit history (CSV), prints a summary and writes the ledger as CSV.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use savings_projection::assumptions::load_rate_history;
use savings_projection::projection::{write_ledger_csv, LateDepositTreatment};
use savings_projection::scheme::{load_deposits, load_scheme};
use savings_projection::{ProjectionConfig, ProjectionEngine};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_scheme", about = "Month-by-month projection of a savings scheme")]
struct Args {
    /// Scheme configuration (JSON)
    #[arg(long)]
    scheme: PathBuf,

    /// Interest rate history (CSV: effective_date,rate)
    #[arg(long)]
    rates: PathBuf,

    /// Manual deposit history (CSV: date,amount)
    #[arg(long)]
    deposits: Option<PathBuf>,

    /// Evaluation date (YYYY-MM-DD)
    #[arg(long = "as-of")]
    as_of: NaiveDate,

    /// Ledger output path
    #[arg(long, default_value = "scheme_ledger.csv")]
    output: PathBuf,

    /// Skipped months earn no interest
    #[arg(long)]
    no_skipped_accrual: bool,

    /// Credit interest on the pre-deposit balance in months with late deposits
    #[arg(long)]
    exclude_late_deposits: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let scheme = load_scheme(&args.scheme)
        .with_context(|| format!("loading scheme from {}", args.scheme.display()))?;
    let rates = load_rate_history(&args.rates)
        .with_context(|| format!("loading rates from {}", args.rates.display()))?;
    let deposits = match &args.deposits {
        Some(path) => load_deposits(path, &scheme)
            .with_context(|| format!("loading deposits from {}", path.display()))?,
        None => Vec::new(),
    };
    println!("Loaded scheme, {} rate entries and {} deposits", rates.entries().len(), deposits.len());

    let config = ProjectionConfig {
        late_deposits: if args.exclude_late_deposits {
            LateDepositTreatment::ExcludeLateDeposits
        } else {
            LateDepositTreatment::ForfeitMonth
        },
        skipped_months_accrue: !args.no_skipped_accrual,
    };

    let engine = ProjectionEngine::new(rates, config);
    let projection = engine
        .project_scheme(&scheme, &deposits, args.as_of)
        .context("projecting scheme")?;

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    write_ledger_csv(BufWriter::new(file), &projection.ledger)?;
    println!("Ledger ({} months) written to {}", projection.ledger.len(), args.output.display());

    let s = &projection.summary;
    println!("\nScheme Summary as of {}:", args.as_of);
    println!("  Total invested:         {}", s.total_invested);
    println!("  Recurring contributions: {}", s.total_recurring_contributions);
    println!("  Interest earned:        {}", s.total_interest);
    println!("  Current value:          {}", s.current_value);
    println!("  Profit/loss:            {} ({}%)", s.profit_loss, s.profit_loss_percentage);
    println!("  Projected at maturity:  {}", s.projected_maturity_value);
    println!("  Years to maturity:      {:.2}", s.years_to_maturity);
    println!("  Months skipped/paused:  {}/{}", s.months_skipped, s.months_paused);
    println!("  Annual limit used:      {} (remaining {})", s.annual_limit_used, s.annual_limit_remaining);
    if s.months_over_limit > 0 {
        println!("  Months over limit:      {}", s.months_over_limit);
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
