//! Scheme configuration, deposit history and file loading

mod data;
mod deposit;
pub mod loader;

pub use data::{SchemeConfig, RecurringRule, Frequency};
pub use deposit::DepositEntry;
pub use loader::{load_scheme, load_deposits, load_deposits_from_reader};
