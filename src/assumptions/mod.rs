//! Interest-rate assumptions: versioned rate history and flat rates

mod rates;
pub mod loader;

pub use rates::{InterestRateHistory, InterestRateEntry, RateLookup, FlatRate};
pub use loader::{load_rate_history, load_rate_history_from_reader};
