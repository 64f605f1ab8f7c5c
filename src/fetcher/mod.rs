pub mod traits;
pub mod yahoo;

pub use traits::{BarFetcher, HistoryRequest};
pub use yahoo::{YahooFetcher, parse_chart_response};
