//! Shared types, configuration and errors for legislative bill search

mod config;
mod error;
mod request;
mod types;

pub use config::{ModelSource, SearchConfig};
pub use error::{SearchError, SearchResult};
pub use request::{Chamber, DateRange, PassageRequest, SummaryRequest, DEFAULT_NUMBER_TO_RETURN};
pub use types::{Bill, BillSummary, PassageMatch, Sponsor};
