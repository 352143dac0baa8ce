//! Aggregation and CSV output for scraped search results.
//!
//! - [`aggregate`]: trimming result sets to a common length and counting
//!   results per source
//! - [`export`]: `;`-separated, fully quoted CSV files for results and
//!   per-source breakdowns

pub mod aggregate;
pub mod export;
pub mod result_set;

pub use aggregate::{SourceBreakdown, SourceCounts, analyze, equalize, trim};
pub use export::{ExportError, write_analysis, write_results};
pub use result_set::QueryResultSet;
