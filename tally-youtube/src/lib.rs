//! YouTube search-results extraction.
//!
//! The pipeline runs leaf-first:
//!
//! - [`initial_data`] pulls the embedded `ytInitialData` JSON out of a results page
//! - [`extract`] walks that tree and yields every value stored under a key
//! - [`parse`] turns `videoRenderer` candidates into [`types::ResultRecord`]s,
//!   using [`age`] to normalise "vor 3 Stunden" style ages into seconds
//! - [`client`] fetches pages over HTTP and chains the steps per query
//!
//! Pagination is not supported: the site loads further results dynamically,
//! so every record comes from the first page.
pub mod age;
pub mod client;
pub mod error;
pub mod extract;
pub mod initial_data;
pub mod parse;
pub mod session;
pub mod types;

pub use client::{HttpResultsSource, ResultsPageSource, YouTubeSearch};
pub use error::ParseError;
pub use session::SearchSession;
pub use types::ResultRecord;
