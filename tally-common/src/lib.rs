//! Shared types and utilities for the tubetally workspace.
//!
//! This crate holds the cross-crate error type and the logging bootstrap so
//! every other crate can depend on it without pulling in the heavier HTTP or
//! WebDriver stacks.
//!
//! # Overview
//!
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`TallyError`]: shared error handling for run plumbing
//!
//! # Examples
//!
//! Wrapping a failed query so the orchestrator can report which topic broke:
//!
//! ```rust
//! use tally_common::TallyError;
//!
//! let err = TallyError::query("Klimakrise", anyhow::anyhow!("no initial data"));
//! assert_eq!(
//!     err.to_string(),
//!     "Query \"Klimakrise\" failed: no initial data"
//! );
//! ```

pub mod observability;

/// Error types used across a tubetally run.
#[derive(thiserror::Error, Debug)]
pub enum TallyError {
    /// A collaborator (browser, network, filesystem) reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fetching or parsing the results of one search query failed.
    #[error("Query \"{query}\" failed: {source}")]
    Query {
        query: String,
        #[source]
        source: anyhow::Error,
    },
}

impl TallyError {
    pub fn query(query: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Query {
            query: query.into(),
            source,
        }
    }
}
