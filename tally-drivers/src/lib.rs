//! Driver layer for browser automation.
//!
//! The search site hands out consent and bot-check cookies only to a real
//! browser. This crate opens a WebDriver session so an operator can clear that
//! step by hand, then harvests the resulting cookies for the plain HTTP client.
//!
//! - [`browser::session::BrowserSession`]: WebDriver client with an explicit
//!   open → visit → cookies → close lifecycle
//! - [`browser::options::BrowserOptions`]: endpoint, locale and window setup
pub mod browser;

pub use browser::options::BrowserOptions;
pub use browser::session::BrowserSession;
