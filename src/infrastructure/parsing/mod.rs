//! HTML parsing for the favorites listing.

mod favorites_parser;

pub use favorites_parser::FavoritesPageParser;

use thiserror::Error;

/// Errors raised while building a parser.
///
/// Row-level anomalies during extraction are logged and skipped, never
/// propagated; only a broken selector or pattern is fatal.
#[derive(Error, Debug, Clone)]
pub enum ParsingError {
    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid extraction pattern: {pattern} - {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

pub type ParsingResult<T> = Result<T, ParsingError>;
