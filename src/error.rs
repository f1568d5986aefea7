//! Error types for the store and the numeric input parser

use thiserror::Error;

use crate::store::ChatIdentity;

/// Store contract violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A field was saved while the chat had no training in progress
    #[error("chat {0} has no training in progress")]
    NoActiveEntry(ChatIdentity),

    /// Finalize was requested before a required field was filled in
    #[error("training for chat {chat} is missing {field}")]
    IncompleteEntry {
        chat: ChatIdentity,
        field: &'static str,
    },
}

/// Rejected numeric input (duration or weight)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty input")]
    EmptyInput,

    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("not a finite number: {0:?}")]
    NotFinite(String),
}

/// Parse a user-typed decimal, accepting both `.` and `,` as separator
pub fn parse_decimal(text: &str) -> Result<f64, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let normalized = trimmed.replace(',', ".");
    let value: f64 = normalized
        .parse()
        .map_err(|_| ParseError::NotANumber(trimmed.to_string()))?;

    if !value.is_finite() {
        return Err(ParseError::NotFinite(trimmed.to_string()));
    }

    Ok(value)
}
