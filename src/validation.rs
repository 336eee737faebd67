//! Input validation for dialog answers

use thiserror::Error;

/// Raw text could not be read as an integer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not an integer: {input:?}")]
pub struct InvalidNumberError {
    pub input: String,
}

/// Parse a user answer as an integer.
///
/// Surrounding whitespace is ignored. Anything the standard `i64` parser
/// rejects (empty text, letters, decimals, out-of-range values) is an error.
/// No range restriction is applied beyond that.
pub fn parse_integer(raw: &str) -> Result<i64, InvalidNumberError> {
    raw.trim().parse::<i64>().map_err(|_| InvalidNumberError {
        input: raw.to_string(),
    })
}
