//! Engine error types.

use thiserror::Error;

/// Fatal parse failure. Each variant carries the offending remainder of the
/// input as context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unbalanced bracket near `{0}`")]
    Unbalanced(String),
    #[error("unterminated string near `{0}`")]
    UnterminatedString(String),
    #[error("invalid literal `{0}`")]
    InvalidLiteral(String),
    #[error("expected a value near `{0}`")]
    ExpectedValue(String),
    #[error("unexpected trailing content `{0}`")]
    Trailing(String),
    #[error("expected `:`, `,` or a closing bracket near `{0}`")]
    ExpectedDelimiter(String),
    #[error("document root must be an object or an array")]
    RootNotContainer,
    #[error("expected {expected} at the document root")]
    UnexpectedRoot { expected: &'static str },
    #[error("empty input")]
    Empty,
}

/// Failure converting a payload to a requested target type.
///
/// Strict getters surface this; defaulted getters swallow it and return the
/// caller-supplied fallback instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoerceError {
    #[error("value is null or empty")]
    Absent,
    #[error("cannot convert {from} to {to}")]
    Mismatch {
        from: &'static str,
        to: &'static str,
    },
    #[error("number out of range for {0}")]
    OutOfRange(&'static str),
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("invalid boolean `{0}`")]
    InvalidBool(String),
    #[error("invalid character `{0}`")]
    InvalidChar(String),
    #[error("invalid date/time `{value}`: {reason}")]
    InvalidTemporal { value: String, reason: String },
    #[error("bad format pattern `{0}`")]
    BadFormat(String),
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("unknown enum variant `{0}`")]
    UnknownVariant(String),
    #[error("payload is not a record of type {0}")]
    NotARecord(&'static str),
}
