//! Error type for the core model.
//!
//! Everything in this crate is infallible except turning user-typed text
//! into typed values (roles, modes, formats, filter fields).

use std::fmt;

/// A text value could not be parsed into one of the model's types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Unknown role name (expected `ADMIN` or `TRADER`).
    Role(String),

    /// Unknown data-source mode (expected `demo` or `api`).
    Mode(String),

    /// Unknown import/export format (expected `csv` or `json`).
    Format(String),

    /// A date filter was not `YYYY-MM-DD`.
    Date(String),

    /// A numeric field held something other than an integer.
    Integer(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Role(v) => write!(f, "unknown role `{}` (expected ADMIN or TRADER)", v),
            ParseError::Mode(v) => write!(f, "unknown mode `{}` (expected demo or api)", v),
            ParseError::Format(v) => write!(f, "unknown format `{}` (expected csv or json)", v),
            ParseError::Date(v) => write!(f, "invalid date `{}` (expected YYYY-MM-DD)", v),
            ParseError::Integer(v) => write!(f, "invalid integer `{}`", v),
        }
    }
}

impl std::error::Error for ParseError {}
