//! Typed conversions between column values and envelope plaintext.
//!
//! The proxy always receives plaintext as a string; richer column types
//! travel as their canonical string representation inside `p`: booleans
//! lowercase, dates ISO-8601, jsonb as compact JSON text.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Error;

/// A column type with a canonical plaintext string representation.
///
/// # Example
///
/// ```
/// use zarfdb::value::ColumnValue;
///
/// assert_eq!(42_i64.to_plaintext(), "42");
/// assert_eq!(i64::from_plaintext("42").unwrap(), 42);
/// assert_eq!(true.to_plaintext(), "true");
/// ```
pub trait ColumnValue: Sized {
    /// Renders the value into the string representation stored in `p`.
    fn to_plaintext(&self) -> String;

    /// Parses the value back from its string representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlaintext`] if the representation cannot be
    /// parsed as this type.
    fn from_plaintext(raw: &str) -> Result<Self, Error>;
}

impl ColumnValue for String {
    fn to_plaintext(&self) -> String {
        self.clone()
    }

    fn from_plaintext(raw: &str) -> Result<Self, Error> {
        Ok(raw.to_string())
    }
}

impl ColumnValue for i64 {
    fn to_plaintext(&self) -> String {
        self.to_string()
    }

    fn from_plaintext(raw: &str) -> Result<Self, Error> {
        raw.parse()
            .map_err(|_| Error::InvalidPlaintext(format!("not an integer: {raw:?}")))
    }
}

impl ColumnValue for f64 {
    fn to_plaintext(&self) -> String {
        self.to_string()
    }

    fn from_plaintext(raw: &str) -> Result<Self, Error> {
        raw.parse()
            .map_err(|_| Error::InvalidPlaintext(format!("not a float: {raw:?}")))
    }
}

impl ColumnValue for bool {
    fn to_plaintext(&self) -> String {
        self.to_string()
    }

    fn from_plaintext(raw: &str) -> Result<Self, Error> {
        match raw {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::InvalidPlaintext(format!("not a boolean: {raw:?}"))),
        }
    }
}

impl ColumnValue for NaiveDate {
    fn to_plaintext(&self) -> String {
        self.to_string()
    }

    fn from_plaintext(raw: &str) -> Result<Self, Error> {
        raw.parse()
            .map_err(|e| Error::InvalidPlaintext(format!("not a date: {e}")))
    }
}

impl ColumnValue for DateTime<Utc> {
    fn to_plaintext(&self) -> String {
        self.to_rfc3339()
    }

    fn from_plaintext(raw: &str) -> Result<Self, Error> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::InvalidPlaintext(format!("not a timestamp: {e}")))
    }
}

impl ColumnValue for serde_json::Value {
    fn to_plaintext(&self) -> String {
        self.to_string()
    }

    fn from_plaintext(raw: &str) -> Result<Self, Error> {
        serde_json::from_str(raw)
            .map_err(|e| Error::InvalidPlaintext(format!("not valid JSON: {e}")))
    }
}
