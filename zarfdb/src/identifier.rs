//! Column identity carried inside every envelope.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the table and column an envelope value belongs to.
///
/// The identifier travels inside the payload as the `i` record, so the proxy
/// can look up the encryption configuration for the column. The names must
/// match the actual table and column the value is stored against; the codec
/// forwards them without verification, and callers are responsible for
/// keeping them accurate.
///
/// # Example
///
/// ```
/// use zarfdb::identifier::Identifier;
///
/// let id = Identifier::new("users", "email_encrypted");
/// assert_eq!(id.table(), "users");
/// assert_eq!(id.column(), "email_encrypted");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "t")]
    table: String,
    #[serde(rename = "c")]
    column: String,
}

impl Identifier {
    /// Creates a new identifier.
    ///
    /// No validation is performed; empty names are passed through as-is.
    #[must_use]
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self { table: table.into(), column: column.into() }
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the column name.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_display() {
        let id = Identifier::new("users", "email_encrypted");
        assert_eq!(id.to_string(), "users.email_encrypted");
    }

    #[test]
    fn test_identifier_wire_field_names() {
        let id = Identifier::new("users", "email_encrypted");
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json, serde_json::json!({"t": "users", "c": "email_encrypted"}));
    }

    #[test]
    fn test_identifier_empty_names_pass_through() {
        let id = Identifier::new("", "");
        assert_eq!(id.table(), "");
        assert_eq!(id.column(), "");
    }
}
