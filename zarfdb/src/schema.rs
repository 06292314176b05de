//! Registry of encrypted tables and columns.
//!
//! Predicate builders derive canonical table and column names from handles
//! registered here, the client-side counterpart of the dataset
//! configuration the proxy holds. Looking up an unregistered table or column
//! is a configuration error, never a silent default.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Error;
use crate::identifier::Identifier;

/// Registry of tables that carry encrypted columns.
///
/// # Example
///
/// ```
/// use zarfdb::schema::Schema;
///
/// let schema = Schema::new().with_table("users", ["email_encrypted"]);
/// let users = schema.table("users").unwrap();
/// assert_eq!(users.name(), "users");
///
/// assert!(schema.table("orders").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: BTreeMap<String, Table>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table and its encrypted columns.
    #[must_use]
    pub fn with_table<I, S>(mut self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let table = Table {
            name: name.clone(),
            columns: columns.into_iter().map(Into::into).collect(),
        };
        self.tables.insert(name, table);
        self
    }

    /// Resolves a table handle by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvedTable`] if the table is not registered.
    pub fn table(&self, name: &str) -> Result<&Table, Error> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::UnresolvedTable(name.to_string()))
    }
}

/// A registered table handle.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: BTreeSet<String>,
}

impl Table {
    /// Returns the canonical table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the registered encrypted columns.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Resolves a column and returns the identifier used for envelope
    /// construction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvedColumn`] if the column is not registered on
    /// this table.
    pub fn identifier(&self, column: &str) -> Result<Identifier, Error> {
        if self.columns.contains(column) {
            Ok(Identifier::new(self.name.clone(), column))
        } else {
            Err(Error::UnresolvedColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_schema() -> Schema {
        Schema::new().with_table("users", ["email_encrypted", "name_encrypted"])
    }

    #[test]
    fn test_resolve_registered_column() {
        let schema = users_schema();
        let users = schema.table("users").unwrap();
        let id = users.identifier("email_encrypted").unwrap();

        assert_eq!(id.table(), "users");
        assert_eq!(id.column(), "email_encrypted");
    }

    #[test]
    fn test_unregistered_table_is_configuration_error() {
        let schema = users_schema();
        let result = schema.table("orders");
        assert!(matches!(result, Err(Error::UnresolvedTable(name)) if name == "orders"));
    }

    #[test]
    fn test_unregistered_column_is_configuration_error() {
        let schema = users_schema();
        let users = schema.table("users").unwrap();
        let result = users.identifier("ssn_encrypted");

        assert!(matches!(
            result,
            Err(Error::UnresolvedColumn { table, column })
                if table == "users" && column == "ssn_encrypted"
        ));
    }

    #[test]
    fn test_reregistering_replaces_columns() {
        let schema = users_schema().with_table("users", ["email_encrypted"]);
        let users = schema.table("users").unwrap();
        assert!(users.identifier("name_encrypted").is_err());
    }

    #[test]
    fn test_columns_are_listed() {
        let schema = users_schema();
        let users = schema.table("users").unwrap();
        let columns: Vec<_> = users.columns().collect();
        assert_eq!(columns, vec!["email_encrypted", "name_encrypted"]);
    }
}
