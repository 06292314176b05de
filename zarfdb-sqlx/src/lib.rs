//! sqlx adapter for `ZarfDB` envelopes and predicates.
//!
//! Extends [`sqlx::QueryBuilder`] with predicate pushing over encrypted
//! columns. The column identifier is quoted and written into the SQL text;
//! the serialized envelope always goes through `push_bind` as a `jsonb`
//! value, so plaintext content can never become SQL.
//!
//! # Example
//!
//! ```rust
//! use sqlx::{Postgres, QueryBuilder};
//! use zarfdb::prelude::*;
//! use zarfdb_sqlx::QueryBuilderExt;
//!
//! let schema = Schema::new().with_table("users", ["email_encrypted"]);
//! let users = schema.table("users")?;
//!
//! let mut builder: QueryBuilder<'_, Postgres> =
//!     QueryBuilder::new("SELECT email_encrypted FROM users WHERE ");
//! builder.push_match_v1(users, "email_encrypted", "alice")?;
//!
//! assert_eq!(
//!     builder.sql(),
//!     "SELECT email_encrypted FROM users WHERE \
//!      cs_match_v1(\"email_encrypted\") @> cs_match_v1($1)",
//! );
//! # Ok::<(), zarfdb::error::Error>(())
//! ```

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};
use zarfdb::envelope::Envelope;
use zarfdb::error::Error;
use zarfdb::predicate::{self, CompareOp, MatchVersion, Predicate};
use zarfdb::schema::Table;
use zarfdb::value::ColumnValue;

/// Column type for encrypted model fields.
///
/// Decodes the stored `jsonb` envelope through the codec, so reads go
/// through the kind-checked accessors rather than poking at raw JSON.
pub type Encrypted = Json<Envelope>;

/// Quotes a column identifier for inclusion in SQL text.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Predicate pushing over encrypted columns.
///
/// Each method appends `function(column) operator function($n)` to the
/// builder and binds the serialized envelope at `$n`.
pub trait QueryBuilderExt {
    /// Pushes an already-built predicate.
    fn push_predicate(&mut self, predicate: &Predicate) -> &mut Self;

    /// Pushes a containment match predicate for the given protocol version.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is not registered on the table.
    fn push_match(
        &mut self,
        version: MatchVersion,
        table: &Table,
        column: &str,
        term: &str,
    ) -> Result<&mut Self, Error>;

    /// Pushes a v1 match predicate.
    ///
    /// # Errors
    ///
    /// Returns an error if the column cannot be resolved.
    fn push_match_v1(
        &mut self,
        table: &Table,
        column: &str,
        term: &str,
    ) -> Result<&mut Self, Error>;

    /// Pushes a v2 match predicate.
    ///
    /// # Errors
    ///
    /// Returns an error if the column cannot be resolved.
    fn push_match_v2(
        &mut self,
        table: &Table,
        column: &str,
        term: &str,
    ) -> Result<&mut Self, Error>;

    /// Pushes an equality predicate over a uniquely-indexed column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column cannot be resolved.
    fn push_exact<V: ColumnValue>(
        &mut self,
        table: &Table,
        column: &str,
        value: &V,
    ) -> Result<&mut Self, Error>;

    /// Pushes an order comparison over the order-revealing index.
    ///
    /// # Errors
    ///
    /// Returns an error if the column cannot be resolved.
    fn push_compare<V: ColumnValue>(
        &mut self,
        op: CompareOp,
        table: &Table,
        column: &str,
        value: &V,
    ) -> Result<&mut Self, Error>;

    /// Pushes a containment predicate over an encrypted jsonb column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column cannot be resolved.
    fn push_jsonb_contains(
        &mut self,
        table: &Table,
        column: &str,
        value: &serde_json::Value,
    ) -> Result<&mut Self, Error>;
}

impl QueryBuilderExt for QueryBuilder<'_, Postgres> {
    fn push_predicate(&mut self, predicate: &Predicate) -> &mut Self {
        self.push(predicate.function())
            .push("(")
            .push(quote_ident(predicate.column()))
            .push(") ")
            .push(predicate.operator())
            .push(" ")
            .push(predicate.function())
            .push("(");
        self.push_bind(Json(predicate.envelope().clone()));
        self.push(")")
    }

    fn push_match(
        &mut self,
        version: MatchVersion,
        table: &Table,
        column: &str,
        term: &str,
    ) -> Result<&mut Self, Error> {
        let predicate = predicate::match_predicate(version, table, column, term)?;
        Ok(self.push_predicate(&predicate))
    }

    fn push_match_v1(
        &mut self,
        table: &Table,
        column: &str,
        term: &str,
    ) -> Result<&mut Self, Error> {
        self.push_match(MatchVersion::V1, table, column, term)
    }

    fn push_match_v2(
        &mut self,
        table: &Table,
        column: &str,
        term: &str,
    ) -> Result<&mut Self, Error> {
        self.push_match(MatchVersion::V2, table, column, term)
    }

    fn push_exact<V: ColumnValue>(
        &mut self,
        table: &Table,
        column: &str,
        value: &V,
    ) -> Result<&mut Self, Error> {
        let predicate = predicate::exact(table, column, value)?;
        Ok(self.push_predicate(&predicate))
    }

    fn push_compare<V: ColumnValue>(
        &mut self,
        op: CompareOp,
        table: &Table,
        column: &str,
        value: &V,
    ) -> Result<&mut Self, Error> {
        let predicate = predicate::compare(op, table, column, value)?;
        Ok(self.push_predicate(&predicate))
    }

    fn push_jsonb_contains(
        &mut self,
        table: &Table,
        column: &str,
        value: &serde_json::Value,
    ) -> Result<&mut Self, Error> {
        let predicate = predicate::jsonb_contains(table, column, value)?;
        Ok(self.push_predicate(&predicate))
    }
}
