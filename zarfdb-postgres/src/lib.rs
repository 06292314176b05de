//! tokio-postgres adapter for `ZarfDB` envelopes and predicates.
//!
//! tokio-postgres takes statements as text with positional `$n` parameters,
//! so this adapter renders a predicate into a [`WhereClause`]: the SQL
//! fragment referencing the caller-chosen parameter index, plus the envelope
//! value to bind there as `jsonb`. The plaintext never enters the SQL text.
//!
//! # Example
//!
//! ```rust,no_run
//! use zarfdb::prelude::*;
//! use zarfdb_postgres::{connect, DatabaseConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabaseConfig::from_env()?;
//! let client = connect(&config).await?;
//!
//! let schema = Schema::new().with_table("users", ["email_encrypted"]);
//! let users = schema.table("users")?;
//!
//! let clause = zarfdb_postgres::match_v1(users, "email_encrypted", "alice", 1)?;
//! let statement = format!("SELECT email_encrypted FROM users WHERE {}", clause.sql());
//! let rows = client.query(&statement, &[clause.param()]).await?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use tokio_postgres::types::{Json, ToSql};
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error};
use zarfdb::envelope::Envelope;
use zarfdb::predicate::{self, CompareOp, MatchVersion, Predicate};
use zarfdb::schema::Table;
use zarfdb::value::ColumnValue;

/// Errors raised by the tokio-postgres adapter.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection configuration is missing or malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// Predicate or payload construction failed
    #[error(transparent)]
    Payload(#[from] zarfdb::error::Error),

    /// Database driver error
    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),
}

/// Connection settings for the proxy endpoint.
///
/// The client connects to the proxy, not to the database directly; the
/// default port is the proxy's listen port.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    host: String,
    port: u16,
    name: String,
    username: String,
    password: String,
}

impl DatabaseConfig {
    /// Default proxy listen port.
    pub const DEFAULT_PORT: u16 = 6432;

    /// Creates a config from explicit values.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        port: u16,
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            name: name.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Loads the config from `ZARFDB_DATABASE_*` environment variables.
    ///
    /// `ZARFDB_DATABASE_NAME` and `ZARFDB_DATABASE_USERNAME` are required;
    /// host defaults to `localhost`, port to [`Self::DEFAULT_PORT`], and the
    /// password to empty.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if a required variable is missing or
    /// the port is not a number.
    pub fn from_env() -> Result<Self, ClientError> {
        let host =
            std::env::var("ZARFDB_DATABASE_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = match std::env::var("ZARFDB_DATABASE_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ClientError::Config(format!("invalid port: {raw}")))?,
            Err(_) => Self::DEFAULT_PORT,
        };
        let name = std::env::var("ZARFDB_DATABASE_NAME")
            .map_err(|_| ClientError::Config("ZARFDB_DATABASE_NAME not set".to_string()))?;
        let username = std::env::var("ZARFDB_DATABASE_USERNAME")
            .map_err(|_| ClientError::Config("ZARFDB_DATABASE_USERNAME not set".to_string()))?;
        let password = std::env::var("ZARFDB_DATABASE_PASSWORD").unwrap_or_default();

        Ok(Self { host, port, name, username, password })
    }

    /// Renders the libpq-style connection string.
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.name, self.username, self.password
        )
    }

    /// Returns the endpoint without credentials, for logging.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.name)
    }
}

/// Connects to the proxy and spawns the connection task.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<Client, ClientError> {
    debug!(endpoint = %config.endpoint(), "connecting to proxy");

    let (client, connection) =
        tokio_postgres::connect(&config.to_connection_string(), NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!("connection error: {e}");
        }
    });

    Ok(client)
}

/// A WHERE-clause fragment with its positional `jsonb` parameter.
#[derive(Debug)]
pub struct WhereClause {
    sql: String,
    payload: Json<Envelope>,
}

impl WhereClause {
    fn render(predicate: &Predicate, param_index: usize) -> Self {
        let column_sql = quote_ident(predicate.column());
        let placeholder = format!("${param_index}");

        Self {
            sql: predicate.to_sql(&column_sql, &placeholder),
            payload: Json(predicate.envelope().clone()),
        }
    }

    /// Returns the SQL text of the fragment.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the envelope parameter to bind at the clause's index.
    #[must_use]
    pub fn param(&self) -> &(dyn ToSql + Sync) {
        &self.payload
    }
}

/// Quotes a column identifier for inclusion in SQL text.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Builds a containment match clause for the given protocol version.
///
/// # Errors
///
/// Returns an error if the column is not registered on the table.
pub fn match_clause(
    version: MatchVersion,
    table: &Table,
    column: &str,
    term: &str,
    param_index: usize,
) -> Result<WhereClause, ClientError> {
    let predicate = predicate::match_predicate(version, table, column, term)?;
    Ok(WhereClause::render(&predicate, param_index))
}

/// Builds a v1 match clause.
///
/// # Errors
///
/// Returns an error if the column cannot be resolved.
pub fn match_v1(
    table: &Table,
    column: &str,
    term: &str,
    param_index: usize,
) -> Result<WhereClause, ClientError> {
    match_clause(MatchVersion::V1, table, column, term, param_index)
}

/// Builds a v2 match clause.
///
/// # Errors
///
/// Returns an error if the column cannot be resolved.
pub fn match_v2(
    table: &Table,
    column: &str,
    term: &str,
    param_index: usize,
) -> Result<WhereClause, ClientError> {
    match_clause(MatchVersion::V2, table, column, term, param_index)
}

/// Builds an equality clause over a uniquely-indexed column.
///
/// # Errors
///
/// Returns an error if the column cannot be resolved.
pub fn exact<V: ColumnValue>(
    table: &Table,
    column: &str,
    value: &V,
    param_index: usize,
) -> Result<WhereClause, ClientError> {
    let predicate = predicate::exact(table, column, value)?;
    Ok(WhereClause::render(&predicate, param_index))
}

/// Builds an order comparison clause over the order-revealing index.
///
/// # Errors
///
/// Returns an error if the column cannot be resolved.
pub fn compare<V: ColumnValue>(
    op: CompareOp,
    table: &Table,
    column: &str,
    value: &V,
    param_index: usize,
) -> Result<WhereClause, ClientError> {
    let predicate = predicate::compare(op, table, column, value)?;
    Ok(WhereClause::render(&predicate, param_index))
}

/// Builds a containment clause over an encrypted jsonb column.
///
/// # Errors
///
/// Returns an error if the column cannot be resolved.
pub fn jsonb_contains(
    table: &Table,
    column: &str,
    value: &serde_json::Value,
    param_index: usize,
) -> Result<WhereClause, ClientError> {
    let predicate = predicate::jsonb_contains(table, column, value)?;
    Ok(WhereClause::render(&predicate, param_index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_string_shape() {
        let config = DatabaseConfig::new("localhost", 6432, "store", "app", "secret");
        assert_eq!(
            config.to_connection_string(),
            "host=localhost port=6432 dbname=store user=app password=secret"
        );
    }

    #[test]
    fn test_endpoint_omits_credentials() {
        let config = DatabaseConfig::new("localhost", 6432, "store", "app", "secret");
        assert_eq!(config.endpoint(), "localhost:6432/store");
        assert!(!config.endpoint().contains("secret"));
    }
}
