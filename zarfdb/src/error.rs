//! Error types for `ZarfDB` operations.

/// Main error type for `ZarfDB` operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Envelope structure is malformed
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// JSON encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Table is not registered in the schema
    #[error("unresolved table: {0}")]
    UnresolvedTable(String),

    /// Column is not registered on its table
    #[error("unresolved column: {table}.{column}")]
    UnresolvedColumn {
        /// The table the lookup ran against
        table: String,
        /// The column that is not registered
        column: String,
    },

    /// Plaintext could not be parsed into the requested column type
    #[error("invalid plaintext: {0}")]
    InvalidPlaintext(String),
}
