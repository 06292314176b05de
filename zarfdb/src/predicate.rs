//! Query predicates over encrypted columns.
//!
//! The database exposes versioned functions that implement matching on
//! encrypted values. A predicate pairs one of those functions with an
//! operator and an envelope payload; the surrounding query builder supplies
//! the quoted column identifier and its bind placeholder, so the serialized
//! envelope always travels as a bound value, never as raw SQL text.
//!
//! All builders share one assembly path parameterized by the function name,
//! keeping the protocol versions from drifting apart as new ones are added.

use crate::envelope::Envelope;
use crate::error::Error;
use crate::schema::Table;
use crate::value::ColumnValue;

/// Containment operator used by the match and jsonb predicates.
const CONTAINS: &str = "@>";

/// Versions of the match-predicate protocol.
///
/// The versions differ only in which database-side function they reference;
/// envelope construction and fragment assembly are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchVersion {
    /// `cs_match_v1`
    V1,
    /// `cs_match_v2`
    V2,
}

impl MatchVersion {
    /// Returns the database-side matching function name for this version.
    #[must_use]
    pub const fn function(self) -> &'static str {
        match self {
            Self::V1 => "cs_match_v1",
            Self::V2 => "cs_match_v2",
        }
    }
}

/// Comparison operators for the order-revealing predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `=`
    Eq,
}

impl CompareOp {
    /// Returns the SQL operator text.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Eq => "=",
        }
    }
}

/// A WHERE-clause fragment over one encrypted column.
///
/// Carries everything an adapter needs to render
/// `function(column) operator function(payload)` with the payload bound as a
/// `jsonb` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    function: &'static str,
    operator: &'static str,
    column: String,
    envelope: Envelope,
}

impl Predicate {
    /// Returns the database-side function name.
    #[must_use]
    pub const fn function(&self) -> &'static str {
        self.function
    }

    /// Returns the SQL operator.
    #[must_use]
    pub const fn operator(&self) -> &'static str {
        self.operator
    }

    /// Returns the resolved column name.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Returns the envelope bound on the right-hand side.
    #[must_use]
    pub const fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Serializes the bound envelope to its canonical JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON encoding fails.
    pub fn payload(&self) -> Result<String, Error> {
        self.envelope.to_json()
    }

    /// Renders the fragment with a caller-supplied column and placeholder.
    ///
    /// `column_sql` must come from the query builder's own identifier
    /// mechanism; `placeholder` is the builder's bind marker for the
    /// serialized envelope.
    #[must_use]
    pub fn to_sql(&self, column_sql: &str, placeholder: &str) -> String {
        format!(
            "{function}({column_sql}) {operator} {function}({placeholder})",
            function = self.function,
            operator = self.operator,
        )
    }
}

/// Shared assembly for every predicate kind.
fn build(
    function: &'static str,
    operator: &'static str,
    table: &Table,
    column: &str,
    term: String,
) -> Result<Predicate, Error> {
    let identifier = table.identifier(column)?;
    let envelope = Envelope::from_plaintext(term, identifier);

    Ok(Predicate { function, operator, column: column.to_string(), envelope })
}

/// Builds a containment match predicate for the given protocol version.
///
/// The plaintext term is wrapped in an envelope addressed to the resolved
/// table/column and serialized for the right-hand side of
/// `fn(column) @> fn(payload)`.
///
/// # Errors
///
/// Returns [`Error::UnresolvedColumn`] if the column is not registered on
/// the table.
pub fn match_predicate(
    version: MatchVersion,
    table: &Table,
    column: &str,
    term: &str,
) -> Result<Predicate, Error> {
    build(version.function(), CONTAINS, table, column, term.to_string())
}

/// Builds a v1 match predicate.
///
/// # Errors
///
/// Returns an error if the column cannot be resolved.
pub fn match_v1(table: &Table, column: &str, term: &str) -> Result<Predicate, Error> {
    match_predicate(MatchVersion::V1, table, column, term)
}

/// Builds a v2 match predicate.
///
/// # Errors
///
/// Returns an error if the column cannot be resolved.
pub fn match_v2(table: &Table, column: &str, term: &str) -> Result<Predicate, Error> {
    match_predicate(MatchVersion::V2, table, column, term)
}

/// Builds an equality predicate over a uniquely-indexed encrypted column
/// (`cs_unique_v1`).
///
/// # Errors
///
/// Returns an error if the column cannot be resolved.
pub fn exact<V: ColumnValue>(table: &Table, column: &str, value: &V) -> Result<Predicate, Error> {
    build("cs_unique_v1", "=", table, column, value.to_plaintext())
}

/// Builds an order comparison over the order-revealing index
/// (`cs_ore_64_8_v1`).
///
/// # Errors
///
/// Returns an error if the column cannot be resolved.
pub fn compare<V: ColumnValue>(
    op: CompareOp,
    table: &Table,
    column: &str,
    value: &V,
) -> Result<Predicate, Error> {
    build("cs_ore_64_8_v1", op.as_sql(), table, column, value.to_plaintext())
}

/// Builds a containment predicate over an encrypted jsonb column
/// (`cs_ste_vec_v1`).
///
/// # Errors
///
/// Returns an error if the column cannot be resolved.
pub fn jsonb_contains(
    table: &Table,
    column: &str,
    value: &serde_json::Value,
) -> Result<Predicate, Error> {
    build("cs_ste_vec_v1", CONTAINS, table, column, value.to_plaintext())
}
