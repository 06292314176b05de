//! # `ZarfDB`
//!
//! Client-side envelope payloads and query predicates for searchable
//! field-level encryption through an encryption proxy.
//!
//! The proxy transparently encrypts column values on their way into the
//! database and decrypts them on the way out; the database exposes versioned
//! matching functions for querying. This crate builds the JSON envelope both
//! sides exchange and the WHERE-clause fragments that reference those
//! functions. No encryption happens here.
//!
//! ## Features
//!
//! - Envelope codec for the proxy wire format (`v`/`s`/`k`/`p`/`c`/`i`)
//! - Plaintext/ciphertext accessors that never fail on kind mismatch
//! - Match predicates for both protocol versions, plus equality, order
//!   comparison, and jsonb containment
//! - Typed plaintext conversions (text, int, float, bool, date, jsonb)
//! - Schema registry resolving table/column handles to canonical names
//!
//! ## Example
//!
//! ```rust
//! use zarfdb::prelude::*;
//!
//! let schema = Schema::new().with_table("users", ["email_encrypted"]);
//! let users = schema.table("users")?;
//!
//! let envelope = Envelope::from_plaintext(
//!     "alice@example.com",
//!     users.identifier("email_encrypted")?,
//! );
//! assert_eq!(envelope.plaintext(), Some("alice@example.com"));
//!
//! let predicate = zarfdb::predicate::match_v1(users, "email_encrypted", "alice")?;
//! assert_eq!(
//!     predicate.to_sql("\"email_encrypted\"", "$1"),
//!     "cs_match_v1(\"email_encrypted\") @> cs_match_v1($1)",
//! );
//! # Ok::<(), zarfdb::error::Error>(())
//! ```

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod envelope;
pub mod error;
pub mod identifier;
pub mod predicate;
pub mod schema;
pub mod value;

pub mod prelude {
    //! Convenience re-exports for common use.
    pub use crate::envelope::{Envelope, Value};
    pub use crate::error::Error;
    pub use crate::identifier::Identifier;
    pub use crate::predicate::{CompareOp, MatchVersion, Predicate};
    pub use crate::schema::{Schema, Table};
    pub use crate::value::ColumnValue;
}
