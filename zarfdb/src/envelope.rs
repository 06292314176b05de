//! The encrypted-value envelope exchanged with the proxy.
//!
//! An envelope wraps a plaintext or ciphertext value together with its kind
//! and the table/column it belongs to:
//!
//! ```text
//! {"v":1,"s":1,"k":"pt","p":"alice@example.com","i":{"t":"users","c":"email_encrypted"}}
//! ```
//!
//! Client code builds plaintext-kind (`pt`) envelopes before writing or
//! searching; the proxy rewrites them to ciphertext-kind (`ct`) on the way to
//! the database and back. The field names are part of the wire contract and
//! must be preserved exactly:
//!
//! - `v`: payload version, defaulted when omitted
//! - `s`: schema version, fixed per payload generation
//! - `k`: kind discriminator, `"pt"` or `"ct"`
//! - `p`: plaintext, present iff `k = "pt"`
//! - `c`: ciphertext, present iff `k = "ct"`
//! - `i`: table/column identity of the value

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::identifier::Identifier;
use crate::value::ColumnValue;

/// Payload version written into `v` unless overridden.
pub const PAYLOAD_VERSION: u32 = 1;

/// Schema version written into `s`. Not caller-controlled.
pub const SCHEMA_VERSION: u32 = 1;

/// The value carried by an envelope, discriminated by the wire field `k`.
///
/// The wire format expresses exclusivity with optional `p`/`c` fields; here
/// it is enforced at the type level, so an envelope can never carry both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A plaintext value awaiting encryption by the proxy (`k = "pt"`).
    Plaintext(String),
    /// A ciphertext value produced by the proxy (`k = "ct"`).
    Ciphertext(String),
}

/// One encrypted-or-plaintext column value in its wire shape.
///
/// Envelopes are immutable values: every builder consumes and returns a new
/// envelope, and structural equality is derived, so building twice from the
/// same inputs yields equal envelopes.
///
/// # Example
///
/// ```
/// use zarfdb::envelope::Envelope;
/// use zarfdb::identifier::Identifier;
///
/// let envelope = Envelope::from_plaintext(
///     "alice@example.com",
///     Identifier::new("users", "email_encrypted"),
/// );
///
/// assert_eq!(envelope.version(), 1);
/// assert_eq!(envelope.plaintext(), Some("alice@example.com"));
/// assert_eq!(envelope.ciphertext(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireEnvelope", into = "WireEnvelope")]
pub struct Envelope {
    version: u32,
    schema_version: u32,
    value: Value,
    identifier: Identifier,
}

impl Envelope {
    /// Builds a plaintext-kind envelope for a value about to be written or
    /// searched on.
    ///
    /// The payload version defaults to [`PAYLOAD_VERSION`]; the schema
    /// version is fixed at [`SCHEMA_VERSION`]. No validation is performed on
    /// the identifier; empty names pass through.
    #[must_use]
    pub fn from_plaintext(plaintext: impl Into<String>, identifier: Identifier) -> Self {
        Self {
            version: PAYLOAD_VERSION,
            schema_version: SCHEMA_VERSION,
            value: Value::Plaintext(plaintext.into()),
            identifier,
        }
    }

    /// Builds a ciphertext-kind envelope.
    ///
    /// The proxy normally produces these; this constructor exists for tests
    /// and for relaying already-encrypted values.
    #[must_use]
    pub fn from_ciphertext(ciphertext: impl Into<String>, identifier: Identifier) -> Self {
        Self {
            version: PAYLOAD_VERSION,
            schema_version: SCHEMA_VERSION,
            value: Value::Ciphertext(ciphertext.into()),
            identifier,
        }
    }

    /// Builds a plaintext-kind envelope from a typed column value.
    ///
    /// The value is carried as its canonical string representation (see
    /// [`ColumnValue`]).
    #[must_use]
    pub fn from_value<V: ColumnValue>(value: &V, identifier: Identifier) -> Self {
        Self::from_plaintext(value.to_plaintext(), identifier)
    }

    /// Overrides the payload version (`v`).
    #[must_use]
    pub const fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Returns the payload version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the schema version.
    #[must_use]
    pub const fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Returns the carried value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the table/column identity.
    #[must_use]
    pub const fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Returns the plaintext if this is a plaintext-kind envelope.
    ///
    /// A ciphertext-kind envelope yields `None`, never an error: absence of a
    /// usable value is signaled through the option, mirroring the absent `p`
    /// field on the wire.
    #[must_use]
    pub fn plaintext(&self) -> Option<&str> {
        match &self.value {
            Value::Plaintext(p) => Some(p),
            Value::Ciphertext(_) => None,
        }
    }

    /// Returns the ciphertext if this is a ciphertext-kind envelope.
    ///
    /// Symmetric to [`Envelope::plaintext`]: a plaintext-kind envelope yields
    /// `None`.
    #[must_use]
    pub fn ciphertext(&self) -> Option<&str> {
        match &self.value {
            Value::Ciphertext(c) => Some(c),
            Value::Plaintext(_) => None,
        }
    }

    /// Parses the plaintext into a typed column value.
    ///
    /// Returns `Ok(None)` for a ciphertext-kind envelope; a present plaintext
    /// that cannot be parsed is reported as [`Error::InvalidPlaintext`].
    ///
    /// # Errors
    ///
    /// Returns an error only when parsing the string representation fails.
    pub fn plaintext_as<V: ColumnValue>(&self) -> Result<Option<V>, Error> {
        self.plaintext().map(V::from_plaintext).transpose()
    }

    /// Serializes the envelope to its canonical JSON text encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON encoding fails.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the envelope to a JSON value, suitable for binding as a
    /// `jsonb` query parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON encoding fails.
    pub fn to_value(&self) -> Result<serde_json::Value, Error> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parses an envelope from its JSON text encoding.
    ///
    /// An omitted `v` defaults to [`PAYLOAD_VERSION`] and an omitted `s` to
    /// [`SCHEMA_VERSION`]; both are otherwise forwarded opaquely.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON, if `k` is not a known
    /// kind, or if the field matching `k` is missing.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let wire: WireEnvelope = serde_json::from_str(json)?;
        Self::try_from(wire)
    }
}

/// Kind discriminator as written into `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum Kind {
    #[serde(rename = "pt")]
    Plaintext,
    #[serde(rename = "ct")]
    Ciphertext,
}

/// Serde-facing shape with the single-letter wire field names.
#[derive(Clone, Serialize, Deserialize)]
struct WireEnvelope {
    #[serde(default = "default_payload_version")]
    v: u32,
    #[serde(default = "default_schema_version")]
    s: u32,
    k: Kind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    p: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    c: Option<String>,
    i: Identifier,
}

const fn default_payload_version() -> u32 {
    PAYLOAD_VERSION
}

const fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl TryFrom<WireEnvelope> for Envelope {
    type Error = Error;

    fn try_from(wire: WireEnvelope) -> Result<Self, Error> {
        // `k` decides which field is read; a stray field of the other kind is
        // ignored rather than rejected.
        let value = match wire.k {
            Kind::Plaintext => Value::Plaintext(wire.p.ok_or_else(|| {
                Error::InvalidEnvelope("missing \"p\" for plaintext kind".to_string())
            })?),
            Kind::Ciphertext => Value::Ciphertext(wire.c.ok_or_else(|| {
                Error::InvalidEnvelope("missing \"c\" for ciphertext kind".to_string())
            })?),
        };

        Ok(Self { version: wire.v, schema_version: wire.s, value, identifier: wire.i })
    }
}

impl From<Envelope> for WireEnvelope {
    fn from(envelope: Envelope) -> Self {
        let (k, p, c) = match envelope.value {
            Value::Plaintext(p) => (Kind::Plaintext, Some(p), None),
            Value::Ciphertext(c) => (Kind::Ciphertext, None, Some(c)),
        };

        Self { v: envelope.version, s: envelope.schema_version, k, p, c, i: envelope.identifier }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn email_identifier() -> Identifier {
        Identifier::new("users", "email_encrypted")
    }

    #[test]
    fn test_build_defaults() {
        let envelope = Envelope::from_plaintext("a@b.com", email_identifier());

        assert_eq!(envelope.version(), 1);
        assert_eq!(envelope.schema_version(), 1);
        assert_eq!(envelope.identifier().table(), "users");
        assert_eq!(envelope.identifier().column(), "email_encrypted");
    }

    #[test]
    fn test_round_trip_through_accessor() {
        let envelope = Envelope::from_plaintext("a@b.com", email_identifier());
        assert_eq!(envelope.plaintext(), Some("a@b.com"));
    }

    #[test]
    fn test_kind_exclusivity() {
        let pt = Envelope::from_plaintext("a@b.com", email_identifier());
        assert!(pt.plaintext().is_some());
        assert!(pt.ciphertext().is_none());

        let ct = Envelope::from_ciphertext("mBbKmsMMkbKBSN", email_identifier());
        assert!(ct.ciphertext().is_some());
        assert!(ct.plaintext().is_none());
    }

    #[test]
    fn test_cross_kind_read_yields_none_not_the_value() {
        let ct = Envelope::from_ciphertext("X", email_identifier());
        assert_eq!(ct.plaintext(), None);
        assert_eq!(ct.ciphertext(), Some("X"));
    }

    #[test]
    fn test_with_version() {
        let envelope = Envelope::from_plaintext("a@b.com", email_identifier()).with_version(3);
        assert_eq!(envelope.version(), 3);
        // `s` stays fixed
        assert_eq!(envelope.schema_version(), SCHEMA_VERSION);
    }

    #[test]
    fn test_build_is_idempotent() {
        let first = Envelope::from_plaintext("a@b.com", email_identifier());
        let second = Envelope::from_plaintext("a@b.com", email_identifier());
        assert_eq!(first, second);
    }

    #[test]
    fn test_wire_format_plaintext() {
        let envelope = Envelope::from_plaintext("a@b.com", email_identifier());
        let wire = envelope.to_value().unwrap();

        assert_eq!(
            wire,
            json!({
                "v": 1,
                "s": 1,
                "k": "pt",
                "p": "a@b.com",
                "i": {"t": "users", "c": "email_encrypted"}
            })
        );
    }

    #[test]
    fn test_wire_format_omits_other_kind_field() {
        let pt = Envelope::from_plaintext("a@b.com", email_identifier());
        let wire = pt.to_value().unwrap();
        assert!(wire.get("c").is_none());

        let ct = Envelope::from_ciphertext("mBbKmsMMkbKBSN", email_identifier());
        let wire = ct.to_value().unwrap();
        assert!(wire.get("p").is_none());
        assert_eq!(wire["k"], "ct");
    }

    #[test]
    fn test_json_round_trip() {
        let envelope = Envelope::from_plaintext("a@b.com", email_identifier()).with_version(2);
        let json = envelope.to_json().unwrap();
        let parsed = Envelope::from_json(&json).unwrap();
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn test_parse_defaults_omitted_versions() {
        let parsed = Envelope::from_json(
            r#"{"k":"pt","p":"a@b.com","i":{"t":"users","c":"email_encrypted"}}"#,
        )
        .unwrap();

        assert_eq!(parsed.version(), 1);
        assert_eq!(parsed.schema_version(), 1);
        assert_eq!(parsed.plaintext(), Some("a@b.com"));
    }

    #[test]
    fn test_parse_hand_built_ciphertext_envelope() {
        let parsed = Envelope::from_json(
            r#"{"v":1,"s":1,"k":"ct","c":"X","i":{"t":"users","c":"email_encrypted"}}"#,
        )
        .unwrap();

        // Wrong-kind read is absence, never "X" and never an error.
        assert_eq!(parsed.plaintext(), None);
        assert_eq!(parsed.ciphertext(), Some("X"));
    }

    #[test]
    fn test_parse_unknown_kind_fails() {
        let result = Envelope::from_json(
            r#"{"v":1,"s":1,"k":"xx","p":"a","i":{"t":"users","c":"email_encrypted"}}"#,
        );
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_parse_missing_value_field_fails() {
        let result = Envelope::from_json(
            r#"{"v":1,"s":1,"k":"pt","i":{"t":"users","c":"email_encrypted"}}"#,
        );
        assert!(matches!(result, Err(Error::InvalidEnvelope(_))));
    }

    #[test]
    fn test_value_accessor_exposes_kind() {
        let envelope = Envelope::from_plaintext("a@b.com", email_identifier());
        assert!(matches!(envelope.value(), Value::Plaintext(p) if p == "a@b.com"));
    }

    #[test]
    fn test_from_value_carries_string_representation() {
        let envelope = Envelope::from_value(&30_i64, Identifier::new("users", "age_encrypted"));
        assert_eq!(envelope.plaintext(), Some("30"));
    }

    #[test]
    fn test_plaintext_as_round_trip() {
        let envelope = Envelope::from_value(&30_i64, Identifier::new("users", "age_encrypted"));
        assert_eq!(envelope.plaintext_as::<i64>().unwrap(), Some(30));
    }

    #[test]
    fn test_plaintext_as_on_ciphertext_kind_is_none() {
        let envelope = Envelope::from_ciphertext("X", email_identifier());
        assert_eq!(envelope.plaintext_as::<i64>().unwrap(), None);
    }

    #[test]
    fn test_plaintext_as_parse_failure() {
        let envelope = Envelope::from_plaintext("not-a-number", email_identifier());
        let result = envelope.plaintext_as::<i64>();
        assert!(matches!(result, Err(Error::InvalidPlaintext(_))));
    }

    #[test]
    fn test_versions_forwarded_opaquely() {
        let parsed = Envelope::from_json(
            r#"{"v":9,"s":4,"k":"pt","p":"a","i":{"t":"users","c":"email_encrypted"}}"#,
        )
        .unwrap();

        assert_eq!(parsed.version(), 9);
        assert_eq!(parsed.schema_version(), 4);
    }
}
