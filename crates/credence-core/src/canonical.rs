//! # Canonical Serialization
//!
//! Defines `CanonicalBytes`, the only byte form that is ever hashed or
//! signed anywhere in credence.
//!
//! ## Rules
//!
//! 1. Object keys are sorted lexicographically at every nesting level.
//! 2. Arrays keep their element order; elements are canonicalized recursively.
//! 3. Scalars (`null`, booleans, numbers, strings) pass through unchanged.
//! 4. Output is compact (no insignificant whitespace) UTF-8.
//!
//! Serialization goes through `serde_jcs` (RFC 8785), so two documents that
//! differ only in key order produce identical bytes.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - Constructed only through [`CanonicalBytes::new()`] or
///   [`CanonicalBytes::from_value()`].
/// - Keys are sorted, separators are compact, content is valid UTF-8.
///
/// The inner buffer is private, so downstream code cannot hand a
/// non-canonical byte sequence to the hashing or signing paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(String);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON (e.g. a map with non-string keys).
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(&value)
    }

    /// Canonicalize an already-built JSON tree.
    pub fn from_value(value: &Value) -> Result<Self, CanonicalizationError> {
        Ok(Self(serde_jcs::to_string(value)?))
    }

    /// Access the canonical bytes for digest computation or signing.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The canonical form as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for CanonicalBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_top_level_keys() {
        let data = serde_json::json!({"b": 2, "a": 1, "c": "hello"});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        assert_eq!(cb.as_str(), r#"{"a":1,"b":2,"c":"hello"}"#);
    }

    #[test]
    fn sorts_nested_keys_and_keeps_array_order() {
        let data = serde_json::json!({
            "outer": {"b": 2, "a": 1},
            "list": [3, {"z": true, "y": false}, 1]
        });
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(
            cb.as_str(),
            r#"{"list":[3,{"y":false,"z":true},1],"outer":{"a":1,"b":2}}"#
        );
    }

    #[test]
    fn floats_pass_through() {
        let data = serde_json::json!({"gpa": 3.5, "weight": -0.25});
        let cb = CanonicalBytes::new(&data).expect("floats are scalars");
        assert_eq!(cb.as_str(), r#"{"gpa":3.5,"weight":-0.25}"#);
    }

    #[test]
    fn key_order_in_source_text_is_irrelevant() {
        let a: Value = serde_json::from_str(r#"{"x":{"q":1,"p":2},"a":[1,2]}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a":[1,2],"x":{"p":2,"q":1}}"#).unwrap();
        assert_eq!(
            CanonicalBytes::from_value(&a).unwrap(),
            CanonicalBytes::from_value(&b).unwrap()
        );
    }

    #[test]
    fn empty_containers() {
        assert_eq!(CanonicalBytes::new(&serde_json::json!({})).unwrap().as_bytes(), b"{}");
        assert_eq!(CanonicalBytes::new(&serde_json::json!([])).unwrap().as_bytes(), b"[]");
    }

    #[test]
    fn unicode_is_not_escaped() {
        let data = serde_json::json!({"name": "Zo\u{00eb}"});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert!(cb.as_str().contains('\u{00eb}'));
    }

    #[test]
    fn len_and_is_empty() {
        let cb = CanonicalBytes::new(&serde_json::json!({"a": 1})).unwrap();
        assert!(!cb.is_empty());
        assert_eq!(cb.len(), r#"{"a":1}"#.len());
    }
}
