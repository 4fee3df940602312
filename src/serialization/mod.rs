//! JSON codec for stored collections.
//!
//! Every key holds a UTF-8 JSON document: a list of records for collection
//! keys, a single record for the session marker. Field names are camelCase
//! so documents written by this crate match the marketplace's existing
//! storage layout.
//!
//! ```rust
//! use ecofinds_store::serialization::{decode_collection, encode_collection};
//!
//! # fn main() -> ecofinds_store::Result<()> {
//! let bytes = encode_collection(&["a".to_string(), "b".to_string()])?;
//! assert_eq!(bytes, br#"["a","b"]"#);
//!
//! let back: Vec<String> = decode_collection(&bytes)?;
//! assert_eq!(back.len(), 2);
//! # Ok(())
//! # }
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Encode a list of records.
///
/// # Errors
///
/// Returns `Error::SerializationError` if a record cannot be represented as
/// JSON (e.g. a map with non-string keys).
pub fn encode_collection<T: Serialize>(records: &[T]) -> Result<Vec<u8>> {
    serde_json::to_vec(records).map_err(|e| {
        log::error!("Collection serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Decode a stored list of records.
///
/// # Errors
///
/// Returns `Error::DeserializationError` for malformed JSON or records that
/// do not match `T`.
pub fn decode_collection<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    serde_json::from_slice(bytes).map_err(|e| {
        log::error!("Collection deserialization failed: {}", e);
        Error::DeserializationError(e.to_string())
    })
}

/// Encode a single record (the session marker).
pub fn encode_value<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| {
        log::error!("Value serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Decode a single record.
pub fn decode_value<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        log::error!("Value deserialization failed: {}", e);
        Error::DeserializationError(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
    #[serde(rename_all = "camelCase")]
    struct TestRecord {
        id: u64,
        user_name: String,
        active: bool,
    }

    #[test]
    fn test_collection_roundtrip() {
        let records = vec![
            TestRecord {
                id: 1,
                user_name: "alice".to_string(),
                active: true,
            },
            TestRecord {
                id: 2,
                user_name: "bob".to_string(),
                active: false,
            },
        ];

        let bytes = encode_collection(&records).unwrap();
        let decoded: Vec<TestRecord> = decode_collection(&bytes).unwrap();

        assert_eq!(records, decoded);
    }

    #[test]
    fn test_camel_case_on_the_wire() {
        let bytes = encode_value(&TestRecord {
            id: 7,
            user_name: "x".to_string(),
            active: true,
        })
        .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"userName\""));
    }

    #[test]
    fn test_empty_collection() {
        let bytes = encode_collection::<TestRecord>(&[]).unwrap();
        assert_eq!(bytes, b"[]");
        let decoded: Vec<TestRecord> = decode_collection(&bytes).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_corrupted_payload_rejected() {
        let records = vec![TestRecord {
            id: 1,
            user_name: "alice".to_string(),
            active: true,
        }];
        let mut bytes = encode_collection(&records).unwrap();
        let half = bytes.len() / 2;
        bytes.truncate(half);

        match decode_collection::<TestRecord>(&bytes) {
            Err(Error::DeserializationError(_)) => {}
            other => panic!("Expected DeserializationError, got {:?}", other),
        }
    }

    #[test]
    fn test_single_value_is_not_a_collection() {
        let bytes = encode_value(&TestRecord {
            id: 1,
            user_name: "a".to_string(),
            active: true,
        })
        .unwrap();
        assert!(decode_collection::<TestRecord>(&bytes).is_err());
        assert!(decode_value::<TestRecord>(&bytes).is_ok());
    }
}
