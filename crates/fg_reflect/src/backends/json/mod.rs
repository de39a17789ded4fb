//! JSON backend over [`serde_json::Value`] trees.
//!
//! | data | JSON |
//! | --- | --- |
//! | struct, map | object (member order is kept) |
//! | `Vec`, fixed-arity math types | array |
//! | `String`, asset | string |
//! | `bool` | bool |
//! | integers | integer number |
//! | `f32`, `f64` | number (integers are accepted when reading) |
//!
//! # Example
//!
//! ```
//! use fg_reflect::backends::json::{from_json_str, to_json_string};
//! use std::collections::BTreeMap;
//!
//! let mut scores = BTreeMap::new();
//! scores.insert(String::from("alice"), 3_u32);
//!
//! let text = to_json_string(&scores);
//! assert_eq!(text, r#"{"alice":3}"#);
//!
//! let back: BTreeMap<String, u32> = from_json_str(&text).unwrap();
//! assert_eq!(back, scores);
//! ```

use alloc::format;
use alloc::string::{String, ToString};

use serde_json::Value;
use thiserror::Error;

use crate::de::deserialize_value;
use crate::descriptor::Serializable;
use crate::error::DeserializeError;
use crate::ser::serialize_value;

// -----------------------------------------------------------------------------
// Modules

mod de;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use de::JsonDeserializer;
pub use ser::JsonSerializer;

// -----------------------------------------------------------------------------
// JsonError

/// Failure to read JSON text into a value.
#[derive(Debug, Error)]
pub enum JsonError {
    /// The text is not valid JSON. No deserialization session was opened.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Deserialize(#[from] DeserializeError),
}

// -----------------------------------------------------------------------------
// Functions

/// Serializes `value` into a JSON tree.
pub fn to_json_value<T: Serializable>(value: &T) -> Value {
    let mut serializer = JsonSerializer::new();
    serialize_value(&mut serializer, value);
    serializer.into_value()
}

/// Serializes `value` into compact JSON text.
#[inline]
pub fn to_json_string<T: Serializable>(value: &T) -> String {
    to_json_value(value).to_string()
}

/// Serializes `value` into indented JSON text.
#[inline]
pub fn to_json_string_pretty<T: Serializable>(value: &T) -> String {
    format!("{:#}", to_json_value(value))
}

/// Reads a fresh `T` from a JSON tree.
pub fn from_json_value<T: Serializable>(json: &Value) -> Result<T, DeserializeError> {
    deserialize_value(&mut JsonDeserializer::new(json))
}

/// Reads a JSON tree into an existing value.
pub fn deserialize_json_into<T: Serializable>(json: &Value, value: &mut T) -> Result<(), DeserializeError> {
    T::descriptor().deserialize(&mut JsonDeserializer::new(json), value)
}

/// Parses JSON text and reads a fresh `T` from it.
pub fn from_json_str<T: Serializable>(text: &str) -> Result<T, JsonError> {
    let json: Value = serde_json::from_str(text)?;
    Ok(from_json_value(&json)?)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use serde_json::json;

    use super::{JsonError, from_json_str, from_json_value, to_json_string_pretty, to_json_value};
    use crate::DeserializeError;

    #[test]
    fn integers_keep_their_sign() {
        assert_eq!(to_json_value(&-5_i8), json!(-5));
        assert_eq!(to_json_value(&u64::MAX), json!(u64::MAX));
        assert_eq!(from_json_value::<u64>(&json!(u64::MAX)).unwrap(), u64::MAX);
        assert_eq!(from_json_value::<i64>(&json!(i64::MIN)).unwrap(), i64::MIN);
    }

    #[test]
    fn integer_range_errors() {
        let err = from_json_value::<u8>(&json!(300)).unwrap_err();
        assert!(matches!(err, DeserializeError::OutOfRange { .. }));

        let err = from_json_value::<i64>(&json!(u64::MAX)).unwrap_err();
        assert!(matches!(err, DeserializeError::OutOfRange { .. }));

        let err = from_json_value::<u32>(&json!(-1)).unwrap_err();
        assert!(matches!(err, DeserializeError::OutOfRange { .. }));
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(from_json_value::<f32>(&json!(2)).unwrap(), 2.0);
        assert_eq!(from_json_value::<f64>(&json!(-7)).unwrap(), -7.0);
    }

    #[test]
    fn shape_mismatch() {
        let err = from_json_value::<String>(&json!(1)).unwrap_err();
        assert_eq!(err, DeserializeError::TypeMismatch {
            expected: "string",
            found: "integer",
        });

        let err = from_json_value::<Vec<bool>>(&json!({"a": true})).unwrap_err();
        assert_eq!(err.to_string(), "expected array, found object");
    }

    #[test]
    fn empty_containers() {
        assert_eq!(to_json_value(&Vec::<u8>::new()), json!([]));
        assert_eq!(from_json_value::<Vec<u8>>(&json!([])).unwrap(), Vec::<u8>::new());
        assert_eq!(from_json_value::<String>(&json!("")).unwrap(), "");
    }

    #[test]
    fn pretty_output() {
        assert_eq!(to_json_string_pretty(&vec![1_u8, 2]), "[\n  1,\n  2\n]");
    }

    #[test]
    fn parse_errors_are_separate() {
        let err = from_json_str::<u8>("[1,").unwrap_err();
        assert!(matches!(err, JsonError::Parse(_)));

        let err = from_json_str::<u8>("\"1\"").unwrap_err();
        assert!(matches!(err, JsonError::Deserialize(DeserializeError::TypeMismatch { .. })));
    }
}
