use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// DeserializeError

/// The error produced when wire data cannot be read into a value.
///
/// Serialization is infallible, so this is the only error the core raises.
/// Backends report malformed input (e.g. invalid JSON text) through their own
/// error type before a deserialization session is opened.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DeserializeError {
    /// The wire value has a shape the target type has no hook for.
    #[error("attempted to deserialize {kind} to type {type_name} that doesn't support it")]
    Unsupported {
        kind: &'static str,
        type_name: String,
    },
    /// A fixed-arity array had the wrong number of elements.
    ///
    /// `actual` is `None` when the array overflowed and its full length is unknown.
    #[error("invalid length array for {type_name}: expected {expected}, got {}", display_len(.actual))]
    ArityMismatch {
        type_name: String,
        expected: usize,
        actual: Option<usize>,
    },
    #[error("failed to deserialize member \"{member}\" of {type_name}: member is missing")]
    MissingMember { member: String, type_name: String },
    #[error("type {type_name} cannot be constructed for deserialization")]
    NotConstructible { type_name: String },
    #[error("integer {value} out of range for {type_name}")]
    OutOfRange { value: String, type_name: String },
    /// The backend found a value of a different kind than the one requested.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("failed to load {asset_type} asset at \"{path}\"")]
    AssetNotFound { asset_type: &'static str, path: String },
    #[error("{0}")]
    Custom(String),
    /// Another error, tagged with the position in the input where it happened.
    #[error("{source} (at {pointer})")]
    Located {
        pointer: String,
        source: Box<DeserializeError>,
    },
}

fn display_len(actual: &Option<usize>) -> String {
    match actual {
        Some(len) => alloc::format!("{len}"),
        None => String::from("more"),
    }
}

impl DeserializeError {
    #[inline]
    pub(crate) fn unsupported(kind: &'static str, type_name: &str) -> Self {
        Self::Unsupported {
            kind,
            type_name: type_name.into(),
        }
    }

    /// Creates a [`DeserializeError::Custom`] from any message.
    #[inline]
    pub fn custom(message: impl core::fmt::Display) -> Self {
        Self::Custom(alloc::format!("{message}"))
    }

    /// Tags the error with an input position.
    ///
    /// Errors that already carry a position keep the innermost one, and an
    /// empty pointer (the document root) leaves the error untouched.
    pub fn at(self, pointer: &str) -> Self {
        if pointer.is_empty() || matches!(self, Self::Located { .. }) {
            self
        } else {
            Self::Located {
                pointer: pointer.into(),
                source: Box::new(self),
            }
        }
    }

    /// Returns the error with any position tags stripped.
    pub fn root(&self) -> &Self {
        match self {
            Self::Located { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns the input position of the error, if one was recorded.
    pub fn pointer(&self) -> Option<&str> {
        match self {
            Self::Located { pointer, .. } => Some(pointer),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::DeserializeError;

    #[test]
    fn located_keeps_innermost_pointer() {
        let err = DeserializeError::MissingMember {
            member: "b".into(),
            type_name: "Pair".into(),
        };
        let err = err.at("/inner").at("/outer").at("");

        assert_eq!(err.pointer(), Some("/inner"));
        assert!(matches!(err.root(), DeserializeError::MissingMember { member, .. } if member == "b"));
        assert_eq!(
            err.to_string(),
            "failed to deserialize member \"b\" of Pair: member is missing (at /inner)"
        );
    }

    #[test]
    fn arity_message() {
        let err = DeserializeError::ArityMismatch {
            type_name: "Vec2".into(),
            expected: 2,
            actual: Some(3),
        };
        assert_eq!(err.to_string(), "invalid length array for Vec2: expected 2, got 3");

        let err = DeserializeError::ArityMismatch {
            type_name: "Vec2".into(),
            expected: 2,
            actual: None,
        };
        assert_eq!(err.to_string(), "invalid length array for Vec2: expected 2, got more");
    }
}
