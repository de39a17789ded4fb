use alloc::string::{String, ToString};

use serde_json::map::Iter;
use serde_json::{Map, Number, Value};

use crate::de::{
    ArrayDeserializer, DeserializeTarget, Deserializer, ObjectDeserializer, StructDeserializer,
};
use crate::error::DeserializeError;

// -----------------------------------------------------------------------------
// JsonDeserializer

/// A [`Deserializer`] session over a [`serde_json::Value`] tree.
///
/// The session tracks the JSON pointer (RFC 6901) of the value it reads.
/// An error raised below the root leaves the session tagged with the
/// pointer of the innermost value involved, see [`DeserializeError::at`].
///
/// # Example
///
/// ```
/// use fg_reflect::backends::json::JsonDeserializer;
/// use fg_reflect::de::deserialize_value;
///
/// let json = serde_json::json!([[1, 2], [3, "4"]]);
/// let err = deserialize_value::<Vec<Vec<u8>>>(&mut JsonDeserializer::new(&json)).unwrap_err();
///
/// assert_eq!(err.pointer(), Some("/1/1"));
/// assert_eq!(err.to_string(), "expected integer, found string (at /1/1)");
/// ```
#[derive(Debug, Clone)]
pub struct JsonDeserializer<'a> {
    value: &'a Value,
    pointer: String,
}

impl<'a> JsonDeserializer<'a> {
    /// Opens a session at the root of `value`.
    #[inline]
    pub fn new(value: &'a Value) -> Self {
        Self {
            value,
            pointer: String::new(),
        }
    }

    /// The JSON pointer of the value this session reads.
    #[inline]
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    #[inline]
    fn mismatch(&self, expected: &'static str) -> DeserializeError {
        DeserializeError::TypeMismatch {
            expected,
            found: kind_of(self.value),
        }
    }

    fn integer(
        &self,
        number: &Number,
        target: &mut dyn DeserializeTarget,
        prefer_unsigned: bool,
    ) -> Result<(), DeserializeError> {
        match (number.as_i64(), number.as_u64()) {
            (_, Some(v)) if prefer_unsigned => target.deserialize_u64(v),
            (Some(v), _) => target.deserialize_i64(v),
            (None, Some(v)) => target.deserialize_u64(v),
            (None, None) => Err(self.mismatch("integer")),
        }
    }
}

/// Reads `value` located at `pointer` into `target`, tagging errors with `pointer`.
fn read_child(
    value: &Value,
    pointer: String,
    target: &mut dyn DeserializeTarget,
) -> Result<(), DeserializeError> {
    let mut child = JsonDeserializer { value, pointer };
    target
        .deserialize(&mut child)
        .map_err(|err| err.at(&child.pointer))
}

fn join(pointer: &str, segment: &str) -> String {
    let mut joined = String::with_capacity(pointer.len() + segment.len() + 1);
    joined.push_str(pointer);
    joined.push('/');
    for c in segment.chars() {
        match c {
            '~' => joined.push_str("~0"),
            '/' => joined.push_str("~1"),
            c => joined.push(c),
        }
    }
    joined
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Deserializer for JsonDeserializer<'_> {
    fn deserialize_bool(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        match self.value {
            Value::Bool(v) => target.deserialize_bool(*v),
            _ => Err(self.mismatch("bool")),
        }
    }

    fn deserialize_i64(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        match self.value {
            Value::Number(n) => self.integer(n, target, false),
            _ => Err(self.mismatch("integer")),
        }
    }

    fn deserialize_u64(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        match self.value {
            Value::Number(n) => self.integer(n, target, true),
            _ => Err(self.mismatch("integer")),
        }
    }

    /// Integers are accepted as well.
    fn deserialize_f64(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        match self.value {
            Value::Number(n) => match n.as_f64() {
                Some(v) => target.deserialize_f64(v),
                None => Err(self.mismatch("number")),
            },
            _ => Err(self.mismatch("number")),
        }
    }

    fn deserialize_str(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        match self.value {
            Value::String(v) => target.deserialize_str(v),
            _ => Err(self.mismatch("string")),
        }
    }

    fn deserialize_array(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        match self.value {
            Value::Array(items) => target.deserialize_array(&mut JsonArrayDeserializer {
                items,
                index: 0,
                pointer: &self.pointer,
            }),
            _ => Err(self.mismatch("array")),
        }
    }

    fn deserialize_object(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        match self.value {
            Value::Object(map) => target.deserialize_object(&mut JsonObjectDeserializer {
                entries: map.iter(),
                pending: None,
                pointer: &self.pointer,
            }),
            _ => Err(self.mismatch("object")),
        }
    }

    fn deserialize_struct(
        &mut self,
        members: &[&str],
        target: &mut dyn DeserializeTarget,
    ) -> Result<(), DeserializeError> {
        let Value::Object(map) = self.value else {
            return Err(self.mismatch("object"));
        };

        for key in map.keys() {
            if !members.contains(&key.as_str()) {
                log::debug!(
                    "ignoring unknown member `{key}` of {} at `{}`",
                    target.type_name(),
                    self.pointer,
                );
            }
        }

        target.deserialize_struct(&mut JsonStructDeserializer {
            map,
            current: None,
            pointer: &self.pointer,
        })
    }

    /// Integers go to the narrowest signed hook that holds them, or to the
    /// `u64` hook above `i64::MAX`. A non-negative integer the signed chain
    /// rejects as unsupported is offered to the narrowest unsigned hook as
    /// well. Other numbers go to the `f64` hook.
    fn deserialize_infer(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        let value = self.value;
        match value {
            Value::Null => Err(self.mismatch("value")),
            Value::Bool(v) => target.deserialize_bool(*v),
            Value::String(v) => target.deserialize_str(v),
            Value::Array(_) => self.deserialize_array(target),
            Value::Object(_) => self.deserialize_object(target),
            Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    match infer_signed(target, v) {
                        Err(err @ DeserializeError::Unsupported { .. }) => match u64::try_from(v) {
                            // Hooks leave the value untouched when they fail.
                            Ok(v) => infer_unsigned(target, v).map_err(|retry| match retry {
                                DeserializeError::Unsupported { .. } => err,
                                retry => retry,
                            }),
                            Err(_) => Err(err),
                        },
                        result => result,
                    }
                } else if let Some(v) = n.as_u64() {
                    target.deserialize_u64(v)
                } else {
                    match n.as_f64() {
                        Some(v) => target.deserialize_f64(v),
                        None => Err(self.mismatch("number")),
                    }
                }
            }
        }
    }
}

fn infer_signed(target: &mut dyn DeserializeTarget, v: i64) -> Result<(), DeserializeError> {
    if let Ok(v) = i8::try_from(v) {
        target.deserialize_i8(v)
    } else if let Ok(v) = i16::try_from(v) {
        target.deserialize_i16(v)
    } else if let Ok(v) = i32::try_from(v) {
        target.deserialize_i32(v)
    } else {
        target.deserialize_i64(v)
    }
}

fn infer_unsigned(target: &mut dyn DeserializeTarget, v: u64) -> Result<(), DeserializeError> {
    if let Ok(v) = u8::try_from(v) {
        target.deserialize_u8(v)
    } else if let Ok(v) = u16::try_from(v) {
        target.deserialize_u16(v)
    } else if let Ok(v) = u32::try_from(v) {
        target.deserialize_u32(v)
    } else {
        target.deserialize_u64(v)
    }
}

// -----------------------------------------------------------------------------
// Cursors

struct JsonArrayDeserializer<'a> {
    items: &'a [Value],
    index: usize,
    pointer: &'a str,
}

impl ArrayDeserializer for JsonArrayDeserializer<'_> {
    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len() - self.index)
    }

    #[inline]
    fn has_next(&self) -> bool {
        self.index < self.items.len()
    }

    fn next_element(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        let Some(item) = self.items.get(self.index) else {
            return Err(DeserializeError::custom("read past the end of an array"));
        };
        let pointer = join(self.pointer, &self.index.to_string());
        self.index += 1;
        read_child(item, pointer, target)
    }
}

struct JsonObjectDeserializer<'a> {
    entries: Iter<'a>,
    pending: Option<(&'a String, &'a Value)>,
    pointer: &'a str,
}

impl<'a> JsonObjectDeserializer<'a> {
    fn take_pending(&mut self) -> Result<(&'a String, &'a Value), DeserializeError> {
        self.pending
            .take()
            .ok_or_else(|| DeserializeError::custom("object value requested before its key"))
    }
}

impl ObjectDeserializer for JsonObjectDeserializer<'_> {
    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }

    #[inline]
    fn has_next(&self) -> bool {
        self.entries.len() > 0
    }

    fn next_key(&mut self) -> Result<String, DeserializeError> {
        let Some(entry) = self.entries.next() else {
            return Err(DeserializeError::custom("read past the end of an object"));
        };
        self.pending = Some(entry);
        Ok(entry.0.clone())
    }

    fn next_value(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        let (key, value) = self.take_pending()?;
        read_child(value, join(self.pointer, key), target)
    }

    #[inline]
    fn ignore_next_value(&mut self) -> Result<(), DeserializeError> {
        self.take_pending().map(|_| ())
    }
}

struct JsonStructDeserializer<'a> {
    map: &'a Map<String, Value>,
    current: Option<(&'a String, &'a Value)>,
    pointer: &'a str,
}

impl StructDeserializer for JsonStructDeserializer<'_> {
    #[inline]
    fn is_next(&mut self, member: &str) -> bool {
        self.current = self.map.get_key_value(member);
        self.current.is_some()
    }

    fn next_member(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        let Some((key, value)) = self.current.take() else {
            return Err(DeserializeError::custom("member read before it was found"));
        };
        read_child(value, join(self.pointer, key), target)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::join;

    #[test]
    fn pointer_escaping() {
        assert_eq!(join("", "a"), "/a");
        assert_eq!(join("/a", "b/c~d"), "/a/b~1c~0d");
    }
}
