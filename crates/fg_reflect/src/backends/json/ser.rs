use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use serde_json::{Map, Value};

use crate::ser::{ArraySerializer, ObjectSerializer, SerializeSource, Serializer};

// -----------------------------------------------------------------------------
// JsonSerializer

/// A [`Serializer`] that builds a [`serde_json::Value`] tree.
///
/// # Example
///
/// ```
/// use fg_reflect::backends::json::JsonSerializer;
/// use fg_reflect::ser::serialize_value;
///
/// let mut serializer = JsonSerializer::new();
/// serialize_value(&mut serializer, &vec![1_u8, 2, 3]);
///
/// assert_eq!(serializer.into_value(), serde_json::json!([1, 2, 3]));
/// ```
#[derive(Debug, Default)]
pub struct JsonSerializer {
    value: Value,
}

impl JsonSerializer {
    /// Creates a serializer holding `null`.
    #[inline]
    pub const fn new() -> Self {
        Self { value: Value::Null }
    }

    /// Returns the value written so far.
    ///
    /// An object or array builder that was dropped without `end` leaves
    /// nothing behind.
    #[inline]
    pub fn into_value(self) -> Value {
        self.value
    }

    fn write(source: &dyn SerializeSource) -> Value {
        let mut serializer = Self::new();
        source.serialize(&mut serializer);
        serializer.value
    }
}

impl Serializer for JsonSerializer {
    #[inline]
    fn serialize_bool(&mut self, v: bool) {
        self.value = Value::Bool(v);
    }

    #[inline]
    fn serialize_i64(&mut self, v: i64) {
        self.value = Value::from(v);
    }

    #[inline]
    fn serialize_u64(&mut self, v: u64) {
        self.value = Value::from(v);
    }

    /// Non-finite values have no JSON representation and become `null`.
    #[inline]
    fn serialize_f64(&mut self, v: f64) {
        self.value = Value::from(v);
    }

    #[inline]
    fn serialize_str(&mut self, v: &str) {
        self.value = Value::String(v.into());
    }

    fn serialize_object(&mut self) -> Box<dyn ObjectSerializer + '_> {
        Box::new(JsonObjectSerializer {
            parent: &mut self.value,
            map: Map::new(),
        })
    }

    fn serialize_array(&mut self) -> Box<dyn ArraySerializer + '_> {
        Box::new(JsonArraySerializer {
            parent: &mut self.value,
            items: Vec::new(),
        })
    }
}

// -----------------------------------------------------------------------------
// Builders

struct JsonObjectSerializer<'a> {
    parent: &'a mut Value,
    map: Map<String, Value>,
}

impl ObjectSerializer for JsonObjectSerializer<'_> {
    fn serialize_member(&mut self, name: &str, value: &dyn SerializeSource) {
        self.map.insert(name.into(), JsonSerializer::write(value));
    }

    fn end(self: Box<Self>) {
        let Self { parent, map } = *self;
        *parent = Value::Object(map);
    }
}

struct JsonArraySerializer<'a> {
    parent: &'a mut Value,
    items: Vec<Value>,
}

impl ArraySerializer for JsonArraySerializer<'_> {
    fn serialize_element(&mut self, value: &dyn SerializeSource) {
        self.items.push(JsonSerializer::write(value));
    }

    fn end(self: Box<Self>) {
        let Self { parent, items } = *self;
        *parent = Value::Array(items);
    }
}
