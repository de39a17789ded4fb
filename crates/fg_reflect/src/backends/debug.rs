//! Human-readable text dumps of serialized data.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use core::fmt::Write;

use crate::descriptor::Serializable;
use crate::ser::{ArraySerializer, ObjectSerializer, SerializeSource, Serializer, serialize_value};

/// A [`Serializer`] that prints values as indented text.
///
/// The output looks like JSON but is meant for logs and diagnostics only:
/// floats always carry a decimal point and there is no way to read it back.
///
/// ```text
/// {
///     "x": 1.5,
///     "tags": [
///         "a"
///     ]
/// }
/// ```
pub struct DebugSerializer {
    out: String,
    indent: Cow<'static, str>,
    depth: usize,
}

impl Default for DebugSerializer {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl DebugSerializer {
    /// Creates a printer indenting with one tab per level.
    #[inline]
    pub const fn new() -> Self {
        Self::with_indent(Cow::Borrowed("\t"))
    }

    /// Creates a printer indenting with `indent` per level.
    #[inline]
    pub const fn with_indent(indent: Cow<'static, str>) -> Self {
        Self {
            out: String::new(),
            indent,
            depth: 0,
        }
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.out
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push_str(&self.indent);
        }
    }

    fn open(&mut self, bracket: char) {
        self.out.push(bracket);
        self.depth += 1;
    }

    fn close(&mut self, bracket: char, empty: bool) {
        self.depth -= 1;
        if !empty {
            self.newline();
        }
        self.out.push(bracket);
    }
}

/// Prints `value` with [`DebugSerializer`].
///
/// # Example
///
/// ```
/// use fg_reflect::backends::debug::to_debug_string;
///
/// assert_eq!(to_debug_string(&vec![1.5_f32]), "[\n\t1.5\n]");
/// assert_eq!(to_debug_string(&Vec::<u8>::new()), "[]");
/// ```
pub fn to_debug_string<T: Serializable>(value: &T) -> String {
    let mut serializer = DebugSerializer::new();
    serialize_value(&mut serializer, value);
    serializer.into_string()
}

impl Serializer for DebugSerializer {
    fn serialize_bool(&mut self, v: bool) {
        let _ = write!(self.out, "{v}");
    }

    fn serialize_i64(&mut self, v: i64) {
        let _ = write!(self.out, "{v}");
    }

    fn serialize_u64(&mut self, v: u64) {
        let _ = write!(self.out, "{v}");
    }

    fn serialize_f32(&mut self, v: f32) {
        let _ = write!(self.out, "{v:?}");
    }

    fn serialize_f64(&mut self, v: f64) {
        let _ = write!(self.out, "{v:?}");
    }

    fn serialize_str(&mut self, v: &str) {
        let _ = write!(self.out, "{v:?}");
    }

    fn serialize_object(&mut self) -> Box<dyn ObjectSerializer + '_> {
        self.open('{');
        Box::new(DebugObject {
            parent: self,
            empty: true,
        })
    }

    fn serialize_array(&mut self) -> Box<dyn ArraySerializer + '_> {
        self.open('[');
        Box::new(DebugArray {
            parent: self,
            empty: true,
        })
    }
}

struct DebugObject<'a> {
    parent: &'a mut DebugSerializer,
    empty: bool,
}

impl ObjectSerializer for DebugObject<'_> {
    fn serialize_member(&mut self, name: &str, value: &dyn SerializeSource) {
        if !self.empty {
            self.parent.out.push(',');
        }
        self.empty = false;
        self.parent.newline();
        let _ = write!(self.parent.out, "{name:?}: ");
        value.serialize(&mut *self.parent);
    }

    fn end(self: Box<Self>) {
        let Self { parent, empty } = *self;
        parent.close('}', empty);
    }
}

struct DebugArray<'a> {
    parent: &'a mut DebugSerializer,
    empty: bool,
}

impl ArraySerializer for DebugArray<'_> {
    fn serialize_element(&mut self, value: &dyn SerializeSource) {
        if !self.empty {
            self.parent.out.push(',');
        }
        self.empty = false;
        self.parent.newline();
        value.serialize(&mut *self.parent);
    }

    fn end(self: Box<Self>) {
        let Self { parent, empty } = *self;
        parent.close(']', empty);
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::borrow::Cow;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;

    use super::{DebugSerializer, to_debug_string};
    use crate::ser::serialize_value;

    #[test]
    fn nested() {
        let mut map = BTreeMap::new();
        map.insert(String::from("a"), vec![true, false]);
        map.insert(String::from("b"), vec![]);

        assert_eq!(
            to_debug_string(&map),
            "{\n\t\"a\": [\n\t\ttrue,\n\t\tfalse\n\t],\n\t\"b\": []\n}"
        );
    }

    #[test]
    fn custom_indent() {
        let mut serializer = DebugSerializer::with_indent(Cow::Borrowed("  "));
        serialize_value(&mut serializer, &vec![String::from("x\"y")]);
        assert_eq!(serializer.into_string(), "[\n  \"x\\\"y\"\n]");
    }

    #[test]
    fn floats_keep_decimal_point() {
        assert_eq!(to_debug_string(&-2.0_f32), "-2.0");
        assert_eq!(to_debug_string(&3_u16), "3");
    }
}
