use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use super::{EngineType, SchemaVisitor};
use crate::descriptor::{Descriptor, Serializable, same_descriptor};

/// A [`SchemaVisitor`] that prints a human-readable description.
///
/// ```text
/// Player{
///     name: string,
///     position: vec3<float>,
///     inventory: [Item{
///         count: uint32,
///     }],
/// }
/// ```
///
/// (indentation is one tab per level). A type that contains itself is printed
/// by name at the point of recursion.
#[derive(Default)]
pub struct DebugSchemaVisitor {
    out: String,
    indent: usize,
    visiting: Vec<&'static dyn Descriptor>,
}

impl DebugSchemaVisitor {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns what has been printed so far.
    #[inline]
    pub fn into_string(self) -> String {
        self.out
    }

    fn child(&mut self, descriptor: &'static dyn Descriptor) {
        if self.visiting.iter().any(|&d| same_descriptor(d, descriptor)) {
            self.out.push_str(descriptor.name());
            return;
        }
        self.visiting.push(descriptor);
        descriptor.accept(self);
        self.visiting.pop();
    }

    fn print_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }
}

/// Prints the schema of `T`.
///
/// # Example
///
/// ```
/// use fg_reflect::schema::debug_schema;
/// use std::collections::BTreeMap;
///
/// assert_eq!(debug_schema::<Vec<i8>>(), "[int8]");
/// assert_eq!(debug_schema::<BTreeMap<String, f64>>(), "map<string, double>");
/// ```
pub fn debug_schema<T: Serializable>() -> String {
    let mut visitor = DebugSchemaVisitor::new();
    visitor.child(T::descriptor());
    visitor.into_string()
}

impl SchemaVisitor for DebugSchemaVisitor {
    fn visit_bool(&mut self) {
        self.out.push_str("bool");
    }

    fn visit_i8(&mut self) {
        self.out.push_str("int8");
    }

    fn visit_i16(&mut self) {
        self.out.push_str("int16");
    }

    fn visit_i32(&mut self) {
        self.out.push_str("int32");
    }

    fn visit_i64(&mut self) {
        self.out.push_str("int64");
    }

    fn visit_u8(&mut self) {
        self.out.push_str("uint8");
    }

    fn visit_u16(&mut self) {
        self.out.push_str("uint16");
    }

    fn visit_u32(&mut self) {
        self.out.push_str("uint32");
    }

    fn visit_u64(&mut self) {
        self.out.push_str("uint64");
    }

    fn visit_f32(&mut self) {
        self.out.push_str("float");
    }

    fn visit_f64(&mut self) {
        self.out.push_str("double");
    }

    fn visit_string(&mut self) {
        self.out.push_str("string");
    }

    fn visit_array(&mut self, element: &'static dyn Descriptor) {
        self.out.push('[');
        self.child(element);
        self.out.push(']');
    }

    fn visit_map(&mut self, value: &'static dyn Descriptor) {
        self.out.push_str("map<string, ");
        self.child(value);
        self.out.push('>');
    }

    fn push_struct(&mut self, name: &str) {
        self.out.push_str(name);
        self.out.push_str("{\n");
        self.indent += 1;
    }

    fn visit_member(&mut self, name: &str, descriptor: &'static dyn Descriptor) {
        self.print_indent();
        self.out.push_str(name);
        self.out.push_str(": ");
        self.child(descriptor);
        self.out.push_str(",\n");
    }

    fn pop_struct(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.print_indent();
        self.out.push('}');
    }

    fn visit_vector(&mut self, component: &'static dyn Descriptor, len: usize) {
        let _ = write!(self.out, "vec{len}<");
        self.child(component);
        self.out.push('>');
    }

    fn visit_matrix(&mut self, component: &'static dyn Descriptor, rows: usize, cols: usize) {
        let _ = write!(self.out, "mat{rows}x{cols}<");
        self.child(component);
        self.out.push('>');
    }

    fn visit_quaternion(&mut self) {
        self.out.push_str("Quaternion");
    }

    fn visit_asset(&mut self, asset_type: &str) {
        let _ = write!(self.out, "Asset<{asset_type}>");
    }

    fn visit_engine_type(&mut self, ty: EngineType) {
        self.out.push_str(ty.as_str());
    }

    fn visit_transparent(&mut self, inner: &'static dyn Descriptor) {
        self.child(inner);
    }
}
