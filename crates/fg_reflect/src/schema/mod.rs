//! Structural descriptions of types, built without a live value.
//!
//! A descriptor [`accept`](crate::descriptor::Descriptor::accept)s a
//! [`SchemaVisitor`] and calls exactly one of its methods, or a
//! `push_struct` / `visit_member`* / `pop_struct` sequence for structs.
//!
//! Two visitors ship with the crate:
//!
//! - [`SchemaBuilder`] (through [`schema_of`] / [`build_schema`]) produces a
//!   [`SchemaNode`] tree. Types that contain themselves are cut with a
//!   [`SchemaNode::Recursive`] back-reference.
//! - [`DebugSchemaVisitor`] (through [`debug_schema`]) prints a readable
//!   description such as `Player{\n\tname: string,\n}`.

use core::fmt;

use crate::descriptor::Descriptor;

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod debug;
mod node;

#[cfg(feature = "json")]
mod json;

// -----------------------------------------------------------------------------
// Exports

pub use builder::{SchemaBuilder, build_schema, dependencies, schema_of};
pub use debug::{DebugSchemaVisitor, debug_schema};
pub use node::{MemberSchema, PrimitiveType, SchemaNode, StructSchema};

// -----------------------------------------------------------------------------
// EngineType

/// Engine-owned values whose structure is not described by a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineType {
    Entity,
    Prefab,
    Children,
}

impl EngineType {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entity => "Entity",
            Self::Prefab => "Prefab",
            Self::Children => "Children",
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// SchemaVisitor

/// Receives the structure of a type from [`Descriptor::accept`].
///
/// Child descriptors are handed over unvisited; the visitor decides whether
/// and how to descend, usually with [`visit`](Self::visit).
pub trait SchemaVisitor {
    fn visit_bool(&mut self);
    fn visit_i8(&mut self);
    fn visit_i16(&mut self);
    fn visit_i32(&mut self);
    fn visit_i64(&mut self);
    fn visit_u8(&mut self);
    fn visit_u16(&mut self);
    fn visit_u32(&mut self);
    fn visit_u64(&mut self);
    fn visit_f32(&mut self);
    fn visit_f64(&mut self);
    fn visit_string(&mut self);

    /// A homogeneous array of `element`.
    fn visit_array(&mut self, element: &'static dyn Descriptor);

    /// A string-keyed map of `value`.
    fn visit_map(&mut self, value: &'static dyn Descriptor);

    fn push_struct(&mut self, name: &str);
    fn visit_member(&mut self, name: &str, descriptor: &'static dyn Descriptor);
    fn pop_struct(&mut self);

    /// A fixed-size math vector of `len` components.
    fn visit_vector(&mut self, component: &'static dyn Descriptor, len: usize);

    /// A fixed-size math matrix of `rows` × `cols` components.
    fn visit_matrix(&mut self, component: &'static dyn Descriptor, rows: usize, cols: usize);

    fn visit_quaternion(&mut self);

    /// A reference to an asset of kind `asset_type`.
    fn visit_asset(&mut self, asset_type: &str);

    fn visit_engine_type(&mut self, ty: EngineType);

    /// A wrapper with exactly the structure of `inner`, such as `Box<T>`.
    fn visit_transparent(&mut self, inner: &'static dyn Descriptor);

    /// Visits `descriptor`.
    #[inline]
    fn visit(&mut self, descriptor: &dyn Descriptor)
    where
        Self: Sized,
    {
        descriptor.accept(self);
    }
}
