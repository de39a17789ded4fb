use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::EngineType;

// -----------------------------------------------------------------------------
// PrimitiveType

/// Leaf types of a [`SchemaNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
    String,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
    Quaternion,
}

impl PrimitiveType {
    /// The lowercase name used by schema dumps, e.g. `"uint16"` or `"mat3"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::Mat2 => "mat2",
            Self::Mat3 => "mat3",
            Self::Mat4 => "mat4",
            Self::Quaternion => "quaternion",
        }
    }

    pub(crate) const fn vector(len: usize) -> Option<Self> {
        match len {
            2 => Some(Self::Vec2),
            3 => Some(Self::Vec3),
            4 => Some(Self::Vec4),
            _ => None,
        }
    }

    pub(crate) const fn matrix(rows: usize, cols: usize) -> Option<Self> {
        match (rows, cols) {
            (2, 2) => Some(Self::Mat2),
            (3, 3) => Some(Self::Mat3),
            (4, 4) => Some(Self::Mat4),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// SchemaNode

/// The structure of a type, as a strict tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Primitive(PrimitiveType),
    Array(Box<SchemaNode>),
    /// A string-keyed map.
    Map(Box<SchemaNode>),
    Struct(StructSchema),
    /// An asset reference, by asset kind.
    Asset(String),
    EngineType(EngineType),
    /// A type that is already being described further up the tree.
    ///
    /// Holds the type's name; the full description is at that ancestor.
    Recursive(String),
    /// A descriptor that did not describe itself.
    Opaque(String),
}

impl SchemaNode {
    #[inline]
    pub fn as_struct(&self) -> Option<&StructSchema> {
        match self {
            Self::Struct(schema) => Some(schema),
            _ => None,
        }
    }
}

/// The members of a struct, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructSchema {
    pub name: String,
    pub members: Vec<MemberSchema>,
}

impl StructSchema {
    /// Returns the schema of the member named `name`.
    pub fn member(&self, name: &str) -> Option<&SchemaNode> {
        self.members
            .iter()
            .find(|member| member.name == name)
            .map(|member| &member.node)
    }

    /// Iterates over member names in declaration order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|member| member.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberSchema {
    pub name: String,
    pub node: SchemaNode,
}
