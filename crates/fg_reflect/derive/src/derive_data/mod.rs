//! Provide some tools for parsing token stream.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod serializable_struct;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{AccessorAttribute, Factory, FieldRole, TypeAttributes};
pub(crate) use serializable_struct::SerializableStruct;
