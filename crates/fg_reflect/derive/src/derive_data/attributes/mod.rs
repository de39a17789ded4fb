//! Parsing of `#[serializable(...)]` attributes.

// -----------------------------------------------------------------------------
// Modules

mod field_attributes;
mod type_attributes;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use field_attributes::{FieldAttributes, FieldRole};
pub(crate) use type_attributes::{AccessorAttribute, Factory, TypeAttributes};

use syn::Attribute;

#[inline]
fn is_serializable(attr: &Attribute) -> bool {
    attr.path().is_ident(crate::SERIALIZABLE_ATTRIBUTE_NAME)
}
