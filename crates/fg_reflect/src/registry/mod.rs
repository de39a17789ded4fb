//! Descriptor storage and the name-keyed type registry.
//!
//! ## Menu
//!
//! - [`NonGenericDescriptorCell`]: lazily built descriptor of a non-generic type.
//! - [`GenericDescriptorCell`]: lazily built descriptors of a generic type's instantiations.
//! - [`TypeRegistry`]: name → descriptor index for editor tooling.
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`] .
//!
//! We use the [`inventory`] crate to implement static registration.
//! Not all platforms support it (although major platforms do); where it is
//! unsupported, the function returns `false` without causing any errors.
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericDescriptorCell, NonGenericDescriptorCell};
pub use type_registry::TypeRegistry;
