#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// The derive resolves paths through `fg_macro_utils::Manifest`, which can only
// produce one crate name. `extern self` makes `fg_reflect` valid inside this
// crate as well as in doctests.
extern crate self as fg_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod backends;
pub mod class;
pub mod component;
pub mod de;
pub mod descriptor;
pub mod impls;
pub mod registry;
pub mod schema;
pub mod ser;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use descriptor::{Descriptor, Serializable, TypeDescriptor};
pub use error::DeserializeError;
pub use fg_reflect_derive as derive;
