//! Wire-format plugins.
//!
//! A backend implements the [`Serializer`](crate::ser::Serializer) side, the
//! [`Deserializer`](crate::de::Deserializer) side, or both, once per format.
//!
//! - [`json`]: `serde_json` trees, both directions ("json" feature).
//! - [`debug`]: indented text for logs, writing only.
//! - [`serde`]: any `serde` format, writing only ("serde" feature).

// -----------------------------------------------------------------------------
// Modules

pub mod debug;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "serde")]
pub mod serde;
