//! Descriptors for built-in types.
//!
//! ## Implemented Menu
//!
//! - primitives: `bool`, `i8`-`i64`, `u8`-`u64`, `f32`, `f64`, `String`
//! - alloc:
//!     - `Vec<T>`: array
//!     - `HashMap<String, T, S>`, `BTreeMap<String, T>`: string-keyed object
//!     - `Box<T>`: transparent
//! - assets: [`Asset<A>`], stored as a path
//! - glam: ("glam" feature)
//!     - `Vec2`, `Vec3`, `Vec4`, `Quat`: arrays of `f32`
//!     - `Mat2`, `Mat3`, `Mat4`: arrays of column vectors
//!
//! Integers accept every integer width on the wire and range-check it.
//! Floats accept both float widths; `f32` rejects finite `f64` values it
//! cannot represent.

// -----------------------------------------------------------------------------
// Modules

mod asset;
mod collections;
mod primitive;

#[cfg(feature = "glam")]
mod math;

// -----------------------------------------------------------------------------
// Exports

pub use asset::{Asset, AssetDescriptor, AssetType};
pub use collections::{BoxDescriptor, MapDescriptor, StringMap, VecDescriptor};
pub use primitive::{
    BoolDescriptor, F32Descriptor, F64Descriptor, I8Descriptor, I16Descriptor, I32Descriptor,
    I64Descriptor, StringDescriptor, U8Descriptor, U16Descriptor, U32Descriptor, U64Descriptor,
};

#[cfg(feature = "glam")]
pub use math::{
    Mat2Descriptor, Mat3Descriptor, Mat4Descriptor, QuatDescriptor, Vec2Descriptor,
    Vec3Descriptor, Vec4Descriptor,
};
