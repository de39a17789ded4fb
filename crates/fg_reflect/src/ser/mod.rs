//! The format-agnostic writing half.
//!
//! A backend implements [`Serializer`] plus the [`ObjectSerializer`] and
//! [`ArraySerializer`] builders once. Descriptors drive it:
//!
//! ```text
//! serializer.serialize_object()  -> ObjectSerializer
//!     .serialize_member(name, value)*
//!     .end()
//! ```
//!
//! A builder mutably borrows its parent serializer and `end` consumes it, so
//! a builder cannot be used after it was ended and the parent cannot be used
//! while one of its builders is still open.

use alloc::boxed::Box;

use crate::descriptor::{Serializable, TypeDescriptor, Value};

// -----------------------------------------------------------------------------
// SerializeSource

/// Something that can write itself into a [`Serializer`].
///
/// This is the type-erased form of a descriptor paired with a value,
/// usually a [`Value`].
pub trait SerializeSource {
    fn type_name(&self) -> &str;

    fn serialize(&self, serializer: &mut dyn Serializer);
}

// -----------------------------------------------------------------------------
// Serializer

/// One serialization session of some wire format.
///
/// Only `bool`, `i64`, `u64`, `f64`, `str` and the two builders are
/// required; narrower numbers widen into them by default.
pub trait Serializer {
    fn serialize_bool(&mut self, v: bool);

    #[inline]
    fn serialize_i8(&mut self, v: i8) {
        self.serialize_i64(v.into());
    }

    #[inline]
    fn serialize_i16(&mut self, v: i16) {
        self.serialize_i64(v.into());
    }

    #[inline]
    fn serialize_i32(&mut self, v: i32) {
        self.serialize_i64(v.into());
    }

    fn serialize_i64(&mut self, v: i64);

    #[inline]
    fn serialize_u8(&mut self, v: u8) {
        self.serialize_u64(v.into());
    }

    #[inline]
    fn serialize_u16(&mut self, v: u16) {
        self.serialize_u64(v.into());
    }

    #[inline]
    fn serialize_u32(&mut self, v: u32) {
        self.serialize_u64(v.into());
    }

    fn serialize_u64(&mut self, v: u64);

    #[inline]
    fn serialize_f32(&mut self, v: f32) {
        self.serialize_f64(v.into());
    }

    fn serialize_f64(&mut self, v: f64);

    fn serialize_str(&mut self, v: &str);

    /// Opens an object. Members keep the order they are written in.
    fn serialize_object(&mut self) -> Box<dyn ObjectSerializer + '_>;

    /// Opens an array.
    fn serialize_array(&mut self) -> Box<dyn ArraySerializer + '_>;
}

/// Writes `value` into `serializer` through its registered descriptor.
#[inline]
pub fn serialize_value<T: Serializable>(serializer: &mut dyn Serializer, value: &T) {
    T::descriptor().serialize(serializer, value);
}

// -----------------------------------------------------------------------------
// Builders

/// Builder for one object, obtained from [`Serializer::serialize_object`].
pub trait ObjectSerializer {
    fn serialize_member(&mut self, name: &str, value: &dyn SerializeSource);

    /// Closes the object.
    fn end(self: Box<Self>);
}

impl dyn ObjectSerializer + '_ {
    /// Writes a member through the registered descriptor of `T`.
    #[inline]
    pub fn member<T: Serializable>(&mut self, name: &str, value: &T) {
        self.serialize_member(name, &Value::of(value));
    }

    /// Writes a member through an explicit descriptor.
    #[inline]
    pub fn member_with<T>(&mut self, name: &str, descriptor: &dyn TypeDescriptor<T>, value: &T) {
        self.serialize_member(name, &Value::new(descriptor, value));
    }
}

/// Builder for one array, obtained from [`Serializer::serialize_array`].
pub trait ArraySerializer {
    fn serialize_element(&mut self, value: &dyn SerializeSource);

    /// Closes the array.
    fn end(self: Box<Self>);
}

impl dyn ArraySerializer + '_ {
    /// Writes an element through the registered descriptor of `T`.
    #[inline]
    pub fn element<T: Serializable>(&mut self, value: &T) {
        self.serialize_element(&Value::of(value));
    }

    /// Writes an element through an explicit descriptor.
    #[inline]
    pub fn element_with<T>(&mut self, descriptor: &dyn TypeDescriptor<T>, value: &T) {
        self.serialize_element(&Value::new(descriptor, value));
    }
}
