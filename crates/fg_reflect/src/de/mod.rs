//! The format-agnostic reading half.
//!
//! Reading is driven from both ends. A descriptor asks the [`Deserializer`]
//! for the shape it expects, handing over a [`DeserializeTarget`] (usually a
//! [`Slot`]). The backend inspects the wire value and calls back into the
//! target's matching coercion hook, or fails with a
//! [`DeserializeError::TypeMismatch`].
//!
//! Compound values are read through three cursors:
//!
//! - [`ArrayDeserializer`]: forward-only, single pass over elements.
//! - [`ObjectDeserializer`]: key/value pairs in wire order. Unknown keys can
//!   be skipped with [`ignore_next_value`](ObjectDeserializer::ignore_next_value).
//! - [`StructDeserializer`]: members pulled by name in the order the reader
//!   wants, whatever order the wire presents them in.

use alloc::string::String;

use crate::descriptor::{Serializable, Slot, TypeDescriptor};
use crate::error::DeserializeError;

// -----------------------------------------------------------------------------
// DeserializeTarget

macro_rules! reject_target {
    ($($hook:ident($ty:ty) => $kind:literal),* $(,)?) => {
        $(
            #[inline]
            fn $hook(&mut self, _v: $ty) -> Result<(), DeserializeError> {
                Err(DeserializeError::unsupported($kind, self.type_name()))
            }
        )*
    };
}

/// A value being read into, with the hooks of its descriptor.
///
/// This is the type-erased form of [`Slot`]. Every hook rejects its input by
/// default, so ad-hoc targets only implement what they accept.
pub trait DeserializeTarget {
    fn type_name(&self) -> &str;

    /// Runs the target's full deserialization against `deserializer`.
    fn deserialize(&mut self, deserializer: &mut dyn Deserializer) -> Result<(), DeserializeError>;

    reject_target! {
        deserialize_bool(bool) => "bool",
        deserialize_i8(i8) => "int8",
        deserialize_i16(i16) => "int16",
        deserialize_i32(i32) => "int32",
        deserialize_i64(i64) => "int64",
        deserialize_u8(u8) => "uint8",
        deserialize_u16(u16) => "uint16",
        deserialize_u32(u32) => "uint32",
        deserialize_u64(u64) => "uint64",
        deserialize_f32(f32) => "float",
        deserialize_f64(f64) => "double",
        deserialize_str(&str) => "string",
    }

    #[inline]
    fn deserialize_array(
        &mut self,
        _array: &mut dyn ArrayDeserializer,
    ) -> Result<(), DeserializeError> {
        Err(DeserializeError::unsupported("array", self.type_name()))
    }

    #[inline]
    fn deserialize_object(
        &mut self,
        _object: &mut dyn ObjectDeserializer,
    ) -> Result<(), DeserializeError> {
        Err(DeserializeError::unsupported("object", self.type_name()))
    }

    #[inline]
    fn deserialize_struct(
        &mut self,
        _fields: &mut dyn StructDeserializer,
    ) -> Result<(), DeserializeError> {
        Err(DeserializeError::unsupported("struct", self.type_name()))
    }
}

// -----------------------------------------------------------------------------
// Deserializer

/// One deserialization session of some wire format, positioned at one value.
///
/// Each method states the shape the target expects. Backends that know the
/// wire width of numbers should override the narrow methods; the defaults
/// read the widest width and let the target's hooks range-check.
pub trait Deserializer {
    fn deserialize_bool(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError>;

    #[inline]
    fn deserialize_i8(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        self.deserialize_i64(target)
    }

    #[inline]
    fn deserialize_i16(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        self.deserialize_i64(target)
    }

    #[inline]
    fn deserialize_i32(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        self.deserialize_i64(target)
    }

    fn deserialize_i64(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError>;

    #[inline]
    fn deserialize_u8(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        self.deserialize_u64(target)
    }

    #[inline]
    fn deserialize_u16(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        self.deserialize_u64(target)
    }

    #[inline]
    fn deserialize_u32(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        self.deserialize_u64(target)
    }

    fn deserialize_u64(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError>;

    #[inline]
    fn deserialize_f32(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError> {
        self.deserialize_f64(target)
    }

    fn deserialize_f64(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError>;

    fn deserialize_str(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError>;

    fn deserialize_array(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError>;

    fn deserialize_object(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError>;

    /// Reads an object whose expected members are `members`, in order.
    ///
    /// Members present on the wire but not in `members` are skipped.
    fn deserialize_struct(
        &mut self,
        members: &[&str],
        target: &mut dyn DeserializeTarget,
    ) -> Result<(), DeserializeError>;

    /// Picks the most natural hook for whatever the wire value is.
    fn deserialize_infer(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError>;
}

/// Constructs a fresh `T` and reads into it.
pub fn deserialize_value<T: Serializable>(
    deserializer: &mut dyn Deserializer,
) -> Result<T, DeserializeError> {
    let descriptor = T::descriptor();
    let mut value = descriptor.make()?;
    descriptor.deserialize(deserializer, &mut value)?;
    Ok(value)
}

// -----------------------------------------------------------------------------
// ArrayDeserializer

/// Cursor over the elements of an array.
pub trait ArrayDeserializer {
    /// The number of elements left, if the format knows it up front.
    fn size_hint(&self) -> Option<usize>;

    fn has_next(&self) -> bool;

    /// Reads the next element into `target`.
    fn next_element(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError>;
}

impl dyn ArrayDeserializer + '_ {
    /// Reads the next element as a freshly constructed `T`.
    pub fn next<T: Serializable>(&mut self) -> Result<T, DeserializeError> {
        let mut value = T::descriptor().make()?;
        self.next_element(&mut Slot::of(&mut value))?;
        Ok(value)
    }

    /// Reads the next element into an existing value.
    #[inline]
    pub fn next_into<T: Serializable>(&mut self, value: &mut T) -> Result<(), DeserializeError> {
        self.next_element(&mut Slot::of(value))
    }

    /// Reads the next element through an explicit descriptor.
    #[inline]
    pub fn next_with<T>(
        &mut self,
        descriptor: &dyn TypeDescriptor<T>,
        value: &mut T,
    ) -> Result<(), DeserializeError> {
        self.next_element(&mut Slot::new(descriptor, value))
    }
}

// -----------------------------------------------------------------------------
// ObjectDeserializer

/// Cursor over the key/value pairs of an object, in wire order.
///
/// Each [`next_key`](Self::next_key) must be followed by exactly one of
/// [`next_value`](Self::next_value) or [`ignore_next_value`](Self::ignore_next_value).
pub trait ObjectDeserializer {
    /// The number of pairs left, if the format knows it up front.
    fn size_hint(&self) -> Option<usize>;

    fn has_next(&self) -> bool;

    fn next_key(&mut self) -> Result<String, DeserializeError>;

    fn next_value(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError>;

    /// Skips the value belonging to the last key.
    fn ignore_next_value(&mut self) -> Result<(), DeserializeError>;
}

impl dyn ObjectDeserializer + '_ {
    /// Reads the value of the last key as a freshly constructed `T`.
    pub fn next_value_of<T: Serializable>(&mut self) -> Result<T, DeserializeError> {
        let mut value = T::descriptor().make()?;
        self.next_value(&mut Slot::of(&mut value))?;
        Ok(value)
    }

    /// Reads the value of the last key through an explicit descriptor.
    #[inline]
    pub fn next_value_with<T>(
        &mut self,
        descriptor: &dyn TypeDescriptor<T>,
        value: &mut T,
    ) -> Result<(), DeserializeError> {
        self.next_value(&mut Slot::new(descriptor, value))
    }
}

// -----------------------------------------------------------------------------
// StructDeserializer

/// Cursor that pulls object members by name.
pub trait StructDeserializer {
    /// Whether `member` is present. Positions the cursor on it if so.
    fn is_next(&mut self, member: &str) -> bool;

    /// Reads the member the cursor was positioned on by [`is_next`](Self::is_next).
    fn next_member(&mut self, target: &mut dyn DeserializeTarget) -> Result<(), DeserializeError>;
}

impl dyn StructDeserializer + '_ {
    /// Reads `member` into `value` if it is present.
    ///
    /// Returns `Ok(false)` and leaves `value` untouched if it is absent.
    pub fn next<T: Serializable>(
        &mut self,
        member: &str,
        value: &mut T,
    ) -> Result<bool, DeserializeError> {
        self.next_with(member, T::descriptor(), value)
    }

    /// Like [`next`](Self::next), through an explicit descriptor.
    pub fn next_with<T>(
        &mut self,
        member: &str,
        descriptor: &dyn TypeDescriptor<T>,
        value: &mut T,
    ) -> Result<bool, DeserializeError> {
        if !self.is_next(member) {
            return Ok(false);
        }
        self.next_member(&mut Slot::new(descriptor, value))?;
        Ok(true)
    }

    /// Reads `member` as a freshly constructed `T`, or `None` if it is absent.
    pub fn next_value<T: Serializable>(&mut self, member: &str) -> Result<Option<T>, DeserializeError> {
        if !self.is_next(member) {
            return Ok(None);
        }
        let mut value = T::descriptor().make()?;
        self.next_member(&mut Slot::of(&mut value))?;
        Ok(Some(value))
    }
}
