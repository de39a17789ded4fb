//! Per-type descriptors and the open registry that finds them.
//!
//! ## Menu
//!
//! - [`Descriptor`]: the type-erased part of a descriptor (name and schema).
//! - [`TypeDescriptor`]: serialize, deserialize, construct and coerce a `T`.
//! - [`Serializable`]: maps a type to its singleton descriptor.
//! - [`Value`] / [`Slot`]: a descriptor paired with a value, as handed to
//!   format backends.
//!
//! ## Coercion hooks
//!
//! A backend that reads a value of some wire kind calls the matching hook on
//! the target descriptor. The default hooks widen and forward:
//!
//! ```text
//! i8 -> i16 -> i32 -> i64 -> error
//! u8 -> u16 -> u32 -> u64 -> error
//! f32 -> f64 -> error
//! bool, str, array, object, struct -> error
//! ```
//!
//! so a descriptor overrides exactly the hooks it accepts. A type that only
//! overrides `deserialize_i64` therefore also accepts data reported as `i8`.

use core::ptr;

use crate::de::{
    ArrayDeserializer, DeserializeTarget, Deserializer, ObjectDeserializer, StructDeserializer,
};
use crate::error::DeserializeError;
use crate::schema::SchemaVisitor;
use crate::ser::{SerializeSource, Serializer};

// -----------------------------------------------------------------------------
// Descriptor

/// The type-erased half of a descriptor.
///
/// Every [`TypeDescriptor`] is also a `Descriptor`, so schema builders and the
/// [`TypeRegistry`](crate::registry::TypeRegistry) can hold descriptors of
/// unrelated types side by side.
pub trait Descriptor: Send + Sync {
    /// A stable, human-readable type name.
    ///
    /// Used in diagnostics and schemas only; it is never written to the wire.
    fn name(&self) -> &str;

    /// Describes the type's structure to `visitor` without a live value.
    ///
    /// Implementations call exactly one of the visitor's `visit_*` methods,
    /// or a `push_struct` / `visit_member`* / `pop_struct` sequence.
    fn accept(&self, visitor: &mut dyn SchemaVisitor);
}

/// Returns `true` if both references point at the same descriptor.
///
/// Names are compared too, since zero-sized descriptors may share an address.
#[inline]
pub fn same_descriptor(a: &dyn Descriptor, b: &dyn Descriptor) -> bool {
    ptr::addr_eq(a, b) && a.name() == b.name()
}

// -----------------------------------------------------------------------------
// TypeDescriptor

macro_rules! widen_hook {
    ($(#[$doc:meta])* $hook:ident($ty:ty) => $next:ident) => {
        $(#[$doc])*
        #[inline]
        fn $hook(&self, value: &mut T, v: $ty) -> Result<(), DeserializeError> {
            self.$next(value, v.into())
        }
    };
}

macro_rules! reject_hook {
    ($(#[$doc:meta])* $hook:ident($ty:ty) => $kind:literal) => {
        $(#[$doc])*
        #[inline]
        fn $hook(&self, _value: &mut T, _v: $ty) -> Result<(), DeserializeError> {
            Err(DeserializeError::unsupported($kind, self.name()))
        }
    };
}

/// Serialization, deserialization and schema support for one concrete type.
///
/// There is one instance per type, reached through [`Serializable::descriptor`].
/// Descriptors are immutable and live for the whole process.
///
/// # Example
///
/// A type that stores itself as an `i64` and accepts any signed integer:
///
/// ```
/// use fg_reflect::descriptor::{Descriptor, Serializable, Slot, TypeDescriptor};
/// use fg_reflect::de::Deserializer;
/// use fg_reflect::schema::SchemaVisitor;
/// use fg_reflect::ser::Serializer;
/// use fg_reflect::DeserializeError;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Ticks(i64);
///
/// struct TicksDescriptor;
///
/// impl Descriptor for TicksDescriptor {
///     fn name(&self) -> &str { "Ticks" }
///     fn accept(&self, visitor: &mut dyn SchemaVisitor) { visitor.visit_i64(); }
/// }
///
/// impl TypeDescriptor<Ticks> for TicksDescriptor {
///     fn serialize(&self, serializer: &mut dyn Serializer, value: &Ticks) {
///         serializer.serialize_i64(value.0);
///     }
///     fn deserialize(
///         &self,
///         deserializer: &mut dyn Deserializer,
///         value: &mut Ticks,
///     ) -> Result<(), DeserializeError> {
///         deserializer.deserialize_infer(&mut Slot::new(self, value))
///     }
///     fn make(&self) -> Result<Ticks, DeserializeError> { Ok(Ticks::default()) }
///     fn deserialize_i64(&self, value: &mut Ticks, v: i64) -> Result<(), DeserializeError> {
///         value.0 = v;
///         Ok(())
///     }
/// }
///
/// impl Serializable for Ticks {
///     fn descriptor() -> &'static dyn TypeDescriptor<Self> {
///         static DESCRIPTOR: TicksDescriptor = TicksDescriptor;
///         &DESCRIPTOR
///     }
/// }
///
/// let mut ticks = Ticks::default();
/// Ticks::descriptor().deserialize_i8(&mut ticks, -3).unwrap();
/// assert_eq!(ticks, Ticks(-3));
/// assert!(Ticks::descriptor().deserialize_u8(&mut ticks, 3).is_err());
/// ```
pub trait TypeDescriptor<T>: Descriptor {
    /// Writes `value` into `serializer`.
    fn serialize(&self, serializer: &mut dyn Serializer, value: &T);

    /// Reads into an existing `value`.
    ///
    /// Implementations ask `deserializer` for the wire shape they expect,
    /// passing a [`Slot`] over themselves so that the backend can call back
    /// into the matching coercion hook.
    fn deserialize(
        &self,
        deserializer: &mut dyn Deserializer,
        value: &mut T,
    ) -> Result<(), DeserializeError>;

    /// Constructs a fresh value to deserialize into.
    ///
    /// The default reports that the type cannot be constructed.
    fn make(&self) -> Result<T, DeserializeError> {
        Err(DeserializeError::NotConstructible {
            type_name: self.name().into(),
        })
    }

    reject_hook!(deserialize_bool(bool) => "bool");

    widen_hook!(deserialize_i8(i8) => deserialize_i16);
    widen_hook!(deserialize_i16(i16) => deserialize_i32);
    widen_hook!(deserialize_i32(i32) => deserialize_i64);
    reject_hook!(
        /// Widest signed hook, so the default fails.
        deserialize_i64(i64) => "int64"
    );

    widen_hook!(deserialize_u8(u8) => deserialize_u16);
    widen_hook!(deserialize_u16(u16) => deserialize_u32);
    widen_hook!(deserialize_u32(u32) => deserialize_u64);
    reject_hook!(
        /// Widest unsigned hook, so the default fails.
        deserialize_u64(u64) => "uint64"
    );

    widen_hook!(deserialize_f32(f32) => deserialize_f64);
    reject_hook!(deserialize_f64(f64) => "double");

    reject_hook!(deserialize_str(&str) => "string");

    /// Reads an array, one element at a time.
    #[inline]
    fn deserialize_array(
        &self,
        _value: &mut T,
        _array: &mut dyn ArrayDeserializer,
    ) -> Result<(), DeserializeError> {
        Err(DeserializeError::unsupported("array", self.name()))
    }

    /// Reads a free-form, string-keyed object.
    #[inline]
    fn deserialize_object(
        &self,
        _value: &mut T,
        _object: &mut dyn ObjectDeserializer,
    ) -> Result<(), DeserializeError> {
        Err(DeserializeError::unsupported("object", self.name()))
    }

    /// Reads an object whose members are pulled by name.
    #[inline]
    fn deserialize_struct(
        &self,
        _value: &mut T,
        _fields: &mut dyn StructDeserializer,
    ) -> Result<(), DeserializeError> {
        Err(DeserializeError::unsupported("struct", self.name()))
    }
}

// -----------------------------------------------------------------------------
// Serializable

/// A type with a registered descriptor.
///
/// Implementing this trait is registering the type: there is no central
/// table to edit. The descriptor is usually built lazily and stored in a
/// [`NonGenericDescriptorCell`] or [`GenericDescriptorCell`].
///
/// Most types get this from `#[derive(Serializable)]`.
///
/// [`NonGenericDescriptorCell`]: crate::registry::NonGenericDescriptorCell
/// [`GenericDescriptorCell`]: crate::registry::GenericDescriptorCell
pub trait Serializable: Sized + 'static {
    fn descriptor() -> &'static dyn TypeDescriptor<Self>;
}

/// Returns the descriptor of `T`, erased to its schema half.
#[inline]
pub fn descriptor_of<T: Serializable>() -> &'static dyn Descriptor {
    T::descriptor()
}

/// Returns the human-readable name of `T`.
#[inline]
pub fn type_name<T: Serializable>() -> &'static str {
    T::descriptor().name()
}

// -----------------------------------------------------------------------------
// Value & Slot

/// A value ready to be written, paired with its descriptor.
pub struct Value<'a, T> {
    descriptor: &'a dyn TypeDescriptor<T>,
    value: &'a T,
}

impl<'a, T> Value<'a, T> {
    #[inline]
    pub fn new(descriptor: &'a dyn TypeDescriptor<T>, value: &'a T) -> Self {
        Self { descriptor, value }
    }
}

impl<'a, T: Serializable> Value<'a, T> {
    /// Pairs `value` with the registered descriptor of `T`.
    #[inline]
    pub fn of(value: &'a T) -> Self {
        Self::new(T::descriptor(), value)
    }
}

impl<T> SerializeSource for Value<'_, T> {
    #[inline]
    fn type_name(&self) -> &str {
        self.descriptor.name()
    }

    #[inline]
    fn serialize(&self, serializer: &mut dyn Serializer) {
        self.descriptor.serialize(serializer, self.value);
    }
}

/// A value being read into, paired with its descriptor.
///
/// Backends see it as a [`DeserializeTarget`]; every call is forwarded to the
/// descriptor's hook of the same name.
pub struct Slot<'a, T> {
    descriptor: &'a dyn TypeDescriptor<T>,
    value: &'a mut T,
}

impl<'a, T> Slot<'a, T> {
    #[inline]
    pub fn new(descriptor: &'a dyn TypeDescriptor<T>, value: &'a mut T) -> Self {
        Self { descriptor, value }
    }
}

impl<'a, T: Serializable> Slot<'a, T> {
    /// Pairs `value` with the registered descriptor of `T`.
    #[inline]
    pub fn of(value: &'a mut T) -> Self {
        Self::new(T::descriptor(), value)
    }
}

macro_rules! forward_target {
    ($($hook:ident($ty:ty)),* $(,)?) => {
        $(
            #[inline]
            fn $hook(&mut self, v: $ty) -> Result<(), DeserializeError> {
                self.descriptor.$hook(self.value, v)
            }
        )*
    };
}

impl<T> DeserializeTarget for Slot<'_, T> {
    #[inline]
    fn type_name(&self) -> &str {
        self.descriptor.name()
    }

    #[inline]
    fn deserialize(&mut self, deserializer: &mut dyn Deserializer) -> Result<(), DeserializeError> {
        self.descriptor.deserialize(deserializer, self.value)
    }

    forward_target! {
        deserialize_bool(bool),
        deserialize_i8(i8),
        deserialize_i16(i16),
        deserialize_i32(i32),
        deserialize_i64(i64),
        deserialize_u8(u8),
        deserialize_u16(u16),
        deserialize_u32(u32),
        deserialize_u64(u64),
        deserialize_f32(f32),
        deserialize_f64(f64),
        deserialize_str(&str),
    }

    #[inline]
    fn deserialize_array(
        &mut self,
        array: &mut dyn ArrayDeserializer,
    ) -> Result<(), DeserializeError> {
        self.descriptor.deserialize_array(self.value, array)
    }

    #[inline]
    fn deserialize_object(
        &mut self,
        object: &mut dyn ObjectDeserializer,
    ) -> Result<(), DeserializeError> {
        self.descriptor.deserialize_object(self.value, object)
    }

    #[inline]
    fn deserialize_struct(
        &mut self,
        fields: &mut dyn StructDeserializer,
    ) -> Result<(), DeserializeError> {
        self.descriptor.deserialize_struct(self.value, fields)
    }
}
