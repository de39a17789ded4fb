use alloc::boxed::Box;

use crate::de::{ObjectDeserializer, StructDeserializer};
use crate::descriptor::{Descriptor, Serializable};
use crate::error::DeserializeError;
use crate::ser::ObjectSerializer;

// -----------------------------------------------------------------------------
// MemberKind

/// How a member reaches its value inside the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Direct access to a field.
    Field,
    /// A getter returning a copy and a setter taking a fresh value.
    Accessor,
    /// A composed base struct, serialized through its own descriptor.
    Base,
}

// -----------------------------------------------------------------------------
// Access strategies

pub(crate) trait MemberAccess<T>: Send + Sync {
    fn serialize(&self, name: &str, object: &mut dyn ObjectSerializer, owner: &T);

    /// Returns `Ok(false)` if the member is absent.
    fn deserialize_member(
        &self,
        name: &str,
        fields: &mut dyn StructDeserializer,
        owner: &mut T,
    ) -> Result<bool, DeserializeError>;

    fn deserialize_value(
        &self,
        object: &mut dyn ObjectDeserializer,
        owner: &mut T,
    ) -> Result<(), DeserializeError>;

    fn descriptor(&self) -> &'static dyn Descriptor;
}

/// Fields and base structs: borrow the member in place.
struct Projection<T, M> {
    get: fn(&T) -> &M,
    get_mut: fn(&mut T) -> &mut M,
}

impl<T, M: Serializable> MemberAccess<T> for Projection<T, M> {
    #[inline]
    fn serialize(&self, name: &str, object: &mut dyn ObjectSerializer, owner: &T) {
        object.member(name, (self.get)(owner));
    }

    #[inline]
    fn deserialize_member(
        &self,
        name: &str,
        fields: &mut dyn StructDeserializer,
        owner: &mut T,
    ) -> Result<bool, DeserializeError> {
        fields.next(name, (self.get_mut)(owner))
    }

    #[inline]
    fn deserialize_value(
        &self,
        object: &mut dyn ObjectDeserializer,
        owner: &mut T,
    ) -> Result<(), DeserializeError> {
        object.next_value_with(M::descriptor(), (self.get_mut)(owner))
    }

    #[inline]
    fn descriptor(&self) -> &'static dyn Descriptor {
        M::descriptor()
    }
}

/// Getter/setter pairs: values are copied through the pair.
struct Accessor<T, M> {
    get: fn(&T) -> M,
    set: fn(&mut T, M),
}

impl<T, M: Serializable> MemberAccess<T> for Accessor<T, M> {
    #[inline]
    fn serialize(&self, name: &str, object: &mut dyn ObjectSerializer, owner: &T) {
        let value = (self.get)(owner);
        object.member(name, &value);
    }

    fn deserialize_member(
        &self,
        name: &str,
        fields: &mut dyn StructDeserializer,
        owner: &mut T,
    ) -> Result<bool, DeserializeError> {
        match fields.next_value::<M>(name)? {
            Some(value) => {
                (self.set)(owner, value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn deserialize_value(
        &self,
        object: &mut dyn ObjectDeserializer,
        owner: &mut T,
    ) -> Result<(), DeserializeError> {
        let value = object.next_value_of::<M>()?;
        (self.set)(owner, value);
        Ok(())
    }

    #[inline]
    fn descriptor(&self) -> &'static dyn Descriptor {
        M::descriptor()
    }
}

// -----------------------------------------------------------------------------
// MemberDescriptor

/// One named member of a struct descriptor.
pub struct MemberDescriptor<T> {
    name: &'static str,
    kind: MemberKind,
    access: Box<dyn MemberAccess<T>>,
}

impl<T: 'static> MemberDescriptor<T> {
    /// A member stored directly in a field of `T`.
    pub fn field<M: Serializable>(
        name: &'static str,
        get: fn(&T) -> &M,
        get_mut: fn(&mut T) -> &mut M,
    ) -> Self {
        Self {
            name,
            kind: MemberKind::Field,
            access: Box::new(Projection { get, get_mut }),
        }
    }

    /// A member read through `get` and written through `set`.
    ///
    /// On deserialization `set` receives a freshly constructed value, never
    /// the previous one.
    pub fn accessor<M: Serializable>(name: &'static str, get: fn(&T) -> M, set: fn(&mut T, M)) -> Self {
        Self {
            name,
            kind: MemberKind::Accessor,
            access: Box::new(Accessor { get, set }),
        }
    }

    /// A composed base struct `B`, stored under `name`.
    pub fn base<B: Serializable>(
        name: &'static str,
        upcast: fn(&T) -> &B,
        upcast_mut: fn(&mut T) -> &mut B,
    ) -> Self {
        Self {
            name,
            kind: MemberKind::Base,
            access: Box::new(Projection {
                get: upcast,
                get_mut: upcast_mut,
            }),
        }
    }

    /// A composed base struct `B`, stored under the name of `B`'s descriptor.
    pub fn base_default<B: Serializable>(upcast: fn(&T) -> &B, upcast_mut: fn(&mut T) -> &mut B) -> Self {
        Self::base(B::descriptor().name(), upcast, upcast_mut)
    }
}

impl<T> MemberDescriptor<T> {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// The descriptor of the member's value type.
    #[inline]
    pub fn descriptor(&self) -> &'static dyn Descriptor {
        self.access.descriptor()
    }

    #[inline]
    pub(crate) fn serialize(&self, object: &mut dyn ObjectSerializer, owner: &T) {
        self.access.serialize(self.name, object, owner);
    }

    #[inline]
    pub(crate) fn deserialize_member(
        &self,
        fields: &mut dyn StructDeserializer,
        owner: &mut T,
    ) -> Result<bool, DeserializeError> {
        self.access.deserialize_member(self.name, fields, owner)
    }

    #[inline]
    pub(crate) fn deserialize_value(
        &self,
        object: &mut dyn ObjectDeserializer,
        owner: &mut T,
    ) -> Result<(), DeserializeError> {
        self.access.deserialize_value(object, owner)
    }
}
