//! Descriptors for structs, built from an ordered list of named members.
//!
//! ## Menu
//!
//! - [`ClassDescriptor`]: the descriptor of one struct type.
//! - [`ClassBuilder`]: assembles a `ClassDescriptor` member by member.
//! - [`MemberDescriptor`] / [`MemberKind`]: one member and its access strategy.
//!
//! ## Wire shape
//!
//! A struct is written as an object whose keys are the member names, in
//! declaration order. On reading, every declared member is mandatory: a
//! missing one fails with [`DeserializeError::MissingMember`]. Optionality
//! belongs in the member's type. Keys that match no member are skipped.
//!
//! Most structs get their descriptor from `#[derive(Serializable)]`; the
//! builder is what the derive expands to and can be used by hand.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::de::{Deserializer, ObjectDeserializer, StructDeserializer};
use crate::descriptor::{Descriptor, Serializable, Slot, TypeDescriptor};
use crate::error::DeserializeError;
use crate::schema::SchemaVisitor;
use crate::ser::Serializer;

// -----------------------------------------------------------------------------
// Modules

mod member;

// -----------------------------------------------------------------------------
// Exports

pub use member::{MemberDescriptor, MemberKind};

// -----------------------------------------------------------------------------
// ClassDescriptor

/// The descriptor of a struct type `T`.
///
/// # Example
///
/// ```
/// use fg_reflect::Serializable;
/// use fg_reflect::class::ClassDescriptor;
/// use fg_reflect::descriptor::TypeDescriptor;
/// use fg_reflect::registry::NonGenericDescriptorCell;
///
/// #[derive(Default, Clone, Copy, PartialEq, Debug)]
/// struct Transform {
///     scale: f32,
/// }
///
/// #[derive(Default, PartialEq, Debug)]
/// struct Sprite {
///     transform: Transform,
///     layer: i32,
///     opacity: u8,
/// }
///
/// impl Sprite {
///     fn opacity(&self) -> f64 {
///         f64::from(self.opacity) / 255.0
///     }
///     fn set_opacity(&mut self, value: f64) {
///         self.opacity = (value * 255.0).round() as u8;
///     }
/// }
///
/// impl Serializable for Transform {
///     fn descriptor() -> &'static dyn TypeDescriptor<Self> {
///         static CELL: NonGenericDescriptorCell<ClassDescriptor<Transform>> =
///             NonGenericDescriptorCell::new();
///         CELL.get_or_init(|| {
///             ClassDescriptor::<Transform>::builder("Transform")
///                 .field("scale", |t| &t.scale, |t| &mut t.scale)
///                 .with_default()
///                 .build()
///         })
///     }
/// }
///
/// impl Serializable for Sprite {
///     fn descriptor() -> &'static dyn TypeDescriptor<Self> {
///         static CELL: NonGenericDescriptorCell<ClassDescriptor<Sprite>> =
///             NonGenericDescriptorCell::new();
///         CELL.get_or_init(|| {
///             ClassDescriptor::<Sprite>::builder("Sprite")
///                 .base(|s| &s.transform, |s| &mut s.transform)
///                 .field("layer", |s| &s.layer, |s| &mut s.layer)
///                 .accessor("opacity", Sprite::opacity, Sprite::set_opacity)
///                 .with_default()
///                 .build()
///         })
///     }
/// }
///
/// let names: Vec<_> = fg_reflect::schema::schema_of::<Sprite>()
///     .as_struct()
///     .unwrap()
///     .member_names()
///     .map(String::from)
///     .collect();
/// assert_eq!(names, ["Transform", "layer", "opacity"]);
/// ```
pub struct ClassDescriptor<T> {
    name: Cow<'static, str>,
    members: Vec<MemberDescriptor<T>>,
    member_names: Vec<&'static str>,
    factory: Option<fn() -> T>,
}

impl<T: 'static> ClassDescriptor<T> {
    /// Starts building the descriptor of a struct called `name`.
    #[inline]
    pub fn builder(name: impl Into<Cow<'static, str>>) -> ClassBuilder<T> {
        ClassBuilder {
            name: name.into(),
            members: Vec::new(),
            factory: None,
        }
    }
}

impl<T> ClassDescriptor<T> {
    /// The members in declaration order.
    #[inline]
    pub fn members(&self) -> &[MemberDescriptor<T>] {
        &self.members
    }

    /// Returns the member called `name`.
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor<T>> {
        self.members.iter().find(|member| member.name() == name)
    }

    fn missing(&self, member: &str) -> DeserializeError {
        DeserializeError::MissingMember {
            member: member.into(),
            type_name: self.name.as_ref().into(),
        }
    }
}

impl<T> Descriptor for ClassDescriptor<T> {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    fn accept(&self, visitor: &mut dyn SchemaVisitor) {
        visitor.push_struct(&self.name);
        for member in &self.members {
            visitor.visit_member(member.name(), member.descriptor());
        }
        visitor.pop_struct();
    }
}

impl<T> TypeDescriptor<T> for ClassDescriptor<T> {
    fn serialize(&self, serializer: &mut dyn Serializer, value: &T) {
        let mut object = serializer.serialize_object();
        for member in &self.members {
            member.serialize(&mut *object, value);
        }
        object.end();
    }

    fn deserialize(
        &self,
        deserializer: &mut dyn Deserializer,
        value: &mut T,
    ) -> Result<(), DeserializeError> {
        deserializer.deserialize_struct(&self.member_names, &mut Slot::new(self, value))
    }

    fn make(&self) -> Result<T, DeserializeError> {
        match self.factory {
            Some(factory) => Ok(factory()),
            None => Err(DeserializeError::NotConstructible {
                type_name: self.name.as_ref().into(),
            }),
        }
    }

    fn deserialize_struct(
        &self,
        value: &mut T,
        fields: &mut dyn StructDeserializer,
    ) -> Result<(), DeserializeError> {
        for member in &self.members {
            if !member.deserialize_member(fields, value)? {
                return Err(self.missing(member.name()));
            }
        }
        Ok(())
    }

    fn deserialize_object(
        &self,
        value: &mut T,
        object: &mut dyn ObjectDeserializer,
    ) -> Result<(), DeserializeError> {
        let mut seen = alloc::vec![false; self.members.len()];

        while object.has_next() {
            let key = object.next_key()?;
            match self.members.iter().position(|member| member.name() == key) {
                Some(index) => {
                    self.members[index].deserialize_value(object, value)?;
                    seen[index] = true;
                }
                None => {
                    log::debug!("ignoring unknown member `{key}` of {}", self.name);
                    object.ignore_next_value()?;
                }
            }
        }

        match seen.iter().position(|seen| !seen) {
            Some(index) => Err(self.missing(self.members[index].name())),
            None => Ok(()),
        }
    }
}

// -----------------------------------------------------------------------------
// ClassBuilder

/// Assembles a [`ClassDescriptor`]. Obtained from [`ClassDescriptor::builder`].
///
/// Members are serialized in the order they are added.
pub struct ClassBuilder<T> {
    name: Cow<'static, str>,
    members: Vec<MemberDescriptor<T>>,
    factory: Option<fn() -> T>,
}

impl<T: 'static> ClassBuilder<T> {
    /// Adds a member stored in a field.
    #[inline]
    pub fn field<M: Serializable>(
        self,
        name: &'static str,
        get: fn(&T) -> &M,
        get_mut: fn(&mut T) -> &mut M,
    ) -> Self {
        self.member(MemberDescriptor::field(name, get, get_mut))
    }

    /// Adds a member read by `get` and written by `set`.
    #[inline]
    pub fn accessor<M: Serializable>(self, name: &'static str, get: fn(&T) -> M, set: fn(&mut T, M)) -> Self {
        self.member(MemberDescriptor::accessor(name, get, set))
    }

    /// Adds a composed base struct, stored under its descriptor's name.
    #[inline]
    pub fn base<B: Serializable>(self, upcast: fn(&T) -> &B, upcast_mut: fn(&mut T) -> &mut B) -> Self {
        self.member(MemberDescriptor::base_default(upcast, upcast_mut))
    }

    /// Adds a composed base struct, stored under `name`.
    #[inline]
    pub fn base_named<B: Serializable>(
        self,
        name: &'static str,
        upcast: fn(&T) -> &B,
        upcast_mut: fn(&mut T) -> &mut B,
    ) -> Self {
        self.member(MemberDescriptor::base(name, upcast, upcast_mut))
    }

    /// Adds a prepared member.
    #[inline]
    pub fn member(mut self, member: MemberDescriptor<T>) -> Self {
        self.members.push(member);
        self
    }

    /// Sets how fresh values are constructed.
    ///
    /// Without a factory, deserializing a `T` that is not read in place
    /// fails with [`DeserializeError::NotConstructible`].
    #[inline]
    pub fn factory(mut self, factory: fn() -> T) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Finishes the descriptor.
    ///
    /// # Panics
    ///
    /// Panics if two members share a name.
    pub fn build(self) -> ClassDescriptor<T> {
        let member_names: Vec<&'static str> = self.members.iter().map(MemberDescriptor::name).collect();

        for (index, name) in member_names.iter().enumerate() {
            assert!(
                !member_names[..index].contains(name),
                "duplicate member `{name}` in descriptor of {}",
                self.name,
            );
        }

        ClassDescriptor {
            name: self.name,
            members: self.members,
            member_names,
            factory: self.factory,
        }
    }
}

impl<T: Default + 'static> ClassBuilder<T> {
    /// Uses [`Default::default`] as the factory.
    #[inline]
    pub fn with_default(self) -> Self {
        self.factory(T::default)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{ClassDescriptor, MemberKind};
    use crate::Serializable;
    use crate::descriptor::TypeDescriptor;
    use crate::registry::NonGenericDescriptorCell;

    #[derive(Default)]
    struct Pair {
        a: i32,
        b: String,
    }

    impl Serializable for Pair {
        fn descriptor() -> &'static dyn TypeDescriptor<Self> {
            static CELL: NonGenericDescriptorCell<ClassDescriptor<Pair>> = NonGenericDescriptorCell::new();
            CELL.get_or_init(|| {
                ClassDescriptor::<Pair>::builder("Pair")
                    .field("a", |p| &p.a, |p| &mut p.a)
                    .field("b", |p| &p.b, |p| &mut p.b)
                    .build()
            })
        }
    }

    #[test]
    fn members_in_order() {
        let descriptor: ClassDescriptor<Pair> = ClassDescriptor::<Pair>::builder("Pair")
            .field("a", |p| &p.a, |p| &mut p.a)
            .field("b", |p| &p.b, |p| &mut p.b)
            .build();

        let names: alloc::vec::Vec<_> = descriptor.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(descriptor.member("b").map(|m| m.kind()), Some(MemberKind::Field));
        assert!(descriptor.member("c").is_none());
    }

    #[test]
    fn no_factory_is_not_constructible() {
        let err = Pair::descriptor().make().err().unwrap();
        assert_eq!(err.to_string(), "type Pair cannot be constructed for deserialization");
    }

    #[test]
    #[should_panic(expected = "duplicate member `a`")]
    fn duplicate_member_names_panic() {
        let _ = ClassDescriptor::<Pair>::builder("Pair")
            .field("a", |p| &p.a, |p| &mut p.a)
            .field("a", |p| &p.b, |p| &mut p.b)
            .build();
    }
}
