use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::BuildHasher;
use core::marker::PhantomData;
use std::collections::HashMap;

use crate::de::{ArrayDeserializer, Deserializer, ObjectDeserializer, StructDeserializer};
use crate::descriptor::{Descriptor, Serializable, Slot, TypeDescriptor, type_name};
use crate::error::DeserializeError;
use crate::registry::GenericDescriptorCell;
use crate::schema::SchemaVisitor;
use crate::ser::Serializer;

// -----------------------------------------------------------------------------
// Vec

/// Descriptor of `Vec<T>`: a homogeneous array.
pub struct VecDescriptor<T> {
    name: String,
    marker: PhantomData<fn() -> T>,
}

impl<T: Serializable> Descriptor for VecDescriptor<T> {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn accept(&self, visitor: &mut dyn SchemaVisitor) {
        visitor.visit_array(T::descriptor());
    }
}

impl<T: Serializable> TypeDescriptor<Vec<T>> for VecDescriptor<T> {
    fn serialize(&self, serializer: &mut dyn Serializer, value: &Vec<T>) {
        let mut array = serializer.serialize_array();
        for element in value {
            array.element(element);
        }
        array.end();
    }

    #[inline]
    fn deserialize(
        &self,
        deserializer: &mut dyn Deserializer,
        value: &mut Vec<T>,
    ) -> Result<(), DeserializeError> {
        deserializer.deserialize_array(&mut Slot::new(self, value))
    }

    #[inline]
    fn make(&self) -> Result<Vec<T>, DeserializeError> {
        Ok(Vec::new())
    }

    fn deserialize_array(
        &self,
        value: &mut Vec<T>,
        array: &mut dyn ArrayDeserializer,
    ) -> Result<(), DeserializeError> {
        value.clear();
        if let Some(len) = array.size_hint() {
            value.reserve(len);
        }
        while array.has_next() {
            value.push(array.next::<T>()?);
        }
        Ok(())
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    fn descriptor() -> &'static dyn TypeDescriptor<Self> {
        static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
        CELL.get_or_insert(|| VecDescriptor::<T> {
            name: format!("Vec<{}>", type_name::<T>()),
            marker: PhantomData,
        })
    }
}

// -----------------------------------------------------------------------------
// Maps

/// Descriptor of a string-keyed map `M` with values of type `T`.
///
/// Used for both `HashMap<String, T, S>` and `BTreeMap<String, T>`.
pub struct MapDescriptor<M, T> {
    name: String,
    marker: PhantomData<fn() -> (M, T)>,
}

/// The map operations a [`MapDescriptor`] needs.
pub trait StringMap<T>: Sized + 'static {
    fn new_map() -> Self;
    fn clear_map(&mut self);
    fn insert_entry(&mut self, key: String, value: T);
    fn for_each_entry(&self, f: impl FnMut(&str, &T));
}

impl<T: 'static, S: BuildHasher + Default + 'static> StringMap<T> for HashMap<String, T, S> {
    #[inline]
    fn new_map() -> Self {
        HashMap::with_hasher(S::default())
    }

    #[inline]
    fn clear_map(&mut self) {
        self.clear();
    }

    #[inline]
    fn insert_entry(&mut self, key: String, value: T) {
        self.insert(key, value);
    }

    fn for_each_entry(&self, mut f: impl FnMut(&str, &T)) {
        for (key, value) in self {
            f(key, value);
        }
    }
}

impl<T: 'static> StringMap<T> for BTreeMap<String, T> {
    #[inline]
    fn new_map() -> Self {
        BTreeMap::new()
    }

    #[inline]
    fn clear_map(&mut self) {
        self.clear();
    }

    #[inline]
    fn insert_entry(&mut self, key: String, value: T) {
        self.insert(key, value);
    }

    fn for_each_entry(&self, mut f: impl FnMut(&str, &T)) {
        for (key, value) in self {
            f(key, value);
        }
    }
}

impl<M: StringMap<T>, T: Serializable> Descriptor for MapDescriptor<M, T> {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn accept(&self, visitor: &mut dyn SchemaVisitor) {
        visitor.visit_map(T::descriptor());
    }
}

impl<M: StringMap<T>, T: Serializable> TypeDescriptor<M> for MapDescriptor<M, T> {
    fn serialize(&self, serializer: &mut dyn Serializer, value: &M) {
        let mut object = serializer.serialize_object();
        value.for_each_entry(|key, value| object.member(key, value));
        object.end();
    }

    #[inline]
    fn deserialize(&self, deserializer: &mut dyn Deserializer, value: &mut M) -> Result<(), DeserializeError> {
        deserializer.deserialize_object(&mut Slot::new(self, value))
    }

    #[inline]
    fn make(&self) -> Result<M, DeserializeError> {
        Ok(M::new_map())
    }

    fn deserialize_object(
        &self,
        value: &mut M,
        object: &mut dyn ObjectDeserializer,
    ) -> Result<(), DeserializeError> {
        value.clear_map();
        while object.has_next() {
            let key = object.next_key()?;
            let element = object.next_value_of::<T>()?;
            value.insert_entry(key, element);
        }
        Ok(())
    }
}

impl<T, S> Serializable for HashMap<String, T, S>
where
    T: Serializable,
    S: BuildHasher + Default + 'static,
{
    fn descriptor() -> &'static dyn TypeDescriptor<Self> {
        static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
        CELL.get_or_insert(|| MapDescriptor::<Self, T> {
            name: format!("HashMap<String, {}>", type_name::<T>()),
            marker: PhantomData,
        })
    }
}

impl<T: Serializable> Serializable for BTreeMap<String, T> {
    fn descriptor() -> &'static dyn TypeDescriptor<Self> {
        static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
        CELL.get_or_insert(|| MapDescriptor::<Self, T> {
            name: format!("BTreeMap<String, {}>", type_name::<T>()),
            marker: PhantomData,
        })
    }
}

// -----------------------------------------------------------------------------
// Box

/// Descriptor of `Box<T>`: invisible on the wire and in schemas.
///
/// It keeps a name of its own (`Box<T>`) so that registries and dependency
/// lists can tell it apart from the descriptor of `T`.
pub struct BoxDescriptor<T> {
    name: String,
    marker: PhantomData<fn() -> T>,
}

macro_rules! forward_hooks {
    ($($hook:ident($ty:ty)),* $(,)?) => {
        $(
            #[inline]
            fn $hook(&self, value: &mut Box<T>, v: $ty) -> Result<(), DeserializeError> {
                T::descriptor().$hook(value, v)
            }
        )*
    };
}

impl<T: Serializable> Descriptor for BoxDescriptor<T> {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn accept(&self, visitor: &mut dyn SchemaVisitor) {
        visitor.visit_transparent(T::descriptor());
    }
}

impl<T: Serializable> TypeDescriptor<Box<T>> for BoxDescriptor<T> {
    #[inline]
    fn serialize(&self, serializer: &mut dyn Serializer, value: &Box<T>) {
        T::descriptor().serialize(serializer, value);
    }

    #[inline]
    fn deserialize(&self, deserializer: &mut dyn Deserializer, value: &mut Box<T>) -> Result<(), DeserializeError> {
        T::descriptor().deserialize(deserializer, value)
    }

    #[inline]
    fn make(&self) -> Result<Box<T>, DeserializeError> {
        T::descriptor().make().map(Box::new)
    }

    forward_hooks! {
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
    fn deserialize_array(&self, value: &mut Box<T>, array: &mut dyn ArrayDeserializer) -> Result<(), DeserializeError> {
        T::descriptor().deserialize_array(value, array)
    }

    #[inline]
    fn deserialize_object(
        &self,
        value: &mut Box<T>,
        object: &mut dyn ObjectDeserializer,
    ) -> Result<(), DeserializeError> {
        T::descriptor().deserialize_object(value, object)
    }

    #[inline]
    fn deserialize_struct(
        &self,
        value: &mut Box<T>,
        fields: &mut dyn StructDeserializer,
    ) -> Result<(), DeserializeError> {
        T::descriptor().deserialize_struct(value, fields)
    }
}

impl<T: Serializable> Serializable for Box<T> {
    fn descriptor() -> &'static dyn TypeDescriptor<Self> {
        static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
        CELL.get_or_insert(|| BoxDescriptor::<T> {
            name: format!("Box<{}>", type_name::<T>()),
            marker: PhantomData,
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;
    use std::collections::HashMap;

    use crate::descriptor::{same_descriptor, type_name};
    use crate::schema::debug_schema;
    use crate::Serializable;

    #[test]
    fn names() {
        assert_eq!(type_name::<Vec<u8>>(), "Vec<u8>");
        assert_eq!(type_name::<Vec<Vec<String>>>(), "Vec<Vec<String>>");
        assert_eq!(type_name::<HashMap<String, f32>>(), "HashMap<String, f32>");
        assert_eq!(type_name::<BTreeMap<String, bool>>(), "BTreeMap<String, bool>");
        assert_eq!(type_name::<Box<i16>>(), "Box<i16>");
    }

    #[test]
    fn one_descriptor_per_instantiation() {
        assert!(same_descriptor(Vec::<u8>::descriptor(), Vec::<u8>::descriptor()));
        assert!(!same_descriptor(Vec::<u8>::descriptor(), Vec::<i8>::descriptor()));
    }

    #[test]
    fn box_is_transparent_in_schema() {
        assert_eq!(debug_schema::<Box<Vec<u32>>>(), "[uint32]");
    }

    #[test]
    fn box_forwards_hooks() {
        let mut value = Box::new(0_i64);
        Box::<i64>::descriptor().deserialize_i8(&mut value, -4).unwrap();
        assert_eq!(*value, -4);
    }
}
