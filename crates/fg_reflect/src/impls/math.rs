//! Fixed-arity descriptors for `glam` math types.
//!
//! Vectors and quaternions are arrays of `f32` components; matrices are
//! arrays of column vectors. Reading an array of any other length fails with
//! [`DeserializeError::ArityMismatch`], whether the length is known up front
//! or only discovered while reading.

use glam::{Mat2, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

use crate::de::{ArrayDeserializer, Deserializer};
use crate::descriptor::{Descriptor, Serializable, Slot, TypeDescriptor};
use crate::error::DeserializeError;
use crate::schema::SchemaVisitor;
use crate::ser::Serializer;

/// Reads exactly `out.len()` elements.
fn read_fixed<E: Serializable>(
    array: &mut dyn ArrayDeserializer,
    out: &mut [E],
    type_name: &str,
) -> Result<(), DeserializeError> {
    let expected = out.len();
    let mismatch = |actual| DeserializeError::ArityMismatch {
        type_name: type_name.into(),
        expected,
        actual,
    };

    if let Some(len) = array.size_hint()
        && len != expected
    {
        return Err(mismatch(Some(len)));
    }

    for (index, slot) in out.iter_mut().enumerate() {
        if !array.has_next() {
            return Err(mismatch(Some(index)));
        }
        array.next_into(slot)?;
    }

    if array.has_next() {
        return Err(mismatch(None));
    }
    Ok(())
}

macro_rules! impl_fixed {
    (
        $descriptor:ident: $ty:ty => $name:literal,
        component: $component:ty,
        len: $len:literal,
        accept: |$visitor:ident| $accept:expr,
        to: |$value:ident| $to:expr,
        from: |$parts:ident| $from:expr $(,)?
    ) => {
        #[doc = concat!("Descriptor of `glam::", $name, "`.")]
        pub struct $descriptor;

        impl Descriptor for $descriptor {
            #[inline]
            fn name(&self) -> &str {
                $name
            }

            #[inline]
            fn accept(&self, $visitor: &mut dyn SchemaVisitor) {
                $accept;
            }
        }

        impl TypeDescriptor<$ty> for $descriptor {
            fn serialize(&self, serializer: &mut dyn Serializer, $value: &$ty) {
                let parts: [$component; $len] = $to;
                let mut array = serializer.serialize_array();
                for part in &parts {
                    array.element(part);
                }
                array.end();
            }

            #[inline]
            fn deserialize(
                &self,
                deserializer: &mut dyn Deserializer,
                value: &mut $ty,
            ) -> Result<(), DeserializeError> {
                deserializer.deserialize_array(&mut Slot::new(self, value))
            }

            #[inline]
            fn make(&self) -> Result<$ty, DeserializeError> {
                Ok(<$ty>::default())
            }

            fn deserialize_array(
                &self,
                value: &mut $ty,
                array: &mut dyn ArrayDeserializer,
            ) -> Result<(), DeserializeError> {
                let mut $parts = [<$component>::default(); $len];
                read_fixed(array, &mut $parts, self.name())?;
                *value = $from;
                Ok(())
            }
        }

        impl Serializable for $ty {
            #[inline]
            fn descriptor() -> &'static dyn TypeDescriptor<Self> {
                static DESCRIPTOR: $descriptor = $descriptor;
                &DESCRIPTOR
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Vectors

impl_fixed! {
    Vec2Descriptor: Vec2 => "Vec2",
    component: f32,
    len: 2,
    accept: |visitor| visitor.visit_vector(f32::descriptor(), 2),
    to: |value| value.to_array(),
    from: |parts| Vec2::from_array(parts),
}

impl_fixed! {
    Vec3Descriptor: Vec3 => "Vec3",
    component: f32,
    len: 3,
    accept: |visitor| visitor.visit_vector(f32::descriptor(), 3),
    to: |value| value.to_array(),
    from: |parts| Vec3::from_array(parts),
}

impl_fixed! {
    Vec4Descriptor: Vec4 => "Vec4",
    component: f32,
    len: 4,
    accept: |visitor| visitor.visit_vector(f32::descriptor(), 4),
    to: |value| value.to_array(),
    from: |parts| Vec4::from_array(parts),
}

// -----------------------------------------------------------------------------
// Matrices

impl_fixed! {
    Mat2Descriptor: Mat2 => "Mat2",
    component: Vec2,
    len: 2,
    accept: |visitor| visitor.visit_matrix(f32::descriptor(), 2, 2),
    to: |value| [value.col(0), value.col(1)],
    from: |parts| Mat2::from_cols(parts[0], parts[1]),
}

impl_fixed! {
    Mat3Descriptor: Mat3 => "Mat3",
    component: Vec3,
    len: 3,
    accept: |visitor| visitor.visit_matrix(f32::descriptor(), 3, 3),
    to: |value| [value.col(0), value.col(1), value.col(2)],
    from: |parts| Mat3::from_cols(parts[0], parts[1], parts[2]),
}

impl_fixed! {
    Mat4Descriptor: Mat4 => "Mat4",
    component: Vec4,
    len: 4,
    accept: |visitor| visitor.visit_matrix(f32::descriptor(), 4, 4),
    to: |value| [value.col(0), value.col(1), value.col(2), value.col(3)],
    from: |parts| Mat4::from_cols(parts[0], parts[1], parts[2], parts[3]),
}

// -----------------------------------------------------------------------------
// Quaternion

impl_fixed! {
    QuatDescriptor: Quat => "Quat",
    component: f32,
    len: 4,
    accept: |visitor| visitor.visit_quaternion(),
    to: |value| value.to_array(),
    from: |parts| Quat::from_array(parts),
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use glam::{Mat2, Vec2, Vec3};

    use crate::schema::{PrimitiveType, SchemaNode, debug_schema, schema_of};

    #[test]
    fn schemas() {
        assert_eq!(schema_of::<Vec3>(), SchemaNode::Primitive(PrimitiveType::Vec3));
        assert_eq!(schema_of::<Mat2>(), SchemaNode::Primitive(PrimitiveType::Mat2));
        assert_eq!(schema_of::<glam::Quat>(), SchemaNode::Primitive(PrimitiveType::Quaternion));
        assert_eq!(debug_schema::<Vec2>(), "vec2<float>");
        assert_eq!(debug_schema::<glam::Mat4>(), "mat4x4<float>");
    }
}
