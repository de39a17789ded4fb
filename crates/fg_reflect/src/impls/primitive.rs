use alloc::string::{String, ToString};

use crate::de::Deserializer;
use crate::descriptor::{Descriptor, Serializable, Slot, TypeDescriptor};
use crate::error::DeserializeError;
use crate::schema::SchemaVisitor;
use crate::ser::Serializer;

// -----------------------------------------------------------------------------
// Integers

macro_rules! narrow_hook {
    ($ty:ty, $($hook:ident($from:ty)),* $(,)?) => {
        $(
            #[inline]
            fn $hook(&self, value: &mut $ty, v: $from) -> Result<(), DeserializeError> {
                *value = <$ty>::try_from(v).map_err(|_| out_of_range(v, self.name()))?;
                Ok(())
            }
        )*
    };
}

macro_rules! impl_integer {
    ($($descriptor:ident: $ty:ty => $name:literal, $serialize:ident, $deserialize:ident, $visit:ident;)*) => {
        $(
            #[doc = concat!("Descriptor of `", stringify!($ty), "`.")]
            pub struct $descriptor;

            impl Descriptor for $descriptor {
                #[inline]
                fn name(&self) -> &str {
                    $name
                }

                #[inline]
                fn accept(&self, visitor: &mut dyn SchemaVisitor) {
                    visitor.$visit();
                }
            }

            impl TypeDescriptor<$ty> for $descriptor {
                #[inline]
                fn serialize(&self, serializer: &mut dyn Serializer, value: &$ty) {
                    serializer.$serialize(*value);
                }

                #[inline]
                fn deserialize(
                    &self,
                    deserializer: &mut dyn Deserializer,
                    value: &mut $ty,
                ) -> Result<(), DeserializeError> {
                    deserializer.$deserialize(&mut Slot::new(self, value))
                }

                #[inline]
                fn make(&self) -> Result<$ty, DeserializeError> {
                    Ok(0)
                }

                narrow_hook! {
                    $ty,
                    deserialize_i8(i8),
                    deserialize_i16(i16),
                    deserialize_i32(i32),
                    deserialize_i64(i64),
                    deserialize_u8(u8),
                    deserialize_u16(u16),
                    deserialize_u32(u32),
                    deserialize_u64(u64),
                }
            }

            impl Serializable for $ty {
                #[inline]
                fn descriptor() -> &'static dyn TypeDescriptor<Self> {
                    static DESCRIPTOR: $descriptor = $descriptor;
                    &DESCRIPTOR
                }
            }
        )*
    };
}

// Separate to reduce code compilation times
#[inline(never)]
fn out_of_range(value: impl ToString, type_name: &str) -> DeserializeError {
    DeserializeError::OutOfRange {
        value: value.to_string(),
        type_name: type_name.into(),
    }
}

impl_integer! {
    I8Descriptor: i8 => "i8", serialize_i8, deserialize_i8, visit_i8;
    I16Descriptor: i16 => "i16", serialize_i16, deserialize_i16, visit_i16;
    I32Descriptor: i32 => "i32", serialize_i32, deserialize_i32, visit_i32;
    I64Descriptor: i64 => "i64", serialize_i64, deserialize_i64, visit_i64;
    U8Descriptor: u8 => "u8", serialize_u8, deserialize_u8, visit_u8;
    U16Descriptor: u16 => "u16", serialize_u16, deserialize_u16, visit_u16;
    U32Descriptor: u32 => "u32", serialize_u32, deserialize_u32, visit_u32;
    U64Descriptor: u64 => "u64", serialize_u64, deserialize_u64, visit_u64;
}

// -----------------------------------------------------------------------------
// Floats

/// Descriptor of `f32`.
pub struct F32Descriptor;

impl Descriptor for F32Descriptor {
    #[inline]
    fn name(&self) -> &str {
        "f32"
    }

    #[inline]
    fn accept(&self, visitor: &mut dyn SchemaVisitor) {
        visitor.visit_f32();
    }
}

impl TypeDescriptor<f32> for F32Descriptor {
    #[inline]
    fn serialize(&self, serializer: &mut dyn Serializer, value: &f32) {
        serializer.serialize_f32(*value);
    }

    #[inline]
    fn deserialize(&self, deserializer: &mut dyn Deserializer, value: &mut f32) -> Result<(), DeserializeError> {
        deserializer.deserialize_f32(&mut Slot::new(self, value))
    }

    #[inline]
    fn make(&self) -> Result<f32, DeserializeError> {
        Ok(0.0)
    }

    #[inline]
    fn deserialize_f32(&self, value: &mut f32, v: f32) -> Result<(), DeserializeError> {
        *value = v;
        Ok(())
    }

    /// Rounds to the nearest `f32`. Finite values too large for `f32` are rejected.
    fn deserialize_f64(&self, value: &mut f32, v: f64) -> Result<(), DeserializeError> {
        let narrowed = v as f32;
        if v.is_finite() && narrowed.is_infinite() {
            return Err(out_of_range(v, self.name()));
        }
        *value = narrowed;
        Ok(())
    }
}

impl Serializable for f32 {
    #[inline]
    fn descriptor() -> &'static dyn TypeDescriptor<Self> {
        static DESCRIPTOR: F32Descriptor = F32Descriptor;
        &DESCRIPTOR
    }
}

/// Descriptor of `f64`.
pub struct F64Descriptor;

impl Descriptor for F64Descriptor {
    #[inline]
    fn name(&self) -> &str {
        "f64"
    }

    #[inline]
    fn accept(&self, visitor: &mut dyn SchemaVisitor) {
        visitor.visit_f64();
    }
}

impl TypeDescriptor<f64> for F64Descriptor {
    #[inline]
    fn serialize(&self, serializer: &mut dyn Serializer, value: &f64) {
        serializer.serialize_f64(*value);
    }

    #[inline]
    fn deserialize(&self, deserializer: &mut dyn Deserializer, value: &mut f64) -> Result<(), DeserializeError> {
        deserializer.deserialize_f64(&mut Slot::new(self, value))
    }

    #[inline]
    fn make(&self) -> Result<f64, DeserializeError> {
        Ok(0.0)
    }

    #[inline]
    fn deserialize_f64(&self, value: &mut f64, v: f64) -> Result<(), DeserializeError> {
        *value = v;
        Ok(())
    }
}

impl Serializable for f64 {
    #[inline]
    fn descriptor() -> &'static dyn TypeDescriptor<Self> {
        static DESCRIPTOR: F64Descriptor = F64Descriptor;
        &DESCRIPTOR
    }
}

// -----------------------------------------------------------------------------
// bool & String

/// Descriptor of `bool`.
pub struct BoolDescriptor;

impl Descriptor for BoolDescriptor {
    #[inline]
    fn name(&self) -> &str {
        "bool"
    }

    #[inline]
    fn accept(&self, visitor: &mut dyn SchemaVisitor) {
        visitor.visit_bool();
    }
}

impl TypeDescriptor<bool> for BoolDescriptor {
    #[inline]
    fn serialize(&self, serializer: &mut dyn Serializer, value: &bool) {
        serializer.serialize_bool(*value);
    }

    #[inline]
    fn deserialize(&self, deserializer: &mut dyn Deserializer, value: &mut bool) -> Result<(), DeserializeError> {
        deserializer.deserialize_bool(&mut Slot::new(self, value))
    }

    #[inline]
    fn make(&self) -> Result<bool, DeserializeError> {
        Ok(false)
    }

    #[inline]
    fn deserialize_bool(&self, value: &mut bool, v: bool) -> Result<(), DeserializeError> {
        *value = v;
        Ok(())
    }
}

impl Serializable for bool {
    #[inline]
    fn descriptor() -> &'static dyn TypeDescriptor<Self> {
        static DESCRIPTOR: BoolDescriptor = BoolDescriptor;
        &DESCRIPTOR
    }
}

/// Descriptor of `String`.
pub struct StringDescriptor;

impl Descriptor for StringDescriptor {
    #[inline]
    fn name(&self) -> &str {
        "String"
    }

    #[inline]
    fn accept(&self, visitor: &mut dyn SchemaVisitor) {
        visitor.visit_string();
    }
}

impl TypeDescriptor<String> for StringDescriptor {
    #[inline]
    fn serialize(&self, serializer: &mut dyn Serializer, value: &String) {
        serializer.serialize_str(value);
    }

    #[inline]
    fn deserialize(&self, deserializer: &mut dyn Deserializer, value: &mut String) -> Result<(), DeserializeError> {
        deserializer.deserialize_str(&mut Slot::new(self, value))
    }

    #[inline]
    fn make(&self) -> Result<String, DeserializeError> {
        Ok(String::new())
    }

    #[inline]
    fn deserialize_str(&self, value: &mut String, v: &str) -> Result<(), DeserializeError> {
        value.clear();
        value.push_str(v);
        Ok(())
    }
}

impl Serializable for String {
    #[inline]
    fn descriptor() -> &'static dyn TypeDescriptor<Self> {
        static DESCRIPTOR: StringDescriptor = StringDescriptor;
        &DESCRIPTOR
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::DeserializeError;
    use crate::Serializable;

    #[test]
    fn integer_hooks_range_check() {
        let mut value = 0_u8;
        u8::descriptor().deserialize_i64(&mut value, 255).unwrap();
        assert_eq!(value, 255);

        let err = u8::descriptor().deserialize_i64(&mut value, 256).unwrap_err();
        assert!(matches!(err, DeserializeError::OutOfRange { ref value, .. } if value == "256"));
        assert_eq!(value, 255);

        let mut value = 0_i8;
        assert!(i8::descriptor().deserialize_u64(&mut value, 128).is_err());
        i8::descriptor().deserialize_u64(&mut value, 127).unwrap();
        assert_eq!(value, 127);
    }

    #[test]
    fn integers_reject_floats_and_strings() {
        let mut value = 0_i32;
        assert!(i32::descriptor().deserialize_f64(&mut value, 1.0).is_err());
        assert!(i32::descriptor().deserialize_str(&mut value, "1").is_err());
    }

    #[test]
    fn f32_narrowing() {
        let mut value = 0.0_f32;
        f32::descriptor().deserialize_f64(&mut value, 0.5).unwrap();
        assert_eq!(value, 0.5);

        assert!(f32::descriptor().deserialize_f64(&mut value, 1e300).is_err());
        f32::descriptor().deserialize_f64(&mut value, f64::INFINITY).unwrap();
        assert!(value.is_infinite());
    }

    #[test]
    fn f64_accepts_f32() {
        let mut value = 0.0_f64;
        f64::descriptor().deserialize_f32(&mut value, 1.5).unwrap();
        assert_eq!(value, 1.5);
    }
}
