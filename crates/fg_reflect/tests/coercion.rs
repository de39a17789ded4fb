#![cfg(feature = "json")]

use fg_reflect::backends::json::from_json_value;
use fg_reflect::de::Deserializer;
use fg_reflect::derive::Serializable;
use fg_reflect::descriptor::{Descriptor, Serializable, Slot, TypeDescriptor};
use fg_reflect::schema::SchemaVisitor;
use fg_reflect::ser::Serializer;
use fg_reflect::DeserializeError;
use serde_json::json;

/// Stored as `i64`, read from whatever integer the wire holds.
#[derive(Debug, Default, PartialEq)]
struct Ticks(i64);

struct TicksDescriptor;

impl Descriptor for TicksDescriptor {
    fn name(&self) -> &str {
        "Ticks"
    }

    fn accept(&self, visitor: &mut dyn SchemaVisitor) {
        visitor.visit_i64();
    }
}

impl TypeDescriptor<Ticks> for TicksDescriptor {
    fn serialize(&self, serializer: &mut dyn Serializer, value: &Ticks) {
        serializer.serialize_i64(value.0);
    }

    fn deserialize(&self, deserializer: &mut dyn Deserializer, value: &mut Ticks) -> Result<(), DeserializeError> {
        deserializer.deserialize_infer(&mut Slot::new(self, value))
    }

    fn make(&self) -> Result<Ticks, DeserializeError> {
        Ok(Ticks::default())
    }

    fn deserialize_i64(&self, value: &mut Ticks, v: i64) -> Result<(), DeserializeError> {
        value.0 = v;
        Ok(())
    }
}

impl Serializable for Ticks {
    fn descriptor() -> &'static dyn TypeDescriptor<Self> {
        static DESCRIPTOR: TicksDescriptor = TicksDescriptor;
        &DESCRIPTOR
    }
}

/// Stored as `u64`, read only through the unsigned hooks.
#[derive(Debug, Default, PartialEq)]
struct EntityId(u64);

struct EntityIdDescriptor;

impl Descriptor for EntityIdDescriptor {
    fn name(&self) -> &str {
        "EntityId"
    }

    fn accept(&self, visitor: &mut dyn SchemaVisitor) {
        visitor.visit_u64();
    }
}

impl TypeDescriptor<EntityId> for EntityIdDescriptor {
    fn serialize(&self, serializer: &mut dyn Serializer, value: &EntityId) {
        serializer.serialize_u64(value.0);
    }

    fn deserialize(&self, deserializer: &mut dyn Deserializer, value: &mut EntityId) -> Result<(), DeserializeError> {
        deserializer.deserialize_infer(&mut Slot::new(self, value))
    }

    fn make(&self) -> Result<EntityId, DeserializeError> {
        Ok(EntityId::default())
    }

    fn deserialize_u64(&self, value: &mut EntityId, v: u64) -> Result<(), DeserializeError> {
        value.0 = v;
        Ok(())
    }
}

impl Serializable for EntityId {
    fn descriptor() -> &'static dyn TypeDescriptor<Self> {
        static DESCRIPTOR: EntityIdDescriptor = EntityIdDescriptor;
        &DESCRIPTOR
    }
}

#[derive(Serializable, Default, Debug, PartialEq)]
struct Timer {
    elapsed: Ticks,
    limit: Ticks,
}

#[test]
fn narrow_signed_values_widen() {
    for (json, expected) in [
        (json!(-3), -3),
        (json!(300), 300),
        (json!(-70_000), -70_000),
        (json!(i64::MIN), i64::MIN),
    ] {
        assert_eq!(from_json_value::<Ticks>(&json).unwrap(), Ticks(expected));
    }
}

#[test]
fn non_negative_values_reach_unsigned_hooks() {
    for (json, expected) in [
        (json!(0), 0),
        (json!(5), 5),
        (json!(300), 300),
        (json!(70_000), 70_000),
        (json!(i64::MAX), i64::MAX as u64),
        (json!(u64::MAX), u64::MAX),
    ] {
        assert_eq!(from_json_value::<EntityId>(&json).unwrap(), EntityId(expected));
    }

    // Negative values have no unsigned reading, so the signed error stands.
    let err = from_json_value::<EntityId>(&json!(-1)).unwrap_err();
    assert_eq!(
        err,
        DeserializeError::Unsupported {
            kind: "int64",
            type_name: "EntityId".into(),
        }
    );
    assert!(from_json_value::<EntityId>(&json!(true)).is_err());
}

#[test]
fn unsupported_shapes_name_the_type() {
    let err = from_json_value::<Ticks>(&json!(u64::MAX)).unwrap_err();
    assert_eq!(
        err,
        DeserializeError::Unsupported {
            kind: "uint64",
            type_name: "Ticks".into(),
        }
    );

    let err = from_json_value::<Ticks>(&json!(1.5)).unwrap_err();
    assert_eq!(err.to_string(), "attempted to deserialize double to type Ticks that doesn't support it");

    let err = from_json_value::<Ticks>(&json!("12")).unwrap_err();
    assert!(matches!(err, DeserializeError::Unsupported { kind: "string", .. }));
}

#[test]
fn custom_descriptors_compose_with_derived_ones() {
    let timer: Timer = from_json_value(&json!({ "elapsed": 5, "limit": 40_000_000_000_i64 })).unwrap();
    assert_eq!(
        timer,
        Timer {
            elapsed: Ticks(5),
            limit: Ticks(40_000_000_000),
        }
    );

    let err = from_json_value::<Timer>(&json!({ "elapsed": true, "limit": 1 })).unwrap_err();
    assert_eq!(err.pointer(), Some("/elapsed"));
    assert!(matches!(err.root(), DeserializeError::Unsupported { kind: "bool", .. }));
}

#[test]
fn integer_targets_accept_every_width_in_range() {
    assert_eq!(from_json_value::<u8>(&json!(255)).unwrap(), 255);
    assert_eq!(from_json_value::<i8>(&json!(-128)).unwrap(), -128);
    assert_eq!(from_json_value::<u64>(&json!(u64::MAX)).unwrap(), u64::MAX);
    assert_eq!(from_json_value::<i16>(&json!(4_u8)).unwrap(), 4);

    assert!(from_json_value::<i8>(&json!(128)).is_err());
    assert!(from_json_value::<u32>(&json!(-1)).is_err());
    assert!(from_json_value::<u16>(&json!(2.0)).is_err());
}

#[test]
fn f32_targets_reject_overflow() {
    assert_eq!(from_json_value::<f32>(&json!(0.5)).unwrap(), 0.5);
    assert!(from_json_value::<f32>(&json!(1.0e300)).is_err());
    assert_eq!(from_json_value::<f64>(&json!(1.0e300)).unwrap(), 1.0e300);
}
