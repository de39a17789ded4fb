use fg_reflect::DeserializeError;
use fg_reflect::Serializable;
use fg_reflect::class::MemberKind;
use fg_reflect::de::deserialize_value;
use fg_reflect::derive::Serializable;
use fg_reflect::descriptor::{Descriptor, TypeDescriptor, type_name};
use fg_reflect::schema::{PrimitiveType, SchemaNode, schema_of};
use fg_reflect::ser::{ArraySerializer, ObjectSerializer, SerializeSource, Serializer, serialize_value};

// -----------------------------------------------------------------------------
// Capture

/// Records every call as a line, to check what descriptors emit.
///
/// Member names of the outermost object are also kept in `keys`.
#[derive(Default)]
struct Capture {
    lines: Vec<String>,
    keys: Vec<String>,
}

impl Capture {
    fn of<T: Serializable>(value: &T) -> Vec<String> {
        let mut capture = Self::default();
        serialize_value(&mut capture, value);
        capture.lines
    }

    fn keys_of<T: Serializable>(value: &T) -> Vec<String> {
        let mut capture = Self::default();
        serialize_value(&mut capture, value);
        capture.keys
    }

    fn nested(value: &dyn SerializeSource) -> Vec<String> {
        let mut capture = Self::default();
        value.serialize(&mut capture);
        capture.lines
    }
}

impl Serializer for Capture {
    fn serialize_bool(&mut self, v: bool) {
        self.lines.push(format!("bool {v}"));
    }

    fn serialize_i32(&mut self, v: i32) {
        self.lines.push(format!("i32 {v}"));
    }

    fn serialize_i64(&mut self, v: i64) {
        self.lines.push(format!("i64 {v}"));
    }

    fn serialize_u64(&mut self, v: u64) {
        self.lines.push(format!("u64 {v}"));
    }

    fn serialize_f32(&mut self, v: f32) {
        self.lines.push(format!("f32 {v}"));
    }

    fn serialize_f64(&mut self, v: f64) {
        self.lines.push(format!("f64 {v}"));
    }

    fn serialize_str(&mut self, v: &str) {
        self.lines.push(format!("str {v}"));
    }

    fn serialize_object(&mut self) -> Box<dyn ObjectSerializer + '_> {
        self.lines.push("{".into());
        Box::new(CaptureObject(self))
    }

    fn serialize_array(&mut self) -> Box<dyn ArraySerializer + '_> {
        self.lines.push("[".into());
        Box::new(CaptureArray(self))
    }
}

struct CaptureObject<'a>(&'a mut Capture);

impl ObjectSerializer for CaptureObject<'_> {
    fn serialize_member(&mut self, name: &str, value: &dyn SerializeSource) {
        self.0.lines.push(format!("{name}:"));
        self.0.keys.push(name.into());
        self.0.lines.extend(Capture::nested(value));
    }

    fn end(self: Box<Self>) {
        self.0.lines.push("}".into());
    }
}

struct CaptureArray<'a>(&'a mut Capture);

impl ArraySerializer for CaptureArray<'_> {
    fn serialize_element(&mut self, value: &dyn SerializeSource) {
        self.0.lines.extend(Capture::nested(value));
    }

    fn end(self: Box<Self>) {
        self.0.lines.push("]".into());
    }
}

// -----------------------------------------------------------------------------
// Types

#[derive(Serializable, Default, Debug, PartialEq)]
#[serializable(auto_register)]
struct Actor {
    id: u32,
}

#[derive(Serializable, Default, Debug, PartialEq)]
#[serializable(name = "game.Enemy", auto_register)]
#[serializable(accessor(name = "alive", get = Enemy::is_alive, set = Enemy::set_alive))]
struct Enemy {
    #[serializable(base)]
    actor: Actor,
    #[serializable(rename = "hp")]
    health: i32,
    #[serializable(skip)]
    cached: Vec<u8>,
}

impl Enemy {
    fn is_alive(&self) -> bool {
        self.health > 0
    }

    fn set_alive(&mut self, alive: bool) {
        if !alive {
            self.health = 0;
        }
    }
}

#[derive(Serializable, Debug, PartialEq)]
#[serializable(make = Spawner::idle)]
#[serializable(auto_register)]
struct Spawner {
    #[serializable(base = "origin")]
    actor: Actor,
    rate: f32,
}

impl Spawner {
    fn idle() -> Self {
        Self {
            actor: Actor { id: 99 },
            rate: 0.0,
        }
    }
}

#[derive(Serializable, Debug, PartialEq)]
#[serializable(no_default, auto_register)]
struct Handle {
    index: u32,
}

#[derive(Serializable, Default, Debug, PartialEq)]
struct Tagged<T> {
    tag: String,
    value: T,
}

#[derive(Serializable, Default)]
#[serializable(auto_register)]
struct Marker {}

fg_reflect::derive::impl_auto_register!(Tagged<f32>);

// -----------------------------------------------------------------------------
// Samples

/// A value next to its schema and the member names it serializes.
struct Sample {
    name: &'static str,
    schema: SchemaNode,
    keys: Vec<String>,
}

fn sample<T: Serializable>(value: T) -> Sample {
    Sample {
        name: T::descriptor().name(),
        schema: schema_of::<T>(),
        keys: Capture::keys_of(&value),
    }
}

fn samples() -> Vec<Sample> {
    vec![
        sample(Actor { id: 1 }),
        sample(Enemy {
            actor: Actor { id: 2 },
            health: 5,
            cached: vec![1],
        }),
        sample(Spawner::idle()),
        sample(Handle { index: 1 }),
        sample(Tagged {
            tag: "speed".into(),
            value: 0.5_f32,
        }),
        sample(Tagged {
            tag: "bytes".into(),
            value: vec![1_u8, 2],
        }),
        sample(Marker {}),
    ]
}

// -----------------------------------------------------------------------------
// Tests

#[test]
fn members_in_declaration_order() {
    let enemy = Enemy {
        actor: Actor { id: 7 },
        health: 12,
        cached: vec![1, 2, 3],
    };

    assert_eq!(
        Capture::of(&enemy),
        ["{", "Actor:", "{", "id:", "u64 7", "}", "hp:", "i32 12", "alive:", "bool true", "}"],
    );
}

#[test]
fn member_kinds_and_names() {
    let descriptor = <Enemy as Serializable>::descriptor();
    assert_eq!(descriptor.name(), "game.Enemy");

    let schema = schema_of::<Enemy>();
    let schema = schema.as_struct().unwrap();
    assert_eq!(schema.member_names().collect::<Vec<_>>(), ["Actor", "hp", "alive"]);
    assert_eq!(schema.member("alive"), Some(&SchemaNode::Primitive(PrimitiveType::Bool)));

    let spawner = schema_of::<Spawner>();
    let names: Vec<_> = spawner.as_struct().unwrap().member_names().collect();
    assert_eq!(names, ["origin", "rate"]);
}

#[test]
fn member_descriptors_report_kinds() {
    use fg_reflect::backends::debug::to_debug_string;
    use fg_reflect::class::ClassDescriptor;

    let class = ClassDescriptor::<Actor>::builder("Shadow")
        .field("id", |a| &a.id, |a| &mut a.id)
        .accessor("double", |a: &Actor| a.id * 2, |a, v: u32| a.id = v / 2)
        .with_default()
        .build();

    let kinds: Vec<MemberKind> = class.members().iter().map(|m| m.kind()).collect();
    assert_eq!(kinds, [MemberKind::Field, MemberKind::Accessor]);

    let mut debug = fg_reflect::backends::debug::DebugSerializer::new();
    class.serialize(&mut debug, &Actor { id: 4 });
    assert_eq!(debug.into_string(), "{\n\t\"id\": 4,\n\t\"double\": 8\n}");
    assert_eq!(to_debug_string(&Actor { id: 1 }), "{\n\t\"id\": 1\n}");
}

#[cfg(feature = "json")]
#[test]
fn skipped_and_accessor_members_read_back() {
    use fg_reflect::backends::json::{from_json_value, to_json_value};
    use serde_json::json;

    let enemy = Enemy {
        actor: Actor { id: 3 },
        health: 0,
        cached: vec![5],
    };
    let json = to_json_value(&enemy);
    assert_eq!(json, json!({ "Actor": { "id": 3 }, "hp": 0, "alive": false }));

    let back: Enemy = from_json_value(&json).unwrap();
    assert_eq!(back.cached, Vec::<u8>::new());
    assert_eq!(back.actor, Actor { id: 3 });

    let revived: Enemy = from_json_value(&json!({ "Actor": { "id": 3 }, "hp": 8, "alive": true })).unwrap();
    assert_eq!(revived.health, 8);
}

#[cfg(feature = "json")]
#[test]
fn factories() {
    use fg_reflect::backends::json::{JsonDeserializer, deserialize_json_into, from_json_value};
    use serde_json::json;

    let spawner: Spawner = from_json_value(&json!({ "origin": { "id": 1 }, "rate": 2.5 })).unwrap();
    assert_eq!(spawner.actor.id, 1);
    assert_eq!(<Spawner as Serializable>::descriptor().make().unwrap(), Spawner::idle());

    let json = json!({ "index": 4 });
    let err = deserialize_value::<Handle>(&mut JsonDeserializer::new(&json)).unwrap_err();
    assert_eq!(
        err,
        DeserializeError::NotConstructible {
            type_name: "Handle".into(),
        }
    );

    let mut handle = Handle { index: 0 };
    deserialize_json_into(&json, &mut handle).unwrap();
    assert_eq!(handle, Handle { index: 4 });
}

#[test]
fn generic_instantiations_have_their_own_descriptor() {
    assert_eq!(type_name::<Tagged<f32>>(), "Tagged<f32>");
    assert_eq!(type_name::<Tagged<Vec<u8>>>(), "Tagged<Vec<u8>>");
    assert_eq!(type_name::<Tagged<Tagged<bool>>>(), "Tagged<Tagged<bool>>");

    let schema = schema_of::<Tagged<u16>>();
    assert_eq!(
        schema.as_struct().unwrap().member("value"),
        Some(&SchemaNode::Primitive(PrimitiveType::Uint16)),
    );
}

#[test]
fn empty_struct_is_an_empty_object() {
    assert_eq!(Capture::of(&Marker {}), ["{", "}"]);
}

#[test]
fn schema_members_match_serialized_keys() {
    for sample in samples() {
        let Some(schema) = sample.schema.as_struct() else {
            panic!("`{}` should be described as a struct", sample.name);
        };
        assert_eq!(schema.member_names().collect::<Vec<_>>(), sample.keys, "{}", sample.name);
    }
}

#[cfg(feature = "auto_register")]
#[test]
fn every_registered_struct_has_a_checked_sample() {
    use fg_reflect::registry::TypeRegistry;
    use fg_reflect::schema::build_schema;

    let mut registry = TypeRegistry::empty();
    assert!(registry.auto_register());

    let samples = samples();
    let mut checked = Vec::new();
    for descriptor in registry.iter() {
        let schema = build_schema(descriptor);
        let Some(members) = schema.as_struct() else {
            continue;
        };
        let name = descriptor.name();
        let Some(sample) = samples.iter().find(|sample| sample.name == name) else {
            panic!("no sample for registered struct `{name}`");
        };

        assert_eq!(schema, sample.schema, "{name}");
        assert_eq!(members.member_names().collect::<Vec<_>>(), sample.keys, "{name}");
        checked.push(name);
    }

    checked.sort_unstable();
    assert_eq!(checked, ["Actor", "Handle", "Marker", "Spawner", "Tagged<f32>", "game.Enemy"]);
}
