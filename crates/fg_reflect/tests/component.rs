#![cfg(feature = "json")]

use std::any::{Any, TypeId};
use std::collections::HashMap;

use fg_reflect::Serializable;
use fg_reflect::backends::json::{JsonDeserializer, JsonSerializer};
use fg_reflect::component::{ComponentSerializer, ComponentStore};
use fg_reflect::derive::Serializable;
use fg_reflect::schema::{EngineType, SchemaNode, build_schema};
use serde_json::{Value, json};

#[derive(Default)]
struct World {
    components: HashMap<(u32, TypeId), Box<dyn Any>>,
}

impl ComponentStore for World {
    type Entity = u32;

    fn get<C: Serializable>(&self, entity: u32) -> Option<&C> {
        self.components.get(&(entity, TypeId::of::<C>()))?.downcast_ref()
    }

    fn insert<C: Serializable>(&mut self, entity: u32, component: C) {
        self.components.insert((entity, TypeId::of::<C>()), Box::new(component));
    }
}

#[derive(Serializable, Default, Debug, PartialEq)]
struct Transform {
    x: f32,
    y: f32,
}

#[derive(Serializable, Default, Debug, PartialEq)]
struct Health {
    hp: i32,
}

fn components() -> ComponentSerializer<World> {
    let mut components = ComponentSerializer::new();
    components.register::<Transform>().register::<Health>();
    components
}

fn write(components: &ComponentSerializer<World>, world: &World, entity: u32) -> Value {
    let mut serializer = JsonSerializer::new();
    components.serialize_entity(&mut serializer, world, entity);
    serializer.into_value()
}

#[test]
fn entities_are_objects_in_registration_order() {
    let components = components();
    let mut world = World::default();
    world.insert(1, Health { hp: 5 });
    world.insert(1, Transform { x: 1.0, y: 2.0 });
    world.insert(2, Health { hp: 9 });

    let first = write(&components, &world, 1);
    assert_eq!(first.to_string(), r#"{"Transform":{"x":1.0,"y":2.0},"Health":{"hp":5}}"#);
    assert_eq!(write(&components, &world, 2), json!({ "Health": { "hp": 9 } }));
    assert_eq!(write(&components, &world, 3), json!({}));
}

#[test]
fn reading_inserts_known_components() {
    let components = components();
    let mut world = World::default();
    world.insert(4, Health { hp: 1 });

    let json = json!({ "Health": { "hp": 20 }, "Sprite": { "path": "a.png" }, "Transform": { "x": 3, "y": 4 } });
    components
        .deserialize_entity(&mut JsonDeserializer::new(&json), &mut world, 4)
        .unwrap();

    assert_eq!(world.get::<Health>(4), Some(&Health { hp: 20 }));
    assert_eq!(world.get::<Transform>(4), Some(&Transform { x: 3.0, y: 4.0 }));
}

#[test]
fn component_errors_are_located() {
    let components = components();
    let mut world = World::default();

    let json = json!({ "Health": { "hp": "full" } });
    let err = components
        .deserialize_entity(&mut JsonDeserializer::new(&json), &mut world, 0)
        .unwrap_err();
    assert_eq!(err.pointer(), Some("/Health/hp"));
    assert!(world.get::<Health>(0).is_none());

    let json = json!([1, 2]);
    assert!(components
        .deserialize_entity(&mut JsonDeserializer::new(&json), &mut world, 0)
        .is_err());
}

#[test]
fn duplicate_names_keep_the_first_registration() {
    let mut components = components();
    components.register_named::<i32>("Health");
    assert_eq!(components.len(), 2);

    let infos = components.component_infos();
    let names: Vec<&str> = infos.iter().map(|info| info.name.as_str()).collect();
    assert_eq!(names, ["Transform", "Health"]);
    assert!(infos[1].schema.as_struct().is_some());
}

#[test]
fn entity_schema_is_an_engine_type() {
    let components: &'static ComponentSerializer<World> = Box::leak(Box::new(components()));
    assert_eq!(build_schema(components), SchemaNode::EngineType(EngineType::Entity));
}
