//! Persistence of entities as objects of named components.
//!
//! The component storage itself lives in the ECS; this module only needs
//! the small [`ComponentStore`] contract from it. An entity is written as
//!
//! ```text
//! {
//!     "Transform": { .. },
//!     "Health": { .. }
//! }
//! ```
//!
//! with one key per registered component type the entity has, in
//! registration order.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use crate::de::{DeserializeTarget, Deserializer, ObjectDeserializer};
use crate::descriptor::{Descriptor, Serializable};
use crate::error::DeserializeError;
use crate::schema::{EngineType, SchemaNode, SchemaVisitor, build_schema, debug_schema};
use crate::ser::{ObjectSerializer, Serializer};

// -----------------------------------------------------------------------------
// ComponentStore

/// Component storage, as provided by an ECS world.
pub trait ComponentStore {
    type Entity: Copy;

    /// Returns the `C` component of `entity`, if it has one.
    fn get<C: Serializable>(&self, entity: Self::Entity) -> Option<&C>;

    /// Adds `component` to `entity`, replacing an existing `C`.
    fn insert<C: Serializable>(&mut self, entity: Self::Entity, component: C);
}

// -----------------------------------------------------------------------------
// ComponentInfo

/// A registered component as seen by tooling.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentInfo {
    pub name: String,
    pub schema: SchemaNode,
}

// -----------------------------------------------------------------------------
// ComponentSerializer

type SerializeFn<W> = fn(&mut dyn ObjectSerializer, &str, &W, <W as ComponentStore>::Entity);
type DeserializeFn<W> =
    fn(&mut dyn ObjectDeserializer, &mut W, <W as ComponentStore>::Entity) -> Result<(), DeserializeError>;

struct ComponentEntry<W: ComponentStore> {
    name: Cow<'static, str>,
    descriptor: &'static dyn Descriptor,
    serialize: SerializeFn<W>,
    deserialize: DeserializeFn<W>,
}

fn serialize_component<W: ComponentStore, C: Serializable>(
    object: &mut dyn ObjectSerializer,
    name: &str,
    world: &W,
    entity: W::Entity,
) {
    if let Some(component) = world.get::<C>(entity) {
        object.member(name, component);
    }
}

fn deserialize_component<W: ComponentStore, C: Serializable>(
    object: &mut dyn ObjectDeserializer,
    world: &mut W,
    entity: W::Entity,
) -> Result<(), DeserializeError> {
    let component = object.next_value_of::<C>()?;
    world.insert(entity, component);
    Ok(())
}

/// Reads and writes the serializable components of entities in a `W`.
///
/// # Example
///
/// ```
/// use std::any::{Any, TypeId};
/// use std::collections::HashMap;
///
/// use fg_reflect::Serializable;
/// use fg_reflect::backends::json::{JsonDeserializer, JsonSerializer};
/// use fg_reflect::component::{ComponentSerializer, ComponentStore};
///
/// #[derive(Default)]
/// struct World(HashMap<(u32, TypeId), Box<dyn Any>>);
///
/// impl ComponentStore for World {
///     type Entity = u32;
///
///     fn get<C: Serializable>(&self, entity: u32) -> Option<&C> {
///         self.0.get(&(entity, TypeId::of::<C>()))?.downcast_ref()
///     }
///
///     fn insert<C: Serializable>(&mut self, entity: u32, component: C) {
///         self.0.insert((entity, TypeId::of::<C>()), Box::new(component));
///     }
/// }
///
/// let mut components = ComponentSerializer::<World>::new();
/// components.register_named::<u32>("Score").register_named::<String>("Label");
///
/// let mut world = World::default();
/// world.insert(7, 42_u32);
///
/// let mut serializer = JsonSerializer::new();
/// components.serialize_entity(&mut serializer, &world, 7);
/// assert_eq!(serializer.into_value(), serde_json::json!({ "Score": 42 }));
///
/// let json = serde_json::json!({ "Label": "boss", "Unknown": 1 });
/// components.deserialize_entity(&mut JsonDeserializer::new(&json), &mut world, 7).unwrap();
/// assert_eq!(world.get::<String>(7).map(String::as_str), Some("boss"));
/// ```
pub struct ComponentSerializer<W: ComponentStore> {
    entries: Vec<ComponentEntry<W>>,
}

impl<W: ComponentStore> Default for ComponentSerializer<W> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<W: ComponentStore> ComponentSerializer<W> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers `C`, keyed by its descriptor name.
    #[inline]
    pub fn register<C: Serializable>(&mut self) -> &mut Self {
        self.register_named::<C>(C::descriptor().name())
    }

    /// Registers `C` under `name`.
    ///
    /// A name that is already taken is ignored with a warning.
    pub fn register_named<C: Serializable>(&mut self, name: impl Into<Cow<'static, str>>) -> &mut Self {
        let name = name.into();
        if self.contains(&name) {
            log::warn!("component `{name}` is already registered, ignoring {}", C::descriptor().name());
            return self;
        }

        log::debug!("registered component `{name}`:\n{}", debug_schema::<C>());
        self.entries.push(ComponentEntry {
            name,
            descriptor: C::descriptor(),
            serialize: serialize_component::<W, C>,
            deserialize: deserialize_component::<W, C>,
        });
        self
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names and schemas of the registered components, in registration order.
    pub fn component_infos(&self) -> Vec<ComponentInfo> {
        self.entries
            .iter()
            .map(|entry| ComponentInfo {
                name: entry.name.as_ref().into(),
                schema: build_schema(entry.descriptor),
            })
            .collect()
    }

    /// Writes the registered components `entity` has as one object.
    pub fn serialize_entity(&self, serializer: &mut dyn Serializer, world: &W, entity: W::Entity) {
        let mut object = serializer.serialize_object();
        for entry in &self.entries {
            (entry.serialize)(&mut *object, &entry.name, world, entity);
        }
        object.end();
    }

    /// Reads an object of components and inserts each of them into `entity`.
    ///
    /// Keys that name no registered component are skipped with a warning.
    pub fn deserialize_entity(
        &self,
        deserializer: &mut dyn Deserializer,
        world: &mut W,
        entity: W::Entity,
    ) -> Result<(), DeserializeError> {
        let mut target = EntityTarget {
            components: self,
            world,
            entity,
        };
        deserializer.deserialize_object(&mut target)
    }
}

impl<W: ComponentStore> Descriptor for ComponentSerializer<W> {
    #[inline]
    fn name(&self) -> &str {
        EngineType::Entity.as_str()
    }

    #[inline]
    fn accept(&self, visitor: &mut dyn SchemaVisitor) {
        visitor.visit_engine_type(EngineType::Entity);
    }
}

struct EntityTarget<'a, W: ComponentStore> {
    components: &'a ComponentSerializer<W>,
    world: &'a mut W,
    entity: W::Entity,
}

impl<W: ComponentStore> DeserializeTarget for EntityTarget<'_, W> {
    #[inline]
    fn type_name(&self) -> &str {
        EngineType::Entity.as_str()
    }

    #[inline]
    fn deserialize(&mut self, deserializer: &mut dyn Deserializer) -> Result<(), DeserializeError> {
        deserializer.deserialize_object(self)
    }

    fn deserialize_object(&mut self, object: &mut dyn ObjectDeserializer) -> Result<(), DeserializeError> {
        while object.has_next() {
            let key = object.next_key()?;
            match self.components.entries.iter().find(|entry| entry.name == key) {
                Some(entry) => (entry.deserialize)(&mut *object, &mut *self.world, self.entity)?,
                None => {
                    log::warn!("skipping unknown component `{key}`");
                    object.ignore_next_value()?;
                }
            }
        }
        Ok(())
    }
}
