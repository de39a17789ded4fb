use alloc::vec::Vec;

use serde_json::{Value, json};

use super::{EngineType, SchemaNode};

impl SchemaNode {
    /// Renders the node as the JSON document editors consume.
    ///
    /// ```text
    /// {"type": "primitive", "primitive_type": "int32"}
    /// {"type": "array", "element_type": {..}}
    /// {"type": "map", "value_type": {..}}
    /// {"type": "asset", "asset_type": "Texture"}
    /// {"type": "struct", "name": "Player", "members": [{"name": "hp", "type": {..}}]}
    /// {"type": "engine", "engine_type": "entity"}
    /// {"type": "recursive", "name": "Node"}
    /// ```
    ///
    /// # Example
    ///
    /// ```
    /// use fg_reflect::schema::schema_of;
    ///
    /// let doc = schema_of::<Vec<bool>>().to_json();
    /// assert_eq!(doc["type"], "array");
    /// assert_eq!(doc["element_type"]["primitive_type"], "bool");
    /// ```
    pub fn to_json(&self) -> Value {
        match self {
            Self::Primitive(ty) => json!({ "type": "primitive", "primitive_type": ty.as_str() }),
            Self::Array(element) => json!({ "type": "array", "element_type": element.to_json() }),
            Self::Map(value) => json!({ "type": "map", "value_type": value.to_json() }),
            Self::Asset(asset_type) => json!({ "type": "asset", "asset_type": asset_type }),
            Self::Struct(schema) => {
                let members: Vec<Value> = schema
                    .members
                    .iter()
                    .map(|member| json!({ "name": member.name, "type": member.node.to_json() }))
                    .collect();
                json!({ "type": "struct", "name": schema.name, "members": members })
            }
            Self::EngineType(ty) => json!({ "type": "engine", "engine_type": engine_key(*ty) }),
            Self::Recursive(name) => json!({ "type": "recursive", "name": name }),
            Self::Opaque(name) => json!({ "type": "opaque", "name": name }),
        }
    }
}

fn engine_key(ty: EngineType) -> &'static str {
    match ty {
        EngineType::Entity => "entity",
        EngineType::Prefab => "prefab",
        EngineType::Children => "children",
    }
}
