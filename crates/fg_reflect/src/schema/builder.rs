use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;

use super::{EngineType, MemberSchema, PrimitiveType, SchemaNode, SchemaVisitor, StructSchema};
use crate::descriptor::{Descriptor, Serializable, same_descriptor};

// -----------------------------------------------------------------------------
// SchemaBuilder

/// A [`SchemaVisitor`] that produces a [`SchemaNode`] tree.
///
/// Descriptors currently being described are kept on a stack. Meeting one
/// of them again yields [`SchemaNode::Recursive`] instead of descending, so
/// building the schema of a self-referential type terminates.
#[derive(Default)]
pub struct SchemaBuilder {
    visiting: Vec<&'static dyn Descriptor>,
    structs: Vec<StructSchema>,
    output: Option<SchemaNode>,
}

impl SchemaBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the node of a child descriptor.
    pub fn build(&mut self, descriptor: &'static dyn Descriptor) -> SchemaNode {
        if self.is_visiting(descriptor) {
            return SchemaNode::Recursive(descriptor.name().to_string());
        }

        self.visiting.push(descriptor);
        let node = self.describe(descriptor);
        self.visiting.pop();
        node
    }

    fn is_visiting(&self, descriptor: &dyn Descriptor) -> bool {
        self.visiting
            .iter()
            .any(|&visiting| same_descriptor(visiting, descriptor))
    }

    fn describe(&mut self, descriptor: &dyn Descriptor) -> SchemaNode {
        let outer = self.output.take();
        descriptor.accept(self);
        let node = core::mem::replace(&mut self.output, outer);

        node.unwrap_or_else(|| {
            log::warn!("descriptor `{}` did not describe its schema", descriptor.name());
            SchemaNode::Opaque(descriptor.name().to_string())
        })
    }

    #[inline]
    fn emit(&mut self, node: SchemaNode) {
        self.output = Some(node);
    }

    #[inline]
    fn primitive(&mut self, ty: PrimitiveType) {
        self.emit(SchemaNode::Primitive(ty));
    }
}

/// Builds the schema of `T`.
///
/// # Example
///
/// ```
/// use fg_reflect::schema::{PrimitiveType, SchemaNode, schema_of};
///
/// assert_eq!(
///     schema_of::<Vec<u16>>(),
///     SchemaNode::Array(Box::new(SchemaNode::Primitive(PrimitiveType::Uint16))),
/// );
/// ```
#[inline]
pub fn schema_of<T: Serializable>() -> SchemaNode {
    build_schema(T::descriptor())
}

/// Builds the schema of `descriptor`.
pub fn build_schema(descriptor: &'static dyn Descriptor) -> SchemaNode {
    SchemaBuilder::new().build(descriptor)
}

impl SchemaVisitor for SchemaBuilder {
    fn visit_bool(&mut self) {
        self.primitive(PrimitiveType::Bool);
    }

    fn visit_i8(&mut self) {
        self.primitive(PrimitiveType::Int8);
    }

    fn visit_i16(&mut self) {
        self.primitive(PrimitiveType::Int16);
    }

    fn visit_i32(&mut self) {
        self.primitive(PrimitiveType::Int32);
    }

    fn visit_i64(&mut self) {
        self.primitive(PrimitiveType::Int64);
    }

    fn visit_u8(&mut self) {
        self.primitive(PrimitiveType::Uint8);
    }

    fn visit_u16(&mut self) {
        self.primitive(PrimitiveType::Uint16);
    }

    fn visit_u32(&mut self) {
        self.primitive(PrimitiveType::Uint32);
    }

    fn visit_u64(&mut self) {
        self.primitive(PrimitiveType::Uint64);
    }

    fn visit_f32(&mut self) {
        self.primitive(PrimitiveType::Float);
    }

    fn visit_f64(&mut self) {
        self.primitive(PrimitiveType::Double);
    }

    fn visit_string(&mut self) {
        self.primitive(PrimitiveType::String);
    }

    fn visit_array(&mut self, element: &'static dyn Descriptor) {
        let element = self.build(element);
        self.emit(SchemaNode::Array(Box::new(element)));
    }

    fn visit_map(&mut self, value: &'static dyn Descriptor) {
        let value = self.build(value);
        self.emit(SchemaNode::Map(Box::new(value)));
    }

    fn push_struct(&mut self, name: &str) {
        self.structs.push(StructSchema {
            name: name.to_string(),
            members: Vec::new(),
        });
    }

    fn visit_member(&mut self, name: &str, descriptor: &'static dyn Descriptor) {
        let node = self.build(descriptor);
        match self.structs.last_mut() {
            Some(schema) => schema.members.push(MemberSchema {
                name: name.to_string(),
                node,
            }),
            None => log::warn!("member `{name}` visited outside of a struct"),
        }
    }

    fn pop_struct(&mut self) {
        if let Some(schema) = self.structs.pop() {
            self.emit(SchemaNode::Struct(schema));
        }
    }

    fn visit_vector(&mut self, component: &'static dyn Descriptor, len: usize) {
        match PrimitiveType::vector(len) {
            Some(ty) => self.primitive(ty),
            None => {
                log::warn!("unsupported vector size {len}, describing it as an array");
                self.visit_array(component);
            }
        }
    }

    fn visit_matrix(&mut self, component: &'static dyn Descriptor, rows: usize, cols: usize) {
        match PrimitiveType::matrix(rows, cols) {
            Some(ty) => self.primitive(ty),
            None => {
                log::warn!("unsupported matrix size {rows}x{cols}, describing it as nested arrays");
                let column = self.build(component);
                self.emit(SchemaNode::Array(Box::new(SchemaNode::Array(Box::new(column)))));
            }
        }
    }

    fn visit_quaternion(&mut self) {
        self.primitive(PrimitiveType::Quaternion);
    }

    fn visit_asset(&mut self, asset_type: &str) {
        self.emit(SchemaNode::Asset(asset_type.to_string()));
    }

    fn visit_engine_type(&mut self, ty: EngineType) {
        log::info!("engine type `{ty}` has no structural schema");
        self.emit(SchemaNode::EngineType(ty));
    }

    fn visit_transparent(&mut self, inner: &'static dyn Descriptor) {
        let node = self.build(inner);
        self.emit(node);
    }
}

// -----------------------------------------------------------------------------
// Dependencies

/// Collects every descriptor reachable from a schema, once each.
#[derive(Default)]
struct DependencyCollector {
    found: Vec<&'static dyn Descriptor>,
}

impl DependencyCollector {
    fn descend(&mut self, descriptor: &'static dyn Descriptor) {
        if self.found.iter().any(|&d| same_descriptor(d, descriptor)) {
            return;
        }
        self.found.push(descriptor);
        descriptor.accept(self);
    }
}

impl SchemaVisitor for DependencyCollector {
    fn visit_bool(&mut self) {}
    fn visit_i8(&mut self) {}
    fn visit_i16(&mut self) {}
    fn visit_i32(&mut self) {}
    fn visit_i64(&mut self) {}
    fn visit_u8(&mut self) {}
    fn visit_u16(&mut self) {}
    fn visit_u32(&mut self) {}
    fn visit_u64(&mut self) {}
    fn visit_f32(&mut self) {}
    fn visit_f64(&mut self) {}
    fn visit_string(&mut self) {}

    fn visit_array(&mut self, element: &'static dyn Descriptor) {
        self.descend(element);
    }

    fn visit_map(&mut self, value: &'static dyn Descriptor) {
        self.descend(value);
    }

    fn push_struct(&mut self, _name: &str) {}

    fn visit_member(&mut self, _name: &str, descriptor: &'static dyn Descriptor) {
        self.descend(descriptor);
    }

    fn pop_struct(&mut self) {}

    fn visit_vector(&mut self, component: &'static dyn Descriptor, _len: usize) {
        self.descend(component);
    }

    fn visit_matrix(&mut self, component: &'static dyn Descriptor, _rows: usize, _cols: usize) {
        self.descend(component);
    }

    fn visit_quaternion(&mut self) {}
    fn visit_asset(&mut self, _asset_type: &str) {}
    fn visit_engine_type(&mut self, _ty: EngineType) {}

    fn visit_transparent(&mut self, inner: &'static dyn Descriptor) {
        self.descend(inner);
    }
}

/// Returns every descriptor reachable from `descriptor`, excluding itself,
/// in depth-first order.
pub fn dependencies(descriptor: &'static dyn Descriptor) -> Vec<&'static dyn Descriptor> {
    let mut collector = DependencyCollector {
        found: alloc::vec![descriptor],
    };
    descriptor.accept(&mut collector);
    collector.found.remove(0);
    collector.found
}
