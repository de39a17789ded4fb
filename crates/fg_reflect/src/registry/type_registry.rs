use alloc::string::String;
use alloc::vec::Vec;

use foldhash::fast::FixedState;
use hashbrown::HashMap;

use crate::descriptor::{Descriptor, Serializable, same_descriptor};
use crate::schema::{SchemaNode, build_schema};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A name-keyed index of descriptors, for tooling.
///
/// Lookup of a descriptor by *type* never needs a registry: it goes through
/// [`Serializable::descriptor`]. This registry exists for the places that only
/// have a *name*, such as editors listing every serializable type.
///
/// # Example
///
/// ```
/// use fg_reflect::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Vec<u8>>();
///
/// assert!(registry.contains("u8"));
/// assert!(registry.contains("Vec<u8>"));
/// assert!(registry.get("Vec<i8>").is_none());
/// ```
pub struct TypeRegistry {
    descriptors: Vec<&'static dyn Descriptor>,
    name_to_index: HashMap<&'static str, usize, FixedState>,
    auto_available: bool,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty [`TypeRegistry`].
    #[inline]
    pub const fn empty() -> Self {
        Self {
            descriptors: Vec::new(),
            name_to_index: HashMap::with_hasher(FixedState::with_seed(0)),
            auto_available: false,
        }
    }

    /// Creates a registry holding the primitive descriptors.
    ///
    /// - `bool`
    /// - `i8` - `i64`
    /// - `u8` - `u64`
    /// - `f32` `f64`
    /// - `String`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry
    }

    /// Registers the descriptor of `T` and every descriptor reachable from its schema.
    ///
    /// Registering a type twice does nothing. A *different* descriptor
    /// claiming a name that is already taken is ignored with a warning.
    pub fn register<T: Serializable>(&mut self) {
        self.register_descriptor(T::descriptor());
    }

    /// Registers `descriptor` and every descriptor reachable from its schema.
    pub fn register_descriptor(&mut self, descriptor: &'static dyn Descriptor) {
        if !self.insert(descriptor) {
            return;
        }
        for dependency in crate::schema::dependencies(descriptor) {
            self.insert(dependency);
        }
    }

    // Returns `true` if the descriptor was newly inserted.
    fn insert(&mut self, descriptor: &'static dyn Descriptor) -> bool {
        let name: &'static str = descriptor.name();
        match self.name_to_index.get(name) {
            Some(&index) => {
                if !same_descriptor(self.descriptors[index], descriptor) {
                    log::warn!("type name `{name}` is already registered by another descriptor, ignoring");
                }
                false
            }
            None => {
                log::trace!("registering descriptor `{name}`");
                self.name_to_index.insert(name, self.descriptors.len());
                self.descriptors.push(descriptor);
                true
            }
        }
    }

    /// Collects every type annotated with `#[serializable(auto_register)]` or
    /// declared through `impl_auto_register!`.
    ///
    /// Repeated calls are cheap and never insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration works on the current platform.
    ///
    /// ## Feature Dependency
    ///
    /// Requires the `auto_register` feature; without it this does nothing
    /// and returns `false`.
    ///
    /// ## Platform Support
    ///
    /// Collection is done by the `inventory` crate, which supports Linux,
    /// macOS, Windows, iOS, Android and Web.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fg_reflect::derive::Serializable;
    /// use fg_reflect::registry::TypeRegistry;
    ///
    /// #[derive(Serializable, Default)]
    /// #[serializable(auto_register)]
    /// struct Spawner {
    ///     rate: f32,
    /// }
    ///
    /// let mut registry = TypeRegistry::empty();
    /// assert!(registry.auto_register());
    /// assert!(registry.contains("Spawner"));
    /// assert!(registry.contains("f32"));
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            if !self.auto_available {
                crate::__macro_exports::auto_register::__register_types(self);
            }
            self.auto_available
        }

        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[cfg(feature = "auto_register")]
    #[inline]
    pub(crate) fn mark_auto_available(&mut self) {
        self.auto_available = true;
    }

    /// Whether a descriptor named `name` has been registered.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    /// Returns the descriptor registered under `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&'static dyn Descriptor> {
        self.name_to_index.get(name).map(|&index| self.descriptors[index])
    }

    /// Builds the schema of the descriptor registered under `name`.
    pub fn schema(&self, name: &str) -> Option<SchemaNode> {
        self.get(name).map(build_schema)
    }

    /// Iterates over the registered descriptors in registration order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'static dyn Descriptor> + '_ {
        self.descriptors.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Tests
