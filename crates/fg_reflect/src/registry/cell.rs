//! Containers for the static storage of descriptors.
//!
//! ## NonGenericDescriptorCell
//!
//! For non-generic types. Internally an [`OnceLock<D>`], almost no
//! additional cost after the first call.
//!
//! ## GenericDescriptorCell
//!
//! A `static CELL` inside a generic function is shared by every
//! instantiation of that function. The generic cell therefore keeps one
//! descriptor per concrete descriptor type in a [`TypeId`]-keyed map behind
//! an [`RwLock`].
//!
//! Both cells are safe to initialise concurrently from several threads, and
//! nothing needs to be warmed up before first use.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use foldhash::fast::FixedState;
use hashbrown::HashMap;

// -----------------------------------------------------------------------------
// NonGenericDescriptorCell

/// Static storage for the descriptor of a non-generic type.
///
/// ## Example
///
/// ```
/// use fg_reflect::Serializable;
/// use fg_reflect::class::ClassDescriptor;
/// use fg_reflect::descriptor::TypeDescriptor;
/// use fg_reflect::registry::NonGenericDescriptorCell;
///
/// #[derive(Default)]
/// struct Health {
///     current: u32,
///     max: u32,
/// }
///
/// impl Serializable for Health {
///     fn descriptor() -> &'static dyn TypeDescriptor<Self> {
///         static CELL: NonGenericDescriptorCell<ClassDescriptor<Health>> =
///             NonGenericDescriptorCell::new();
///         CELL.get_or_init(|| {
///             ClassDescriptor::<Health>::builder("Health")
///                 .field("current", |h| &h.current, |h| &mut h.current)
///                 .field("max", |h| &h.max, |h| &mut h.max)
///                 .with_default()
///                 .build()
///         })
///     }
/// }
///
/// assert_eq!(Health::descriptor().name(), "Health");
/// ```
pub struct NonGenericDescriptorCell<D>(OnceLock<D>);

impl<D> NonGenericDescriptorCell<D> {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored descriptor, building it with `f` on first use.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> D) -> &D {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericDescriptorCell

type DescriptorMap = HashMap<TypeId, &'static (dyn Any + Send + Sync), FixedState>;

/// Static storage for the descriptors of a generic type's instantiations.
///
/// ## Example
///
/// ```
/// use fg_reflect::Serializable;
/// use fg_reflect::class::ClassDescriptor;
/// use fg_reflect::descriptor::{TypeDescriptor, type_name};
/// use fg_reflect::registry::GenericDescriptorCell;
///
/// #[derive(Default)]
/// struct Tagged<T> {
///     tag: String,
///     value: T,
/// }
///
/// impl<T: Serializable + Default> Serializable for Tagged<T> {
///     fn descriptor() -> &'static dyn TypeDescriptor<Self> {
///         static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
///         CELL.get_or_insert(|| {
///             ClassDescriptor::<Self>::builder(format!("Tagged<{}>", type_name::<T>()))
///                 .field("tag", |t| &t.tag, |t| &mut t.tag)
///                 .field("value", |t| &t.value, |t| &mut t.value)
///                 .with_default()
///                 .build()
///         })
///     }
/// }
///
/// assert_eq!(type_name::<Tagged<u8>>(), "Tagged<u8>");
/// assert_eq!(type_name::<Tagged<f32>>(), "Tagged<f32>");
/// ```
pub struct GenericDescriptorCell(RwLock<DescriptorMap>);

impl GenericDescriptorCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(HashMap::with_hasher(FixedState::with_seed(0))))
    }

    /// Returns the stored descriptor of type `D`, building it with `f` if
    /// there is none yet.
    ///
    /// `f` runs without holding the lock, so it may look up other
    /// descriptors stored in the same cell. If two threads race, the first
    /// insert wins and the other value is dropped.
    #[inline(always)]
    pub fn get_or_insert<D: Any + Send + Sync>(&self, f: impl FnOnce() -> D) -> &'static D {
        match self.get::<D>() {
            Some(descriptor) => descriptor,
            None => self.insert(f()),
        }
    }

    #[inline]
    fn get<D: Any + Send + Sync>(&self) -> Option<&'static D> {
        let entry = self.get_by_type_id(TypeId::of::<D>())?;
        entry.downcast_ref::<D>()
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static (dyn Any + Send + Sync)> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    fn insert<D: Any + Send + Sync>(&self, value: D) -> &'static D {
        let entry = self.insert_by_type_id(TypeId::of::<D>(), move || {
            let leaked: &'static (dyn Any + Send + Sync) = Box::leak(Box::new(value));
            leaked
        });
        match entry.downcast_ref::<D>() {
            Some(descriptor) => descriptor,
            None => unreachable!("descriptor cell entries are keyed by their own TypeId"),
        }
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn insert_by_type_id(
        &self,
        type_id: TypeId,
        leak: impl FnOnce() -> &'static (dyn Any + Send + Sync),
    ) -> &'static (dyn Any + Send + Sync) {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(leak)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{GenericDescriptorCell, NonGenericDescriptorCell};

    #[test]
    fn non_generic_initialises_once() {
        static CELL: NonGenericDescriptorCell<u32> = NonGenericDescriptorCell::new();
        assert_eq!(*CELL.get_or_init(|| 1), 1);
        assert_eq!(*CELL.get_or_init(|| 2), 1);
    }

    #[test]
    fn generic_keeps_one_entry_per_type() {
        static CELL: GenericDescriptorCell = GenericDescriptorCell::new();

        let a: &'static u32 = CELL.get_or_insert(|| 7_u32);
        let b: &'static u32 = CELL.get_or_insert(|| 8_u32);
        let c: &'static i64 = CELL.get_or_insert(|| -1_i64);

        assert!(core::ptr::eq(a, b));
        assert_eq!((*a, *c), (7, -1));
    }

    #[test]
    fn generic_racing_threads_agree() {
        static CELL: GenericDescriptorCell = GenericDescriptorCell::new();

        let handles: Vec<_> = (0..8_usize)
            .map(|i| std::thread::spawn(move || CELL.get_or_insert(|| i) as *const usize as usize))
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }
}
