use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;
use core::marker::PhantomData;

use crate::de::Deserializer;
use crate::descriptor::{Descriptor, Serializable, Slot, TypeDescriptor};
use crate::error::DeserializeError;
use crate::registry::GenericDescriptorCell;
use crate::schema::SchemaVisitor;
use crate::ser::Serializer;

// -----------------------------------------------------------------------------
// AssetType

/// A kind of asset that can be referenced by path from serialized data.
///
/// Loading and caching belong to the asset system; this trait is the only
/// part of it the serialization layer sees.
pub trait AssetType: Send + Sync + 'static {
    /// The asset kind, as shown in schemas (`Asset<Texture>`).
    const ASSET_NAME: &'static str;

    /// Loads (or fetches from a cache) the asset stored at `path`.
    fn load(path: &str) -> Option<Arc<Self>>;
}

// -----------------------------------------------------------------------------
// Asset

/// A reference to a loaded asset, stored on the wire as its path.
///
/// An empty path is the null reference.
pub struct Asset<A> {
    path: String,
    handle: Option<Arc<A>>,
}

impl<A: AssetType> Asset<A> {
    /// Loads the asset at `path`.
    pub fn load(path: impl Into<String>) -> Option<Self> {
        let path = path.into();
        let handle = A::load(&path)?;
        Some(Self {
            path,
            handle: Some(handle),
        })
    }
}

impl<A> Asset<A> {
    /// Wraps an already loaded asset.
    #[inline]
    pub fn from_handle(path: impl Into<String>, handle: Arc<A>) -> Self {
        Self {
            path: path.into(),
            handle: Some(handle),
        }
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn get(&self) -> Option<&Arc<A>> {
        self.handle.as_ref()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.handle.is_none()
    }
}

impl<A> Default for Asset<A> {
    #[inline]
    fn default() -> Self {
        Self {
            path: String::new(),
            handle: None,
        }
    }
}

impl<A> Clone for Asset<A> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            handle: self.handle.clone(),
        }
    }
}

impl<A> PartialEq for Asset<A> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<A> fmt::Debug for Asset<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("path", &self.path)
            .field("loaded", &self.handle.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// AssetDescriptor

/// Descriptor of `Asset<A>`.
pub struct AssetDescriptor<A> {
    name: String,
    marker: PhantomData<fn() -> A>,
}

impl<A: AssetType> Descriptor for AssetDescriptor<A> {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn accept(&self, visitor: &mut dyn SchemaVisitor) {
        visitor.visit_asset(A::ASSET_NAME);
    }
}

impl<A: AssetType> TypeDescriptor<Asset<A>> for AssetDescriptor<A> {
    #[inline]
    fn serialize(&self, serializer: &mut dyn Serializer, value: &Asset<A>) {
        serializer.serialize_str(&value.path);
    }

    #[inline]
    fn deserialize(
        &self,
        deserializer: &mut dyn Deserializer,
        value: &mut Asset<A>,
    ) -> Result<(), DeserializeError> {
        deserializer.deserialize_str(&mut Slot::new(self, value))
    }

    #[inline]
    fn make(&self) -> Result<Asset<A>, DeserializeError> {
        Ok(Asset::default())
    }

    fn deserialize_str(&self, value: &mut Asset<A>, v: &str) -> Result<(), DeserializeError> {
        if v.is_empty() {
            *value = Asset::default();
            return Ok(());
        }

        match A::load(v) {
            Some(handle) => {
                *value = Asset::from_handle(v, handle);
                Ok(())
            }
            None => Err(DeserializeError::AssetNotFound {
                asset_type: A::ASSET_NAME,
                path: v.into(),
            }),
        }
    }
}

impl<A: AssetType> Serializable for Asset<A> {
    fn descriptor() -> &'static dyn TypeDescriptor<Self> {
        static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
        CELL.get_or_insert(|| AssetDescriptor::<A> {
            name: format!("Asset<{}>", A::ASSET_NAME),
            marker: PhantomData,
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::{Asset, AssetType};
    use crate::DeserializeError;
    use crate::Serializable;
    use crate::schema::debug_schema;

    struct Texture;

    impl AssetType for Texture {
        const ASSET_NAME: &'static str = "Texture";

        fn load(path: &str) -> Option<Arc<Self>> {
            path.ends_with(".png").then(|| Arc::new(Texture))
        }
    }

    #[test]
    fn loads_by_path() {
        let mut asset = Asset::<Texture>::default();
        Asset::<Texture>::descriptor()
            .deserialize_str(&mut asset, "grass.png")
            .unwrap();
        assert_eq!(asset.path(), "grass.png");
        assert!(!asset.is_null());
    }

    #[test]
    fn missing_asset_fails() {
        let mut asset = Asset::<Texture>::default();
        let err = Asset::<Texture>::descriptor()
            .deserialize_str(&mut asset, "grass.jpg")
            .unwrap_err();
        assert_eq!(err, DeserializeError::AssetNotFound {
            asset_type: "Texture",
            path: "grass.jpg".into(),
        });
        assert_eq!(err.to_string(), "failed to load Texture asset at \"grass.jpg\"");
    }

    #[test]
    fn empty_path_is_null() {
        let mut asset = Asset::<Texture>::load("grass.png").unwrap();
        Asset::<Texture>::descriptor().deserialize_str(&mut asset, "").unwrap();
        assert!(asset.is_null());
    }

    #[test]
    fn schema() {
        assert_eq!(debug_schema::<Asset<Texture>>(), "Asset<Texture>");
        assert_eq!(crate::descriptor::type_name::<Asset<Texture>>(), "Asset<Texture>");
    }
}
