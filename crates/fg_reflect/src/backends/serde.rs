//! Feeds descriptor output into any `serde` data format.
//!
//! Objects become serde maps and arrays become sequences, so every format
//! with a `serde::Serializer` (RON, YAML, MessagePack...) can store values
//! described by this crate.

use alloc::boxed::Box;

use serde_core::ser::{self, Error, SerializeMap, SerializeSeq};
use serde_core::Serialize;

use crate::descriptor::{Serializable, TypeDescriptor, Value};
use crate::ser::{ArraySerializer, ObjectSerializer, SerializeSource, Serializer};

// -----------------------------------------------------------------------------
// SerializeDriver

/// A `serde::Serialize` view of a value, driven by its descriptor.
///
/// # Example
///
/// ```
/// use fg_reflect::backends::serde::SerializeDriver;
///
/// let data = vec![1_u8, 2];
/// let text = serde_json::to_string(&SerializeDriver::new(&data)).unwrap();
///
/// assert_eq!(text, "[1,2]");
/// ```
pub struct SerializeDriver<'a, T> {
    descriptor: &'a dyn TypeDescriptor<T>,
    value: &'a T,
}

impl<'a, T: Serializable> SerializeDriver<'a, T> {
    #[inline]
    pub fn new(value: &'a T) -> Self {
        Self::with_descriptor(T::descriptor(), value)
    }
}

impl<'a, T> SerializeDriver<'a, T> {
    #[inline]
    pub fn with_descriptor(descriptor: &'a dyn TypeDescriptor<T>, value: &'a T) -> Self {
        Self { descriptor, value }
    }
}

impl<T> Serialize for SerializeDriver<'_, T> {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        drive(&Value::new(self.descriptor, self.value), serializer)
    }
}

/// A nested value handed to serde as a map entry or sequence element.
struct SourceDriver<'a>(&'a dyn SerializeSource);

impl Serialize for SourceDriver<'_> {
    #[inline]
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        drive(self.0, serializer)
    }
}

// Separate to reduce code compilation times
#[inline(never)]
fn drive<S: ser::Serializer>(source: &dyn SerializeSource, serializer: S) -> Result<S::Ok, S::Error> {
    let mut bridge = Bridge {
        serializer: Some(serializer),
        result: None,
    };
    source.serialize(&mut bridge);
    match bridge.result {
        Some(result) => result,
        None => Err(S::Error::custom(format_args!(
            "{} did not serialize a value",
            source.type_name()
        ))),
    }
}

// -----------------------------------------------------------------------------
// Bridge

/// Adapts a consuming serde serializer to the write-once [`Serializer`] calls
/// of a descriptor. Only the first value written is kept.
struct Bridge<S: ser::Serializer> {
    serializer: Option<S>,
    result: Option<Result<S::Ok, S::Error>>,
}

macro_rules! bridge_scalar {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            #[inline]
            fn $method(&mut self, v: $ty) {
                if let Some(serializer) = self.serializer.take() {
                    self.result = Some(serializer.$method(v));
                }
            }
        )*
    };
}

impl<S: ser::Serializer> Serializer for Bridge<S> {
    bridge_scalar! {
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_str(&str),
    }

    fn serialize_object(&mut self) -> Box<dyn ObjectSerializer + '_> {
        let map = match self.serializer.take().map(|s| s.serialize_map(None)) {
            Some(Ok(map)) => Some(map),
            Some(Err(err)) => {
                self.result = Some(Err(err));
                None
            }
            None => None,
        };
        Box::new(BridgeMap::<S> {
            result: &mut self.result,
            map,
        })
    }

    fn serialize_array(&mut self) -> Box<dyn ArraySerializer + '_> {
        let seq = match self.serializer.take().map(|s| s.serialize_seq(None)) {
            Some(Ok(seq)) => Some(seq),
            Some(Err(err)) => {
                self.result = Some(Err(err));
                None
            }
            None => None,
        };
        Box::new(BridgeSeq::<S> {
            result: &mut self.result,
            seq,
        })
    }
}

struct BridgeMap<'a, S: ser::Serializer> {
    result: &'a mut Option<Result<S::Ok, S::Error>>,
    map: Option<S::SerializeMap>,
}

impl<S: ser::Serializer> ObjectSerializer for BridgeMap<'_, S> {
    fn serialize_member(&mut self, name: &str, value: &dyn SerializeSource) {
        let Some(map) = &mut self.map else {
            return;
        };
        if let Err(err) = map.serialize_entry(name, &SourceDriver(value)) {
            *self.result = Some(Err(err));
            self.map = None;
        }
    }

    fn end(self: Box<Self>) {
        let Self { result, map } = *self;
        if let Some(map) = map {
            *result = Some(map.end());
        }
    }
}

struct BridgeSeq<'a, S: ser::Serializer> {
    result: &'a mut Option<Result<S::Ok, S::Error>>,
    seq: Option<S::SerializeSeq>,
}

impl<S: ser::Serializer> ArraySerializer for BridgeSeq<'_, S> {
    fn serialize_element(&mut self, value: &dyn SerializeSource) {
        let Some(seq) = &mut self.seq else {
            return;
        };
        if let Err(err) = seq.serialize_element(&SourceDriver(value)) {
            *self.result = Some(Err(err));
            self.seq = None;
        }
    }

    fn end(self: Box<Self>) {
        let Self { result, seq } = *self;
        if let Some(seq) = seq {
            *result = Some(seq.end());
        }
    }
}
