//! Depth-bounded JSON rendering of arbitrary `Serialize` values.
//!
//! Values are driven through a custom serde `Serializer` that tracks depth.
//! Anything at or below `max_depth` is dropped without being visited, so
//! self-referential graphs (`Rc<RefCell<..>>` cycles) terminate. Null values,
//! null map keys and non-finite floats are omitted. Map keys come out sorted.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::ser::{self, Impossible, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::debug;

/// Failure while rendering a value.
#[derive(Debug, Error)]
pub enum BoundedError {
    #[error("Unsupported map key type: {0}")]
    UnsupportedKey(&'static str),

    #[error("Value refused to serialize: {0}")]
    Custom(String),
}

impl ser::Error for BoundedError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// Render `value` as a JSON tree, truncated at `max_depth`.
///
/// `Ok(None)` means there is nothing to show: a null value or a zero depth.
pub fn to_bounded_value<T>(value: &T, max_depth: usize) -> Result<Option<Value>, BoundedError>
where
    T: ?Sized + Serialize,
{
    value.serialize(DepthSerializer { depth: 0, max: max_depth })
}

/// Render `value` as compact JSON text, truncated at `max_depth`.
///
/// Returns an empty string when there is nothing to show or rendering fails.
pub fn to_bounded_string<T>(value: &T, max_depth: usize) -> String
where
    T: ?Sized + Serialize,
{
    match to_bounded_value(value, max_depth) {
        Ok(Some(tree)) => serde_json::to_string(&tree).unwrap_or_default(),
        Ok(None) => String::new(),
        Err(e) => {
            debug!(error = %e, max_depth, "bounded rendering failed");
            String::new()
        }
    }
}

/// Reusable renderer holding a configured depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedSerializer {
    max_depth: usize,
}

impl BoundedSerializer {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn render<T: ?Sized + Serialize>(&self, value: &T) -> String {
        to_bounded_string(value, self.max_depth)
    }

    pub fn render_value<T: ?Sized + Serialize>(&self, value: &T) -> Option<Value> {
        to_bounded_value(value, self.max_depth).ok().flatten()
    }
}

#[derive(Debug, Clone, Copy)]
struct DepthSerializer {
    depth: usize,
    max: usize,
}

impl DepthSerializer {
    fn truncated(&self) -> bool {
        self.depth >= self.max
    }

    fn child(&self) -> Self {
        Self { depth: self.depth + 1, max: self.max }
    }

    fn leaf(self, value: Value) -> Result<Option<Value>, BoundedError> {
        Ok((!self.truncated()).then_some(value))
    }

    fn seq(self, tag: Option<&'static str>) -> SeqCompound {
        let (inner, tag) = self.tagged(tag);
        SeqCompound {
            items: (!inner.truncated()).then(Vec::new),
            child: inner.child(),
            tag,
        }
    }

    fn map(self, tag: Option<&'static str>) -> MapCompound {
        let (inner, tag) = self.tagged(tag);
        MapCompound {
            entries: (!inner.truncated()).then(BTreeMap::new),
            pending_key: None,
            child: inner.child(),
            tag,
        }
    }

    /// Enum variants render as `{variant: inner}`; the inner value sits one
    /// level deeper than the wrapper.
    fn tagged(self, tag: Option<&'static str>) -> (Self, Option<Tag>) {
        match tag {
            Some(name) => (self.child(), Some(Tag { name, visible: !self.truncated() })),
            None => (self, None),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Tag {
    name: &'static str,
    visible: bool,
}

fn wrap(tag: Option<Tag>, inner: Option<Value>) -> Option<Value> {
    match tag {
        None => inner,
        Some(tag) if !tag.visible => None,
        Some(tag) => {
            let mut object = Map::new();
            if let Some(inner) = inner {
                object.insert(tag.name.to_string(), inner);
            }
            Some(Value::Object(object))
        }
    }
}

fn wide_number(text: String) -> Value {
    text.parse::<i64>()
        .map(Value::from)
        .or_else(|_| text.parse::<u64>().map(Value::from))
        .unwrap_or(Value::String(text))
}

impl ser::Serializer for DepthSerializer {
    type Ok = Option<Value>;
    type Error = BoundedError;

    type SerializeSeq = SeqCompound;
    type SerializeTuple = SeqCompound;
    type SerializeTupleStruct = SeqCompound;
    type SerializeTupleVariant = SeqCompound;
    type SerializeMap = MapCompound;
    type SerializeStruct = MapCompound;
    type SerializeStructVariant = MapCompound;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
        self.leaf(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok, Self::Error> {
        self.leaf(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Self::Ok, Self::Error> {
        self.leaf(wide_number(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok, Self::Error> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok, Self::Error> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok, Self::Error> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok, Self::Error> {
        self.leaf(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok, Self::Error> {
        self.leaf(wide_number(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok, Self::Error> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok, Self::Error> {
        match Number::from_f64(v) {
            Some(n) => self.leaf(Value::Number(n)),
            None => Ok(None),
        }
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        self.leaf(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        self.leaf(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        if self.truncated() {
            return Ok(None);
        }
        let child = self.child();
        let items = if child.truncated() {
            Vec::new()
        } else {
            v.iter().map(|b| Value::from(*b)).collect()
        };
        Ok(Some(Value::Array(items)))
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Ok(None)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.leaf(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        let (inner, tag) = self.tagged(Some(variant));
        let rendered = if inner.truncated() { None } else { value.serialize(inner)? };
        Ok(wrap(tag, rendered))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(self.seq(None))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(self.seq(None))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(self.seq(None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(self.seq(Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(self.map(None))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(self.map(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(self.map(Some(variant)))
    }
}

/// Array under construction. `items` is `None` once past the depth bound;
/// elements are then ignored without being visited.
struct SeqCompound {
    items: Option<Vec<Value>>,
    child: DepthSerializer,
    tag: Option<Tag>,
}

impl SeqCompound {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BoundedError> {
        if let Some(items) = self.items.as_mut() {
            if let Some(rendered) = value.serialize(self.child)? {
                items.push(rendered);
            }
        }
        Ok(())
    }

    fn finish(self) -> Option<Value> {
        wrap(self.tag, self.items.map(Value::Array))
    }
}

impl ser::SerializeSeq for SeqCompound {
    type Ok = Option<Value>;
    type Error = BoundedError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqCompound {
    type Ok = Option<Value>;
    type Error = BoundedError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SeqCompound {
    type Ok = Option<Value>;
    type Error = BoundedError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SeqCompound {
    type Ok = Option<Value>;
    type Error = BoundedError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.finish())
    }
}

/// Object under construction; same truncation rule as [`SeqCompound`].
struct MapCompound {
    /// Kept sorted by key, whatever the input's iteration order.
    entries: Option<BTreeMap<String, Value>>,
    /// Key of the entry whose value comes next; `Some(None)` drops the entry.
    pending_key: Option<Option<String>>,
    child: DepthSerializer,
    tag: Option<Tag>,
}

impl MapCompound {
    fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<(), BoundedError> {
        if let Some(entries) = self.entries.as_mut() {
            if let Some(rendered) = value.serialize(self.child)? {
                entries.insert(key, rendered);
            }
        }
        Ok(())
    }

    fn finish(self) -> Option<Value> {
        let object = |entries: BTreeMap<String, Value>| Value::Object(entries.into_iter().collect());
        wrap(self.tag, self.entries.map(object))
    }
}

impl ser::SerializeMap for MapCompound {
    type Ok = Option<Value>;
    type Error = BoundedError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Self::Error> {
        if self.entries.is_some() {
            self.pending_key = Some(key.serialize(KeySerializer)?);
        }
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        match self.pending_key.take() {
            Some(Some(key)) => self.insert(key, value),
            _ => Ok(()),
        }
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for MapCompound {
    type Ok = Option<Value>;
    type Error = BoundedError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for MapCompound {
    type Ok = Option<Value>;
    type Error = BoundedError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.finish())
    }
}

/// Renders map keys to their display text; `None` marks a null key.
struct KeySerializer;

impl KeySerializer {
    fn text(value: impl ToString) -> Result<Option<String>, BoundedError> {
        Ok(Some(value.to_string()))
    }
}

impl ser::Serializer for KeySerializer {
    type Ok = Option<String>;
    type Error = BoundedError;

    type SerializeSeq = Impossible<Option<String>, BoundedError>;
    type SerializeTuple = Impossible<Option<String>, BoundedError>;
    type SerializeTupleStruct = Impossible<Option<String>, BoundedError>;
    type SerializeTupleVariant = Impossible<Option<String>, BoundedError>;
    type SerializeMap = Impossible<Option<String>, BoundedError>;
    type SerializeStruct = Impossible<Option<String>, BoundedError>;
    type SerializeStructVariant = Impossible<Option<String>, BoundedError>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_i128(self, v: i128) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        Self::text(v)
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok, Self::Error> {
        Err(BoundedError::UnsupportedKey("bytes"))
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Ok(None)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Self::text(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        Err(BoundedError::UnsupportedKey("newtype variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Err(BoundedError::UnsupportedKey("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Err(BoundedError::UnsupportedKey("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Err(BoundedError::UnsupportedKey("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(BoundedError::UnsupportedKey("tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Err(BoundedError::UnsupportedKey("map"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Err(BoundedError::UnsupportedKey("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(BoundedError::UnsupportedKey("struct variant"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn primitives_render_as_literals() {
        assert_eq!(to_bounded_string(&42, 1), "42");
        assert_eq!(to_bounded_string("hi", 1), "\"hi\"");
        assert_eq!(to_bounded_string(&true, 1), "true");
        assert_eq!(to_bounded_string(&1.5f64, 1), "1.5");
    }

    #[test]
    fn null_and_zero_depth_render_empty() {
        assert_eq!(to_bounded_string(&Option::<i32>::None, 5), "");
        assert_eq!(to_bounded_string(&Value::Null, 5), "");
        assert_eq!(to_bounded_string(&json!({"a": 1}), 0), "");
    }

    #[test]
    fn nested_containers_truncate_to_empty() {
        let doc = json!({"a": {"b": {"c": [1, 2]}}});
        assert_eq!(to_bounded_string(&doc, 2), r#"{"a":{}}"#);
        assert_eq!(to_bounded_string(&doc, 3), r#"{"a":{"b":{}}}"#);
        assert_eq!(to_bounded_string(&json!([[1], 2]), 2), "[[],2]");
    }

    #[test]
    fn null_entries_and_elements_are_skipped() {
        let doc = json!({"keep": 1, "drop": null, "list": [null, 2]});
        assert_eq!(to_bounded_string(&doc, 5), r#"{"keep":1,"list":[2]}"#);
    }

    #[test]
    fn non_string_keys_use_their_text() {
        let mut map = HashMap::new();
        map.insert(7u32, "seven");
        assert_eq!(to_bounded_string(&map, 2), r#"{"7":"seven"}"#);
    }

    #[test]
    fn unordered_maps_render_sorted() {
        let map: HashMap<&str, u8> = [("m", 1), ("z", 2), ("a", 3), ("q", 4)].into_iter().collect();
        assert_eq!(to_bounded_string(&map, 2), r#"{"a":3,"m":1,"q":4,"z":2}"#);
        let doc = json!({"zeta": 1, "alpha": 2});
        assert_eq!(to_bounded_string(&doc, 2), r#"{"alpha":2,"zeta":1}"#);
    }

    #[test]
    fn null_keys_drop_the_entry() {
        let mut map = BTreeMap::new();
        map.insert(None, 1);
        map.insert(Some("k".to_string()), 2);
        assert_eq!(to_bounded_string(&map, 2), r#"{"k":2}"#);
    }

    #[test]
    fn composite_keys_are_rejected() {
        let mut map = BTreeMap::new();
        map.insert(vec![1], 1);
        assert!(matches!(to_bounded_value(&map, 2), Err(BoundedError::UnsupportedKey(_))));
        assert_eq!(to_bounded_string(&map, 2), "");
    }

    #[test]
    fn enum_variants_are_wrapped() {
        #[derive(serde::Serialize)]
        enum Shape {
            Circle(f64),
            Rect { w: u32, h: u32 },
            Empty,
        }
        assert_eq!(to_bounded_string(&Shape::Circle(2.0), 3), r#"{"Circle":2.0}"#);
        assert_eq!(to_bounded_string(&Shape::Rect { w: 1, h: 2 }, 3), r#"{"Rect":{"h":2,"w":1}}"#);
        assert_eq!(to_bounded_string(&Shape::Rect { w: 1, h: 2 }, 2), r#"{"Rect":{}}"#);
        assert_eq!(to_bounded_string(&Shape::Empty, 1), "\"Empty\"");
    }

    #[test]
    fn non_finite_floats_are_omitted() {
        assert_eq!(to_bounded_string(&vec![1.0, f64::NAN], 2), "[1.0]");
    }
}
