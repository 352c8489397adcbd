//! Shallow Serde Decomposition
//!
//! A minimal `serde::Serializer` that captures the top-level attributes of a
//! struct or map directly as cache values, without an intermediate JSON tree,
//! so floats such as NaN and infinity keep their value.

use std::fmt;

use serde::ser::{self, Impossible, Serialize, SerializeMap, SerializeStruct, Serializer};

use crate::cache::Value;
use crate::error::{CacheError, Result};

type Decomposed<T> = std::result::Result<T, DecomposeError>;
type Fields = Vec<(String, Value)>;

#[derive(Debug)]
enum DecomposeError {
    /// The attribute is a compound value; it is stored whole instead
    Nested,
    /// The top-level value has no named fields
    Shape(&'static str),
    Custom(String),
}

impl fmt::Display for DecomposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecomposeError::Nested => f.write_str("nested value"),
            DecomposeError::Shape(kind) => write!(f, "record must have named fields, got {}", kind),
            DecomposeError::Custom(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for DecomposeError {}

impl ser::Error for DecomposeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DecomposeError::Custom(msg.to_string())
    }
}

/// Splits `record` into one `(field name, value)` pair per top-level attribute.
pub(crate) fn decompose<T: Serialize + ?Sized>(record: &T) -> Result<Fields> {
    record.serialize(RecordSerializer).map_err(|err| match err {
        DecomposeError::Shape(_) => CacheError::invalid_argument(err.to_string()),
        other => CacheError::invalid_argument(format!("record failed to serialize: {}", other)),
    })
}

/// Converts one attribute, keeping compound values whole as `serde_json::Value`.
fn attribute<T: Serialize + ?Sized>(value: &T) -> Decomposed<Value> {
    match value.serialize(AttributeSerializer) {
        Err(DecomposeError::Nested) => serde_json::to_value(value)
            .map(Value::opaque)
            .map_err(|e| DecomposeError::Custom(e.to_string())),
        other => other,
    }
}

fn shape<T>(kind: &'static str) -> Decomposed<T> {
    Err(DecomposeError::Shape(kind))
}

// == Record Serializer ==
/// Accepts only structs and maps; everything else is a shape error.
struct RecordSerializer;

impl Serializer for RecordSerializer {
    type Ok = Fields;
    type Error = DecomposeError;
    type SerializeSeq = Impossible<Fields, DecomposeError>;
    type SerializeTuple = Impossible<Fields, DecomposeError>;
    type SerializeTupleStruct = Impossible<Fields, DecomposeError>;
    type SerializeTupleVariant = Impossible<Fields, DecomposeError>;
    type SerializeMap = MapFields;
    type SerializeStruct = StructFields;
    type SerializeStructVariant = Impossible<Fields, DecomposeError>;

    fn serialize_bool(self, _v: bool) -> Decomposed<Fields> {
        shape("bool")
    }

    fn serialize_i8(self, _v: i8) -> Decomposed<Fields> {
        shape("number")
    }

    fn serialize_i16(self, _v: i16) -> Decomposed<Fields> {
        shape("number")
    }

    fn serialize_i32(self, _v: i32) -> Decomposed<Fields> {
        shape("number")
    }

    fn serialize_i64(self, _v: i64) -> Decomposed<Fields> {
        shape("number")
    }

    fn serialize_u8(self, _v: u8) -> Decomposed<Fields> {
        shape("number")
    }

    fn serialize_u16(self, _v: u16) -> Decomposed<Fields> {
        shape("number")
    }

    fn serialize_u32(self, _v: u32) -> Decomposed<Fields> {
        shape("number")
    }

    fn serialize_u64(self, _v: u64) -> Decomposed<Fields> {
        shape("number")
    }

    fn serialize_f32(self, _v: f32) -> Decomposed<Fields> {
        shape("number")
    }

    fn serialize_f64(self, _v: f64) -> Decomposed<Fields> {
        shape("number")
    }

    fn serialize_char(self, _v: char) -> Decomposed<Fields> {
        shape("string")
    }

    fn serialize_str(self, _v: &str) -> Decomposed<Fields> {
        shape("string")
    }

    fn serialize_bytes(self, _v: &[u8]) -> Decomposed<Fields> {
        shape("bytes")
    }

    fn serialize_none(self) -> Decomposed<Fields> {
        shape("null")
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Decomposed<Fields> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Decomposed<Fields> {
        shape("null")
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Decomposed<Fields> {
        shape("null")
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Decomposed<Fields> {
        shape("enum variant")
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Decomposed<Fields> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Decomposed<Fields> {
        shape("enum variant")
    }

    fn serialize_seq(self, _len: Option<usize>) -> Decomposed<Self::SerializeSeq> {
        shape("array")
    }

    fn serialize_tuple(self, _len: usize) -> Decomposed<Self::SerializeTuple> {
        shape("array")
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Decomposed<Self::SerializeTupleStruct> {
        shape("array")
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Decomposed<Self::SerializeTupleVariant> {
        shape("enum variant")
    }

    fn serialize_map(self, len: Option<usize>) -> Decomposed<Self::SerializeMap> {
        Ok(MapFields {
            fields: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Decomposed<Self::SerializeStruct> {
        Ok(StructFields {
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Decomposed<Self::SerializeStructVariant> {
        shape("enum variant")
    }
}

struct StructFields {
    fields: Fields,
}

impl SerializeStruct for StructFields {
    type Ok = Fields;
    type Error = DecomposeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Decomposed<()> {
        self.fields.push((key.to_string(), attribute(value)?));
        Ok(())
    }

    fn end(self) -> Decomposed<Fields> {
        Ok(self.fields)
    }
}

struct MapFields {
    fields: Fields,
    pending_key: Option<String>,
}

impl SerializeMap for MapFields {
    type Ok = Fields;
    type Error = DecomposeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Decomposed<()> {
        let name = match key.serialize(AttributeSerializer) {
            Ok(Value::Str(s)) => s,
            Ok(Value::Int(i)) => i.to_string(),
            _ => {
                return Err(DecomposeError::Custom(
                    "map keys must be strings or integers".to_string(),
                ))
            }
        };
        self.pending_key = Some(name);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Decomposed<()> {
        let field = self
            .pending_key
            .take()
            .ok_or_else(|| DecomposeError::Custom("map value without a key".to_string()))?;
        self.fields.push((field, attribute(value)?));
        Ok(())
    }

    fn end(self) -> Decomposed<Fields> {
        Ok(self.fields)
    }
}

// == Attribute Serializer ==
/// Maps one primitive attribute to a `Value`; compound values report `Nested`.
struct AttributeSerializer;

impl Serializer for AttributeSerializer {
    type Ok = Value;
    type Error = DecomposeError;
    type SerializeSeq = Impossible<Value, DecomposeError>;
    type SerializeTuple = Impossible<Value, DecomposeError>;
    type SerializeTupleStruct = Impossible<Value, DecomposeError>;
    type SerializeTupleVariant = Impossible<Value, DecomposeError>;
    type SerializeMap = Impossible<Value, DecomposeError>;
    type SerializeStruct = Impossible<Value, DecomposeError>;
    type SerializeStructVariant = Impossible<Value, DecomposeError>;

    fn serialize_bool(self, v: bool) -> Decomposed<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Decomposed<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Decomposed<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Decomposed<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Decomposed<Value> {
        Ok(Value::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Decomposed<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Decomposed<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Decomposed<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Decomposed<Value> {
        Ok(Value::from_u64(v))
    }

    fn serialize_f32(self, v: f32) -> Decomposed<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Decomposed<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Decomposed<Value> {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Decomposed<Value> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Decomposed<Value> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Decomposed<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Decomposed<Value> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Decomposed<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Decomposed<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Decomposed<Value> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Decomposed<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Decomposed<Value> {
        Err(DecomposeError::Nested)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Decomposed<Self::SerializeSeq> {
        Err(DecomposeError::Nested)
    }

    fn serialize_tuple(self, _len: usize) -> Decomposed<Self::SerializeTuple> {
        Err(DecomposeError::Nested)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Decomposed<Self::SerializeTupleStruct> {
        Err(DecomposeError::Nested)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Decomposed<Self::SerializeTupleVariant> {
        Err(DecomposeError::Nested)
    }

    fn serialize_map(self, _len: Option<usize>) -> Decomposed<Self::SerializeMap> {
        Err(DecomposeError::Nested)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Decomposed<Self::SerializeStruct> {
        Err(DecomposeError::Nested)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Decomposed<Self::SerializeStructVariant> {
        Err(DecomposeError::Nested)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Reading {
        temp: f64,
        max: f32,
        min: f64,
    }

    #[derive(Serialize)]
    enum Level {
        High,
    }

    #[derive(Serialize)]
    struct Meter(u64);

    #[derive(Serialize)]
    struct Mixed {
        level: Level,
        meter: Meter,
        note: Option<String>,
        tags: Vec<&'static str>,
        total: u64,
    }

    fn field<'a>(fields: &'a Fields, name: &str) -> &'a Value {
        &fields.iter().find(|(f, _)| f == name).unwrap().1
    }

    #[test]
    fn test_non_finite_floats_survive() {
        let reading = Reading {
            temp: f64::NAN,
            max: f32::INFINITY,
            min: f64::NEG_INFINITY,
        };

        let fields = decompose(&reading).unwrap();
        assert!(field(&fields, "temp").as_float().unwrap().is_nan());
        assert_eq!(field(&fields, "max"), &Value::Float(f64::INFINITY));
        assert_eq!(field(&fields, "min"), &Value::Float(f64::NEG_INFINITY));
    }

    #[test]
    fn test_attribute_kinds() {
        let mixed = Mixed {
            level: Level::High,
            meter: Meter(9),
            note: None,
            tags: vec!["a", "b"],
            total: u64::MAX,
        };

        let fields = decompose(&mixed).unwrap();
        let names: Vec<&str> = fields.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(names, ["level", "meter", "note", "tags", "total"]);

        assert_eq!(field(&fields, "level"), &Value::from("High"));
        assert_eq!(field(&fields, "meter"), &Value::Int(9));
        assert_eq!(field(&fields, "note"), &Value::Null);
        assert_eq!(
            field(&fields, "tags").downcast_ref::<serde_json::Value>(),
            Some(&json!(["a", "b"]))
        );
        assert_eq!(field(&fields, "total").downcast_ref::<u64>(), Some(&u64::MAX));
    }

    #[test]
    fn test_map_keys() {
        let by_id: BTreeMap<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
        let fields = decompose(&by_id).unwrap();
        assert_eq!(fields[0], ("1".to_string(), Value::from("one")));

        let by_pair: BTreeMap<(i32, i32), i32> = [((1, 2), 3)].into_iter().collect();
        let err = decompose(&by_pair).unwrap_err();
        assert!(err.to_string().contains("map keys must be strings or integers"));
    }

    #[test]
    fn test_shape_errors() {
        assert_eq!(
            decompose(&Level::High).unwrap_err(),
            CacheError::invalid_argument("record must have named fields, got enum variant")
        );
        assert!(decompose(&Some(3)).is_err());
        assert!(decompose(&(1, 2)).is_err());
    }
}
