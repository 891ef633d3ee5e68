//! Typed feature values and the type-directed value decoder.
//!
//! This module provides:
//! - [`Value`]: A feature value tagged with the variant of the [`DataType`] it
//!   was decoded against, with absence representable in every variant
//! - [`StructValue`]: Named struct fields in declared order
//! - [`decode_value`]: Conversion of an untyped JSON datum into a [`Value`]
//!
//! # Wire Conversions
//!
//! | Type | Accepted raw values |
//! |------|---------------------|
//! | `int64` | JSON numbers with no fractional part in `i64` range, strings holding an `i64` |
//! | `float64` | JSON numbers, strings holding an `f64` (`"NaN"`, `"Infinity"`) |
//! | `string` | JSON strings |
//! | `boolean` | `true`, `false`, `"true"`, `"false"` |
//! | `array` | JSON arrays, each element decoded against the element type |
//! | `struct` | JSON arrays with one positional element per declared field |
//!
//! JSON `null` decodes to an absent value of any type.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value as Json;

use crate::data_type::check_unique_names;
use crate::{DataType, DecodeError, StructField};

/// A decoded feature value.
///
/// Each variant corresponds to one [`DataType`] variant and holds `None` when
/// the server sent no value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int64(Option<i64>),
    Float64(Option<f64>),
    String(Option<String>),
    Boolean(Option<bool>),
    /// Elements decoded against the array's element type.
    Array(Option<Vec<Value>>),
    /// Fields decoded against the struct's declared fields.
    Struct(Option<StructValue>),
}

/// Named fields of a decoded struct, in declared field order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StructValue {
    fields: IndexMap<String, Value>,
}

impl StructValue {
    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Iterate over `(name, value)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterate over field names in declared order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the struct has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consume self and return the underlying ordered map.
    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.fields
    }
}

impl FromIterator<(String, Value)> for StructValue {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Value {
    /// Decode a raw JSON datum against a data type.
    ///
    /// See [`decode_value`].
    pub fn decode(data_type: &DataType, raw: &Json) -> Result<Self, DecodeError> {
        if raw.is_null() {
            return Ok(Self::null(data_type));
        }

        match data_type {
            DataType::Int64 => decode_int64(raw).map(|v| Value::Int64(Some(v))),
            DataType::Float64 => decode_float64(raw).map(|v| Value::Float64(Some(v))),
            DataType::String => match raw {
                Json::String(s) => Ok(Value::String(Some(s.clone()))),
                _ => Err(DecodeError::type_mismatch(data_type, raw)),
            },
            DataType::Boolean => decode_boolean(raw).map(|v| Value::Boolean(Some(v))),
            DataType::Array(element) => {
                let items = raw
                    .as_array()
                    .ok_or_else(|| DecodeError::type_mismatch(data_type, raw))?;
                let values = items
                    .iter()
                    .map(|item| Value::decode(element, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(Some(values)))
            }
            DataType::Struct(fields) => {
                let items = raw
                    .as_array()
                    .ok_or_else(|| DecodeError::type_mismatch(data_type, raw))?;
                decode_struct(fields, items).map(|v| Value::Struct(Some(v)))
            }
        }
    }

    /// Create an absent value of the given type.
    pub fn null(data_type: &DataType) -> Self {
        match data_type {
            DataType::Int64 => Value::Int64(None),
            DataType::Float64 => Value::Float64(None),
            DataType::String => Value::String(None),
            DataType::Boolean => Value::Boolean(None),
            DataType::Array(_) => Value::Array(None),
            DataType::Struct(_) => Value::Struct(None),
        }
    }

    /// Returns true if the server sent no value.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Int64(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::String(v) => v.is_none(),
            Value::Boolean(v) => v.is_none(),
            Value::Array(v) => v.is_none(),
            Value::Struct(v) => v.is_none(),
        }
    }

    /// Get the wire type tag of the variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int64(_) => crate::data_type::INT64,
            Value::Float64(_) => crate::data_type::FLOAT64,
            Value::String(_) => crate::data_type::STRING,
            Value::Boolean(_) => crate::data_type::BOOLEAN,
            Value::Array(_) => crate::data_type::ARRAY,
            Value::Struct(_) => crate::data_type::STRUCT,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => *v,
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => *v,
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => v.as_deref(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => *v,
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => v.as_deref(),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(v) => v.as_ref(),
            _ => None,
        }
    }
}

/// Plain JSON rendering: absent values become `null`, structs become objects
/// in declared field order.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Int64(v) => v.serialize(serializer),
            Value::Float64(v) => v.serialize(serializer),
            Value::String(v) => v.serialize(serializer),
            Value::Boolean(v) => v.serialize(serializer),
            Value::Array(v) => v.serialize(serializer),
            Value::Struct(v) => v.serialize(serializer),
        }
    }
}

/// Decode a raw JSON datum against a data type.
///
/// # Errors
///
/// - [`DecodeError::TypeMismatch`] if a scalar cannot be converted without
///   loss, or a container type receives something other than a JSON array.
/// - [`DecodeError::ShapeMismatch`] if a struct's positional values do not
///   match its declared field count.
/// - [`DecodeError::DuplicateField`] if a struct type repeats a field name.
///
/// The first failing element aborts the decode; no partial arrays or structs
/// are produced.
pub fn decode_value(data_type: &DataType, raw: &Json) -> Result<Value, DecodeError> {
    Value::decode(data_type, raw)
}

/// Exclusive upper bound of `i64` as an `f64` (2^63).
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

fn decode_int64(raw: &Json) -> Result<i64, DecodeError> {
    match raw {
        Json::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= -I64_LIMIT && *f < I64_LIMIT)
                .map(|f| f as i64)
        }),
        Json::String(s) => s.parse().ok(),
        _ => None,
    }
    .ok_or_else(|| DecodeError::type_mismatch(DataType::Int64, raw))
}

fn decode_float64(raw: &Json) -> Result<f64, DecodeError> {
    match raw {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => s.parse().ok(),
        _ => None,
    }
    .ok_or_else(|| DecodeError::type_mismatch(DataType::Float64, raw))
}

fn decode_boolean(raw: &Json) -> Result<bool, DecodeError> {
    match raw {
        Json::Bool(b) => Some(*b),
        Json::String(s) if s == "true" => Some(true),
        Json::String(s) if s == "false" => Some(false),
        _ => None,
    }
    .ok_or_else(|| DecodeError::type_mismatch(DataType::Boolean, raw))
}

fn decode_struct(fields: &[StructField], items: &[Json]) -> Result<StructValue, DecodeError> {
    if items.len() != fields.len() {
        return Err(DecodeError::ShapeMismatch {
            expected: fields.len(),
            actual: items.len(),
        });
    }
    check_unique_names(fields)?;

    fields
        .iter()
        .zip(items)
        .map(|(field, item)| Ok((field.name.clone(), Value::decode(&field.data_type, item)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_values() {
        assert_eq!(decode_value(&DataType::String, &json!("test_string")), Ok(Value::String(Some("test_string".into()))));
        assert_eq!(decode_value(&DataType::Int64, &json!(123)), Ok(Value::Int64(Some(123))));
        assert_eq!(decode_value(&DataType::Float64, &json!(123.45)), Ok(Value::Float64(Some(123.45))));
        assert_eq!(decode_value(&DataType::Boolean, &json!(true)), Ok(Value::Boolean(Some(true))));
    }

    #[test]
    fn test_int64_from_string() {
        assert_eq!(decode_value(&DataType::Int64, &json!("1")), Ok(Value::Int64(Some(1))));
        assert_eq!(
            decode_value(&DataType::Int64, &json!("-9223372036854775808")),
            Ok(Value::Int64(Some(i64::MIN)))
        );
    }

    #[test]
    fn test_int64_from_integral_float() {
        assert_eq!(decode_value(&DataType::Int64, &json!(1.0)), Ok(Value::Int64(Some(1))));
        assert_eq!(decode_value(&DataType::Int64, &json!(-42.0)), Ok(Value::Int64(Some(-42))));
        assert!(decode_value(&DataType::Int64, &json!(1e19)).is_err());
    }

    #[test]
    fn test_int64_rejects_lossy_input() {
        for raw in [json!("abc"), json!(1.5), json!("1.0"), json!(u64::MAX), json!(true)] {
            let err = decode_value(&DataType::Int64, &raw).unwrap_err();
            assert!(matches!(err, DecodeError::TypeMismatch { ref expected, .. } if expected == "int64"), "{raw}");
        }
    }

    #[test]
    fn test_float64_from_string() {
        assert_eq!(decode_value(&DataType::Float64, &json!("2.5")), Ok(Value::Float64(Some(2.5))));
        assert_eq!(
            decode_value(&DataType::Float64, &json!("Infinity")),
            Ok(Value::Float64(Some(f64::INFINITY)))
        );
        let nan = decode_value(&DataType::Float64, &json!("NaN")).unwrap();
        assert!(nan.as_f64().is_some_and(f64::is_nan));
    }

    #[test]
    fn test_float64_from_integer() {
        assert_eq!(decode_value(&DataType::Float64, &json!(669)), Ok(Value::Float64(Some(669.0))));
    }

    #[test]
    fn test_float64_rejects_non_numeric() {
        assert!(matches!(
            decode_value(&DataType::Float64, &json!("fast")),
            Err(DecodeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_boolean_tokens() {
        assert_eq!(decode_value(&DataType::Boolean, &json!("false")), Ok(Value::Boolean(Some(false))));
        for raw in [json!("yes"), json!(1), json!("True")] {
            assert!(decode_value(&DataType::Boolean, &raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn test_string_rejects_number() {
        assert_eq!(
            decode_value(&DataType::String, &json!(2.46)),
            Err(DecodeError::TypeMismatch {
                expected: "string".into(),
                raw: "2.46".into(),
            })
        );
    }

    #[test]
    fn test_null_for_every_type() {
        let types = [
            DataType::Int64,
            DataType::Float64,
            DataType::String,
            DataType::Boolean,
            DataType::array(DataType::Int64),
            DataType::structure([("a", DataType::Int64)]),
        ];
        for data_type in &types {
            let value = decode_value(data_type, &Json::Null).unwrap();
            assert!(value.is_null());
            assert_eq!(value.type_name(), data_type.type_name());
        }
    }

    #[test]
    fn test_array_value_with_nulls() {
        let data_type = DataType::array(DataType::String);
        let value = decode_value(&data_type, &json!(["test_string", null])).unwrap();
        assert_eq!(
            value,
            Value::Array(Some(vec![
                Value::String(Some("test_string".into())),
                Value::String(None),
            ]))
        );
    }

    #[test]
    fn test_nested_array() {
        let data_type = DataType::array(DataType::array(DataType::Int64));
        let value = decode_value(&data_type, &json!([[1, 2, 3], [4, 5, 6], [7, 8, 9]])).unwrap();

        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        let middle: Vec<_> = rows[1].as_array().unwrap().iter().map(|v| v.as_i64().unwrap()).collect();
        assert_eq!(middle, vec![4, 5, 6]);
    }

    #[test]
    fn test_array_of_structs() {
        let data_type = DataType::array(DataType::structure([("a", DataType::Int64), ("b", DataType::String)]));
        let value = decode_value(&data_type, &json!([[1, "x"], [2, "y"]])).unwrap();

        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        let first = entries[0].as_struct().unwrap();
        assert_eq!(first.get("a"), Some(&Value::Int64(Some(1))));
        assert_eq!(first.get("b"), Some(&Value::String(Some("x".into()))));
        let second = entries[1].as_struct().unwrap();
        assert_eq!(second.get("a"), Some(&Value::Int64(Some(2))));
        assert_eq!(second.get("b"), Some(&Value::String(Some("y".into()))));
    }

    #[test]
    fn test_nested_struct() {
        let data_type = DataType::structure([
            (
                "nested_struct",
                DataType::structure([("field1", DataType::String), ("field2", DataType::Float64)]),
            ),
            ("nested_array", DataType::array(DataType::Boolean)),
            ("normal", DataType::Int64),
        ]);
        let value = decode_value(&data_type, &json!([["test_string", 123.45], [true, false], 123])).unwrap();

        let fields = value.as_struct().unwrap();
        assert_eq!(fields.names().collect::<Vec<_>>(), vec!["nested_struct", "nested_array", "normal"]);

        let nested = fields.get("nested_struct").and_then(Value::as_struct).unwrap();
        assert_eq!(nested.get("field1").and_then(Value::as_str), Some("test_string"));
        assert_eq!(nested.get("field2").and_then(Value::as_f64), Some(123.45));
        assert_eq!(
            fields.get("nested_array").and_then(Value::as_array).map(<[Value]>::len),
            Some(2)
        );
        assert_eq!(fields.get("normal").and_then(Value::as_i64), Some(123));
    }

    #[test]
    fn test_struct_length_mismatch() {
        let data_type = DataType::structure([("a", DataType::Int64), ("b", DataType::String)]);
        assert_eq!(
            decode_value(&data_type, &json!([1])),
            Err(DecodeError::ShapeMismatch { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_struct_with_repeated_field_name_rejected() {
        let data_type = DataType::structure([("a", DataType::Int64), ("a", DataType::String)]);
        assert_eq!(
            decode_value(&data_type, &json!([1, "x"])),
            Err(DecodeError::DuplicateField("a".into()))
        );
    }

    #[test]
    fn test_first_element_failure_aborts_array() {
        let data_type = DataType::array(DataType::Int64);
        assert_eq!(
            decode_value(&data_type, &json!([1, "two", "three"])),
            Err(DecodeError::TypeMismatch {
                expected: "int64".into(),
                raw: "\"two\"".into(),
            })
        );
    }

    #[test]
    fn test_container_rejects_non_array() {
        let data_type = DataType::array(DataType::Int64);
        assert!(matches!(
            decode_value(&data_type, &json!({"a": 1})),
            Err(DecodeError::TypeMismatch { ref expected, .. }) if expected == "array<int64>"
        ));
    }

    #[test]
    fn test_serialize_plain_json() {
        let data_type = DataType::structure([
            ("name", DataType::String),
            ("scores", DataType::array(DataType::Float64)),
            ("missing", DataType::Int64),
        ]);
        let value = decode_value(&data_type, &json!(["a", [1.5, null], null])).unwrap();

        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"name":"a","scores":[1.5,null],"missing":null}"#
        );
    }
}
