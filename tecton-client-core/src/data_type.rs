//! Feature data type descriptors.
//!
//! This module provides [`DataType`], the closed set of types a feature value
//! can have, and its construction from the self-describing `dataType` objects
//! found in response metadata:
//!
//! ```json
//! {"type": "array", "elementType": {"type": "int64"}}
//! {"type": "struct", "fields": [{"name": "a", "dataType": {"type": "string"}}]}
//! ```

use std::collections::HashSet;
use std::fmt;

use serde_json::Value as Json;

use crate::DecodeError;

/// Wire type tag for 64-bit integers.
pub const INT64: &str = "int64";
/// Wire type tag for 64-bit floats.
pub const FLOAT64: &str = "float64";
/// Wire type tag for strings.
pub const STRING: &str = "string";
/// Wire type tag for booleans.
pub const BOOLEAN: &str = "boolean";
/// Wire type tag for arrays.
pub const ARRAY: &str = "array";
/// Wire type tag for structs.
pub const STRUCT: &str = "struct";

/// Every type tag the decoder understands.
pub const SUPPORTED_TYPE_NAMES: [&str; 6] = [INT64, FLOAT64, STRING, BOOLEAN, ARRAY, STRUCT];

/// The type of a feature value.
///
/// Container variants own their nested types, so a `DataType` is always a
/// finite tree mirroring the wire schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataType {
    Int64,
    Float64,
    String,
    Boolean,
    /// Array whose elements all have the boxed type.
    Array(Box<DataType>),
    /// Struct with positional, named fields. Field order is significant.
    Struct(Vec<StructField>),
}

/// A named field of a [`DataType::Struct`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructField {
    /// Field name, unique within its struct.
    pub name: String,
    /// Field type.
    pub data_type: DataType,
}

impl StructField {
    /// Create a new struct field.
    pub fn new<S: Into<String>>(name: S, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Build a field from a `{"name": ..., "dataType": {...}}` descriptor.
    fn from_descriptor(descriptor: &Json) -> Result<Self, DecodeError> {
        let name = descriptor
            .get("name")
            .and_then(Json::as_str)
            .ok_or(DecodeError::MissingField("name"))?;
        let data_type = descriptor
            .get("dataType")
            .ok_or(DecodeError::MissingField("dataType"))?;

        Ok(Self::new(name, DataType::from_descriptor(data_type)?))
    }
}

impl DataType {
    /// Create an array type with the given element type.
    pub fn array(element: DataType) -> Self {
        DataType::Array(Box::new(element))
    }

    /// Create a struct type from `(name, type)` pairs, keeping their order.
    pub fn structure<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, DataType)>,
        S: Into<String>,
    {
        DataType::Struct(
            fields
                .into_iter()
                .map(|(name, data_type)| StructField::new(name, data_type))
                .collect(),
        )
    }

    /// Build a type from a wire `dataType` descriptor.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::MissingField`] if the descriptor (or a nested one) has
    ///   no `type` tag, or a struct field has no `name`.
    /// - [`DecodeError::UnsupportedType`] if a tag is outside the supported
    ///   set, or a container lacks its nested descriptor.
    /// - [`DecodeError::DuplicateField`] if a struct repeats a field name.
    pub fn from_descriptor(descriptor: &Json) -> Result<Self, DecodeError> {
        let type_name = descriptor
            .get("type")
            .and_then(Json::as_str)
            .ok_or(DecodeError::MissingField("dataType"))?;

        Self::from_parts(
            type_name,
            descriptor.get("elementType"),
            descriptor.get("fields"),
        )
    }

    /// Build a type from a type tag plus its optional nested descriptors.
    ///
    /// `element_type` is consulted only for `"array"`, `fields` only for
    /// `"struct"`. Nested types are built before this returns, so a malformed
    /// descriptor anywhere in the tree fails the whole construction.
    pub fn from_parts(
        type_name: &str,
        element_type: Option<&Json>,
        fields: Option<&Json>,
    ) -> Result<Self, DecodeError> {
        match type_name {
            INT64 => Ok(DataType::Int64),
            FLOAT64 => Ok(DataType::Float64),
            STRING => Ok(DataType::String),
            BOOLEAN => Ok(DataType::Boolean),
            ARRAY => {
                let element = element_type
                    .filter(|descriptor| descriptor.is_object())
                    .ok_or_else(|| DecodeError::UnsupportedType(ARRAY.to_string()))?;
                Ok(DataType::array(Self::from_descriptor(element)?))
            }
            STRUCT => {
                let fields = fields
                    .and_then(Json::as_array)
                    .ok_or_else(|| DecodeError::UnsupportedType(STRUCT.to_string()))?;
                let fields = fields
                    .iter()
                    .map(StructField::from_descriptor)
                    .collect::<Result<Vec<_>, _>>()?;
                check_unique_names(&fields)?;
                Ok(DataType::Struct(fields))
            }
            other => Err(DecodeError::UnsupportedType(other.to_string())),
        }
    }

    /// Check whether a wire type tag is one the decoder understands.
    pub fn is_supported_type_name(type_name: &str) -> bool {
        SUPPORTED_TYPE_NAMES.contains(&type_name)
    }

    /// Get the wire type tag of this type.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::Int64 => INT64,
            DataType::Float64 => FLOAT64,
            DataType::String => STRING,
            DataType::Boolean => BOOLEAN,
            DataType::Array(_) => ARRAY,
            DataType::Struct(_) => STRUCT,
        }
    }

    /// Get the element type if this is an array.
    pub fn element_type(&self) -> Option<&DataType> {
        match self {
            DataType::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Get the fields if this is a struct.
    pub fn fields(&self) -> Option<&[StructField]> {
        match self {
            DataType::Struct(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Reject a field list that repeats a name.
pub(crate) fn check_unique_names(fields: &[StructField]) -> Result<(), DecodeError> {
    let mut seen = HashSet::with_capacity(fields.len());
    match fields.iter().find(|field| !seen.insert(field.name.as_str())) {
        Some(field) => Err(DecodeError::DuplicateField(field.name.clone())),
        None => Ok(()),
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Array(element) => write!(f, "array<{element}>"),
            DataType::Struct(fields) => {
                f.write_str("struct<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.data_type)?;
                }
                f.write_str(">")
            }
            scalar => f.write_str(scalar.type_name()),
        }
    }
}
