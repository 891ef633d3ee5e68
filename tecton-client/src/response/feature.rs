//! Feature entries of a get-features response.

use std::fmt;

use serde_json::Value as Json;
use tecton_client_core::{DataType, DecodeError, Value};
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};

/// Serving status of a feature value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureStatus {
    /// The value was found in the online store.
    Present,
    /// No value was found for the join keys, or the value is outside its TTL.
    MissingData,
    /// Retrieval failed in an unknown way.
    Unknown,
}

impl FeatureStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureStatus::Present => "PRESENT",
            FeatureStatus::MissingData => "MISSING_DATA",
            FeatureStatus::Unknown => "UNKNOWN",
        }
    }

    /// Parse a status string as sent by the server.
    pub fn from_wire(status: &str) -> Option<Self> {
        match status {
            "PRESENT" => Some(FeatureStatus::Present),
            "MISSING_DATA" => Some(FeatureStatus::MissingData),
            "UNKNOWN" => Some(FeatureStatus::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded feature: its name, type, value and optional metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureValue {
    namespace: String,
    feature_name: String,
    data_type: DataType,
    value: Value,
    status: Option<FeatureStatus>,
    effective_time: Option<OffsetDateTime>,
}

impl FeatureValue {
    /// Create a feature entry from its full `<namespace>.<feature>` name.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidName`] unless the name contains exactly
    /// one `.`.
    pub fn new(
        name: &str,
        data_type: DataType,
        value: Value,
        status: Option<FeatureStatus>,
        effective_time: Option<OffsetDateTime>,
    ) -> Result<Self, DecodeError> {
        let (namespace, feature_name) = split_feature_name(name)?;
        Ok(Self {
            namespace: namespace.to_string(),
            feature_name: feature_name.to_string(),
            data_type,
            value,
            status,
            effective_time,
        })
    }

    /// Decode a raw value against its metadata entry.
    ///
    /// `metadata` is one element of `metadata.features`; `raw` is the value at
    /// the same index of `result.features`.
    pub fn from_metadata(metadata: &Json, raw: &Json) -> Result<Self, DecodeError> {
        let name = metadata
            .get("name")
            .and_then(Json::as_str)
            .ok_or(DecodeError::MissingField("name"))?;
        let (namespace, feature_name) = split_feature_name(name)?;

        let status = match metadata.get("status") {
            None | Some(Json::Null) => None,
            Some(status) => Some(
                status
                    .as_str()
                    .and_then(FeatureStatus::from_wire)
                    .ok_or_else(|| DecodeError::type_mismatch("feature status", status))?,
            ),
        };

        let effective_time = match metadata.get("effectiveTime") {
            None | Some(Json::Null) => None,
            Some(Json::String(raw_time)) => Some(parse_effective_time(raw_time)?),
            Some(other) => return Err(DecodeError::InvalidTimestamp(other.to_string())),
        };

        let descriptor = metadata
            .get("dataType")
            .ok_or(DecodeError::MissingField("dataType"))?;
        let data_type = DataType::from_descriptor(descriptor)?;
        let value = Value::decode(&data_type, raw)?;

        Ok(Self {
            namespace: namespace.to_string(),
            feature_name: feature_name.to_string(),
            data_type,
            value,
            status,
            effective_time,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn feature_name(&self) -> &str {
        &self.feature_name
    }

    /// Get the `<namespace>.<feature>` name.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.feature_name)
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume self and return the value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Serving status, present only when requested.
    pub fn status(&self) -> Option<FeatureStatus> {
        self.status
    }

    /// Effective serving time, present only when requested.
    pub fn effective_time(&self) -> Option<OffsetDateTime> {
        self.effective_time
    }
}

fn split_feature_name(name: &str) -> Result<(&str, &str), DecodeError> {
    match name.split_once('.') {
        Some((namespace, feature_name)) if !feature_name.contains('.') => {
            Ok((namespace, feature_name))
        }
        _ => Err(DecodeError::InvalidName(name.to_string())),
    }
}

/// Parse an RFC 3339 timestamp. Timestamps without an offset are read as UTC.
fn parse_effective_time(raw: &str) -> Result<OffsetDateTime, DecodeError> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).map(PrimitiveDateTime::assume_utc))
        .map_err(|_| DecodeError::InvalidTimestamp(raw.to_string()))
}
