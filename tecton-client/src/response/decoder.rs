//! Get-features response decoding.
//!
//! This module provides [`decode_response`], which turns a response body of
//! the form
//!
//! ```json
//! {
//!   "result": {"features": ["1", 11292.57]},
//!   "metadata": {
//!     "features": [
//!       {"name": "ns.a", "dataType": {"type": "int64"}},
//!       {"name": "ns.b", "dataType": {"type": "float64"}}
//!     ],
//!     "sloInfo": {"sloEligible": true}
//!   }
//! }
//! ```
//!
//! into a [`GetFeaturesResponse`]. Values and metadata entries are paired by
//! index.

use indexmap::IndexMap;
use serde_json::Value as Json;
use tecton_client_core::{DataType, DecodeError, Value};

use super::feature::FeatureValue;
use super::slo::SloInformation;

/// Decoded get-features response.
#[derive(Clone, Debug, PartialEq)]
pub struct GetFeaturesResponse {
    feature_values: Vec<FeatureValue>,
    slo_info: Option<SloInformation>,
}

impl GetFeaturesResponse {
    /// Decode a parsed response body. See [`decode_response`].
    pub fn from_json(raw: &Json) -> Result<Self, DecodeError> {
        decode_response(raw)
    }

    /// Parse and decode a response body.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Json`] if the bytes are not valid JSON, otherwise
    /// the errors of [`decode_response`].
    pub fn from_slice(body: &[u8]) -> Result<Self, DecodeError> {
        let raw: Json = serde_json::from_slice(body)?;
        decode_response(&raw)
    }

    /// Feature values in response order.
    pub fn feature_values(&self) -> &[FeatureValue] {
        &self.feature_values
    }

    pub fn into_feature_values(self) -> Vec<FeatureValue> {
        self.feature_values
    }

    /// SLO statistics, present only when requested.
    pub fn slo_info(&self) -> Option<&SloInformation> {
        self.slo_info.as_ref()
    }

    /// Get a feature by its `<namespace>.<feature>` name.
    pub fn get(&self, full_name: &str) -> Option<&FeatureValue> {
        let (namespace, feature_name) = full_name.split_once('.')?;
        self.feature_values
            .iter()
            .find(|f| f.namespace() == namespace && f.feature_name() == feature_name)
    }

    /// Map of `<namespace>.<feature>` name to value, in response order.
    pub fn feature_values_map(&self) -> IndexMap<String, &Value> {
        self.feature_values
            .iter()
            .map(|feature| (feature.full_name(), feature.value()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.feature_values.len()
    }

    /// Always false for a successfully decoded response.
    pub fn is_empty(&self) -> bool {
        self.feature_values.is_empty()
    }
}

/// Decode a get-features response body.
///
/// The response shape is checked before any value is decoded:
/// 1. `result.features` is a non-empty array, else [`DecodeError::EmptyResult`]
/// 2. `metadata.features` is an array, else [`DecodeError::MissingField`]
/// 3. both arrays have the same length, else [`DecodeError::ShapeMismatch`]
/// 4. each metadata entry has a string `name` and a supported
///    `dataType.type`, else [`DecodeError::MissingField`]
///
/// Values are then decoded in order; the first failure aborts the decode.
pub fn decode_response(raw: &Json) -> Result<GetFeaturesResponse, DecodeError> {
    let values = raw
        .pointer("/result/features")
        .and_then(Json::as_array)
        .filter(|values| !values.is_empty())
        .ok_or(DecodeError::EmptyResult)?;

    let metadata = raw
        .get("metadata")
        .ok_or(DecodeError::MissingField("metadata"))?;
    let entries = metadata
        .get("features")
        .and_then(Json::as_array)
        .ok_or(DecodeError::MissingField("metadata"))?;

    if entries.len() != values.len() {
        return Err(DecodeError::ShapeMismatch {
            expected: values.len(),
            actual: entries.len(),
        });
    }

    for entry in entries {
        check_metadata_entry(entry)?;
    }

    let feature_values = entries
        .iter()
        .zip(values)
        .map(|(entry, value)| FeatureValue::from_metadata(entry, value))
        .collect::<Result<Vec<_>, _>>()?;

    let slo_info = metadata
        .get("sloInfo")
        .filter(|slo| !slo.is_null())
        .map(SloInformation::from_json)
        .transpose()?;

    Ok(GetFeaturesResponse {
        feature_values,
        slo_info,
    })
}

fn check_metadata_entry(entry: &Json) -> Result<(), DecodeError> {
    if entry.get("name").and_then(Json::as_str).is_none() {
        return Err(DecodeError::MissingField("name"));
    }

    let type_name = entry
        .get("dataType")
        .and_then(|data_type| data_type.get("type"))
        .and_then(Json::as_str);
    if !type_name.is_some_and(DataType::is_supported_type_name) {
        return Err(DecodeError::MissingField("dataType"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::FeatureStatus;
    use serde_json::json;

    fn fraud_response() -> Json {
        json!({
            "result": {"features": ["1", 11292.571748310578]},
            "metadata": {
                "features": [
                    {
                        "name": "transaction_amount_is_high.transaction_amount_is_high",
                        "dataType": {"type": "int64"}
                    },
                    {
                        "name": "transaction_distance_from_home.dist_km",
                        "dataType": {"type": "float64"}
                    }
                ]
            }
        })
    }

    #[test]
    fn test_end_to_end_decode() {
        let response = decode_response(&fraud_response()).unwrap();

        assert_eq!(response.len(), 2);
        assert!(response.slo_info().is_none());

        let map = response.feature_values_map();
        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec![
                "transaction_amount_is_high.transaction_amount_is_high",
                "transaction_distance_from_home.dist_km"
            ]
        );
        assert_eq!(
            map["transaction_amount_is_high.transaction_amount_is_high"],
            &Value::Int64(Some(1))
        );
        assert_eq!(
            map["transaction_distance_from_home.dist_km"],
            &Value::Float64(Some(11292.571748310578))
        );
    }

    #[test]
    fn test_from_slice() {
        let body = serde_json::to_vec(&fraud_response()).unwrap();
        let response = GetFeaturesResponse::from_slice(&body).unwrap();
        let feature = response.get("transaction_distance_from_home.dist_km").unwrap();
        assert_eq!(feature.data_type(), &DataType::Float64);
    }

    #[test]
    fn test_from_slice_malformed_json() {
        assert!(matches!(
            GetFeaturesResponse::from_slice(b"{\"result\":"),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_mixed_response_with_metadata() {
        let raw = json!({
            "result": {"features": [true, null, "669", 842.86, ["a", "b"], ["2.46", 2.46]]},
            "metadata": {
                "features": [
                    {"name": "fs.flag", "dataType": {"type": "boolean"}, "status": "PRESENT",
                     "effectiveTime": "2023-05-03T00:00:00Z"},
                    {"name": "fs.missing", "dataType": {"type": "float64"}, "status": "MISSING_DATA"},
                    {"name": "fs.count", "dataType": {"type": "int64"}, "status": "PRESENT"},
                    {"name": "fs.amount", "dataType": {"type": "float64"}},
                    {"name": "fs.ids", "dataType": {"type": "array", "elementType": {"type": "string"}}},
                    {"name": "fs.pair", "dataType": {"type": "struct", "fields": [
                        {"name": "as_string", "dataType": {"type": "string"}},
                        {"name": "as_float", "dataType": {"type": "float64"}}
                    ]}}
                ],
                "sloInfo": {
                    "sloEligible": true,
                    "serverTimeSeconds": 0.049082851,
                    "sloServerTimeSeconds": 0.039343822,
                    "storeResponseSizeBytes": 204
                }
            }
        });
        let response = decode_response(&raw).unwrap();
        let features = response.feature_values();

        assert_eq!(features[0].value(), &Value::Boolean(Some(true)));
        assert!(features[0].effective_time().is_some());
        assert_eq!(features[1].value(), &Value::Float64(None));
        assert_eq!(features[1].status(), Some(FeatureStatus::MissingData));
        assert_eq!(features[2].value().as_i64(), Some(669));
        assert_eq!(features[3].status(), None);
        assert_eq!(features[4].value().as_array().map(<[Value]>::len), Some(2));

        let pair = features[5].value().as_struct().unwrap();
        assert_eq!(pair.get("as_string").and_then(Value::as_str), Some("2.46"));
        assert_eq!(pair.get("as_float").and_then(Value::as_f64), Some(2.46));

        let slo = response.slo_info().unwrap();
        assert_eq!(slo.slo_eligible, Some(true));
        assert_eq!(slo.store_response_size_bytes, Some(204.0));
        assert_eq!(slo.store_max_latency, None);
    }

    #[test]
    fn test_empty_result() {
        let raw = json!({"result": {"features": []}, "metadata": {"features": []}});
        assert_eq!(decode_response(&raw), Err(DecodeError::EmptyResult));

        let raw = json!({"metadata": {"features": []}});
        assert_eq!(decode_response(&raw), Err(DecodeError::EmptyResult));
    }

    #[test]
    fn test_missing_metadata() {
        let raw = json!({"result": {"features": [1]}});
        assert_eq!(decode_response(&raw), Err(DecodeError::MissingField("metadata")));
    }

    #[test]
    fn test_length_mismatch() {
        let raw = json!({
            "result": {"features": [1, 2]},
            "metadata": {"features": [{"name": "a.b", "dataType": {"type": "int64"}}]}
        });
        assert_eq!(
            decode_response(&raw),
            Err(DecodeError::ShapeMismatch { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_missing_name_fails_before_decoding() {
        let raw = json!({
            "result": {"features": ["not a number", 2]},
            "metadata": {"features": [
                {"name": "a.b", "dataType": {"type": "int64"}},
                {"dataType": {"type": "int64"}}
            ]}
        });
        assert_eq!(decode_response(&raw), Err(DecodeError::MissingField("name")));
    }

    #[test]
    fn test_missing_or_unknown_data_type() {
        for data_type in [json!(null), json!({}), json!({"type": "decimal"})] {
            let raw = json!({
                "result": {"features": [1, 2]},
                "metadata": {"features": [
                    {"name": "a.b", "dataType": {"type": "int64"}},
                    {"name": "a.c", "dataType": data_type}
                ]}
            });
            assert_eq!(decode_response(&raw), Err(DecodeError::MissingField("dataType")));
        }
    }

    #[test]
    fn test_invalid_name() {
        for name in ["a.b.c", "noseparator"] {
            let raw = json!({
                "result": {"features": [1]},
                "metadata": {"features": [{"name": name, "dataType": {"type": "int64"}}]}
            });
            assert_eq!(decode_response(&raw), Err(DecodeError::InvalidName(name.to_string())));
        }
    }

    #[test]
    fn test_float_valued_slo_sizes_keep_features() {
        let mut raw = fraud_response();
        raw["metadata"]["sloInfo"] = json!({"storeResponseSizeBytes": 204.0, "sloEligible": true});

        let response = decode_response(&raw).unwrap();

        assert_eq!(response.len(), 2);
        assert_eq!(response.slo_info().unwrap().store_response_size_bytes, Some(204.0));
    }

    #[test]
    fn test_value_failure_aborts() {
        let raw = json!({
            "result": {"features": [1, "abc"]},
            "metadata": {"features": [
                {"name": "a.b", "dataType": {"type": "int64"}},
                {"name": "a.c", "dataType": {"type": "int64"}}
            ]}
        });
        assert!(matches!(
            decode_response(&raw),
            Err(DecodeError::TypeMismatch { .. })
        ));
    }
}
