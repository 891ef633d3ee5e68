//! The get-features request and its wire layout.

use bytes::Bytes;
use indexmap::IndexMap;
use serde::Serialize;
use tecton_client_core::ValidationError;

use super::data::{GetFeaturesRequestData, JoinKeyValue, RequestContextValue};
use super::metadata::{MetadataOptions, WireMetadataOptions};

/// Request body sent to the get-features endpoint.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WireRequest {
    pub params: WireParams,
}

/// The `params` object of a request body.
///
/// Fields serialize in declaration order. Empty maps are omitted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WireParams {
    pub feature_service_name: String,
    pub workspace_name: String,
    pub metadata_options: WireMetadataOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_key_map: Option<IndexMap<String, JoinKeyValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_context_map: Option<IndexMap<String, RequestContextValue>>,
}

/// Validate request parameters and build the request body.
///
/// Checks run in order and stop at the first failure:
/// 1. `workspace_name` is non-empty
/// 2. `feature_service_name` is non-empty
/// 3. at least one map is non-empty
/// 4. every map entry has a non-empty key and value
///
/// # Errors
///
/// Returns [`ValidationError`] naming the first rejected parameter.
pub fn build_request(
    workspace_name: &str,
    feature_service_name: &str,
    request_data: &GetFeaturesRequestData,
    metadata_options: &MetadataOptions,
) -> Result<WireRequest, ValidationError> {
    validate(workspace_name, feature_service_name, request_data)?;
    Ok(assemble(
        workspace_name,
        feature_service_name,
        request_data,
        metadata_options,
    ))
}

fn validate(
    workspace_name: &str,
    feature_service_name: &str,
    request_data: &GetFeaturesRequestData,
) -> Result<(), ValidationError> {
    if workspace_name.is_empty() {
        return Err(ValidationError::InvalidParameter("workspace"));
    }
    if feature_service_name.is_empty() {
        return Err(ValidationError::InvalidParameter("feature_service_name"));
    }
    request_data.validate()
}

fn assemble(
    workspace_name: &str,
    feature_service_name: &str,
    request_data: &GetFeaturesRequestData,
    metadata_options: &MetadataOptions,
) -> WireRequest {
    let join_key_map = Some(request_data.join_key_map())
        .filter(|map| !map.is_empty())
        .cloned();
    let request_context_map = Some(request_data.request_context_map())
        .filter(|map| !map.is_empty())
        .cloned();

    WireRequest {
        params: WireParams {
            feature_service_name: feature_service_name.to_string(),
            workspace_name: workspace_name.to_string(),
            metadata_options: metadata_options.to_wire(),
            join_key_map,
            request_context_map,
        },
    }
}

/// A validated request for feature values from one feature service.
///
/// # Example
///
/// ```ignore
/// use tecton_client::{GetFeaturesRequest, GetFeaturesRequestData, MetadataOptions};
///
/// let request = GetFeaturesRequest::new(
///     "prod",
///     "fraud_detection",
///     GetFeaturesRequestData::new().join_key("user_id", "user_1"),
///     MetadataOptions::all(),
/// )?;
/// let body = request.to_json_string()?;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GetFeaturesRequest {
    workspace_name: String,
    feature_service_name: String,
    request_data: GetFeaturesRequestData,
    metadata_options: MetadataOptions,
}

impl GetFeaturesRequest {
    /// Path of the get-features endpoint, relative to the service URL.
    pub const ENDPOINT: &'static str = "/api/v1/feature-service/get-features";

    /// Create a request, validating its parameters.
    ///
    /// # Errors
    ///
    /// See [`build_request`].
    pub fn new<W, S>(
        workspace_name: W,
        feature_service_name: S,
        request_data: GetFeaturesRequestData,
        metadata_options: MetadataOptions,
    ) -> Result<Self, ValidationError>
    where
        W: Into<String>,
        S: Into<String>,
    {
        let workspace_name = workspace_name.into();
        let feature_service_name = feature_service_name.into();
        validate(&workspace_name, &feature_service_name, &request_data)?;

        Ok(Self {
            workspace_name,
            feature_service_name,
            request_data,
            metadata_options,
        })
    }

    pub fn workspace_name(&self) -> &str {
        &self.workspace_name
    }

    pub fn feature_service_name(&self) -> &str {
        &self.feature_service_name
    }

    pub fn request_data(&self) -> &GetFeaturesRequestData {
        &self.request_data
    }

    pub fn metadata_options(&self) -> &MetadataOptions {
        &self.metadata_options
    }

    /// Build the request body.
    pub fn to_wire(&self) -> WireRequest {
        assemble(
            &self.workspace_name,
            &self.feature_service_name,
            &self.request_data,
            &self.metadata_options,
        )
    }

    /// Serialize the request body to a JSON string.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_wire())
    }

    /// Serialize the request body to JSON bytes.
    pub fn to_json_bytes(&self) -> serde_json::Result<Bytes> {
        serde_json::to_vec(&self.to_wire()).map(Bytes::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::MetadataOption;

    fn join_keys() -> GetFeaturesRequestData {
        GetFeaturesRequestData::new()
            .join_key("test_key", "test_value")
            .join_key("test_none_key", None::<&str>)
    }

    #[test]
    fn test_end_to_end_json() {
        let request = GetFeaturesRequest::new(
            "test_workspace_name",
            "test_feature_service_name",
            join_keys(),
            MetadataOptions::default(),
        )
        .unwrap();

        assert_eq!(
            request.to_json_string().unwrap(),
            concat!(
                r#"{"params":{"feature_service_name":"test_feature_service_name","#,
                r#""workspace_name":"test_workspace_name","#,
                r#""metadata_options":{"include_data_types":true,"include_names":true},"#,
                r#""join_key_map":{"test_key":"test_value","test_none_key":null}}}"#
            )
        );
    }

    #[test]
    fn test_json_bytes_match_string() {
        let request =
            GetFeaturesRequest::new("ws", "fs", join_keys(), MetadataOptions::default()).unwrap();
        assert_eq!(
            request.to_json_bytes().unwrap(),
            Bytes::from(request.to_json_string().unwrap())
        );
    }

    #[test]
    fn test_validation_order() {
        let empty = GetFeaturesRequestData::new();
        let options = MetadataOptions::default();

        assert_eq!(
            build_request("", "", &empty, &options),
            Err(ValidationError::InvalidParameter("workspace"))
        );
        assert_eq!(
            build_request("ws", "", &empty, &options),
            Err(ValidationError::InvalidParameter("feature_service_name"))
        );
        assert_eq!(
            build_request("ws", "fs", &empty, &options),
            Err(ValidationError::InvalidParameter("empty maps"))
        );
    }

    #[test]
    fn test_new_rejects_invalid_parameters() {
        let err = GetFeaturesRequest::new("", "fs", join_keys(), MetadataOptions::default()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidParameter("workspace"));
    }

    #[test]
    fn test_empty_map_omitted() {
        let data = GetFeaturesRequestData::new().request_context("amount", 100_i64);
        let body = build_request("ws", "fs", &data, &MetadataOptions::default()).unwrap();
        let json = serde_json::to_value(&body).unwrap();

        assert!(json["params"].get("join_key_map").is_none());
        assert_eq!(json["params"]["request_context_map"]["amount"], "100");
    }

    #[test]
    fn test_both_maps_in_order() {
        let data = GetFeaturesRequestData::new()
            .join_key("user_id", 42_i64)
            .request_context("amount", 12.5)
            .request_context("merchant", "m1");
        let request = GetFeaturesRequest::new(
            "ws",
            "fs",
            data,
            MetadataOptions::new().with(MetadataOption::SloInfo),
        )
        .unwrap();

        assert_eq!(
            request.to_json_string().unwrap(),
            concat!(
                r#"{"params":{"feature_service_name":"fs","workspace_name":"ws","#,
                r#""metadata_options":{"include_data_types":true,"include_names":true,"include_slo_info":true},"#,
                r#""join_key_map":{"user_id":"42"},"#,
                r#""request_context_map":{"amount":12.5,"merchant":"m1"}}}"#
            )
        );
    }
}
