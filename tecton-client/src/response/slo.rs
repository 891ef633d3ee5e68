//! SLO statistics attached to a get-features response.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tecton_client_core::DecodeError;

/// Server-side latency and size statistics for one request.
///
/// Every field is optional; fields the server did not send stay `None` and
/// are omitted when serialized.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SloInformation {
    /// Whether the request was eligible for the latency SLO.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slo_eligible: Option<bool>,
    /// Total server time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_time_seconds: Option<f64>,
    /// Server time counted against the SLO.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slo_server_time_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamodb_response_size_bytes: Option<f64>,
    /// Maximum latency observed across online store reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_max_latency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_response_size_bytes: Option<f64>,
    /// Reasons the request was not SLO eligible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slo_ineligibility_reasons: Option<Vec<String>>,
}

impl SloInformation {
    /// Read the `sloInfo` object of response metadata.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Json`] if a present field has the wrong JSON type.
    pub fn from_json(raw: &Json) -> Result<Self, DecodeError> {
        Ok(Self::deserialize(raw)?)
    }
}
