//! Response decoding for the get-features endpoint.
//!
//! This module contains response-side types:
//! - [`GetFeaturesResponse`]: Decoded feature values plus optional SLO statistics
//! - [`FeatureValue`]: One named, typed feature with its serving metadata
//! - [`SloInformation`]: Server-side latency and size statistics

mod decoder;
mod feature;
mod slo;

pub use decoder::{GetFeaturesResponse, decode_response};
pub use feature::{FeatureStatus, FeatureValue};
pub use slo::SloInformation;
