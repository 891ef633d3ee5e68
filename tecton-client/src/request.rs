//! Request building for the get-features endpoint.
//!
//! This module contains request-side types:
//! - [`MetadataOptions`]: Which metadata the server attaches to each feature
//! - [`GetFeaturesRequestData`]: Join-key and request-context maps
//! - [`GetFeaturesRequest`]: A validated request, serializable to the wire body

mod data;
mod get_features;
mod metadata;

pub use data::{
    GetFeaturesRequestData, JOIN_KEY_MAP, JoinKeyValue, REQUEST_CONTEXT_MAP, RequestContextValue,
};
pub use get_features::{GetFeaturesRequest, WireParams, WireRequest, build_request};
pub use metadata::{MetadataOption, MetadataOptions, WireMetadataOptions};
