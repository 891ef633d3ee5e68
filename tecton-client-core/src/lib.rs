//! Core value types for the Tecton feature-serving client.
//!
//! This crate provides the typed-value model shared by request building and
//! response decoding in `tecton-client`.
//!
//! ## Modules
//!
//! - [`ValidationError`] and [`DecodeError`]: Error types
//! - [`data_type`]: Feature data type descriptors
//! - [`value`]: Typed feature values and the value decoder

pub mod data_type;
mod error;
pub mod value;

pub use data_type::{DataType, StructField};
pub use error::*;
pub use value::{StructValue, Value, decode_value};
