//! Lookup data for get-features requests.
//!
//! Join keys identify the entity whose features are fetched; request
//! context supplies inputs to on-demand feature views. Both maps keep the
//! caller's insertion order on the wire.

use indexmap::IndexMap;
use serde::Serialize;
use tecton_client_core::ValidationError;

/// Wire name of the join-key map.
pub const JOIN_KEY_MAP: &str = "join_key_map";
/// Wire name of the request-context map.
pub const REQUEST_CONTEXT_MAP: &str = "request_context_map";

/// A join-key value: a string, or `null`.
///
/// Integers are sent as their decimal string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct JoinKeyValue(Option<String>);

impl JoinKeyValue {
    /// A `null` join-key value.
    pub fn null() -> Self {
        Self(None)
    }

    /// Get the value, or `None` for `null`.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

impl From<&str> for JoinKeyValue {
    fn from(value: &str) -> Self {
        Self(Some(value.to_string()))
    }
}

impl From<String> for JoinKeyValue {
    fn from(value: String) -> Self {
        Self(Some(value))
    }
}

impl From<i64> for JoinKeyValue {
    fn from(value: i64) -> Self {
        Self(Some(value.to_string()))
    }
}

impl<T: Into<JoinKeyValue>> From<Option<T>> for JoinKeyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::null, Into::into)
    }
}

/// A request-context value: a string or a float.
///
/// Integers are sent as their decimal string.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestContextValue {
    String(String),
    Float(f64),
}

impl From<&str> for RequestContextValue {
    fn from(value: &str) -> Self {
        RequestContextValue::String(value.to_string())
    }
}

impl From<String> for RequestContextValue {
    fn from(value: String) -> Self {
        RequestContextValue::String(value)
    }
}

impl From<i64> for RequestContextValue {
    fn from(value: i64) -> Self {
        RequestContextValue::String(value.to_string())
    }
}

impl From<f64> for RequestContextValue {
    fn from(value: f64) -> Self {
        RequestContextValue::Float(value)
    }
}

/// Join-key and request-context maps for a get-features request.
///
/// # Example
///
/// ```ignore
/// use tecton_client::GetFeaturesRequestData;
///
/// let data = GetFeaturesRequestData::new()
///     .join_key("user_id", "user_1")
///     .join_key("merchant", None::<&str>)
///     .request_context("amount", 42.5);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetFeaturesRequestData {
    join_key_map: IndexMap<String, JoinKeyValue>,
    request_context_map: IndexMap<String, RequestContextValue>,
}

impl GetFeaturesRequestData {
    /// Create empty request data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create request data from prebuilt maps.
    pub fn from_maps(
        join_key_map: IndexMap<String, JoinKeyValue>,
        request_context_map: IndexMap<String, RequestContextValue>,
    ) -> Self {
        Self {
            join_key_map,
            request_context_map,
        }
    }

    /// Add a join key.
    pub fn join_key<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<JoinKeyValue>,
    {
        self.join_key_map.insert(key.into(), value.into());
        self
    }

    /// Add a request-context entry.
    pub fn request_context<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<RequestContextValue>,
    {
        self.request_context_map.insert(key.into(), value.into());
        self
    }

    pub fn join_key_map(&self) -> &IndexMap<String, JoinKeyValue> {
        &self.join_key_map
    }

    pub fn request_context_map(&self) -> &IndexMap<String, RequestContextValue> {
        &self.request_context_map
    }

    /// Returns true if both maps are empty.
    pub fn is_empty(&self) -> bool {
        self.join_key_map.is_empty() && self.request_context_map.is_empty()
    }

    /// Check the maps.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidParameter`] with `"empty maps"` if both
    ///   maps are empty.
    /// - [`ValidationError::InvalidKeyValue`] for the first entry with an
    ///   empty key, an empty join-key string, an empty request-context
    ///   string, or a NaN or infinite request-context float. `null`
    ///   join-key values are allowed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::InvalidParameter("empty maps"));
        }

        for (key, value) in &self.join_key_map {
            if key.is_empty() || value.as_str() == Some("") {
                return Err(ValidationError::InvalidKeyValue {
                    map: JOIN_KEY_MAP,
                    key: key.clone(),
                });
            }
        }

        for (key, value) in &self.request_context_map {
            let invalid_value = match value {
                RequestContextValue::String(s) => s.is_empty(),
                RequestContextValue::Float(f) => !f.is_finite(),
            };
            if key.is_empty() || invalid_value {
                return Err(ValidationError::InvalidKeyValue {
                    map: REQUEST_CONTEXT_MAP,
                    key: key.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_key_conversions() {
        assert_eq!(JoinKeyValue::from("a").as_str(), Some("a"));
        assert_eq!(JoinKeyValue::from(1234_i64).as_str(), Some("1234"));
        assert!(JoinKeyValue::from(None::<&str>).is_null());
        assert_eq!(JoinKeyValue::from(Some(7_i64)).as_str(), Some("7"));
    }

    #[test]
    fn test_request_context_conversions() {
        assert_eq!(RequestContextValue::from(5_i64), RequestContextValue::String("5".into()));
        assert_eq!(RequestContextValue::from(2.5), RequestContextValue::Float(2.5));
        assert_eq!(
            serde_json::to_string(&RequestContextValue::from(2.5)).unwrap(),
            "2.5"
        );
    }

    #[test]
    fn test_both_maps_empty() {
        assert_eq!(
            GetFeaturesRequestData::new().validate(),
            Err(ValidationError::InvalidParameter("empty maps"))
        );
    }

    #[test]
    fn test_single_map_is_enough() {
        assert!(GetFeaturesRequestData::new().join_key("k", "v").validate().is_ok());
        assert!(GetFeaturesRequestData::new().request_context("k", 1.0).validate().is_ok());
    }

    #[test]
    fn test_null_join_key_allowed() {
        let data = GetFeaturesRequestData::new().join_key("k", None::<String>);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_empty_key_rejected() {
        let data = GetFeaturesRequestData::new().join_key("", "v");
        assert_eq!(
            data.validate(),
            Err(ValidationError::InvalidKeyValue {
                map: JOIN_KEY_MAP,
                key: String::new(),
            })
        );
    }

    #[test]
    fn test_empty_values_rejected() {
        let data = GetFeaturesRequestData::new().join_key("user", "");
        assert!(matches!(
            data.validate(),
            Err(ValidationError::InvalidKeyValue { map: JOIN_KEY_MAP, .. })
        ));

        let data = GetFeaturesRequestData::new()
            .join_key("user", "u1")
            .request_context("note", "");
        assert_eq!(
            data.validate(),
            Err(ValidationError::InvalidKeyValue {
                map: REQUEST_CONTEXT_MAP,
                key: "note".into(),
            })
        );
    }

    #[test]
    fn test_non_finite_context_float_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let data = GetFeaturesRequestData::new()
                .join_key("user", "u1")
                .request_context("score", value);
            assert_eq!(
                data.validate(),
                Err(ValidationError::InvalidKeyValue {
                    map: REQUEST_CONTEXT_MAP,
                    key: "score".into(),
                }),
                "{value}"
            );
        }
    }

    #[test]
    fn test_insertion_order_kept() {
        let data = GetFeaturesRequestData::new()
            .join_key("z", "1")
            .join_key("a", "2")
            .join_key("m", "3");
        assert_eq!(data.join_key_map().keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }
}
