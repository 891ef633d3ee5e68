//! Metadata options for get-features requests.
//!
//! Metadata options ask the server to annotate each returned feature value
//! with extra information. Names and data types are always requested, since
//! the response decoder cannot type values without them.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// A single metadata flag.
///
/// Variants are declared in wire-name order, so the derived `Ord` matches
/// the canonical serialization order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataOption {
    /// Include the data type of each feature (`include_data_types`).
    DataType,
    /// Include the effective time of each feature (`include_effective_times`).
    EffectiveTime,
    /// Include the name of each feature (`include_names`).
    Name,
    /// Include the serving status of each feature (`include_serving_status`).
    FeatureStatus,
    /// Include SLO statistics for the request (`include_slo_info`).
    SloInfo,
}

impl MetadataOption {
    /// Every option, in wire-name order.
    pub const ALL: [MetadataOption; 5] = [
        MetadataOption::DataType,
        MetadataOption::EffectiveTime,
        MetadataOption::Name,
        MetadataOption::FeatureStatus,
        MetadataOption::SloInfo,
    ];

    /// Get the request field name for this option.
    pub fn wire_name(self) -> &'static str {
        match self {
            MetadataOption::DataType => "include_data_types",
            MetadataOption::EffectiveTime => "include_effective_times",
            MetadataOption::Name => "include_names",
            MetadataOption::FeatureStatus => "include_serving_status",
            MetadataOption::SloInfo => "include_slo_info",
        }
    }

    /// Look up an option by its request field name.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.wire_name() == name)
    }

    /// Returns true for the options that are always sent.
    pub fn is_default(self) -> bool {
        matches!(self, MetadataOption::Name | MetadataOption::DataType)
    }
}

impl fmt::Display for MetadataOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A set of metadata options.
///
/// The set always contains [`MetadataOption::Name`] and
/// [`MetadataOption::DataType`]; constructors and [`FromIterator`] add them
/// if missing. Equality is set equality.
///
/// # Example
///
/// ```ignore
/// use tecton_client::{MetadataOption, MetadataOptions};
///
/// let options = MetadataOptions::new()
///     .with(MetadataOption::SloInfo)
///     .with(MetadataOption::EffectiveTime);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataOptions {
    options: BTreeSet<MetadataOption>,
}

impl MetadataOptions {
    /// Create the default option set: names and data types.
    pub fn new() -> Self {
        Self {
            options: BTreeSet::from([MetadataOption::Name, MetadataOption::DataType]),
        }
    }

    /// Create a set with every option selected.
    pub fn all() -> Self {
        MetadataOption::ALL.into_iter().collect()
    }

    /// Add an option.
    pub fn with(mut self, option: MetadataOption) -> Self {
        self.options.insert(option);
        self
    }

    /// Add an option in place.
    pub fn insert(&mut self, option: MetadataOption) {
        self.options.insert(option);
    }

    /// Check whether an option is selected.
    pub fn contains(&self, option: MetadataOption) -> bool {
        self.options.contains(&option)
    }

    /// Iterate over the selected options in wire-name order.
    pub fn iter(&self) -> impl Iterator<Item = MetadataOption> + '_ {
        self.options.iter().copied()
    }

    /// Build the request representation of this set.
    pub fn to_wire(&self) -> WireMetadataOptions {
        let flag = |option| self.contains(option).then_some(true);
        WireMetadataOptions {
            include_data_types: flag(MetadataOption::DataType),
            include_effective_times: flag(MetadataOption::EffectiveTime),
            include_names: flag(MetadataOption::Name),
            include_serving_status: flag(MetadataOption::FeatureStatus),
            include_slo_info: flag(MetadataOption::SloInfo),
        }
    }
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<MetadataOption> for MetadataOptions {
    fn from_iter<I: IntoIterator<Item = MetadataOption>>(iter: I) -> Self {
        let mut options = Self::new();
        options.options.extend(iter);
        options
    }
}

impl Extend<MetadataOption> for MetadataOptions {
    fn extend<I: IntoIterator<Item = MetadataOption>>(&mut self, iter: I) {
        self.options.extend(iter);
    }
}

/// The `metadata_options` object of a get-features request.
///
/// Unselected options are omitted rather than sent as `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WireMetadataOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_data_types: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_effective_times: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_names: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_serving_status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_slo_info: Option<bool>,
}
