//! Capability negotiation
//!
//! Backends advertise optional features by name. Names are an open vocabulary: the
//! constants below are the well-known ones, and backends are free to add their own. Lookups
//! ignore ASCII case.

use std::collections::BTreeSet;

/// Layer capabilities, see [`Layer::test_capability`](crate::vector::Layer::test_capability).
pub mod layer {
    pub const RANDOM_READ: &str = "RandomRead";
    pub const SEQUENTIAL_WRITE: &str = "SequentialWrite";
    pub const RANDOM_WRITE: &str = "RandomWrite";
    pub const FAST_SPATIAL_FILTER: &str = "FastSpatialFilter";
    pub const FAST_FEATURE_COUNT: &str = "FastFeatureCount";
    pub const FAST_GET_EXTENT: &str = "FastGetExtent";
    pub const CREATE_FIELD: &str = "CreateField";
    pub const DELETE_FIELD: &str = "DeleteField";
    pub const REORDER_FIELDS: &str = "ReorderFields";
    pub const ALTER_FIELD_DEFN: &str = "AlterFieldDefn";
    pub const DELETE_FEATURE: &str = "DeleteFeature";
    pub const CREATE_GEOM_FIELD: &str = "CreateGeomField";
    pub const STRINGS_AS_UTF8: &str = "StringsAsUTF8";
    pub const TRANSACTIONS: &str = "Transactions";

    /// Everything above except [`TRANSACTIONS`].
    pub const ALL: &[&str] = &[
        RANDOM_READ,
        SEQUENTIAL_WRITE,
        RANDOM_WRITE,
        FAST_SPATIAL_FILTER,
        FAST_FEATURE_COUNT,
        FAST_GET_EXTENT,
        CREATE_FIELD,
        DELETE_FIELD,
        REORDER_FIELDS,
        ALTER_FIELD_DEFN,
        DELETE_FEATURE,
        CREATE_GEOM_FIELD,
        STRINGS_AS_UTF8,
    ];
}

/// Data source capabilities, see
/// [`DataSource::test_capability`](crate::vector::DataSource::test_capability).
pub mod dataset {
    pub const CREATE_LAYER: &str = "CreateLayer";
    pub const DELETE_LAYER: &str = "DeleteLayer";
    pub const CREATE_GEOM_FIELD_AFTER_CREATE_LAYER: &str = "CreateGeomFieldAfterCreateLayer";
    pub const TRANSACTIONS: &str = "Transactions";
}

/// Driver capabilities, see [`Driver::test_capability`](crate::Driver::test_capability).
pub mod driver {
    pub const CREATE_DATA_SOURCE: &str = "CreateDataSource";
    pub const DELETE_DATA_SOURCE: &str = "DeleteDataSource";
}

/// A set of capability names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    names: BTreeSet<String>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name`. Returns `false` if it was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        self.names.insert(name.to_ascii_lowercase())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over the names, lowercased.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for Capabilities {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut caps = Capabilities::new();
        for name in iter {
            caps.insert(name);
        }
        caps
    }
}

impl<'a> Extend<&'a str> for Capabilities {
    fn extend<T: IntoIterator<Item = &'a str>>(&mut self, iter: T) {
        for name in iter {
            self.insert(name);
        }
    }
}
