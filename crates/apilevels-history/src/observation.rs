//! Per-release class inventories, as produced by whatever scanned the release.

use serde::{Deserialize, Serialize};

use crate::element::ApiVersion;

/// Everything observed in one release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionBatch {
    pub version: ApiVersion,
    #[serde(default)]
    pub classes: Vec<ClassObservation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassObservation {
    /// Internal name, e.g. `java/util/Map$Entry`.
    pub name: String,
    pub deprecated: bool,
    /// Present in the release but not part of its public surface.
    pub hidden: bool,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<MemberObservation>,
    /// Keys of the form `name(descriptor)return`.
    pub methods: Vec<MemberObservation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberObservation {
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
}

impl MemberObservation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deprecated: false,
        }
    }

    pub fn deprecated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deprecated: true,
        }
    }
}
