//! Metadata entries and the metadata-type catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type MetadataId = u64;
pub type MetadataTypeId = u64;

/// Metadata grouped by the id of its type.
///
/// Each list keeps the order in which entries arrived from the backend.
pub type MetadataMap = BTreeMap<MetadataTypeId, Vec<Metadata>>;

/// A reference-data category every metadata entry belongs to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MetadataType {
    pub id: MetadataTypeId,
    pub name: String,
}

/// A single metadata value attached to a content item.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub id: MetadataId,
    pub name: String,
    pub creator: String,
    pub metadata_type: MetadataType,
}

impl Metadata {
    /// Reference an existing metadata entry by id when only the ids are known.
    pub fn reference(id: MetadataId, type_id: MetadataTypeId) -> Self {
        Self {
            id,
            name: String::new(),
            creator: String::new(),
            metadata_type: MetadataType {
                id: type_id,
                name: String::new(),
            },
        }
    }
}

/// Nested metadata entry as it appears in a content record's `metadata_info`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MetadataInfo {
    pub id: MetadataId,
    pub name: String,
    #[serde(rename = "type")]
    pub type_id: MetadataTypeId,
    pub type_name: String,
}

/// Total number of entries across every type in the map.
pub fn metadata_count(metadata: &MetadataMap) -> usize {
    metadata.values().map(Vec::len).sum()
}
