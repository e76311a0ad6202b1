//! Query filters for the content collection.

use super::metadata::MetadataId;
use serde::{Deserialize, Serialize, Serializer};

/// Shapes the content list query. Unset fields are left out of the query
/// string entirely.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Filters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright_approved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year_from: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year_to: Option<i32>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "comma_joined"
    )]
    pub metadata: Vec<MetadataId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl Filters {
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }
}

// Query strings have no list type; the backend splits on commas.
fn comma_joined<S: Serializer>(ids: &[MetadataId], serializer: S) -> Result<S::Ok, S::Error> {
    let joined = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    serializer.serialize_str(&joined)
}
