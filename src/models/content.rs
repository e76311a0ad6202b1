//! Content items: the backend record shape and the front-end view model.

use super::metadata::{MetadataInfo, MetadataMap};
use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};

pub type ContentId = u64;

/// A content record as returned by the content collection endpoint.
///
/// Only the keys the front-end consumes are modelled; anything else in the
/// payload is ignored. Nullable columns are optional here.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ContentRecord {
    #[serde(deserialize_with = "lenient_id")]
    pub id: ContentId,
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub content_file: Option<String>,
    #[serde(default)]
    pub original_source: Option<String>,
    #[serde(default)]
    pub copyright_by: Option<String>,
    #[serde(default)]
    pub copyright_site: Option<String>,
    #[serde(default)]
    pub copyright_notes: Option<String>,
    #[serde(default)]
    pub copyright_approved: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_on: Option<NaiveDate>,
    #[serde(default)]
    pub reviewed: Option<bool>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub reviewed_on: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub filesize: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub published_year: Option<String>,
    #[serde(default)]
    pub rights_statement: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub metadata_info: Vec<MetadataInfo>,
}

/// Content as the application works with it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: ContentId,
    pub title: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
    #[serde(rename = "fileURL")]
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub filesize: Option<f64>,
    pub original_source: Option<String>,
    pub copyrighter: Option<String>,
    pub copyright_site: Option<String>,
    pub copyright: Option<String>,
    pub copyright_approved: bool,
    pub creator: Option<String>,
    pub created_date: Option<NaiveDate>,
    pub reviewed: Option<bool>,
    pub reviewer: Option<String>,
    pub reviewed_date: Option<NaiveDate>,
    pub date_published: Option<String>,
    pub rights_statement: Option<String>,
    pub status: String,
    pub metadata: MetadataMap,
}

/// A file to send as the `content_file` part of a write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Field changes for a content write.
///
/// `None` leaves a field untouched. `metadata` is always carried; an empty
/// map is not transmitted by the form encoder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub active: Option<bool>,
    pub original_source: Option<String>,
    pub copyrighter: Option<String>,
    pub copyright_site: Option<String>,
    pub copyright: Option<String>,
    pub copyright_approved: Option<bool>,
    pub reviewer: Option<String>,
    pub reviewed_date: Option<NaiveDate>,
    pub date_published: Option<String>,
    pub rights_statement: Option<String>,
    pub status: Option<String>,
    pub metadata: MetadataMap,
    pub upload: Option<UploadFile>,
}

impl From<&Content> for ContentChanges {
    fn from(content: &Content) -> Self {
        Self {
            title: Some(content.title.clone()),
            description: content.description.clone(),
            notes: content.notes.clone(),
            active: Some(content.active),
            original_source: content.original_source.clone(),
            copyrighter: content.copyrighter.clone(),
            copyright_site: content.copyright_site.clone(),
            copyright: content.copyright.clone(),
            copyright_approved: Some(content.copyright_approved),
            reviewer: content.reviewer.clone(),
            reviewed_date: content.reviewed_date,
            date_published: content.date_published.clone(),
            rights_statement: content.rights_statement.clone(),
            status: (!content.status.is_empty()).then(|| content.status.clone()),
            metadata: content.metadata.clone(),
            upload: None,
        }
    }
}

/// A new content item together with its file.
#[derive(Clone, Debug, PartialEq)]
pub struct NewContent {
    pub content: Content,
    pub upload: Option<UploadFile>,
}

/// Changes to an existing content item.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentEdit {
    pub id: ContentId,
    pub changes: ContentChanges,
}

/// Ids accepted by a delete, either one or many.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteTarget {
    Single(ContentId),
    Many(Vec<ContentId>),
}

impl DeleteTarget {
    pub fn into_ids(self) -> Vec<ContentId> {
        match self {
            DeleteTarget::Single(id) => vec![id],
            DeleteTarget::Many(ids) => ids,
        }
    }
}

impl From<ContentId> for DeleteTarget {
    fn from(id: ContentId) -> Self {
        DeleteTarget::Single(id)
    }
}

impl From<Vec<ContentId>> for DeleteTarget {
    fn from(ids: Vec<ContentId>) -> Self {
        DeleteTarget::Many(ids)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

/// Ids arrive as numbers from most endpoints but as strings from some.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ContentId, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n
            .as_u64()
            .ok_or_else(|| de::Error::custom(format!("invalid content id {}", n))),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid content id `{}`", s))),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(n)) => Some(n.to_string()),
        Some(NumberOrString::String(s)) => Some(s),
        None => None,
    })
}
