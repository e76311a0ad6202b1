//! Encodes content changes into the multipart payload used for writes.
//!
//! Encoding is pure: the same changes always produce the same parts in the
//! same order. The multipart body itself is only built at send time.

use crate::models::content::{ContentChanges, UploadFile};
use reqwest::multipart::{Form, Part};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(UploadFile),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentForm {
    parts: Vec<(&'static str, FormValue)>,
}

impl ContentForm {
    pub fn parts(&self) -> &[(&'static str, FormValue)] {
        &self.parts
    }

    /// All text values sent under `name`, in order.
    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter(|(n, _)| *n == name)
            .filter_map(|(_, v)| match v {
                FormValue::Text(t) => Some(t.as_str()),
                FormValue::File(_) => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn text(&mut self, name: &'static str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.parts.push((name, FormValue::Text(value.to_string())));
        }
    }

    pub fn into_multipart(self) -> Form {
        self.parts
            .into_iter()
            .fold(Form::new(), |form, (name, value)| match value {
                FormValue::Text(text) => form.text(name, text),
                FormValue::File(file) => form.part(
                    name,
                    Part::bytes(file.bytes.to_vec()).file_name(file.file_name),
                ),
            })
    }
}

/// Build the write payload for a set of content changes.
///
/// An empty metadata map produces no `metadata` parts at all; clearing
/// metadata needs a separate explicit write.
pub fn encode_content(changes: &ContentChanges) -> ContentForm {
    let mut form = ContentForm::default();

    form.text("title", changes.title.as_ref());
    form.text("description", changes.description.as_ref());
    form.text("additional_notes", changes.notes.as_ref());
    form.text("active", changes.active);
    form.text("original_source", changes.original_source.as_ref());
    form.text("copyright_by", changes.copyrighter.as_ref());
    form.text("copyright_site", changes.copyright_site.as_ref());
    form.text("copyright_notes", changes.copyright.as_ref());
    form.text("copyright_approved", changes.copyright_approved);
    form.text("reviewed_by", changes.reviewer.as_ref());
    form.text(
        "reviewed_on",
        changes
            .reviewed_date
            .map(|date| date.format("%Y-%m-%d").to_string()),
    );
    // The backend stores a full date but only the year is edited.
    form.text(
        "published_date",
        changes
            .date_published
            .as_deref()
            .map(str::trim)
            .filter(|year| !year.is_empty())
            .map(|year| format!("{year}-01-01")),
    );
    form.text("rights_statement", changes.rights_statement.as_ref());
    form.text("status", changes.status.as_ref());

    for metadata in changes.metadata.values().flatten() {
        form.text("metadata", Some(metadata.id));
    }

    if let Some(upload) = &changes.upload {
        form.parts
            .push(("content_file", FormValue::File(upload.clone())));
    }

    form
}
