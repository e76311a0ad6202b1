//! Messages flowing through the dispatcher.
//!
//! Intent actions ask for work (`FetchContent`, `AddContent`, ...); follow-up
//! actions (`UpdateContent`, `UpdateMetadataTypes`, `UpdateUser`) carry results
//! back into the store.

use super::{
    content::{Content, ContentEdit, DeleteTarget, NewContent},
    filters::Filters,
    metadata::MetadataType,
    user::User,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    FetchContent,
    UpdateContent(Vec<Content>),
    AddContent(Box<NewContent>),
    DeleteContent(DeleteTarget),
    EditContent(Box<ContentEdit>),
    UpdateFilters(Filters),
    FetchMetadataTypes,
    UpdateMetadataTypes(Vec<MetadataType>),
    FetchUser,
    UpdateUser(User),
    Logout,
}

impl Action {
    /// Short name used in logs and error reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::FetchContent => "fetch_content",
            Action::UpdateContent(_) => "update_content",
            Action::AddContent(_) => "add_content",
            Action::DeleteContent(_) => "delete_content",
            Action::EditContent(_) => "edit_content",
            Action::UpdateFilters(_) => "update_filters",
            Action::FetchMetadataTypes => "fetch_metadata_types",
            Action::UpdateMetadataTypes(_) => "update_metadata_types",
            Action::FetchUser => "fetch_user",
            Action::UpdateUser(_) => "update_user",
            Action::Logout => "logout",
        }
    }
}
