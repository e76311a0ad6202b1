//! Process-wide application state.
//!
//! The dispatcher loop is the only writer: it applies every action here in
//! arrival order before spawning the action's effect.

use crate::models::{
    action::Action, content::Content, filters::Filters, metadata::MetadataType, user::User,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub content: Vec<Content>,
    pub filters: Filters,
    pub metadata_types: Vec<MetadataType>,
    pub user: User,
}

#[derive(Clone, Default)]
pub struct Store {
    state: Arc<RwLock<AppState>>,
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
        }
    }

    /// Apply the state change an action carries. Intent actions leave the
    /// state alone.
    pub async fn reduce(&self, action: &Action) {
        let mut state = self.state.write().await;
        match action {
            Action::UpdateContent(content) => {
                debug!(items = content.len(), "replacing content list");
                state.content = content.clone();
            }
            Action::UpdateFilters(filters) => state.filters = filters.clone(),
            Action::UpdateMetadataTypes(types) => state.metadata_types = types.clone(),
            Action::UpdateUser(user) => state.user = user.clone(),
            Action::FetchContent
            | Action::AddContent(_)
            | Action::DeleteContent(_)
            | Action::EditContent(_)
            | Action::FetchMetadataTypes
            | Action::FetchUser
            | Action::Logout => {}
        }
    }

    /// The filters as they are right now.
    pub async fn filters(&self) -> Filters {
        self.state.read().await.filters.clone()
    }

    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }
}
