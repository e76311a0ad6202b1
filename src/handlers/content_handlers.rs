//! Effects for content intents.
//!
//! Each handler performs the backend call(s) for one intent and returns the
//! follow-up action to dispatch. Errors are returned untouched; the
//! dispatcher decides where they go.

use crate::{
    errors::{ClientError, ClientResult},
    models::{
        action::Action,
        content::{ContentChanges, ContentEdit, ContentId, DeleteTarget, NewContent},
        filters::Filters,
        metadata::metadata_count,
    },
    services::{api_client::ContentApi, form::encode_content, mapper::map_content_records},
};
use futures::future::join_all;
use serde_json::json;
use tracing::{debug, info, warn};

/// Read the content list with the given filters and map it for the store.
pub async fn fetch_content(api: &dyn ContentApi, filters: Filters) -> ClientResult<Action> {
    let records = api.list_content(&filters).await?;
    debug!(items = records.len(), "fetched content");
    Ok(Action::UpdateContent(map_content_records(records)))
}

/// Create the item, then reload the list so server-assigned fields show up.
pub async fn add_content(api: &dyn ContentApi, new: NewContent) -> ClientResult<Action> {
    let mut changes = ContentChanges::from(&new.content);
    changes.upload = new.upload;

    api.create_content(encode_content(&changes)).await?;
    info!(title = %new.content.title, "content created");
    Ok(Action::FetchContent)
}

/// Delete every id concurrently and reload once all of them succeeded.
///
/// All requests are issued and awaited even when some fail; any failure
/// fails the batch and no reload is emitted.
pub async fn delete_content(api: &dyn ContentApi, target: DeleteTarget) -> ClientResult<Action> {
    let ids = target.into_ids();
    let total = ids.len();

    let results = join_all(ids.iter().map(|&id| delete_one(api, id))).await;

    let mut failed: Vec<ContentId> = Vec::new();
    let mut first = None;
    for (id, err) in results.into_iter().filter_map(Result::err) {
        warn!(id, error = %err, "content delete failed");
        failed.push(id);
        first.get_or_insert(err);
    }

    if let Some(first) = first {
        return Err(ClientError::BatchDelete {
            failed,
            total,
            first: Box::new(first),
        });
    }

    info!(count = total, "content deleted");
    Ok(Action::FetchContent)
}

async fn delete_one(api: &dyn ContentApi, id: ContentId) -> Result<(), (ContentId, ClientError)> {
    api.delete_content(id).await.map_err(|err| (id, err))
}

/// Apply an edit, clearing metadata with a second write when the edit
/// leaves none.
///
/// The multipart encoding drops an empty metadata map, so the clearing
/// write carries `{"metadata": []}` explicitly and is only sent after the
/// primary write has completed.
pub async fn edit_content(api: &dyn ContentApi, edit: ContentEdit) -> ClientResult<Action> {
    let ContentEdit { id, changes } = edit;
    let clears_metadata = metadata_count(&changes.metadata) == 0;

    api.update_content(id, encode_content(&changes)).await?;

    if clears_metadata {
        debug!(id, "clearing metadata");
        api.update_content_json(id, json!({ "metadata": [] })).await?;
    }

    info!(id, "content updated");
    Ok(Action::FetchContent)
}

/// A filter change only needs a reload.
pub fn update_filters() -> Action {
    Action::FetchContent
}
