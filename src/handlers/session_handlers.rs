//! Effects for reference data and the user session.

use crate::{
    errors::ClientResult,
    models::{action::Action, user::User},
    services::api_client::ContentApi,
};
use tracing::{debug, info};

pub async fn fetch_metadata_types(api: &dyn ContentApi) -> ClientResult<Action> {
    let types = api.list_metadata_types().await?;
    debug!(types = types.len(), "fetched metadata types");
    Ok(Action::UpdateMetadataTypes(types))
}

pub async fn fetch_user(api: &dyn ContentApi) -> ClientResult<Action> {
    let user = api.current_user().await?;
    debug!(username = %user.username, "fetched user");
    Ok(Action::UpdateUser(user))
}

/// End the session and fall back to the anonymous user.
pub async fn logout(api: &dyn ContentApi) -> ClientResult<Action> {
    api.logout().await?;
    info!("logged out");
    Ok(Action::UpdateUser(User::default()))
}
