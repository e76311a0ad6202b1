use anyhow::{Context, Result};
use bytes::Bytes;
use content_desk::{
    config::{AppConfig, Command},
    models::{
        action::Action,
        content::{Content, ContentChanges, ContentEdit, DeleteTarget, NewContent, UploadFile},
        filters::Filters,
        metadata::{Metadata, MetadataMap},
    },
    routes::dispatcher::action_loop,
    services::{
        api_client::{ContentApi, HttpContentApi},
        permissions::{Mode, has_permission},
        store::{AppState, Store},
    },
};
use serde_json::json;
use std::{path::Path, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // --- Parse config + command ---
    let (cfg, command) = AppConfig::from_env_and_args()?;
    tracing::info!(
        "Starting content-desk against {} (token: {})",
        cfg.api_url,
        if cfg.token.is_some() { "set" } else { "none" }
    );

    // --- Wire the action loop ---
    let api: Arc<dyn ContentApi> = Arc::new(HttpContentApi::from_config(&cfg)?);
    let store = Store::default();
    let (actions, dispatcher, mut errors) = action_loop(api, store.clone());
    let shutdown = CancellationToken::new();
    let loop_handle = tokio::spawn(actions.run(shutdown.clone()));

    for action in command_actions(&command).await? {
        dispatcher.dispatch(action);
    }
    dispatcher.settled().await;
    shutdown.cancel();
    loop_handle.await?;

    let mut failures = 0;
    while let Ok(err) = errors.try_recv() {
        eprintln!("error: {}", err);
        failures += 1;
    }

    let state = store.snapshot().await;
    println!("{}", serde_json::to_string_pretty(&render(&command, &state))?);

    if failures > 0 {
        anyhow::bail!("{} operation(s) failed", failures);
    }
    Ok(())
}

/// Translate a CLI command into the intents that carry it out.
async fn command_actions(command: &Command) -> Result<Vec<Action>> {
    let actions = match command {
        Command::List {
            search,
            status,
            active,
            reviewed,
            metadata,
            page,
            page_size,
        } => vec![Action::UpdateFilters(Filters {
            search: search.clone(),
            status: status.clone(),
            active: *active,
            reviewed: *reviewed,
            metadata: metadata.clone(),
            page: *page,
            page_size: *page_size,
            ..Filters::default()
        })],
        Command::Add {
            title,
            file,
            description,
            published_year,
            metadata,
        } => {
            let bytes = tokio::fs::read(file)
                .await
                .with_context(|| format!("reading upload `{}`", file))?;
            let file_name = Path::new(file)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.clone());

            vec![Action::AddContent(Box::new(NewContent {
                content: Content {
                    title: title.clone(),
                    description: description.clone(),
                    date_published: published_year.clone(),
                    active: true,
                    file_name: Some(file_name.clone()),
                    metadata: metadata_from_refs(metadata),
                    ..Content::default()
                },
                upload: Some(UploadFile {
                    file_name,
                    bytes: Bytes::from(bytes),
                }),
            }))]
        }
        Command::Edit {
            id,
            title,
            description,
            status,
            active,
            metadata,
            ..
        } => vec![Action::EditContent(Box::new(ContentEdit {
            id: *id,
            changes: ContentChanges {
                title: title.clone(),
                description: description.clone(),
                status: status.clone(),
                active: *active,
                metadata: metadata_from_refs(metadata),
                ..ContentChanges::default()
            },
        }))],
        Command::Delete { ids } => {
            let target = match ids.as_slice() {
                [id] => DeleteTarget::Single(*id),
                _ => DeleteTarget::Many(ids.clone()),
            };
            vec![Action::DeleteContent(target)]
        }
        Command::MetadataTypes => vec![Action::FetchMetadataTypes],
        Command::Profile | Command::Can { .. } => vec![Action::FetchUser],
        Command::Logout => vec![Action::Logout],
    };
    Ok(actions)
}

/// Group `TYPE:ID` pairs the way fetched metadata is grouped.
fn metadata_from_refs(refs: &[(u64, u64)]) -> MetadataMap {
    let mut grouped = MetadataMap::new();
    for &(type_id, id) in refs {
        grouped
            .entry(type_id)
            .or_default()
            .push(Metadata::reference(id, type_id));
    }
    grouped
}

fn render(command: &Command, state: &AppState) -> serde_json::Value {
    match command {
        Command::List { .. }
        | Command::Add { .. }
        | Command::Edit { .. }
        | Command::Delete { .. } => json!(state.content),
        Command::MetadataTypes => json!(state.metadata_types),
        Command::Profile | Command::Logout => json!({
            "user": state.user,
            "authenticated": state.user.is_authenticated(),
            "admin": state.user.is_admin(),
        }),
        Command::Can {
            slice,
            capabilities,
            any,
        } => {
            let required: Vec<&str> = capabilities.iter().map(String::as_str).collect();
            let mode = if *any { Mode::Any } else { Mode::All };
            let allowed = has_permission(&state.user.permissions, slice, required.as_slice(), mode);
            json!({ "slice": slice, "allowed": allowed })
        }
    }
}
