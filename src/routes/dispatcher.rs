//! Routes actions to the store and to their effect handlers.
//!
//! ## Routing
//! - `FetchContent`       → GET content list with the current filters → `UpdateContent`
//! - `AddContent`         → POST multipart → `FetchContent`
//! - `DeleteContent`      → concurrent DELETEs, all must succeed → `FetchContent`
//! - `EditContent`        → PATCH multipart (+ PATCH `{"metadata": []}`) → `FetchContent`
//! - `UpdateFilters`      → `FetchContent`, no network call
//! - `FetchMetadataTypes` → GET catalog → `UpdateMetadataTypes`
//! - `FetchUser`          → GET user → `UpdateUser`
//! - `Logout`             → POST logout → `UpdateUser(anonymous)`
//!
//! Actions are taken off the queue one at a time and reduced into the
//! store in arrival order. Each effect then runs as its own task, so a slow
//! request never holds up the queue and follow-ups from different effects
//! arrive in whatever order the requests finish.

use crate::{
    errors::{ClientResult, PipelineError},
    handlers::{content_handlers, session_handlers},
    models::action::Action,
    services::{api_client::ContentApi, store::Store},
};
use std::{future::Future, sync::Arc};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info_span, warn};
use uuid::Uuid;

/// Cloneable handle for feeding actions into the loop.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Action>,
    /// Queued actions plus running effects.
    pending: Arc<watch::Sender<usize>>,
}

impl Dispatcher {
    pub fn dispatch(&self, action: Action) {
        self.pending.send_modify(|n| *n += 1);
        if let Err(mpsc::error::SendError(action)) = self.tx.send(action) {
            warn!(action = action.kind(), "dispatcher stopped; dropping action");
            self.done();
        }
    }

    /// Resolves once nothing is queued and no effect is running.
    pub async fn settled(&self) {
        let mut pending = self.pending.subscribe();
        let _ = pending.wait_for(|n| *n == 0).await;
    }

    fn begin(&self) {
        self.pending.send_modify(|n| *n += 1);
    }

    fn done(&self) {
        self.pending.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// The loop that owns the action queue.
pub struct ActionLoop {
    api: Arc<dyn ContentApi>,
    store: Store,
    dispatcher: Dispatcher,
    rx: mpsc::UnboundedReceiver<Action>,
    errors: mpsc::UnboundedSender<PipelineError>,
}

/// Build the loop, a dispatcher handle for it, and the receiving end of the
/// error channel that failed effects are reported on.
pub fn action_loop(
    api: Arc<dyn ContentApi>,
    store: Store,
) -> (ActionLoop, Dispatcher, mpsc::UnboundedReceiver<PipelineError>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (errors, errors_rx) = mpsc::unbounded_channel();
    let (pending, _) = watch::channel(0);
    let dispatcher = Dispatcher {
        tx,
        pending: Arc::new(pending),
    };

    let action_loop = ActionLoop {
        api,
        store,
        dispatcher: dispatcher.clone(),
        rx,
        errors,
    };
    (action_loop, dispatcher, errors_rx)
}

impl ActionLoop {
    /// Process actions until `shutdown` is cancelled.
    ///
    /// Shutdown wins over queued work. Actions still queued when the loop
    /// stops are dropped and released from the pending count.
    pub async fn run(mut self, shutdown: CancellationToken) {
        loop {
            let action = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                action = self.rx.recv() => match action {
                    Some(action) => action,
                    None => break,
                },
            };

            self.handle(action).await;
            self.dispatcher.done();
        }

        // Nothing queued will run now. Release it so `settled` resolves.
        self.rx.close();
        let mut dropped = 0usize;
        while let Ok(action) = self.rx.try_recv() {
            debug!(action = action.kind(), "dropping queued action");
            self.dispatcher.done();
            dropped += 1;
        }
        debug!(dropped, "action loop stopped");
    }

    /// Reduce `action` into the store, then start its effect.
    ///
    /// `FetchContent` reads the filters when it is dequeued here, not when it
    /// was dispatched. Back-to-back `UpdateFilters(a)`, `UpdateFilters(b)`
    /// therefore issue two fetches that both use `b`.
    async fn handle(&self, action: Action) {
        debug!(action = action.kind(), "dispatching");
        self.store.reduce(&action).await;

        let api = self.api.clone();
        match action {
            Action::FetchContent => {
                let filters = self.store.filters().await;
                self.spawn_effect("fetch_content", async move {
                    content_handlers::fetch_content(api.as_ref(), filters).await
                });
            }
            Action::AddContent(new) => self.spawn_effect("add_content", async move {
                content_handlers::add_content(api.as_ref(), *new).await
            }),
            Action::DeleteContent(target) => self.spawn_effect("delete_content", async move {
                content_handlers::delete_content(api.as_ref(), target).await
            }),
            Action::EditContent(edit) => self.spawn_effect("edit_content", async move {
                content_handlers::edit_content(api.as_ref(), *edit).await
            }),
            Action::UpdateFilters(_) => {
                self.dispatcher.dispatch(content_handlers::update_filters())
            }
            Action::FetchMetadataTypes => self.spawn_effect("fetch_metadata_types", async move {
                session_handlers::fetch_metadata_types(api.as_ref()).await
            }),
            Action::FetchUser => self.spawn_effect("fetch_user", async move {
                session_handlers::fetch_user(api.as_ref()).await
            }),
            Action::Logout => self.spawn_effect("logout", async move {
                session_handlers::logout(api.as_ref()).await
            }),
            Action::UpdateContent(_) | Action::UpdateMetadataTypes(_) | Action::UpdateUser(_) => {}
        }
    }

    fn spawn_effect<F>(&self, effect: &'static str, fut: F)
    where
        F: Future<Output = ClientResult<Action>> + Send + 'static,
    {
        let correlation_id = Uuid::new_v4();
        let dispatcher = self.dispatcher.clone();
        let errors = self.errors.clone();

        dispatcher.begin();
        tokio::spawn(
            async move {
                match fut.await {
                    Ok(follow_up) => {
                        debug!(follow_up = follow_up.kind(), "effect finished");
                        dispatcher.dispatch(follow_up);
                    }
                    Err(source) => {
                        error!(error = %source, "effect failed");
                        let _ = errors.send(PipelineError {
                            effect,
                            correlation_id,
                            source,
                        });
                    }
                }
                dispatcher.done();
            }
            .instrument(info_span!("effect", name = effect, id = %correlation_id)),
        );
    }
}
