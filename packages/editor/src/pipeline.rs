//! # Save Pipeline
//!
//! Serialize → validate → submit → report, once per user-triggered save.
//!
//! 1. Session must be `Ready`, otherwise fail fast (no request)
//! 2. Session goes to `Saving`, which blocks a second concurrent save
//! 3. Serialize the surface and validate `{ title, content }`
//! 4. Send the update to the persistence boundary
//! 5. Failure: back to `Ready`, destructive notification, no retry
//! 6. Success: back to `Ready`, refresh signal, success notification
//!
//! Every attempt that gets past step 1 produces exactly one notification.

use crate::errors::EditorError;
use crate::notify::{Notification, NotificationSink, ViewRefresher};
use crate::session::{EditorSession, SaveTicket};
use crate::store::PostStore;
use journal_schema::PostPatch;

pub struct SavePipeline<S, N, R> {
    store: S,
    sink: N,
    refresher: R,
}

impl<S, N, R> SavePipeline<S, N, R>
where
    S: PostStore,
    N: NotificationSink,
    R: ViewRefresher,
{
    pub fn new(store: S, sink: N, refresher: R) -> Self {
        Self {
            store,
            sink,
            refresher,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn save(
        &self,
        document_id: &str,
        title: &str,
        session: &EditorSession,
    ) -> Result<(), EditorError> {
        let ticket = session.begin_save(document_id).map_err(|error| {
            tracing::warn!(document_id, %error, "save refused");
            error
        })?;

        let patch = match session
            .serialize()
            .map_err(EditorError::from)
            .and_then(|content| PostPatch::validated(title, content).map_err(EditorError::from))
        {
            Ok(patch) => patch,
            Err(error) => return Err(self.fail(session, ticket, document_id, error)),
        };

        match self.store.update(document_id, &patch).await {
            Ok(()) => {
                session.finish_save(ticket, true);
                tracing::info!(document_id, blocks = patch.content.blocks.len(), "journal saved");
                self.refresher.refresh();
                self.sink.notify(Notification::saved());
                Ok(())
            }
            Err(error) => Err(self.fail(session, ticket, document_id, error.into())),
        }
    }

    fn fail(
        &self,
        session: &EditorSession,
        ticket: SaveTicket,
        document_id: &str,
        error: EditorError,
    ) -> EditorError {
        session.finish_save(ticket, false);
        tracing::warn!(document_id, %error, "journal not saved");
        self.sink.notify(Notification::save_failed());
        session.recover(ticket);
        error
    }
}
