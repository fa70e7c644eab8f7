//! # Editor Session
//!
//! Owns one editing surface bound to one document id.
//!
//! ```text
//! Unmounted -> Mounting -> Ready -> Saving -> Ready
//!                  |                   |
//!                  v                   v
//!              MountFailed          SaveFailed -> Ready
//! ```
//!
//! ## Mounting
//!
//! `attach` starts a single tool-set load and parks it in the `Mounting`
//! state as a shared future. A second `attach` for the same id awaits the
//! same load instead of starting another. Every mount gets a generation
//! number; `detach` (or switching documents) bumps it, and a load that
//! finishes for an old generation is dropped without touching state.
//!
//! ## Locking
//!
//! State sits behind a plain mutex that is never held across an `.await`.
//! The only suspension points are the tool load and the save request.

use crate::config::EditorConfig;
use crate::errors::{EditorError, MountError, NotReadyError};
use crate::surface::{HolderRegistry, Surface};
use crate::tools::{BuiltinTools, ToolLoader};
use futures::future::{BoxFuture, FutureExt, Shared};
use journal_blocks::{ContentDocument, ToolRegistry};
use journal_schema::{validate_seed, PostRecord};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type PendingMount = Shared<BoxFuture<'static, Result<Arc<ToolRegistry>, MountError>>>;

/// Externally visible session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unmounted,
    Mounting,
    Ready,
    Saving,
    /// Ready, with the last save having failed
    SaveFailed,
    MountFailed,
}

impl SessionStatus {
    /// Whether the surface exists and accepts edits
    pub fn is_live(self) -> bool {
        matches!(
            self,
            SessionStatus::Ready | SessionStatus::Saving | SessionStatus::SaveFailed
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::Unmounted => "unmounted",
            SessionStatus::Mounting => "mounting",
            SessionStatus::Ready => "ready",
            SessionStatus::Saving => "saving",
            SessionStatus::SaveFailed => "save-failed",
            SessionStatus::MountFailed => "mount-failed",
        };
        f.write_str(name)
    }
}

/// Proof that a save moved the session into `Saving`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SaveTicket {
    generation: u64,
}

struct Mount {
    document_id: String,
    generation: u64,
    seed: ContentDocument,
    pending: PendingMount,
}

struct Live {
    document_id: String,
    generation: u64,
    surface: Surface,
}

enum Phase {
    Unmounted,
    Mounting(Mount),
    Ready(Live),
    Saving(Live),
    SaveFailed(Live),
    MountFailed {
        document_id: String,
        generation: u64,
        error: MountError,
    },
}

impl Phase {
    fn status(&self) -> SessionStatus {
        match self {
            Phase::Unmounted => SessionStatus::Unmounted,
            Phase::Mounting(_) => SessionStatus::Mounting,
            Phase::Ready(_) => SessionStatus::Ready,
            Phase::Saving(_) => SessionStatus::Saving,
            Phase::SaveFailed(_) => SessionStatus::SaveFailed,
            Phase::MountFailed { .. } => SessionStatus::MountFailed,
        }
    }

    fn live(&self) -> Option<&Live> {
        match self {
            Phase::Ready(live) | Phase::Saving(live) | Phase::SaveFailed(live) => Some(live),
            _ => None,
        }
    }

    fn live_mut(&mut self) -> Option<&mut Live> {
        match self {
            Phase::Ready(live) | Phase::Saving(live) | Phase::SaveFailed(live) => Some(live),
            _ => None,
        }
    }

    fn document_id(&self) -> Option<&str> {
        match self {
            Phase::Unmounted => None,
            Phase::Mounting(mount) => Some(&mount.document_id),
            Phase::MountFailed { document_id, .. } => Some(document_id),
            live => live.live().map(|l| l.document_id.as_str()),
        }
    }
}

struct SessionInner {
    phase: Phase,
    generation: u64,
    title: String,
}

impl SessionInner {
    /// Drop whatever surface or pending mount exists
    fn release(&mut self) {
        self.generation += 1;
        let previous = std::mem::replace(&mut self.phase, Phase::Unmounted);
        if !matches!(previous, Phase::Unmounted) {
            tracing::debug!(
                from = %previous.status(),
                document_id = previous.document_id().unwrap_or_default(),
                "editor detached"
            );
        }
    }
}

enum MountStep {
    AlreadyLive,
    Await { generation: u64, pending: PendingMount },
}

/// Single editing session for one document at a time
pub struct EditorSession {
    inner: Mutex<SessionInner>,
    loader: Arc<dyn ToolLoader>,
    holders: HolderRegistry,
    config: EditorConfig,
}

impl EditorSession {
    pub fn new(config: EditorConfig, loader: Arc<dyn ToolLoader>, holders: HolderRegistry) -> Self {
        Self {
            inner: Mutex::new(SessionInner {
                phase: Phase::Unmounted,
                generation: 0,
                title: String::new(),
            }),
            loader,
            holders,
            config,
        }
    }

    /// Session with the built-in tools and its own holder registry
    pub fn with_builtin_tools(config: EditorConfig) -> Self {
        Self::new(config, Arc::new(BuiltinTools), HolderRegistry::new())
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.lock().phase.status()
    }

    /// Document the session is attached (or attaching) to
    pub fn document_id(&self) -> Option<String> {
        self.lock().phase.document_id().map(str::to_string)
    }

    /// Why the last mount failed, while in `MountFailed`
    pub fn mount_error(&self) -> Option<MountError> {
        match &self.lock().phase {
            Phase::MountFailed { error, .. } => Some(error.clone()),
            _ => None,
        }
    }

    /// Live title value; editable in any state
    pub fn current_title(&self) -> String {
        self.lock().title.clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.lock().title = title.into();
    }

    /// Attach to a persisted record: validate its content, seed the title,
    /// then mount
    ///
    /// Already live or mounting for `record.id` is a no-op that never looks
    /// at the record, so local edits survive. Otherwise a seed that fails
    /// validation leaves the session in `MountFailed`.
    pub async fn attach_record(&self, record: &PostRecord) -> Result<(), EditorError> {
        let existing = joinable(&self.lock().phase, &record.id);
        if let Some(step) = existing {
            return self.run_mount(&record.id, step).await;
        }

        let seed = match validate_seed(record) {
            Ok(seed) => seed,
            Err(error) => {
                let error = MountError::Seed(error);
                let mut inner = self.lock();
                inner.release();
                tracing::warn!(document_id = %record.id, %error, "seed rejected");
                inner.phase = Phase::MountFailed {
                    document_id: record.id.clone(),
                    generation: inner.generation,
                    error: error.clone(),
                };
                return Err(error.into());
            }
        };

        {
            let mut inner = self.lock();
            if inner.phase.document_id() != Some(record.id.as_str())
                || matches!(inner.phase, Phase::MountFailed { .. })
            {
                inner.title = record.title.clone();
            }
        }

        self.attach(&record.id, seed).await
    }

    /// Mount a surface for `document_id` seeded with `seed`
    ///
    /// No-op if already live for the same id; joins the in-flight load if
    /// already mounting it; detaches first if bound to another id.
    pub async fn attach(&self, document_id: &str, seed: ContentDocument) -> Result<(), EditorError> {
        let step = self.begin_mount(document_id, seed);
        self.run_mount(document_id, step).await
    }

    /// Release the surface; safe from any state
    pub fn detach(&self) {
        self.lock().release();
    }

    /// Current blocks plus a fresh timestamp
    pub fn serialize(&self) -> Result<ContentDocument, NotReadyError> {
        let inner = self.lock();
        inner
            .phase
            .live()
            .map(|live| live.surface.snapshot())
            .ok_or(NotReadyError {
                operation: "serialize",
                status: inner.phase.status(),
            })
    }

    /// Run `f` against the live surface
    pub fn edit<T>(&self, f: impl FnOnce(&mut Surface) -> T) -> Result<T, NotReadyError> {
        let mut inner = self.lock();
        let status = inner.phase.status();
        match inner.phase.live_mut() {
            Some(live) => Ok(f(&mut live.surface)),
            None => Err(NotReadyError {
                operation: "edit",
                status,
            }),
        }
    }

    /// `Ready` → `Saving`; anything else is refused
    pub(crate) fn begin_save(&self, document_id: &str) -> Result<SaveTicket, EditorError> {
        let mut inner = self.lock();
        let status = inner.phase.status();
        if !matches!(status, SessionStatus::Ready | SessionStatus::SaveFailed) {
            return Err(NotReadyError {
                operation: "save",
                status,
            }
            .into());
        }

        if let Some(live) = inner.phase.live().filter(|l| l.document_id != document_id) {
            return Err(EditorError::DocumentMismatch {
                requested: document_id.to_string(),
                attached: live.document_id.clone(),
            });
        }

        let live = match std::mem::replace(&mut inner.phase, Phase::Unmounted) {
            Phase::Ready(live) | Phase::SaveFailed(live) => live,
            other => {
                inner.phase = other;
                return Err(NotReadyError {
                    operation: "save",
                    status,
                }
                .into());
            }
        };

        let ticket = SaveTicket {
            generation: live.generation,
        };
        inner.phase = Phase::Saving(live);
        tracing::debug!(document_id, "editor saving");
        Ok(ticket)
    }

    /// `Saving` → `Ready` on success, `Saving` → `SaveFailed` otherwise
    ///
    /// Ignored if the session was detached while the save was in flight.
    pub(crate) fn finish_save(&self, ticket: SaveTicket, succeeded: bool) {
        let mut inner = self.lock();
        let live = match std::mem::replace(&mut inner.phase, Phase::Unmounted) {
            Phase::Saving(live) if live.generation == ticket.generation => live,
            other => {
                inner.phase = other;
                return;
            }
        };

        inner.phase = if succeeded {
            Phase::Ready(live)
        } else {
            Phase::SaveFailed(live)
        };
        tracing::debug!(status = %inner.phase.status(), "save finished");
    }

    /// `SaveFailed` → `Ready` once the failure has been reported
    pub(crate) fn recover(&self, ticket: SaveTicket) {
        let mut inner = self.lock();
        let live = match std::mem::replace(&mut inner.phase, Phase::Unmounted) {
            Phase::SaveFailed(live) if live.generation == ticket.generation => live,
            other => {
                inner.phase = other;
                return;
            }
        };
        inner.phase = Phase::Ready(live);
    }

    async fn run_mount(&self, document_id: &str, step: MountStep) -> Result<(), EditorError> {
        let (generation, pending) = match step {
            MountStep::AlreadyLive => return Ok(()),
            MountStep::Await { generation, pending } => (generation, pending),
        };

        let loaded = pending.await;
        self.complete_mount(document_id, generation, loaded)?;
        Ok(())
    }

    fn begin_mount(&self, document_id: &str, seed: ContentDocument) -> MountStep {
        let mut inner = self.lock();
        if let Some(step) = joinable(&inner.phase, document_id) {
            return step;
        }

        inner.release();
        let generation = inner.generation;
        let loader = Arc::clone(&self.loader);
        let pending = async move { loader.load().await.map(Arc::new) }
            .boxed()
            .shared();

        tracing::debug!(document_id, generation, "editor mounting");
        inner.phase = Phase::Mounting(Mount {
            document_id: document_id.to_string(),
            generation,
            seed,
            pending: pending.clone(),
        });

        MountStep::Await {
            generation,
            pending,
        }
    }

    fn complete_mount(
        &self,
        document_id: &str,
        generation: u64,
        loaded: Result<Arc<ToolRegistry>, MountError>,
    ) -> Result<(), MountError> {
        let mut inner = self.lock();
        let mount = match std::mem::replace(&mut inner.phase, Phase::Unmounted) {
            Phase::Mounting(mount) if mount.generation == generation => mount,
            other => {
                inner.phase = other;
                return settled(&inner.phase, document_id, generation);
            }
        };

        let surface = loaded.and_then(|tools| {
            let claim = self.holders.claim(&self.config.holder)?;
            Ok(Surface::new(claim, tools, mount.seed, &self.config))
        });

        match surface {
            Ok(surface) => {
                tracing::debug!(document_id, blocks = surface.len(), "editor ready");
                inner.phase = Phase::Ready(Live {
                    document_id: mount.document_id,
                    generation,
                    surface,
                });
                Ok(())
            }
            Err(error) => {
                tracing::warn!(document_id, %error, "editor mount failed");
                inner.phase = Phase::MountFailed {
                    document_id: mount.document_id,
                    generation,
                    error: error.clone(),
                };
                Err(error)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Step for an attach to `document_id` that needs no new mount
fn joinable(phase: &Phase, document_id: &str) -> Option<MountStep> {
    match phase {
        Phase::Mounting(mount) if mount.document_id == document_id => {
            tracing::debug!(document_id, "joining in-flight mount");
            Some(MountStep::Await {
                generation: mount.generation,
                pending: mount.pending.clone(),
            })
        }
        phase if phase.live().is_some_and(|l| l.document_id == document_id) => {
            Some(MountStep::AlreadyLive)
        }
        _ => None,
    }
}

/// Outcome for a waiter whose mount was already settled by someone else
fn settled(phase: &Phase, document_id: &str, generation: u64) -> Result<(), MountError> {
    match phase {
        live if live.live().is_some_and(|l| l.generation == generation) => Ok(()),
        Phase::MountFailed {
            generation: failed,
            error,
            ..
        } if *failed == generation => Err(error.clone()),
        _ => {
            tracing::debug!(document_id, generation, "discarding stale mount");
            Err(MountError::Cancelled(document_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::channel::oneshot;
    use journal_blocks::Block;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Loader that stays pending until the test opens the gate
    struct GatedLoader {
        gate: Mutex<Option<oneshot::Receiver<()>>>,
        calls: AtomicUsize,
    }

    impl GatedLoader {
        fn new() -> (Arc<Self>, oneshot::Sender<()>) {
            let (tx, rx) = oneshot::channel();
            let loader = Arc::new(Self {
                gate: Mutex::new(Some(rx)),
                calls: AtomicUsize::new(0),
            });
            (loader, tx)
        }
    }

    #[async_trait]
    impl ToolLoader for GatedLoader {
        async fn load(&self) -> Result<ToolRegistry, MountError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(ToolRegistry::builtin())
        }
    }

    struct FailingLoader;

    #[async_trait]
    impl ToolLoader for FailingLoader {
        async fn load(&self) -> Result<ToolRegistry, MountError> {
            Err(MountError::ToolLoad("network unreachable".to_string()))
        }
    }

    fn seed() -> ContentDocument {
        ContentDocument::new(vec![Block::header("Day 1", 2), Block::paragraph("hello")])
    }

    #[test]
    fn test_session_starts_unmounted() {
        let session = EditorSession::with_builtin_tools(EditorConfig::default());
        assert_eq!(session.status(), SessionStatus::Unmounted);
        assert!(session.document_id().is_none());

        let err = session.serialize().unwrap_err();
        assert_eq!(err.status, SessionStatus::Unmounted);
        assert_eq!(err.operation, "serialize");
    }

    #[test]
    fn test_title_editing_does_not_need_surface() {
        let session = EditorSession::with_builtin_tools(EditorConfig::default());
        session.set_title("Draft title");
        assert_eq!(session.current_title(), "Draft title");
    }

    #[test]
    fn test_attach_then_serialize() {
        futures::executor::block_on(async {
            let session = EditorSession::with_builtin_tools(EditorConfig::default());
            session.attach("p1", seed()).await.unwrap();

            assert_eq!(session.status(), SessionStatus::Ready);
            let doc = session.serialize().unwrap();
            assert_eq!(doc.blocks, seed().blocks);
            assert!(doc.time.is_some());
        });
    }

    #[test]
    fn test_attach_same_id_is_noop() {
        futures::executor::block_on(async {
            let session = EditorSession::with_builtin_tools(EditorConfig::default());
            session.attach("p1", seed()).await.unwrap();
            session.edit(|s| s.push(Block::paragraph("edited"))).unwrap().unwrap();

            // A re-attach must not rebuild the surface from the seed
            session.attach("p1", seed()).await.unwrap();
            assert_eq!(session.serialize().unwrap().blocks.len(), 3);
        });
    }

    #[test]
    fn test_concurrent_attach_shares_one_load() {
        futures::executor::block_on(async {
            let (loader, gate) = GatedLoader::new();
            let session =
                EditorSession::new(EditorConfig::default(), loader.clone(), HolderRegistry::new());

            let first = session.attach("p1", seed());
            let second = session.attach("p1", seed());
            let opener = async {
                gate.send(()).unwrap();
            };

            let (a, b, ()) = futures::join!(first, second, opener);
            assert!(a.is_ok());
            assert!(b.is_ok());
            assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
            assert_eq!(session.status(), SessionStatus::Ready);
        });
    }

    #[test]
    fn test_detach_while_mounting_discards_late_load() {
        futures::executor::block_on(async {
            let (loader, gate) = GatedLoader::new();
            let holders = HolderRegistry::new();
            let session = EditorSession::new(EditorConfig::default(), loader, holders.clone());

            let mut attach = Box::pin(session.attach("p1", seed()));
            assert!(futures::poll!(attach.as_mut()).is_pending());
            assert_eq!(session.status(), SessionStatus::Mounting);

            session.detach();
            gate.send(()).unwrap();

            let result = attach.await;
            assert!(matches!(
                result,
                Err(EditorError::Mount(MountError::Cancelled(ref id))) if id == "p1"
            ));
            assert_eq!(session.status(), SessionStatus::Unmounted);
            assert_eq!(holders.held_count(), 0);
        });
    }

    #[test]
    fn test_load_failure_is_mount_failed() {
        futures::executor::block_on(async {
            let session = EditorSession::new(
                EditorConfig::default(),
                Arc::new(FailingLoader),
                HolderRegistry::new(),
            );

            let err = session.attach("p1", seed()).await.unwrap_err();
            assert!(matches!(err, EditorError::Mount(MountError::ToolLoad(_))));
            assert_eq!(session.status(), SessionStatus::MountFailed);
            assert_eq!(session.mount_error().map(|e| e.kind()), Some("tool_load"));
            assert!(session.serialize().is_err());
        });
    }

    #[test]
    fn test_busy_holder_fails_second_session() {
        futures::executor::block_on(async {
            let holders = HolderRegistry::new();
            let first =
                EditorSession::new(EditorConfig::default(), Arc::new(BuiltinTools), holders.clone());
            let second =
                EditorSession::new(EditorConfig::default(), Arc::new(BuiltinTools), holders.clone());

            first.attach("p1", seed()).await.unwrap();
            let err = second.attach("p2", seed()).await.unwrap_err();
            assert!(matches!(err, EditorError::Mount(MountError::HolderBusy(_))));

            first.detach();
            second.attach("p2", seed()).await.unwrap();
            assert_eq!(second.status(), SessionStatus::Ready);
        });
    }

    #[test]
    fn test_switching_documents_detaches_first() {
        futures::executor::block_on(async {
            let holders = HolderRegistry::new();
            let session =
                EditorSession::new(EditorConfig::default(), Arc::new(BuiltinTools), holders.clone());

            session.attach("p1", seed()).await.unwrap();
            session
                .attach("p2", ContentDocument::new(vec![Block::paragraph("other")]))
                .await
                .unwrap();

            assert_eq!(session.document_id().as_deref(), Some("p2"));
            assert_eq!(session.serialize().unwrap().blocks.len(), 1);
            assert_eq!(holders.held_count(), 1);
        });
    }

    #[test]
    fn test_detach_from_ready_releases_holder() {
        futures::executor::block_on(async {
            let holders = HolderRegistry::new();
            let session =
                EditorSession::new(EditorConfig::default(), Arc::new(BuiltinTools), holders.clone());

            session.attach("p1", seed()).await.unwrap();
            assert!(holders.is_held("editor"));

            session.detach();
            session.detach();
            assert_eq!(session.status(), SessionStatus::Unmounted);
            assert!(!holders.is_held("editor"));
        });
    }

    #[test]
    fn test_attach_record_with_bad_seed() {
        futures::executor::block_on(async {
            let session = EditorSession::with_builtin_tools(EditorConfig::default());
            let record = PostRecord::new("p1", "Broken")
                .with_content(serde_json::json!({ "blocks": { "type": "paragraph" } }));

            let err = session.attach_record(&record).await.unwrap_err();
            assert!(matches!(err, EditorError::Mount(MountError::Seed(_))));
            assert_eq!(session.status(), SessionStatus::MountFailed);
            assert_eq!(session.document_id().as_deref(), Some("p1"));
        });
    }

    #[test]
    fn test_reattach_record_keeps_unsaved_edits() {
        futures::executor::block_on(async {
            let session = EditorSession::with_builtin_tools(EditorConfig::default());
            session.attach_record(&PostRecord::new("p1", "Day 1")).await.unwrap();
            session.edit(|s| s.push(Block::paragraph("unsaved"))).unwrap().unwrap();

            // Same id, content a tool would never produce
            let stale = PostRecord::new("p1", "Day 1").with_content(serde_json::json!({
                "blocks": [ { "type": "header", "data": { "text": "x", "level": 7 } } ]
            }));
            session.attach_record(&stale).await.unwrap();

            assert_eq!(session.status(), SessionStatus::Ready);
            let doc = session.serialize().unwrap();
            assert_eq!(doc.blocks, vec![Block::paragraph("unsaved")]);
        });
    }

    #[test]
    fn test_mismatched_save_keeps_save_failed() {
        futures::executor::block_on(async {
            let session = EditorSession::with_builtin_tools(EditorConfig::default());
            session.attach("p1", seed()).await.unwrap();

            let ticket = session.begin_save("p1").unwrap();
            session.finish_save(ticket, false);
            assert_eq!(session.status(), SessionStatus::SaveFailed);

            let err = session.begin_save("p2").unwrap_err();
            assert!(matches!(err, EditorError::DocumentMismatch { .. }));
            assert_eq!(session.status(), SessionStatus::SaveFailed);
        });
    }

    #[test]
    fn test_attach_record_seeds_title() {
        futures::executor::block_on(async {
            let session = EditorSession::with_builtin_tools(EditorConfig::default());
            let record = PostRecord::new("p1", "Day 1");

            session.attach_record(&record).await.unwrap();
            assert_eq!(session.current_title(), "Day 1");
            assert!(session.serialize().unwrap().is_empty());

            // Re-attaching the same record keeps local title edits
            session.set_title("Day 1 (edited)");
            session.attach_record(&record).await.unwrap();
            assert_eq!(session.current_title(), "Day 1 (edited)");
        });
    }
}
