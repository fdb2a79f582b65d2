use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::model::{self, UserData};
use crate::store::{StoreError, UserStore};

/// Quiet period between the last mutation and the autosave write.
pub const AUTOSAVE_QUIET_PERIOD: Duration = Duration::from_millis(800);
/// How long the `Saved` status stays visible before reverting to `Idle`.
pub const SAVED_STATUS_HOLD: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    Error,
}

/// A single cancellable deferred task. Scheduling replaces whatever is
/// pending, so only the last-scheduled callback ever runs. Cancellation
/// reaches the waiting phase only: once the delay elapses the task is
/// detached and runs to completion, so a fired save cannot be killed
/// mid-flight.
#[derive(Default)]
struct Debounce {
    pending: Option<JoinHandle<()>>,
}

impl Debounce {
    fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // No await point between waking and detaching; an abort can
            // no longer land once the deadline has passed.
            tokio::spawn(task);
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debounce {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct Shared {
    user_id: Uuid,
    store: Arc<dyn UserStore>,
    data: Mutex<UserData>,
    status: watch::Sender<SaveStatus>,
    revert: Mutex<Debounce>,
}

impl Shared {
    fn data(&self) -> MutexGuard<'_, UserData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One upsert of the latest snapshot, with the status transitions the
    /// UI observes. A failure leaves `Error` standing until the next
    /// mutation or an explicit save retries.
    async fn persist(self: Arc<Self>) -> Result<(), StoreError> {
        let doc = serde_json::to_value(self.data().clone())?;
        let _ = self.status.send(SaveStatus::Saving);

        match self.store.save(self.user_id, &doc).await {
            Ok(()) => {
                debug!(user_id = %self.user_id, "autosave completed");
                let _ = self.status.send(SaveStatus::Saved);
                let shared = Arc::clone(&self);
                self.revert
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .schedule(SAVED_STATUS_HOLD, async move {
                        // Leave a newer in-flight save's status alone.
                        shared.status.send_if_modified(|status| {
                            if *status == SaveStatus::Saved {
                                *status = SaveStatus::Idle;
                                true
                            } else {
                                false
                            }
                        });
                    });
                Ok(())
            }
            Err(err) => {
                warn!(user_id = %self.user_id, error = %err, "autosave failed");
                let _ = self.status.send(SaveStatus::Error);
                Err(err)
            }
        }
    }
}

/// Owns the in-memory user document and pushes it to storage after a quiet
/// period. Mutations apply synchronously; rapid successive mutations
/// coalesce into a single write carrying only the final snapshot.
pub struct Synchronizer {
    shared: Arc<Shared>,
    debounce: Debounce,
    status_rx: watch::Receiver<SaveStatus>,
}

impl Synchronizer {
    /// Loads the user's document, substituting defaults when nothing has
    /// been saved yet and shallow-merging a persisted document over the
    /// defaults otherwise.
    pub async fn load(store: Arc<dyn UserStore>, user_id: Uuid) -> Result<Self, StoreError> {
        let data = Self::fetch(store.as_ref(), user_id).await?;
        let (status, status_rx) = watch::channel(SaveStatus::Idle);
        Ok(Self {
            shared: Arc::new(Shared {
                user_id,
                store,
                data: Mutex::new(data),
                status,
                revert: Mutex::new(Debounce::default()),
            }),
            debounce: Debounce::default(),
            status_rx,
        })
    }

    async fn fetch(store: &dyn UserStore, user_id: Uuid) -> Result<UserData, StoreError> {
        match store.load(user_id).await? {
            Some(doc) => Ok(model::merge_with_defaults(doc)?),
            None => Ok(UserData::default()),
        }
    }

    /// Snapshot of the current document.
    pub fn data(&self) -> UserData {
        self.shared.data().clone()
    }

    pub fn status(&self) -> SaveStatus {
        *self.status_rx.borrow()
    }

    /// Watchable save-status signal for a UI.
    pub fn status_watch(&self) -> watch::Receiver<SaveStatus> {
        self.status_rx.clone()
    }

    /// Applies a structural update to the document. The new value is
    /// visible immediately; the write to storage is deferred by the quiet
    /// period and rescheduled on every call.
    pub fn update<F>(&mut self, apply: F)
    where
        F: FnOnce(&UserData) -> UserData,
    {
        {
            let mut data = self.shared.data();
            *data = apply(&data);
        }
        let shared = Arc::clone(&self.shared);
        self.debounce.schedule(AUTOSAVE_QUIET_PERIOD, async move {
            let _ = shared.persist().await;
        });
    }

    /// Cancels any pending autosave and writes the latest snapshot now.
    pub async fn save_now(&mut self) -> Result<(), StoreError> {
        self.debounce.cancel();
        Arc::clone(&self.shared).persist().await
    }

    /// Re-reads the document from storage, discarding in-memory state.
    /// Hook for auth-state changes.
    pub async fn refetch(&mut self) -> Result<(), StoreError> {
        self.debounce.cancel();
        let data = Self::fetch(self.shared.store.as_ref(), self.shared.user_id).await?;
        *self.shared.data() = data;
        Ok(())
    }

    /// Overwrites both the in-memory document and the storage record with
    /// the defaults.
    pub async fn reset(&mut self) -> Result<(), StoreError> {
        self.debounce.cancel();
        *self.shared.data() = UserData::default();
        Arc::clone(&self.shared).persist().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mode;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    #[derive(Default)]
    struct RecordingStore {
        initial: Mutex<Option<Value>>,
        saves: Mutex<Vec<Value>>,
        fail: AtomicBool,
        delay_ms: AtomicU64,
    }

    impl RecordingStore {
        fn saved(&self) -> Vec<Value> {
            self.saves.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UserStore for RecordingStore {
        async fn load(&self, _user_id: Uuid) -> Result<Option<Value>, StoreError> {
            Ok(self.initial.lock().unwrap().clone())
        }

        async fn save(&self, _user_id: Uuid, doc: &Value) -> Result<(), StoreError> {
            let delay = self.delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::Backend(sqlx::Error::PoolClosed));
            }
            self.saves.lock().unwrap().push(doc.clone());
            Ok(())
        }
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    async fn new_sync(store: &Arc<RecordingStore>) -> Synchronizer {
        let store: Arc<dyn UserStore> = Arc::clone(store) as Arc<dyn UserStore>;
        Synchronizer::load(store, Uuid::new_v4()).await.unwrap()
    }

    fn set_current_gpa(gpa: f64) -> impl FnOnce(&UserData) -> UserData {
        move |prev| {
            let mut next = prev.clone();
            next.fpt.planner.current_gpa = gpa;
            next
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_mutations_coalesce_into_one_write() {
        let store = Arc::new(RecordingStore::default());
        let mut sync = new_sync(&store).await;

        for i in 1..=5 {
            sync.update(set_current_gpa(i as f64));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        // In-memory state reflects the final mutation immediately.
        assert_eq!(sync.data().fpt.planner.current_gpa, 5.0);
        assert!(store.saved().is_empty());

        tokio::time::sleep(Duration::from_millis(900)).await;
        settle().await;

        let saves = store.saved();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0]["fpt"]["planner"]["currentGpa"], 5.0);
    }

    #[tokio::test(start_paused = true)]
    async fn status_walks_through_saved_back_to_idle() {
        let store = Arc::new(RecordingStore::default());
        let mut sync = new_sync(&store).await;
        assert_eq!(sync.status(), SaveStatus::Idle);

        sync.update(set_current_gpa(7.5));
        tokio::time::sleep(Duration::from_millis(900)).await;
        settle().await;
        assert_eq!(sync.status(), SaveStatus::Saved);

        tokio::time::sleep(SAVED_STATUS_HOLD + Duration::from_millis(100)).await;
        settle().await;
        assert_eq!(sync.status(), SaveStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn save_now_cancels_the_pending_timer() {
        let store = Arc::new(RecordingStore::default());
        let mut sync = new_sync(&store).await;

        sync.update(set_current_gpa(8.0));
        sync.save_now().await.unwrap();
        assert_eq!(store.saved().len(), 1);

        // The debounced write must not fire on top of the manual one.
        tokio::time::sleep(Duration::from_millis(1000)).await;
        settle().await;
        assert_eq!(store.saved().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_save_sets_error_until_the_next_mutation_retries() {
        let store = Arc::new(RecordingStore::default());
        let mut sync = new_sync(&store).await;
        store.fail.store(true, Ordering::SeqCst);

        sync.update(set_current_gpa(6.0));
        tokio::time::sleep(Duration::from_millis(900)).await;
        settle().await;
        assert_eq!(sync.status(), SaveStatus::Error);
        assert!(store.saved().is_empty());

        // No automatic retry: the error stands until the user acts again.
        tokio::time::sleep(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(sync.status(), SaveStatus::Error);

        store.fail.store(false, Ordering::SeqCst);
        sync.update(set_current_gpa(6.5));
        tokio::time::sleep(Duration::from_millis(900)).await;
        settle().await;
        assert_eq!(sync.status(), SaveStatus::Saved);
        assert_eq!(store.saved().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn load_merges_persisted_document_over_defaults() {
        let store = Arc::new(RecordingStore::default());
        *store.initial.lock().unwrap() = Some(json!({"selectedMode": "OTHER"}));

        let sync = new_sync(&store).await;
        let data = sync.data();
        assert_eq!(data.selected_mode, Mode::Other);
        // Everything the partial document omitted is the default.
        assert_eq!(data.fpt, UserData::default().fpt);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_overwrites_storage_with_defaults() {
        let store = Arc::new(RecordingStore::default());
        let mut sync = new_sync(&store).await;

        sync.update(set_current_gpa(9.0));
        sync.reset().await.unwrap();

        assert_eq!(sync.data(), UserData::default());
        let saves = store.saved();
        assert_eq!(saves.len(), 1);
        assert_eq!(
            saves[0],
            serde_json::to_value(UserData::default()).unwrap()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_synchronizer_cancels_pending_autosave() {
        let store = Arc::new(RecordingStore::default());
        let mut sync = new_sync(&store).await;

        sync.update(set_current_gpa(4.2));
        drop(sync);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        settle().await;
        assert!(store.saved().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn fired_save_survives_dropping_the_synchronizer() {
        let store = Arc::new(RecordingStore::default());
        store.delay_ms.store(200, Ordering::SeqCst);
        let mut sync = new_sync(&store).await;
        let status = sync.status_watch();

        sync.update(set_current_gpa(7.0));
        // Past the quiet period: the upsert has started but not finished.
        tokio::time::sleep(Duration::from_millis(850)).await;
        settle().await;
        assert_eq!(*status.borrow(), SaveStatus::Saving);

        drop(sync);
        tokio::time::sleep(Duration::from_millis(500)).await;
        settle().await;

        // The in-flight write completes and its late status still lands.
        let saves = store.saved();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0]["fpt"]["planner"]["currentGpa"], 7.0);
        assert_eq!(*status.borrow(), SaveStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn new_mutation_does_not_abort_an_inflight_save() {
        let store = Arc::new(RecordingStore::default());
        store.delay_ms.store(200, Ordering::SeqCst);
        let mut sync = new_sync(&store).await;

        sync.update(set_current_gpa(1.0));
        tokio::time::sleep(Duration::from_millis(850)).await;
        settle().await;
        assert_eq!(sync.status(), SaveStatus::Saving);

        // Rescheduling the debounce must only cancel the waiting phase.
        sync.update(set_current_gpa(2.0));
        tokio::time::sleep(Duration::from_millis(1100)).await;
        settle().await;

        let saves = store.saved();
        assert_eq!(saves.len(), 2);
        assert_eq!(saves[0]["fpt"]["planner"]["currentGpa"], 1.0);
        assert_eq!(saves[1]["fpt"]["planner"]["currentGpa"], 2.0);
    }

    #[tokio::test(start_paused = true)]
    async fn refetch_discards_unsaved_in_memory_state() {
        let store = Arc::new(RecordingStore::default());
        let mut sync = new_sync(&store).await;

        sync.update(set_current_gpa(3.3));
        sync.refetch().await.unwrap();

        assert_eq!(sync.data(), UserData::default());
        tokio::time::sleep(Duration::from_millis(1000)).await;
        settle().await;
        assert!(store.saved().is_empty());
    }
}
