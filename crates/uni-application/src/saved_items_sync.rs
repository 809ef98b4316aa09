//! Saved-items synchronizer.
//!
//! Keeps the signed-in user's saved company names in sync with the server.
//! Mutations are applied locally first, then persisted by sending the whole
//! list; every server response replaces the local list wholesale. A background
//! task refreshes on a fixed interval while a user is signed in.
//!
//! Mutations go through a FIFO lane: each request body is computed when the
//! request gets its turn, from the list the previous response left behind.
//! Back-to-back `add("C")` and `remove("A")` on `["A", "B"]` therefore leave the
//! server with `["B", "C"]`.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use uni_core::storage::{keys, load_json, store_json};
use uni_core::{ClientConfig, Identity, KeyValueStore, SavedIntent, SavedItemsGateway, UniError};

/// Message shown when a refresh fails.
pub const REFRESH_FAILED_MESSAGE: &str = "Failed to fetch saved unicorns";

/// Lifecycle phase of the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Unauthenticated,
    Loading,
    Ready,
    Error,
}

/// Observable state of the synchronizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSnapshot {
    pub phase: SyncPhase,
    /// Local copy of the saved list, possibly ahead of the server.
    pub saved: Vec<String>,
    /// User-facing message for the most recent failure.
    pub error: Option<String>,
    /// At least one refresh request is in flight.
    pub refreshing: bool,
}

impl SyncSnapshot {
    fn signed_out() -> Self {
        Self {
            phase: SyncPhase::Unauthenticated,
            saved: Vec::new(),
            error: None,
            refreshing: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SyncPhase::Loading || self.refreshing
    }

    pub fn contains(&self, company_name: &str) -> bool {
        self.saved.iter().any(|name| name == company_name)
    }
}

/// Result of a refresh or mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The server answered; the local list now equals this list.
    Applied(Vec<String>),
    /// Nobody is signed in; nothing was sent.
    Skipped,
    /// The request failed; the failure is recorded in the snapshot.
    Failed(UniError),
    /// The session ended (sign-out or shutdown) before the response arrived.
    Discarded,
}

impl SyncOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SyncOutcome::Applied(_))
    }
}

/// Tuning for the synchronizer.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub refresh_interval: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            refresh_interval: ClientConfig::default().refresh_interval(),
        }
    }
}

impl From<&ClientConfig> for SyncSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
        }
    }
}

#[derive(Clone)]
struct ActiveSession {
    identity: Identity,
    generation: u64,
    token: CancellationToken,
    refreshes: Arc<AtomicUsize>,
}

/// Counts one refresh of a session as in flight until released or dropped.
struct InFlight {
    counter: Arc<AtomicUsize>,
    released: bool,
}

impl InFlight {
    fn start(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self {
            counter: counter.clone(),
            released: false,
        }
    }

    /// Ends this refresh and returns how many are still in flight.
    fn release(&mut self) -> usize {
        if !self.released {
            self.released = true;
            self.counter.fetch_sub(1, Ordering::SeqCst);
        }
        self.counter.load(Ordering::SeqCst)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.release();
    }
}

struct Inner {
    gateway: Arc<dyn SavedItemsGateway>,
    store: Arc<dyn KeyValueStore>,
    settings: SyncSettings,
    session: Mutex<Option<ActiveSession>>,
    snapshot: watch::Sender<SyncSnapshot>,
    mutation_lane: tokio::sync::Mutex<()>,
    generations: AtomicU64,
    shutdown: CancellationToken,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Synchronizes the saved-items list of one signed-in identity at a time.
///
/// Cloning is cheap and clones share state. The background refresh task holds
/// only a weak reference, so dropping the last clone stops it.
#[derive(Clone)]
pub struct SavedItemsSynchronizer {
    inner: Arc<Inner>,
}

impl SavedItemsSynchronizer {
    pub fn new(
        gateway: Arc<dyn SavedItemsGateway>,
        store: Arc<dyn KeyValueStore>,
        settings: SyncSettings,
    ) -> Self {
        let (snapshot, _) = watch::channel(SyncSnapshot::signed_out());
        Self {
            inner: Arc::new(Inner {
                gateway,
                store,
                settings,
                session: Mutex::new(None),
                snapshot,
                mutation_lane: tokio::sync::Mutex::new(()),
                generations: AtomicU64::new(0),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncSnapshot> {
        self.inner.snapshot.subscribe()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.lock_session().as_ref().map(|s| s.identity.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.inner.lock_session().is_some()
    }

    /// Starts a session for `identity` and performs the initial fetch.
    ///
    /// The cached list seeds the local copy while loading. Signing in again as
    /// the same identity only refreshes; a different identity ends the previous
    /// session first.
    pub async fn sign_in(&self, identity: Identity) -> SyncOutcome {
        if self.inner.shutdown.is_cancelled() {
            return SyncOutcome::Discarded;
        }

        if self.identity().as_ref() == Some(&identity) {
            return self.refresh().await;
        }
        if self.is_signed_in() {
            self.sign_out();
        }

        let generation = self.inner.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let session = ActiveSession {
            identity,
            generation,
            token: self.inner.shutdown.child_token(),
            refreshes: Arc::new(AtomicUsize::new(0)),
        };

        let cached = self.inner.read_cache();
        {
            let mut guard = self.inner.lock_session();
            *guard = Some(session.clone());
            self.inner.snapshot.send_modify(|snapshot| {
                snapshot.phase = SyncPhase::Loading;
                snapshot.saved = cached;
                snapshot.error = None;
            });
        }
        tracing::info!(
            "[SavedItemsSync] Signed in as {} (session {})",
            session.identity.email,
            generation
        );

        self.spawn_background_refresh(&session);
        self.refresh().await
    }

    /// Ends the current session without contacting the server.
    ///
    /// The local list and its cached copy are cleared immediately, the
    /// background refresh stops, and responses still in flight are dropped.
    pub fn sign_out(&self) {
        let previous = {
            let mut guard = self.inner.lock_session();
            let previous = guard.take();
            self.inner.snapshot.send_replace(SyncSnapshot::signed_out());
            previous
        };

        if let Some(session) = previous {
            session.token.cancel();
            tracing::info!("[SavedItemsSync] Signed out {}", session.identity.email);
        }
        if let Err(e) = self.inner.store.remove(keys::SAVED_UNICORNS) {
            tracing::warn!("[SavedItemsSync] Failed to clear cached saved items: {}", e);
        }
    }

    /// Stops the background task and discards every in-flight response.
    ///
    /// The synchronizer stays signed out afterwards.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
        let mut guard = self.inner.lock_session();
        if guard.take().is_some() {
            self.inner.snapshot.send_replace(SyncSnapshot::signed_out());
        }
        tracing::debug!("[SavedItemsSync] Shut down");
    }

    /// Replaces the local list with the server's current list.
    pub async fn refresh(&self) -> SyncOutcome {
        self.inner.refresh().await
    }

    /// Refreshes in the background, as on window focus.
    pub fn notify_focus(&self) {
        if !self.is_signed_in() {
            return;
        }
        let inner = self.inner.clone();
        tokio::spawn(async move {
            inner.refresh().await;
        });
    }

    /// Saves `company_name` for the signed-in user.
    pub async fn add(&self, company_name: impl Into<String>) -> SyncOutcome {
        self.mutate(SavedIntent::Add(company_name.into())).await
    }

    /// Removes `company_name` from the signed-in user's saved items.
    pub async fn remove(&self, company_name: impl Into<String>) -> SyncOutcome {
        self.mutate(SavedIntent::Remove(company_name.into())).await
    }

    /// Adds the company if it is not saved, removes it otherwise.
    pub async fn toggle(&self, company_name: impl Into<String>) -> SyncOutcome {
        let company_name = company_name.into();
        if self.snapshot().contains(&company_name) {
            self.remove(company_name).await
        } else {
            self.add(company_name).await
        }
    }

    async fn mutate(&self, intent: SavedIntent) -> SyncOutcome {
        let Some(session) = self.inner.current_session() else {
            tracing::debug!(
                "[SavedItemsSync] Ignoring change to '{}' without a signed-in identity",
                intent.name()
            );
            return SyncOutcome::Skipped;
        };

        // Optimistic update, visible before any request is issued.
        if !self.inner.update_if_current(session.generation, |snapshot| {
            snapshot.saved = intent.apply(&snapshot.saved);
            snapshot.error = None;
        }) {
            return SyncOutcome::Discarded;
        }

        let _lane = tokio::select! {
            _ = session.token.cancelled() => return SyncOutcome::Discarded,
            lane = self.inner.mutation_lane.lock() => lane,
        };

        let mut body = None;
        if !self.inner.update_if_current(session.generation, |snapshot| {
            body = Some(intent.apply(&snapshot.saved));
        }) {
            return SyncOutcome::Discarded;
        }
        let body = body.unwrap_or_default();

        tracing::debug!(
            "[SavedItemsSync] Persisting {:?} ({} items)",
            intent,
            body.len()
        );
        let result = tokio::select! {
            _ = session.token.cancelled() => return SyncOutcome::Discarded,
            result = self.inner.gateway.replace(&session.identity, &body) => result,
        };

        match result {
            Ok(saved) => {
                let applied = self.inner.update_if_current(session.generation, |snapshot| {
                    snapshot.phase = SyncPhase::Ready;
                    snapshot.saved = saved.clone();
                    snapshot.error = None;
                });
                if applied {
                    SyncOutcome::Applied(saved)
                } else {
                    SyncOutcome::Discarded
                }
            }
            Err(error) => {
                tracing::warn!(
                    "[SavedItemsSync] {}: {}",
                    intent.failure_message(),
                    error
                );
                let recorded = self.inner.update_if_current(session.generation, |snapshot| {
                    snapshot.phase = SyncPhase::Error;
                    snapshot.error = Some(intent.failure_message().to_string());
                });
                if !recorded {
                    return SyncOutcome::Discarded;
                }

                let inner = self.inner.clone();
                tokio::spawn(async move {
                    inner.refresh().await;
                });
                SyncOutcome::Failed(error)
            }
        }
    }

    fn spawn_background_refresh(&self, session: &ActiveSession) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let token = session.token.clone();
        let period = self.inner.settings.refresh_interval;

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!(
                "[SavedItemsSync] Background refresh every {}s",
                period.as_secs()
            );

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let Some(inner) = weak.upgrade() else { break };
                        inner.refresh().await;
                    }
                }
            }
            tracing::debug!("[SavedItemsSync] Background refresh stopped");
        });
    }
}

impl Inner {
    fn lock_session(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn current_session(&self) -> Option<ActiveSession> {
        self.lock_session().clone()
    }

    /// Applies `f` to the snapshot only if session `generation` is still active.
    ///
    /// Changes to the saved list are mirrored to the cache. Returns false when
    /// the session has ended.
    fn update_if_current(&self, generation: u64, f: impl FnOnce(&mut SyncSnapshot)) -> bool {
        let guard = self.lock_session();
        let is_current = guard
            .as_ref()
            .is_some_and(|session| session.generation == generation);
        if !is_current {
            return false;
        }

        let mut saved_changed = false;
        self.snapshot.send_if_modified(|snapshot| {
            let before = snapshot.clone();
            f(snapshot);
            saved_changed = snapshot.saved != before.saved;
            *snapshot != before
        });
        if saved_changed {
            self.write_cache(&self.snapshot.borrow().saved);
        }
        true
    }

    async fn refresh(&self) -> SyncOutcome {
        let Some(session) = self.current_session() else {
            return SyncOutcome::Skipped;
        };

        let mut in_flight = InFlight::start(&session.refreshes);
        if !self.update_if_current(session.generation, |snapshot| snapshot.refreshing = true) {
            return SyncOutcome::Discarded;
        }

        let result = tokio::select! {
            _ = session.token.cancelled() => return SyncOutcome::Discarded,
            result = self.gateway.fetch(&session.identity) => result,
        };

        match result {
            Ok(saved) => {
                let applied = self.update_if_current(session.generation, |snapshot| {
                    snapshot.phase = SyncPhase::Ready;
                    snapshot.saved = saved.clone();
                    snapshot.error = None;
                    snapshot.refreshing = in_flight.release() > 0;
                });
                if applied {
                    tracing::debug!("[SavedItemsSync] Refreshed {} saved items", saved.len());
                    SyncOutcome::Applied(saved)
                } else {
                    SyncOutcome::Discarded
                }
            }
            Err(error) => {
                tracing::warn!("[SavedItemsSync] Refresh failed: {}", error);
                let recorded = self.update_if_current(session.generation, |snapshot| {
                    snapshot.phase = SyncPhase::Error;
                    snapshot.error = Some(REFRESH_FAILED_MESSAGE.to_string());
                    snapshot.refreshing = in_flight.release() > 0;
                });
                if recorded {
                    SyncOutcome::Failed(error)
                } else {
                    SyncOutcome::Discarded
                }
            }
        }
    }

    fn read_cache(&self) -> Vec<String> {
        match load_json::<Vec<String>>(&*self.store, keys::SAVED_UNICORNS) {
            Ok(saved) => saved.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("[SavedItemsSync] Ignoring cached saved items: {}", e);
                Vec::new()
            }
        }
    }

    fn write_cache(&self, saved: &[String]) {
        if let Err(e) = store_json(&*self.store, keys::SAVED_UNICORNS, saved) {
            tracing::warn!("[SavedItemsSync] Failed to cache saved items: {}", e);
        }
    }
}
