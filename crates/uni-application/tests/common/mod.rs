#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};
use uni_application::{SavedItemsSynchronizer, SyncSettings};
use uni_core::{Identity, KeyValueStore, Result, SavedItemsGateway, UniError};
use uni_infrastructure::MemoryStore;

/// In-memory saved-items server whose responses can be held back or failed.
pub struct FakeGateway {
    server: Mutex<Vec<String>>,
    posted: Mutex<Vec<Vec<String>>>,
    emails: Mutex<Vec<String>>,
    fetches: AtomicUsize,
    fail_fetch: AtomicBool,
    fail_replace: AtomicBool,
    echo_override: Mutex<Option<Vec<String>>>,
    fetch_gate: Option<Semaphore>,
    replace_gate: Option<Semaphore>,
    calls: Notify,
}

impl FakeGateway {
    pub fn new(initial: &[&str]) -> Self {
        Self {
            server: Mutex::new(strings(initial)),
            posted: Mutex::new(Vec::new()),
            emails: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
            fail_fetch: AtomicBool::new(false),
            fail_replace: AtomicBool::new(false),
            echo_override: Mutex::new(None),
            fetch_gate: None,
            replace_gate: None,
            calls: Notify::new(),
        }
    }

    /// Fetches wait for [`FakeGateway::release_fetches`].
    pub fn hold_fetches(mut self) -> Self {
        self.fetch_gate = Some(Semaphore::new(0));
        self
    }

    /// Replaces wait for [`FakeGateway::release_replaces`].
    pub fn hold_replaces(mut self) -> Self {
        self.replace_gate = Some(Semaphore::new(0));
        self
    }

    pub fn release_fetches(&self, n: usize) {
        if let Some(gate) = &self.fetch_gate {
            gate.add_permits(n);
        }
    }

    pub fn release_replaces(&self, n: usize) {
        if let Some(gate) = &self.replace_gate {
            gate.add_permits(n);
        }
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_replaces(&self, fail: bool) {
        self.fail_replace.store(fail, Ordering::SeqCst);
    }

    /// Makes the next successful replace store and echo `list` instead of the body.
    pub fn echo(&self, list: &[&str]) {
        *self.echo_override.lock().unwrap() = Some(strings(list));
    }

    pub fn set_server(&self, list: &[&str]) {
        *self.server.lock().unwrap() = strings(list);
    }

    pub fn server(&self) -> Vec<String> {
        self.server.lock().unwrap().clone()
    }

    pub fn posted(&self) -> Vec<Vec<String>> {
        self.posted.lock().unwrap().clone()
    }

    pub fn emails(&self) -> Vec<String> {
        self.emails.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn request_count(&self) -> usize {
        self.fetch_count() + self.posted.lock().unwrap().len()
    }

    /// Waits until at least `n` replace bodies have been received.
    pub async fn wait_for_posts(&self, n: usize) {
        self.wait_until(|| self.posted.lock().unwrap().len() >= n).await;
    }

    /// Waits until at least `n` fetches have started.
    pub async fn wait_for_fetches(&self, n: usize) {
        self.wait_until(|| self.fetch_count() >= n).await;
    }

    async fn wait_until(&self, done: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !done() {
                self.calls.notified().await;
            }
        })
        .await
        .expect("gateway was not called in time");
    }
}

#[async_trait]
impl SavedItemsGateway for FakeGateway {
    async fn fetch(&self, identity: &Identity) -> Result<Vec<String>> {
        self.emails.lock().unwrap().push(identity.email.clone());
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.calls.notify_one();

        if let Some(gate) = &self.fetch_gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(UniError::network("GET /api/user failed with HTTP 500"));
        }
        Ok(self.server())
    }

    async fn replace(&self, identity: &Identity, saved: &[String]) -> Result<Vec<String>> {
        self.emails.lock().unwrap().push(identity.email.clone());
        self.posted.lock().unwrap().push(saved.to_vec());
        self.calls.notify_one();

        if let Some(gate) = &self.replace_gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.fail_replace.load(Ordering::SeqCst) {
            return Err(UniError::network("POST /api/user failed with HTTP 500"));
        }

        let stored = self
            .echo_override
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| saved.to_vec());
        *self.server.lock().unwrap() = stored.clone();
        Ok(stored)
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn identity() -> Identity {
    Identity::new("ada@example.com").with_session_token("session-token")
}

pub struct Harness {
    pub gateway: Arc<FakeGateway>,
    pub store: Arc<MemoryStore>,
    pub sync: SavedItemsSynchronizer,
}

pub fn harness(gateway: FakeGateway) -> Harness {
    harness_with(gateway, Arc::new(MemoryStore::new()), Duration::from_secs(30))
}

pub fn harness_with(gateway: FakeGateway, store: Arc<MemoryStore>, interval: Duration) -> Harness {
    let gateway = Arc::new(gateway);
    let kv: Arc<dyn KeyValueStore> = store.clone();
    let sync = SavedItemsSynchronizer::new(
        gateway.clone(),
        kv,
        SyncSettings {
            refresh_interval: interval,
        },
    );
    Harness {
        gateway,
        store,
        sync,
    }
}
