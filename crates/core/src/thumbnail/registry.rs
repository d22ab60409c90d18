//! Scope-keyed registry of in-flight thumbnail fetches.
//!
//! Every fetch belongs to a [`FetchScope`] (a popup, a page of cells). The
//! handle table behind the registry is the single source of truth for which
//! fetches may still deliver: cancelling removes the entry, and the
//! [`DeliveryQueue`] only invokes a sink after removing its entry under the
//! same lock. A fetch cancelled at any point before that removal never
//! paints, even when its bytes already arrived.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use super::{FetchError, ImageFetcher, Thumbnail};

/// Opaque reference to one outstanding fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchHandle(u64);

/// Owning context of a group of fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchScope(u64);

type Sink = Box<dyn FnOnce(Thumbnail) + Send + 'static>;

struct PendingFetch {
    scope: FetchScope,
    slot: Option<usize>,
    url: String,
    sink: Sink,
    task: AbortHandle,
}

#[derive(Default)]
struct HandleTable {
    pending: HashMap<FetchHandle, PendingFetch>,
    slots: HashMap<(FetchScope, usize), FetchHandle>,
    next_handle: u64,
    next_scope: u64,
}

impl HandleTable {
    /// Remove a pending fetch together with the slot binding pointing at it.
    fn take(&mut self, handle: FetchHandle) -> Option<PendingFetch> {
        let pending = self.pending.remove(&handle)?;
        if let Some(slot) = pending.slot {
            let key = (pending.scope, slot);
            if self.slots.get(&key) == Some(&handle) {
                self.slots.remove(&key);
            }
        }
        Some(pending)
    }
}

/// Result of one fetch task, waiting for the presentation context.
struct Completion {
    handle: FetchHandle,
    outcome: Result<Thumbnail, FetchError>,
}

/// Issues and tracks thumbnail fetches.
///
/// Cheap to clone; clones share the same handle table.
#[derive(Clone)]
pub struct FetchTaskRegistry {
    fetcher: Arc<dyn ImageFetcher>,
    runtime: Handle,
    table: Arc<Mutex<HandleTable>>,
    completions: mpsc::UnboundedSender<Completion>,
}

impl FetchTaskRegistry {
    /// Create a registry that spawns fetches on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> (Self, DeliveryQueue) {
        Self::with_runtime(fetcher, Handle::current())
    }

    /// Create a registry that spawns fetches on the given runtime.
    ///
    /// Returns the registry and the queue the presentation context drains to
    /// run completion sinks.
    pub fn with_runtime(fetcher: Arc<dyn ImageFetcher>, runtime: Handle) -> (Self, DeliveryQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        let table = Arc::new(Mutex::new(HandleTable::default()));

        let registry = Self {
            fetcher,
            runtime,
            table: Arc::clone(&table),
            completions: tx,
        };
        let queue = DeliveryQueue { rx, table };
        (registry, queue)
    }

    /// Allocate a new owning scope.
    pub fn open_scope(&self) -> FetchScope {
        let mut table = self.table.lock().unwrap();
        let scope = FetchScope(table.next_scope);
        table.next_scope += 1;
        scope
    }

    /// Start fetching `url` for `scope`.
    ///
    /// Never blocks. `on_complete` runs at most once, from the
    /// [`DeliveryQueue`], and only if the fetch succeeds and the handle is
    /// still pending at that point.
    pub fn begin_fetch<F>(&self, scope: FetchScope, url: &str, on_complete: F) -> FetchHandle
    where
        F: FnOnce(Thumbnail) + Send + 'static,
    {
        self.start(scope, None, url, Box::new(on_complete))
    }

    /// Start fetching `url` for a reusable cell.
    ///
    /// Whatever fetch was previously bound to `(scope, slot)` is cancelled
    /// first, so a recycled cell never shows the image of its previous entry.
    pub fn bind_slot<F>(
        &self,
        scope: FetchScope,
        slot: usize,
        url: &str,
        on_complete: F,
    ) -> FetchHandle
    where
        F: FnOnce(Thumbnail) + Send + 'static,
    {
        self.start(scope, Some(slot), url, Box::new(on_complete))
    }

    fn start(&self, scope: FetchScope, slot: Option<usize>, url: &str, sink: Sink) -> FetchHandle {
        let mut table = self.table.lock().unwrap();

        let stale = slot.and_then(|slot| {
            let previous = table.slots.get(&(scope, slot)).copied()?;
            table.take(previous)
        });

        let handle = FetchHandle(table.next_handle);
        table.next_handle += 1;

        // The entry is inserted before the lock is released, so a completion
        // can never be settled ahead of its own registration.
        let task = self
            .runtime
            .spawn(run_fetch(
                Arc::clone(&self.fetcher),
                url.to_string(),
                handle,
                self.completions.clone(),
            ))
            .abort_handle();

        table.pending.insert(
            handle,
            PendingFetch {
                scope,
                slot,
                url: url.to_string(),
                sink,
                task,
            },
        );
        if let Some(slot) = slot {
            table.slots.insert((scope, slot), handle);
        }
        drop(table);

        // Sinks may own values whose drop calls back into the registry.
        if let Some(stale) = stale {
            stale.task.abort();
            debug!("Slot rebound, cancelled fetch of {}", stale.url);
        }

        debug!("Started fetch {:?} in {:?}: {}", handle, scope, url);
        handle
    }

    /// Cancel one fetch. Idempotent; returns whether it was still pending.
    pub fn cancel(&self, handle: FetchHandle) -> bool {
        let pending = self.table.lock().unwrap().take(handle);
        match pending {
            Some(pending) => {
                pending.task.abort();
                debug!("Cancelled fetch {:?}: {}", handle, pending.url);
                true
            }
            None => false,
        }
    }

    /// Cancel every pending fetch of `scope`. Returns how many were cancelled.
    ///
    /// The owner's teardown path must call this.
    pub fn cancel_all(&self, scope: FetchScope) -> usize {
        let cancelled: Vec<PendingFetch> = {
            let mut table = self.table.lock().unwrap();
            let handles: Vec<FetchHandle> = table
                .pending
                .iter()
                .filter(|(_, pending)| pending.scope == scope)
                .map(|(handle, _)| *handle)
                .collect();
            let taken: Vec<PendingFetch> = handles
                .into_iter()
                .filter_map(|handle| table.take(handle))
                .collect();
            taken
        };

        for pending in &cancelled {
            pending.task.abort();
        }

        if !cancelled.is_empty() {
            info!("Cancelled {} fetches in {:?}", cancelled.len(), scope);
        }
        cancelled.len()
    }

    pub fn is_pending(&self, handle: FetchHandle) -> bool {
        self.table.lock().unwrap().pending.contains_key(&handle)
    }

    pub fn pending_count(&self) -> usize {
        self.table.lock().unwrap().pending.len()
    }

    pub fn pending_in_scope(&self, scope: FetchScope) -> usize {
        self.table
            .lock()
            .unwrap()
            .pending
            .values()
            .filter(|pending| pending.scope == scope)
            .count()
    }
}

async fn run_fetch(
    fetcher: Arc<dyn ImageFetcher>,
    url: String,
    handle: FetchHandle,
    completions: mpsc::UnboundedSender<Completion>,
) {
    let outcome = fetch_thumbnail(fetcher.as_ref(), &url).await;
    if completions.send(Completion { handle, outcome }).is_err() {
        debug!("Delivery queue closed, dropping result for {}", url);
    }
}

async fn fetch_thumbnail(fetcher: &dyn ImageFetcher, url: &str) -> Result<Thumbnail, FetchError> {
    let bytes = fetcher.fetch_bytes(url).await?;

    // Image decoding is CPU-bound.
    tokio::task::spawn_blocking(move || Thumbnail::decode(&bytes))
        .await
        .map_err(|e| FetchError::TaskFailed(e.to_string()))?
}

/// Receiving end of the registry, owned by the presentation context.
///
/// Completion sinks only ever run inside this queue's methods, so they run
/// wherever the owner drains it and never inline in `begin_fetch`.
pub struct DeliveryQueue {
    rx: mpsc::UnboundedReceiver<Completion>,
    table: Arc<Mutex<HandleTable>>,
}

impl DeliveryQueue {
    /// Wait for the next completion and settle it.
    ///
    /// Returns `Some(true)` when a sink ran, `Some(false)` when the result was
    /// dropped (cancelled or failed), and `None` once the registry and all
    /// its tasks are gone.
    pub async fn deliver_next(&mut self) -> Option<bool> {
        let completion = self.rx.recv().await?;
        Some(self.settle(completion))
    }

    /// Settle every completion already queued without waiting.
    /// Returns the number of sinks that ran.
    pub fn deliver_ready(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(completion) = self.rx.try_recv() {
            if self.settle(completion) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Settle completions until the registry is dropped.
    pub async fn run(mut self) {
        while let Some(completion) = self.rx.recv().await {
            self.settle(completion);
        }
        debug!("Delivery queue closed");
    }

    /// Completions waiting to be settled.
    pub fn queued(&self) -> usize {
        self.rx.len()
    }

    fn settle(&self, completion: Completion) -> bool {
        let Completion { handle, outcome } = completion;

        let pending = self.table.lock().unwrap().take(handle);
        let Some(pending) = pending else {
            debug!("Dropping result of cancelled fetch {:?}", handle);
            return false;
        };

        match outcome {
            Ok(thumbnail) => {
                debug!(
                    "Delivering {}x{} thumbnail for {:?}",
                    thumbnail.width, thumbnail.height, handle
                );
                (pending.sink)(thumbnail);
                true
            }
            Err(e) => {
                debug!("Thumbnail fetch failed for {}: {}", pending.url, e);
                false
            }
        }
    }
}
