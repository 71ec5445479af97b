//! Content-addressed cache of rendered previews.
//!
//! Each key moves through `absent -> in flight -> done | failed`. The
//! in-flight placeholder is inserted under the lock before any render
//! starts, so at most one render per key is ever running, whether it was
//! started by [`PreviewCache::get_or_start`] on a worker thread or by
//! [`PreviewCache::render_blocking`] on the caller's thread.
//!
//! Entries are never evicted; a session only visits a handful of
//! settings/size combinations.

use crate::backend::{RenderBackend, RenderContext, RenderRequest};
use crate::error::PreviewError;
use crate::types::{PreviewKey, PreviewSet};
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;

/// Posted to the panel when a background render finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedrawRequest {
    pub key: PreviewKey,
}

/// Result of looking up a key.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewLookup {
    /// A render is in flight.
    Pending,
    /// The render finished but reported fewer than four samples.
    Incomplete(Arc<PreviewSet>),
    /// All four samples are available.
    Ready(Arc<PreviewSet>),
    /// The render failed. Not retried.
    Failed(PreviewError),
}

impl PreviewLookup {
    /// The lookup is settled: samples or an error can be shown.
    pub fn is_ready(&self) -> bool {
        matches!(self, PreviewLookup::Ready(_) | PreviewLookup::Failed(_))
    }
}

#[derive(Debug)]
enum Entry {
    InFlight,
    Done(Arc<PreviewSet>),
    Failed(PreviewError),
}

impl Entry {
    fn lookup(&self) -> PreviewLookup {
        match self {
            Entry::InFlight => PreviewLookup::Pending,
            Entry::Done(set) if set.is_complete() => PreviewLookup::Ready(Arc::clone(set)),
            Entry::Done(set) => PreviewLookup::Incomplete(Arc::clone(set)),
            Entry::Failed(e) => PreviewLookup::Failed(e.clone()),
        }
    }
}

struct Inner {
    entries: Mutex<HashMap<PreviewKey, Entry>>,
    /// Signalled whenever an in-flight entry settles
    settled: Condvar,
    backend: Arc<dyn RenderBackend>,
    context: RenderContext,
    redraw: Sender<RedrawRequest>,
    dispatches: AtomicUsize,
}

impl Inner {
    fn render(&self, key: &PreviewKey) {
        self.dispatches.fetch_add(1, Ordering::SeqCst);
        let request = RenderRequest::new(key, &self.context);
        log::debug!(
            "Rendering preview {}x{} for {:?}",
            key.width,
            key.height,
            key.settings.font_family
        );
        // A panic must still settle the entry, or waiters block forever
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.backend.render_family_samples(&request)
        }))
        .unwrap_or_else(|payload| {
            Err(PreviewError::RenderBackend(format!(
                "render backend panicked: {}",
                panic_message(payload.as_ref())
            )))
        });
        let entry = match outcome {
            Ok(set) => {
                if !set.is_complete() {
                    log::warn!("Render backend returned only {} of 4 samples", set.len());
                }
                Entry::Done(Arc::new(set))
            }
            Err(e) => {
                log::error!("Preview render failed: {}", e);
                Entry::Failed(e)
            }
        };
        self.store(key, entry);
    }

    fn store(&self, key: &PreviewKey, entry: Entry) {
        self.entries.lock().insert(key.clone(), entry);
        self.settled.notify_all();
    }

    fn request_redraw(&self, key: PreviewKey) {
        if let Err(e) = self.redraw.send(RedrawRequest { key }) {
            log::debug!("Preview finished after the panel went away: {}", e);
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("no message")
}

/// Thread-safe preview cache owned by one chooser session.
#[derive(Clone)]
pub struct PreviewCache {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for PreviewCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewCache")
            .field("entries", &self.inner.entries.lock().len())
            .field("dispatches", &self.dispatch_count())
            .finish_non_exhaustive()
    }
}

impl PreviewCache {
    /// Create a cache rendering through `backend`.
    ///
    /// Background renders post a [`RedrawRequest`] on `redraw` when they finish.
    pub fn new(
        backend: Arc<dyn RenderBackend>,
        context: RenderContext,
        redraw: Sender<RedrawRequest>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                settled: Condvar::new(),
                backend,
                context,
                redraw,
                dispatches: AtomicUsize::new(0),
            }),
        }
    }

    /// Look up `key`, starting a background render the first time it is seen.
    pub fn get_or_start(&self, key: &PreviewKey) -> PreviewLookup {
        let mut entries = self.inner.entries.lock();
        if let Some(entry) = entries.get(key) {
            return entry.lookup();
        }
        entries.insert(key.clone(), Entry::InFlight);
        drop(entries);

        self.spawn_render(key.clone());
        PreviewLookup::Pending
    }

    /// Look up `key` without starting anything.
    pub fn peek(&self, key: &PreviewKey) -> Option<PreviewLookup> {
        self.inner.entries.lock().get(key).map(Entry::lookup)
    }

    /// Render `key` on the calling thread unless all four samples are cached.
    ///
    /// If a render for `key` is already in flight this waits for it rather
    /// than starting a second one. Failed entries are returned as is.
    pub fn render_blocking(&self, key: &PreviewKey) -> PreviewLookup {
        let mut entries = self.inner.entries.lock();
        loop {
            match entries.get(key) {
                Some(Entry::InFlight) => {
                    log::trace!("Waiting for in-flight preview render");
                    self.inner.settled.wait(&mut entries);
                }
                Some(Entry::Done(set)) if set.is_complete() => {
                    return PreviewLookup::Ready(Arc::clone(set));
                }
                Some(Entry::Failed(e)) => return PreviewLookup::Failed(e.clone()),
                Some(Entry::Done(_)) | None => break,
            }
        }
        entries.insert(key.clone(), Entry::InFlight);
        drop(entries);

        self.inner.render(key);
        self.peek(key).unwrap_or(PreviewLookup::Pending)
    }

    /// Number of renders started so far.
    pub fn dispatch_count(&self) -> usize {
        self.inner.dispatches.load(Ordering::SeqCst)
    }

    /// Number of cached keys, including in-flight ones.
    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn spawn_render(&self, key: PreviewKey) {
        let inner = Arc::clone(&self.inner);
        let worker_key = key.clone();
        let spawned = std::thread::Builder::new()
            .name("preview-render".into())
            .spawn(move || {
                inner.render(&worker_key);
                inner.request_redraw(worker_key);
            });
        if let Err(e) = spawned {
            log::error!("Failed to spawn preview render thread: {}", e);
            self.inner.store(
                &key,
                Entry::Failed(PreviewError::RenderBackend(format!(
                    "could not start render thread: {e}"
                ))),
            );
        }
    }
}
