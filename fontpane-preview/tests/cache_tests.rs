//! Integration tests for `PreviewCache`.
//!
//! A counting fake backend stands in for the external renderer so the tests
//! can observe exactly how many renders each access pattern dispatches.

use fontpane_config::{FaceSettings, FaceSlot, TextStyle};
use fontpane_preview::{
    PreviewCache, PreviewError, PreviewKey, PreviewLookup, PreviewResult, PreviewSet,
    RenderBackend, RenderContext, RenderRequest,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, channel};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Clone, Copy, PartialEq)]
enum Outcome {
    Samples,
    Error,
    Panic,
}

/// Backend that counts calls and can be held closed by the test.
struct CountingBackend {
    calls: AtomicUsize,
    gate: Mutex<()>,
    outcome: Outcome,
}

impl CountingBackend {
    fn with_outcome(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: Mutex::new(()),
            outcome,
        })
    }

    fn new() -> Arc<Self> {
        Self::with_outcome(Outcome::Samples)
    }

    fn failing() -> Arc<Self> {
        Self::with_outcome(Outcome::Error)
    }

    fn panicking() -> Arc<Self> {
        Self::with_outcome(Outcome::Panic)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RenderBackend for CountingBackend {
    fn render_family_samples(&self, request: &RenderRequest) -> Result<PreviewSet, PreviewError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _open = self.gate.lock();
        match self.outcome {
            Outcome::Samples => {}
            Outcome::Error => {
                return Err(PreviewError::RenderBackend("font not found".to_string()));
            }
            Outcome::Panic => panic!("rasterizer crashed"),
        }
        Ok(FaceSlot::ALL
            .into_iter()
            .map(|slot| {
                let result = PreviewResult {
                    path: request.output_dir.join(format!("{slot}.rgba")),
                    canvas_width: request.width,
                    canvas_height: request.height,
                    ..PreviewResult::default()
                };
                (slot, result)
            })
            .collect())
    }
}

fn key(width: u32, height: u32) -> PreviewKey {
    PreviewKey {
        settings: FaceSettings::default(),
        width,
        height,
    }
}

fn cache_with(
    backend: Arc<CountingBackend>,
    dir: &TempDir,
) -> (PreviewCache, Receiver<fontpane_preview::RedrawRequest>) {
    let (tx, rx) = channel();
    let context = RenderContext {
        text_style: TextStyle::default(),
        output_dir: dir.path().to_path_buf(),
    };
    (PreviewCache::new(backend, context, tx), rx)
}

fn wait_for_redraw(rx: &Receiver<fontpane_preview::RedrawRequest>) {
    rx.recv_timeout(Duration::from_secs(5))
        .expect("render should finish and request a redraw");
}

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

#[test]
fn concurrent_lookups_dispatch_one_render() {
    let dir = TempDir::new().unwrap();
    let backend = CountingBackend::new();
    let (cache, rx) = cache_with(Arc::clone(&backend), &dir);

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.get_or_start(&key(800, 120))
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    wait_for_redraw(&rx);
    assert!(cache.get_or_start(&key(800, 120)).is_ready());
    assert_eq!(backend.calls(), 1);
    assert_eq!(cache.dispatch_count(), 1);
}

#[test]
fn lookups_while_pending_do_not_redispatch() {
    let dir = TempDir::new().unwrap();
    let backend = CountingBackend::new();
    let (cache, rx) = cache_with(Arc::clone(&backend), &dir);

    let gate = backend.gate.lock();
    assert_eq!(cache.get_or_start(&key(800, 120)), PreviewLookup::Pending);
    assert_eq!(cache.get_or_start(&key(800, 120)), PreviewLookup::Pending);
    assert_eq!(cache.get_or_start(&key(800, 120)), PreviewLookup::Pending);
    drop(gate);

    wait_for_redraw(&rx);
    assert_eq!(cache.dispatch_count(), 1);
}

#[test]
fn keys_differing_only_in_height_render_separately() {
    let dir = TempDir::new().unwrap();
    let backend = CountingBackend::new();
    let (cache, rx) = cache_with(Arc::clone(&backend), &dir);

    cache.get_or_start(&key(800, 120));
    cache.get_or_start(&key(800, 121));
    wait_for_redraw(&rx);
    wait_for_redraw(&rx);

    assert_eq!(cache.len(), 2);
    assert_eq!(backend.calls(), 2);
    let PreviewLookup::Ready(set) = cache.get_or_start(&key(800, 121)) else {
        panic!("expected ready preview");
    };
    assert_eq!(set.get(FaceSlot::Bold).unwrap().canvas_height, 121);
}

// ---------------------------------------------------------------------------
// Synchronous fast path
// ---------------------------------------------------------------------------

#[test]
fn blocking_render_waits_for_in_flight_render() {
    let dir = TempDir::new().unwrap();
    let backend = CountingBackend::new();
    let (cache, rx) = cache_with(Arc::clone(&backend), &dir);

    let gate = backend.gate.lock();
    assert_eq!(cache.get_or_start(&key(640, 80)), PreviewLookup::Pending);

    let blocking = {
        let cache = cache.clone();
        thread::spawn(move || cache.render_blocking(&key(640, 80)))
    };
    thread::sleep(Duration::from_millis(50));
    drop(gate);

    let lookup = blocking.join().unwrap();
    assert!(matches!(lookup, PreviewLookup::Ready(_)));
    wait_for_redraw(&rx);
    assert_eq!(backend.calls(), 1);
}

#[test]
fn blocking_render_of_new_key_renders_inline() {
    let dir = TempDir::new().unwrap();
    let backend = CountingBackend::new();
    let (cache, rx) = cache_with(Arc::clone(&backend), &dir);

    let lookup = cache.render_blocking(&key(640, 80));
    let PreviewLookup::Ready(set) = lookup else {
        panic!("expected ready preview");
    };
    assert!(set.is_complete());
    assert_eq!(backend.calls(), 1);
    // Synchronous renders do not post redraws; the caller redraws itself.
    assert!(rx.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn failed_render_is_cached_and_not_retried() {
    let dir = TempDir::new().unwrap();
    let backend = CountingBackend::failing();
    let (cache, rx) = cache_with(Arc::clone(&backend), &dir);

    cache.get_or_start(&key(800, 120));
    wait_for_redraw(&rx);

    let lookup = cache.get_or_start(&key(800, 120));
    assert!(lookup.is_ready());
    assert_eq!(
        lookup,
        PreviewLookup::Failed(PreviewError::RenderBackend("font not found".to_string()))
    );
    assert!(matches!(
        cache.render_blocking(&key(800, 120)),
        PreviewLookup::Failed(_)
    ));
    assert_eq!(backend.calls(), 1);
}

#[test]
fn redraw_after_panel_is_gone_is_harmless() {
    let dir = TempDir::new().unwrap();
    let backend = CountingBackend::new();
    let (cache, rx) = cache_with(Arc::clone(&backend), &dir);
    drop(rx);

    cache.get_or_start(&key(1, 1));
    for _ in 0..100 {
        if cache.peek(&key(1, 1)).is_some_and(|l| l.is_ready()) {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }
    assert!(cache.peek(&key(1, 1)).unwrap().is_ready());
}

#[test]
fn panicking_backend_settles_as_failure() {
    let dir = TempDir::new().unwrap();
    let backend = CountingBackend::panicking();
    let (cache, rx) = cache_with(Arc::clone(&backend), &dir);

    cache.get_or_start(&key(800, 120));
    wait_for_redraw(&rx);

    let PreviewLookup::Failed(PreviewError::RenderBackend(message)) =
        cache.get_or_start(&key(800, 120))
    else {
        panic!("expected a cached render failure");
    };
    assert!(message.contains("rasterizer crashed"), "{message}");

    // Neither path waits on the dead render or starts another
    assert!(matches!(
        cache.render_blocking(&key(800, 120)),
        PreviewLookup::Failed(_)
    ));
    assert_eq!(backend.calls(), 1);
}

#[test]
fn blocking_render_survives_a_panicking_backend() {
    let dir = TempDir::new().unwrap();
    let backend = CountingBackend::panicking();
    let (cache, _rx) = cache_with(Arc::clone(&backend), &dir);

    assert!(matches!(
        cache.render_blocking(&key(640, 80)),
        PreviewLookup::Failed(PreviewError::RenderBackend(_))
    ));
    assert_eq!(cache.dispatch_count(), 1);
}
