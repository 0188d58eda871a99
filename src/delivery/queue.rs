use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::backend::TranscriptionBackend;
use crate::audio::SegmentRef;
use crate::transcript::TranscriptAssembler;

/// Ordered, unbounded buffer of finished segments plus its single drain
/// worker.
///
/// The capture loop appends at the tail; exactly one worker pops from the
/// head and sends each segment to the backend, strictly one at a time.
/// The pending queue and the worker-running flag live under one mutex, so
/// the worker's empty-check-and-exit is atomic with respect to `enqueue`:
/// an item pushed concurrently with worker exit either is seen by the
/// exiting worker or finds the flag already cleared and spawns a new one.
#[derive(Clone)]
pub struct DeliveryQueue {
    inner: Arc<Shared>,
}

struct Shared {
    pending: Mutex<Pending>,
    backend: Arc<dyn TranscriptionBackend>,
    assembler: TranscriptAssembler,
    delivered: AtomicUsize,
    failed: AtomicUsize,
    /// Most recent drain worker, retained so stop/tests can await it
    worker: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

struct Pending {
    queue: VecDeque<SegmentRef>,
    worker_running: bool,
}

impl DeliveryQueue {
    pub fn new(backend: Arc<dyn TranscriptionBackend>, assembler: TranscriptAssembler) -> Self {
        Self {
            inner: Arc::new(Shared {
                pending: Mutex::new(Pending {
                    queue: VecDeque::new(),
                    worker_running: false,
                }),
                backend,
                assembler,
                delivered: AtomicUsize::new(0),
                failed: AtomicUsize::new(0),
                worker: tokio::sync::Mutex::new(None),
            }),
        }
    }

    /// Append a segment at the tail and make sure a drain worker is running.
    /// Always succeeds; there is no backpressure limit by design.
    pub async fn enqueue(&self, segment: SegmentRef) {
        {
            let mut pending = self.inner.pending.lock().unwrap();
            pending.queue.push_back(segment);
        }

        // Unconditional re-trigger: covers the worker that exited between
        // our push and its own empty check
        self.drain_if_idle().await;
    }

    /// Spawn the drain worker unless one is already running.
    pub async fn drain_if_idle(&self) {
        let spawn = {
            let mut pending = self.inner.pending.lock().unwrap();
            if pending.worker_running {
                false
            } else {
                pending.worker_running = true;
                true
            }
        };

        if !spawn {
            return;
        }

        let shared = Arc::clone(&self.inner);
        let handle = tokio::spawn(drain(shared));

        // The previous worker has already observed the cleared flag and
        // exited, so replacing its finished handle is safe
        let mut worker = self.inner.worker.lock().await;
        *worker = Some(handle);
    }

    /// Wait until the queue is empty and no worker is running.
    ///
    /// Deliveries already queued or in flight are allowed to complete;
    /// nothing is cancelled.
    pub async fn wait_idle(&self) {
        loop {
            let handle = self.inner.worker.lock().await.take();
            if let Some(handle) = handle {
                if let Err(e) = handle.await {
                    warn!("Delivery worker panicked: {e}");
                }
            }

            let idle = {
                let pending = self.inner.pending.lock().unwrap();
                pending.queue.is_empty() && !pending.worker_running
            };
            if idle {
                return;
            }

            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    /// Segments waiting at the tail (not counting the one in flight)
    pub fn queued(&self) -> usize {
        self.inner.pending.lock().unwrap().queue.len()
    }

    /// Segments whose text reached the transcript
    pub fn delivered(&self) -> usize {
        self.inner.delivered.load(Ordering::SeqCst)
    }

    /// Segments dropped after a failed backend call
    pub fn failed(&self) -> usize {
        self.inner.failed.load(Ordering::SeqCst)
    }
}

/// The single drain loop: pop, deliver, repeat until the queue is observed
/// empty. Failures drop the segment and move on; the session never sees
/// them.
async fn drain(shared: Arc<Shared>) {
    debug!("Delivery worker started");

    loop {
        let segment = {
            let mut pending = shared.pending.lock().unwrap();
            match pending.queue.pop_front() {
                Some(segment) => segment,
                None => {
                    // Same critical section as enqueue's push: no item can
                    // be lost between this check and the flag clear
                    pending.worker_running = false;
                    break;
                }
            }
        };

        match shared.backend.transcribe(&segment).await {
            Ok(text) => {
                shared.delivered.fetch_add(1, Ordering::SeqCst);
                shared.assembler.append(&text);
            }
            Err(e) => {
                shared.failed.fetch_add(1, Ordering::SeqCst);
                warn!("Dropping segment {} after failed delivery: {e}", segment.sequence);
            }
        }
    }

    debug!("Delivery worker idle");
}
