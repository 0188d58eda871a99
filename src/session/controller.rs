use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::config::SessionConfig;
use super::stats::SessionStats;
use crate::audio::{CaptureDevice, SegmentRecorder};
use crate::delivery::{DeliveryQueue, TranscriptionBackend};
use crate::error::SessionError;
use crate::transcript::TranscriptAssembler;

/// Orchestrates one recording session: Idle -> Recording -> Stopping -> Idle.
///
/// Owns the capture loop's lifetime, the delivery queue, and the transcript;
/// the recording handle itself is owned by the `SegmentRecorder` inside the
/// capture task and never shared.
pub struct SessionController {
    config: SessionConfig,
    device: Arc<dyn CaptureDevice>,
    queue: DeliveryQueue,
    assembler: TranscriptAssembler,
    started_at: chrono::DateTime<chrono::Utc>,
    is_recording: Arc<AtomicBool>,
    segments_produced: Arc<AtomicUsize>,
    /// Serializes start/stop transitions and holds the capture task wiring
    control: Mutex<Control>,
}

#[derive(Default)]
struct Control {
    shutdown: Option<watch::Sender<bool>>,
    capture_task: Option<JoinHandle<()>>,
}

impl SessionController {
    pub fn new(
        config: SessionConfig,
        device: Arc<dyn CaptureDevice>,
        backend: Arc<dyn TranscriptionBackend>,
    ) -> Self {
        let assembler = TranscriptAssembler::new();
        let queue = DeliveryQueue::new(backend, assembler.clone());

        Self {
            config,
            device,
            queue,
            assembler,
            started_at: Utc::now(),
            is_recording: Arc::new(AtomicBool::new(false)),
            segments_produced: Arc::new(AtomicUsize::new(0)),
            control: Mutex::new(Control::default()),
        }
    }

    /// Start recording. A second call while recording is a no-op.
    pub async fn start(&self) -> Result<(), SessionError> {
        let mut control = self.control.lock().await;

        if self.is_recording.load(Ordering::SeqCst) {
            warn!("Recording already started");
            return Ok(());
        }

        if !self.config.permission_granted {
            return Err(SessionError::PermissionDenied);
        }

        info!("Starting recording session: {}", self.config.session_id);

        // A device failure here aborts the transition; state stays Idle
        let recorder =
            SegmentRecorder::prepare_and_start(Arc::clone(&self.device), self.config.format)
                .await?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        self.is_recording.store(true, Ordering::SeqCst);

        let capture_task = tokio::spawn(capture_loop(
            recorder,
            shutdown_rx,
            self.queue.clone(),
            self.config.chunk_duration,
            Arc::clone(&self.is_recording),
            Arc::clone(&self.segments_produced),
        ));

        control.shutdown = Some(shutdown_tx);
        control.capture_task = Some(capture_task);

        info!("Recording session started: {}", self.config.session_id);

        Ok(())
    }

    /// Stop recording: flush the trailing partial chunk, then wait for the
    /// delivery queue to drain. Calling stop while idle is a no-op.
    pub async fn stop(&self) -> Result<SessionStats, SessionError> {
        let mut control = self.control.lock().await;

        // The capture loop clears the flag itself after a fatal device
        // failure; a held task handle means there is still wiring to reap
        // and a queue to drain
        if !self.is_recording.load(Ordering::SeqCst) && control.capture_task.is_none() {
            warn!("Recording not active");
            return Ok(self.stats());
        }

        info!("Stopping recording session: {}", self.config.session_id);

        self.is_recording.store(false, Ordering::SeqCst);

        // Wake the capture loop mid-sleep; it flushes the final partial
        // chunk and enqueues it before exiting
        if let Some(shutdown) = control.shutdown.take() {
            let _ = shutdown.send(true);
        }

        if let Some(task) = control.capture_task.take() {
            if let Err(e) = task.await {
                error!("Capture task panicked: {}", e);
            }
        }

        // Queued and in-flight deliveries complete rather than being
        // cancelled; losing the final words is worse than a short tail of
        // background work
        self.queue.wait_idle().await;

        info!("Recording session stopped: {}", self.config.session_id);

        Ok(self.stats())
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    /// Current session statistics
    pub fn stats(&self) -> SessionStats {
        let duration = Utc::now().signed_duration_since(self.started_at);

        SessionStats {
            is_recording: self.is_recording.load(Ordering::SeqCst),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            segments_produced: self.segments_produced.load(Ordering::SeqCst),
            segments_delivered: self.queue.delivered(),
            segments_failed: self.queue.failed(),
            segments_queued: self.queue.queued(),
        }
    }

    /// Accumulated transcript so far
    pub fn transcript(&self) -> String {
        self.assembler.snapshot()
    }

    /// Continuously-updated transcript feed
    pub fn transcript_updates(&self) -> watch::Receiver<String> {
        self.assembler.subscribe()
    }
}

/// The chunk-timer loop. Every `chunk_duration` it cuts the current segment
/// and hands it to the delivery queue; on shutdown it flushes the trailing
/// partial chunk instead.
async fn capture_loop(
    mut recorder: SegmentRecorder,
    mut shutdown: watch::Receiver<bool>,
    queue: DeliveryQueue,
    chunk_duration: Duration,
    is_recording: Arc<AtomicBool>,
    segments_produced: Arc<AtomicUsize>,
) {
    info!("Capture loop started ({}ms chunks)", chunk_duration.as_millis());

    loop {
        tokio::select! {
            _ = tokio::time::sleep(chunk_duration) => {
                match recorder.cut_segment().await {
                    Ok(Some(segment)) => {
                        segments_produced.fetch_add(1, Ordering::SeqCst);
                        queue.enqueue(segment).await;
                    }
                    // A tick spent recovering the capture handle; no audio
                    // was recorded during the previous chunk window
                    Ok(None) => {}
                    Err(e) => {
                        warn!("Ending session after repeated capture failure: {}", e);
                        is_recording.store(false, Ordering::SeqCst);
                        return;
                    }
                }
            }
            _ = shutdown.changed() => break,
        }
    }

    // Final flush: stop without restart
    match recorder.finish().await {
        Ok(Some(segment)) => {
            segments_produced.fetch_add(1, Ordering::SeqCst);
            queue.enqueue(segment).await;
        }
        Ok(None) => {}
        Err(e) => warn!("Failed to flush trailing chunk: {}", e),
    }

    info!("Capture loop stopped");
}
