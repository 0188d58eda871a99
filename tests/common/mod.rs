// Shared mock collaborators for the pipeline tests: a scripted capture
// device and a scripted transcription backend, both implementing the real
// traits.
//
// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use live_scribe::{
    AudioFormat, CaptureDevice, DeliveryError, DeviceError, DeviceHandle, SegmentRef,
    TranscriptionBackend,
};

/// Capture device whose prepare/start calls can be scripted to fail.
#[derive(Default)]
pub struct MockDevice {
    opens: AtomicUsize,
    fail_prepare: AtomicBool,
    /// 0-based indices of `start` calls that should fail (0 = the initial
    /// start, 1 = the first replacement after a cut, ...)
    fail_start_on: Mutex<HashSet<usize>>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_prepare(&self) {
        self.fail_prepare.store(true, Ordering::SeqCst);
    }

    pub fn fail_start_on(&self, open_index: usize) {
        self.fail_start_on.lock().unwrap().insert(open_index);
    }

    /// Number of successful or attempted starts so far
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CaptureDevice for MockDevice {
    async fn prepare(&self, format: AudioFormat) -> Result<DeviceHandle, DeviceError> {
        if self.fail_prepare.load(Ordering::SeqCst) {
            return Err(DeviceError::Busy);
        }
        Ok(DeviceHandle::new(
            self.opens.load(Ordering::SeqCst) as u64,
            format,
        ))
    }

    async fn start(&self, _handle: &mut DeviceHandle) -> Result<(), DeviceError> {
        let n = self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_start_on.lock().unwrap().contains(&n) {
            return Err(DeviceError::Driver(format!("scripted start failure {n}")));
        }
        Ok(())
    }

    async fn stop(&self, _handle: DeviceHandle) -> Result<Vec<u8>, DeviceError> {
        Ok(vec![0u8; 64])
    }

    fn name(&self) -> &str {
        "mock-device"
    }
}

/// Backend scripted by segment sequence number.
pub struct MockBackend {
    replies: Mutex<HashMap<u64, String>>,
    failures: Mutex<HashSet<u64>>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    call_order: Mutex<Vec<u64>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashSet::new()),
            delay: Duration::from_millis(5),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            call_order: Mutex::new(Vec::new()),
        }
    }

    /// Script replies for sequences 0..n in order
    pub fn with_replies(replies: &[&str]) -> Self {
        let backend = Self::new();
        {
            let mut map = backend.replies.lock().unwrap();
            for (seq, text) in replies.iter().enumerate() {
                map.insert(seq as u64, text.to_string());
            }
        }
        backend
    }

    /// Slow every transcribe call down, keeping deliveries in flight
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make delivery of one sequence fail (simulated timeout)
    pub fn fail_on(&self, sequence: u64) {
        self.failures.lock().unwrap().insert(sequence);
    }

    /// Highest number of concurrent transcribe calls observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Sequence numbers in the order transcribe was called
    pub fn call_order(&self) -> Vec<u64> {
        self.call_order.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TranscriptionBackend for MockBackend {
    async fn transcribe(&self, segment: &SegmentRef) -> Result<String, DeliveryError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.call_order.lock().unwrap().push(segment.sequence);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failures.lock().unwrap().contains(&segment.sequence) {
            return Err(DeliveryError::Upload(format!(
                "scripted timeout for segment {}",
                segment.sequence
            )));
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&segment.sequence)
            .cloned()
            .unwrap_or_else(|| format!("seg{}", segment.sequence));

        Ok(reply)
    }
}

/// Build a bare segment for queue-level tests
pub fn segment(sequence: u64) -> SegmentRef {
    SegmentRef {
        sequence,
        data: vec![0u8; 16],
        format: AudioFormat::default(),
        captured_at: chrono::Utc::now(),
        handoff: Duration::ZERO,
    }
}
