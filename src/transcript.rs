use std::sync::{Arc, Mutex};

use tokio::sync::watch;

/// Accumulates backend replies into one running transcript.
///
/// Fragments are appended in the order deliveries complete; because the
/// delivery worker is strictly sequential, that equals segment order
/// whenever deliveries succeed. Cloning is cheap and every clone shares
/// the same transcript.
#[derive(Clone)]
pub struct TranscriptAssembler {
    inner: Arc<Inner>,
}

struct Inner {
    transcript: Mutex<String>,
    updates: watch::Sender<String>,
}

impl TranscriptAssembler {
    pub fn new() -> Self {
        let (updates, _) = watch::channel(String::new());
        Self {
            inner: Arc::new(Inner {
                transcript: Mutex::new(String::new()),
                updates,
            }),
        }
    }

    /// Append one reply, joined with a single space. Surrounding whitespace
    /// is trimmed; whitespace-only replies leave the transcript untouched.
    pub fn append(&self, text: &str) {
        let fragment = text.trim();
        if fragment.is_empty() {
            return;
        }

        let snapshot = {
            let mut transcript = self.inner.transcript.lock().unwrap();
            if !transcript.is_empty() {
                transcript.push(' ');
            }
            transcript.push_str(fragment);
            transcript.clone()
        };

        // Stored even with no receivers, so a subscriber attaching
        // mid-session starts from the current transcript
        self.inner.updates.send_replace(snapshot);
    }

    /// Current transcript text
    pub fn snapshot(&self) -> String {
        self.inner.transcript.lock().unwrap().clone()
    }

    /// Continuously-updated transcript feed
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.inner.updates.subscribe()
    }
}

impl Default for TranscriptAssembler {
    fn default() -> Self {
        Self::new()
    }
}
