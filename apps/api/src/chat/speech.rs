use std::sync::Mutex;

/// Optional voice output for interviewer turns.
///
/// Attached to a chat at start; a chat without a speaker is text-only.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str);

    /// Cancels anything still queued.
    fn stop(&self);
}

/// Buffers utterances for a browser-side text-to-speech client, which drains
/// them with every chat response. Each new utterance replaces anything still
/// unspoken, the same way a synthesizer cancels ongoing speech.
#[derive(Default)]
pub struct UtteranceQueue {
    pending: Mutex<Vec<String>>,
}

impl UtteranceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl Speaker for UtteranceQueue {
    fn speak(&self, text: &str) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.clear();
        pending.push(text.to_string());
    }

    fn stop(&self) {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_utterance_replaces_unspoken_ones() {
        let queue = UtteranceQueue::new();
        queue.speak("first");
        queue.speak("second");
        assert_eq!(queue.drain(), vec!["second".to_string()]);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_stop_discards_pending() {
        let queue = UtteranceQueue::new();
        queue.speak("hello");
        queue.stop();
        assert!(queue.drain().is_empty());
    }
}
