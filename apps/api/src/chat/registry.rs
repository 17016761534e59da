use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;

use crate::chat::driver::InterviewChat;
use crate::chat::speech::UtteranceQueue;

/// Upper bound on how often idle chats are swept.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// One live chat. The mutex serializes turns within a session.
pub struct ChatHandle {
    pub chat: Mutex<InterviewChat>,
    pub utterances: Option<Arc<UtteranceQueue>>,
    last_active: std::sync::Mutex<Instant>,
}

impl ChatHandle {
    pub fn drain_utterances(&self) -> Vec<String> {
        self.utterances
            .as_ref()
            .map(|q| q.drain())
            .unwrap_or_default()
    }

    pub fn touch(&self) {
        *self.last_active.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .elapsed()
    }
}

/// Live chats keyed by user id. At most one chat per user; starting a new one
/// replaces the old.
#[derive(Clone, Default)]
pub struct ChatRegistry {
    chats: Arc<RwLock<HashMap<i64, Arc<ChatHandle>>>>,
}

impl ChatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        chat: InterviewChat,
        utterances: Option<Arc<UtteranceQueue>>,
    ) -> Arc<ChatHandle> {
        let user_id = chat.user_id();
        let handle = Arc::new(ChatHandle {
            chat: Mutex::new(chat),
            utterances,
            last_active: std::sync::Mutex::new(Instant::now()),
        });
        self.chats
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(user_id, handle.clone());
        handle
    }

    /// Looks up a chat and marks it active.
    pub fn get(&self, user_id: i64) -> Option<Arc<ChatHandle>> {
        let handle = self
            .chats
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&user_id)
            .cloned()?;
        handle.touch();
        Some(handle)
    }

    pub fn remove(&self, user_id: i64) {
        self.chats
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&user_id);
    }

    /// Drops chats idle for at least `max_idle`. A chat with a turn in flight
    /// is never dropped. Returns the number removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut chats = self.chats.write().unwrap_or_else(|e| e.into_inner());
        let before = chats.len();
        chats.retain(|_, handle| handle.idle_for() < max_idle || handle.chat.try_lock().is_err());
        before - chats.len()
    }

    /// Runs `evict_idle` periodically for the life of the process.
    pub fn spawn_idle_sweeper(&self, max_idle: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        let period = max_idle.clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle(max_idle);
                if evicted > 0 {
                    info!("Evicted {evicted} idle interview chat(s)");
                }
            }
        })
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.chats.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::{Question, ResumeData};
    use crate::interview::service::InterviewService;
    use crate::llm_client::mock::ScriptedModel;
    use crate::store::CandidateProfile;

    const IDLE: Duration = Duration::from_secs(600);

    fn chat(user_id: i64) -> InterviewChat {
        let profile = CandidateProfile {
            id: user_id,
            resume: ResumeData::from_text("r"),
            job_description: "jd".to_string(),
        };
        let questions = vec![Question {
            number: 1,
            question: "Why Go?".to_string(),
        }];
        InterviewChat::start(
            profile,
            questions,
            InterviewService::new(Arc::new(ScriptedModel::new())),
            None,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_idle_drops_only_stale_chats() {
        let registry = ChatRegistry::new();
        registry.insert(chat(1), None);
        registry.insert(chat(2), None);

        tokio::time::advance(IDLE - Duration::from_secs(1)).await;
        assert!(registry.get(2).is_some());
        tokio::time::advance(Duration::from_secs(1)).await;

        assert_eq!(registry.evict_idle(IDLE), 1);
        assert!(registry.get(1).is_none());
        assert!(registry.get(2).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_idle_keeps_chat_with_turn_in_flight() {
        let registry = ChatRegistry::new();
        let handle = registry.insert(chat(1), None);
        let _turn = handle.chat.lock().await;

        tokio::time::advance(IDLE * 2).await;

        assert_eq!(registry.evict_idle(IDLE), 0);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_in_background() {
        let registry = ChatRegistry::new();
        registry.insert(chat(1), None);
        let sweeper = registry.spawn_idle_sweeper(IDLE);

        tokio::time::sleep(IDLE + MAX_SWEEP_INTERVAL * 2).await;

        assert_eq!(registry.len(), 0);
        sweeper.abort();
    }
}
