use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{GatewayError, LanguageModel};

/// A queued reply for `ScriptedModel`.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Fail { status: u16, message: String },
    /// Replies with `text` once `gate` is notified.
    Gated { gate: Arc<Notify>, text: String },
}

/// Language model that replays queued replies and records every prompt it receives.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<MockReply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        let model = Self::new();
        model.replies.lock().unwrap().extend(replies);
        model
    }

    pub fn text(content: impl Into<String>) -> MockReply {
        MockReply::Text(content.into())
    }

    pub fn failure(status: u16) -> MockReply {
        MockReply::Fail {
            status,
            message: "scripted failure".to_string(),
        }
    }

    pub fn gated(gate: Arc<Notify>, content: impl Into<String>) -> MockReply {
        MockReply::Gated {
            gate,
            text: content.into(),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn send(&self, prompt: &str) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Gated { gate, text }) => {
                gate.notified().await;
                Ok(text)
            }
            Some(MockReply::Fail { status, message }) => Err(GatewayError::Api { status, message }),
            None => Err(GatewayError::MissingCandidate),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
