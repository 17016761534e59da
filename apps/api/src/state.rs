use std::sync::Arc;

use crate::chat::ChatRegistry;
use crate::config::Config;
use crate::interview::service::InterviewService;
use crate::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Candidate records. Postgres when `DATABASE_URL` is set, in-memory otherwise.
    pub store: Arc<dyn UserStore>,
    pub interview: InterviewService,
    /// Chats in progress, keyed by user id.
    pub chats: ChatRegistry,
    pub config: Config,
}
