pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::interview::handlers as interview;
use crate::state::AppState;
use crate::users::handlers as users;
use crate::users::upload::MAX_RESUME_BYTES;

// Headroom for the job description and multipart framing.
const UPLOAD_BODY_LIMIT: usize = MAX_RESUME_BYTES + 256 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless question / result generation
        .route("/api/interview", post(interview::handle_interview))
        // Candidate records
        .route(
            "/api/users",
            post(users::handle_create_user).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/users/:user_id", get(users::handle_get_user))
        .route("/api/users/:user_id/results", get(users::handle_get_results))
        // Interview chat
        .route(
            "/api/chat/:user_id",
            get(chat::handle_get_chat).post(chat::handle_start_chat),
        )
        .route("/api/chat/:user_id/messages", post(chat::handle_answer))
        .route("/api/chat/:user_id/end", post(chat::handle_end_chat))
        .with_state(state)
}
