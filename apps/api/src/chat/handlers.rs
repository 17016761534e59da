//! Axum route handlers for interview chats.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::chat::driver::{ChatMessage, EndOutcome, InterviewChat};
use crate::chat::registry::ChatHandle;
use crate::chat::session::Phase;
use crate::chat::speech::{Speaker, UtteranceQueue};
use crate::errors::AppError;
use crate::interview::models::{InterviewContext, Question};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StartChatRequest {
    #[serde(default)]
    pub voice: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatView {
    pub user_id: i64,
    pub phase: Phase,
    pub is_complete: bool,
    pub follow_ups_generated: bool,
    pub answered_count: usize,
    pub question_count: usize,
    pub current_question: Option<Question>,
    pub messages: Vec<ChatMessage>,
    pub utterances: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    #[serde(flatten)]
    pub view: ChatView,
    /// Present when the chat was ended automatically on completion.
    pub outcome: Option<EndOutcome>,
}

fn view(chat: &InterviewChat, messages: Vec<ChatMessage>, handle: &ChatHandle) -> ChatView {
    let session = chat.session();
    ChatView {
        user_id: chat.user_id(),
        phase: chat.phase(),
        is_complete: session.is_complete(),
        follow_ups_generated: session.has_generated_follow_ups(),
        answered_count: session.answered_count(),
        question_count: session.questions().len(),
        current_question: session.current_question().cloned(),
        messages,
        utterances: handle.drain_utterances(),
    }
}

fn lookup(state: &AppState, user_id: i64) -> Result<Arc<ChatHandle>, AppError> {
    state
        .chats
        .get(user_id)
        .ok_or_else(|| AppError::NotFound(format!("No interview in progress for user {user_id}")))
}

/// POST /api/chat/:user_id
///
/// Generates the initial questions from the stored résumé and job description
/// and opens a chat. A failed generation opens an empty (already closed) chat.
pub async fn handle_start_chat(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    body: Option<Json<StartChatRequest>>,
) -> Result<Json<ChatView>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let profile = state.store.get_resume_and_job_description(user_id).await?;

    let ctx = InterviewContext::new(profile.resume.clone(), profile.job_description.clone());
    let questions = match state.interview.generate_questions(&ctx).await {
        Ok(questions) => questions,
        Err(e) => {
            warn!("Initial question generation failed for user {user_id}: {e}");
            Vec::new()
        }
    };

    let utterances = request.voice.then(|| Arc::new(UtteranceQueue::new()));
    let speaker = utterances.clone().map(|q| q as Arc<dyn Speaker>);
    let chat = InterviewChat::start(profile, questions, state.interview.clone(), speaker);

    let handle = state.chats.insert(chat, utterances);
    let chat = handle.chat.lock().await;
    let messages = chat.messages().to_vec();
    Ok(Json(view(&chat, messages, &handle)))
}

/// GET /api/chat/:user_id
pub async fn handle_get_chat(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ChatView>, AppError> {
    let handle = lookup(&state, user_id)?;
    let chat = handle.chat.lock().await;
    let messages = chat.messages().to_vec();
    Ok(Json(view(&chat, messages, &handle)))
}

/// POST /api/chat/:user_id/messages
///
/// Answers the current question. Only one turn per chat may be in flight.
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let handle = lookup(&state, user_id)?;
    let mut chat = handle.chat.try_lock().map_err(|_| {
        AppError::Conflict("A previous answer is still being processed".to_string())
    })?;

    let mut appended = chat.submit_answer(request.text).await?;

    let mut outcome = None;
    if state.config.chat_auto_end && chat.session().is_complete() {
        let mark = chat.messages().len();
        match chat.end_interview(state.store.as_ref()).await {
            Ok(done) => outcome = Some(done),
            Err(e) => warn!("Automatic end of interview failed for user {user_id}: {e}"),
        }
        appended.extend_from_slice(&chat.messages()[mark..]);
    }

    let response = AnswerResponse {
        view: view(&chat, appended, &handle),
        outcome,
    };
    drop(chat);
    if response.outcome.is_some() {
        state.chats.remove(user_id);
    }
    Ok(Json(response))
}

/// POST /api/chat/:user_id/end
///
/// Scores and stores the interview. The chat is closed on success and kept
/// for a retry on failure.
pub async fn handle_end_chat(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<EndOutcome>, AppError> {
    let handle = lookup(&state, user_id)?;
    let mut chat = handle
        .chat
        .try_lock()
        .map_err(|_| AppError::Conflict("The interview is busy; try again shortly".to_string()))?;

    let outcome = chat.end_interview(state.store.as_ref()).await?;
    drop(chat);
    state.chats.remove(user_id);
    Ok(Json(outcome))
}
