//! Runs an interview chat: feeds events into the reducer and carries out the
//! effects it returns (waiting, calling the model, persisting the outcome).

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::chat::session::{
    reduce, ChatEffect, ChatError, ChatEvent, InterviewSession, Phase, Transition,
    CLOSING_MESSAGE, WELCOME_MESSAGE,
};
use crate::chat::speech::Speaker;
use crate::errors::AppError;
use crate::interview::models::{
    InterviewContext, InterviewResult, Question, QuestionAnswer, ResumeData,
};
use crate::interview::service::InterviewService;
use crate::store::{qa_record, CandidateProfile, UserStore};

pub const ENDING_MESSAGE: &str = "Ending interview and saving your responses...";
pub const SAVE_FAILED_MESSAGE: &str =
    "There was an error saving your interview data. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Interviewer,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOutcome {
    pub result: InterviewResult,
    pub results_path: String,
}

pub fn results_path(user_id: i64) -> String {
    format!("/result/{user_id}")
}

pub struct InterviewChat {
    user_id: i64,
    resume: ResumeData,
    job_description: String,
    session: InterviewSession,
    messages: Vec<ChatMessage>,
    service: InterviewService,
    speaker: Option<Arc<dyn Speaker>>,
    is_ending: bool,
}

impl InterviewChat {
    /// Opens the chat with the welcome message followed by the first question.
    pub fn start(
        profile: CandidateProfile,
        questions: Vec<Question>,
        service: InterviewService,
        speaker: Option<Arc<dyn Speaker>>,
    ) -> Self {
        let session = InterviewSession::new(questions);
        let opening = session
            .current_question()
            .map(|q| q.question.clone())
            .unwrap_or_else(|| CLOSING_MESSAGE.to_string());

        let mut chat = Self {
            user_id: profile.id,
            resume: profile.resume,
            job_description: profile.job_description,
            session,
            messages: Vec::new(),
            service,
            speaker,
            is_ending: false,
        };
        chat.say(WELCOME_MESSAGE.to_string());
        chat.say(opening);

        info!(
            "Started interview chat for user {} with {} question(s)",
            chat.user_id,
            chat.session.questions().len()
        );
        chat
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn session(&self) -> &InterviewSession {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Records an answer and plays out the interviewer's response, including
    /// the thinking pause and, after the last initial answer, follow-up
    /// generation. Returns the messages appended by this call.
    pub async fn submit_answer(&mut self, text: String) -> Result<Vec<ChatMessage>, ChatError> {
        if self.is_ending {
            return Err(ChatError::Ending);
        }

        let before = self.messages.len();
        let mut pending = VecDeque::from([ChatEvent::AnswerSubmitted(text)]);

        while let Some(event) = pending.pop_front() {
            let Transition { session, effects } = reduce(&self.session, event)?;
            self.session = session;

            for effect in effects {
                match effect {
                    ChatEffect::UserMessage(text) => self.push(Sender::User, text),
                    ChatEffect::InterviewerMessage(text) => self.say(text),
                    ChatEffect::Pause(delay) => {
                        tokio::time::sleep(delay).await;
                        pending.push_back(ChatEvent::DelayElapsed);
                    }
                    ChatEffect::GenerateFollowUps(qas) => {
                        pending.push_back(self.request_follow_ups(qas).await);
                    }
                }
            }
        }

        Ok(self.messages[before..].to_vec())
    }

    /// Scores the interview and stores both answer partitions with the result.
    ///
    /// On failure the error is reported in the transcript and the call may be retried.
    pub async fn end_interview(&mut self, store: &dyn UserStore) -> Result<EndOutcome, AppError> {
        if self.is_ending {
            return Err(ChatError::Ending.into());
        }
        self.is_ending = true;
        if let Some(speaker) = &self.speaker {
            speaker.stop();
        }
        self.say(ENDING_MESSAGE.to_string());

        match self.score_and_save(store).await {
            Ok(outcome) => {
                info!(
                    "Interview for user {} saved: score {}",
                    self.user_id, outcome.result.score
                );
                Ok(outcome)
            }
            Err(e) => {
                error!("Failed to end interview for user {}: {e}", self.user_id);
                self.say(SAVE_FAILED_MESSAGE.to_string());
                self.is_ending = false;
                Err(e)
            }
        }
    }

    async fn score_and_save(&self, store: &dyn UserStore) -> Result<EndOutcome, AppError> {
        let (initial, follow_up) = self.session.partition();
        let ctx = self
            .context()
            .with_initial_qas(initial)
            .with_followup_qas(follow_up);

        let result = self.service.generate_interview_result(&ctx).await?;
        store
            .update_interview_data(
                self.user_id,
                &qa_record(&ctx.initial_qas),
                &qa_record(&ctx.followup_qas),
                &result,
            )
            .await?;

        Ok(EndOutcome {
            result,
            results_path: results_path(self.user_id),
        })
    }

    async fn request_follow_ups(&self, answered: Vec<QuestionAnswer>) -> ChatEvent {
        let ctx = self.context().with_initial_qas(answered);
        match self.service.generate_questions(&ctx).await {
            Ok(questions) => ChatEvent::FollowUpsReady(questions),
            Err(e) => {
                warn!(
                    "Follow-up generation failed for user {}, closing interview: {e}",
                    self.user_id
                );
                ChatEvent::FollowUpsFailed
            }
        }
    }

    fn context(&self) -> InterviewContext {
        InterviewContext::new(self.resume.clone(), self.job_description.clone())
    }

    fn say(&mut self, text: String) {
        if let Some(speaker) = &self.speaker {
            speaker.speak(&text);
        }
        self.push(Sender::Interviewer, text);
    }

    fn push(&mut self, sender: Sender, text: String) {
        self.messages.push(ChatMessage {
            id: Uuid::new_v4(),
            sender,
            text,
            timestamp: Utc::now(),
        });
    }
}
