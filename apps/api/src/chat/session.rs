//! Interview chat state machine.
//!
//! `reduce` is a pure `(session, event) -> (session, effects)` step. It never
//! performs I/O; the driver executes the returned effects (waiting, calling the
//! model) and feeds their outcomes back in as new events.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::interview::models::{Question, QuestionAnswer};

/// Artificial "thinking" pause between an answer and the next interviewer turn.
pub const THINKING_DELAY: Duration = Duration::from_secs(1);

pub const WELCOME_MESSAGE: &str = "Welcome to your interview! I'll be asking you some questions \
    based on your resume and the job description. Let's get started.";
pub const PROCESSING_MESSAGE: &str =
    "Processing your answers and generating follow-up questions...";
pub const CLOSING_MESSAGE: &str =
    "Thank you for completing the interview! We'll review your responses and get back to you soon.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AskingInitial,
    AskingFollowUp,
    AwaitingFollowUpGeneration,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    AnswerSubmitted(String),
    DelayElapsed,
    FollowUpsReady(Vec<Question>),
    FollowUpsFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEffect {
    UserMessage(String),
    InterviewerMessage(String),
    Pause(Duration),
    /// Request follow-up questions based on the answered pairs, in question order.
    GenerateFollowUps(Vec<QuestionAnswer>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Follow-up questions are being generated; please wait")]
    Busy,

    #[error("The interview is already complete")]
    Complete,

    #[error("Answer cannot be empty")]
    EmptyAnswer,

    #[error("The interview is already being ended")]
    Ending,

    #[error("Unexpected event: {0}")]
    UnexpectedEvent(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: InterviewSession,
    pub effects: Vec<ChatEffect>,
}

/// Client-held state of one interview.
///
/// `current_index <= questions.len()` always holds; `has_generated_follow_ups`
/// flips to true at most once and `is_complete` never reverts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewSession {
    questions: Vec<Question>,
    answers: BTreeMap<usize, String>,
    current_index: usize,
    initial_count: usize,
    is_complete: bool,
    is_generating_follow_up: bool,
    has_generated_follow_ups: bool,
}

impl InterviewSession {
    /// A session over the initial question set. An empty set starts complete.
    pub fn new(questions: Vec<Question>) -> Self {
        let is_complete = questions.is_empty();
        Self {
            initial_count: questions.len(),
            questions,
            answers: BTreeMap::new(),
            current_index: 0,
            is_complete,
            is_generating_follow_up: false,
            has_generated_follow_ups: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_complete {
            Phase::Complete
        } else if self.is_generating_follow_up {
            Phase::AwaitingFollowUpGeneration
        } else if self.current_index >= self.initial_count {
            Phase::AskingFollowUp
        } else {
            Phase::AskingInitial
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.is_complete {
            return None;
        }
        self.questions.get(self.current_index)
    }

    #[cfg(test)]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn has_generated_follow_ups(&self) -> bool {
        self.has_generated_follow_ups
    }

    /// Answered pairs in question order.
    pub fn answered_pairs(&self) -> Vec<QuestionAnswer> {
        self.answers
            .iter()
            .filter_map(|(&index, answer)| {
                self.questions.get(index).map(|q| QuestionAnswer {
                    question: q.question.clone(),
                    answer: answer.clone(),
                })
            })
            .collect()
    }

    /// Splits every question into (initial, follow-up) pairs. Unanswered
    /// questions carry an empty answer.
    pub fn partition(&self) -> (Vec<QuestionAnswer>, Vec<QuestionAnswer>) {
        let pair = |(index, q): (usize, &Question)| QuestionAnswer {
            question: q.question.clone(),
            answer: self.answers.get(&index).cloned().unwrap_or_default(),
        };
        let initial = self
            .questions
            .iter()
            .enumerate()
            .take(self.initial_count)
            .map(pair)
            .collect();
        let follow_up = self
            .questions
            .iter()
            .enumerate()
            .skip(self.initial_count)
            .map(pair)
            .collect();
        (initial, follow_up)
    }

    fn complete(&mut self, effects: &mut Vec<ChatEffect>) {
        self.is_complete = true;
        self.is_generating_follow_up = false;
        effects.push(ChatEffect::InterviewerMessage(CLOSING_MESSAGE.to_string()));
    }
}

pub fn reduce(session: &InterviewSession, event: ChatEvent) -> Result<Transition, ChatError> {
    let mut next = session.clone();
    let mut effects = Vec::new();

    match event {
        ChatEvent::AnswerSubmitted(text) => {
            if next.is_complete {
                return Err(ChatError::Complete);
            }
            if next.is_generating_follow_up {
                return Err(ChatError::Busy);
            }
            if text.trim().is_empty() {
                return Err(ChatError::EmptyAnswer);
            }
            next.answers.insert(next.current_index, text.clone());
            effects.push(ChatEffect::UserMessage(text));
            effects.push(ChatEffect::Pause(THINKING_DELAY));
        }

        ChatEvent::DelayElapsed => {
            if next.is_complete || next.is_generating_follow_up {
                return Err(ChatError::UnexpectedEvent("delay elapsed outside an answer turn"));
            }
            let next_index = next.current_index + 1;
            if next_index < next.questions.len() {
                next.current_index = next_index;
                let question = next.questions[next_index].question.clone();
                effects.push(ChatEffect::InterviewerMessage(question));
            } else if !next.has_generated_follow_ups {
                next.is_generating_follow_up = true;
                next.has_generated_follow_ups = true;
                effects.push(ChatEffect::InterviewerMessage(
                    PROCESSING_MESSAGE.to_string(),
                ));
                effects.push(ChatEffect::GenerateFollowUps(next.answered_pairs()));
            } else {
                next.complete(&mut effects);
            }
        }

        ChatEvent::FollowUpsReady(questions) => {
            if !next.is_generating_follow_up {
                return Err(ChatError::UnexpectedEvent("follow-ups were not requested"));
            }
            match questions.first() {
                Some(first) => {
                    effects.push(ChatEffect::InterviewerMessage(first.question.clone()));
                    next.current_index = next.questions.len();
                    next.questions.extend(questions);
                    next.is_generating_follow_up = false;
                }
                None => next.complete(&mut effects),
            }
        }

        ChatEvent::FollowUpsFailed => {
            if !next.is_generating_follow_up {
                return Err(ChatError::UnexpectedEvent("follow-ups were not requested"));
            }
            next.complete(&mut effects);
        }
    }

    Ok(Transition {
        session: next,
        effects,
    })
}
