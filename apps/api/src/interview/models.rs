use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Text extracted from an uploaded résumé. Immutable once extracted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeData {
    pub text: String,
    #[serde(rename = "numPages", alias = "pageCount", default)]
    pub page_count: u32,
    #[serde(rename = "info", alias = "metadata", default)]
    pub metadata: Map<String, Value>,
}

impl ResumeData {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

/// A numbered interview question. Numbers are 1-based and keep increasing
/// across the initial and follow-up sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub number: u32,
    pub question: String,
}

/// Everything the prompt builder needs for one call.
#[derive(Debug, Clone, Default)]
pub struct InterviewContext {
    pub resume: ResumeData,
    pub job_description: String,
    pub initial_qas: Vec<QuestionAnswer>,
    pub followup_qas: Vec<QuestionAnswer>,
}

impl InterviewContext {
    pub fn new(resume: ResumeData, job_description: impl Into<String>) -> Self {
        Self {
            resume,
            job_description: job_description.into(),
            ..Default::default()
        }
    }

    pub fn with_initial_qas(mut self, qas: Vec<QuestionAnswer>) -> Self {
        self.initial_qas = qas;
        self
    }

    pub fn with_followup_qas(mut self, qas: Vec<QuestionAnswer>) -> Self {
        self.followup_qas = qas;
        self
    }

    /// Initial pairs followed by follow-up pairs.
    pub fn all_qas(&self) -> impl Iterator<Item = &QuestionAnswer> {
        self.initial_qas.iter().chain(self.followup_qas.iter())
    }

    pub fn qa_count(&self) -> usize {
        self.initial_qas.len() + self.followup_qas.len()
    }

    pub fn is_follow_up(&self) -> bool {
        self.qa_count() > 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterviewStatus {
    #[serde(rename = "Promising Candidate")]
    PromisingCandidate,
    #[serde(rename = "Qualified Candidate")]
    QualifiedCandidate,
    #[default]
    #[serde(rename = "On Hold")]
    OnHold,
    #[serde(rename = "Schedule Another Interview")]
    ScheduleAnotherInterview,
    #[serde(rename = "Bad Candidate")]
    BadCandidate,
}

impl InterviewStatus {
    #[cfg(test)]
    pub const ALL: [InterviewStatus; 5] = [
        InterviewStatus::PromisingCandidate,
        InterviewStatus::QualifiedCandidate,
        InterviewStatus::OnHold,
        InterviewStatus::ScheduleAnotherInterview,
        InterviewStatus::BadCandidate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InterviewStatus::PromisingCandidate => "Promising Candidate",
            InterviewStatus::QualifiedCandidate => "Qualified Candidate",
            InterviewStatus::OnHold => "On Hold",
            InterviewStatus::ScheduleAnotherInterview => "Schedule Another Interview",
            InterviewStatus::BadCandidate => "Bad Candidate",
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final evaluation of one session. `score` is always within 0..=100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewResult {
    pub description: String,
    pub score: u8,
    pub status: InterviewStatus,
}
