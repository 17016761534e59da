//! Persistence of candidate records: uploaded résumé, job description,
//! answered questions and the final evaluation, keyed by a numeric id.
//!
//! Every operation is a single-row read or write; nothing spans operations.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interview::models::{InterviewResult, QuestionAnswer, ResumeData};

pub mod memory;
pub mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("No record for user {0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored JSON could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Q&A pairs keyed by their position within a partition: `"0"`, `"1"`, ...
pub type QaRecord = BTreeMap<String, QuestionAnswer>;

pub fn qa_record(qas: &[QuestionAnswer]) -> QaRecord {
    qas.iter()
        .enumerate()
        .map(|(i, qa)| (i.to_string(), qa.clone()))
        .collect()
}

/// The inputs an interview session is started from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub id: i64,
    pub resume: ResumeData,
    pub job_description: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(
        &self,
        resume: &ResumeData,
        job_description: &str,
    ) -> Result<i64, PersistenceError>;

    async fn get_resume_and_job_description(
        &self,
        id: i64,
    ) -> Result<CandidateProfile, PersistenceError>;

    async fn update_interview_data(
        &self,
        id: i64,
        qas: &QaRecord,
        followup_qas: &QaRecord,
        results: &InterviewResult,
    ) -> Result<(), PersistenceError>;

    /// `Ok(None)` when the record exists but no interview has been scored yet.
    async fn get_results(&self, id: i64) -> Result<Option<InterviewResult>, PersistenceError>;
}
