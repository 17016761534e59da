use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use crate::interview::models::{InterviewResult, ResumeData};
use crate::store::{CandidateProfile, PersistenceError, QaRecord, UserStore};

#[derive(Debug, Clone)]
struct MemoryRecord {
    resume: ResumeData,
    job_description: String,
    // Only read back by tests; the HTTP surface exposes results alone.
    #[allow(dead_code)]
    qas: Option<QaRecord>,
    #[allow(dead_code)]
    followup_qas: Option<QaRecord>,
    results: Option<InterviewResult>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    records: HashMap<i64, MemoryRecord>,
}

/// Process-local store. Records are lost on restart.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    /// Stored (initial, follow-up) Q&A maps for a record, if any were saved.
    pub fn interview_data(&self, id: i64) -> Option<(QaRecord, QaRecord)> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let record = inner.records.get(&id)?;
        Some((record.qas.clone()?, record.followup_qas.clone()?))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(
        &self,
        resume: &ResumeData,
        job_description: &str,
    ) -> Result<i64, PersistenceError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.next_id += 1;
        let id = inner.next_id;
        inner.records.insert(
            id,
            MemoryRecord {
                resume: resume.clone(),
                job_description: job_description.to_string(),
                qas: None,
                followup_qas: None,
                results: None,
            },
        );

        info!("Created in-memory user record {id}");
        Ok(id)
    }

    async fn get_resume_and_job_description(
        &self,
        id: i64,
    ) -> Result<CandidateProfile, PersistenceError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let record = inner
            .records
            .get(&id)
            .ok_or(PersistenceError::NotFound(id))?;

        Ok(CandidateProfile {
            id,
            resume: record.resume.clone(),
            job_description: record.job_description.clone(),
        })
    }

    async fn update_interview_data(
        &self,
        id: i64,
        qas: &QaRecord,
        followup_qas: &QaRecord,
        results: &InterviewResult,
    ) -> Result<(), PersistenceError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let record = inner
            .records
            .get_mut(&id)
            .ok_or(PersistenceError::NotFound(id))?;

        record.qas = Some(qas.clone());
        record.followup_qas = Some(followup_qas.clone());
        record.results = Some(results.clone());
        Ok(())
    }

    async fn get_results(&self, id: i64) -> Result<Option<InterviewResult>, PersistenceError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .records
            .get(&id)
            .map(|r| r.results.clone())
            .ok_or(PersistenceError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::{InterviewStatus, QuestionAnswer};
    use crate::store::qa_record;

    #[tokio::test]
    async fn test_create_and_read_back() {
        let store = MemoryUserStore::new();
        let id = store
            .create_user(&ResumeData::from_text("resume"), "jd")
            .await
            .unwrap();
        let other = store
            .create_user(&ResumeData::from_text("other"), "jd2")
            .await
            .unwrap();
        assert_ne!(id, other);

        let profile = store.get_resume_and_job_description(id).await.unwrap();
        assert_eq!(profile.resume.text, "resume");
        assert_eq!(profile.job_description, "jd");
        assert!(store.get_results(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_then_read_results() {
        let store = MemoryUserStore::new();
        let id = store
            .create_user(&ResumeData::default(), "jd")
            .await
            .unwrap();
        let qas = qa_record(&[QuestionAnswer {
            question: "Q".into(),
            answer: "A".into(),
        }]);
        let result = InterviewResult {
            description: "ok".into(),
            score: 70,
            status: InterviewStatus::QualifiedCandidate,
        };

        store
            .update_interview_data(id, &qas, &QaRecord::new(), &result)
            .await
            .unwrap();

        assert_eq!(store.get_results(id).await.unwrap(), Some(result));
        let (initial, follow_up) = store.interview_data(id).unwrap();
        assert_eq!(initial.len(), 1);
        assert!(follow_up.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let store = MemoryUserStore::new();
        assert!(matches!(
            store.get_resume_and_job_description(42).await,
            Err(PersistenceError::NotFound(42))
        ));
        assert!(matches!(
            store.get_results(42).await,
            Err(PersistenceError::NotFound(42))
        ));
    }
}
