use async_trait::async_trait;
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::interview::models::{InterviewResult, ResumeData};
use crate::store::{CandidateProfile, PersistenceError, QaRecord, UserStore};

#[derive(Debug, Clone, FromRow)]
struct ProfileRow {
    id: i64,
    resume: Value,
    job_description: String,
}

/// PostgreSQL-backed user records (`users` table, see `migrations/`).
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(
        &self,
        resume: &ResumeData,
        job_description: &str,
    ) -> Result<i64, PersistenceError> {
        let resume = serde_json::to_value(resume)?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (resume, job_description) VALUES ($1, $2) RETURNING id",
        )
        .bind(resume)
        .bind(job_description)
        .fetch_one(&self.pool)
        .await?;

        info!("Created user record {id}");
        Ok(id)
    }

    async fn get_resume_and_job_description(
        &self,
        id: i64,
    ) -> Result<CandidateProfile, PersistenceError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, resume, job_description FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(PersistenceError::NotFound(id))?;

        Ok(CandidateProfile {
            id: row.id,
            resume: serde_json::from_value(row.resume)?,
            job_description: row.job_description,
        })
    }

    async fn update_interview_data(
        &self,
        id: i64,
        qas: &QaRecord,
        followup_qas: &QaRecord,
        results: &InterviewResult,
    ) -> Result<(), PersistenceError> {
        let updated = sqlx::query(
            r#"
            UPDATE users
            SET qas = $1, followup_qas = $2, results = $3, updated_at = now()
            WHERE id = $4
            "#,
        )
        .bind(serde_json::to_value(qas)?)
        .bind(serde_json::to_value(followup_qas)?)
        .bind(serde_json::to_value(results)?)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(PersistenceError::NotFound(id));
        }

        info!(
            "Stored interview data for user {id}: {} initial, {} follow-up answer(s)",
            qas.len(),
            followup_qas.len()
        );
        Ok(())
    }

    async fn get_results(&self, id: i64) -> Result<Option<InterviewResult>, PersistenceError> {
        let results: Option<Option<Value>> =
            sqlx::query_scalar("SELECT results FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match results {
            None => Err(PersistenceError::NotFound(id)),
            Some(None) => Ok(None),
            Some(Some(value)) => Ok(Some(serde_json::from_value(value)?)),
        }
    }
}
