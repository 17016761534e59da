//! Axum handler for the stateless interview endpoint.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::models::{InterviewContext, Question, QuestionAnswer, ResumeData};
use crate::state::AppState;

const GENERATE_RESULT_ACTION: &str = "generateResult";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRequest {
    pub resume: Option<ResumeData>,
    pub job_description: Option<String>,
    #[serde(rename = "previousQAs", default)]
    pub previous_qas: Option<Vec<QuestionAnswer>>,
    #[serde(rename = "followupQAs", default)]
    pub followup_qas: Option<Vec<QuestionAnswer>>,
    pub action: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<Question>,
}

impl InterviewRequest {
    fn into_context(self) -> Result<(InterviewContext, Option<String>), AppError> {
        let resume = self
            .resume
            .ok_or_else(|| AppError::Validation("resume is required".to_string()))?;
        let job_description = self
            .job_description
            .ok_or_else(|| AppError::Validation("jobDescription is required".to_string()))?;

        let ctx = InterviewContext::new(resume, job_description)
            .with_initial_qas(self.previous_qas.unwrap_or_default())
            .with_followup_qas(self.followup_qas.unwrap_or_default());
        Ok((ctx, self.action))
    }
}

/// POST /api/interview
///
/// `action: "generateResult"` scores the supplied answers; anything else
/// generates questions (follow-ups when previous answers are present).
pub async fn handle_interview(
    State(state): State<AppState>,
    Json(request): Json<InterviewRequest>,
) -> Result<Response, AppError> {
    let (ctx, action) = request.into_context()?;

    if action.as_deref() == Some(GENERATE_RESULT_ACTION) {
        let result = state.interview.generate_interview_result(&ctx).await?;
        Ok(Json(result).into_response())
    } else {
        let questions = state.interview.generate_questions(&ctx).await?;
        Ok(Json(QuestionsResponse { questions }).into_response())
    }
}
