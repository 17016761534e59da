use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::interview::models::InterviewResult;
use crate::state::AppState;
use crate::store::CandidateProfile;
use crate::users::upload::{extract_resume, ResumeUpload};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub user_id: i64,
}

/// POST /api/users
///
/// Multipart form with a `resume` PDF and a `job_description` text field.
pub async fn handle_create_user(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    let mut upload: Option<ResumeUpload> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                upload = Some(ResumeUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some("job_description") | Some("jobDescription") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job description: {e}"))
                })?;
                job_description = Some(text);
            }
            _ => {}
        }
    }

    let upload = upload
        .ok_or_else(|| AppError::Validation("Please upload a resume PDF".to_string()))?;
    let job_description = job_description
        .map(|jd| jd.trim().to_string())
        .filter(|jd| !jd.is_empty())
        .ok_or_else(|| AppError::Validation("Please enter a job description".to_string()))?;

    let resume = tokio::task::spawn_blocking(move || extract_resume(&upload))
        .await
        .map_err(|e| AppError::Validation(format!("Could not read resume PDF: {e}")))??;

    let user_id = state.store.create_user(&resume, &job_description).await?;
    info!(
        "Created user {user_id} ({} pages, {} chars of resume text)",
        resume.page_count,
        resume.text.len()
    );

    Ok((StatusCode::CREATED, Json(CreateUserResponse { user_id })))
}

/// GET /api/users/:user_id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<CandidateProfile>, AppError> {
    let profile = state.store.get_resume_and_job_description(user_id).await?;
    Ok(Json(profile))
}

/// GET /api/users/:user_id/results
pub async fn handle_get_results(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<InterviewResult>, AppError> {
    state
        .store
        .get_results(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No interview results for user {user_id}")))
}
