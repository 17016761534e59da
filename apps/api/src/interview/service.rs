//! Interview orchestration: prompt → model → parser.

use std::sync::Arc;

use tracing::info;

use crate::errors::AppError;
use crate::interview::models::{InterviewContext, InterviewResult, Question};
use crate::interview::parser::{parse_interview_result, parse_questions};
use crate::interview::prompts::{follow_up_prompt, initial_prompt, result_prompt};
use crate::llm_client::LanguageModel;

#[derive(Clone)]
pub struct InterviewService {
    model: Arc<dyn LanguageModel>,
}

impl InterviewService {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Generates initial questions, or follow-ups when any prior pair exists.
    ///
    /// Follow-up numbering continues after every prior question, initial and
    /// follow-up alike. An unparseable response yields an empty list.
    pub async fn generate_questions(
        &self,
        ctx: &InterviewContext,
    ) -> Result<Vec<Question>, AppError> {
        let is_follow_up = ctx.is_follow_up();
        let (prompt, start_number) = if is_follow_up {
            (follow_up_prompt(ctx), 1 + ctx.qa_count() as u32)
        } else {
            (initial_prompt(ctx), 1)
        };

        let text = self.model.send(&prompt).await?;
        let questions = parse_questions(&text, start_number);

        info!(
            "Generated {} {} question(s) starting at #{}",
            questions.len(),
            if is_follow_up { "follow-up" } else { "initial" },
            start_number
        );
        Ok(questions)
    }

    /// Scores a finished interview. Requires at least one question/answer pair.
    pub async fn generate_interview_result(
        &self,
        ctx: &InterviewContext,
    ) -> Result<InterviewResult, AppError> {
        if ctx.qa_count() == 0 {
            return Err(AppError::Validation(
                "Cannot generate results without interview responses".to_string(),
            ));
        }

        let text = self.model.send(&result_prompt(ctx)).await?;
        let result = parse_interview_result(&text);

        info!(
            "Interview scored {}/100 ({}) over {} answer(s)",
            result.score,
            result.status,
            ctx.qa_count()
        );
        Ok(result)
    }
}
