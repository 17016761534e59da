// Prompt templates for the interview flow.
// Each template is filled by plain placeholder substitution; nothing here performs I/O.

use crate::interview::models::{InterviewContext, QuestionAnswer};

/// Initial question prompt. Replace `{resume}`, `{job_description}`.
pub const INITIAL_PROMPT_TEMPLATE: &str = r#"Based on the following resume and job description, generate relevant interview questions.
Format each question with a number and the question text. Focus on technical skills, experience, and how the candidate's background aligns with the job requirements.

Resume:
{resume}

Job Description:
{job_description}

Generate 4-6 specific technical and experience-based interview questions."#;

/// Follow-up question prompt. Replace `{resume}`, `{job_description}`, `{qas}`.
pub const FOLLOW_UP_PROMPT_TEMPLATE: &str = r#"Based on the following resume, job description, and interview responses, generate relevant follow-up interview questions.
Format each question with a number and the question text. Focus on areas that need more clarification or deeper exploration.

Resume:
{resume}

Job Description:
{job_description}

Previous Interview Responses:
{qas}

Generate specific follow-up questions that would help clarify or expand on the candidate's responses."#;

/// Evaluation prompt. Replace `{resume}`, `{job_description}`, `{qas}`.
/// The three labels must appear in this order; the result parser depends on it.
pub const RESULT_PROMPT_TEMPLATE: &str = r#"Based on the following interview details, analyze the candidate's performance and provide a comprehensive evaluation.

Resume:
{resume}

Job Description:
{job_description}

Interview Questions and Responses:
{qas}

Please provide the following in your response:

1) DESCRIPTION: A short description (2-3 paragraphs) analyzing the overall interview performance, highlighting strengths, weaknesses, and alignment with the job requirements.

2) SCORE: A numerical score from 0 to 100 representing the candidate's fit for the position, where:
   - 90-100: Exceptional match, exceeding requirements
   - 75-89: Strong match, meeting most requirements
   - 60-74: Adequate match with some gaps
   - 40-59: Partial match with significant gaps
   - 0-39: Poor match with major deficiencies

3) STATUS: Assign one of the following statuses:
   - Promising Candidate: Excellent fit, recommend proceeding
   - Qualified Candidate: Good fit, shows potential
   - On Hold: Not enough information or could be either good or bad
   - Schedule Another Interview: Needs further assessment
   - Bad Candidate: Not suitable for the position

Format your response as:
DESCRIPTION: [your analysis]
SCORE: [number]
STATUS: [one of the five statuses]"#;

pub fn initial_prompt(ctx: &InterviewContext) -> String {
    fill(
        INITIAL_PROMPT_TEMPLATE,
        &[
            ("resume", ctx.resume.text.as_str()),
            ("job_description", ctx.job_description.as_str()),
        ],
    )
}

pub fn follow_up_prompt(ctx: &InterviewContext) -> String {
    fill_with_qas(FOLLOW_UP_PROMPT_TEMPLATE, ctx)
}

pub fn result_prompt(ctx: &InterviewContext) -> String {
    fill_with_qas(RESULT_PROMPT_TEMPLATE, ctx)
}

/// Renders pairs as `Q: ...\nA: ...`, separated by a blank line.
pub fn format_qas<'a>(qas: impl IntoIterator<Item = &'a QuestionAnswer>) -> String {
    qas.into_iter()
        .map(|qa| format!("Q: {}\nA: {}", qa.question, qa.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn fill_with_qas(template: &str, ctx: &InterviewContext) -> String {
    let qas = format_qas(ctx.all_qas());
    fill(
        template,
        &[
            ("resume", ctx.resume.text.as_str()),
            ("job_description", ctx.job_description.as_str()),
            ("qas", qas.as_str()),
        ],
    )
}

/// Single-pass placeholder substitution. Inserted values are never rescanned,
/// so candidate text that happens to contain `{qas}` stays literal.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let var = vars
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match var {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::ResumeData;

    fn qa(q: &str, a: &str) -> QuestionAnswer {
        QuestionAnswer {
            question: q.to_string(),
            answer: a.to_string(),
        }
    }

    fn ctx() -> InterviewContext {
        InterviewContext::new(
            ResumeData::from_text("5 years Go backend"),
            "Senior backend engineer",
        )
    }

    #[test]
    fn test_initial_prompt_embeds_resume_and_job_description() {
        let prompt = initial_prompt(&ctx());
        assert!(prompt.contains("Resume:\n5 years Go backend"));
        assert!(prompt.contains("Job Description:\nSenior backend engineer"));
        assert!(prompt.contains("4-6"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_follow_up_prompt_lists_initial_then_follow_up_pairs() {
        let ctx = ctx()
            .with_initial_qas(vec![qa("Why Go?", "Concurrency")])
            .with_followup_qas(vec![qa("Which runtime?", "Goroutines")]);
        let prompt = follow_up_prompt(&ctx);
        let expected = "Q: Why Go?\nA: Concurrency\n\nQ: Which runtime?\nA: Goroutines";
        assert!(prompt.contains(expected));
    }

    #[test]
    fn test_result_prompt_keeps_label_order() {
        let prompt = result_prompt(&ctx().with_initial_qas(vec![qa("Q1", "A1")]));
        let tail = &prompt[prompt.find("Format your response as:").unwrap()..];
        let d = tail.find("DESCRIPTION:").unwrap();
        let s = tail.find("SCORE:").unwrap();
        let st = tail.find("STATUS:").unwrap();
        assert!(d < s && s < st);
        assert!(prompt.contains("Q: Q1\nA: A1"));
    }

    #[test]
    fn test_empty_inputs_are_tolerated() {
        let ctx = InterviewContext::new(ResumeData::default(), "");
        let prompt = initial_prompt(&ctx);
        assert!(prompt.contains("Resume:\n\n"));
    }

    #[test]
    fn test_placeholder_text_in_resume_is_not_expanded() {
        let ctx = InterviewContext::new(ResumeData::from_text("see {qas}"), "jd")
            .with_initial_qas(vec![qa("Q", "A")]);
        let prompt = result_prompt(&ctx);
        assert!(prompt.contains("Resume:\nsee {qas}"));
        assert_eq!(prompt.matches("Q: Q\nA: A").count(), 1);
    }

    #[test]
    fn test_fill_leaves_unknown_braces_alone() {
        let out = fill("{a} {b} {", &[("a", "x")]);
        assert_eq!(out, "x {b} {");
    }

    #[test]
    fn test_format_qas_empty_is_empty() {
        assert_eq!(format_qas(Vec::<&QuestionAnswer>::new()), "");
    }
}
