//! Best-effort decoding of free-text model output.
//!
//! Neither function fails. Malformed text yields an empty question list or a
//! result built from per-field defaults (empty description, score 0, On Hold).

use std::num::IntErrorKind;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::interview::models::{InterviewResult, InterviewStatus, Question};

static NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)[.)]\s*(.+)$").expect("numbered line pattern"));

static DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)DESCRIPTION:\s*(.*?)(?:SCORE:|$)").expect("description pattern")
});

static SCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)SCORE:\s*([0-9]+)").expect("score pattern"));

static STATUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)STATUS:\s*([\w\s]+)$").expect("status pattern"));

/// Keyword fragments checked in order against the lowercased status text.
/// The first fragment found decides the status.
const STATUS_KEYWORDS: &[(&str, InterviewStatus)] = &[
    ("promising", InterviewStatus::PromisingCandidate),
    ("qualified", InterviewStatus::QualifiedCandidate),
    ("on hold", InterviewStatus::OnHold),
    ("schedule", InterviewStatus::ScheduleAnotherInterview),
    ("another interview", InterviewStatus::ScheduleAnotherInterview),
    ("bad", InterviewStatus::BadCandidate),
];

/// Extracts numbered questions, renumbering them from `start_number`.
///
/// The digits in the text are ignored; only line order matters.
pub fn parse_questions(text: &str, start_number: u32) -> Vec<Question> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| NUMBERED_LINE.captures(line))
        .map(|caps| caps[2].trim().to_string())
        .zip(start_number..)
        .map(|(question, number)| Question { number, question })
        .collect()
}

pub fn parse_interview_result(text: &str) -> InterviewResult {
    let description = DESCRIPTION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let score = SCORE
        .captures(text)
        .map(|caps| clamp_score(&caps[1]))
        .unwrap_or(0);

    let status = STATUS
        .captures(text)
        .map(|caps| resolve_status(caps[1].trim()))
        .unwrap_or_default();

    InterviewResult {
        description,
        score,
        status,
    }
}

/// Digits that overflow `u64` are still "more than 100".
fn clamp_score(digits: &str) -> u8 {
    match digits.parse::<u64>() {
        Ok(n) => n.min(100) as u8,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => 100,
        Err(_) => 0,
    }
}

fn resolve_status(status_text: &str) -> InterviewStatus {
    let lowered = status_text.to_lowercase();
    STATUS_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, status)| *status)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_questions_renumbers_from_offset() {
        let text = "7. First\n3) Second\n10. Third";
        let questions = parse_questions(text, 5);
        let numbers: Vec<u32> = questions.iter().map(|q| q.number).collect();
        assert_eq!(numbers, vec![5, 6, 7]);
        assert_eq!(questions[1].question, "Second");
    }

    #[test]
    fn test_parse_questions_end_to_end_example() {
        let text = "1. Tell me about your Go experience\n2. Describe a scaling challenge";
        assert_eq!(
            parse_questions(text, 1),
            vec![
                Question {
                    number: 1,
                    question: "Tell me about your Go experience".into()
                },
                Question {
                    number: 2,
                    question: "Describe a scaling challenge".into()
                },
            ]
        );
    }

    #[test]
    fn test_parse_questions_drops_prose_and_blank_lines() {
        let text = "Here are some questions:\n\n1. What is Rust?\n   \nThanks!\n2.Ownership?\n";
        let questions = parse_questions(text, 1);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "What is Rust?");
        assert_eq!(questions[1].question, "Ownership?");
    }

    #[test]
    fn test_parse_questions_handles_crlf() {
        let questions = parse_questions("1. One\r\n2. Two\r\n", 1);
        assert_eq!(questions[0].question, "One");
        assert_eq!(questions[1].question, "Two");
    }

    #[test]
    fn test_parse_questions_without_numbered_lines_is_empty() {
        assert!(parse_questions("- bullet\n* star\nQ1: nope\n1 missing dot", 1).is_empty());
        assert!(parse_questions("", 1).is_empty());
    }

    #[test]
    fn test_parse_result_end_to_end_example() {
        let text = "DESCRIPTION: Strong candidate.\nSCORE: 82\nSTATUS: Qualified Candidate";
        assert_eq!(
            parse_interview_result(text),
            InterviewResult {
                description: "Strong candidate.".into(),
                score: 82,
                status: InterviewStatus::QualifiedCandidate,
            }
        );
    }

    #[test]
    fn test_parse_result_multiline_description() {
        let text = "description: First paragraph.\n\nSecond paragraph.\nscore: 64\nstatus: on hold";
        let result = parse_interview_result(text);
        assert_eq!(result.description, "First paragraph.\n\nSecond paragraph.");
        assert_eq!(result.score, 64);
        assert_eq!(result.status, InterviewStatus::OnHold);
    }

    #[test]
    fn test_parse_result_description_runs_to_end_without_score() {
        let result = parse_interview_result("DESCRIPTION: Only prose here.");
        assert_eq!(result.description, "Only prose here.");
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_parse_result_clamps_score() {
        assert_eq!(parse_interview_result("SCORE: 150").score, 100);
        assert_eq!(parse_interview_result("SCORE: 100").score, 100);
        assert_eq!(parse_interview_result("SCORE: 0").score, 0);
        assert_eq!(
            parse_interview_result("SCORE: 99999999999999999999999").score,
            100
        );
    }

    #[test]
    fn test_parse_result_negative_score_is_absent() {
        assert_eq!(parse_interview_result("SCORE: -5").score, 0);
    }

    #[test]
    fn test_parse_result_non_ascii_digits_are_not_a_score() {
        let fullwidth = parse_interview_result("DESCRIPTION: Weak.\nSCORE: ２５\nSTATUS: Bad Candidate");
        assert_eq!(fullwidth.score, 0);
        assert_eq!(fullwidth.status, InterviewStatus::BadCandidate);
        assert_eq!(parse_interview_result("SCORE: ٣٠").score, 0);
    }

    #[test]
    fn test_parse_questions_ignores_non_ascii_numbering() {
        assert!(parse_questions("٣. Why Go?", 1).is_empty());
    }

    #[test]
    fn test_status_priority_prefers_earlier_keyword() {
        let result = parse_interview_result("STATUS: Bad but Qualified Candidate");
        assert_eq!(result.status, InterviewStatus::QualifiedCandidate);

        let result = parse_interview_result("STATUS: Promising yet qualified");
        assert_eq!(result.status, InterviewStatus::PromisingCandidate);
    }

    #[test]
    fn test_status_each_label_resolves() {
        for status in InterviewStatus::ALL {
            let text = format!("STATUS: {}", status.label());
            assert_eq!(parse_interview_result(&text).status, status);
        }
        assert_eq!(
            parse_interview_result("STATUS: another interview needed").status,
            InterviewStatus::ScheduleAnotherInterview
        );
    }

    #[test]
    fn test_status_unknown_or_missing_defaults_to_on_hold() {
        assert_eq!(
            parse_interview_result("STATUS: Excellent").status,
            InterviewStatus::OnHold
        );
        assert_eq!(parse_interview_result("").status, InterviewStatus::OnHold);
    }

    #[test]
    fn test_garbage_yields_defaults() {
        let result = parse_interview_result("the model refused to answer");
        assert_eq!(result.description, "");
        assert_eq!(result.score, 0);
        assert_eq!(result.status, InterviewStatus::OnHold);
    }
}
