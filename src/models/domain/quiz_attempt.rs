use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The learner's answer to one question. One record exists per question for the
/// whole lifetime of a session; it is mutated in place, never removed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub selected_option_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_answer: Option<String>,
}

impl AnswerRecord {
    pub fn empty(question_id: &str) -> Self {
        AnswerRecord {
            question_id: question_id.to_string(),
            selected_option_ids: Vec::new(),
            text_answer: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        !self.selected_option_ids.is_empty()
            || self
                .text_answer
                .as_ref()
                .is_some_and(|t| !t.trim().is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub is_correct: bool,
    pub points_earned: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ScoreResult {
    pub attempt_id: String,
    pub quiz_id: String,
    pub points_earned: u32,
    pub total_possible: u32,
    pub percentage: u8,
    pub passed: bool,
    pub time_spent_seconds: u64,
    pub question_results: Vec<QuestionResult>,
    pub can_retake: bool,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_answer_record_is_unanswered() {
        let record = AnswerRecord::empty("q-1");

        assert_eq!(record.question_id, "q-1");
        assert!(record.selected_option_ids.is_empty());
        assert!(record.text_answer.is_none());
        assert!(!record.is_answered());
    }

    #[test]
    fn answer_record_with_selection_is_answered() {
        let mut record = AnswerRecord::empty("q-1");
        record.selected_option_ids.push("opt-1".to_string());

        assert!(record.is_answered());
    }

    #[test]
    fn whitespace_only_text_answer_counts_as_unanswered() {
        let mut record = AnswerRecord::empty("q-1");
        record.text_answer = Some("   ".to_string());

        assert!(!record.is_answered());
    }

    #[test]
    fn score_result_round_trip_serialization_preserves_grading_fields() {
        let result = ScoreResult {
            attempt_id: "attempt-1".to_string(),
            quiz_id: "quiz-1".to_string(),
            points_earned: 4,
            total_possible: 5,
            percentage: 80,
            passed: true,
            time_spent_seconds: 312,
            question_results: vec![QuestionResult {
                question_id: "q-1".to_string(),
                is_correct: true,
                points_earned: 4,
            }],
            can_retake: false,
            submitted_at: Utc::now(),
        };

        let json = serde_json::to_string(&result).expect("result should serialize");
        let parsed: ScoreResult = serde_json::from_str(&json).expect("result should deserialize");

        assert_eq!(parsed.points_earned, 4);
        assert_eq!(parsed.percentage, 80);
        assert!(parsed.passed);
        assert!(parsed.question_results[0].is_correct);
    }
}
