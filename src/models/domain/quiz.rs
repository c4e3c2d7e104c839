use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_question::QuizQuestion;

/// A quiz as taken by a learner. Immutable once created: an attempt never
/// mutates its definition, only its own answer records.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizDefinition {
    pub id: String,
    pub title: String,
    pub questions: Vec<QuizQuestion>,
    pub time_limit_minutes: u32, // 0 = untimed
    pub passing_score: u8,       // percentage
    pub attempt_limit: u32,      // 0 = unlimited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl QuizDefinition {
    pub fn new(
        id: &str,
        title: &str,
        questions: Vec<QuizQuestion>,
        time_limit_minutes: u32,
        passing_score: u8,
        attempt_limit: u32,
    ) -> Self {
        QuizDefinition {
            id: id.to_string(),
            title: title.to_string(),
            questions,
            time_limit_minutes,
            passing_score,
            attempt_limit,
            created_at: Some(Utc::now()),
        }
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn total_possible_points(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }

    pub fn question_by_id(&self, question_id: &str) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}
