use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::AnswerRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Difficulty {
    Easy,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// Validated request for quiz generation. The generator itself performs no
/// validation, so callers must run `validate()` before handing this over.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct GenerateQuizRequest {
    #[validate(length(min = 3, max = 200))]
    pub topic: String,

    pub difficulty: Difficulty,

    #[validate(range(min = 1, max = 50))]
    pub question_count: u32,

    /// Arbitrary variation string, e.g. one per modal session. May be empty.
    pub salt: String,
}

impl GenerateQuizRequest {
    pub fn new(topic: &str, difficulty: Difficulty, question_count: u32, salt: &str) -> Self {
        Self {
            topic: topic.to_string(),
            difficulty,
            question_count,
            salt: salt.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SubmitAttemptInput {
    #[validate(length(min = 1))]
    pub quiz_id: String,

    pub answers: Vec<AnswerRecord>,

    pub time_spent_seconds: u64,
}
