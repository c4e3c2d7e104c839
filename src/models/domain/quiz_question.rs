use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuizQuestion {
    pub id: String,
    pub text: String,
    pub question_type: QuizQuestionType,
    /// Empty for FillBlank questions, which grade against `expected_answer`.
    pub options: Vec<QuizQuestionOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
    pub points: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestionOption {
    pub id: String,
    pub text: String,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
pub enum QuizQuestionType {
    Single,    // Only one correct option
    Multi,     // Multiple correct options, exact match required
    Bool,      // True/False question
    FillBlank, // Free text compared against an expected answer
}

impl QuizQuestion {
    /// Ids of the authoritative-correct options, in option order.
    pub fn correct_option_ids(&self) -> Vec<&str> {
        self.options
            .iter()
            .filter(|opt| opt.correct)
            .map(|opt| opt.id.as_str())
            .collect()
    }
}
