pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub use quiz::QuizDefinition;
pub use quiz_attempt::{AnswerRecord, QuestionResult, ScoreResult};
pub use quiz_question::{QuizQuestion, QuizQuestionOption, QuizQuestionType};
