pub mod quiz_backend;

pub use quiz_backend::{HttpQuizBackend, QuizBackend};
