pub mod attempt_service;
pub mod quiz_service;
pub mod scoring_service;

pub use attempt_service::AttemptService;
pub use quiz_service::QuizService;
pub use scoring_service::ScoringService;
