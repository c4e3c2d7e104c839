use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Quiz load error: {0}")]
    QuizLoadError(String),

    #[error("Submission error: {0}")]
    SubmissionError(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Internal engine error: {0}")]
    InternalError(String),
}

impl EngineError {
    pub fn error_code(&self) -> &'static str {
        match self {
            EngineError::NotFound(_) => "NOT_FOUND",
            EngineError::ValidationError(_) => "VALIDATION_ERROR",
            EngineError::QuizLoadError(_) => "QUIZ_LOAD_ERROR",
            EngineError::SubmissionError(_) => "SUBMISSION_ERROR",
            EngineError::InvalidTransition(_) => "INVALID_TRANSITION",
            EngineError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(err: validator::ValidationErrors) -> Self {
        EngineError::ValidationError(err.to_string())
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            EngineError::QuizLoadError(err.to_string())
        } else {
            EngineError::InternalError(err.to_string())
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
