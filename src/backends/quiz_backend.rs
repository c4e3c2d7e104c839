use async_trait::async_trait;
use reqwest::Client;

use crate::{
    errors::{EngineError, EngineResult},
    models::domain::{QuizDefinition, ScoreResult},
    models::dto::request::{GenerateQuizRequest, SubmitAttemptInput},
};

/// Remote quiz backend. A richer generator and grader may live behind this
/// seam; both calls are optional collaborators and the engine works without
/// them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizBackend: Send + Sync {
    /// Ask the backend for a quiz. `Ok(None)` means the backend declined to
    /// answer, which the caller treats the same as a failure (fall back to
    /// the local generator).
    async fn generate_quiz(
        &self,
        request: &GenerateQuizRequest,
    ) -> EngineResult<Option<QuizDefinition>>;

    /// Submit a finished attempt for remote grading.
    async fn submit_attempt(&self, input: &SubmitAttemptInput) -> EngineResult<ScoreResult>;
}

pub struct HttpQuizBackend {
    client: Client,
    base_url: String,
}

impl HttpQuizBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl QuizBackend for HttpQuizBackend {
    async fn generate_quiz(
        &self,
        request: &GenerateQuizRequest,
    ) -> EngineResult<Option<QuizDefinition>> {
        let url = format!("{}/api/quizzes/generate", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(EngineError::QuizLoadError(format!(
                "backend returned {}",
                response.status()
            )));
        }

        let quiz = response.json::<QuizDefinition>().await?;
        Ok(Some(quiz))
    }

    async fn submit_attempt(&self, input: &SubmitAttemptInput) -> EngineResult<ScoreResult> {
        let url = format!("{}/api/quizzes/{}/attempts", self.base_url, input.quiz_id);
        let response = self
            .client
            .post(&url)
            .json(input)
            .send()
            .await
            .map_err(|err| EngineError::SubmissionError(err.to_string()))?;

        if !response.status().is_success() {
            return Err(EngineError::SubmissionError(format!(
                "backend returned {}",
                response.status()
            )));
        }

        response
            .json::<ScoreResult>()
            .await
            .map_err(|err| EngineError::SubmissionError(err.to_string()))
    }
}
