use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use validator::Validate;

use crate::{
    backends::QuizBackend,
    config::EngineConfig,
    errors::EngineResult,
    generator,
    models::domain::QuizDefinition,
    models::dto::request::GenerateQuizRequest,
};

// Defaults applied to locally generated quizzes.
const FALLBACK_TIME_LIMIT_MINUTES: u32 = 10;
const FALLBACK_PASSING_SCORE: u8 = 60;
const FALLBACK_ATTEMPT_LIMIT: u32 = 3;

/// Quiz resolution: remote backend first, local generator second. A load
/// failure is invisible to the learner because the fallback always yields a
/// usable definition.
pub struct QuizService {
    backend: Option<Arc<dyn QuizBackend>>,
    config: EngineConfig,
}

impl QuizService {
    pub fn new(backend: Arc<dyn QuizBackend>, config: EngineConfig) -> Self {
        Self {
            backend: Some(backend),
            config,
        }
    }

    /// Engine without a remote collaborator; every quiz comes from the local
    /// generator.
    pub fn local_only(config: EngineConfig) -> Self {
        Self {
            backend: None,
            config,
        }
    }

    /// Resolve a quiz definition for the request. The remote call is bounded
    /// by `quiz_load_timeout_secs`; any error, timeout, declined answer, or
    /// empty question set falls back to the deterministic local generator.
    pub async fn load_or_generate(
        &self,
        request: &GenerateQuizRequest,
    ) -> EngineResult<QuizDefinition> {
        request.validate()?;

        if let Some(backend) = &self.backend {
            let load = backend.generate_quiz(request);
            match timeout(Duration::from_secs(self.config.quiz_load_timeout_secs), load).await {
                Ok(Ok(Some(quiz))) if !quiz.questions.is_empty() => {
                    log::debug!("loaded quiz {} from remote backend", quiz.id);
                    return Ok(quiz);
                }
                Ok(Ok(_)) => {
                    log::warn!("remote backend declined quiz generation, using local generator");
                }
                Ok(Err(err)) => {
                    log::warn!("remote quiz generation failed ({err}), using local generator");
                }
                Err(_) => {
                    log::warn!(
                        "remote quiz generation timed out after {}s, using local generator",
                        self.config.quiz_load_timeout_secs
                    );
                }
            }
        }

        Ok(generator::generate_quiz(
            request,
            FALLBACK_TIME_LIMIT_MINUTES,
            FALLBACK_PASSING_SCORE,
            FALLBACK_ATTEMPT_LIMIT,
        ))
    }
}
