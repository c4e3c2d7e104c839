use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::{
    backends::QuizBackend,
    config::EngineConfig,
    errors::{EngineError, EngineResult},
    models::domain::ScoreResult,
    models::dto::request::SubmitAttemptInput,
    services::scoring_service::ScoringService,
    session::{AttemptSession, SessionState},
};

type GradedHook = Box<dyn Fn(&ScoreResult) + Send + Sync>;

/// Submission flow for one attempt: acquires the single-submission guard,
/// freezes the session, grades remotely (or locally when no remote grader
/// exists), and notifies the host once a result lands.
pub struct AttemptService {
    backend: Option<Arc<dyn QuizBackend>>,
    config: EngineConfig,
    on_graded: Option<GradedHook>,
}

impl AttemptService {
    pub fn new(backend: Arc<dyn QuizBackend>, config: EngineConfig) -> Self {
        Self {
            backend: Some(backend),
            config,
            on_graded: None,
        }
    }

    /// No remote grader; every attempt is graded locally.
    pub fn local_only(config: EngineConfig) -> Self {
        Self {
            backend: None,
            config,
            on_graded: None,
        }
    }

    /// Hook invoked after every successful grading, e.g. so the host can
    /// trigger certificate issuance when the result passed.
    pub fn with_on_graded(
        mut self,
        hook: impl Fn(&ScoreResult) + Send + Sync + 'static,
    ) -> Self {
        self.on_graded = Some(Box::new(hook));
        self
    }

    /// Manual submission. `Ok(None)` means another submission already holds
    /// the guard and this call was a no-op.
    ///
    /// `attempts_so_far` is the caller-supplied attempt count including this
    /// one, used for the retake flag when grading locally.
    pub async fn submit(
        &self,
        session: &mut AttemptSession,
        attempts_so_far: u32,
    ) -> EngineResult<Option<ScoreResult>> {
        if !session.begin_submission() {
            return Ok(None);
        }
        self.finish(session, false, attempts_so_far).await.map(Some)
    }

    /// Timer-driven submission, called after [`AttemptSession::tick`] returned
    /// `AutoSubmit`. The tick already acquired the guard.
    pub async fn complete_auto_submit(
        &self,
        session: &mut AttemptSession,
        attempts_so_far: u32,
    ) -> EngineResult<ScoreResult> {
        self.finish(session, true, attempts_so_far).await
    }

    /// Retry grading after a failed remote submission. The session stayed
    /// Submitted/TimedOut with its answers intact, so nothing is re-collected.
    pub async fn retry(
        &self,
        session: &mut AttemptSession,
        attempts_so_far: u32,
    ) -> EngineResult<ScoreResult> {
        match session.state() {
            SessionState::Submitted | SessionState::TimedOut => {
                self.grade(session, attempts_so_far).await
            }
            other => Err(EngineError::InvalidTransition(format!(
                "cannot retry submission from state {other:?}"
            ))),
        }
    }

    async fn finish(
        &self,
        session: &mut AttemptSession,
        timed_out: bool,
        attempts_so_far: u32,
    ) -> EngineResult<ScoreResult> {
        session.complete_submission(timed_out)?;
        self.grade(session, attempts_so_far).await
    }

    async fn grade(
        &self,
        session: &mut AttemptSession,
        attempts_so_far: u32,
    ) -> EngineResult<ScoreResult> {
        let input = SubmitAttemptInput {
            quiz_id: session.definition().id.clone(),
            answers: session.answers_in_order(),
            time_spent_seconds: session.time_spent_seconds(),
        };

        let result = match &self.backend {
            Some(backend) => {
                match self.grade_remote(backend.as_ref(), &input).await {
                    Ok(result) => result,
                    Err(err) if self.config.offline_grading_fallback => {
                        log::warn!("remote grading failed ({err}), grading locally");
                        self.grade_local(session, &input, attempts_so_far)?
                    }
                    Err(err) => {
                        // Answers stay intact and the session stays submitted,
                        // so the caller can retry the same attempt.
                        log::warn!("remote grading failed ({err}), preserving attempt for retry");
                        session.submission_failed();
                        return Err(err);
                    }
                }
            }
            None => self.grade_local(session, &input, attempts_so_far)?,
        };

        session.mark_graded(result.clone())?;
        if let Some(hook) = &self.on_graded {
            hook(&result);
        }
        log::info!(
            "quiz {} graded: {}/{} ({}%), passed={}",
            result.quiz_id,
            result.points_earned,
            result.total_possible,
            result.percentage,
            result.passed
        );
        Ok(result)
    }

    async fn grade_remote(
        &self,
        backend: &dyn QuizBackend,
        input: &SubmitAttemptInput,
    ) -> EngineResult<ScoreResult> {
        match timeout(
            Duration::from_secs(self.config.submit_timeout_secs),
            backend.submit_attempt(input),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(EngineError::SubmissionError(format!(
                "submission timed out after {}s",
                self.config.submit_timeout_secs
            ))),
        }
    }

    fn grade_local(
        &self,
        session: &AttemptSession,
        input: &SubmitAttemptInput,
        attempts_so_far: u32,
    ) -> EngineResult<ScoreResult> {
        ScoringService::grade_attempt(
            session.definition(),
            &input.answers,
            input.time_spent_seconds,
            attempts_so_far,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::Utc;

    use crate::backends::quiz_backend::MockQuizBackend;
    use crate::test_utils::fixtures::two_question_quiz;

    fn started_session() -> AttemptSession {
        let mut session = AttemptSession::new(two_question_quiz());
        session.start().unwrap();
        session.select_option("0-2").unwrap();
        session
    }

    fn remote_result() -> ScoreResult {
        ScoreResult {
            attempt_id: "remote-attempt".to_string(),
            quiz_id: "quiz-1".to_string(),
            points_earned: 1,
            total_possible: 2,
            percentage: 50,
            passed: false,
            time_spent_seconds: 42,
            question_results: vec![],
            can_retake: true,
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn manual_submission_grades_via_remote_backend() {
        let mut backend = MockQuizBackend::new();
        backend
            .expect_submit_attempt()
            .times(1)
            .returning(|_| Ok(remote_result()));

        let service = AttemptService::new(Arc::new(backend), EngineConfig::test_config());
        let mut session = started_session();

        let result = service.submit(&mut session, 1).await.unwrap();

        assert!(result.is_some());
        assert_eq!(session.state(), SessionState::Graded);
    }

    #[tokio::test]
    async fn second_submission_is_a_no_op() {
        let mut backend = MockQuizBackend::new();
        backend
            .expect_submit_attempt()
            .times(1)
            .returning(|_| Ok(remote_result()));

        let service = AttemptService::new(Arc::new(backend), EngineConfig::test_config());
        let mut session = started_session();

        assert!(service.submit(&mut session, 1).await.unwrap().is_some());
        assert!(service.submit(&mut session, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remote_failure_preserves_attempt_and_retry_succeeds() {
        let mut backend = MockQuizBackend::new();
        backend
            .expect_submit_attempt()
            .times(1)
            .returning(|_| Err(EngineError::SubmissionError("503".into())));
        backend
            .expect_submit_attempt()
            .times(1)
            .returning(|_| Ok(remote_result()));

        let service = AttemptService::new(Arc::new(backend), EngineConfig::test_config());
        let mut session = started_session();

        let first = service.submit(&mut session, 1).await;
        assert!(matches!(first, Err(EngineError::SubmissionError(_))));
        assert_eq!(session.state(), SessionState::Submitted);
        assert_eq!(session.answers_in_order().len(), 2);

        let retried = service.retry(&mut session, 1).await.unwrap();
        assert_eq!(retried.attempt_id, "remote-attempt");
        assert_eq!(session.state(), SessionState::Graded);
    }

    #[tokio::test]
    async fn offline_fallback_grades_locally_on_remote_failure() {
        let mut backend = MockQuizBackend::new();
        backend
            .expect_submit_attempt()
            .returning(|_| Err(EngineError::SubmissionError("503".into())));

        let mut config = EngineConfig::test_config();
        config.offline_grading_fallback = true;

        let service = AttemptService::new(Arc::new(backend), config);
        let mut session = started_session();

        let result = service.submit(&mut session, 1).await.unwrap().unwrap();

        // Locally graded: Q1 correct, Q2 unanswered.
        assert_eq!(result.points_earned, 1);
        assert_eq!(result.percentage, 50);
        assert_eq!(session.state(), SessionState::Graded);
    }

    #[tokio::test]
    async fn local_only_service_grades_without_a_backend() {
        let service = AttemptService::local_only(EngineConfig::test_config());
        let mut session = started_session();
        session.jump_to(1);
        session.select_option("1-0").unwrap();
        session.select_option("1-3").unwrap();

        let result = service.submit(&mut session, 1).await.unwrap().unwrap();

        assert_eq!(result.points_earned, 2);
        assert_eq!(result.percentage, 100);
        assert!(result.passed);
        assert!(result.can_retake, "one attempt of two used");
    }

    #[tokio::test]
    async fn timer_driven_submission_completes_via_auto_submit_path() {
        let service = AttemptService::local_only(EngineConfig::test_config());
        let mut session = AttemptSession::new({
            let mut quiz = two_question_quiz();
            quiz.time_limit_minutes = 1;
            quiz
        });
        session.start().unwrap();

        let mut auto_submitted = false;
        for _ in 0..60 {
            if session.tick() == crate::session::TickOutcome::AutoSubmit {
                service.complete_auto_submit(&mut session, 1).await.unwrap();
                auto_submitted = true;
            }
        }

        assert!(auto_submitted);
        assert_eq!(session.state(), SessionState::Graded);
    }

    #[tokio::test]
    async fn on_graded_hook_fires_after_grading() {
        let fired = Arc::new(AtomicBool::new(false));
        let observed = Arc::clone(&fired);

        let service = AttemptService::local_only(EngineConfig::test_config())
            .with_on_graded(move |result| {
                assert!(!result.passed);
                observed.store(true, Ordering::SeqCst);
            });
        let mut session = started_session();

        service.submit(&mut session, 1).await.unwrap();

        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn retry_from_in_progress_is_rejected() {
        let service = AttemptService::local_only(EngineConfig::test_config());
        let mut session = started_session();

        let result = service.retry(&mut session, 1).await;

        assert!(matches!(result, Err(EngineError::InvalidTransition(_))));
    }
}
