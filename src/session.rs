//! Attempt-session state machine.
//!
//! One `AttemptSession` owns the full lifecycle of a single quiz attempt:
//! navigation, answer capture, the countdown, the single-submission guard, and
//! the transition into a graded terminal state. The host drives the countdown
//! by calling [`AttemptSession::tick`] once per second; the session itself
//! never spawns a timer, so a discarded session cannot be mutated by a stale
//! callback.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};
use crate::models::domain::{AnswerRecord, QuizDefinition, QuizQuestionType, ScoreResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Submitted,
    TimedOut,
    Graded,
}

/// Countdown scoped to exactly one session. Armed on entering InProgress,
/// dropped on every exit transition, so no timer can outlive its session.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Countdown {
    remaining_seconds: u32,
}

/// Outcome of one 1-second tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Session is not in a state where the clock runs (untimed, not started,
    /// or already submitted).
    Idle,
    /// Clock decremented; seconds remaining.
    Running(u32),
    /// The countdown hit zero on this tick and the session acquired the
    /// submission guard: the host must now perform the (auto) submission.
    AutoSubmit,
}

#[derive(Clone, Debug)]
pub struct AttemptSession {
    definition: QuizDefinition,
    state: SessionState,
    current_index: usize,
    answers: HashMap<String, AnswerRecord>,
    countdown: Option<Countdown>,
    started_at: Option<DateTime<Utc>>,
    submitted_at: Option<DateTime<Utc>>,
    submission_in_flight: bool,
    result: Option<ScoreResult>,
}

impl AttemptSession {
    pub fn new(definition: QuizDefinition) -> Self {
        Self {
            definition,
            state: SessionState::NotStarted,
            current_index: 0,
            answers: HashMap::new(),
            countdown: None,
            started_at: None,
            submitted_at: None,
            submission_in_flight: false,
            result: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn definition(&self) -> &QuizDefinition {
        &self.definition
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn result(&self) -> Option<&ScoreResult> {
        self.result.as_ref()
    }

    /// NotStarted -> InProgress. Creates one empty answer record per question,
    /// arms the countdown when the definition is timed, and records the start
    /// timestamp used for elapsed-time reporting.
    pub fn start(&mut self) -> EngineResult<()> {
        if self.state != SessionState::NotStarted {
            return Err(EngineError::InvalidTransition(format!(
                "cannot start a session in state {:?}",
                self.state
            )));
        }

        self.answers = self
            .definition
            .questions
            .iter()
            .map(|q| (q.id.clone(), AnswerRecord::empty(&q.id)))
            .collect();

        if self.definition.time_limit_minutes > 0 {
            self.countdown = Some(Countdown {
                remaining_seconds: self.definition.time_limit_minutes * 60,
            });
        }
        self.started_at = Some(Utc::now());
        self.state = SessionState::InProgress;
        log::debug!(
            "attempt session started for quiz {} ({} questions)",
            self.definition.id,
            self.definition.question_count()
        );
        Ok(())
    }

    /// Seconds left on the clock, if the session is timed. Never negative.
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.countdown.as_ref().map(|c| c.remaining_seconds)
    }

    pub fn time_spent_seconds(&self) -> u64 {
        let Some(started) = self.started_at else {
            return 0;
        };
        let end = self.submitted_at.unwrap_or_else(Utc::now);
        (end - started).num_seconds().max(0) as u64
    }

    // --- navigation -------------------------------------------------------

    /// Move the current-question pointer. Out-of-range targets are clamped,
    /// never rejected. Navigation does not change lifecycle state.
    pub fn jump_to(&mut self, index: usize) {
        if self.state != SessionState::InProgress || self.definition.questions.is_empty() {
            return;
        }
        self.current_index = index.min(self.definition.question_count() - 1);
    }

    pub fn next_question(&mut self) {
        self.jump_to(self.current_index.saturating_add(1));
    }

    pub fn previous_question(&mut self) {
        self.jump_to(self.current_index.saturating_sub(1));
    }

    // --- answer capture ---------------------------------------------------

    /// Record an option selection for the current question. Single/Bool
    /// replace the selection; Multi toggles membership.
    pub fn select_option(&mut self, option_id: &str) -> EngineResult<()> {
        let question = self.current_question_checked()?;
        let question_type = question.question_type;
        let question_id = question.id.clone();

        let record = self
            .answers
            .get_mut(&question_id)
            .ok_or_else(|| EngineError::NotFound(format!("answer record {question_id}")))?;

        match question_type {
            QuizQuestionType::Single | QuizQuestionType::Bool => {
                record.selected_option_ids = vec![option_id.to_string()];
            }
            QuizQuestionType::Multi => {
                if let Some(pos) = record
                    .selected_option_ids
                    .iter()
                    .position(|id| id == option_id)
                {
                    record.selected_option_ids.remove(pos);
                } else {
                    record.selected_option_ids.push(option_id.to_string());
                }
            }
            QuizQuestionType::FillBlank => {
                return Err(EngineError::ValidationError(
                    "fill-in-blank questions take a text answer, not an option".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Record a free-text answer for the current (FillBlank) question.
    pub fn set_text_answer(&mut self, text: &str) -> EngineResult<()> {
        let question = self.current_question_checked()?;
        if question.question_type != QuizQuestionType::FillBlank {
            return Err(EngineError::ValidationError(
                "only fill-in-blank questions take a text answer".to_string(),
            ));
        }
        let question_id = question.id.clone();
        let record = self
            .answers
            .get_mut(&question_id)
            .ok_or_else(|| EngineError::NotFound(format!("answer record {question_id}")))?;
        record.text_answer = Some(text.to_string());
        Ok(())
    }

    fn current_question_checked(&self) -> EngineResult<&crate::models::domain::QuizQuestion> {
        if self.state != SessionState::InProgress {
            return Err(EngineError::InvalidTransition(format!(
                "answers cannot change in state {:?}",
                self.state
            )));
        }
        self.definition
            .questions
            .get(self.current_index)
            .ok_or_else(|| EngineError::NotFound("current question".to_string()))
    }

    pub fn answer(&self, question_id: &str) -> Option<&AnswerRecord> {
        self.answers.get(question_id)
    }

    /// Answers in question order, for submission.
    pub fn answers_in_order(&self) -> Vec<AnswerRecord> {
        self.definition
            .questions
            .iter()
            .filter_map(|q| self.answers.get(&q.id).cloned())
            .collect()
    }

    /// How many of the N questions carry a non-empty answer. Shown in the
    /// submit confirmation step.
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|a| a.is_answered()).count()
    }

    // --- countdown --------------------------------------------------------

    /// One 1-second tick. When the clock hits zero it clamps there and the
    /// tick acquires the submission guard exactly once; later ticks are idle.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != SessionState::InProgress {
            return TickOutcome::Idle;
        }
        let Some(countdown) = self.countdown.as_mut() else {
            return TickOutcome::Idle;
        };

        countdown.remaining_seconds = countdown.remaining_seconds.saturating_sub(1);
        if countdown.remaining_seconds > 0 {
            return TickOutcome::Running(countdown.remaining_seconds);
        }

        // Same guard as manual submission: if a manual submit already holds
        // it, the timer path no-ops.
        if !self.begin_submission() {
            return TickOutcome::Idle;
        }
        log::info!("quiz {} timed out, auto-submitting", self.definition.id);
        TickOutcome::AutoSubmit
    }

    // --- submission -------------------------------------------------------

    /// Acquire the single-submission guard. Returns false when a submission is
    /// already in flight or the session is not in progress; exactly one caller
    /// (manual click or timer) ever observes true per attempt.
    pub fn begin_submission(&mut self) -> bool {
        if self.state != SessionState::InProgress || self.submission_in_flight {
            return false;
        }
        self.submission_in_flight = true;
        true
    }

    /// InProgress -> Submitted/TimedOut. Requires the guard; releases the
    /// countdown so no timer outlives the attempt. Answers stay frozen but
    /// intact for (re)submission.
    pub fn complete_submission(&mut self, timed_out: bool) -> EngineResult<()> {
        if !self.submission_in_flight {
            return Err(EngineError::InvalidTransition(
                "complete_submission without begin_submission".to_string(),
            ));
        }
        if self.state != SessionState::InProgress {
            return Err(EngineError::InvalidTransition(format!(
                "cannot submit from state {:?}",
                self.state
            )));
        }
        self.countdown = None;
        self.submitted_at = Some(Utc::now());
        self.state = if timed_out {
            SessionState::TimedOut
        } else {
            SessionState::Submitted
        };
        Ok(())
    }

    /// A remote submission failed. The session stays Submitted/TimedOut with
    /// all answers intact; only the in-flight flag is released so the caller
    /// can retry the same attempt.
    pub fn submission_failed(&mut self) {
        self.submission_in_flight = false;
    }

    /// Submitted/TimedOut -> Graded.
    pub fn mark_graded(&mut self, result: ScoreResult) -> EngineResult<()> {
        match self.state {
            SessionState::Submitted | SessionState::TimedOut => {
                self.result = Some(result);
                self.submission_in_flight = false;
                self.state = SessionState::Graded;
                Ok(())
            }
            other => Err(EngineError::InvalidTransition(format!(
                "cannot grade from state {other:?}"
            ))),
        }
    }

    /// External teardown (host UI unmounted mid-attempt). Releases the
    /// countdown and the guard so a stale callback cannot mutate the session.
    pub fn cancel(&mut self) {
        self.countdown = None;
        self.submission_in_flight = false;
    }

    /// A retake is a brand-new session against the same definition, never a
    /// transition of this one.
    pub fn retake(&self) -> AttemptSession {
        AttemptSession::new(self.definition.clone())
    }
}
