use chrono::Utc;
use uuid::Uuid;

use crate::errors::{EngineError, EngineResult};
use crate::models::domain::quiz_question::QuizQuestionType;
use crate::models::domain::{AnswerRecord, QuestionResult, QuizDefinition, QuizQuestion, ScoreResult};

pub struct ScoringService;

impl ScoringService {
    /// Grade a completed attempt against its definition.
    ///
    /// `attempts_so_far` is the caller-supplied attempt count including this
    /// one; attempts may be recorded remotely across sessions, so the engine
    /// never infers it from local state.
    pub fn grade_attempt(
        quiz: &QuizDefinition,
        answers: &[AnswerRecord],
        time_spent_seconds: u64,
        attempts_so_far: u32,
    ) -> EngineResult<ScoreResult> {
        let mut points_earned: u32 = 0;
        let mut question_results = Vec::with_capacity(quiz.questions.len());

        for question in &quiz.questions {
            let answer = answers
                .iter()
                .find(|a| a.question_id == question.id)
                .ok_or_else(|| {
                    EngineError::ValidationError(format!(
                        "missing answer record for question {}",
                        question.id
                    ))
                })?;

            let (is_correct, points) = Self::grade_question(question, answer)?;
            points_earned += points;
            question_results.push(QuestionResult {
                question_id: question.id.clone(),
                is_correct,
                points_earned: points,
            });
        }

        let total_possible = quiz.total_possible_points();
        let percentage = Self::percentage(points_earned, total_possible);

        Ok(ScoreResult {
            attempt_id: Uuid::new_v4().to_string(),
            quiz_id: quiz.id.clone(),
            points_earned,
            total_possible,
            percentage,
            passed: percentage >= quiz.passing_score,
            time_spent_seconds,
            question_results,
            can_retake: Self::can_retake(quiz.attempt_limit, attempts_so_far),
            submitted_at: Utc::now(),
        })
    }

    /// Grade an individual question based on type. Full points or zero, no
    /// partial credit and no negative marking.
    fn grade_question(
        question: &QuizQuestion,
        answer: &AnswerRecord,
    ) -> EngineResult<(bool, u32)> {
        let correct_option_ids = question.correct_option_ids();
        let selected = &answer.selected_option_ids;

        let is_correct = match question.question_type {
            QuizQuestionType::Single | QuizQuestionType::Bool => {
                // Correct if exactly one option selected AND it's correct
                selected.len() == 1
                    && !correct_option_ids.is_empty()
                    && selected[0] == correct_option_ids[0]
            }
            QuizQuestionType::Multi => {
                // Correct if ALL correct options selected AND zero incorrect options
                if correct_option_ids.is_empty() {
                    return Err(EngineError::ValidationError(
                        "Multi-choice question has no correct options".to_string(),
                    ));
                }

                let has_all_correct = correct_option_ids
                    .iter()
                    .all(|id| selected.iter().any(|s| s == id));
                let has_no_incorrect = selected
                    .iter()
                    .all(|id| correct_option_ids.contains(&id.as_str()));
                has_all_correct && has_no_incorrect
            }
            QuizQuestionType::FillBlank => {
                let expected = question.expected_answer.as_ref().ok_or_else(|| {
                    EngineError::ValidationError(
                        "Fill-in-blank question has no expected answer".to_string(),
                    )
                })?;
                answer
                    .text_answer
                    .as_ref()
                    .is_some_and(|text| Self::normalize(text) == Self::normalize(expected))
            }
        };

        Ok((is_correct, if is_correct { question.points } else { 0 }))
    }

    /// Normalization rule for free-text comparison: trimmed and lowercased.
    /// Interior whitespace is preserved.
    fn normalize(text: &str) -> String {
        text.trim().to_lowercase()
    }

    /// Percentage with round-half-up, in integer arithmetic. Zero possible
    /// points grades to zero.
    pub fn percentage(points_earned: u32, total_possible: u32) -> u8 {
        if total_possible == 0 {
            return 0;
        }
        ((200 * points_earned + total_possible) / (2 * total_possible)) as u8
    }

    /// An attempt limit of zero means unlimited retakes.
    pub fn can_retake(attempt_limit: u32, attempts_so_far: u32) -> bool {
        attempt_limit == 0 || attempts_so_far < attempt_limit
    }
}
