#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{
        QuizDefinition, QuizQuestion, QuizQuestionOption, QuizQuestionType,
    };

    fn options(question_index: usize, correct: &[usize]) -> Vec<QuizQuestionOption> {
        (0..4)
            .map(|option_index| QuizQuestionOption {
                id: format!("{question_index}-{option_index}"),
                text: format!("Option {option_index}"),
                correct: correct.contains(&option_index),
            })
            .collect()
    }

    /// Q1 single-choice worth 1 point, correct id "0-2"; Q2 multiple-choice
    /// worth 1 point, correct set {"1-0", "1-3"}. Untimed, passing score 60,
    /// attempt limit 2.
    pub fn two_question_quiz() -> QuizDefinition {
        QuizDefinition::new(
            "quiz-1",
            "Fixture quiz",
            vec![
                QuizQuestion {
                    id: "q0".to_string(),
                    text: "Pick the right one".to_string(),
                    question_type: QuizQuestionType::Single,
                    options: options(0, &[2]),
                    expected_answer: None,
                    points: 1,
                    explanation: None,
                },
                QuizQuestion {
                    id: "q1".to_string(),
                    text: "Pick all that apply".to_string(),
                    question_type: QuizQuestionType::Multi,
                    options: options(1, &[0, 3]),
                    expected_answer: None,
                    points: 1,
                    explanation: None,
                },
            ],
            0,
            60,
            2,
        )
    }

    /// Same questions as `two_question_quiz`, with a time limit.
    pub fn timed_quiz(minutes: u32) -> QuizDefinition {
        let mut quiz = two_question_quiz();
        quiz.time_limit_minutes = minutes;
        quiz
    }

    /// Single fill-in-blank question worth 2 points expecting "Oslo".
    pub fn fill_blank_quiz() -> QuizDefinition {
        QuizDefinition::new(
            "quiz-fb",
            "Capitals",
            vec![QuizQuestion {
                id: "q0".to_string(),
                text: "Name the capital of Norway".to_string(),
                question_type: QuizQuestionType::FillBlank,
                options: vec![],
                expected_answer: Some("Oslo".to_string()),
                points: 2,
                explanation: None,
            }],
            0,
            60,
            0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::QuizQuestionType;

    #[test]
    fn test_fixtures_two_question_quiz() {
        let quiz = two_question_quiz();
        assert_eq!(quiz.question_count(), 2);
        assert_eq!(quiz.questions[0].correct_option_ids(), vec!["0-2"]);
        assert_eq!(quiz.questions[1].correct_option_ids(), vec!["1-0", "1-3"]);
    }

    #[test]
    fn test_fixtures_timed_quiz() {
        let quiz = timed_quiz(5);
        assert_eq!(quiz.time_limit_minutes, 5);
    }

    #[test]
    fn test_fixtures_fill_blank_quiz() {
        let quiz = fill_blank_quiz();
        assert_eq!(quiz.questions[0].question_type, QuizQuestionType::FillBlank);
        assert_eq!(quiz.total_possible_points(), 2);
    }
}
