//! Deterministic fallback quiz generator.
//!
//! Used when the remote backend is unreachable or declines to answer. The whole
//! pipeline is seeded from `topic:difficulty:salt`, so identical inputs always
//! produce byte-identical output, and changing any single input (including the
//! salt) yields a different but still well-formed question set.

use crate::models::domain::{QuizDefinition, QuizQuestion, QuizQuestionOption, QuizQuestionType};
use crate::models::dto::request::GenerateQuizRequest;

// FNV-1a parameters, 32-bit variant.
const HASH_OFFSET_BASIS: u32 = 2_166_136_261;
const HASH_PRIME: u32 = 16_777_619;

// SplitMix increment (odd) and mixing multipliers.
const RNG_INCREMENT: u32 = 0x9E37_79B9;
const RNG_MIX_1: u32 = 0x21F0_AAAD;
const RNG_MIX_2: u32 = 0x735A_2D97;

const EASY_PHRASES: &[&str] = &[
    "main purpose of",
    "basic definition of",
    "simplest example of",
    "first step when learning",
];

const INTERMEDIATE_PHRASES: &[&str] = &[
    "key trade-off in",
    "underlying mechanism of",
    "most common pitfall when using",
    "practical limitation of",
];

const ADVANCED_PHRASES: &[&str] = &[
    "asymptotic behavior of",
    "formal invariant behind",
    "failure mode under load of",
    "optimization boundary of",
];

const OPTION_TEMPLATES: [&str; 4] = [
    "The canonical definition",
    "A common misconception",
    "A related but distinct concept",
    "An implementation detail",
];

/// Streaming 32-bit hash of the seed string: XOR each code point into the
/// accumulator, then multiply by an odd prime, truncating at every step.
fn hash_seed(seed: &str) -> u32 {
    let mut hash = HASH_OFFSET_BASIS;
    for ch in seed.chars() {
        hash ^= ch as u32;
        hash = hash.wrapping_mul(HASH_PRIME);
    }
    hash
}

/// SplitMix-style PRNG. Stateful only within one generation call.
struct SeededRng {
    state: u32,
}

impl SeededRng {
    fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next value in [0, 1).
    fn next(&mut self) -> f64 {
        self.state = self.state.wrapping_add(RNG_INCREMENT);
        let mut z = self.state;
        z ^= z >> 16;
        z = z.wrapping_mul(RNG_MIX_1);
        z ^= z >> 15;
        z = z.wrapping_mul(RNG_MIX_2);
        z ^= z >> 15;
        f64::from(z) / 4_294_967_296.0
    }

    /// Uniform index in [0, bound).
    fn next_index(&mut self, bound: usize) -> usize {
        (self.next() * bound as f64) as usize
    }
}

fn phrase_table(difficulty: &str) -> &'static [&'static str] {
    match difficulty {
        "advanced" => ADVANCED_PHRASES,
        "intermediate" => INTERMEDIATE_PHRASES,
        _ => EASY_PHRASES,
    }
}

/// Generate `question_count` single-choice questions for the request. A zero
/// count yields an empty set rather than an error; input validation is the
/// caller's contract (see `GenerateQuizRequest::validate`).
pub fn generate_questions(request: &GenerateQuizRequest) -> Vec<QuizQuestion> {
    let seed_string = format!(
        "{}:{}:{}",
        request.topic,
        request.difficulty.as_str(),
        request.salt
    );
    let mut rng = SeededRng::new(hash_seed(&seed_string));
    let phrases = phrase_table(request.difficulty.as_str());

    let mut questions = Vec::with_capacity(request.question_count as usize);
    for question_index in 0..request.question_count as usize {
        let phrase = phrases[rng.next_index(phrases.len())];
        let text = format!("What is the {} {}?", phrase, request.topic);

        // Fisher–Yates over the fixed template list, driven by the same stream.
        let mut templates = OPTION_TEMPLATES;
        for i in (1..templates.len()).rev() {
            let j = rng.next_index(i + 1);
            templates.swap(i, j);
        }
        let correct_index = rng.next_index(4);

        let options = templates
            .iter()
            .enumerate()
            .map(|(option_index, template)| {
                let correct = option_index == correct_index;
                let text = if correct {
                    (*template).to_string()
                } else {
                    format!("{template} (distractor)")
                };
                QuizQuestionOption {
                    id: format!("{question_index}-{option_index}"),
                    text,
                    correct,
                }
            })
            .collect();

        questions.push(QuizQuestion {
            id: question_index.to_string(),
            text,
            question_type: QuizQuestionType::Single,
            options,
            expected_answer: None,
            points: 1,
            explanation: None,
        });
    }

    questions
}

/// Wrap a generated question set into a full definition. The quiz id is derived
/// from the seed hash so that generation stays fully deterministic.
pub fn generate_quiz(
    request: &GenerateQuizRequest,
    time_limit_minutes: u32,
    passing_score: u8,
    attempt_limit: u32,
) -> QuizDefinition {
    let seed_string = format!(
        "{}:{}:{}",
        request.topic,
        request.difficulty.as_str(),
        request.salt
    );
    let mut quiz = QuizDefinition::new(
        &format!("generated-{:08x}", hash_seed(&seed_string)),
        &format!("{} quiz", request.topic),
        generate_questions(request),
        time_limit_minutes,
        passing_score,
        attempt_limit,
    );
    // Timestamps would break byte-identical output for identical inputs.
    quiz.created_at = None;
    quiz
}
