#![deny(warnings)]

//! Quiz engine: a fixed question bank, a clamped cursor, and idempotent
//! first-success-only grading.
//!
//! Grading is the only path that mutates quiz state. The aggregate score is
//! always recomputed from the canonical answer map, never kept as a parallel
//! counter.

use fin_core::PlayerState;
use progression::XpRewards;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Number of correct answers that completes the daily quiz challenge.
pub const QUIZ_CHALLENGE_TARGET: u32 = 3;

/// One multiple-choice question.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct: usize,
}

/// The built-in personal-finance question bank.
pub fn question_bank() -> Vec<Question> {
    fn q(prompt: &str, options: [&str; 4], correct: usize) -> Question {
        Question {
            prompt: prompt.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct,
        }
    }
    vec![
        q(
            "You get Rs 500 pocket money. What's the smartest first move?",
            [
                "Spend it fast before it 'gets over'",
                "Save a part (like 20-30%) before spending",
                "Lend all to a friend for fun",
                "Buy loot boxes in a game immediately",
            ],
            1,
        ),
        q(
            "What is the safest way to use UPI?",
            [
                "Share OTP if caller says 'I am from bank'",
                "Type your UPI PIN on any website that asks",
                "Only enter UPI PIN inside your own UPI app",
                "Let strangers scan your QR to test",
            ],
            2,
        ),
        q(
            "What is an 'emergency fund'?",
            [
                "Money kept aside only for shopping",
                "Money you borrow from friends last minute",
                "Money saved for unexpected events like doctor, repairs",
                "Loan you take from any app",
            ],
            2,
        ),
        q(
            "Which one is usually LOWER risk?",
            [
                "Random crypto you saw on Instagram",
                "Stocks you never researched",
                "Ponzi schemes promising 'double in 10 days'",
                "Diversified mutual fund from a legit platform",
            ],
            3,
        ),
        q(
            "If the central bank raises interest rates on savings, who benefits?",
            [
                "People who keep money in savings or FDs",
                "Only people taking loans",
                "Nobody, it is random",
                "Only people who trade crypto",
            ],
            0,
        ),
    ]
}

/// Errors for out-of-range quiz inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    /// Question index beyond the bank.
    #[error("question index {0} out of range")]
    IndexOutOfRange(usize),
    /// Chosen option beyond the question's option list.
    #[error("choice {0} out of range")]
    ChoiceOutOfRange(usize),
}

/// Result of grading one answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradeOutcome {
    /// Question was already answered correctly; informational only.
    AlreadyCorrect,
    /// First correct answer: XP awarded, score updated.
    Correct { score: u32 },
    /// Wrong answer; the question stays winnable.
    Wrong,
}

/// Move the cursor forward, clamped at the last question.
pub fn next(index: usize, bank_len: usize) -> usize {
    if bank_len == 0 {
        return 0;
    }
    (index + 1).min(bank_len - 1)
}

/// Move the cursor back, clamped at zero.
pub fn prev(index: usize) -> usize {
    index.saturating_sub(1)
}

/// Grade `choice` for question `index`.
///
/// First-success-only: once an index is recorded true it never flips back and
/// re-answering never awards XP again. A previously wrong index can still be
/// answered correctly later and awards XP exactly once at that point.
pub fn grade(
    state: &mut PlayerState,
    bank: &[Question],
    index: usize,
    choice: usize,
) -> Result<GradeOutcome, QuizError> {
    let question = bank.get(index).ok_or(QuizError::IndexOutOfRange(index))?;
    if choice >= question.options.len() {
        return Err(QuizError::ChoiceOutOfRange(choice));
    }

    if state.quiz_answers.get(&index) == Some(&true) {
        debug!(index, "re-answer of an already-correct question ignored");
        return Ok(GradeOutcome::AlreadyCorrect);
    }

    if choice == question.correct {
        state.quiz_answers.insert(index, true);
        let score = state.quiz_score();
        state.quizzes_correct = score;
        state.challenges.quiz_today = score >= QUIZ_CHALLENGE_TARGET;
        progression::add_xp(state, XpRewards::QUIZ_CORRECT, "quiz answer");
        info!(index, score, "quiz answered correctly");
        Ok(GradeOutcome::Correct { score })
    } else {
        state.quiz_answers.insert(index, false);
        Ok(GradeOutcome::Wrong)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_has_five_valid_questions() {
        let bank = question_bank();
        assert_eq!(bank.len(), 5);
        for q in &bank {
            assert_eq!(q.options.len(), 4);
            assert!(q.correct < q.options.len());
        }
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let n = question_bank().len();
        assert_eq!(prev(0), 0);
        assert_eq!(next(n - 1, n), n - 1);
        assert_eq!(next(0, n), 1);
        assert_eq!(prev(3), 2);
    }

    #[test]
    fn correct_answer_awards_xp_once() {
        let bank = question_bank();
        let mut s = PlayerState::default();
        let correct = bank[0].correct;
        let r1 = grade(&mut s, &bank, 0, correct).unwrap();
        assert_eq!(r1, GradeOutcome::Correct { score: 1 });
        assert_eq!(s.points, XpRewards::QUIZ_CORRECT);
        assert_eq!(s.quizzes_correct, 1);

        let snapshot = s.clone();
        let r2 = grade(&mut s, &bank, 0, correct).unwrap();
        assert_eq!(r2, GradeOutcome::AlreadyCorrect);
        assert_eq!(s, snapshot); // grading is idempotent
    }

    #[test]
    fn wrong_then_correct_still_awards_once() {
        let bank = question_bank();
        let mut s = PlayerState::default();
        let correct = bank[1].correct;
        let wrong = (correct + 1) % bank[1].options.len();
        assert_eq!(grade(&mut s, &bank, 1, wrong).unwrap(), GradeOutcome::Wrong);
        assert_eq!(s.quiz_answers.get(&1), Some(&false));
        assert_eq!(s.points, 0);
        assert_eq!(
            grade(&mut s, &bank, 1, correct).unwrap(),
            GradeOutcome::Correct { score: 1 }
        );
        assert_eq!(s.points, XpRewards::QUIZ_CORRECT);
        // a later wrong re-answer must not clear the recorded success
        assert_eq!(
            grade(&mut s, &bank, 1, wrong).unwrap(),
            GradeOutcome::AlreadyCorrect
        );
        assert_eq!(s.quiz_answers.get(&1), Some(&true));
    }

    #[test]
    fn challenge_flag_set_at_three_correct() {
        let bank = question_bank();
        let mut s = PlayerState::default();
        for i in 0..2 {
            grade(&mut s, &bank, i, bank[i].correct).unwrap();
            assert!(!s.challenges.quiz_today);
        }
        grade(&mut s, &bank, 2, bank[2].correct).unwrap();
        assert!(s.challenges.quiz_today);
        assert_eq!(s.quizzes_correct, 3);
    }

    #[test]
    fn out_of_range_inputs_rejected_without_state_change() {
        let bank = question_bank();
        let mut s = PlayerState::default();
        assert_eq!(
            grade(&mut s, &bank, 99, 0),
            Err(QuizError::IndexOutOfRange(99))
        );
        assert_eq!(
            grade(&mut s, &bank, 0, 7),
            Err(QuizError::ChoiceOutOfRange(7))
        );
        assert_eq!(s, PlayerState::default());
    }
}
