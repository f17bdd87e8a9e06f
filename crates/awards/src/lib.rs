#![deny(warnings)]

//! Badge and daily-challenge evaluator.
//!
//! Badges are derived, never stored: every query re-runs the threshold
//! predicates against the current state, so the badge list can never go
//! stale. The challenge report only reads the five daily flags; the
//! operations that complete a challenge are responsible for flipping them.

use fin_core::{Challenges, PlayerState};
use serde::{Deserialize, Serialize};

/// The six unlockable badges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Badge {
    /// points >= 50
    Xp50,
    /// points >= 200
    Xp200,
    /// quizzes_correct >= 3
    QuizStreaker,
    /// wallet >= 1000
    Saver1k,
    /// portfolio non-empty
    FirstInvestment,
    /// streak >= 3
    Streak3,
}

impl Badge {
    /// Stable key used in snapshots and display caches.
    pub fn key(&self) -> &'static str {
        match self {
            Badge::Xp50 => "xp50",
            Badge::Xp200 => "xp200",
            Badge::QuizStreaker => "quiz3",
            Badge::Saver1k => "wallet1k",
            Badge::FirstInvestment => "investor",
            Badge::Streak3 => "streak3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Xp50 => "XP 50+",
            Badge::Xp200 => "XP 200+",
            Badge::QuizStreaker => "Quiz Streaker",
            Badge::Saver1k => "Saver 1K+",
            Badge::FirstInvestment => "First Investment",
            Badge::Streak3 => "3-Day Streak",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Badge::Xp50 => "\u{1f4a0}",
            Badge::Xp200 => "\u{1f48e}",
            Badge::QuizStreaker => "\u{1f3af}",
            Badge::Saver1k => "\u{1f4b3}",
            Badge::FirstInvestment => "\u{1f4c8}",
            Badge::Streak3 => "\u{1f525}",
        }
    }

    fn earned(&self, state: &PlayerState) -> bool {
        match self {
            Badge::Xp50 => state.points >= 50,
            Badge::Xp200 => state.points >= 200,
            Badge::QuizStreaker => state.quizzes_correct >= 3,
            Badge::Saver1k => state.wallet >= 1000,
            Badge::FirstInvestment => !state.portfolio.is_empty(),
            Badge::Streak3 => state.streak >= 3,
        }
    }

    pub const ALL: [Badge; 6] = [
        Badge::Xp50,
        Badge::Xp200,
        Badge::QuizStreaker,
        Badge::Saver1k,
        Badge::FirstInvestment,
        Badge::Streak3,
    ];
}

/// Every badge whose threshold the current state meets. Thresholds are
/// independent; several can be earned at once.
pub fn badges_for(state: &PlayerState) -> Vec<Badge> {
    Badge::ALL.iter().copied().filter(|b| b.earned(state)).collect()
}

/// The five daily challenges with their display metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeId {
    QuizToday,
    DepositToday,
    TradeToday,
    MentorToday,
    UpiToday,
}

impl ChallengeId {
    pub fn label(&self) -> &'static str {
        match self {
            ChallengeId::QuizToday => "Finish quiz with at least 3 correct",
            ChallengeId::DepositToday => "Deposit into wallet once",
            ChallengeId::TradeToday => "Complete any buy or sell trade",
            ChallengeId::MentorToday => "Ask mentor at least one question",
            ChallengeId::UpiToday => "Simulate one UPI payment",
        }
    }

    /// XP reward shown for an incomplete challenge.
    pub fn reward(&self) -> u64 {
        match self {
            ChallengeId::QuizToday => 40,
            ChallengeId::DepositToday => 15,
            ChallengeId::TradeToday => 25,
            ChallengeId::MentorToday => 10,
            ChallengeId::UpiToday => 15,
        }
    }

    fn completed(&self, c: &Challenges) -> bool {
        match self {
            ChallengeId::QuizToday => c.quiz_today,
            ChallengeId::DepositToday => c.deposit_today,
            ChallengeId::TradeToday => c.trade_today,
            ChallengeId::MentorToday => c.mentor_today,
            ChallengeId::UpiToday => c.upi_today,
        }
    }

    pub const ALL: [ChallengeId; 5] = [
        ChallengeId::QuizToday,
        ChallengeId::DepositToday,
        ChallengeId::TradeToday,
        ChallengeId::MentorToday,
        ChallengeId::UpiToday,
    ];
}

/// Current status of one daily challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChallengeStatus {
    pub id: ChallengeId,
    pub label: &'static str,
    pub reward: u64,
    pub completed: bool,
}

/// Report all five challenges. Read-only: the evaluator never flips a flag.
pub fn challenge_report(challenges: &Challenges) -> Vec<ChallengeStatus> {
    ChallengeId::ALL
        .iter()
        .map(|id| ChallengeStatus {
            id: *id,
            label: id.label(),
            reward: id.reward(),
            completed: id.completed(challenges),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_has_no_badges() {
        assert!(badges_for(&PlayerState::default()).is_empty());
    }

    #[test]
    fn saver_badge_exact_threshold() {
        let mut s = PlayerState::default();
        s.wallet = 999;
        assert!(!badges_for(&s).contains(&Badge::Saver1k));
        s.wallet = 1000;
        assert!(badges_for(&s).contains(&Badge::Saver1k));
    }

    #[test]
    fn multiple_badges_simultaneously() {
        let mut s = PlayerState::default();
        s.points = 250;
        s.quizzes_correct = 3;
        s.streak = 3;
        let badges = badges_for(&s);
        assert!(badges.contains(&Badge::Xp50));
        assert!(badges.contains(&Badge::Xp200));
        assert!(badges.contains(&Badge::QuizStreaker));
        assert!(badges.contains(&Badge::Streak3));
        assert!(!badges.contains(&Badge::Saver1k));
        assert!(!badges.contains(&Badge::FirstInvestment));
    }

    #[test]
    fn investment_badge_tracks_portfolio() {
        let mut s = PlayerState::default();
        s.portfolio.push(fin_core::Holding {
            asset_id: fin_core::AssetId::new("FNT"),
            qty: 1,
            avg_price: 100,
        });
        assert!(badges_for(&s).contains(&Badge::FirstInvestment));
        s.portfolio.clear();
        // derived, never cached: the badge disappears with the position
        assert!(!badges_for(&s).contains(&Badge::FirstInvestment));
    }

    #[test]
    fn challenge_report_mirrors_flags_without_flipping() {
        let mut c = Challenges::default();
        c.trade_today = true;
        let report = challenge_report(&c);
        assert_eq!(report.len(), 5);
        for st in &report {
            assert_eq!(st.completed, st.id == ChallengeId::TradeToday);
        }
        assert!(c.trade_today && !c.quiz_today);
        let quiz = report
            .iter()
            .find(|s| s.id == ChallengeId::QuizToday)
            .unwrap();
        assert_eq!(quiz.reward, 40);
    }
}
