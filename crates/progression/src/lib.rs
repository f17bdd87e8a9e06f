#![deny(warnings)]

//! Progression engine: XP accrual, level derivation, rank mapping, and the
//! login-streak day rollover.
//!
//! All arithmetic is integer and all date math is calendar-day only, so a
//! streak can never miscount across a daylight-saving boundary.

use chrono::NaiveDate;
use fin_core::{level_for_points, PlayerState};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Fixed XP rewards for the game's actions.
pub struct XpRewards;

impl XpRewards {
    /// First correct answer to a quiz question.
    pub const QUIZ_CORRECT: u64 = 15;
    /// Wallet deposit.
    pub const DEPOSIT: u64 = 10;
    /// Simulated UPI payment.
    pub const UPI: u64 = 10;
    /// Any executed buy or sell.
    pub const TRADE: u64 = 12;
    /// Asking the mentor a question.
    pub const MENTOR: u64 = 5;
}

/// Player rank, a step function of level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Rookie,
    Apprentice,
    Skilled,
    Pro,
    Legend,
}

impl Rank {
    /// Total mapping with no gaps: >=10 Legend, >=7 Pro, >=4 Skilled,
    /// >=2 Apprentice, else Rookie.
    pub fn for_level(level: u32) -> Rank {
        match level {
            l if l >= 10 => Rank::Legend,
            l if l >= 7 => Rank::Pro,
            l if l >= 4 => Rank::Skilled,
            l if l >= 2 => Rank::Apprentice,
            _ => Rank::Rookie,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rank::Rookie => "Rookie",
            Rank::Apprentice => "Apprentice",
            Rank::Skilled => "Skilled",
            Rank::Pro => "Pro",
            Rank::Legend => "Legend",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Percentage progress through the current level, for display bars.
pub fn xp_progress_pct(points: u64) -> u8 {
    (points % 100).min(100) as u8
}

/// Add XP and re-derive the level.
///
/// Caller contract: `amount > 0`. Postcondition: `state.level ==
/// 1 + state.points / 100` always holds after the call.
pub fn add_xp(state: &mut PlayerState, amount: u64, reason: &str) {
    state.points = state.points.saturating_add(amount);
    state.level = level_for_points(state.points);
    info!(amount, reason, points = state.points, level = state.level, "xp awarded");
}

/// Outcome of a streak rollover, for messaging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreakChange {
    /// First login ever recorded.
    Started,
    /// Already rolled today; nothing changed.
    SameDay,
    /// Exactly one calendar day elapsed.
    Extended,
    /// A gap of more than one day; streak restarted at 1.
    Reset,
}

/// Roll the login streak for `today`.
///
/// Idempotent within a day. Uses calendar-day difference on `NaiveDate`
/// rather than timestamp subtraction, so adjacent dates always count as
/// exactly one day apart regardless of timezone offsets.
pub fn roll_streak(state: &mut PlayerState, today: NaiveDate) -> StreakChange {
    let change = match state.last_login {
        None => {
            state.streak = 1;
            StreakChange::Started
        }
        Some(last) if last == today => StreakChange::SameDay,
        Some(last) => {
            let days = today.signed_duration_since(last).num_days();
            if days == 1 {
                state.streak += 1;
                StreakChange::Extended
            } else {
                state.streak = 1;
                StreakChange::Reset
            }
        }
    };
    state.last_login = Some(today);
    if change != StreakChange::SameDay {
        info!(streak = state.streak, ?change, %today, "streak rolled");
    }
    change
}
