#![deny(warnings)]

//! Core domain model and invariants for FinQuest.
//!
//! This crate defines the single serializable player record used across the
//! game with validation helpers to guarantee basic invariants. Derived fields
//! (level, quiz tally) are normalized from their canonical sources rather
//! than trusted from a loaded snapshot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Unique identifier for a tradable demo asset, e.g. "FNT", "EDU", "GRW".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(s: impl Into<String>) -> Self {
        AssetId(s.into())
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A portfolio position in one asset.
///
/// Invariant: `qty > 0` while the holding is present; a position whose
/// quantity reaches zero is removed from the portfolio entirely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Asset identifier.
    #[serde(rename = "id")]
    pub asset_id: AssetId,
    /// Units held (> 0).
    pub qty: u64,
    /// Weighted-average cost basis per unit, in whole rupees.
    pub avg_price: u64,
}

/// The five daily-challenge flags. Set by the respective operations, reset
/// only by an external day-rollover trigger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Challenges {
    pub quiz_today: bool,
    pub deposit_today: bool,
    pub trade_today: bool,
    pub mentor_today: bool,
    pub upi_today: bool,
}

fn default_name() -> String {
    "Guest".to_string()
}

fn default_level() -> u32 {
    1
}

/// Top-level player state. One record per device, mutated in place by every
/// user action, fully replaced only by an explicit reset.
///
/// Unknown fields found in a persisted snapshot are captured in `extra` and
/// written back verbatim, so a newer schema round-trips through this one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerState {
    /// Display name; "Guest" until onboarding completes.
    pub name: String,
    /// Player age in years, 10..=19 when present.
    pub age: Option<u8>,
    /// Total XP. Monotonically increasing.
    pub points: u64,
    /// Derived from `points` (1 + points/100); persisted for snapshot
    /// compatibility but never trusted on load.
    pub level: u32,
    /// Count of quiz questions answered correctly; mirror of `quiz_answers`.
    pub quizzes_correct: u32,
    /// Virtual wallet balance in whole rupees. Never negative.
    pub wallet: u64,
    /// Open positions, unique per asset, no zero-qty entries.
    pub portfolio: Vec<Holding>,
    /// Consecutive login-day count.
    pub streak: u32,
    /// Calendar date of the last recorded login.
    pub last_login: Option<NaiveDate>,
    pub challenges: Challenges,
    /// Per-question grading record: true = answered correctly at least once
    /// (never cleared), false = last attempt wrong (still winnable).
    pub quiz_answers: BTreeMap<usize, bool>,
    /// Unknown snapshot fields, preserved across load/save.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            name: default_name(),
            age: None,
            points: 0,
            level: default_level(),
            quizzes_correct: 0,
            wallet: 0,
            portfolio: Vec::new(),
            streak: 0,
            last_login: None,
            challenges: Challenges::default(),
            quiz_answers: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl PlayerState {
    /// Count of questions ever answered correctly, from the canonical map.
    pub fn quiz_score(&self) -> u32 {
        self.quiz_answers.values().filter(|v| **v).count() as u32
    }

    pub fn holding(&self, asset: &AssetId) -> Option<&Holding> {
        self.portfolio.iter().find(|h| &h.asset_id == asset)
    }

    pub fn holding_mut(&mut self, asset: &AssetId) -> Option<&mut Holding> {
        self.portfolio.iter_mut().find(|h| &h.asset_id == asset)
    }

    pub fn remove_holding(&mut self, asset: &AssetId) {
        self.portfolio.retain(|h| &h.asset_id != asset);
    }
}

/// Validation errors for domain invariants and user inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Display name must be non-empty after trimming.
    #[error("name must not be empty")]
    EmptyName,
    /// Age outside the supported range 10..=19.
    #[error("age {0} is out of supported range [10, 19]")]
    AgeOutOfRange(u8),
    /// Monetary amounts and trade quantities must be strictly positive.
    #[error("amount must be > 0")]
    NonPositiveAmount,
    /// Two holdings share one asset id.
    #[error("duplicate holding for asset {0}")]
    DuplicateHolding(String),
    /// A zero-quantity holding persisted instead of being removed.
    #[error("zero-quantity holding for asset {0}")]
    ZeroQtyHolding(String),
    /// Stored level disagrees with the points-derived one.
    #[error("level {stored} inconsistent with points-derived level {derived}")]
    LevelDrift { stored: u32, derived: u32 },
}

/// Validate an onboarding name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

/// Validate an onboarding age.
pub fn validate_age(age: u8) -> Result<(), ValidationError> {
    if !(10..=19).contains(&age) {
        return Err(ValidationError::AgeOutOfRange(age));
    }
    Ok(())
}

/// Validate a deposit/withdraw/UPI amount or trade quantity.
pub fn validate_amount(amount: u64) -> Result<(), ValidationError> {
    if amount == 0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(())
}

/// Level derived from total XP: 1 + floor(points / 100).
pub fn level_for_points(points: u64) -> u32 {
    (1 + points / 100).min(u32::MAX as u64) as u32
}

/// Validate the whole record, including cross-field invariants.
pub fn validate_state(state: &PlayerState) -> Result<(), ValidationError> {
    validate_name(&state.name)?;
    if let Some(age) = state.age {
        validate_age(age)?;
    }
    let mut seen = std::collections::BTreeSet::new();
    for h in &state.portfolio {
        if h.qty == 0 {
            return Err(ValidationError::ZeroQtyHolding(h.asset_id.0.clone()));
        }
        if !seen.insert(&h.asset_id) {
            return Err(ValidationError::DuplicateHolding(h.asset_id.0.clone()));
        }
    }
    let derived = level_for_points(state.points);
    if state.level != derived {
        return Err(ValidationError::LevelDrift {
            stored: state.level,
            derived,
        });
    }
    Ok(())
}

/// Repair a loaded snapshot so the invariants hold: re-derive level and the
/// quiz tally from their canonical sources and drop zero-qty holdings.
/// Loading never fails on drift; it is normalized away.
pub fn normalize(state: &mut PlayerState) {
    state.level = level_for_points(state.points);
    state.quizzes_correct = state.quiz_score();
    state.portfolio.retain(|h| h.qty > 0);
    if state.name.trim().is_empty() {
        state.name = default_name();
    }
}
