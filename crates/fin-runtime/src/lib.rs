#![deny(warnings)]

//! Game engine composing progression, quiz, ledger, and awards over one
//! owned player state.
//!
//! All operations are synchronous request/response; there is exactly one
//! mutator context at a time, so no locking. Each mutating operation
//! persists the snapshot (when a save file is attached) before returning.
//! The only deferred work is the mentor reply queue, drained by `poll_mentor`
//! with no ordering guarantee against other operations.

use chrono::NaiveDate;
use fin_core::{validate_age, validate_name, AssetId, PlayerState};
use ledger::{LedgerError, MarketFeed, Quote, UpiReceipt};
use persistence::{SaveFile, StoreError};
use progression::{Rank, StreakChange, XpRewards};
use quiz::{GradeOutcome, Question, QuizError};
use serde::Serialize;
use std::collections::VecDeque;
use thiserror::Error;
use tracing::info;

pub mod mentor;
pub use mentor::PendingReply;

/// Default RNG seed for the market feed when none is supplied.
pub const DEFAULT_MARKET_SEED: u64 = 42;

/// Errors surfaced to the UI layer. All are recoverable rejections; the
/// state is untouched when one is returned.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Validation(#[from] fin_core::ValidationError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Mentor questions must be non-empty.
    #[error("ask the mentor an actual question")]
    EmptyQuestion,
}

/// One portfolio row as displayed.
#[derive(Clone, Debug, Serialize)]
pub struct PortfolioRow {
    pub id: String,
    pub qty: u64,
    pub avg_price: u64,
    /// qty * current quote (cost basis when unquoted).
    pub value: u64,
}

/// Display view of one badge.
#[derive(Clone, Debug, Serialize)]
pub struct BadgeView {
    pub key: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
}

/// Full derived display snapshot, recomputed after every operation.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub name: String,
    pub age: Option<u8>,
    pub points: u64,
    pub level: u32,
    pub rank: &'static str,
    pub xp_progress_pct: u8,
    pub streak: u32,
    pub last_login: Option<NaiveDate>,
    pub wallet: u64,
    pub quiz_score: u32,
    pub quiz_index: usize,
    pub quiz_total: usize,
    pub portfolio: Vec<PortfolioRow>,
    pub portfolio_value: u64,
    pub challenges: Vec<awards::ChallengeStatus>,
    pub badges: Vec<BadgeView>,
}

/// Owns the player state and every operation that mutates it.
pub struct GameEngine {
    state: PlayerState,
    feed: MarketFeed,
    bank: Vec<Question>,
    quiz_index: usize,
    mentor_queue: VecDeque<PendingReply>,
    store: Option<SaveFile>,
}

impl GameEngine {
    /// Engine over a fresh default state, no persistence attached.
    pub fn new(market_seed: u64) -> Self {
        Self::from_state(PlayerState::default(), market_seed, None)
    }

    /// Engine backed by a save file; loads (or defaults) the state from it.
    pub fn with_store(store: SaveFile, market_seed: u64) -> Self {
        let state = store.load();
        Self::from_state(state, market_seed, Some(store))
    }

    fn from_state(state: PlayerState, market_seed: u64, store: Option<SaveFile>) -> Self {
        Self {
            state,
            feed: MarketFeed::new(market_seed),
            bank: quiz::question_bank(),
            quiz_index: 0,
            mentor_queue: VecDeque::new(),
            store,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    fn persist(&self) -> Result<(), GameError> {
        if let Some(store) = &self.store {
            store.save(&self.state)?;
        }
        Ok(())
    }

    /// Complete onboarding with a validated name and age.
    pub fn onboard(&mut self, name: &str, age: u8, today: NaiveDate) -> Result<Snapshot, GameError> {
        validate_name(name)?;
        validate_age(age)?;
        self.state.name = name.trim().to_string();
        self.state.age = Some(age);
        progression::roll_streak(&mut self.state, today);
        self.persist()?;
        info!(name = %self.state.name, age, "onboarded");
        Ok(self.snapshot())
    }

    /// Skip onboarding and play as "Guest".
    pub fn play_as_guest(&mut self, today: NaiveDate) -> Result<Snapshot, GameError> {
        self.state.name = "Guest".to_string();
        self.state.age = None;
        progression::roll_streak(&mut self.state, today);
        self.persist()?;
        Ok(self.snapshot())
    }

    /// Roll the login streak for `today`. Idempotent within a day.
    pub fn roll_streak(&mut self, today: NaiveDate) -> Result<StreakChange, GameError> {
        let change = progression::roll_streak(&mut self.state, today);
        self.persist()?;
        Ok(change)
    }

    pub fn deposit(&mut self, amount: u64) -> Result<Snapshot, GameError> {
        ledger::deposit(&mut self.state, amount)?;
        self.persist()?;
        Ok(self.snapshot())
    }

    pub fn withdraw(&mut self, amount: u64) -> Result<Snapshot, GameError> {
        ledger::withdraw(&mut self.state, amount)?;
        self.persist()?;
        Ok(self.snapshot())
    }

    pub fn simulate_upi(&mut self, to: &str, amount: u64) -> Result<UpiReceipt, GameError> {
        let receipt = ledger::simulate_upi(&mut self.state, to, amount)?;
        self.persist()?;
        Ok(receipt)
    }

    /// Advance the quiz cursor (clamped).
    pub fn quiz_next(&mut self) -> usize {
        self.quiz_index = quiz::next(self.quiz_index, self.bank.len());
        self.quiz_index
    }

    /// Step the quiz cursor back (clamped).
    pub fn quiz_prev(&mut self) -> usize {
        self.quiz_index = quiz::prev(self.quiz_index);
        self.quiz_index
    }

    pub fn current_question(&self) -> &Question {
        &self.bank[self.quiz_index]
    }

    /// Grade `choice` against the question under the cursor.
    pub fn answer(&mut self, choice: usize) -> Result<GradeOutcome, GameError> {
        let outcome = quiz::grade(&mut self.state, &self.bank, self.quiz_index, choice)?;
        if !matches!(outcome, GradeOutcome::AlreadyCorrect) {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Re-roll market prices.
    pub fn refresh_market(&mut self) -> Vec<Quote> {
        self.feed.refresh();
        self.feed.quotes()
    }

    pub fn market_quotes(&self) -> Vec<Quote> {
        self.feed.quotes()
    }

    /// Buy at the current quoted price.
    pub fn buy(&mut self, asset: &AssetId, qty: u64) -> Result<Snapshot, GameError> {
        let price = self
            .feed
            .price(asset)
            .ok_or_else(|| LedgerError::NoMarketPrice(asset.0.clone()))?;
        ledger::buy(&mut self.state, asset, qty, price)?;
        self.persist()?;
        Ok(self.snapshot())
    }

    /// Sell at the current quoted price.
    pub fn sell(&mut self, asset: &AssetId, qty: u64) -> Result<Snapshot, GameError> {
        let price = self
            .feed
            .price(asset)
            .ok_or_else(|| LedgerError::NoMarketPrice(asset.0.clone()))?;
        ledger::sell(&mut self.state, asset, qty, price)?;
        self.persist()?;
        Ok(self.snapshot())
    }

    /// Ask the mentor. Completes the daily mentor challenge, awards XP, and
    /// queues a canned reply for later delivery.
    pub fn ask_mentor(&mut self, question: &str) -> Result<Snapshot, GameError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(GameError::EmptyQuestion);
        }
        self.state.challenges.mentor_today = true;
        progression::add_xp(&mut self.state, XpRewards::MENTOR, "asking mentor");
        self.mentor_queue.push_back(PendingReply {
            question: question.to_string(),
            reply: mentor::reply_for(question),
        });
        self.persist()?;
        Ok(self.snapshot())
    }

    /// Deliver the oldest queued mentor reply, if any.
    pub fn poll_mentor(&mut self) -> Option<PendingReply> {
        self.mentor_queue.pop_front()
    }

    /// Wipe everything back to defaults. Pending mentor replies are dropped
    /// and the quiz cursor rewinds.
    pub fn reset(&mut self) -> Result<Snapshot, GameError> {
        self.state = match &self.store {
            Some(store) => store.reset()?,
            None => PlayerState::default(),
        };
        self.quiz_index = 0;
        self.mentor_queue.clear();
        info!("progress reset");
        Ok(self.snapshot())
    }

    /// Build the derived display snapshot from the current state. Badges and
    /// valuations are recomputed on every call.
    pub fn snapshot(&self) -> Snapshot {
        let s = &self.state;
        let portfolio: Vec<PortfolioRow> = s
            .portfolio
            .iter()
            .map(|h| PortfolioRow {
                id: h.asset_id.0.clone(),
                qty: h.qty,
                avg_price: h.avg_price,
                value: h.qty.saturating_mul(self.feed.price(&h.asset_id).unwrap_or(h.avg_price)),
            })
            .collect();
        let portfolio_value = portfolio.iter().map(|r| r.value).sum();
        Snapshot {
            name: s.name.clone(),
            age: s.age,
            points: s.points,
            level: s.level,
            rank: Rank::for_level(s.level).label(),
            xp_progress_pct: progression::xp_progress_pct(s.points),
            streak: s.streak,
            last_login: s.last_login,
            wallet: s.wallet,
            quiz_score: s.quiz_score(),
            quiz_index: self.quiz_index,
            quiz_total: self.bank.len(),
            portfolio,
            portfolio_value,
            challenges: awards::challenge_report(&s.challenges),
            badges: awards::badges_for(s)
                .into_iter()
                .map(|b| BadgeView {
                    key: b.key(),
                    label: b.label(),
                    emoji: b.emoji(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn engine() -> GameEngine {
        GameEngine::new(DEFAULT_MARKET_SEED)
    }

    #[test]
    fn onboarding_validates_inputs() {
        let mut e = engine();
        assert!(e.onboard("", 15, date(2026, 8, 1)).is_err());
        assert!(e.onboard("Asha", 9, date(2026, 8, 1)).is_err());
        let snap = e.onboard("Asha", 15, date(2026, 8, 1)).unwrap();
        assert_eq!(snap.name, "Asha");
        assert_eq!(snap.streak, 1);
    }

    #[test]
    fn snapshot_reflects_every_mutation() {
        let mut e = engine();
        let snap = e.deposit(1200).unwrap();
        assert_eq!(snap.wallet, 1200);
        assert_eq!(snap.points, XpRewards::DEPOSIT);
        assert!(snap.badges.iter().any(|b| b.key == "wallet1k"));
        assert!(snap
            .challenges
            .iter()
            .any(|c| c.completed && c.label.contains("Deposit")));

        let snap = e.withdraw(300).unwrap();
        assert_eq!(snap.wallet, 900);
        // Saver badge recomputed, not cached
        assert!(!snap.badges.iter().any(|b| b.key == "wallet1k"));
    }

    #[test]
    fn quiz_cursor_clamps_and_grades() {
        let mut e = engine();
        assert_eq!(e.quiz_prev(), 0);
        e.quiz_next();
        assert_eq!(e.snapshot().quiz_index, 1);
        let correct = e.current_question().correct;
        assert!(matches!(
            e.answer(correct).unwrap(),
            GradeOutcome::Correct { score: 1 }
        ));
        assert!(matches!(
            e.answer(correct).unwrap(),
            GradeOutcome::AlreadyCorrect
        ));
        assert_eq!(e.state().points, XpRewards::QUIZ_CORRECT);
    }

    #[test]
    fn trade_through_quoted_prices() {
        let mut e = engine();
        e.deposit(10_000).unwrap();
        let fnt = AssetId::new("FNT");
        let price = e.market_quotes()[0].price;
        let snap = e.buy(&fnt, 2).unwrap();
        assert_eq!(snap.portfolio.len(), 1);
        assert_eq!(snap.portfolio[0].avg_price, price);
        assert_eq!(snap.wallet, 10_000 - 2 * price);

        let snap = e.sell(&fnt, 2).unwrap();
        assert!(snap.portfolio.is_empty());

        let err = e.buy(&AssetId::new("NOPE"), 1).unwrap_err();
        assert!(matches!(
            err,
            GameError::Ledger(LedgerError::NoMarketPrice(_))
        ));
    }

    #[test]
    fn mentor_queue_is_fifo_and_fire_and_forget() {
        let mut e = engine();
        assert!(matches!(e.ask_mentor("  "), Err(GameError::EmptyQuestion)));
        e.ask_mentor("how does upi work").unwrap();
        e.ask_mentor("should I save").unwrap();
        // other operations proceed while replies are pending
        e.deposit(50).unwrap();
        let first = e.poll_mentor().unwrap();
        assert_eq!(first.question, "how does upi work");
        let second = e.poll_mentor().unwrap();
        assert!(second.reply.contains("50% needs"));
        assert!(e.poll_mentor().is_none());
        assert!(e.state().challenges.mentor_today);
        assert_eq!(e.state().points, 2 * XpRewards::MENTOR + XpRewards::DEPOSIT);
    }

    #[test]
    fn reset_drops_pending_replies_and_state() {
        let mut e = engine();
        e.deposit(500).unwrap();
        e.ask_mentor("upi?").unwrap();
        e.quiz_next();
        let snap = e.reset().unwrap();
        assert_eq!(snap.wallet, 0);
        assert_eq!(snap.quiz_index, 0);
        assert!(e.poll_mentor().is_none());
        assert_eq!(e.state(), &PlayerState::default());
    }

    #[test]
    fn persisted_engine_roundtrips_through_save_file() {
        let mut p = std::env::temp_dir();
        p.push(format!("finquest-runtime-{}", std::process::id()));
        p.push("state.json");
        let _ = std::fs::remove_file(&p);
        let store = SaveFile::new(&p);

        let mut e = GameEngine::with_store(store.clone(), 7);
        e.onboard("Ravi", 14, date(2026, 8, 1)).unwrap();
        e.deposit(400).unwrap();

        let e2 = GameEngine::with_store(store, 7);
        assert_eq!(e2.state().name, "Ravi");
        assert_eq!(e2.state().wallet, 400);
        assert_eq!(e2.state().streak, 1);
    }

    #[test]
    fn snapshot_serializes_for_the_ui_layer() {
        let mut e = engine();
        e.deposit(100).unwrap();
        let v = serde_json::to_value(e.snapshot()).unwrap();
        assert_eq!(v["wallet"], serde_json::json!(100));
        assert_eq!(v["rank"], serde_json::json!("Rookie"));
        assert!(v["challenges"].as_array().unwrap().len() == 5);
    }
}
