#![deny(warnings)]

//! Wallet and trading ledger: deposits, withdrawals, simulated UPI payments,
//! and buy/sell execution with a weighted-average cost basis.
//!
//! Every failure is a recoverable rejection that leaves the state untouched;
//! there are no partial fills. All money values are whole-rupee integers; the
//! only fractional intermediate is the cost-basis division, which is rounded
//! half-up via `rust_decimal` and converted back.

use fin_core::{validate_amount, AssetId, Holding, PlayerState, ValidationError};
use progression::XpRewards;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use tracing::info;

pub mod market;
pub use market::{demo_assets, MarketAsset, MarketFeed, Quote};

/// Errors produced by wallet and trading operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Input failed basic validation (zero amount etc.).
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// Wallet balance cannot cover the requested amount.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },
    /// Held quantity cannot cover the requested sell.
    #[error("insufficient quantity of {asset}: requested {requested}, held {held}")]
    InsufficientQuantity {
        asset: String,
        requested: u64,
        held: u64,
    },
    /// No current quote for the asset.
    #[error("no market price available for {0}")]
    NoMarketPrice(String),
    /// qty * price does not fit in 64 bits.
    #[error("trade value overflows")]
    ValueOverflow,
}

/// Receipt for a simulated UPI payment. No real money moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpiReceipt {
    pub to: String,
    pub amount: u64,
}

/// Deposit into the wallet. Completes the daily deposit challenge and awards
/// XP.
pub fn deposit(state: &mut PlayerState, amount: u64) -> Result<(), LedgerError> {
    validate_amount(amount)?;
    state.wallet = state.wallet.saturating_add(amount);
    state.challenges.deposit_today = true;
    progression::add_xp(state, XpRewards::DEPOSIT, "wallet deposit");
    info!(amount, wallet = state.wallet, "deposit");
    Ok(())
}

/// Withdraw from the wallet. No XP and no challenge flag.
pub fn withdraw(state: &mut PlayerState, amount: u64) -> Result<(), LedgerError> {
    validate_amount(amount)?;
    if amount > state.wallet {
        return Err(LedgerError::InsufficientFunds {
            needed: amount,
            available: state.wallet,
        });
    }
    state.wallet -= amount;
    info!(amount, wallet = state.wallet, "withdraw");
    Ok(())
}

/// Simulate a UPI payment. The wallet is untouched (it is a safety drill, not
/// a transfer); the daily UPI challenge flag is set and XP awarded.
pub fn simulate_upi(
    state: &mut PlayerState,
    to: &str,
    amount: u64,
) -> Result<UpiReceipt, LedgerError> {
    validate_amount(amount)?;
    let to = match to.trim() {
        "" => "Friend".to_string(),
        t => t.to_string(),
    };
    state.challenges.upi_today = true;
    progression::add_xp(state, XpRewards::UPI, "UPI safety practice");
    info!(%to, amount, "UPI payment simulated");
    Ok(UpiReceipt { to, amount })
}

/// Weighted-average cost basis after adding `cost` for `added_qty` units to a
/// position of `old_qty` units at `old_avg`.
///
/// Rounded half-up (midpoint away from zero), the single rounding policy used
/// everywhere in the ledger.
fn blended_avg(old_avg: u64, old_qty: u64, cost: u64, new_qty: u64) -> Result<u64, LedgerError> {
    let total = Decimal::from(old_avg) * Decimal::from(old_qty) + Decimal::from(cost);
    let avg = (total / Decimal::from(new_qty))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    avg.to_u64().ok_or(LedgerError::ValueOverflow)
}

/// Buy `qty` units of `asset` at `price` per unit.
///
/// Fails with `InsufficientFunds` when `qty * price` exceeds the wallet; no
/// partial fills. On success the wallet is debited, the position's average
/// price is re-blended, the daily trade challenge completes, and XP is
/// awarded.
pub fn buy(
    state: &mut PlayerState,
    asset: &AssetId,
    qty: u64,
    price: u64,
) -> Result<(), LedgerError> {
    validate_amount(qty)?;
    validate_amount(price)?;
    let cost = qty.checked_mul(price).ok_or(LedgerError::ValueOverflow)?;
    if cost > state.wallet {
        return Err(LedgerError::InsufficientFunds {
            needed: cost,
            available: state.wallet,
        });
    }

    let (old_qty, old_avg) = match state.holding(asset) {
        Some(h) => (h.qty, h.avg_price),
        None => (0, 0),
    };
    let new_qty = old_qty.checked_add(qty).ok_or(LedgerError::ValueOverflow)?;
    let new_avg = blended_avg(old_avg, old_qty, cost, new_qty)?;

    state.wallet -= cost;
    match state.holding_mut(asset) {
        Some(h) => {
            h.qty = new_qty;
            h.avg_price = new_avg;
        }
        None => state.portfolio.push(Holding {
            asset_id: asset.clone(),
            qty: new_qty,
            avg_price: new_avg,
        }),
    }
    state.challenges.trade_today = true;
    progression::add_xp(state, XpRewards::TRADE, "executing a buy trade");
    info!(%asset, qty, price, cost, wallet = state.wallet, "buy executed");
    Ok(())
}

/// Sell `qty` units of `asset` at `price` per unit.
///
/// Fails when no holding exists or the held quantity is short (no
/// short-selling). A partial sell leaves `avg_price` unchanged; a full close
/// removes the holding entirely.
pub fn sell(
    state: &mut PlayerState,
    asset: &AssetId,
    qty: u64,
    price: u64,
) -> Result<(), LedgerError> {
    validate_amount(qty)?;
    validate_amount(price)?;
    let held = state.holding(asset).map(|h| h.qty).unwrap_or(0);
    if held < qty {
        return Err(LedgerError::InsufficientQuantity {
            asset: asset.0.clone(),
            requested: qty,
            held,
        });
    }
    let proceeds = qty.checked_mul(price).ok_or(LedgerError::ValueOverflow)?;

    let remaining = held - qty;
    if remaining == 0 {
        state.remove_holding(asset);
    } else if let Some(h) = state.holding_mut(asset) {
        h.qty = remaining;
    }
    state.wallet = state.wallet.saturating_add(proceeds);
    state.challenges.trade_today = true;
    progression::add_xp(state, XpRewards::TRADE, "executing a sell trade");
    info!(%asset, qty, price, proceeds, wallet = state.wallet, "sell executed");
    Ok(())
}

/// Total market value of the portfolio at current quotes, falling back to a
/// position's cost basis when the asset is unquoted.
pub fn portfolio_value(state: &PlayerState, feed: &MarketFeed) -> u64 {
    state
        .portfolio
        .iter()
        .map(|h| h.qty.saturating_mul(feed.price(&h.asset_id).unwrap_or(h.avg_price)))
        .sum()
}
