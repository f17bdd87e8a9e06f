//! Seeded demo price feed.
//!
//! Prices drift a bounded fraction around each asset's base on every refresh.
//! The RNG is seeded so a given seed always produces the same price series.

use fin_core::AssetId;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::debug;

/// Maximum fractional move per refresh, both directions.
const DRIFT_FRAC: f64 = 0.15;
/// Prices never fall below this floor.
const PRICE_FLOOR: u64 = 10;

/// A listed demo asset.
#[derive(Clone, Debug)]
pub struct MarketAsset {
    pub id: AssetId,
    pub name: &'static str,
    pub base: u64,
}

/// The three demo assets every device starts with.
pub fn demo_assets() -> Vec<MarketAsset> {
    vec![
        MarketAsset {
            id: AssetId::new("FNT"),
            name: "FinTech Nova Token",
            base: 120,
        },
        MarketAsset {
            id: AssetId::new("EDU"),
            name: "EduVerse Learn Coin",
            base: 80,
        },
        MarketAsset {
            id: AssetId::new("GRW"),
            name: "Growth Guild Stock",
            base: 150,
        },
    ]
}

/// Current quote for one asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quote {
    pub id: AssetId,
    pub name: &'static str,
    pub price: u64,
}

/// Deterministic price feed over the demo asset list.
pub struct MarketFeed {
    assets: Vec<MarketAsset>,
    prices: BTreeMap<AssetId, u64>,
    rng: ChaCha8Rng,
}

impl MarketFeed {
    /// Build a feed and roll an initial set of prices.
    pub fn new(seed: u64) -> Self {
        let mut feed = Self {
            assets: demo_assets(),
            prices: BTreeMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        feed.refresh();
        feed
    }

    /// Re-roll every price with a uniform drift in [-15%, +15%] of base,
    /// floored at the minimum price.
    pub fn refresh(&mut self) {
        for a in &self.assets {
            let drift: f64 = self.rng.gen_range(-DRIFT_FRAC..=DRIFT_FRAC);
            let price = ((a.base as f64) * (1.0 + drift)).round().max(PRICE_FLOOR as f64) as u64;
            self.prices.insert(a.id.clone(), price);
        }
        debug!(prices = ?self.prices, "market prices rolled");
    }

    /// Current price for an asset, if it is listed.
    pub fn price(&self, asset: &AssetId) -> Option<u64> {
        self.prices.get(asset).copied()
    }

    /// All current quotes in listing order.
    pub fn quotes(&self) -> Vec<Quote> {
        self.assets
            .iter()
            .map(|a| Quote {
                id: a.id.clone(),
                name: a.name,
                price: self.prices.get(&a.id).copied().unwrap_or(a.base),
            })
            .collect()
    }
}
