//! Persisted game state and the rolling day history.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::ParlourConfig;
use crate::constants::{FIRST_DAY, SATISFACTION_DISPLAY_MAX};
use crate::inventory::InventoryLedger;
use crate::money::Money;

/// Immutable summary of one completed day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: u32,
    pub revenue: Money,
    /// Order cost plus the fixed operating cost.
    pub costs: Money,
    pub profit: Money,
    /// Percentage in 0..=100.
    pub fulfillment: f64,
    /// Raw score, unclamped.
    pub satisfaction: i32,
    pub price: Money,
}

impl DayRecord {
    #[must_use]
    pub fn satisfaction_display(&self) -> i32 {
        self.satisfaction.clamp(0, SATISFACTION_DISPLAY_MAX)
    }
}

/// Most recent day records, oldest first, capped at a fixed window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    records: VecDeque<DayRecord>,
    #[serde(skip, default = "History::default_window")]
    window: usize,
}

impl History {
    const fn default_window() -> usize {
        crate::constants::HISTORY_WINDOW
    }

    #[must_use]
    pub fn with_window(window: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(window + 1),
            window: window.max(1),
        }
    }

    /// Append a record, evicting the oldest when over the window.
    /// Returns the evicted record, if any.
    pub fn push(&mut self, record: DayRecord) -> Option<DayRecord> {
        self.records.push_back(record);
        if self.records.len() > self.window {
            self.records.pop_front()
        } else {
            None
        }
    }

    #[must_use]
    pub fn latest(&self) -> Option<&DayRecord> {
        self.records.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Re-apply a window after deserialization, trimming the oldest records.
    pub fn set_window(&mut self, window: usize) {
        self.window = window.max(1);
        while self.records.len() > self.window {
            self.records.pop_front();
        }
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<DayRecord> {
        self.records.iter().cloned().collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_window(Self::default_window())
    }
}

/// Player preferences carried in the save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "Settings::default_audio")]
    pub audio: bool,
    #[serde(default)]
    pub reduced_motion: bool,
    #[serde(default)]
    pub tutorial_dismissed: bool,
}

impl Settings {
    const fn default_audio() -> bool {
        true
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio: Self::default_audio(),
            reduced_motion: false,
            tutorial_dismissed: false,
        }
    }
}

/// Everything that survives between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub day: u32,
    pub cash: Money,
    pub price: Money,
    #[serde(default)]
    pub inventory: InventoryLedger,
    #[serde(default)]
    pub last_order_cost: Money,
    #[serde(default)]
    pub history: History,
    #[serde(default)]
    pub settings: Settings,
    /// Root of every per-day RNG stream.
    #[serde(default)]
    pub seed: u64,
}

impl GameState {
    /// Fresh save using the configured starting values.
    #[must_use]
    pub fn new(cfg: &ParlourConfig, seed: u64) -> Self {
        Self {
            day: FIRST_DAY,
            cash: cfg.starting_cash,
            price: cfg.starting_price,
            inventory: InventoryLedger::new(),
            last_order_cost: Money::ZERO,
            history: History::with_window(cfg.history_window),
            settings: Settings::default(),
            seed,
        }
    }

    /// Repair a restored snapshot so it satisfies the current config.
    #[must_use]
    pub fn sanitized(mut self, cfg: &ParlourConfig) -> Self {
        self.day = self.day.max(FIRST_DAY);
        self.price = self.price.clamp(cfg.price_min, cfg.price_max);
        self.history.set_window(cfg.history_window);
        self
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(&ParlourConfig::default(), 0)
    }
}
