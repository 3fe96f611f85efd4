//! Centralized balance and tuning constants for the Pizza Parlour engine.
//!
//! `ParlourConfig::default()` is built from these values, so the shipped
//! balance only changes through reviewed code rather than loose assets.

// Storage ------------------------------------------------------------------
pub const STORAGE_KEY: &str = "pp-state";

// Day cycle ----------------------------------------------------------------
pub(crate) const DAY_LENGTH_SECS: u32 = 120;
pub(crate) const FIXED_COST_CENTS: i64 = 2_000;
pub(crate) const STARTING_CASH_CENTS: i64 = 10_000;
pub(crate) const STARTING_PRICE_CENTS: i64 = 800;
pub(crate) const HISTORY_WINDOW: usize = 5;
pub(crate) const FIRST_DAY: u32 = 1;

// Unit costs (cents) -------------------------------------------------------
pub(crate) const DOUGH_COST_CENTS: i64 = 100;
pub(crate) const SAUCE_COST_CENTS: i64 = 50;
pub(crate) const CHEESE_COST_CENTS: i64 = 80;
pub(crate) const TOPPING_COST_CENTS: i64 = 40;

// Demand model -------------------------------------------------------------
pub(crate) const DEMAND_BASE: u32 = 30;
pub(crate) const DEMAND_ELASTICITY: f64 = 0.08;
pub(crate) const DISCOUNT_BONUS_FACTOR: f64 = 0.5;
pub(crate) const PRICE_REF_CENTS: i64 = 800;
pub(crate) const PRICE_MIN_CENTS: i64 = 400;
pub(crate) const PRICE_MAX_CENTS: i64 = 1_200;
pub(crate) const DEMAND_STEADY_RATIO: f64 = 0.6;

// Service loop -------------------------------------------------------------
pub(crate) const TICK_SECS: f64 = 1.0;
pub(crate) const QUEUE_CAP: usize = 5;
pub(crate) const MAX_TOPPINGS: usize = 2;
pub(crate) const PATIENCE_WARN_SECS: f64 = 6.0;
pub(crate) const PATIENCE_TIMEOUT_SECS: f64 = 10.0;
pub(crate) const STARTING_SATISFACTION: i32 = 100;
pub(crate) const SATISFACTION_DISPLAY_MAX: i32 = 100;
pub(crate) const PENALTY_WALKOUT: i32 = 10;
pub(crate) const PENALTY_STOCKOUT: i32 = 10;
pub(crate) const PENALTY_IMPATIENT_TICK: i32 = 1;
pub(crate) const BONUS_PERFECT_MATCH: i32 = 5;

// RNG stream tags ----------------------------------------------------------
pub(crate) const STREAM_ARRIVALS: &[u8] = b"arrivals";
pub(crate) const STREAM_TIPS: &[u8] = b"tips";
