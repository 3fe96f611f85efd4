//! Pizza Parlour Game Engine
//!
//! Platform-agnostic day-cycle simulation for a small pizza shop: buy
//! ingredients, set a price, serve a timed queue of customers, and review the
//! day's profit. Presentation layers render `ParlourView` snapshots and forward
//! intents; this crate has no UI or platform dependencies.

pub mod config;
pub mod constants;
pub mod customer;
pub mod day_cycle;
pub mod economy;
pub mod export;
pub mod ingredient;
pub mod inventory;
pub mod money;
pub mod numbers;
pub mod rng;
pub mod scheduler;
pub mod service;
pub mod snapshot;
pub mod state;
pub mod storage;

use log::{debug, warn};
use thiserror::Error;

// Re-export commonly used types
pub use config::{ConfigError, DemandConfig, ParlourConfig, ServiceConfig, UnitCosts};
pub use constants::STORAGE_KEY;
pub use customer::{Customer, CustomerId, Patience, PatienceBucket, ToppingOrder};
pub use day_cycle::{DayCycle, DaySummary, IntentError, Phase, PhaseKind, PriceQuote, SummaryTip};
pub use economy::{DemandMood, EconomyModel};
pub use export::{ExportedDay, export_history};
pub use ingredient::{Ingredient, IngredientCounts, UnknownIngredient};
pub use inventory::{InventoryError, InventoryLedger};
pub use money::Money;
pub use rng::{CountingRng, derive_stream_seed};
pub use scheduler::{ClockEvent, ServiceClock};
pub use service::{
    AdvanceReport, ServeOutcome, ServiceError, ServiceSession, ServiceTally, SessionState,
    SpawnOutcome, TickOutcome,
};
pub use snapshot::{CustomerView, ParlourView};
pub use state::{DayRecord, GameState, History, Settings};
pub use storage::{FileStorage, GameStorage, MemoryStorage, StorageError};

/// Failure of a persisted intent: either the intent itself or the checkpoint save.
#[derive(Debug, Error)]
pub enum ParlourError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    Intent(#[from] IntentError),
    #[error("failed to persist game state: {0}")]
    Storage(#[source] E),
}

/// Main engine facade: a day cycle bound to a storage backend that is written
/// at every checkpoint.
pub struct Parlour<S>
where
    S: GameStorage,
{
    cycle: DayCycle,
    storage: S,
    key: String,
}

impl<S> Parlour<S>
where
    S: GameStorage,
{
    /// Resume the save under `pp-state`, or start fresh with `seed` when there
    /// is none. A save that cannot be decoded is discarded.
    pub fn open(cfg: ParlourConfig, storage: S, seed: u64) -> Self {
        Self::open_with_key(cfg, storage, seed, STORAGE_KEY)
    }

    /// Same as [`Parlour::open`] with a custom storage key.
    pub fn open_with_key(cfg: ParlourConfig, storage: S, seed: u64, key: &str) -> Self {
        let cycle = match storage.load_state(key) {
            Ok(Some(state)) => {
                debug!("resuming day {} from '{key}'", state.day);
                DayCycle::new(cfg, state)
            }
            Ok(None) => DayCycle::fresh(cfg, seed),
            Err(err) => {
                warn!("discarding unreadable save '{key}': {err}");
                DayCycle::fresh(cfg, seed)
            }
        };
        Self {
            cycle,
            storage,
            key: key.to_string(),
        }
    }

    #[must_use]
    pub const fn cycle(&self) -> &DayCycle {
        &self.cycle
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        self.cycle.state()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub fn snapshot(&self) -> ParlourView {
        self.cycle.snapshot()
    }

    #[must_use]
    pub fn demand_preview(&self) -> PriceQuote {
        self.cycle.demand_preview()
    }

    /// Persist the current state under this parlour's key.
    ///
    /// # Errors
    ///
    /// Returns `ParlourError::Storage` if the backend write fails.
    pub fn save(&self) -> Result<(), ParlourError<S::Error>> {
        self.storage
            .save_state(&self.key, self.cycle.state())
            .map_err(ParlourError::Storage)
    }

    /// # Errors
    ///
    /// Intent or checkpoint failure.
    pub fn place_order(
        &mut self,
        quantities: &IngredientCounts,
    ) -> Result<Money, ParlourError<S::Error>> {
        let spent = self.cycle.place_order(quantities)?;
        self.save()?;
        Ok(spent)
    }

    /// # Errors
    ///
    /// `WrongPhase` outside Pricing.
    pub fn set_price(&mut self, price: Money) -> Result<PriceQuote, ParlourError<S::Error>> {
        Ok(self.cycle.set_price(price)?)
    }

    /// # Errors
    ///
    /// Intent or checkpoint failure.
    pub fn open_shop(&mut self) -> Result<u32, ParlourError<S::Error>> {
        let arrivals = self.cycle.open_shop()?;
        self.save()?;
        Ok(arrivals)
    }

    /// # Errors
    ///
    /// `WrongPhase` outside Service.
    pub fn stage_topping(&mut self, ingredient: Ingredient) -> Result<u32, ParlourError<S::Error>> {
        Ok(self.cycle.stage_topping(ingredient)?)
    }

    /// # Errors
    ///
    /// `WrongPhase` outside Service.
    pub fn clear_assembly(&mut self) -> Result<(), ParlourError<S::Error>> {
        Ok(self.cycle.clear_assembly()?)
    }

    /// # Errors
    ///
    /// `WrongPhase` or the session's serve rejection.
    pub fn serve(&mut self) -> Result<ServeOutcome, ParlourError<S::Error>> {
        Ok(self.cycle.serve()?)
    }

    /// # Errors
    ///
    /// Intent failure, or the checkpoint save when the tick closes the day.
    pub fn tick(&mut self) -> Result<TickOutcome, ParlourError<S::Error>> {
        let outcome = self.cycle.tick()?;
        if matches!(outcome, TickOutcome::Ended(_)) {
            self.save()?;
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// `WrongPhase` outside Service.
    pub fn maybe_spawn_arrival(&mut self) -> Result<SpawnOutcome, ParlourError<S::Error>> {
        Ok(self.cycle.maybe_spawn_arrival()?)
    }

    /// # Errors
    ///
    /// Intent failure, or the checkpoint save when the day closes.
    pub fn advance(&mut self, dt: f64) -> Result<AdvanceReport, ParlourError<S::Error>> {
        let report = self.cycle.advance(dt)?;
        if report.ended.is_some() {
            self.save()?;
        }
        Ok(report)
    }

    /// # Errors
    ///
    /// Intent or checkpoint failure.
    pub fn advance_day(&mut self) -> Result<u32, ParlourError<S::Error>> {
        let day = self.cycle.advance_day()?;
        self.save()?;
        Ok(day)
    }

    /// # Errors
    ///
    /// Returns `ParlourError::Storage` if the checkpoint save fails.
    pub fn dismiss_tutorial(&mut self) -> Result<(), ParlourError<S::Error>> {
        self.cycle.dismiss_tutorial();
        self.save()
    }

    pub fn set_audio(&mut self, enabled: bool) {
        self.cycle.set_audio(enabled);
    }

    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.cycle.set_reduced_motion(enabled);
    }

    /// # Errors
    ///
    /// Returns `serde_json::Error` if the history cannot be serialized.
    pub fn export_history(&self) -> Result<String, serde_json::Error> {
        export_history(&self.cycle.state().history)
    }

    #[must_use]
    pub fn into_parts(self) -> (DayCycle, S) {
        (self.cycle, self.storage)
    }
}
