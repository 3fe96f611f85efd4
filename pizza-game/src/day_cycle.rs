//! Day state machine: Prep → Pricing → Service → Summary → Prep(day + 1).
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::ParlourConfig;
use crate::constants::{STREAM_ARRIVALS, STREAM_TIPS};
use crate::economy::{DemandMood, EconomyModel};
use crate::ingredient::{Ingredient, IngredientCounts};
use crate::inventory::InventoryError;
use crate::money::Money;
use crate::rng::CountingRng;
use crate::service::{
    AdvanceReport, ServeOutcome, ServiceError, ServiceSession, ServiceTally, SpawnOutcome,
    TickOutcome,
};
use crate::state::{DayRecord, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Prep,
    Pricing,
    Service,
    Summary,
}

impl PhaseKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prep => "prep",
            Self::Pricing => "pricing",
            Self::Service => "service",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("cannot {intent} during {phase}")]
    WrongPhase {
        intent: &'static str,
        phase: PhaseKind,
    },
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Coaching line shown on the summary screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryTip {
    LowerPrice,
    HappyCustomers,
    AvoidStockouts,
    ProfitFormula,
}

impl SummaryTip {
    pub const ALL: [Self; 4] = [
        Self::LowerPrice,
        Self::HappyCustomers,
        Self::AvoidStockouts,
        Self::ProfitFormula,
    ];

    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::LowerPrice => "Try lowering price a little to attract more customers!",
            Self::HappyCustomers => "Great job keeping customers happy!",
            Self::AvoidStockouts => "Order enough ingredients to avoid stockouts.",
            Self::ProfitFormula => "Profit = Revenue - Costs.",
        }
    }
}

/// Everything the summary screen shows for a settled day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub record: DayRecord,
    pub served: u32,
    pub missed: u32,
    pub usage: IngredientCounts,
    /// Cost of the ingredients that actually went into pizzas.
    pub used_cost: Money,
    /// Customers still queued when the shop closed.
    pub abandoned: u32,
    pub tip: SummaryTip,
}

/// Price preview for the pricing screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: Money,
    pub demand: u32,
    pub mood: DemandMood,
}

#[derive(Debug, Clone)]
pub enum Phase {
    Prep,
    Pricing,
    Service(ServiceSession),
    Summary(DaySummary),
}

impl Phase {
    #[must_use]
    pub const fn kind(&self) -> PhaseKind {
        match self {
            Self::Prep => PhaseKind::Prep,
            Self::Pricing => PhaseKind::Pricing,
            Self::Service(_) => PhaseKind::Service,
            Self::Summary(_) => PhaseKind::Summary,
        }
    }
}

/// Owns the persisted state and the current phase; the only mutator of both.
#[derive(Debug, Clone)]
pub struct DayCycle {
    cfg: ParlourConfig,
    state: GameState,
    phase: Phase,
}

impl DayCycle {
    /// Resume from `state`, always at the start of a Prep phase.
    #[must_use]
    pub fn new(cfg: ParlourConfig, state: GameState) -> Self {
        let state = state.sanitized(&cfg);
        Self {
            cfg,
            state,
            phase: Phase::Prep,
        }
    }

    /// First run with default starting values.
    #[must_use]
    pub fn fresh(cfg: ParlourConfig, seed: u64) -> Self {
        let state = GameState::new(&cfg, seed);
        Self::new(cfg, state)
    }

    #[must_use]
    pub const fn config(&self) -> &ParlourConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub const fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    #[must_use]
    pub const fn economy(&self) -> EconomyModel<'_> {
        EconomyModel::new(&self.cfg)
    }

    #[must_use]
    pub const fn session(&self) -> Option<&ServiceSession> {
        match &self.phase {
            Phase::Service(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub const fn summary(&self) -> Option<&DaySummary> {
        match &self.phase {
            Phase::Summary(summary) => Some(summary),
            _ => None,
        }
    }

    /// Buy ingredients and move on to pricing.
    ///
    /// # Errors
    ///
    /// `WrongPhase` outside Prep; `Inventory(InsufficientCash)` when the order
    /// costs more than the cash on hand. Nothing changes on error.
    pub fn place_order(&mut self, quantities: &IngredientCounts) -> Result<Money, IntentError> {
        self.expect_phase("place an order", PhaseKind::Prep)?;
        let economy = EconomyModel::new(&self.cfg);
        let spent = self
            .state
            .inventory
            .order(quantities, &mut self.state.cash, &economy)?;
        self.state.last_order_cost = spent;
        self.phase = Phase::Pricing;
        info!(
            "day {}: ordered for {spent}, cash now {}",
            self.state.day, self.state.cash
        );
        Ok(spent)
    }

    /// Choose a price, clamped into the allowed band.
    ///
    /// # Errors
    ///
    /// `WrongPhase` outside Pricing.
    pub fn set_price(&mut self, price: Money) -> Result<PriceQuote, IntentError> {
        self.expect_phase("set the price", PhaseKind::Pricing)?;
        self.state.price = self.economy().clamp_price(price);
        Ok(self.demand_preview())
    }

    /// Demand and mood at the currently chosen price.
    #[must_use]
    pub fn demand_preview(&self) -> PriceQuote {
        let economy = self.economy();
        let price = economy.clamp_price(self.state.price);
        let demand = economy.demand(price);
        PriceQuote {
            price,
            demand,
            mood: economy.demand_mood(demand),
        }
    }

    /// Lock the price and start the timed service phase. Returns expected arrivals.
    ///
    /// # Errors
    ///
    /// `WrongPhase` outside Pricing.
    pub fn open_shop(&mut self) -> Result<u32, IntentError> {
        self.expect_phase("open the shop", PhaseKind::Pricing)?;
        let quote = self.demand_preview();
        self.state.price = quote.price;
        let rng = CountingRng::for_day(self.state.seed, STREAM_ARRIVALS, self.state.day);
        let session = ServiceSession::open(&self.cfg.service, quote.price, quote.demand, rng);
        self.phase = Phase::Service(session);
        info!(
            "day {}: shop open at {} expecting {} customers",
            self.state.day, quote.price, quote.demand
        );
        Ok(quote.demand)
    }

    /// Stage one ingredient on the pizza being assembled.
    ///
    /// # Errors
    ///
    /// `WrongPhase` outside Service.
    pub fn stage_topping(&mut self, ingredient: Ingredient) -> Result<u32, IntentError> {
        Ok(self.session_mut("stage an ingredient")?.stage(ingredient)?)
    }

    /// Discard the pizza being assembled.
    ///
    /// # Errors
    ///
    /// `WrongPhase` outside Service.
    pub fn clear_assembly(&mut self) -> Result<(), IntentError> {
        self.session_mut("clear the pizza")?.clear_assembly();
        Ok(())
    }

    /// Serve the head-of-queue customer.
    ///
    /// # Errors
    ///
    /// `WrongPhase` outside Service, otherwise the session's `ServiceError`.
    pub fn serve(&mut self) -> Result<ServeOutcome, IntentError> {
        let Phase::Service(session) = &mut self.phase else {
            return Err(self.wrong_phase("serve"));
        };
        Ok(session.serve(&mut self.state.inventory)?)
    }

    /// One second of service time. Settles the day when the session ends.
    ///
    /// # Errors
    ///
    /// `WrongPhase` outside Service.
    pub fn tick(&mut self) -> Result<TickOutcome, IntentError> {
        let outcome = self.session_mut("tick")?.tick();
        if let TickOutcome::Ended(tally) = &outcome {
            self.settle(tally);
        }
        Ok(outcome)
    }

    /// Spawner firing for hosts running their own arrival timer.
    ///
    /// # Errors
    ///
    /// `WrongPhase` outside Service.
    pub fn maybe_spawn_arrival(&mut self) -> Result<SpawnOutcome, IntentError> {
        Ok(self.session_mut("spawn a customer")?.maybe_spawn_arrival())
    }

    /// Drive both service timers forward by `dt` seconds.
    ///
    /// # Errors
    ///
    /// `WrongPhase` outside Service.
    pub fn advance(&mut self, dt: f64) -> Result<AdvanceReport, IntentError> {
        let report = self.session_mut("advance the clock")?.advance(dt);
        if let Some(tally) = &report.ended {
            self.settle(tally);
        }
        Ok(report)
    }

    /// Start the next day. Inventory and cash carry over.
    ///
    /// # Errors
    ///
    /// `WrongPhase` outside Summary.
    pub fn advance_day(&mut self) -> Result<u32, IntentError> {
        self.expect_phase("start the next day", PhaseKind::Summary)?;
        self.state.day = self.state.day.saturating_add(1);
        self.phase = Phase::Prep;
        debug!("advanced to day {}", self.state.day);
        Ok(self.state.day)
    }

    pub fn dismiss_tutorial(&mut self) {
        self.state.settings.tutorial_dismissed = true;
    }

    pub fn set_audio(&mut self, enabled: bool) {
        self.state.settings.audio = enabled;
    }

    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.state.settings.reduced_motion = enabled;
    }

    // Order cost was debited at order time, so only revenue minus the fixed
    // cost flows back into cash here; `costs` is a reporting figure.
    fn settle(&mut self, tally: &ServiceTally) {
        let economy = EconomyModel::new(&self.cfg);
        let fixed = economy.fixed_cost();
        let costs = self.state.last_order_cost + fixed;
        let profit = tally.revenue - costs;
        self.state.cash += tally.revenue - fixed;

        let record = DayRecord {
            day: self.state.day,
            revenue: tally.revenue,
            costs,
            profit,
            fulfillment: tally.fulfillment_pct(),
            satisfaction: tally.satisfaction,
            price: tally.price,
        };
        if let Some(evicted) = self.state.history.push(record.clone()) {
            debug!("history window full; dropped day {}", evicted.day);
        }

        let mut tip_rng = CountingRng::for_day(self.state.seed, STREAM_TIPS, self.state.day);
        let tip = SummaryTip::ALL[tip_rng.gen_range(0..SummaryTip::ALL.len())];
        info!(
            "day {} settled: revenue {} costs {} profit {} fulfillment {:.0}% cash {}",
            record.day,
            record.revenue,
            record.costs,
            record.profit,
            record.fulfillment,
            self.state.cash
        );
        self.phase = Phase::Summary(DaySummary {
            record,
            served: tally.served,
            missed: tally.missed,
            usage: tally.usage,
            used_cost: economy.usage_cost(&tally.usage),
            abandoned: tally.abandoned,
            tip,
        });
    }

    fn session_mut(&mut self, intent: &'static str) -> Result<&mut ServiceSession, IntentError> {
        let phase = self.phase.kind();
        match &mut self.phase {
            Phase::Service(session) => Ok(session),
            _ => Err(IntentError::WrongPhase { intent, phase }),
        }
    }

    fn expect_phase(&self, intent: &'static str, expected: PhaseKind) -> Result<(), IntentError> {
        if self.phase.kind() == expected {
            Ok(())
        } else {
            Err(self.wrong_phase(intent))
        }
    }

    const fn wrong_phase(&self, intent: &'static str) -> IntentError {
        IntentError::WrongPhase {
            intent,
            phase: self.phase.kind(),
        }
    }
}
