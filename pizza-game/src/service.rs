//! The timed service phase: customer queue, patience decay, and pizza serving.
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::VecDeque;
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::constants::{
    BONUS_PERFECT_MATCH, PENALTY_IMPATIENT_TICK, PENALTY_STOCKOUT, PENALTY_WALKOUT,
    SATISFACTION_DISPLAY_MAX, STARTING_SATISFACTION,
};
use crate::customer::{Customer, CustomerId, Patience};
use crate::ingredient::{Ingredient, IngredientCounts};
use crate::inventory::{InventoryError, InventoryLedger};
use crate::money::Money;
use crate::rng::CountingRng;
use crate::scheduler::{ClockEvent, ServiceClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Running,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("the shop is closed for the day")]
    NotRunning,
    #[error("no customer is waiting")]
    NoCustomer,
    #[error("pizza needs dough, sauce and cheese (missing {missing})")]
    IncompleteAssembly { missing: Ingredient },
    #[error("out of {ingredient}; customer {customer} left unhappy")]
    OutOfStock {
        customer: CustomerId,
        ingredient: Ingredient,
    },
}

/// Final figures handed to the day cycle when the session ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTally {
    pub price: Money,
    pub revenue: Money,
    pub served: u32,
    pub missed: u32,
    /// Raw score; may leave the 0..=100 display range.
    pub satisfaction: i32,
    pub usage: IngredientCounts,
    pub arrival_total: u32,
    pub spawned: u32,
    /// Spawn attempts refused because the queue was full.
    pub dropped: u32,
    /// Customers still waiting at closing time.
    pub abandoned: u32,
}

impl ServiceTally {
    /// served / (served + missed) as a percentage, 100 when nobody arrived.
    #[must_use]
    pub fn fulfillment_pct(&self) -> f64 {
        let attempts = self.served + self.missed;
        if attempts == 0 {
            return 100.0;
        }
        f64::from(self.served) / f64::from(attempts) * 100.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Running {
        walkouts: SmallVec<[CustomerId; 4]>,
        impatient: u32,
    },
    Ended(ServiceTally),
    /// The session had already ended; nothing happened.
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Admitted(CustomerId),
    /// Queue at capacity; the customer never materializes.
    Dropped,
    /// No arrivals expected today.
    Disabled,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServeOutcome {
    pub customer: CustomerId,
    pub charged: Money,
    pub perfect_match: bool,
}

/// Aggregate of everything that fired during `ServiceSession::advance`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvanceReport {
    pub ticks: u32,
    pub admitted: SmallVec<[CustomerId; 4]>,
    pub dropped: u32,
    pub walkouts: SmallVec<[CustomerId; 4]>,
    pub ended: Option<ServiceTally>,
}

#[derive(Debug, Clone)]
pub struct ServiceSession {
    state: SessionState,
    clock: ServiceClock,
    time_remaining: i32,
    price: Money,
    arrival_total: u32,
    revenue: Money,
    served: u32,
    missed: u32,
    spawned: u32,
    dropped: u32,
    satisfaction: i32,
    usage: IngredientCounts,
    queue: VecDeque<Customer>,
    assembly: IngredientCounts,
    next_customer_id: u32,
    patience: Patience,
    queue_cap: usize,
    rng: CountingRng<SmallRng>,
}

impl ServiceSession {
    /// Open the shop at a locked `price` expecting `arrival_total` customers.
    #[must_use]
    pub fn open(
        cfg: &ServiceConfig,
        price: Money,
        arrival_total: u32,
        rng: CountingRng<SmallRng>,
    ) -> Self {
        let time_remaining = i32::try_from(cfg.day_length_secs).unwrap_or(i32::MAX);
        debug!(
            "service open: price {price}, expecting {arrival_total} over {}s",
            cfg.day_length_secs
        );
        Self {
            state: SessionState::Running,
            clock: ServiceClock::new(cfg.day_length_secs, arrival_total),
            time_remaining,
            price,
            arrival_total,
            revenue: Money::ZERO,
            served: 0,
            missed: 0,
            spawned: 0,
            dropped: 0,
            satisfaction: STARTING_SATISFACTION,
            usage: IngredientCounts::new(),
            queue: VecDeque::new(),
            assembly: IngredientCounts::new(),
            next_customer_id: 1,
            patience: Patience {
                warn_secs: cfg.patience_warn_secs,
                timeout_secs: cfg.patience_timeout_secs,
            },
            queue_cap: cfg.queue_cap,
            rng,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, SessionState::Running)
    }

    #[must_use]
    pub const fn time_remaining(&self) -> i32 {
        self.time_remaining
    }

    #[must_use]
    pub const fn now(&self) -> f64 {
        self.clock.now()
    }

    #[must_use]
    pub const fn price(&self) -> Money {
        self.price
    }

    #[must_use]
    pub const fn arrival_total(&self) -> u32 {
        self.arrival_total
    }

    #[must_use]
    pub const fn revenue(&self) -> Money {
        self.revenue
    }

    #[must_use]
    pub const fn served(&self) -> u32 {
        self.served
    }

    #[must_use]
    pub const fn missed(&self) -> u32 {
        self.missed
    }

    #[must_use]
    pub const fn satisfaction(&self) -> i32 {
        self.satisfaction
    }

    /// Satisfaction clamped into the displayed 0..=100 band.
    #[must_use]
    pub fn satisfaction_display(&self) -> i32 {
        self.satisfaction.clamp(0, SATISFACTION_DISPLAY_MAX)
    }

    #[must_use]
    pub const fn usage(&self) -> &IngredientCounts {
        &self.usage
    }

    #[must_use]
    pub const fn assembly(&self) -> &IngredientCounts {
        &self.assembly
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.queue.iter()
    }

    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn head(&self) -> Option<&Customer> {
        self.queue.front()
    }

    /// Draws taken from today's arrival stream so far.
    #[must_use]
    pub const fn rng_draws(&self) -> u64 {
        self.rng.draws()
    }

    /// Stage one unit of `ingredient` on the pizza being built.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotRunning` once the session has ended.
    pub fn stage(&mut self, ingredient: Ingredient) -> Result<u32, ServiceError> {
        self.ensure_running()?;
        self.assembly.add(ingredient, 1);
        Ok(self.assembly.get(ingredient))
    }

    /// Throw away the pizza being built.
    pub fn clear_assembly(&mut self) {
        self.assembly.clear();
    }

    /// Serve the head-of-queue customer from the staged pizza.
    ///
    /// # Errors
    ///
    /// * `NotRunning` / `NoCustomer` / `IncompleteAssembly` leave everything untouched.
    /// * `OutOfStock` means the customer was turned away: satisfaction and the
    ///   missed count already carry the penalty and the staged pizza is discarded,
    ///   but no stock was deducted.
    pub fn serve(&mut self, inventory: &mut InventoryLedger) -> Result<ServeOutcome, ServiceError> {
        self.ensure_running()?;
        let Some(customer) = self.queue.front() else {
            return Err(ServiceError::NoCustomer);
        };
        if let Some(missing) = Ingredient::BASE
            .into_iter()
            .find(|&ingredient| self.assembly.get(ingredient) < 1)
        {
            return Err(ServiceError::IncompleteAssembly { missing });
        }

        let customer_id = customer.id;
        let usage = customer.usage();
        let perfect_match = customer.matches(&self.assembly);
        let mut shortage = Ingredient::BASE
            .into_iter()
            .chain(customer.toppings.iter().copied())
            .find(|&ingredient| !inventory.has_any(ingredient));
        if shortage.is_none() {
            // Presence passed, but a doubled topping can still exceed stock.
            if let Err(InventoryError::OutOfStock { ingredient, .. }) = inventory.consume(&usage) {
                shortage = Some(ingredient);
            }
        }
        if let Some(ingredient) = shortage {
            warn!("stockout on {ingredient}: customer {customer_id} turned away");
            self.satisfaction -= PENALTY_STOCKOUT;
            self.missed += 1;
            self.queue.pop_front();
            self.assembly.clear();
            return Err(ServiceError::OutOfStock {
                customer: customer_id,
                ingredient,
            });
        }

        self.usage.absorb(&usage);
        self.revenue += self.price;
        self.served += 1;
        if perfect_match {
            self.satisfaction += BONUS_PERFECT_MATCH;
        }
        self.queue.pop_front();
        self.assembly.clear();
        debug!(
            "served {customer_id} at {} (perfect: {perfect_match})",
            self.price
        );
        Ok(ServeOutcome {
            customer: customer_id,
            charged: self.price,
            perfect_match,
        })
    }

    /// One session-second: count down, then run the patience pass.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Inactive;
        }
        self.clock.fire_tick();
        self.apply_tick()
    }

    /// Spawner firing: admit a generated customer if the queue has room.
    /// Each call uses up one scheduled arrival, so it can be mixed with `advance`.
    pub fn maybe_spawn_arrival(&mut self) -> SpawnOutcome {
        if !self.is_running() {
            return SpawnOutcome::Inactive;
        }
        if self.clock.spawn_interval().is_none() {
            return SpawnOutcome::Disabled;
        }
        self.clock.record_spawn();
        self.admit_generated()
    }

    /// Admit a customer with a known order at the current clock reading.
    /// Subject to the same queue cap as generated arrivals.
    pub fn spawn_with_order(&mut self, toppings: &[Ingredient]) -> SpawnOutcome {
        if !self.is_running() {
            return SpawnOutcome::Inactive;
        }
        if self.queue.len() >= self.queue_cap {
            self.dropped += 1;
            return SpawnOutcome::Dropped;
        }
        let id = self.allocate_id();
        let customer = Customer::new(id, self.clock.now(), toppings, self.patience);
        self.enqueue(customer)
    }

    /// Run both timers forward by `dt` seconds in chronological order.
    /// Stops firing the instant the session ends.
    pub fn advance(&mut self, dt: f64) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        if !self.is_running() || !dt.is_finite() || dt <= 0.0 {
            return report;
        }
        let until = self.clock.now() + dt;
        while let Some(event) = self.clock.next_due(until) {
            match event {
                ClockEvent::Tick => {
                    report.ticks += 1;
                    match self.apply_tick() {
                        TickOutcome::Running { walkouts, .. } => {
                            report.walkouts.extend(walkouts);
                        }
                        TickOutcome::Ended(tally) => {
                            report.ended = Some(tally);
                            return report;
                        }
                        TickOutcome::Inactive => return report,
                    }
                }
                ClockEvent::Spawn => match self.admit_generated() {
                    SpawnOutcome::Admitted(id) => report.admitted.push(id),
                    SpawnOutcome::Dropped => report.dropped += 1,
                    SpawnOutcome::Disabled | SpawnOutcome::Inactive => {}
                },
            }
        }
        self.clock.advance_to(until);
        report
    }

    fn apply_tick(&mut self) -> TickOutcome {
        self.time_remaining -= 1;
        if self.time_remaining < 0 {
            return TickOutcome::Ended(self.close());
        }

        let now = self.clock.now();
        let patience = self.patience;
        let mut walkouts = SmallVec::new();
        let mut impatient = 0;
        let mut penalty = 0;
        let mut missed = 0;
        self.queue.retain(|customer| {
            let wait = customer.wait(now);
            if wait > patience.timeout_secs {
                penalty += PENALTY_WALKOUT;
                missed += 1;
                walkouts.push(customer.id);
                false
            } else {
                if wait > patience.warn_secs {
                    penalty += PENALTY_IMPATIENT_TICK;
                    impatient += 1;
                }
                true
            }
        });
        self.satisfaction -= penalty;
        self.missed += missed;
        for id in &walkouts {
            debug!("customer {id} walked out after {:.1}s", patience.timeout_secs);
        }
        TickOutcome::Running {
            walkouts,
            impatient,
        }
    }

    fn admit_generated(&mut self) -> SpawnOutcome {
        if self.queue.len() >= self.queue_cap {
            self.dropped += 1;
            debug!("spawn dropped: queue full at {}", self.queue_cap);
            return SpawnOutcome::Dropped;
        }
        let id = self.allocate_id();
        let customer = Customer::generate(&mut self.rng, id, self.clock.now(), self.patience);
        self.enqueue(customer)
    }

    fn enqueue(&mut self, customer: Customer) -> SpawnOutcome {
        let id = customer.id;
        debug!(
            "customer {id} arrived at {:.2}s wanting {}",
            customer.arrived_at,
            customer.order_label()
        );
        self.spawned += 1;
        self.queue.push_back(customer);
        SpawnOutcome::Admitted(id)
    }

    const fn allocate_id(&mut self) -> CustomerId {
        let id = CustomerId(self.next_customer_id);
        self.next_customer_id = self.next_customer_id.saturating_add(1);
        id
    }

    fn close(&mut self) -> ServiceTally {
        self.state = SessionState::Ended;
        let abandoned = u32::try_from(self.queue.len()).unwrap_or(u32::MAX);
        self.assembly.clear();
        let tally = ServiceTally {
            price: self.price,
            revenue: self.revenue,
            served: self.served,
            missed: self.missed,
            satisfaction: self.satisfaction,
            usage: self.usage,
            arrival_total: self.arrival_total,
            spawned: self.spawned,
            dropped: self.dropped,
            abandoned,
        };
        info!(
            "service closed after {:.0}s: served {} missed {} revenue {}",
            self.clock.now(),
            tally.served,
            tally.missed,
            tally.revenue
        );
        tally
    }

    const fn ensure_running(&self) -> Result<(), ServiceError> {
        if self.is_running() {
            Ok(())
        } else {
            Err(ServiceError::NotRunning)
        }
    }

    #[cfg(test)]
    pub(crate) fn backdate_head(&mut self, secs: f64) {
        if let Some(head) = self.queue.front_mut() {
            head.arrived_at -= secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ServiceConfig {
        ServiceConfig::default()
    }

    fn session(arrivals: u32) -> ServiceSession {
        ServiceSession::open(&cfg(), Money::from_dollars(8), arrivals, CountingRng::new(5))
    }

    fn stocked(qty: u32) -> InventoryLedger {
        InventoryLedger::with_stock(IngredientCounts::uniform(qty))
    }

    fn stage_base(session: &mut ServiceSession) {
        for ingredient in Ingredient::BASE {
            session.stage(ingredient).unwrap();
        }
    }

    fn tick_n(session: &mut ServiceSession, n: u32) {
        for _ in 0..n {
            session.tick();
        }
    }

    #[test]
    fn plain_customer_served_from_stock() {
        let mut session = session(0);
        let mut inventory = stocked(2);
        session.spawn_with_order(&[]);
        stage_base(&mut session);

        let outcome = session.serve(&mut inventory).unwrap();
        assert_eq!(outcome.charged, Money::from_dollars(8));
        assert!(outcome.perfect_match);
        assert_eq!(inventory.count(Ingredient::Dough), 1);
        assert_eq!(inventory.count(Ingredient::Sauce), 1);
        assert_eq!(inventory.count(Ingredient::Cheese), 1);
        assert_eq!(inventory.count(Ingredient::Peppers), 2);
        assert_eq!(session.revenue(), Money::from_dollars(8));
        assert_eq!(session.served(), 1);
        assert_eq!(session.satisfaction(), 105);
        assert_eq!(session.queue_len(), 0);
        assert!(session.assembly().is_empty());
        assert_eq!(session.usage().get(Ingredient::Cheese), 1);
    }

    #[test]
    fn stockout_on_ordered_topping_penalizes_without_touching_stock() {
        let mut session = session(0);
        let mut inventory = stocked(3);
        inventory_set(&mut inventory, Ingredient::Pepperoni, 0);
        let before = inventory.clone();
        session.spawn_with_order(&[Ingredient::Pepperoni]);
        stage_base(&mut session);
        session.stage(Ingredient::Pepperoni).unwrap();

        let err = session.serve(&mut inventory).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::OutOfStock {
                ingredient: Ingredient::Pepperoni,
                ..
            }
        ));
        assert_eq!(session.satisfaction(), 90);
        assert_eq!(session.missed(), 1);
        assert_eq!(session.queue_len(), 0);
        assert!(session.assembly().is_empty());
        assert_eq!(inventory, before);
        assert_eq!(session.revenue(), Money::ZERO);
    }

    #[test]
    fn doubled_topping_beyond_stock_is_a_stockout() {
        let mut session = session(0);
        let mut inventory = stocked(3);
        inventory_set(&mut inventory, Ingredient::Mushrooms, 1);
        let before = inventory.clone();
        session.spawn_with_order(&[Ingredient::Mushrooms, Ingredient::Mushrooms]);
        stage_base(&mut session);

        let err = session.serve(&mut inventory).unwrap_err();
        assert!(matches!(err, ServiceError::OutOfStock { .. }));
        assert_eq!(inventory, before);
        assert_eq!(session.missed(), 1);
    }

    #[test]
    fn incomplete_assembly_is_a_pure_no_op() {
        let mut session = session(0);
        let mut inventory = stocked(3);
        session.spawn_with_order(&[]);
        session.stage(Ingredient::Dough).unwrap();
        session.stage(Ingredient::Cheese).unwrap();

        let err = session.serve(&mut inventory).unwrap_err();
        assert_eq!(
            err,
            ServiceError::IncompleteAssembly {
                missing: Ingredient::Sauce
            }
        );
        assert_eq!(session.satisfaction(), 100);
        assert_eq!(session.queue_len(), 1);
        assert_eq!(session.assembly().get(Ingredient::Dough), 1);
        assert_eq!(inventory, stocked(3));
    }

    #[test]
    fn serving_an_empty_queue_is_rejected() {
        let mut session = session(0);
        let mut inventory = stocked(3);
        stage_base(&mut session);
        assert_eq!(
            session.serve(&mut inventory),
            Err(ServiceError::NoCustomer)
        );
        assert_eq!(session.assembly().get(Ingredient::Sauce), 1);
    }

    #[test]
    fn missing_requested_topping_forfeits_bonus_only() {
        let mut session = session(0);
        let mut inventory = stocked(3);
        session.spawn_with_order(&[Ingredient::Peppers]);
        stage_base(&mut session);
        session.stage(Ingredient::Mushrooms).unwrap();

        let outcome = session.serve(&mut inventory).unwrap();
        assert!(!outcome.perfect_match);
        assert_eq!(session.satisfaction(), 100);
        // Usage follows the order, not the staged pizza.
        assert_eq!(inventory.count(Ingredient::Peppers), 2);
        assert_eq!(inventory.count(Ingredient::Mushrooms), 3);
    }

    #[test]
    fn extra_staged_toppings_keep_bonus_and_price() {
        let mut session = session(0);
        let mut inventory = stocked(3);
        session.spawn_with_order(&[Ingredient::Pepperoni]);
        stage_base(&mut session);
        session.stage(Ingredient::Pepperoni).unwrap();
        session.stage(Ingredient::Peppers).unwrap();
        session.stage(Ingredient::Peppers).unwrap();

        let outcome = session.serve(&mut inventory).unwrap();
        assert!(outcome.perfect_match);
        assert_eq!(outcome.charged, Money::from_dollars(8));
        assert_eq!(session.satisfaction(), 105);
    }

    #[test]
    fn patience_bands_apply_per_tick() {
        let mut session = session(0);
        session.spawn_with_order(&[]);

        tick_n(&mut session, 5);
        assert_eq!(session.satisfaction(), 100);
        tick_n(&mut session, 1);
        assert_eq!(session.satisfaction(), 100);

        tick_n(&mut session, 1);
        assert_eq!(session.satisfaction(), 99);
        assert_eq!(session.queue_len(), 1);

        tick_n(&mut session, 3);
        assert_eq!(session.satisfaction(), 96);
        assert_eq!(session.queue_len(), 1);

        match session.tick() {
            TickOutcome::Running { walkouts, .. } => assert_eq!(walkouts.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(session.satisfaction(), 86);
        assert_eq!(session.missed(), 1);
        assert_eq!(session.queue_len(), 0);
    }

    #[test]
    fn backdated_wait_of_eleven_seconds_walks_out_on_next_tick() {
        let mut session = session(0);
        session.spawn_with_order(&[]);
        session.backdate_head(10.0);
        session.tick();
        assert_eq!(session.satisfaction(), 90);
        assert_eq!(session.missed(), 1);
    }

    #[test]
    fn session_ends_when_time_runs_out_and_then_goes_inert() {
        let mut session = ServiceSession::open(
            &ServiceConfig {
                day_length_secs: 3,
                ..cfg()
            },
            Money::from_dollars(8),
            3,
            CountingRng::new(1),
        );
        tick_n(&mut session, 3);
        assert!(session.is_running());
        assert_eq!(session.time_remaining(), 0);

        let TickOutcome::Ended(tally) = session.tick() else {
            panic!("session should end on the fourth tick");
        };
        assert_eq!(tally.arrival_total, 3);
        assert!(!session.is_running());

        let satisfaction = session.satisfaction();
        assert_eq!(session.tick(), TickOutcome::Inactive);
        assert_eq!(session.maybe_spawn_arrival(), SpawnOutcome::Inactive);
        assert_eq!(session.advance(30.0), AdvanceReport::default());
        assert_eq!(session.stage(Ingredient::Dough), Err(ServiceError::NotRunning));
        assert_eq!(session.satisfaction(), satisfaction);
        assert_eq!(session.queue_len(), tally.abandoned as usize);
    }

    #[test]
    fn full_queue_drops_spawns_silently() {
        let mut session = session(30);
        for _ in 0..5 {
            assert!(matches!(
                session.maybe_spawn_arrival(),
                SpawnOutcome::Admitted(_)
            ));
        }
        assert_eq!(session.maybe_spawn_arrival(), SpawnOutcome::Dropped);
        assert_eq!(session.spawn_with_order(&[]), SpawnOutcome::Dropped);
        assert_eq!(session.queue_len(), 5);
        assert_eq!(session.missed(), 0);
    }

    #[test]
    fn zero_demand_disables_spawning_and_keeps_full_fulfillment() {
        let mut session = session(0);
        assert_eq!(session.maybe_spawn_arrival(), SpawnOutcome::Disabled);
        let report = session.advance(200.0);
        let tally = report.ended.expect("day should end");
        assert_eq!(report.ticks, 121);
        assert!(report.admitted.is_empty());
        assert_eq!(tally.spawned, 0);
        assert!((tally.fulfillment_pct() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn advance_interleaves_arrivals_with_ticks() {
        let mut session = session(30);
        let report = session.advance(8.0);
        assert_eq!(report.ticks, 8);
        assert_eq!(report.admitted.len(), 2);
        assert_eq!(session.time_remaining(), 112);
        let head = session.head().unwrap();
        assert!((head.arrived_at - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn manual_spawn_counts_against_the_schedule() {
        let mut session = session(30);
        assert!(matches!(
            session.maybe_spawn_arrival(),
            SpawnOutcome::Admitted(_)
        ));
        let report = session.advance(8.0);
        assert_eq!(report.admitted.len(), 1);
        assert_eq!(session.queue_len(), 2);
    }

    #[test]
    fn advance_stops_at_closing_and_reports_tally_once() {
        let mut session = session(30);
        let report = session.advance(500.0);
        assert_eq!(report.ticks, 121);
        let tally = report.ended.expect("ended");
        assert!(tally.spawned + tally.dropped <= 30);
        assert!(session.advance(10.0).ended.is_none());
    }

    #[test]
    fn same_seed_generates_same_customers() {
        let mut a = session(30);
        let mut b = session(30);
        a.advance(40.0);
        b.advance(40.0);
        let orders_a: Vec<_> = a.customers().map(|c| c.toppings.clone()).collect();
        let orders_b: Vec<_> = b.customers().map(|c| c.toppings.clone()).collect();
        assert_eq!(orders_a, orders_b);
        assert_eq!(a.rng_draws(), b.rng_draws());
    }

    #[test]
    fn display_satisfaction_is_clamped() {
        let mut session = session(0);
        let mut inventory = stocked(10);
        for _ in 0..5 {
            session.spawn_with_order(&[]);
            stage_base(&mut session);
            session.serve(&mut inventory).unwrap();
        }
        assert_eq!(session.satisfaction(), 125);
        assert_eq!(session.satisfaction_display(), 100);
    }

    fn inventory_set(inventory: &mut InventoryLedger, ingredient: Ingredient, qty: u32) {
        let mut stock = *inventory.stock();
        stock.set(ingredient, qty);
        *inventory = InventoryLedger::with_stock(stock);
    }
}
