use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use pizza_game::{
    EconomyModel, GameState, GameStorage, IngredientCounts, IntentError, Money, Parlour,
    ParlourConfig, ParlourError, PhaseKind, STORAGE_KEY, ServiceError, ServiceTally,
};

use crate::logic::policy::{GameplayStrategy, PlayerPolicy};

/// One automated run: a strategy playing `days` days from `seed`.
#[derive(Debug, Clone, Copy)]
pub struct SimulationPlan {
    pub strategy: GameplayStrategy,
    pub seed: u64,
    pub days: u32,
}

/// Figures recorded for each simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOutcome {
    pub day: u32,
    pub price: Money,
    pub order_cost: Money,
    pub expected_arrivals: u32,
    pub spawned: u32,
    pub dropped: u32,
    pub served: u32,
    pub missed: u32,
    pub abandoned: u32,
    pub stockouts: u32,
    pub revenue: Money,
    pub costs: Money,
    pub profit: Money,
    pub fulfillment: f64,
    pub satisfaction: i32,
    pub cash_after: Money,
}

#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub plan: SimulationPlan,
    pub days: Vec<DayOutcome>,
    pub violations: Vec<String>,
    /// Set when cash went negative and the shop could no longer place orders.
    pub bankrupt_on: Option<u32>,
    pub final_state: GameState,
}

impl SimulationSummary {
    #[must_use]
    pub fn total_profit(&self) -> Money {
        self.days.iter().map(|d| d.profit).sum()
    }
}

/// Play `plan` against a parlour persisted in `storage`.
///
/// # Errors
///
/// Returns an error if the storage backend fails at a checkpoint.
pub fn run_plan<S>(cfg: &ParlourConfig, storage: S, plan: &SimulationPlan) -> Result<SimulationSummary>
where
    S: GameStorage,
{
    let mut parlour = Parlour::open(cfg.clone(), storage, plan.seed);
    parlour
        .dismiss_tutorial()
        .context("failed to save tutorial dismissal")?;
    let mut policy = plan.strategy.create_policy();
    let mut days = Vec::with_capacity(plan.days as usize);
    let mut violations = Vec::new();
    let mut bankrupt_on = None;

    for _ in 0..plan.days {
        let day = parlour.state().day;
        let Some(order_cost) = place_affordable_order(&mut parlour, cfg, policy.as_mut())? else {
            warn!("{} seed {}: bankrupt on day {day}", policy.name(), plan.seed);
            bankrupt_on = Some(day);
            break;
        };
        let outcome = play_day(&mut parlour, cfg, policy.as_mut(), order_cost, &mut violations)?;
        if let Some(outcome) = outcome {
            debug!(
                "{} seed {} day {}: profit {} cash {}",
                policy.name(),
                plan.seed,
                outcome.day,
                outcome.profit,
                outcome.cash_after
            );
            days.push(outcome);
        }
        check_persisted(&parlour, day, &mut violations);
        parlour
            .advance_day()
            .with_context(|| format!("failed to start day {}", day + 1))?;
    }

    let (cycle, _) = parlour.into_parts();
    Ok(SimulationSummary {
        plan: *plan,
        days,
        violations,
        bankrupt_on,
        final_state: cycle.into_state(),
    })
}

/// Place the policy's order, halving it until it fits the cash on hand.
/// Returns `None` when not even an empty order can be placed.
fn place_affordable_order<S: GameStorage>(
    parlour: &mut Parlour<S>,
    cfg: &ParlourConfig,
    policy: &mut dyn PlayerPolicy,
) -> Result<Option<Money>> {
    let economy = EconomyModel::new(cfg);
    let cash = parlour.state().cash;
    if cash.is_negative() {
        return Ok(None);
    }
    let mut order = policy.plan_order(&parlour.snapshot());
    while economy.order_cost(&order) > cash {
        order = halve(&order);
    }
    match parlour.place_order(&order) {
        Ok(spent) => Ok(Some(spent)),
        Err(ParlourError::Intent(err)) => {
            warn!("order of {order} rejected: {err}");
            Ok(None)
        }
        Err(err) => Err(err).context("failed to save order"),
    }
}

fn halve(order: &IngredientCounts) -> IngredientCounts {
    let mut smaller = *order;
    for (ingredient, qty) in order.iter() {
        smaller.set(ingredient, qty / 2);
    }
    smaller
}

fn play_day<S: GameStorage>(
    parlour: &mut Parlour<S>,
    cfg: &ParlourConfig,
    policy: &mut dyn PlayerPolicy,
    order_cost: Money,
    violations: &mut Vec<String>,
) -> Result<Option<DayOutcome>> {
    let day = parlour.state().day;
    let cash_before = parlour.state().cash + order_cost;
    let price = policy.choose_price(&parlour.snapshot());
    parlour.set_price(price).context("set price")?;
    let expected_arrivals = parlour.open_shop().context("failed to save price lock")?;

    let reaction = policy.reaction_secs().max(1);
    let max_steps = cfg.service.day_length_secs + 2;
    let mut stockouts = 0;
    let mut tally: Option<ServiceTally> = None;
    for step in 1..=max_steps {
        let report = parlour.advance(1.0).context("failed to save day summary")?;
        if let Some(ended) = report.ended {
            tally = Some(ended);
            break;
        }
        if step % reaction == 0 {
            stockouts += serve_head(parlour, policy, violations);
        }
    }

    let Some(tally) = tally else {
        violations.push(format!("day {day}: service did not close within {max_steps}s"));
        return Ok(None);
    };
    let Some(summary) = parlour.cycle().summary().cloned() else {
        violations.push(format!("day {day}: no summary after service closed"));
        return Ok(None);
    };

    let record = &summary.record;
    let cash_after = parlour.state().cash;
    let expected_cash = cash_before - order_cost + record.revenue - cfg.fixed_cost;
    if cash_after != expected_cash {
        violations.push(format!(
            "day {day}: cash {cash_after} but settlement implies {expected_cash}"
        ));
    }
    if record.costs != order_cost + cfg.fixed_cost {
        violations.push(format!("day {day}: costs {} != order + fixed", record.costs));
    }
    if record.profit != record.revenue - record.costs {
        violations.push(format!("day {day}: profit {} != revenue - costs", record.profit));
    }
    if !(0.0..=100.0).contains(&record.fulfillment) {
        violations.push(format!("day {day}: fulfillment {} out of range", record.fulfillment));
    }
    if tally.served + tally.missed + tally.abandoned != tally.spawned {
        violations.push(format!(
            "day {day}: {} spawned but {} served + {} missed + {} abandoned",
            tally.spawned, tally.served, tally.missed, tally.abandoned
        ));
    }
    let history = &parlour.state().history;
    if history.len() > cfg.history_window {
        violations.push(format!("day {day}: history holds {} records", history.len()));
    }
    if history.latest().map(|r| r.day) != Some(day) {
        violations.push(format!("day {day}: latest history record is not today"));
    }

    Ok(Some(DayOutcome {
        day,
        price: record.price,
        order_cost,
        expected_arrivals,
        spawned: tally.spawned,
        dropped: tally.dropped,
        served: tally.served,
        missed: tally.missed,
        abandoned: tally.abandoned,
        stockouts,
        revenue: record.revenue,
        costs: record.costs,
        profit: record.profit,
        fulfillment: record.fulfillment,
        satisfaction: record.satisfaction,
        cash_after,
    }))
}

/// Stage the policy's pizza for the head customer and serve it.
/// Returns 1 on a stockout rejection.
fn serve_head<S: GameStorage>(
    parlour: &mut Parlour<S>,
    policy: &mut dyn PlayerPolicy,
    violations: &mut Vec<String>,
) -> u32 {
    let view = parlour.snapshot();
    if parlour.cycle().phase_kind() != PhaseKind::Service {
        return 0;
    }
    let Some(head) = view.customers.first() else {
        return 0;
    };
    let pizza = policy.assemble(head);
    let staged = parlour.clear_assembly().and_then(|()| {
        for (ingredient, qty) in pizza.iter() {
            for _ in 0..qty {
                parlour.stage_topping(ingredient)?;
            }
        }
        Ok(())
    });
    if let Err(err) = staged {
        violations.push(format!("day {}: staging failed: {err}", view.day));
        return 0;
    }
    match parlour.serve() {
        Ok(_) => 0,
        Err(ParlourError::Intent(IntentError::Service(ServiceError::OutOfStock { .. }))) => 1,
        Err(err) => {
            violations.push(format!("day {}: serve failed: {err}", view.day));
            0
        }
    }
}

fn check_persisted<S: GameStorage>(parlour: &Parlour<S>, day: u32, violations: &mut Vec<String>) {
    match parlour.storage().load_state(STORAGE_KEY) {
        Ok(Some(saved)) if &saved == parlour.state() => {}
        Ok(Some(_)) => violations.push(format!("day {day}: saved state differs from live state")),
        Ok(None) => violations.push(format!("day {day}: no save found after summary")),
        Err(err) => violations.push(format!("day {day}: save unreadable: {err}")),
    }
}
