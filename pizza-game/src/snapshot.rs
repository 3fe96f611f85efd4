//! Read-only views handed to presentation layers.
use serde::{Deserialize, Serialize};

use crate::constants::STARTING_SATISFACTION;
use crate::customer::{Customer, CustomerId, PatienceBucket, ToppingOrder};
use crate::day_cycle::{DayCycle, DaySummary, Phase, PhaseKind, PriceQuote};
use crate::ingredient::IngredientCounts;
use crate::money::Money;
use crate::state::Settings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerView {
    pub id: CustomerId,
    pub toppings: ToppingOrder,
    pub label: String,
    pub bucket: PatienceBucket,
    pub seconds_left: u32,
}

impl CustomerView {
    #[must_use]
    pub fn capture(customer: &Customer, now: f64) -> Self {
        Self {
            id: customer.id,
            toppings: customer.toppings.clone(),
            label: customer.order_label(),
            bucket: customer.bucket(now),
            seconds_left: customer.seconds_left(now),
        }
    }
}

/// Everything a screen needs to draw the current moment of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlourView {
    pub day: u32,
    pub phase: PhaseKind,
    pub cash: Money,
    pub price: Money,
    pub quote: PriceQuote,
    pub last_order_cost: Money,
    /// Seconds left in service; `None` outside the Service phase.
    pub time_remaining: Option<i32>,
    pub revenue: Money,
    /// Clamped into 0..=100.
    pub satisfaction: i32,
    pub satisfaction_raw: i32,
    pub inventory: IngredientCounts,
    pub customers: Vec<CustomerView>,
    pub assembly: IngredientCounts,
    pub summary: Option<DaySummary>,
    pub settings: Settings,
}

impl DayCycle {
    #[must_use]
    pub fn snapshot(&self) -> ParlourView {
        let state = self.state();
        let mut view = ParlourView {
            day: state.day,
            phase: self.phase_kind(),
            cash: state.cash,
            price: state.price,
            quote: self.demand_preview(),
            last_order_cost: state.last_order_cost,
            time_remaining: None,
            revenue: Money::ZERO,
            satisfaction: STARTING_SATISFACTION,
            satisfaction_raw: STARTING_SATISFACTION,
            inventory: *state.inventory.stock(),
            customers: Vec::new(),
            assembly: IngredientCounts::new(),
            summary: None,
            settings: state.settings,
        };
        match self.phase() {
            Phase::Prep | Phase::Pricing => {}
            Phase::Service(session) => {
                let now = session.now();
                view.time_remaining = Some(session.time_remaining().max(0));
                view.revenue = session.revenue();
                view.satisfaction = session.satisfaction_display();
                view.satisfaction_raw = session.satisfaction();
                view.customers = session
                    .customers()
                    .map(|c| CustomerView::capture(c, now))
                    .collect();
                view.assembly = *session.assembly();
            }
            Phase::Summary(summary) => {
                view.revenue = summary.record.revenue;
                view.satisfaction = summary.record.satisfaction_display();
                view.satisfaction_raw = summary.record.satisfaction;
                view.summary = Some(summary.clone());
            }
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ParlourConfig;
    use crate::customer::PatienceBucket;
    use crate::day_cycle::{DayCycle, PhaseKind};
    use crate::ingredient::{Ingredient, IngredientCounts};

    #[test]
    fn prep_view_shows_state_without_service_fields() {
        let cycle = DayCycle::fresh(ParlourConfig::default(), 3);
        let view = cycle.snapshot();
        assert_eq!(view.phase, PhaseKind::Prep);
        assert_eq!(view.day, 1);
        assert_eq!(view.quote.demand, 30);
        assert!(view.time_remaining.is_none());
        assert!(view.customers.is_empty());
        assert!(view.summary.is_none());
    }

    #[test]
    fn service_view_lists_queue_with_countdowns() {
        let mut cycle = DayCycle::fresh(ParlourConfig::default(), 3);
        cycle.place_order(&IngredientCounts::uniform(5)).unwrap();
        cycle.open_shop().unwrap();
        cycle.advance(4.0).unwrap();
        cycle.stage_topping(Ingredient::Dough).unwrap();
        let view = cycle.snapshot();
        assert_eq!(view.phase, PhaseKind::Service);
        assert_eq!(view.time_remaining, Some(116));
        assert_eq!(view.customers.len(), 1);
        let customer = &view.customers[0];
        assert_eq!(customer.bucket, PatienceBucket::Content);
        assert_eq!(customer.seconds_left, 10);
        assert_eq!(view.assembly.get(Ingredient::Dough), 1);
    }

    #[test]
    fn summary_view_carries_the_day_summary() {
        let mut cycle = DayCycle::fresh(ParlourConfig::default(), 3);
        cycle.place_order(&IngredientCounts::new()).unwrap();
        cycle.open_shop().unwrap();
        cycle.advance(500.0).unwrap();
        let view = cycle.snapshot();
        assert_eq!(view.phase, PhaseKind::Summary);
        let summary = view.summary.unwrap();
        assert_eq!(summary.record.day, 1);
        assert_eq!(view.satisfaction_raw, summary.record.satisfaction);
        assert!((0..=100).contains(&view.satisfaction));
        serde_json::to_string(&cycle.snapshot()).unwrap();
    }
}
