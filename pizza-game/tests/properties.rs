use pizza_game::{
    CountingRng, DayCycle, DemandConfig, EconomyModel, Ingredient, IngredientCounts,
    InventoryLedger, Money, ParlourConfig, ServiceConfig, ServiceError, ServiceSession,
    SpawnOutcome, TickOutcome,
};
use rand::Rng;

fn session(arrivals: u32) -> ServiceSession {
    ServiceSession::open(
        &ServiceConfig::default(),
        Money::from_dollars(8),
        arrivals,
        CountingRng::new(17),
    )
}

fn stage_base(session: &mut ServiceSession) {
    for ingredient in Ingredient::BASE {
        session.stage(ingredient).unwrap();
    }
}

#[test]
fn demand_never_rises_with_price_above_reference() {
    let cfg = ParlourConfig::default();
    let economy = EconomyModel::new(&cfg);
    let mut previous = economy.demand(Money::from_cents(800));
    for cents in (805..=2_000).step_by(5) {
        let demand = economy.demand(Money::from_cents(cents));
        assert!(demand <= previous, "demand rose at {cents} cents");
        previous = demand;
    }
}

#[test]
fn demand_matches_reference_points() {
    let cfg = ParlourConfig::default();
    let economy = EconomyModel::new(&cfg);
    assert_eq!(economy.demand(Money::from_dollars(8)), 30);
    assert_eq!(economy.demand(Money::from_dollars(12)), 20);
    assert_eq!(economy.demand(Money::from_dollars(4)), 35);
}

#[test]
fn random_order_and_consume_sequences_never_go_negative() {
    let cfg = ParlourConfig::default();
    let economy = EconomyModel::new(&cfg);
    let mut rng = CountingRng::new(2024);
    let mut ledger = InventoryLedger::new();
    let mut cash = Money::from_dollars(500);

    for _ in 0..2_000 {
        let mut counts = IngredientCounts::new();
        for ingredient in Ingredient::ALL {
            counts.set(ingredient, rng.gen_range(0..4));
        }
        if rng.gen_bool(0.3) {
            let before_cash = cash;
            let before_stock = *ledger.stock();
            if ledger.order(&counts, &mut cash, &economy).is_err() {
                assert_eq!(cash, before_cash);
                assert_eq!(ledger.stock(), &before_stock);
            }
        } else {
            let before = *ledger.stock();
            match ledger.consume(&counts) {
                Ok(()) => {
                    for ingredient in Ingredient::ALL {
                        assert_eq!(
                            ledger.count(ingredient),
                            before.get(ingredient) - counts.get(ingredient)
                        );
                    }
                }
                Err(_) => assert_eq!(ledger.stock(), &before),
            }
        }
        assert!(!cash.is_negative());
    }
}

#[test]
fn six_days_leave_days_two_through_six_in_history() {
    let mut cycle = DayCycle::fresh(ParlourConfig::default(), 8);
    for _ in 0..6 {
        cycle.place_order(&IngredientCounts::new()).unwrap();
        cycle.open_shop().unwrap();
        cycle.advance(1_000.0).unwrap();
        assert!(cycle.state().history.len() <= 5);
        cycle.advance_day().unwrap();
    }
    let days: Vec<u32> = cycle.state().history.iter().map(|r| r.day).collect();
    assert_eq!(days, vec![2, 3, 4, 5, 6]);
}

#[test]
fn fulfillment_is_full_without_arrivals() {
    let cfg = ParlourConfig {
        demand: DemandConfig {
            base: 0,
            ..DemandConfig::default()
        },
        ..ParlourConfig::default()
    };
    let mut cycle = DayCycle::fresh(cfg, 1);
    cycle.place_order(&IngredientCounts::new()).unwrap();
    cycle.open_shop().unwrap();
    let report = cycle.advance(1_000.0).unwrap();
    assert!(report.admitted.is_empty());
    let record = cycle.state().history.latest().unwrap();
    assert!((record.fulfillment - 100.0).abs() < f64::EPSILON);
}

#[test]
fn pepperoni_stockout_rejects_without_touching_inventory() {
    let mut session = session(0);
    let mut stock = IngredientCounts::uniform(4);
    stock.set(Ingredient::Pepperoni, 0);
    let mut inventory = InventoryLedger::with_stock(stock);
    session.spawn_with_order(&[Ingredient::Pepperoni]);
    stage_base(&mut session);
    session.stage(Ingredient::Pepperoni).unwrap();

    let result = session.serve(&mut inventory);
    assert!(matches!(result, Err(ServiceError::OutOfStock { .. })));
    assert_eq!(session.satisfaction(), 90);
    assert_eq!(session.missed(), 1);
    assert_eq!(session.queue_len(), 0);
    assert_eq!(inventory.stock(), &stock);
}

#[test]
fn plain_serve_uses_one_of_each_base_ingredient() {
    let mut session = session(0);
    let mut inventory = InventoryLedger::with_stock(IngredientCounts::uniform(3));
    session.spawn_with_order(&[]);
    stage_base(&mut session);
    session.serve(&mut inventory).unwrap();
    for ingredient in Ingredient::BASE {
        assert_eq!(inventory.count(ingredient), 2);
    }
    for ingredient in Ingredient::TOPPINGS {
        assert_eq!(inventory.count(ingredient), 3);
    }
    assert_eq!(session.revenue(), Money::from_dollars(8));
    assert_eq!(session.served(), 1);
    assert_eq!(session.satisfaction(), 105);
}

#[test]
fn patience_penalties_track_wait_time() {
    let mut session = session(0);
    session.spawn_with_order(&[]);
    for _ in 0..5 {
        session.tick();
    }
    // waited 5 s
    assert_eq!(session.satisfaction(), 100);
    session.tick();
    session.tick();
    // waited 7 s: first impatient tick
    assert_eq!(session.satisfaction(), 99);
    for _ in 0..4 {
        session.tick();
    }
    // waited 11 s: walked out after three more impatient ticks
    assert_eq!(session.satisfaction(), 99 - 3 - 10);
    assert_eq!(session.missed(), 1);
    assert_eq!(session.queue_len(), 0);
}

#[test]
fn nothing_mutates_an_ended_session() {
    let mut session = session(30);
    let report = session.advance(10_000.0);
    let tally = report.ended.unwrap();
    let queued = session.queue_len();
    let draws = session.rng_draws();

    assert_eq!(session.tick(), TickOutcome::Inactive);
    assert_eq!(session.maybe_spawn_arrival(), SpawnOutcome::Inactive);
    assert_eq!(session.spawn_with_order(&[]), SpawnOutcome::Inactive);
    assert!(session.advance(50.0).ended.is_none());
    assert_eq!(session.queue_len(), queued);
    assert_eq!(session.rng_draws(), draws);
    assert_eq!(session.satisfaction(), tally.satisfaction);
    assert_eq!(session.missed(), tally.missed);
}
