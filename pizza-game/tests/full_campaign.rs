use pizza_game::{
    DayCycle, EconomyModel, GameStorage, Ingredient, IngredientCounts, IntentError,
    InventoryError, MemoryStorage, Money, Parlour, ParlourConfig, ParlourError, PhaseKind,
    STORAGE_KEY, ServiceError, SummaryTip,
};

const TARGET_STOCK: u32 = 10;

fn restock_order(cycle: &DayCycle) -> IngredientCounts {
    let stock = cycle.state().inventory.stock();
    let mut order = IngredientCounts::new();
    for ingredient in Ingredient::ALL {
        order.set(ingredient, TARGET_STOCK.saturating_sub(stock.get(ingredient)));
    }
    order
}

fn serve_queue(parlour: &mut Parlour<MemoryStorage>) -> (u32, u32) {
    let mut served = 0;
    let mut turned_away = 0;
    while let Some(head) = parlour
        .cycle()
        .session()
        .and_then(|session| session.head())
        .cloned()
    {
        for ingredient in Ingredient::BASE {
            parlour.stage_topping(ingredient).unwrap();
        }
        for &topping in &head.toppings {
            parlour.stage_topping(topping).unwrap();
        }
        match parlour.serve() {
            Ok(outcome) => {
                assert!(outcome.perfect_match);
                served += 1;
            }
            Err(ParlourError::Intent(IntentError::Service(ServiceError::OutOfStock {
                customer,
                ..
            }))) => {
                assert_eq!(customer, head.id);
                turned_away += 1;
            }
            Err(other) => panic!("unexpected serve failure: {other}"),
        }
    }
    (served, turned_away)
}

#[test]
fn eight_day_campaign_keeps_books_balanced() {
    let cfg = ParlourConfig::default();
    let storage = MemoryStorage::new();
    let mut parlour = Parlour::open(cfg.clone(), storage.clone(), 0xC0FFEE);
    parlour.dismiss_tutorial().unwrap();
    let fixed = cfg.fixed_cost;
    let prices = [8, 9, 10, 7, 8, 12, 4, 8];

    for (offset, dollars) in prices.into_iter().enumerate() {
        let day = u32::try_from(offset).unwrap() + 1;
        assert_eq!(parlour.state().day, day);
        assert_eq!(parlour.cycle().phase_kind(), PhaseKind::Prep);

        let cash_before = parlour.state().cash;
        let order = restock_order(parlour.cycle());
        let spent = match parlour.place_order(&order) {
            Ok(spent) => spent,
            Err(ParlourError::Intent(IntentError::Inventory(
                InventoryError::InsufficientCash { .. },
            ))) => parlour.place_order(&IngredientCounts::new()).unwrap(),
            Err(other) => panic!("order failed: {other}"),
        };
        assert_eq!(parlour.state().last_order_cost, spent);

        parlour.set_price(Money::from_dollars(dollars)).unwrap();
        let expected = parlour.open_shop().unwrap();
        assert_eq!(
            expected,
            EconomyModel::new(&cfg).demand(Money::from_dollars(dollars))
        );

        let mut served = 0;
        let mut turned_away = 0;
        loop {
            let report = parlour.advance(1.0).unwrap();
            let (s, t) = serve_queue(&mut parlour);
            served += s;
            turned_away += t;
            if report.ended.is_some() {
                break;
            }
        }

        let summary = parlour.cycle().summary().cloned().unwrap();
        let record = &summary.record;
        assert_eq!(record.day, day);
        assert_eq!(record.price, Money::from_dollars(dollars));
        assert_eq!(summary.served, served);
        assert!(summary.missed >= turned_away);
        assert_eq!(record.revenue, Money::from_dollars(dollars).times(served));
        assert_eq!(record.costs, spent + fixed);
        assert_eq!(record.profit, record.revenue - record.costs);
        assert_eq!(parlour.state().cash, cash_before - spent + record.revenue - fixed);
        assert!((0.0..=100.0).contains(&record.fulfillment));
        assert!((0..=100).contains(&record.satisfaction_display()));
        assert_eq!(
            summary.used_cost,
            EconomyModel::new(&cfg).usage_cost(&summary.usage)
        );
        assert!(SummaryTip::ALL.contains(&summary.tip));
        assert_eq!(storage.load_state(STORAGE_KEY).unwrap().as_ref(), Some(parlour.state()));

        parlour.advance_day().unwrap();
    }

    let history: Vec<u32> = parlour.state().history.iter().map(|r| r.day).collect();
    assert_eq!(history, vec![4, 5, 6, 7, 8]);
    assert_eq!(parlour.state().day, 9);
    assert!(parlour.state().settings.tutorial_dismissed);

    let exported: serde_json::Value =
        serde_json::from_str(&parlour.export_history().unwrap()).unwrap();
    let rows = exported.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["day"], 4);
    assert_eq!(rows[4]["day"], 8);
    let last = parlour.state().history.latest().unwrap();
    assert_eq!(rows[4]["profit"].as_f64(), Some(last.profit.as_dollars()));
    assert_eq!(rows[4]["price"].as_f64(), Some(last.price.as_dollars()));
}

#[test]
fn empty_shelves_turn_every_customer_away() {
    let mut parlour = Parlour::open(ParlourConfig::default(), MemoryStorage::new(), 42);
    parlour.place_order(&IngredientCounts::new()).unwrap();
    parlour.open_shop().unwrap();
    let mut turned_away = 0;
    loop {
        let report = parlour.advance(1.0).unwrap();
        turned_away += serve_queue(&mut parlour).1;
        if report.ended.is_some() {
            break;
        }
    }
    let summary = parlour.cycle().summary().unwrap();
    assert_eq!(summary.served, 0);
    assert!(turned_away > 0);
    assert_eq!(summary.missed, turned_away);
    assert!(summary.record.fulfillment.abs() < f64::EPSILON);
    assert_eq!(summary.record.revenue, Money::ZERO);
    assert_eq!(parlour.state().cash, Money::from_dollars(80));
    assert!(parlour.state().inventory.stock().is_empty());
}
