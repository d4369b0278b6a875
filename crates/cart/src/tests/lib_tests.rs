use super::*;

fn money(raw: &str) -> Decimal {
    raw.parse().expect("decimal literal")
}

fn item(id: i64, available_count: u32, price: &str) -> CatalogItem {
    CatalogItem::new(ItemId(id))
        .with_available_count(available_count)
        .with_price(money(price))
}

fn cart_with_subtotal(subtotal: &str) -> Cart {
    Cart::new([item(1, 1, subtotal)]).increase(ItemId(1))
}

fn assert_row_invariants(cart: &Cart) {
    for row in cart.rows() {
        assert!(row.ordered_quantity() <= row.available_count);
        assert_eq!(row.total(), row.price * Decimal::from(row.ordered_quantity()));
    }
    let summed: Decimal = cart.rows().iter().map(CartRow::total).sum();
    assert_eq!(cart.subtotal(), summed);
}

#[test]
fn new_cart_starts_every_row_at_zero() {
    let cart = Cart::new([item(1, 3, "10"), item(2, 0, "5")]);

    assert_eq!(cart.rows().len(), 2);
    for row in cart.rows() {
        assert_eq!(row.ordered_quantity(), 0);
        assert_eq!(row.total(), Decimal::ZERO);
    }
    assert_eq!(cart.revision(), 0);
    assert_eq!(cart.totals(), CartTotals::compute(Decimal::ZERO, &TaxRule::default()));
}

#[test]
fn missing_catalog_fields_default_to_zero() {
    let cart = Cart::new([CatalogItem::new(ItemId(9))]);
    let row = cart.row(ItemId(9)).expect("row");

    assert_eq!(row.name, None);
    assert_eq!(row.available_count, 0);
    assert_eq!(row.price, Decimal::ZERO);
    assert!(!row.can_increase());
    assert!(!row.can_decrease());

    let after = cart.increase(ItemId(9));
    assert_eq!(after, cart);
}

#[test]
fn negative_price_is_clamped_at_ingest() {
    let cart = Cart::new([item(1, 2, "-4.50")]);
    assert_eq!(cart.row(ItemId(1)).expect("row").price, Decimal::ZERO);
}

#[test]
fn extreme_prices_are_capped_and_never_overflow() {
    let cart = Cart::new([item(1, 3, "50000000000000000000000000000")]);
    assert_eq!(cart.row(ItemId(1)).expect("row").price, MAX_UNIT_PRICE);

    let cart = cart
        .increase(ItemId(1))
        .increase(ItemId(1))
        .increase(ItemId(1));
    let row = cart.row(ItemId(1)).expect("row");
    assert_eq!(row.ordered_quantity(), 3);
    assert_eq!(row.total(), MAX_UNIT_PRICE * Decimal::from(3));
    assert_row_invariants(&cart);
    assert_eq!(cart.grand_total(), cart.subtotal() + cart.tax());
}

#[test]
fn tax_arithmetic_saturates_at_decimal_max() {
    let rule = TaxRule::new(Decimal::ZERO, Decimal::MAX);
    let totals = CartTotals::compute(money("2"), &rule);

    assert_eq!(totals.tax, Decimal::MAX);
    assert_eq!(totals.grand_total, Decimal::MAX);
}

#[test]
fn increase_stops_at_available_count() {
    let cart = Cart::new([CatalogItem::new(ItemId(1))
        .with_name("A")
        .with_available_count(2)
        .with_price(money("100"))]);

    let cart = cart.increase(ItemId(1)).increase(ItemId(1));
    let capped = cart.increase(ItemId(1));

    assert_eq!(capped, cart);
    let row = capped.row(ItemId(1)).expect("row");
    assert_eq!(row.ordered_quantity(), 2);
    assert_eq!(row.total(), money("200"));
    assert_eq!(capped.subtotal(), money("200"));
    assert_eq!(capped.tax(), Decimal::ZERO);
    assert_eq!(capped.grand_total(), money("200"));
}

#[test]
fn crossing_threshold_adds_tax() {
    let cart = Cart::new([item(1, 5, "600")])
        .increase(ItemId(1))
        .increase(ItemId(1));

    assert_eq!(cart.subtotal(), money("1200"));
    assert_eq!(cart.tax(), money("216.0"));
    assert_eq!(cart.grand_total(), money("1416.0"));
}

#[test]
fn decrease_at_zero_is_a_no_op() {
    let cart = Cart::new([item(1, 5, "10")]);
    let after = cart.decrease(ItemId(1));

    assert_eq!(after, cart);
    assert_eq!(after.revision(), 0);
}

#[test]
fn decrease_walks_back_to_zero_and_stays_there() {
    let mut cart = Cart::new([item(1, 3, "2.25")]);
    for _ in 0..3 {
        cart = cart.increase(ItemId(1));
    }
    assert_eq!(cart.row(ItemId(1)).expect("row").total(), money("6.75"));

    let mut previous = cart.row(ItemId(1)).expect("row").ordered_quantity();
    for _ in 0..5 {
        cart = cart.decrease(ItemId(1));
        let current = cart.row(ItemId(1)).expect("row").ordered_quantity();
        assert!(current <= previous);
        previous = current;
    }
    assert_eq!(previous, 0);
    assert_eq!(cart.subtotal(), Decimal::ZERO);
}

#[test]
fn unknown_direction_leaves_rows_untouched() {
    let cart = Cart::new([item(1, 5, "10")]).increase(ItemId(1));

    let err = cart.adjust_named("bogus", ItemId(1)).expect_err("must reject");
    assert_eq!(err, CartError::InvalidDirection("bogus".to_string()));
    assert_eq!(cart.row(ItemId(1)).expect("row").ordered_quantity(), 1);
}

#[test]
fn named_directions_route_to_adjust() {
    let cart = Cart::new([item(1, 5, "10")]);
    let up = cart.adjust_named("increase", ItemId(1)).expect("increase");
    let down = up.adjust_named("decrease", ItemId(1)).expect("decrease");

    assert_eq!(up.row(ItemId(1)).expect("row").ordered_quantity(), 1);
    assert_eq!(down.row(ItemId(1)).expect("row").ordered_quantity(), 0);
}

#[test]
fn unmatched_id_changes_nothing() {
    let cart = Cart::new([item(1, 5, "10"), item(2, 5, "20")]);
    let after = cart.increase(ItemId(42));

    assert_eq!(after.rows(), cart.rows());
    assert_eq!(after.revision(), cart.revision());
}

#[test]
fn adjust_only_touches_matching_row_and_keeps_order() {
    let cart = Cart::new([item(3, 5, "1"), item(1, 5, "2"), item(2, 5, "3")]);
    let after = cart.increase(ItemId(1));

    let ids: Vec<_> = after.rows().iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![ItemId(3), ItemId(1), ItemId(2)]);
    assert_eq!(after.rows()[0], cart.rows()[0]);
    assert_eq!(after.rows()[2], cart.rows()[2]);
    assert_eq!(after.rows()[1].ordered_quantity(), 1);
    assert_eq!(after.revision(), 1);
}

#[test]
fn adjust_quantity_is_pure_over_row_slices() {
    let rows = Cart::new([item(1, 2, "7")]).rows().to_vec();
    let first = adjust_quantity(&rows, Direction::Increase, ItemId(1));
    let second = adjust_quantity(&rows, Direction::Increase, ItemId(1));

    assert_eq!(first, second);
    assert_eq!(rows[0].ordered_quantity(), 0);
    assert_eq!(first[0].ordered_quantity(), 1);
}

#[test]
fn tax_threshold_is_exclusive() {
    assert_eq!(cart_with_subtotal("1000.00").tax(), Decimal::ZERO);
    assert_eq!(cart_with_subtotal("1000.01").tax(), money("180.0018"));
    assert_eq!(Cart::default().tax(), Decimal::ZERO);
}

#[test]
fn custom_tax_rule_is_honoured() {
    let rule = TaxRule::new(money("50"), money("0.05"));
    let cart = Cart::new([item(1, 2, "40")])
        .with_tax_rule(rule)
        .increase(ItemId(1))
        .increase(ItemId(1));

    assert_eq!(cart.tax_rule(), &rule);
    assert_eq!(cart.tax(), money("4.00"));
    assert_eq!(cart.grand_total(), money("84.00"));
}

#[test]
fn invariants_hold_across_mixed_adjustments() {
    let mut cart = Cart::new([item(1, 2, "19.99"), item(2, 4, "0.5"), item(3, 0, "100")]);
    let script = [
        (Direction::Increase, 1),
        (Direction::Increase, 2),
        (Direction::Increase, 3),
        (Direction::Increase, 1),
        (Direction::Increase, 1),
        (Direction::Decrease, 2),
        (Direction::Decrease, 2),
        (Direction::Increase, 2),
        (Direction::Decrease, 3),
    ];

    for (direction, id) in script {
        cart = cart.adjust(direction, ItemId(id));
        assert_row_invariants(&cart);
    }

    assert_eq!(cart.row(ItemId(1)).expect("row").ordered_quantity(), 2);
    assert_eq!(cart.row(ItemId(2)).expect("row").ordered_quantity(), 1);
    assert_eq!(cart.row(ItemId(3)).expect("row").ordered_quantity(), 0);
    assert_eq!(cart.subtotal(), money("40.48"));
}

#[test]
fn rows_serialize_with_camel_case_fields() {
    let cart = Cart::new([item(1, 2, "3")]).increase(ItemId(1));
    let value = serde_json::to_value(cart.rows()).expect("json");

    assert_eq!(value[0]["orderedQuantity"], 1);
    assert_eq!(value[0]["availableCount"], 2);
    assert!(value[0].get("total").is_some());
}
