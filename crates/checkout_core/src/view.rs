//! Display-ready rendering of cart rows and totals.

use cart::{CartRow, CartTotals};
use rust_decimal::{Decimal, RoundingStrategy};
use shared::domain::ItemId;

pub const NAME_PLACEHOLDER: &str = "------";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: ItemId,
    pub name: String,
    pub available: u32,
    pub price: String,
    pub quantity: u32,
    pub total: String,
    pub can_increase: bool,
    pub can_decrease: bool,
}

impl From<&CartRow> for RowView {
    fn from(row: &CartRow) -> Self {
        Self {
            id: row.id,
            name: row
                .name
                .as_deref()
                .filter(|name| !name.is_empty())
                .unwrap_or(NAME_PLACEHOLDER)
                .to_string(),
            available: row.available_count,
            price: row.price.normalize().to_string(),
            quantity: row.ordered_quantity(),
            total: format_amount(row.total()),
            can_increase: row.can_increase(),
            can_decrease: row.can_decrease(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsView {
    pub subtotal: String,
    pub tax: String,
    pub grand_total: String,
}

impl From<&CartTotals> for TotalsView {
    fn from(totals: &CartTotals) -> Self {
        Self {
            subtotal: format_amount(totals.subtotal),
            tax: format_amount(totals.tax),
            grand_total: format_amount(totals.grand_total),
        }
    }
}

/// Two decimal places, half away from zero.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use cart::Cart;
    use shared::domain::CatalogItem;

    use super::*;

    #[test]
    fn formats_amounts_to_two_places() {
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
        assert_eq!(format_amount(Decimal::new(2160, 1)), "216.00");
        assert_eq!(format_amount(Decimal::new(1800018, 4)), "180.00");
        assert_eq!(format_amount(Decimal::new(1005, 3)), "1.01");
    }

    #[test]
    fn row_view_fills_placeholders() {
        let cart = Cart::new([CatalogItem::new(ItemId(7))]);
        let view = RowView::from(&cart.rows()[0]);

        assert_eq!(view.name, NAME_PLACEHOLDER);
        assert_eq!(view.available, 0);
        assert_eq!(view.price, "0");
        assert_eq!(view.total, "0.00");
        assert!(!view.can_increase);
        assert!(!view.can_decrease);
    }

    #[test]
    fn row_view_tracks_buttons() {
        let cart = Cart::new([CatalogItem::new(ItemId(1))
            .with_name("Tea")
            .with_available_count(1)
            .with_price(Decimal::new(125, 1))])
        .increase(ItemId(1));
        let view = RowView::from(&cart.rows()[0]);

        assert_eq!(view.name, "Tea");
        assert_eq!(view.price, "12.5");
        assert_eq!(view.quantity, 1);
        assert_eq!(view.total, "12.50");
        assert!(!view.can_increase);
        assert!(view.can_decrease);
    }
}
