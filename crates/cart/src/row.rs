use rust_decimal::Decimal;
use serde::Serialize;
use shared::domain::{CatalogItem, Direction, ItemId};
use tracing::warn;

/// Highest unit price a row accepts. Any quantity up to `u32::MAX` times this
/// stays far inside `Decimal`'s range.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// A catalog item enriched with the quantity the shopper picked.
///
/// `ordered_quantity` and `total` are private so that
/// `ordered_quantity <= available_count` and `total == price * ordered_quantity`
/// hold for every row that exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRow {
    pub id: ItemId,
    pub name: Option<String>,
    pub available_count: u32,
    pub price: Decimal,
    ordered_quantity: u32,
    total: Decimal,
}

impl From<CatalogItem> for CartRow {
    fn from(item: CatalogItem) -> Self {
        let mut price = item.price.unwrap_or_default().max(Decimal::ZERO);
        if price > MAX_UNIT_PRICE {
            warn!(item_id = %item.id, %price, "capping catalog price at the maximum unit price");
            price = MAX_UNIT_PRICE;
        }

        Self {
            id: item.id,
            name: item.name,
            available_count: item.available_count.unwrap_or(0),
            price,
            ordered_quantity: 0,
            total: Decimal::ZERO,
        }
    }
}

impl CartRow {
    pub fn ordered_quantity(&self) -> u32 {
        self.ordered_quantity
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn can_increase(&self) -> bool {
        self.ordered_quantity < self.available_count
    }

    pub fn can_decrease(&self) -> bool {
        self.ordered_quantity > 0
    }

    /// Returns the row one step along `direction`, clamped to
    /// `[0, available_count]`.
    pub fn stepped(&self, direction: Direction) -> CartRow {
        let ordered_quantity = match direction {
            Direction::Increase => self
                .available_count
                .min(self.ordered_quantity.saturating_add(1)),
            Direction::Decrease => self.ordered_quantity.saturating_sub(1),
        };
        self.with_quantity(ordered_quantity)
    }

    fn with_quantity(&self, ordered_quantity: u32) -> CartRow {
        CartRow {
            ordered_quantity,
            total: self.price.saturating_mul(Decimal::from(ordered_quantity)),
            ..self.clone()
        }
    }
}
