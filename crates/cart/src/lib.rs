//! In-memory cart state for the checkout screen.
//!
//! A [`Cart`] is an immutable snapshot: every adjustment returns a new cart
//! and leaves the old one untouched. Totals are derived from the rows on each
//! read and never stored.

use rust_decimal::Decimal;
use shared::{
    domain::{CatalogItem, Direction, ItemId},
    error::CartError,
};
use tracing::{debug, error};

mod row;
mod tax;

pub use row::{CartRow, MAX_UNIT_PRICE};
pub use tax::{CartTotals, TaxRule, DEFAULT_TAX_RATE, DEFAULT_TAX_THRESHOLD};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cart {
    rows: Vec<CartRow>,
    revision: u64,
    tax_rule: TaxRule,
}

impl Cart {
    /// Builds the initial cart from a catalog load; every row starts at zero.
    pub fn new(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        Self {
            rows: items.into_iter().map(CartRow::from).collect(),
            revision: 0,
            tax_rule: TaxRule::default(),
        }
    }

    pub fn with_tax_rule(mut self, tax_rule: TaxRule) -> Self {
        self.tax_rule = tax_rule;
        self
    }

    pub fn rows(&self) -> &[CartRow] {
        &self.rows
    }

    pub fn row(&self, id: ItemId) -> Option<&CartRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bumped each time an adjustment actually changes a row.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn tax_rule(&self) -> &TaxRule {
        &self.tax_rule
    }

    pub fn adjust(&self, direction: Direction, id: ItemId) -> Cart {
        let rows = adjust_quantity(&self.rows, direction, id);
        if rows == self.rows {
            debug!(item_id = %id, %direction, "cart adjustment had no effect");
            return self.clone();
        }

        Cart {
            rows,
            revision: self.revision + 1,
            tax_rule: self.tax_rule,
        }
    }

    /// Adjusts using a direction name coming from an untyped caller.
    ///
    /// Unknown names are logged and returned as an error; the cart itself is
    /// never modified in that case.
    pub fn adjust_named(&self, direction: &str, id: ItemId) -> Result<Cart, CartError> {
        match direction.parse::<Direction>() {
            Ok(direction) => Ok(self.adjust(direction, id)),
            Err(err) => {
                error!(item_id = %id, direction, "rejected cart adjustment with invalid direction");
                Err(err)
            }
        }
    }

    pub fn increase(&self, id: ItemId) -> Cart {
        self.adjust(Direction::Increase, id)
    }

    pub fn decrease(&self, id: ItemId) -> Cart {
        self.adjust(Direction::Decrease, id)
    }

    /// Saturates at `Decimal::MAX` instead of overflowing.
    pub fn subtotal(&self) -> Decimal {
        self.rows
            .iter()
            .map(CartRow::total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn tax(&self) -> Decimal {
        self.tax_rule.tax_for(self.subtotal())
    }

    pub fn grand_total(&self) -> Decimal {
        self.totals().grand_total
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(self.subtotal(), &self.tax_rule)
    }
}

/// Steps the row matching `id` one unit along `direction`. Rows with other
/// ids, and the order of the sequence, are left as they were. An unknown id
/// yields an unchanged copy.
pub fn adjust_quantity(rows: &[CartRow], direction: Direction, id: ItemId) -> Vec<CartRow> {
    rows.iter()
        .map(|row| {
            if row.id == id {
                row.stepped(direction)
            } else {
                row.clone()
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
