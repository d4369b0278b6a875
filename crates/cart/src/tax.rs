use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Subtotals strictly above this amount are taxed.
pub const DEFAULT_TAX_THRESHOLD: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);
/// 18%
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Flat surcharge applied once the subtotal passes a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRule {
    pub threshold: Decimal,
    pub rate: Decimal,
}

impl Default for TaxRule {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_TAX_THRESHOLD,
            rate: DEFAULT_TAX_RATE,
        }
    }
}

impl TaxRule {
    pub fn new(threshold: Decimal, rate: Decimal) -> Self {
        Self { threshold, rate }
    }

    pub fn tax_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.threshold {
            self.rate.saturating_mul(subtotal)
        } else {
            Decimal::ZERO
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub grand_total: Decimal,
}

impl CartTotals {
    pub fn compute(subtotal: Decimal, rule: &TaxRule) -> Self {
        let tax = rule.tax_for(subtotal);
        Self {
            subtotal,
            tax,
            grand_total: subtotal.saturating_add(tax),
        }
    }
}
