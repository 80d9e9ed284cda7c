use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::basket::BasketLine;

/// Flat shipping surcharge, waived once the subtotal reaches a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingPolicy {
    pub free_threshold: BigDecimal,
    pub flat_rate: BigDecimal,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_threshold: BigDecimal::new(5000.into(), 2),
            flat_rate: BigDecimal::new(499.into(), 2),
        }
    }
}

impl ShippingPolicy {
    pub fn shipping_for(&self, subtotal: &BigDecimal) -> BigDecimal {
        if subtotal >= &self.free_threshold {
            BigDecimal::zero()
        } else {
            self.flat_rate.clone()
        }
    }

    /// Shipping and total derive from the subtotal after it is rounded to
    /// cents, so `total == subtotal + shipping` always holds.
    pub fn totals(&self, lines: &[BasketLine]) -> Totals {
        let subtotal = lines
            .iter()
            .fold(BigDecimal::zero(), |acc, l| acc + l.line_total())
            .round(2);
        let shipping = self.shipping_for(&subtotal).round(2);
        let total = &subtotal + &shipping;
        Totals {
            subtotal,
            shipping,
            total,
        }
    }
}

/// Amounts shown at checkout, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Totals {
    #[schema(value_type = String, example = "25.00")]
    pub subtotal: BigDecimal,
    #[schema(value_type = String, example = "4.99")]
    pub shipping: BigDecimal,
    #[schema(value_type = String, example = "29.99")]
    pub total: BigDecimal,
}
