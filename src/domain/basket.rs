use std::collections::HashSet;

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::product::ProductSnapshot;

/// One product in a basket. `price` is the snapshot taken at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BasketLine {
    pub product_id: Uuid,
    pub title: String,
    #[schema(value_type = String, example = "9.99")]
    pub price: BigDecimal,
    pub image_url: String,
    pub quantity: u32,
}

impl BasketLine {
    fn from_snapshot(snapshot: ProductSnapshot) -> Self {
        Self {
            product_id: snapshot.product_id,
            title: snapshot.title,
            price: snapshot.price,
            image_url: snapshot.image_url,
            quantity: 1,
        }
    }

    pub fn line_total(&self) -> BigDecimal {
        &self.price * &BigDecimal::from(self.quantity)
    }
}

/// Ordered basket lines, at most one per product, none with quantity 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Basket {
    lines: Vec<BasketLine>,
}

impl Basket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a basket from previously stored lines. Returns `None` when the
    /// lines break an invariant, so callers can discard them as a whole.
    pub fn from_lines(lines: Vec<BasketLine>) -> Option<Self> {
        let mut seen = HashSet::with_capacity(lines.len());
        for line in &lines {
            if line.quantity == 0
                || line.price < BigDecimal::zero()
                || !seen.insert(line.product_id)
            {
                return None;
            }
        }
        Some(Self { lines })
    }

    pub fn lines(&self) -> &[BasketLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Repeated adds of the same product accumulate one unit at a time.
    pub fn add(&mut self, snapshot: ProductSnapshot) {
        match self
            .lines
            .iter_mut()
            .find(|l| l.product_id == snapshot.product_id)
        {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(BasketLine::from_snapshot(snapshot)),
        }
    }

    pub fn remove(&mut self, product_id: Uuid) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Negative quantities clamp to zero, and zero removes the line.
    pub fn update_quantity(&mut self, product_id: Uuid, quantity: i64) {
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total_value(&self) -> BigDecimal {
        self.lines
            .iter()
            .fold(BigDecimal::zero(), |acc, l| acc + l.line_total())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn snap(price: &str) -> ProductSnapshot {
        ProductSnapshot {
            product_id: Uuid::new_v4(),
            title: "Ceramic Mug".to_string(),
            price: BigDecimal::from_str(price).unwrap(),
            image_url: "https://cdn.example.com/mug.jpg".to_string(),
        }
    }

    fn expected_total(basket: &Basket) -> BigDecimal {
        basket
            .lines()
            .iter()
            .map(|l| &l.price * &BigDecimal::from(l.quantity))
            .fold(BigDecimal::zero(), |a, b| a + b)
    }

    #[test]
    fn repeated_adds_accumulate_on_one_line() {
        let mut basket = Basket::new();
        let mug = snap("8.00");
        for _ in 0..5 {
            basket.add(mug.clone());
        }
        assert_eq!(basket.lines().len(), 1);
        assert_eq!(basket.lines()[0].quantity, 5);
        assert_eq!(basket.item_count(), 5);
    }

    #[test]
    fn new_products_append_in_order() {
        let mut basket = Basket::new();
        let a = snap("1.00");
        let b = snap("2.00");
        basket.add(a.clone());
        basket.add(b.clone());
        let ids: Vec<_> = basket.lines().iter().map(|l| l.product_id).collect();
        assert_eq!(ids, vec![a.product_id, b.product_id]);
    }

    #[test]
    fn update_to_zero_removes_line() {
        let mut basket = Basket::new();
        let mug = snap("8.00");
        basket.add(mug.clone());
        basket.update_quantity(mug.product_id, 0);
        assert!(basket.is_empty());
    }

    #[test]
    fn negative_quantity_clamps_and_removes() {
        let mut basket = Basket::new();
        let mug = snap("8.00");
        basket.add(mug.clone());
        basket.update_quantity(mug.product_id, -3);
        assert!(basket.lines().iter().all(|l| l.product_id != mug.product_id));
    }

    #[test]
    fn update_of_unknown_product_is_noop() {
        let mut basket = Basket::new();
        basket.add(snap("3.00"));
        let before = basket.clone();
        basket.update_quantity(Uuid::new_v4(), 4);
        assert_eq!(basket, before);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut basket = Basket::new();
        basket.add(snap("3.00"));
        let before = basket.clone();
        basket.remove(Uuid::new_v4());
        assert_eq!(basket, before);
    }

    #[test]
    fn total_tracks_every_mutation() {
        let mut basket = Basket::new();
        let a = snap("10.00");
        let b = snap("5.00");
        let c = snap("0.99");

        basket.add(a.clone());
        assert_eq!(basket.total_value(), expected_total(&basket));
        basket.add(a.clone());
        basket.add(b.clone());
        assert_eq!(basket.total_value(), BigDecimal::from_str("25.00").unwrap());
        basket.add(c.clone());
        basket.update_quantity(c.product_id, 3);
        assert_eq!(basket.total_value(), expected_total(&basket));
        basket.remove(a.product_id);
        assert_eq!(basket.total_value(), expected_total(&basket));
        basket.clear();
        assert_eq!(basket.total_value(), BigDecimal::zero());
    }

    #[test]
    fn from_lines_rejects_duplicates_and_zero_quantity() {
        let mut basket = Basket::new();
        basket.add(snap("1.00"));
        let mut lines = basket.lines().to_vec();
        lines.push(lines[0].clone());
        assert!(Basket::from_lines(lines).is_none());

        let mut zero = basket.lines().to_vec();
        zero[0].quantity = 0;
        assert!(Basket::from_lines(zero).is_none());

        assert_eq!(
            Basket::from_lines(basket.lines().to_vec()),
            Some(basket.clone())
        );
    }
}
