use std::time::Duration;

use bigdecimal::BigDecimal;
use tokio::time::Instant;
use uuid::Uuid;

use super::storage::LocalStorage;
use crate::domain::basket::{Basket, BasketLine};
use crate::domain::product::ProductSnapshot;

pub const BASKET_KEY: &str = "basket";

/// How long the "added to basket" preview stays up after the latest add.
pub const PREVIEW_DURATION: Duration = Duration::from_secs(3);

/// Device-local basket. Read once from storage on construction and written
/// back after every mutation.
///
/// Storage is best-effort: anything unreadable starts an empty basket and
/// failed writes are logged, never returned.
pub struct BasketManager<S: LocalStorage> {
    storage: S,
    basket: Basket,
    preview_until: Option<Instant>,
}

impl<S: LocalStorage> BasketManager<S> {
    pub fn new(storage: S) -> Self {
        let basket = load(&storage);
        Self {
            storage,
            basket,
            preview_until: None,
        }
    }

    pub fn add(&mut self, snapshot: ProductSnapshot) {
        self.basket.add(snapshot);
        self.preview_until = Some(Instant::now() + PREVIEW_DURATION);
        self.persist();
    }

    pub fn remove(&mut self, product_id: Uuid) {
        self.basket.remove(product_id);
        self.persist();
    }

    pub fn update_quantity(&mut self, product_id: Uuid, quantity: i64) {
        self.basket.update_quantity(product_id, quantity);
        self.persist();
    }

    pub fn clear(&mut self) {
        self.basket.clear();
        self.persist();
    }

    pub fn total_value(&self) -> BigDecimal {
        self.basket.total_value()
    }

    pub fn items(&self) -> &[BasketLine] {
        self.basket.lines()
    }

    pub fn item_count(&self) -> u64 {
        self.basket.item_count()
    }

    pub fn is_empty(&self) -> bool {
        self.basket.is_empty()
    }

    pub fn preview_visible(&self) -> bool {
        self.preview_until
            .is_some_and(|deadline| Instant::now() < deadline)
    }

    pub fn dismiss_preview(&mut self) {
        self.preview_until = None;
    }

    fn persist(&self) {
        let json = match serde_json::to_string(self.basket.lines()) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not serialize basket: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(BASKET_KEY, &json) {
            log::warn!("Could not persist basket: {e}");
        }
    }
}

fn load<S: LocalStorage>(storage: &S) -> Basket {
    let raw = match storage.get_item(BASKET_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Basket::new(),
        Err(e) => {
            log::warn!("Basket storage unavailable, starting empty: {e}");
            return Basket::new();
        }
    };
    let lines: Vec<BasketLine> = match serde_json::from_str(&raw) {
        Ok(lines) => lines,
        Err(e) => {
            log::warn!("Discarding unreadable basket: {e}");
            return Basket::new();
        }
    };
    Basket::from_lines(lines).unwrap_or_else(|| {
        log::warn!("Discarding stored basket with duplicate or invalid lines");
        Basket::new()
    })
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::str::FromStr;

    use super::*;
    use crate::client::storage::{FileStorage, MemoryStorage};
    use crate::domain::product::Product;

    fn snap(price: &str) -> ProductSnapshot {
        ProductSnapshot {
            product_id: Uuid::new_v4(),
            title: "Linen Napkins".to_string(),
            price: BigDecimal::from_str(price).unwrap(),
            image_url: "https://cdn.example.com/napkins.jpg".to_string(),
        }
    }

    struct BrokenStorage;

    impl LocalStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> io::Result<Option<String>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }

        fn set_item(&self, _key: &str, _value: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn adds_accumulate_and_persist() {
        let storage = MemoryStorage::new();
        let napkins = snap("6.50");
        {
            let mut basket = BasketManager::new(&storage);
            for _ in 0..3 {
                basket.add(napkins.clone());
            }
            assert_eq!(basket.items().len(), 1);
            assert_eq!(basket.item_count(), 3);
            assert_eq!(basket.total_value(), BigDecimal::from_str("19.50").unwrap());
        }

        let reloaded = BasketManager::new(&storage);
        assert_eq!(reloaded.items().len(), 1);
        assert_eq!(reloaded.items()[0].quantity, 3);
        assert_eq!(reloaded.items()[0].price, napkins.price);
    }

    #[test]
    fn quantity_zero_removes_and_is_persisted() {
        let storage = MemoryStorage::new();
        let a = snap("1.00");
        let b = snap("2.00");
        let mut basket = BasketManager::new(&storage);
        basket.add(a.clone());
        basket.add(b.clone());
        basket.update_quantity(a.product_id, 0);
        basket.update_quantity(b.product_id, 4);

        let reloaded = BasketManager::new(&storage);
        assert_eq!(reloaded.items().len(), 1);
        assert_eq!(reloaded.items()[0].product_id, b.product_id);
        assert_eq!(reloaded.item_count(), 4);
    }

    #[test]
    fn clear_empties_storage_too() {
        let storage = MemoryStorage::new();
        let mut basket = BasketManager::new(&storage);
        basket.add(snap("3.00"));
        basket.clear();
        assert!(basket.is_empty());
        assert!(BasketManager::new(&storage).is_empty());
        assert_eq!(storage.get_item(BASKET_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn corrupt_storage_starts_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(BASKET_KEY, "{not json").unwrap();
        assert!(BasketManager::new(&storage).is_empty());

        storage
            .set_item(BASKET_KEY, r#"[{"id":"old-shape","qty":2}]"#)
            .unwrap();
        assert!(BasketManager::new(&storage).is_empty());
    }

    #[test]
    fn stored_lines_breaking_invariants_are_discarded() {
        let storage = MemoryStorage::new();
        let line = BasketLine {
            product_id: Uuid::new_v4(),
            title: "Dup".to_string(),
            price: BigDecimal::from(1),
            image_url: "https://cdn.example.com/d.jpg".to_string(),
            quantity: 1,
        };
        let json = serde_json::to_string(&vec![line.clone(), line]).unwrap();
        storage.set_item(BASKET_KEY, &json).unwrap();
        assert!(BasketManager::new(&storage).is_empty());
    }

    #[test]
    fn unavailable_storage_is_not_an_error() {
        let mut basket = BasketManager::new(BrokenStorage);
        assert!(basket.is_empty());
        basket.add(snap("5.00"));
        assert_eq!(basket.item_count(), 1);
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = std::env::temp_dir().join(format!("basket-{}", Uuid::new_v4()));
        let item = snap("12.25");
        {
            let mut basket = BasketManager::new(FileStorage::new(&dir));
            basket.add(item.clone());
            basket.add(item.clone());
        }
        let basket = BasketManager::new(FileStorage::new(&dir));
        assert_eq!(basket.item_count(), 2);
        assert_eq!(basket.total_value(), BigDecimal::from_str("24.50").unwrap());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn later_catalog_price_change_does_not_touch_basket() {
        let mut product = Product {
            id: Uuid::new_v4(),
            title: "Oak Board".to_string(),
            description: "Serving board".to_string(),
            price: BigDecimal::from(30),
            image_url: "https://cdn.example.com/board.jpg".to_string(),
            stock: 4,
        };
        let mut basket = BasketManager::new(MemoryStorage::new());
        basket.add(product.snapshot());
        product.price = BigDecimal::from(45);
        assert_eq!(basket.total_value(), BigDecimal::from(30));
    }

    #[tokio::test(start_paused = true)]
    async fn preview_hides_three_seconds_after_latest_add() {
        let item = snap("2.00");
        let mut basket = BasketManager::new(MemoryStorage::new());
        assert!(!basket.preview_visible());

        basket.add(item.clone());
        assert!(basket.preview_visible());

        tokio::time::advance(Duration::from_secs(2)).await;
        basket.add(item.clone());
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(basket.preview_visible());

        tokio::time::advance(Duration::from_millis(1001)).await;
        assert!(!basket.preview_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_hides_preview_immediately() {
        let mut basket = BasketManager::new(MemoryStorage::new());
        basket.add(snap("2.00"));
        basket.dismiss_preview();
        assert!(!basket.preview_visible());
        basket.remove(Uuid::new_v4());
        assert_eq!(basket.item_count(), 1);
    }
}
