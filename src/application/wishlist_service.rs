use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::WishlistRepository;
use crate::domain::wishlist::WishlistItem;

pub struct WishlistService<R> {
    repo: R,
}

impl<R: WishlistRepository> WishlistService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get(&self, user_id: Uuid) -> Result<Vec<WishlistItem>, DomainError> {
        self.repo.list(user_id)
    }

    /// Adding a product that is already saved is a successful no-op.
    pub fn add(&self, user_id: Uuid, item: WishlistItem) -> Result<Vec<WishlistItem>, DomainError> {
        item.validate()?;
        self.repo.add(user_id, item)
    }

    pub fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<Vec<WishlistItem>, DomainError> {
        self.repo.remove(user_id, product_id)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Arc;
    use std::thread;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::infrastructure::memory::InMemoryWishlistRepository;

    fn item(title: &str) -> WishlistItem {
        WishlistItem {
            product_id: Uuid::new_v4(),
            title: title.to_string(),
            price: BigDecimal::from_str("18.00").expect("valid decimal"),
            image_url: "https://cdn.example.com/item.jpg".to_string(),
        }
    }

    fn service_with_user() -> (WishlistService<Arc<InMemoryWishlistRepository>>, Uuid) {
        let repo = Arc::new(InMemoryWishlistRepository::new());
        let user = Uuid::new_v4();
        repo.register_user(user);
        (WishlistService::new(repo), user)
    }

    #[test]
    fn add_twice_keeps_one_entry() {
        let (service, user) = service_with_user();
        let vase = item("Vase");

        service.add(user, vase.clone()).expect("first add");
        let list = service.add(user, vase.clone()).expect("second add");

        assert_eq!(list, vec![vase]);
    }

    #[test]
    fn remove_absent_returns_unchanged_list() {
        let (service, user) = service_with_user();
        let lamp = item("Lamp");
        service.add(user, lamp.clone()).expect("add");

        let list = service.remove(user, Uuid::new_v4()).expect("remove");
        assert_eq!(list, vec![lamp]);
    }

    #[test]
    fn unknown_user_is_not_found() {
        let (service, _) = service_with_user();
        assert!(matches!(
            service.get(Uuid::new_v4()),
            Err(DomainError::NotFound("User"))
        ));
    }

    #[test]
    fn invalid_item_is_rejected_before_storage() {
        let (service, user) = service_with_user();
        let mut bad = item("Rug");
        bad.price = BigDecimal::from_str("-3").expect("valid decimal");

        assert!(matches!(
            service.add(user, bad),
            Err(DomainError::Validation(_))
        ));
        assert!(service.get(user).expect("list").is_empty());
    }

    #[test]
    fn concurrent_adds_for_one_user_all_land() {
        let (service, user) = service_with_user();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    service
                        .add(user, item(&format!("Item {i}")))
                        .expect("add");
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread");
        }

        assert_eq!(service.get(user).expect("list").len(), 8);
    }
}
