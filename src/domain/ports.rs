use uuid::Uuid;

use super::errors::DomainError;
use super::order::{NewOrder, Order, OrderPage, OrderStatus};
use super::wishlist::WishlistItem;

pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    /// Orders placed by `user_id`, newest first, with their lines.
    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError>;
    /// All orders, newest first, without their lines.
    fn list(&self, page: i64, limit: i64) -> Result<OrderPage, DomainError>;
    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>, DomainError>;
}

/// Per-user wishlist storage. Mutations are set operations applied
/// atomically against the stored list and return the list as it stands
/// afterwards.
pub trait WishlistRepository: Send + Sync + 'static {
    fn list(&self, user_id: Uuid) -> Result<Vec<WishlistItem>, DomainError>;
    fn add(&self, user_id: Uuid, item: WishlistItem) -> Result<Vec<WishlistItem>, DomainError>;
    fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<Vec<WishlistItem>, DomainError>;
}

impl<T: OrderRepository + ?Sized> OrderRepository for std::sync::Arc<T> {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        (**self).create(order)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        (**self).find_by_id(id)
    }

    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        (**self).list_for_user(user_id)
    }

    fn list(&self, page: i64, limit: i64) -> Result<OrderPage, DomainError> {
        (**self).list(page, limit)
    }

    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>, DomainError> {
        (**self).update_status(id, status)
    }
}

impl<T: WishlistRepository + ?Sized> WishlistRepository for std::sync::Arc<T> {
    fn list(&self, user_id: Uuid) -> Result<Vec<WishlistItem>, DomainError> {
        (**self).list(user_id)
    }

    fn add(&self, user_id: Uuid, item: WishlistItem) -> Result<Vec<WishlistItem>, DomainError> {
        (**self).add(user_id, item)
    }

    fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<Vec<WishlistItem>, DomainError> {
        (**self).remove(user_id, product_id)
    }
}
