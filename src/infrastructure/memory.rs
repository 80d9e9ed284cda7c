//! Process-local repositories backed by a mutex.
//!
//! Used by handler and service tests and for running the API without a
//! database. Every operation holds the lock for its whole read-modify-write,
//! so concurrent wishlist mutations for one user cannot lose updates.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderLine, OrderPage, OrderStatus};
use crate::domain::ports::{OrderRepository, WishlistRepository};
use crate::domain::wishlist::{insert_unique, remove_member, WishlistItem};

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, DomainError> {
    m.lock()
        .map_err(|_| DomainError::Transient("repository lock poisoned".to_string()))
}

#[derive(Default)]
struct WishlistState {
    users: HashSet<Uuid>,
    lists: HashMap<Uuid, Vec<WishlistItem>>,
}

#[derive(Default)]
pub struct InMemoryWishlistRepository {
    state: Mutex<WishlistState>,
}

impl InMemoryWishlistRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user so their wishlist can be read and mutated.
    pub fn register_user(&self, user_id: Uuid) {
        if let Ok(mut state) = self.state.lock() {
            state.users.insert(user_id);
        }
    }
}

impl WishlistRepository for InMemoryWishlistRepository {
    fn list(&self, user_id: Uuid) -> Result<Vec<WishlistItem>, DomainError> {
        let state = lock(&self.state)?;
        if !state.users.contains(&user_id) {
            return Err(DomainError::NotFound("User"));
        }
        Ok(state.lists.get(&user_id).cloned().unwrap_or_default())
    }

    fn add(&self, user_id: Uuid, item: WishlistItem) -> Result<Vec<WishlistItem>, DomainError> {
        let mut state = lock(&self.state)?;
        if !state.users.contains(&user_id) {
            return Err(DomainError::NotFound("User"));
        }
        let list = state.lists.entry(user_id).or_default();
        insert_unique(list, item);
        Ok(list.clone())
    }

    fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<Vec<WishlistItem>, DomainError> {
        let mut state = lock(&self.state)?;
        if !state.users.contains(&user_id) {
            return Err(DomainError::NotFound("User"));
        }
        let list = state.lists.entry(user_id).or_default();
        remove_member(list, product_id);
        Ok(list.clone())
    }
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let lines = order
            .lines
            .iter()
            .map(|l| {
                Ok(OrderLine {
                    id: Uuid::new_v4(),
                    product_id: l.product_id,
                    title: l.title.clone(),
                    quantity: i32::try_from(l.quantity).map_err(|_| {
                        DomainError::Validation(format!("quantity {} is too large", l.quantity))
                    })?,
                    unit_price: l.price.clone(),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        let created = Order {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            status: OrderStatus::Pending,
            shipping_address: order.shipping_address,
            totals: order.totals,
            created_at: Utc::now(),
            lines,
        };
        lock(&self.orders)?.push(created.clone());
        Ok(created)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(lock(&self.orders)?.iter().find(|o| o.id == id).cloned())
    }

    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let orders = lock(&self.orders)?;
        Ok(orders
            .iter()
            .rev()
            .filter(|o| o.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    fn list(&self, page: i64, limit: i64) -> Result<OrderPage, DomainError> {
        let orders = lock(&self.orders)?;
        let offset = page
            .saturating_sub(1)
            .max(0)
            .saturating_mul(limit);
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(0);
        let items = orders
            .iter()
            .rev()
            .skip(offset)
            .take(take)
            .map(|o| Order {
                lines: vec![],
                ..o.clone()
            })
            .collect();
        Ok(OrderPage {
            items,
            total: i64::try_from(orders.len()).unwrap_or(i64::MAX),
            page,
            limit,
        })
    }

    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>, DomainError> {
        let mut orders = lock(&self.orders)?;
        Ok(orders.iter_mut().find(|o| o.id == id).map(|o| {
            o.status = status;
            o.clone()
        }))
    }
}
