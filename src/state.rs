use std::sync::Arc;

use crate::application::order_service::OrderService;
use crate::application::wishlist_service::WishlistService;
use crate::auth::{AdminPassword, SessionSigner};
use crate::domain::ports::{OrderRepository, WishlistRepository};

pub type DynOrderService = OrderService<Arc<dyn OrderRepository>>;
pub type DynWishlistService = WishlistService<Arc<dyn WishlistRepository>>;

/// Everything request handlers share. Built once at startup and handed to
/// actix as `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<DynOrderService>,
    pub wishlists: Arc<DynWishlistService>,
    pub sessions: SessionSigner,
    pub admin_password: AdminPassword,
}

impl AppState {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        wishlists: Arc<dyn WishlistRepository>,
        sessions: SessionSigner,
        admin_password: AdminPassword,
    ) -> Self {
        Self {
            orders: Arc::new(OrderService::new(orders)),
            wishlists: Arc::new(WishlistService::new(wishlists)),
            sessions,
            admin_password,
        }
    }
}
