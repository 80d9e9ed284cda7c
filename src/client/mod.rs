//! Shopper-side state: the device-local basket, the cached wishlist and the
//! checkout flow that turns one into an order.

pub mod basket;
pub mod checkout;
pub mod gateway;
pub mod storage;
pub mod wishlist;

pub use basket::BasketManager;
pub use gateway::{HttpGateway, OrderGateway, WishlistGateway};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};
pub use wishlist::WishlistManager;
