pub mod order_service;
pub mod wishlist_service;
