pub mod admin;
pub mod auth;
pub mod orders;
pub mod wishlist;
