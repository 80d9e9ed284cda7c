pub mod memory;
pub mod models;
pub mod order_repo;
pub mod wishlist_repo;

#[cfg(test)]
pub(crate) mod test_support;
