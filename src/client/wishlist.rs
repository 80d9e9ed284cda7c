use uuid::Uuid;

use super::gateway::WishlistGateway;
use crate::domain::errors::DomainError;
use crate::domain::wishlist::{contains, WishlistItem};

/// Cached copy of the signed-in user's wishlist.
///
/// The server owns the list. Each mutation replaces the cache with the list
/// the server sends back, so the cache never diverges from a merge.
pub struct WishlistManager<G: WishlistGateway> {
    gateway: G,
    items: Vec<WishlistItem>,
}

impl<G: WishlistGateway> WishlistManager<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            items: Vec::new(),
        }
    }

    /// A signed-out user simply has an empty wishlist.
    pub async fn load(&mut self) -> Result<(), DomainError> {
        match self.gateway.fetch().await {
            Ok(items) => self.items = items,
            Err(DomainError::Unauthenticated) => {
                log::debug!("No session, wishlist left empty");
                self.items.clear();
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    pub async fn add(&mut self, item: WishlistItem) -> Result<(), DomainError> {
        item.validate()?;
        self.items = self.gateway.add(&item).await?;
        Ok(())
    }

    pub async fn remove(&mut self, product_id: Uuid) -> Result<(), DomainError> {
        self.items = self.gateway.remove(product_id).await?;
        Ok(())
    }

    pub fn is_member(&self, product_id: Uuid) -> bool {
        contains(&self.items, product_id)
    }

    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    /// Drop the cache on logout.
    pub fn reset(&mut self) {
        self.items.clear();
    }
}
