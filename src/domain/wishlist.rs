use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;
use super::product::{require_non_blank, require_non_negative_price, ProductSnapshot};

/// A saved-for-later product. Membership is by `product_id` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WishlistItem {
    pub product_id: Uuid,
    pub title: String,
    #[schema(value_type = String, example = "24.00")]
    pub price: BigDecimal,
    pub image_url: String,
}

impl WishlistItem {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_non_blank("title", &self.title)?;
        require_non_negative_price(&self.price)
    }
}

impl From<ProductSnapshot> for WishlistItem {
    fn from(s: ProductSnapshot) -> Self {
        Self {
            product_id: s.product_id,
            title: s.title,
            price: s.price,
            image_url: s.image_url,
        }
    }
}

/// Add-to-set on a plain list: existing members are left as they are.
/// Returns whether the list changed.
pub fn insert_unique(items: &mut Vec<WishlistItem>, item: WishlistItem) -> bool {
    if contains(items, item.product_id) {
        return false;
    }
    items.push(item);
    true
}

pub fn remove_member(items: &mut Vec<WishlistItem>, product_id: Uuid) -> bool {
    let before = items.len();
    items.retain(|i| i.product_id != product_id);
    items.len() != before
}

pub fn contains(items: &[WishlistItem], product_id: Uuid) -> bool {
    items.iter().any(|i| i.product_id == product_id)
}
