use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;

/// Catalog entry. Only read here to take snapshots from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: BigDecimal,
    pub image_url: String,
    pub stock: i32,
}

impl Product {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_non_blank("title", &self.title)?;
        require_non_blank("description", &self.description)?;
        require_non_negative_price(&self.price)?;
        if !(self.image_url.starts_with("http://") || self.image_url.starts_with("https://")) {
            return Err(DomainError::Validation(
                "image_url must be an http(s) URL".to_string(),
            ));
        }
        if self.stock < 0 {
            return Err(DomainError::Validation(
                "stock cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Copy the display fields as they are right now. Later catalog edits do
    /// not propagate to the copy.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            product_id: self.id,
            title: self.title.clone(),
            price: self.price.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// Denormalized product display fields, frozen at the time a shopper added
/// the product to a basket or wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSnapshot {
    pub product_id: Uuid,
    pub title: String,
    #[schema(value_type = String, example = "9.99")]
    pub price: BigDecimal,
    pub image_url: String,
}

pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn require_non_negative_price(price: &BigDecimal) -> Result<(), DomainError> {
    if price < &BigDecimal::zero() {
        return Err(DomainError::Validation(
            "price cannot be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn product() -> Product {
        Product {
            id: Uuid::new_v4(),
            title: "Linen Tote".to_string(),
            description: "Natural linen".to_string(),
            price: BigDecimal::from_str("12.50").unwrap(),
            image_url: "https://cdn.example.com/tote.jpg".to_string(),
            stock: 4,
        }
    }

    #[test]
    fn valid_product_passes() {
        assert!(product().validate().is_ok());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut p = product();
        p.price = BigDecimal::from_str("-0.01").unwrap();
        assert!(matches!(p.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn non_http_image_url_is_rejected() {
        let mut p = product();
        p.image_url = "ftp://cdn.example.com/tote.jpg".to_string();
        assert!(matches!(p.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn snapshot_is_detached_from_catalog() {
        let mut p = product();
        let snap = p.snapshot();
        p.price = BigDecimal::from_str("99.00").unwrap();
        p.title = "Renamed".to_string();
        assert_eq!(snap.price, BigDecimal::from_str("12.50").unwrap());
        assert_eq!(snap.title, "Linen Tote");
    }
}
