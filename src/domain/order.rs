use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::basket::BasketLine;
use super::errors::DomainError;
use super::pricing::Totals;
use super::product::{require_non_blank, require_non_negative_price};

/// Fulfilment status. Staff advance it one way only; there is no
/// cancellation or refund state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
        }
    }

    /// Staying put is allowed, moving backwards is not.
    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        next >= self
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            other => Err(DomainError::Validation(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub address: String,
    pub city: String,
    pub postcode: String,
}

impl ShippingAddress {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_non_blank("first_name", &self.first_name)?;
        require_non_blank("last_name", &self.last_name)?;
        require_non_blank("email", &self.email)?;
        require_non_blank("address", &self.address)?;
        require_non_blank("city", &self.city)?;
        require_non_blank("postcode", &self.postcode)?;
        if !self.email.contains('@') {
            return Err(DomainError::Validation(
                "email must be a valid address".to_string(),
            ));
        }
        Ok(())
    }
}

/// Checkout payload: the basket as the shopper saw it plus the totals the
/// client computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderSubmission {
    pub lines: Vec<BasketLine>,
    pub shipping_address: ShippingAddress,
    #[serde(flatten)]
    pub totals: Totals,
}

impl OrderSubmission {
    /// Structural checks that do not depend on pricing policy.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.lines.is_empty() {
            return Err(DomainError::Validation(
                "order must contain at least one line".to_string(),
            ));
        }
        for line in &self.lines {
            if line.quantity == 0 {
                return Err(DomainError::Validation(format!(
                    "quantity for {} must be at least 1",
                    line.product_id
                )));
            }
            require_non_negative_price(&line.price)?;
            require_non_blank("title", &line.title)?;
        }
        self.shipping_address.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub id: Uuid,
    pub product_id: Uuid,
    pub title: String,
    pub quantity: i32,
    #[schema(value_type = String, example = "9.99")]
    pub unit_price: BigDecimal,
}

/// Input to the order repository once the submission has been checked.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<Uuid>,
    pub lines: Vec<BasketLine>,
    pub shipping_address: ShippingAddress,
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub status: OrderStatus,
    pub shipping_address: ShippingAddress,
    #[serde(flatten)]
    pub totals: Totals,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderPage {
    pub items: Vec<Order>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}
