use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::wishlist::WishlistItem;
use crate::schema::{order_lines, orders, wishlist_items};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = wishlist_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WishlistItemRow {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub title: String,
    pub price: BigDecimal,
    pub image_url: String,
    pub added_at: DateTime<Utc>,
}

impl From<WishlistItemRow> for WishlistItem {
    fn from(r: WishlistItemRow) -> Self {
        Self {
            product_id: r.product_id,
            title: r.title,
            price: r.price,
            image_url: r.image_url,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = wishlist_items)]
pub struct NewWishlistItemRow {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub title: String,
    pub price: BigDecimal,
    pub image_url: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub status: String,
    pub shipping_address: Value,
    pub subtotal: BigDecimal,
    pub shipping: BigDecimal,
    pub total: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub status: String,
    pub shipping_address: Value,
    pub subtotal: BigDecimal,
    pub shipping: BigDecimal,
    pub total: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub title: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub title: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    /// Index of the line in the submitted basket.
    pub position: i32,
}
