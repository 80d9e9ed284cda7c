use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::Admin;
use crate::domain::order::{Order, OrderPage, OrderStatus};
use crate::errors::AppError;
use crate::state::AppState;

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub order_id: Uuid,
    pub status: OrderStatus,
}

/// GET /api/admin/orders
///
/// All orders, newest first, without their lines.
#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Paginated list of orders", body = OrderPage),
        (status = 401, description = "Missing or wrong admin password"),
    ),
    tag = "admin"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    _admin: Admin,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = web::block(move || state.orders.list_orders(params.page, params.limit)).await??;
    Ok(HttpResponse::Ok().json(page))
}

/// PUT /api/admin/orders
///
/// Move an order forward through `pending → processing → shipped →
/// delivered`. Setting the current status again is a no-op.
#[utoipa::path(
    put,
    path = "/api/admin/orders",
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 400, description = "Status would move backwards"),
        (status = 401, description = "Missing or wrong admin password"),
        (status = 404, description = "Order not found"),
    ),
    tag = "admin"
)]
pub async fn update_order_status(
    state: web::Data<AppState>,
    _admin: Admin,
    body: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let UpdateOrderStatusRequest { order_id, status } = body.into_inner();
    let order = web::block(move || state.orders.advance_status(order_id, status)).await??;
    Ok(HttpResponse::Ok().json(order))
}
