use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::{AuthenticatedUser, MaybeUser};
use crate::domain::order::{Order, OrderSubmission};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/orders
///
/// Turns a checkout submission into a `pending` order. The order and its
/// lines are written in a single transaction. A valid session links the
/// order to the user; guests may check out too.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = OrderSubmission,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Invalid submission or totals mismatch"),
        (status = 401, description = "Session belongs to a user that no longer exists"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    user: MaybeUser,
    body: web::Json<OrderSubmission>,
) -> Result<HttpResponse, AppError> {
    let submission = body.into_inner();
    let order = web::block(move || state.orders.place_order(user.0, submission)).await??;
    Ok(HttpResponse::Created().json(order))
}

/// GET /api/orders
///
/// Order history of the session user, newest first.
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Orders of the current user", body = [Order]),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "orders"
)]
pub async fn list_my_orders(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || state.orders.orders_for_user(user.0)).await??;
    Ok(HttpResponse::Ok().json(orders))
}

/// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = web::block(move || state.orders.get_order(order_id)).await??;
    Ok(HttpResponse::Ok().json(order))
}
