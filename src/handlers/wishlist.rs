use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::domain::wishlist::WishlistItem;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct RemoveWishlistParams {
    /// Product to drop from the wishlist.
    pub product_id: Option<Uuid>,
}

/// GET /api/user/wishlist
#[utoipa::path(
    get,
    path = "/api/user/wishlist",
    responses(
        (status = 200, description = "Current wishlist", body = [WishlistItem]),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found"),
    ),
    tag = "wishlist"
)]
pub async fn get_wishlist(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let items = web::block(move || state.wishlists.get(user.0)).await??;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/user/wishlist
///
/// Saving a product that is already on the list succeeds without changing
/// it. The response is always the full list after the call.
#[utoipa::path(
    post,
    path = "/api/user/wishlist",
    request_body = WishlistItem,
    responses(
        (status = 200, description = "Wishlist after the add", body = [WishlistItem]),
        (status = 400, description = "Invalid item"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found"),
    ),
    tag = "wishlist"
)]
pub async fn add_to_wishlist(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<WishlistItem>,
) -> Result<HttpResponse, AppError> {
    let item = body.into_inner();
    let items = web::block(move || state.wishlists.add(user.0, item)).await??;
    Ok(HttpResponse::Ok().json(items))
}

/// DELETE /api/user/wishlist?product_id={id}
#[utoipa::path(
    delete,
    path = "/api/user/wishlist",
    params(RemoveWishlistParams),
    responses(
        (status = 200, description = "Wishlist after the removal", body = [WishlistItem]),
        (status = 400, description = "Missing product_id"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found"),
    ),
    tag = "wishlist"
)]
pub async fn remove_from_wishlist(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<RemoveWishlistParams>,
) -> Result<HttpResponse, AppError> {
    let product_id = query
        .into_inner()
        .product_id
        .ok_or_else(|| AppError::BadRequest("product_id is required".to_string()))?;
    let items = web::block(move || state.wishlists.remove(user.0, product_id)).await??;
    Ok(HttpResponse::Ok().json(items))
}
