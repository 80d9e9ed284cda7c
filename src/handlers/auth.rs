use actix_web::HttpResponse;
use serde_json::json;

use crate::auth::AuthenticatedUser;

/// GET /api/auth/check
#[utoipa::path(
    get,
    path = "/api/auth/check",
    responses(
        (status = 200, description = "Session is valid"),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "auth"
)]
pub async fn check(_user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Authenticated" }))
}
