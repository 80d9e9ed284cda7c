use utoipa::OpenApi;

use crate::domain::basket::BasketLine;
use crate::domain::order::{
    Order, OrderLine, OrderPage, OrderStatus, OrderSubmission, ShippingAddress,
};
use crate::domain::pricing::Totals;
use crate::domain::wishlist::WishlistItem;
use crate::handlers;
use crate::handlers::admin::UpdateOrderStatusRequest;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::wishlist::get_wishlist,
        handlers::wishlist::add_to_wishlist,
        handlers::wishlist::remove_from_wishlist,
        handlers::orders::create_order,
        handlers::orders::list_my_orders,
        handlers::orders::get_order,
        handlers::admin::list_orders,
        handlers::admin::update_order_status,
        handlers::auth::check,
    ),
    components(schemas(
        BasketLine,
        Order,
        OrderLine,
        OrderPage,
        OrderStatus,
        OrderSubmission,
        ShippingAddress,
        Totals,
        UpdateOrderStatusRequest,
        WishlistItem,
    )),
    tags(
        (name = "wishlist", description = "Per-user saved products"),
        (name = "orders", description = "Checkout and order history"),
        (name = "admin", description = "Back-office order management"),
        (name = "auth", description = "Session checks"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        for expected in [
            "/api/user/wishlist",
            "/api/orders",
            "/api/orders/{id}",
            "/api/admin/orders",
            "/api/auth/check",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}");
        }
    }
}
