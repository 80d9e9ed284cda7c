use super::basket::BasketManager;
use super::gateway::OrderGateway;
use super::storage::LocalStorage;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderSubmission, ShippingAddress};
use crate::domain::pricing::{ShippingPolicy, Totals};

/// Subtotal, shipping and total for what is in the basket right now.
pub fn summary<S: LocalStorage>(basket: &BasketManager<S>, policy: &ShippingPolicy) -> Totals {
    policy.totals(basket.items())
}

/// Submit the basket as an order, once.
///
/// An empty basket or an invalid address fails before anything is sent. The
/// basket is cleared only when the server accepted the order; on any error
/// it is left as it was.
pub async fn submit<S, G>(
    basket: &mut BasketManager<S>,
    shipping_address: ShippingAddress,
    policy: &ShippingPolicy,
    gateway: &G,
) -> Result<Order, DomainError>
where
    S: LocalStorage,
    G: OrderGateway + ?Sized,
{
    if basket.is_empty() {
        return Err(DomainError::Validation("basket is empty".to_string()));
    }
    shipping_address.validate()?;

    let submission = OrderSubmission {
        lines: basket.items().to_vec(),
        shipping_address,
        totals: summary(basket, policy),
    };
    let order = gateway.submit(&submission).await?;
    log::info!("Order {} confirmed, clearing basket", order.id);
    basket.clear();
    Ok(order)
}
