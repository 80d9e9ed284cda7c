use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderPage, OrderStatus, OrderSubmission};
use crate::domain::ports::OrderRepository;
use crate::domain::pricing::ShippingPolicy;

pub struct OrderService<R> {
    repo: R,
    shipping: ShippingPolicy,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            shipping: ShippingPolicy::default(),
        }
    }

    /// Persist a checkout submission as a `pending` order.
    ///
    /// Totals are recomputed from the submitted lines and must agree with
    /// what the client showed the shopper. Submitting the same payload twice
    /// creates two orders.
    pub fn place_order(
        &self,
        user_id: Option<Uuid>,
        submission: OrderSubmission,
    ) -> Result<Order, DomainError> {
        submission.validate()?;

        let expected = self.shipping.totals(&submission.lines);
        if expected != submission.totals {
            return Err(DomainError::Validation(format!(
                "totals do not match basket: expected total {}, got {}",
                expected.total, submission.totals.total
            )));
        }

        let order = self.repo.create(NewOrder {
            user_id,
            lines: submission.lines,
            shipping_address: submission.shipping_address,
            totals: expected,
        })?;
        log::info!(
            "Created order {} with {} line(s), total {}",
            order.id,
            order.lines.len(),
            order.totals.total
        );
        Ok(order)
    }

    pub fn get_order(&self, id: Uuid) -> Result<Order, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("Order"))
    }

    pub fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        self.repo.list_for_user(user_id)
    }

    pub fn list_orders(&self, page: i64, limit: i64) -> Result<OrderPage, DomainError> {
        self.repo.list(page.max(1), limit.clamp(1, 100))
    }

    pub fn advance_status(&self, id: Uuid, next: OrderStatus) -> Result<Order, DomainError> {
        let current = self.get_order(id)?;
        if !current.status.can_advance_to(next) {
            return Err(DomainError::Validation(format!(
                "cannot move order from {} back to {}",
                current.status, next
            )));
        }
        if current.status == next {
            return Ok(current);
        }
        let updated = self
            .repo
            .update_status(id, next)?
            .ok_or(DomainError::NotFound("Order"))?;
        log::info!("Order {} moved from {} to {}", id, current.status, next);
        Ok(updated)
    }
}
