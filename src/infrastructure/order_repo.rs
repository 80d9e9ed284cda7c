use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderLine, OrderPage, OrderStatus, ShippingAddress};
use crate::domain::ports::OrderRepository;
use crate::domain::pricing::Totals;
use crate::schema::{order_lines, orders, users};

use super::models::{NewOrderLineRow, NewOrderRow, OrderLineRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Transient(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Transient(e.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Transient(format!("stored document is malformed: {e}"))
    }
}

fn into_order(row: OrderRow, lines: Vec<OrderLineRow>) -> Result<Order, DomainError> {
    let shipping_address: ShippingAddress = serde_json::from_value(row.shipping_address)?;
    let status: OrderStatus = row
        .status
        .parse()
        .map_err(|_| DomainError::Transient(format!("unknown stored status '{}'", row.status)))?;
    Ok(Order {
        id: row.id,
        user_id: row.user_id,
        status,
        shipping_address,
        totals: Totals {
            subtotal: row.subtotal,
            shipping: row.shipping,
            total: row.total,
        },
        created_at: row.created_at,
        lines: lines
            .into_iter()
            .map(|l| OrderLine {
                id: l.id,
                product_id: l.product_id,
                title: l.title,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect(),
    })
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn load_order(conn: &mut PgConnection, id: Uuid) -> Result<Option<Order>, DomainError> {
        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = order_lines::table
            .filter(order_lines::order_id.eq(order.id))
            .select(OrderLineRow::as_select())
            .order(order_lines::position.asc())
            .load(conn)?;

        into_order(order, lines).map(Some)
    }

    fn load_with_lines(
        conn: &mut PgConnection,
        rows: Vec<OrderRow>,
    ) -> Result<Vec<Order>, DomainError> {
        let lines = OrderLineRow::belonging_to(&rows)
            .select(OrderLineRow::as_select())
            .order(order_lines::position.asc())
            .load(conn)?
            .grouped_by(&rows);
        rows.into_iter()
            .zip(lines)
            .map(|(row, lines)| into_order(row, lines))
            .collect()
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;
        let shipping_address = serde_json::to_value(&order.shipping_address)?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // A session can outlive its user row.
            if let Some(user_id) = order.user_id {
                let known = users::table
                    .filter(users::id.eq(user_id))
                    .select(users::id)
                    .first::<Uuid>(conn)
                    .optional()?;
                if known.is_none() {
                    log::warn!("Order submitted for unknown user {}", user_id);
                    return Err(DomainError::Unauthenticated);
                }
            }

            // 1. Insert the order
            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    user_id: order.user_id,
                    status: OrderStatus::Pending.as_str().to_string(),
                    shipping_address,
                    subtotal: order.totals.subtotal.clone(),
                    shipping: order.totals.shipping.clone(),
                    total: order.totals.total.clone(),
                })
                .execute(conn)?;

            // 2. Insert order lines
            let new_lines = order
                .lines
                .iter()
                .enumerate()
                .map(|(position, l)| {
                    Ok(NewOrderLineRow {
                        id: Uuid::new_v4(),
                        order_id,
                        product_id: l.product_id,
                        title: l.title.clone(),
                        quantity: i32::try_from(l.quantity).map_err(|_| {
                            DomainError::Validation(format!(
                                "quantity {} is too large",
                                l.quantity
                            ))
                        })?,
                        unit_price: l.price.clone(),
                        position: i32::try_from(position).map_err(|_| {
                            DomainError::Validation("too many order lines".to_string())
                        })?,
                    })
                })
                .collect::<Result<Vec<_>, DomainError>>()?;
            diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .execute(conn)?;

            Self::load_order(conn, order_id)?.ok_or(DomainError::NotFound("Order"))
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        Self::load_order(&mut conn, id)
    }

    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .order(orders::created_at.desc())
            .load(&mut conn)?;

        Self::load_with_lines(&mut conn, rows)
    }

    fn list(&self, page: i64, limit: i64) -> Result<OrderPage, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = page.saturating_sub(1).max(0).saturating_mul(limit);
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;

            let rows = orders::table
                .select(OrderRow::as_select())
                .order(orders::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(OrderPage {
                items: rows
                    .into_iter()
                    .map(|o| into_order(o, vec![]))
                    .collect::<Result<_, _>>()?,
                total,
                page,
                limit,
            })
        })
    }

    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(orders::table.filter(orders::id.eq(id)))
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Ok(None);
        }

        Self::load_order(&mut conn, id)
    }
}
