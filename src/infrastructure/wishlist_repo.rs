use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::WishlistRepository;
use crate::domain::wishlist::WishlistItem;
use crate::schema::{users, wishlist_items};

use super::models::{NewWishlistItemRow, WishlistItemRow};

/// Wishlist storage keyed by `(user_id, product_id)`.
///
/// Add and remove are single set statements (`ON CONFLICT DO NOTHING` /
/// `DELETE`), so two requests for the same user racing each other both take
/// effect instead of one overwriting the other's list.
pub struct DieselWishlistRepository {
    pool: DbPool,
}

impl DieselWishlistRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn ensure_user(conn: &mut PgConnection, user_id: Uuid) -> Result<(), DomainError> {
    users::table
        .filter(users::id.eq(user_id))
        .select(users::id)
        .first::<Uuid>(conn)
        .optional()?
        .map(|_| ())
        .ok_or(DomainError::NotFound("User"))
}

fn load_items(conn: &mut PgConnection, user_id: Uuid) -> Result<Vec<WishlistItem>, DomainError> {
    Ok(wishlist_items::table
        .filter(wishlist_items::user_id.eq(user_id))
        .select(WishlistItemRow::as_select())
        .order((wishlist_items::added_at.asc(), wishlist_items::product_id.asc()))
        .load(conn)?
        .into_iter()
        .map(WishlistItem::from)
        .collect())
}

impl WishlistRepository for DieselWishlistRepository {
    fn list(&self, user_id: Uuid) -> Result<Vec<WishlistItem>, DomainError> {
        let mut conn = self.pool.get()?;
        ensure_user(&mut conn, user_id)?;
        load_items(&mut conn, user_id)
    }

    fn add(&self, user_id: Uuid, item: WishlistItem) -> Result<Vec<WishlistItem>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            ensure_user(conn, user_id)?;
            let inserted = diesel::insert_into(wishlist_items::table)
                .values(&NewWishlistItemRow {
                    user_id,
                    product_id: item.product_id,
                    title: item.title,
                    price: item.price,
                    image_url: item.image_url,
                })
                .on_conflict((wishlist_items::user_id, wishlist_items::product_id))
                .do_nothing()
                .execute(conn)?;
            if inserted == 0 {
                log::debug!(
                    "Product {} already on wishlist of user {}",
                    item.product_id,
                    user_id
                );
            }
            load_items(conn, user_id)
        })
    }

    fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<Vec<WishlistItem>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            ensure_user(conn, user_id)?;
            diesel::delete(
                wishlist_items::table
                    .filter(wishlist_items::user_id.eq(user_id))
                    .filter(wishlist_items::product_id.eq(product_id)),
            )
            .execute(conn)?;
            load_items(conn, user_id)
        })
    }
}
