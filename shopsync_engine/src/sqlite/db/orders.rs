use chrono::{DateTime, Utc};
use log::debug;
use sqlx::{FromRow, SqliteConnection};
use ssg_common::Cents;

use crate::{
    db_types::{FinancialStatus, LineItem, LocalOrder, NewLocalOrder, OrderId},
    traits::{DraftPromotion, OrderStoreError},
};

/// The raw `orders` row. Line items live in their own table and are attached by the caller.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct OrderRow {
    pub id: OrderId,
    pub user_id: String,
    pub customer_id: String,
    pub shopify_order_id: Option<String>,
    pub shopify_draft_order_id: Option<String>,
    pub order_number: Option<String>,
    pub total_price: Option<Cents>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    pub(crate) fn into_order(self, line_items: Vec<LineItem>) -> LocalOrder {
        LocalOrder {
            id: self.id,
            user_id: self.user_id,
            customer_id: self.customer_id,
            shopify_order_id: self.shopify_order_id,
            shopify_draft_order_id: self.shopify_draft_order_id,
            order_number: self.order_number,
            total_price: self.total_price,
            status: FinancialStatus::from(self.status),
            line_items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Inserts the order row with a freshly generated local id. Not atomic on its own; run it and
/// [`insert_line_items`] inside one transaction.
pub(crate) async fn insert_order(
    order: &NewLocalOrder,
    conn: &mut SqliteConnection,
) -> Result<OrderRow, OrderStoreError> {
    let id = OrderId::random();
    let row = sqlx::query_as(
        r#"
            INSERT INTO orders (
                id,
                user_id,
                customer_id,
                shopify_order_id,
                shopify_draft_order_id,
                order_number,
                total_price,
                status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(&order.user_id)
    .bind(&order.customer_id)
    .bind(&order.shopify_order_id)
    .bind(&order.shopify_draft_order_id)
    .bind(&order.order_number)
    .bind(order.total_price.map(|p| p.value()))
    .bind(order.status.to_string())
    .bind(order.created_at)
    .bind(order.updated_at)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

pub(crate) async fn insert_line_items(
    order_id: &OrderId,
    items: &[LineItem],
    conn: &mut SqliteConnection,
) -> Result<(), OrderStoreError> {
    for item in items {
        sqlx::query("INSERT INTO order_line_items (order_id, variant_id, quantity) VALUES ($1, $2, $3)")
            .bind(order_id.as_str())
            .bind(&item.variant_id)
            .bind(item.quantity)
            .execute(&mut *conn)
            .await?;
    }
    debug!("📝️ {} line items inserted for order [{order_id}]", items.len());
    Ok(())
}

pub(crate) async fn fetch_line_items(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Vec<LineItem>, OrderStoreError> {
    let items: Vec<(String, i64)> =
        sqlx::query_as("SELECT variant_id, quantity FROM order_line_items WHERE order_id = $1 ORDER BY id")
            .bind(order_id.as_str())
            .fetch_all(conn)
            .await?;
    Ok(items.into_iter().map(|(variant_id, quantity)| LineItem { variant_id, quantity }).collect())
}

pub(crate) async fn fetch_order_by_id(
    id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id.as_str()).fetch_optional(conn).await
}

/// Matches a remote identifier against both the real order id and the draft order id columns.
/// A draft may have been promoted since the caller recorded the id.
pub(crate) async fn fetch_order_by_remote_id(
    remote_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE shopify_order_id = $1 OR shopify_draft_order_id = $1 LIMIT 1")
        .bind(remote_id)
        .fetch_optional(conn)
        .await
}

pub(crate) async fn fetch_orders_for_user(
    user_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await
}

pub(crate) async fn fetch_orders_by_status_and_user(
    status: &FinancialStatus,
    user_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 AND status = $2 ORDER BY created_at DESC")
        .bind(user_id)
        .bind(status.to_string())
        .fetch_all(conn)
        .await
}

/// Sets the status in a single statement so concurrent writers to the same row cannot interleave
/// a read-modify-write.
pub(crate) async fn update_order_status(
    id: &OrderId,
    status: &FinancialStatus,
    conn: &mut SqliteConnection,
) -> Result<OrderRow, OrderStoreError> {
    let row: Option<OrderRow> =
        sqlx::query_as("UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *")
            .bind(status.to_string())
            .bind(id.as_str())
            .fetch_optional(conn)
            .await?;
    row.ok_or_else(|| OrderStoreError::OrderNotFound(id.clone()))
}

/// Promotes a draft-linked row to a real order. The real id is set and the draft id cleared in
/// the same statement; this is the only statement that nulls a draft id.
pub(crate) async fn promote_draft(
    id: &OrderId,
    promotion: &DraftPromotion,
    conn: &mut SqliteConnection,
) -> Result<OrderRow, OrderStoreError> {
    let row: Option<OrderRow> = sqlx::query_as(
        r#"
            UPDATE orders SET
                shopify_order_id = $1,
                shopify_draft_order_id = NULL,
                order_number = $2,
                total_price = $3,
                status = $4,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $5
            RETURNING *;
        "#,
    )
    .bind(&promotion.shopify_order_id)
    .bind(&promotion.order_number)
    .bind(promotion.total_price.map(|p| p.value()))
    .bind(promotion.status.to_string())
    .bind(id.as_str())
    .fetch_optional(conn)
    .await?;
    row.ok_or_else(|| OrderStoreError::OrderNotFound(id.clone()))
}
