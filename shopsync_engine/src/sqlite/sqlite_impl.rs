//! `SqliteDatabase` is the bundled [`OrderStore`] backend.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{self, orders, user_links};
use crate::{
    db_types::{FinancialStatus, LocalOrder, NewLocalOrder, OrderId},
    traits::{DraftPromotion, OrderStore, OrderStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, OrderStoreError> {
        let pool = db::new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// Connects using `SSG_DATABASE_URL`, or the default database path if unset.
    pub async fn new_default(max_connections: u32) -> Result<Self, OrderStoreError> {
        Self::new_with_url(&db::db_url(), max_connections).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Runs the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), OrderStoreError> {
        sqlx::migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| OrderStoreError::DatabaseError(e.to_string()))?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    async fn attach_line_items(
        &self,
        rows: Vec<orders::OrderRow>,
        conn: &mut sqlx::SqliteConnection,
    ) -> Result<Vec<LocalOrder>, OrderStoreError> {
        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let items = orders::fetch_line_items(&row.id, conn).await?;
            result.push(row.into_order(items));
        }
        Ok(result)
    }
}

impl OrderStore for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_order(&self, order: NewLocalOrder) -> Result<LocalOrder, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let row = orders::insert_order(&order, &mut tx).await?;
        orders::insert_line_items(&row.id, &order.line_items, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order [{}] saved for user {}", row.id, row.user_id);
        Ok(row.into_order(order.line_items))
    }

    async fn fetch_order_by_id(&self, id: &OrderId) -> Result<Option<LocalOrder>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        match orders::fetch_order_by_id(id, &mut conn).await? {
            Some(row) => {
                let items = orders::fetch_line_items(&row.id, &mut conn).await?;
                Ok(Some(row.into_order(items)))
            },
            None => Ok(None),
        }
    }

    async fn fetch_order_by_remote_id(&self, remote_id: &str) -> Result<Option<LocalOrder>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        match orders::fetch_order_by_remote_id(remote_id, &mut conn).await? {
            Some(row) => {
                let items = orders::fetch_line_items(&row.id, &mut conn).await?;
                Ok(Some(row.into_order(items)))
            },
            None => Ok(None),
        }
    }

    async fn fetch_orders_for_user(&self, user_id: &str) -> Result<Vec<LocalOrder>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let rows = orders::fetch_orders_for_user(user_id, &mut conn).await?;
        self.attach_line_items(rows, &mut conn).await
    }

    async fn fetch_orders_by_status_and_user(
        &self,
        status: &FinancialStatus,
        user_id: &str,
    ) -> Result<Vec<LocalOrder>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let rows = orders::fetch_orders_by_status_and_user(status, user_id, &mut conn).await?;
        self.attach_line_items(rows, &mut conn).await
    }

    async fn update_order_status(&self, id: &OrderId, status: &FinancialStatus) -> Result<LocalOrder, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let row = orders::update_order_status(id, status, &mut conn).await?;
        let items = orders::fetch_line_items(&row.id, &mut conn).await?;
        debug!("🗃️ Order [{id}] status set to {status}");
        Ok(row.into_order(items))
    }

    async fn promote_draft_order(
        &self,
        id: &OrderId,
        promotion: &DraftPromotion,
    ) -> Result<LocalOrder, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let row = orders::promote_draft(id, promotion, &mut conn).await?;
        let items = orders::fetch_line_items(&row.id, &mut conn).await?;
        debug!("🗃️ Order [{id}] promoted to remote order {}", promotion.shopify_order_id);
        Ok(row.into_order(items))
    }

    async fn customer_id_for_user(&self, user_id: &str) -> Result<Option<String>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(user_links::customer_id_for_user(user_id, &mut conn).await?)
    }

    async fn link_customer(&self, user_id: &str, customer_id: &str) -> Result<(), OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        user_links::link_customer(user_id, customer_id, &mut conn).await?;
        debug!("🗃️ User {user_id} linked to remote customer {customer_id}");
        Ok(())
    }
}
