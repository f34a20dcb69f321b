use thiserror::Error;

use crate::{
    db_types::{FinancialStatus, LocalOrder, NewLocalOrder, OrderId},
    traits::DraftPromotion,
};

/// The persistence boundary for [`LocalOrder`] records.
///
/// Records are never physically deleted by the engine. Status updates and draft promotions are
/// single atomic statements so that a sync pass and a webhook racing on the same row cannot lose
/// each other's writes.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// The URL of the backing store.
    fn url(&self) -> &str;

    /// Persists a new order and its line items in one transaction, assigning the local id.
    async fn insert_order(&self, order: NewLocalOrder) -> Result<LocalOrder, OrderStoreError>;

    async fn fetch_order_by_id(&self, id: &OrderId) -> Result<Option<LocalOrder>, OrderStoreError>;

    /// Looks an order up by a remote identifier, matching the real order id and the draft order
    /// id columns in a single query. A draft may have been promoted since the id was recorded.
    async fn fetch_order_by_remote_id(&self, remote_id: &str) -> Result<Option<LocalOrder>, OrderStoreError>;

    /// All orders for the user, newest first by creation time.
    async fn fetch_orders_for_user(&self, user_id: &str) -> Result<Vec<LocalOrder>, OrderStoreError>;

    /// The user's orders with the given status, newest first by creation time.
    async fn fetch_orders_by_status_and_user(
        &self,
        status: &FinancialStatus,
        user_id: &str,
    ) -> Result<Vec<LocalOrder>, OrderStoreError>;

    /// Atomically sets the order's status and refreshes its update timestamp.
    async fn update_order_status(&self, id: &OrderId, status: &FinancialStatus) -> Result<LocalOrder, OrderStoreError>;

    /// Atomically promotes a draft-linked order to a real one: sets the real order id, clears the
    /// draft id, and refreshes the order number, total price and status.
    async fn promote_draft_order(
        &self,
        id: &OrderId,
        promotion: &DraftPromotion,
    ) -> Result<LocalOrder, OrderStoreError>;

    /// The remote customer id on file for the user, if the user module has linked one.
    async fn customer_id_for_user(&self, user_id: &str) -> Result<Option<String>, OrderStoreError>;

    /// Records (or replaces) the user's remote customer id.
    async fn link_customer(&self, user_id: &str, customer_id: &str) -> Result<(), OrderStoreError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("The order {0} does not exist")]
    OrderNotFound(OrderId),
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        OrderStoreError::DatabaseError(e.to_string())
    }
}
