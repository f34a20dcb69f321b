use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    db_types::{FinancialStatus, LineItem, LocalOrder, NewLocalOrder, OrderId},
    sync_api::{
        errors::OrderFlowError,
        inventory_api::InventoryApi,
        order_objects::{CheckoutRequest, CheckoutResult, OrderPaidPayload, PaymentSession},
    },
    traits::{CommerceClient, DraftPromotion, InventoryCoordinator, NewRemoteOrder, OrderStore, RemoteOrder},
};

/// `OrderFlowApi` is the primary API for creating orders against the remote platform and for
/// reconciling the local order record when the platform reports a state change, either through a
/// verified webhook or a pull-based sync.
///
/// Creation is a small saga: reserve stock per line item, create remotely, persist locally, and
/// compensate with releases when a later step fails. There is no shared transaction with the
/// platform, so a crash between remote creation and local persistence leaves a gap that the next
/// sync pass repairs; nothing here retries automatically.
pub struct OrderFlowApi<B, C, I> {
    db: B,
    client: C,
    inventory: I,
}

impl<B, C, I> Debug for OrderFlowApi<B, C, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B, C> OrderFlowApi<B, C, InventoryApi<C>>
where C: CommerceClient + Clone
{
    pub fn new(db: B, client: C) -> Self {
        let inventory = InventoryApi::new(client.clone());
        Self { db, client, inventory }
    }
}

impl<B, C, I> OrderFlowApi<B, C, I> {
    /// Builds an API with an explicit inventory coordinator. Mostly useful for substituting an
    /// instrumented coordinator in tests.
    pub fn with_inventory(db: B, client: C, inventory: I) -> Self {
        Self { db, client, inventory }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }
}

impl<B, C, I> OrderFlowApi<B, C, I>
where
    B: OrderStore,
    C: CommerceClient,
    I: InventoryCoordinator,
{
    /// Persists a new local order after reserving stock for every line item.
    ///
    /// Reservations happen in line-item order. If any reservation fails, everything reserved so
    /// far is released and the original failure propagates; no local record is created. If the
    /// insert fails after all reservations succeeded, the same release sequence runs before the
    /// persistence error propagates. Releases are best effort: a failed release is logged and
    /// never masks the error that triggered the compensation.
    pub async fn create_local_order(&self, order: NewLocalOrder) -> Result<LocalOrder, OrderFlowError> {
        order.validate()?;
        let line_items = order.line_items.clone();
        let mut reserved: Vec<&LineItem> = Vec::with_capacity(line_items.len());
        for item in &line_items {
            if let Err(e) = self.inventory.reserve(&item.variant_id, item.quantity).await {
                warn!(
                    "🔄️📦️ Reservation failed for variant {}: {e}. Rolling back {} earlier reservations.",
                    item.variant_id,
                    reserved.len()
                );
                self.release_reservations(&reserved).await;
                return Err(e.into());
            }
            reserved.push(item);
        }
        match self.db.insert_order(order).await {
            Ok(local) => {
                debug!("🔄️📦️ Order [{}] persisted with {} line items", local.id, local.line_items.len());
                Ok(local)
            },
            Err(e) => {
                warn!("🔄️📦️ Could not persist order after reserving stock: {e}. Releasing reservations.");
                self.release_reservations(&reserved).await;
                Err(e.into())
            },
        }
    }

    async fn release_reservations(&self, items: &[&LineItem]) {
        for item in items {
            if let Err(e) = self.inventory.release(&item.variant_id, item.quantity).await {
                warn!("🔄️📦️ Could not release reservation for variant {}: {e}", item.variant_id);
            }
        }
    }

    /// Creates a real order on the remote platform, then records it locally.
    ///
    /// The remote order is created first; only on remote success is the local saga run. If the
    /// local side then fails, the remote order already exists and is deliberately left in place:
    /// the platform is the source of truth and the next sync pass inserts the missing record.
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutResult, OrderFlowError> {
        let remote = self
            .client
            .create_order(NewRemoteOrder {
                customer_id: request.customer_id.clone(),
                line_items: request.line_items.clone(),
                shipping_address: request.shipping_address.clone(),
            })
            .await?;
        info!("🛒️ Remote order {} created for customer {}", remote.id, request.customer_id);
        let order = NewLocalOrder {
            user_id: request.user_id,
            customer_id: request.customer_id,
            shopify_order_id: Some(remote.id.clone()),
            shopify_draft_order_id: None,
            order_number: remote.order_number.clone(),
            total_price: remote.total_price,
            status: remote.financial_status.clone().unwrap_or_default(),
            line_items: request.line_items,
            created_at: remote.created_at,
            updated_at: remote.updated_at,
        };
        match self.create_local_order(order).await {
            Ok(local) => Ok(CheckoutResult { shopify_order: remote, local_order: local }),
            Err(e) => {
                warn!(
                    "🛒️ Remote order {} exists but the local record failed: {e}. The next sync pass will pick it up.",
                    remote.id
                );
                Err(e)
            },
        }
    }

    /// Creates a remote draft order and a local record tracking it, returning the invoice URL the
    /// customer pays at. The draft's number and price are unknown until the invoice settles, so
    /// the local record starts without them.
    pub async fn create_payment_session(&self, request: CheckoutRequest) -> Result<PaymentSession, OrderFlowError> {
        let draft = self
            .client
            .create_draft_order(NewRemoteOrder {
                customer_id: request.customer_id.clone(),
                line_items: request.line_items.clone(),
                shipping_address: request.shipping_address.clone(),
            })
            .await?;
        info!("🛒️ Draft order {} created for customer {}", draft.id, request.customer_id);
        let now = Utc::now();
        let order = NewLocalOrder {
            user_id: request.user_id,
            customer_id: request.customer_id,
            shopify_order_id: None,
            shopify_draft_order_id: Some(draft.id.clone()),
            order_number: None,
            total_price: None,
            status: FinancialStatus::Pending,
            line_items: request.line_items,
            created_at: now,
            updated_at: now,
        };
        match self.create_local_order(order).await {
            Ok(local) => Ok(PaymentSession { payment_url: draft.invoice_url, order_id: local.id }),
            Err(e) => {
                warn!(
                    "🛒️ Draft order {} exists but the local record failed: {e}. The next sync pass will pick it up.",
                    draft.id
                );
                Err(e)
            },
        }
    }

    /// Re-issues a payment session for an existing local order by creating a fresh draft order
    /// from its line items.
    pub async fn payment_url_for_order(&self, order_id: &OrderId) -> Result<String, OrderFlowError> {
        let order = self
            .db
            .fetch_order_by_id(order_id)
            .await?
            .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.to_string()))?;
        let draft = self
            .client
            .create_draft_order(NewRemoteOrder {
                customer_id: order.customer_id,
                line_items: order.line_items,
                shipping_address: None,
            })
            .await?;
        Ok(draft.invoice_url)
    }

    /// Pulls the user's remote order list and brings the local records up to date.
    ///
    /// Unknown remote orders are inserted; known orders whose status moved are updated, and a
    /// draft-only record whose remote side has become a real order is promoted. A failure on one
    /// remote order is logged and skipped so the rest of the list still syncs. Running the sync
    /// twice with no intervening remote change performs no writes on the second pass.
    ///
    /// Returns all of the user's orders, newest first.
    pub async fn sync_orders_from_shopify(&self, user_id: &str) -> Result<Vec<LocalOrder>, OrderFlowError> {
        let customer_id = self
            .db
            .customer_id_for_user(user_id)
            .await?
            .ok_or_else(|| OrderFlowError::UserNotLinked(user_id.to_string()))?;
        let remote_orders = self.client.customer_orders(&customer_id).await?;
        debug!("🔄️ Syncing {} remote orders for user {user_id}", remote_orders.len());
        for remote in &remote_orders {
            if let Err(e) = self.apply_remote_order(user_id, &customer_id, remote).await {
                warn!("🔄️ Skipping remote order {} during sync: {e}", remote.id);
            }
        }
        Ok(self.db.fetch_orders_for_user(user_id).await?)
    }

    async fn apply_remote_order(
        &self,
        user_id: &str,
        customer_id: &str,
        remote: &RemoteOrder,
    ) -> Result<(), OrderFlowError> {
        let existing = match self.db.fetch_order_by_remote_id(&remote.id).await? {
            Some(order) => Some(order),
            None => match &remote.draft_order_id {
                Some(draft_id) => self.db.fetch_order_by_remote_id(draft_id).await?,
                None => None,
            },
        };
        let status = remote.financial_status.clone().unwrap_or_default();
        match existing {
            None => {
                debug!("🔄️ Inserting local record for remote order {}", remote.id);
                let order = NewLocalOrder {
                    user_id: user_id.to_string(),
                    customer_id: customer_id.to_string(),
                    shopify_order_id: Some(remote.id.clone()),
                    shopify_draft_order_id: None,
                    order_number: remote.order_number.clone(),
                    total_price: remote.total_price,
                    status,
                    line_items: remote.line_items.clone(),
                    created_at: remote.created_at,
                    updated_at: remote.updated_at,
                };
                order.validate()?;
                self.db.insert_order(order).await?;
            },
            Some(local) if local.status != status => {
                if local.shopify_draft_order_id.is_some() && local.shopify_order_id.is_none() {
                    debug!("🔄️ Promoting local order [{}] to remote order {}", local.id, remote.id);
                    let promotion = DraftPromotion {
                        shopify_order_id: remote.id.clone(),
                        order_number: remote.order_number.clone(),
                        total_price: remote.total_price,
                        status,
                    };
                    self.db.promote_draft_order(&local.id, &promotion).await?;
                } else {
                    debug!("🔄️ Updating status of order [{}] to {status}", local.id);
                    self.db.update_order_status(&local.id, &status).await?;
                }
            },
            // Status unchanged: write nothing, which is what keeps the sync idempotent.
            Some(_) => {},
        }
        Ok(())
    }

    /// Applies a webhook-driven status transition to the local order matching the payload's
    /// remote order id.
    ///
    /// `paid` confirms the reservation of every line item; `voided`, `refunded` and `failed`
    /// release them; any other status updates the record with no inventory side effect. Because
    /// confirm and release are no-ops that tolerate repetition, redelivered or out-of-order
    /// webhooks converge on the same end state without any bookkeeping here.
    pub async fn handle_order_paid(&self, payload: OrderPaidPayload) -> Result<LocalOrder, OrderFlowError> {
        let remote_id = payload.id.to_string();
        let order = self
            .db
            .fetch_order_by_remote_id(&remote_id)
            .await?
            .ok_or_else(|| OrderFlowError::OrderNotFound(remote_id.clone()))?;
        let status = FinancialStatus::from(payload.financial_status.as_str());
        if status == FinancialStatus::Paid {
            for item in &payload.line_items {
                self.inventory.confirm_reservation(&item.variant_id, item.quantity).await?;
            }
        } else if status.annuls_reservation() {
            for item in &payload.line_items {
                self.inventory.release(&item.variant_id, item.quantity).await?;
            }
        }
        let updated = self.db.update_order_status(&order.id, &status).await?;
        info!("🔄️💰️ Order [{}] ({}) is now {status}", updated.id, payload.order_number);
        Ok(updated)
    }

    /// Fetches a single local order by its local identifier.
    pub async fn order_by_id(&self, id: &OrderId) -> Result<LocalOrder, OrderFlowError> {
        self.db.fetch_order_by_id(id).await?.ok_or_else(|| OrderFlowError::OrderNotFound(id.to_string()))
    }

    /// All of the user's orders, newest first.
    pub async fn orders_for_user(&self, user_id: &str) -> Result<Vec<LocalOrder>, OrderFlowError> {
        Ok(self.db.fetch_orders_for_user(user_id).await?)
    }

    /// The user's orders with the given status, newest first.
    pub async fn find_by_status_and_user(
        &self,
        status: &FinancialStatus,
        user_id: &str,
    ) -> Result<Vec<LocalOrder>, OrderFlowError> {
        Ok(self.db.fetch_orders_by_status_and_user(status, user_id).await?)
    }
}
