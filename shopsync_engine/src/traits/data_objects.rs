use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ssg_common::Cents;

use crate::db_types::{FinancialStatus, LineItem};

/// An order as reported by the remote platform, reduced to the fields the engine reconciles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteOrder {
    /// The remote order identifier.
    pub id: String,
    /// The draft order this record was promoted from, when the platform still reports it.
    pub draft_order_id: Option<String>,
    /// The human-facing order number, e.g. "#1001".
    pub order_number: Option<String>,
    pub total_price: Option<Cents>,
    pub financial_status: Option<FinancialStatus>,
    pub line_items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A provisional remote order awaiting payment through its invoice URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDraftOrder {
    pub id: String,
    pub invoice_url: String,
}

/// A live read of a variant's availability. Never cached; each check is a fresh remote call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantStock {
    pub id: String,
    pub quantity_available: i64,
    pub price: Cents,
}

/// The request shape for creating a remote order or draft order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRemoteOrder {
    pub customer_id: String,
    pub line_items: Vec<LineItem>,
    pub shipping_address: Option<ShippingAddress>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address1: String,
    pub city: String,
    pub province: String,
    pub zip: String,
    pub country: String,
}

/// The fields written when a draft-linked local order is promoted to a real one. Setting the real
/// order id and clearing the draft id happen in the same statement; this is the only path that
/// clears a draft id.
#[derive(Debug, Clone)]
pub struct DraftPromotion {
    pub shopify_order_id: String,
    pub order_number: Option<String>,
    pub total_price: Option<Cents>,
    pub status: FinancialStatus,
}
