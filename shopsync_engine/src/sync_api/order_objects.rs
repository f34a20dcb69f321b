use serde::{Deserialize, Serialize};

use crate::{
    db_types::{LineItem, LocalOrder, OrderId},
    traits::{RemoteOrder, ShippingAddress},
};

/// The payload delivered by the platform's order webhooks, after signature verification.
///
/// The ingress verifies the HMAC over the raw payload bytes before this shape ever reaches the
/// engine; an unverified payload is rejected at the edge and never deserialised into this type
/// for processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPaidPayload {
    pub order_number: String,
    /// The remote order id.
    pub id: i64,
    pub total_price: String,
    pub financial_status: String,
    pub line_items: Vec<PayloadLineItem>,
    pub customer: PayloadCustomer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadLineItem {
    pub variant_id: String,
    pub quantity: i64,
}

impl From<PayloadLineItem> for LineItem {
    fn from(item: PayloadLineItem) -> Self {
        LineItem { variant_id: item.variant_id, quantity: item.quantity }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadCustomer {
    pub id: i64,
    pub email: String,
}

/// A request to purchase a set of line items on behalf of a local user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub user_id: String,
    /// The remote customer the order is placed for.
    pub customer_id: String,
    pub line_items: Vec<LineItem>,
    pub shipping_address: Option<ShippingAddress>,
}

/// The result of a completed checkout: the platform's order record and the local projection.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResult {
    pub shopify_order: RemoteOrder,
    pub local_order: LocalOrder,
}

/// A draft-order payment session: the URL the customer pays at, and the local record tracking it.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSession {
    pub payment_url: String,
    pub order_id: OrderId,
}
