use serde::{Deserialize, Serialize};
use shopsync_engine::{
    db_types::{LineItem, OrderId},
    order_objects::CheckoutRequest,
    traits::ShippingAddress,
};

use crate::errors::ServerError;

/// The body of `POST /orders` and `POST /orders/checkout`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    pub user_id: String,
    pub customer_id: String,
    pub line_items: Vec<LineItem>,
    pub shipping_address: Option<ShippingAddress>,
}

impl OrderRequest {
    /// The same request-shape checks the storefront backend relies on: a caller gets a 400 with a
    /// pointed message instead of a failed remote call.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.user_id.trim().is_empty() {
            return Err(ServerError::InvalidRequest("A user id is required".to_string()));
        }
        if self.customer_id.trim().is_empty() {
            return Err(ServerError::InvalidRequest("A customer id is required".to_string()));
        }
        if self.line_items.is_empty() {
            return Err(ServerError::InvalidRequest("At least one line item is required".to_string()));
        }
        if self.line_items.iter().any(|item| item.quantity <= 0) {
            return Err(ServerError::InvalidRequest("Line item quantities must be positive".to_string()));
        }
        Ok(())
    }
}

impl From<OrderRequest> for CheckoutRequest {
    fn from(request: OrderRequest) -> Self {
        CheckoutRequest {
            user_id: request.user_id,
            customer_id: request.customer_id,
            line_items: request.line_items,
            shipping_address: request.shipping_address,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSessionRequest {
    pub order_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockCheckRequest {
    pub variant_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrdersQuery {
    pub user_id: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSessionResponse {
    pub checkout_url: String,
    pub order_id: OrderId,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentUrlResponse {
    pub payment_url: String,
}
