use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An order as returned by the Shopify Admin REST API.
///
/// Only the fields this gateway consumes are modelled; serde discards the rest of the (large)
/// order document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyOrder {
    pub id: i64,
    /// The human-facing order number, e.g. "#1001".
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub order_number: i64,
    pub total_price: String,
    pub financial_status: Option<String>,
    pub currency: Option<String>,
    /// For orders that began life as a draft, Shopify records the originating draft here.
    pub source_identifier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub line_items: Vec<ShopifyLineItem>,
    pub customer: Option<ShopifyCustomer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyLineItem {
    pub variant_id: Option<i64>,
    pub quantity: i64,
    #[serde(default)]
    pub title: String,
    pub price: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopifyCustomer {
    pub id: i64,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A provisional order awaiting payment. Shopify promotes it to a real order once the invoice is
/// settled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyDraftOrder {
    pub id: i64,
    pub invoice_url: String,
    pub status: Option<String>,
    pub total_price: Option<String>,
}

/// A variant as returned by the Admin REST `/variants/{id}.json` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyVariant {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub price: String,
    #[serde(default)]
    pub inventory_quantity: i64,
}

/// A variant node from the Storefront `nodes(ids:)` availability query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub quantity_available: Option<i64>,
    pub price: StorefrontPrice,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontPrice {
    pub amount: String,
    pub currency_code: String,
}

/// A line item for a new order or draft order request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub variant_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address1: String,
    pub city: String,
    pub province: String,
    pub zip: String,
    pub country: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deserialize_customer_orders() {
        let orders = include_str!("./test_assets/customer_orders.json");
        #[derive(Deserialize)]
        struct OrdersResponse {
            orders: Vec<ShopifyOrder>,
        }
        let response: OrdersResponse = serde_json::from_str(orders).unwrap();
        assert_eq!(response.orders.len(), 2);
        let order = &response.orders[0];
        assert_eq!(order.id, 450789469);
        assert_eq!(order.name, "#1001");
        assert_eq!(order.total_price, "409.94");
        assert_eq!(order.financial_status.as_deref(), Some("paid"));
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.line_items[0].variant_id, Some(39072856));
        assert_eq!(order.customer.as_ref().unwrap().id, 207119551);
    }

    #[test]
    fn deserialize_draft_order() {
        let draft = include_str!("./test_assets/draft_order.json");
        #[derive(Deserialize)]
        struct DraftOrderResponse {
            draft_order: ShopifyDraftOrder,
        }
        let response: DraftOrderResponse = serde_json::from_str(draft).unwrap();
        assert_eq!(response.draft_order.id, 994118539);
        assert!(response.draft_order.invoice_url.contains("checkout"));
        assert_eq!(response.draft_order.status.as_deref(), Some("open"));
    }
}
