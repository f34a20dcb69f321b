//! The adapter between the engine's [`CommerceClient`] seam and the typed Shopify HTTP client.
//!
//! Translation only: wire shapes become engine shapes, and [`ShopifyApiError`]s become the
//! engine's coarser [`CommerceApiError`] taxonomy (transport and timeout failures are
//! "unavailable", HTTP 404s are "not found", everything else the platform says is a response
//! error).
use shopify_client::{
    helpers::{numeric_variant_id, parse_shopify_price},
    NewOrderItem,
    ShippingAddress as ClientShippingAddress,
    ShopifyApi,
    ShopifyApiError,
    ShopifyOrder,
    VariantNode,
};
use shopsync_engine::{
    db_types::{FinancialStatus, LineItem},
    traits::{
        CommerceApiError,
        CommerceClient,
        NewRemoteOrder,
        RemoteDraftOrder,
        RemoteOrder,
        ShippingAddress,
        VariantStock,
    },
};

#[derive(Clone)]
pub struct ShopifyCommerce {
    api: ShopifyApi,
}

impl ShopifyCommerce {
    pub fn new(api: ShopifyApi) -> Self {
        Self { api }
    }
}

impl CommerceClient for ShopifyCommerce {
    async fn create_order(&self, order: NewRemoteOrder) -> Result<RemoteOrder, CommerceApiError> {
        let items = order_items(&order.line_items);
        let shipping = order.shipping_address.as_ref().map(client_address);
        let created =
            self.api.create_order(&order.customer_id, &items, shipping.as_ref()).await.map_err(commerce_error)?;
        remote_order(created)
    }

    async fn create_draft_order(&self, order: NewRemoteOrder) -> Result<RemoteDraftOrder, CommerceApiError> {
        let items = order_items(&order.line_items);
        let draft = self.api.create_draft_order(&order.customer_id, &items).await.map_err(commerce_error)?;
        Ok(RemoteDraftOrder { id: draft.id.to_string(), invoice_url: draft.invoice_url })
    }

    async fn customer_orders(&self, customer_id: &str) -> Result<Vec<RemoteOrder>, CommerceApiError> {
        let orders = self.api.get_customer_orders(customer_id).await.map_err(commerce_error)?;
        orders.into_iter().map(remote_order).collect()
    }

    async fn variant_stock(&self, variant_id: &str) -> Result<VariantStock, CommerceApiError> {
        let variant = self.api.get_variant(variant_id).await.map_err(commerce_error)?;
        let price = parse_shopify_price(&variant.price).map_err(data_error)?;
        Ok(VariantStock { id: variant.id.to_string(), quantity_available: variant.inventory_quantity, price })
    }

    async fn check_variants(&self, variant_ids: &[String]) -> Result<Vec<VariantStock>, CommerceApiError> {
        let nodes = self.api.check_variants(variant_ids).await.map_err(commerce_error)?;
        nodes.into_iter().flatten().map(stock_from_node).collect()
    }
}

fn order_items(items: &[LineItem]) -> Vec<NewOrderItem> {
    items.iter().map(|item| NewOrderItem { variant_id: item.variant_id.clone(), quantity: item.quantity }).collect()
}

fn client_address(address: &ShippingAddress) -> ClientShippingAddress {
    ClientShippingAddress {
        address1: address.address1.clone(),
        city: address.city.clone(),
        province: address.province.clone(),
        zip: address.zip.clone(),
        country: address.country.clone(),
    }
}

fn stock_from_node(node: VariantNode) -> Result<VariantStock, CommerceApiError> {
    let price = parse_shopify_price(&node.price.amount).map_err(data_error)?;
    Ok(VariantStock {
        id: numeric_variant_id(&node.id).to_string(),
        quantity_available: node.quantity_available.unwrap_or(0),
        price,
    })
}

fn remote_order(order: ShopifyOrder) -> Result<RemoteOrder, CommerceApiError> {
    let total_price = Some(parse_shopify_price(&order.total_price).map_err(data_error)?);
    let line_items = order
        .line_items
        .iter()
        .filter_map(|item| {
            item.variant_id.map(|variant_id| LineItem { variant_id: variant_id.to_string(), quantity: item.quantity })
        })
        .collect();
    Ok(RemoteOrder {
        id: order.id.to_string(),
        draft_order_id: order.source_identifier.clone(),
        order_number: (!order.name.is_empty()).then(|| order.name.clone()),
        total_price,
        financial_status: order.financial_status.clone().map(FinancialStatus::from),
        line_items,
        created_at: order.created_at,
        updated_at: order.updated_at,
    })
}

fn commerce_error(e: ShopifyApiError) -> CommerceApiError {
    match e {
        ShopifyApiError::Timeout(m) => CommerceApiError::Unavailable(format!("request timed out: {m}")),
        ShopifyApiError::RestResponseError(m) | ShopifyApiError::Initialization(m) => CommerceApiError::Unavailable(m),
        ShopifyApiError::QueryError { status: 404, message } => CommerceApiError::NotFound(message),
        other => CommerceApiError::ResponseError(other.to_string()),
    }
}

fn data_error(e: ShopifyApiError) -> CommerceApiError {
    CommerceApiError::ResponseError(e.to_string())
}

#[cfg(test)]
mod test {
    use ssg_common::Cents;

    use super::*;

    #[test]
    fn shopify_orders_translate_to_remote_orders() {
        let json = r##"{
            "id": 450789469,
            "name": "#1001",
            "order_number": 1001,
            "total_price": "42.50",
            "financial_status": "paid",
            "source_identifier": "994118539",
            "created_at": "2024-05-01T12:57:11-04:00",
            "updated_at": "2024-05-03T09:10:22-04:00",
            "line_items": [
                { "variant_id": 39072856, "quantity": 2 },
                { "variant_id": null, "quantity": 1, "title": "Tip" }
            ]
        }"##;
        let order: ShopifyOrder = serde_json::from_str(json).unwrap();
        let remote = remote_order(order).unwrap();
        assert_eq!(remote.id, "450789469");
        assert_eq!(remote.draft_order_id.as_deref(), Some("994118539"));
        assert_eq!(remote.order_number.as_deref(), Some("#1001"));
        assert_eq!(remote.total_price, Some(Cents::new(4250)));
        assert_eq!(remote.financial_status, Some(FinancialStatus::Paid));
        // Items without a variant cannot be stock-checked and are dropped from the projection.
        assert_eq!(remote.line_items, vec![LineItem::new("39072856", 2)]);
    }

    #[test]
    fn transport_and_data_failures_map_apart() {
        assert!(matches!(commerce_error(ShopifyApiError::Timeout("10s".into())), CommerceApiError::Unavailable(_)));
        assert!(matches!(
            commerce_error(ShopifyApiError::QueryError { status: 404, message: "gone".into() }),
            CommerceApiError::NotFound(_)
        ));
        assert!(matches!(
            commerce_error(ShopifyApiError::QueryError { status: 422, message: "nope".into() }),
            CommerceApiError::ResponseError(_)
        ));
    }
}
