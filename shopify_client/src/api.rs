use std::{sync::Arc, time::Duration};

use graphql_parser::parse_query;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::ShopifyConfig,
    data_objects::{NewOrderItem, ShippingAddress, ShopifyCustomer, ShopifyDraftOrder, ShopifyOrder, ShopifyVariant, VariantNode},
    helpers::{numeric_variant_id, variant_gid},
    ShopifyApiError,
};

/// Every outbound call is bounded by this timeout; an expired request surfaces as
/// [`ShopifyApiError::Timeout`].
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const CHECK_VARIANTS_QUERY: &str = r#"
query checkVariantsAvailability($ids: [ID!]!) {
  nodes(ids: $ids) {
    ... on ProductVariant {
      id
      title
      quantityAvailable
      price { amount currencyCode }
    }
  }
}"#;

#[derive(Clone)]
pub struct ShopifyApi {
    config: ShopifyConfig,
    client: Arc<Client>,
}

impl ShopifyApi {
    pub fn new(config: ShopifyConfig) -> Result<Self, ShopifyApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(config.admin_access_token.reveal().as_str())
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        headers.insert("X-Shopify-Access-Token", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn admin_url(&self, path: &str) -> String {
        format!("https://{}/admin/api/{}{path}", self.config.shop, self.config.api_version)
    }

    pub fn storefront_url(&self) -> String {
        format!("https://{}/api/{}/graphql.json", self.config.shop, self.config.api_version)
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, ShopifyApiError> {
        let url = self.admin_url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(transport_error)?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| ShopifyApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(transport_error)?;
            Err(ShopifyApiError::QueryError { status, message })
        }
    }

    /// Sends a GraphQL query to the Storefront API. The query document is validated before
    /// dispatch, and an `errors` envelope in the response is surfaced as a
    /// [`ShopifyApiError::GraphQLError`].
    pub async fn storefront_query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<T, ShopifyApiError> {
        let query = parse_query::<String>(query).map_err(|e| ShopifyApiError::InvalidGraphQL(e.to_string()))?;
        let mut body = serde_json::json!({
            "query": query.to_string(),
        });
        if let Some(vars) = variables {
            body["variables"] = vars;
        }
        trace!("Sending Storefront GraphQL query: {body}");
        let response = self
            .client
            .post(self.storefront_url())
            .header("X-Shopify-Storefront-Access-Token", self.config.storefront_access_token.reveal().as_str())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(transport_error)?;
            return Err(ShopifyApiError::QueryError { status, message });
        }
        let result = response.json::<Value>().await.map_err(|e| ShopifyApiError::JsonError(e.to_string()))?;
        if let Some(errors) = result["errors"].as_array() {
            let e = errors.iter().map(|e| e.to_string()).collect::<Vec<String>>().join(", ");
            return Err(ShopifyApiError::GraphQLError(e));
        }
        let data = result["data"].clone();
        trace!("Storefront GraphQL response: {data}");
        if data.is_null() {
            return Err(ShopifyApiError::EmptyResponse);
        }
        serde_json::from_value(data).map_err(|e| ShopifyApiError::JsonError(e.to_string()))
    }

    /// Creates a real order for the customer. The order is created unpaid; Shopify performs the
    /// authoritative stock decrement when payment lands.
    pub async fn create_order(
        &self,
        customer_id: &str,
        items: &[NewOrderItem],
        shipping_address: Option<&ShippingAddress>,
    ) -> Result<ShopifyOrder, ShopifyApiError> {
        #[derive(Deserialize)]
        struct OrderResponse {
            order: ShopifyOrder,
        }
        let line_items = items
            .iter()
            .map(|item| {
                serde_json::json!({
                    "variant_id": numeric_variant_id(&item.variant_id),
                    "quantity": item.quantity,
                })
            })
            .collect::<Vec<Value>>();
        let mut order = serde_json::json!({
            "customer": { "id": customer_value(customer_id) },
            "line_items": line_items,
            "financial_status": "pending",
            "inventory_behaviour": "decrement_ignoring_policy",
            "send_receipt": true,
            "send_fulfillment_receipt": true,
        });
        if let Some(address) = shipping_address {
            order["shipping_address"] = serde_json::to_value(address).map_err(|e| ShopifyApiError::JsonError(e.to_string()))?;
        }
        let body = serde_json::json!({ "order": order });
        debug!("Creating order for customer {customer_id} with {} line items", items.len());
        let result = self.rest_query::<OrderResponse, Value>(Method::POST, "/orders.json", &[], Some(body)).await?;
        info!("Created order {} ({})", result.order.id, result.order.name);
        Ok(result.order)
    }

    /// Creates a draft order and returns it along with its invoice (payment) URL. The customer
    /// record is fetched first so the invoice can be emailed to the right address.
    pub async fn create_draft_order(
        &self,
        customer_id: &str,
        items: &[NewOrderItem],
    ) -> Result<ShopifyDraftOrder, ShopifyApiError> {
        #[derive(Deserialize)]
        struct DraftOrderResponse {
            draft_order: ShopifyDraftOrder,
        }
        let customer = self.get_customer(customer_id).await?;
        let line_items = items
            .iter()
            .map(|item| {
                serde_json::json!({
                    "variant_id": numeric_variant_id(&item.variant_id),
                    "quantity": item.quantity,
                })
            })
            .collect::<Vec<Value>>();
        let body = serde_json::json!({
            "draft_order": {
                "line_items": line_items,
                "customer": { "id": customer_value(customer_id) },
                "email": customer.email,
                "send_receipt": true,
            }
        });
        debug!("Creating draft order for customer {customer_id}");
        let result =
            self.rest_query::<DraftOrderResponse, Value>(Method::POST, "/draft_orders.json", &[], Some(body)).await?;
        info!("Created draft order {}", result.draft_order.id);
        Ok(result.draft_order)
    }

    pub async fn get_customer(&self, customer_id: &str) -> Result<ShopifyCustomer, ShopifyApiError> {
        #[derive(Deserialize)]
        struct CustomerResponse {
            customer: ShopifyCustomer,
        }
        let path = format!("/customers/{customer_id}.json");
        let result = self.rest_query::<CustomerResponse, ()>(Method::GET, &path, &[], None).await?;
        Ok(result.customer)
    }

    /// Fetches the full order list for a customer.
    pub async fn get_customer_orders(&self, customer_id: &str) -> Result<Vec<ShopifyOrder>, ShopifyApiError> {
        #[derive(Deserialize)]
        struct OrdersResponse {
            orders: Vec<ShopifyOrder>,
        }
        let path = format!("/customers/{customer_id}/orders.json");
        debug!("Fetching orders for customer {customer_id}");
        let result = self.rest_query::<OrdersResponse, ()>(Method::GET, &path, &[("status", "any")], None).await?;
        info!("Fetched {} orders for customer {customer_id}", result.orders.len());
        Ok(result.orders)
    }

    /// Fetches a single variant, including its live inventory quantity, via the Admin API.
    pub async fn get_variant(&self, variant_id: &str) -> Result<ShopifyVariant, ShopifyApiError> {
        #[derive(Deserialize)]
        struct VariantResponse {
            variant: ShopifyVariant,
        }
        let path = format!("/variants/{}.json", numeric_variant_id(variant_id));
        let result = self.rest_query::<VariantResponse, ()>(Method::GET, &path, &[], None).await?;
        debug!(
            "Fetched variant {variant_id}: {} available at {}",
            result.variant.inventory_quantity, result.variant.price
        );
        Ok(result.variant)
    }

    /// Checks availability for a batch of variants in a single Storefront query. Unknown ids come
    /// back as `None`, in the same order as the request.
    pub async fn check_variants(&self, variant_ids: &[String]) -> Result<Vec<Option<VariantNode>>, ShopifyApiError> {
        #[derive(Deserialize)]
        struct NodesResponse {
            nodes: Vec<Option<VariantNode>>,
        }
        let ids = variant_ids.iter().map(|id| variant_gid(id)).collect::<Vec<String>>();
        let variables = serde_json::json!({ "ids": ids });
        let result = self.storefront_query::<NodesResponse>(CHECK_VARIANTS_QUERY, Some(variables)).await?;
        debug!("Checked availability for {} variants", result.nodes.len());
        Ok(result.nodes)
    }
}

fn transport_error(e: reqwest::Error) -> ShopifyApiError {
    if e.is_timeout() {
        ShopifyApiError::Timeout(e.to_string())
    } else {
        ShopifyApiError::RestResponseError(e.to_string())
    }
}

/// Shopify expects customer ids as numbers; fall back to the raw string if the id is not numeric.
fn customer_value(customer_id: &str) -> Value {
    customer_id.parse::<i64>().map(Value::from).unwrap_or_else(|_| Value::from(customer_id))
}
