//! Route handlers.
//!
//! Handlers are generic over the engine's trait seams and are registered with concrete types in
//! [`crate::server`]; endpoint tests register the same handlers with fakes instead.
use actix_web::{get, web, HttpResponse};
use log::*;
use shopsync_engine::{
    db_types::{FinancialStatus, OrderId},
    order_objects::OrderPaidPayload,
    traits::{CommerceClient, InventoryCoordinator, OrderStore},
    OrderFlowApi,
    OrderFlowError,
};

use crate::{
    data_objects::{CheckoutSessionResponse, OrderRequest, OrdersQuery, PaymentSessionRequest, PaymentUrlResponse, StockCheckRequest},
    errors::ServerError,
};

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("👍️\n")
}

/// `POST /orders`: create a real order on the platform, then record it locally.
pub async fn create_order<B, C, I>(
    body: web::Json<OrderRequest>,
    api: web::Data<OrderFlowApi<B, C, I>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore,
    C: CommerceClient,
    I: InventoryCoordinator,
{
    let request = body.into_inner();
    request.validate()?;
    debug!("🛒️ POST /orders for user {}", request.user_id);
    let result = api.checkout(request.into()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// `POST /orders/checkout`: create a draft order and return the payment URL for it.
pub async fn create_checkout<B, C, I>(
    body: web::Json<OrderRequest>,
    api: web::Data<OrderFlowApi<B, C, I>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore,
    C: CommerceClient,
    I: InventoryCoordinator,
{
    let request = body.into_inner();
    request.validate()?;
    debug!("🛒️ POST /orders/checkout for user {}", request.user_id);
    let session = api.create_payment_session(request.into()).await?;
    Ok(HttpResponse::Ok().json(CheckoutSessionResponse { checkout_url: session.payment_url, order_id: session.order_id }))
}

/// `POST /orders/payment-session`: re-issue a payment URL for an existing local order.
pub async fn payment_session<B, C, I>(
    body: web::Json<PaymentSessionRequest>,
    api: web::Data<OrderFlowApi<B, C, I>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore,
    C: CommerceClient,
    I: InventoryCoordinator,
{
    let order_id = OrderId::from(body.into_inner().order_id);
    let payment_url = api.payment_url_for_order(&order_id).await?;
    Ok(HttpResponse::Ok().json(PaymentUrlResponse { payment_url }))
}

/// `POST /orders/sync/{user_id}`: pull the remote order list and reconcile local records.
pub async fn sync_orders<B, C, I>(
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B, C, I>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore,
    C: CommerceClient,
    I: InventoryCoordinator,
{
    let user_id = path.into_inner();
    debug!("🔄️ POST /orders/sync for user {user_id}");
    let orders = api.sync_orders_from_shopify(&user_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// `GET /orders?user_id=&status=`: the user's orders, optionally filtered by status.
pub async fn get_orders<B, C, I>(
    query: web::Query<OrdersQuery>,
    api: web::Data<OrderFlowApi<B, C, I>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore,
    C: CommerceClient,
    I: InventoryCoordinator,
{
    let query = query.into_inner();
    let orders = match &query.status {
        Some(status) => {
            let status = FinancialStatus::from(status.as_str());
            api.find_by_status_and_user(&status, &query.user_id).await?
        },
        None => api.orders_for_user(&query.user_id).await?,
    };
    Ok(HttpResponse::Ok().json(orders))
}

/// `GET /orders/pending/{user_id}`: sync first, then return the pending orders.
pub async fn pending_orders<B, C, I>(
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B, C, I>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore,
    C: CommerceClient,
    I: InventoryCoordinator,
{
    let user_id = path.into_inner();
    api.sync_orders_from_shopify(&user_id).await?;
    let orders = api.find_by_status_and_user(&FinancialStatus::Pending, &user_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// `GET /orders/{id}`: a single local order.
pub async fn get_order<B, C, I>(
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B, C, I>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore,
    C: CommerceClient,
    I: InventoryCoordinator,
{
    let order_id = OrderId::from(path.into_inner());
    let order = api.order_by_id(&order_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// `POST /inventory/check`: live availability for a batch of variants.
pub async fn check_stock<B, C, I>(
    body: web::Json<StockCheckRequest>,
    api: web::Data<OrderFlowApi<B, C, I>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore,
    C: CommerceClient,
    I: InventoryCoordinator,
{
    let request = body.into_inner();
    if request.variant_ids.is_empty() {
        return Err(ServerError::InvalidRequest("At least one variant id is required".to_string()));
    }
    let stock = api
        .inventory()
        .check_availability(&request.variant_ids)
        .await
        .map_err(|e| ServerError::OrderFlow(e.into()))?;
    Ok(HttpResponse::Ok().json(stock))
}

/// `POST /webhooks/orders/paid`: apply a verified order-state callback.
///
/// The HMAC middleware has already authenticated the payload by the time this runs; an unsigned
/// or mis-signed delivery never gets here. Responses follow the contract the platform's retry
/// logic is pointed at: 200 on success, 404 when the order is unknown to this gateway, 500 for
/// anything else.
pub async fn order_paid_webhook<B, C, I>(
    body: web::Json<OrderPaidPayload>,
    api: web::Data<OrderFlowApi<B, C, I>>,
) -> HttpResponse
where
    B: OrderStore,
    C: CommerceClient,
    I: InventoryCoordinator,
{
    let payload = body.into_inner();
    trace!("💳️ Received order webhook for remote order {}", payload.id);
    match api.handle_order_paid(payload).await {
        Ok(order) => {
            info!("💳️ Order [{}] updated to {} from webhook", order.id, order.status);
            HttpResponse::Ok().json(serde_json::json!({ "status": "success" }))
        },
        Err(e @ OrderFlowError::OrderNotFound(_)) => {
            warn!("💳️ Webhook for an order this gateway does not track: {e}");
            HttpResponse::NotFound().json(serde_json::json!({ "error": "Order not found" }))
        },
        Err(e) => {
            error!("💳️ Error processing webhook: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": "Error processing webhook" }))
        },
    }
}
