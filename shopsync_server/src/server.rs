use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::info;
use shopify_client::ShopifyApi;
use shopsync_engine::{InventoryApi, OrderFlowApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::shopify::ShopifyCommerce,
    middleware::HmacMiddlewareFactory,
    routes,
};

type Store = SqliteDatabase;
type Commerce = ShopifyCommerce;
type Inventory = InventoryApi<ShopifyCommerce>;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let api = ShopifyApi::new(config.shopify.shopify_api_config())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let client = ShopifyCommerce::new(api);
    let srv = create_server_instance(config, db, client)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    client: ShopifyCommerce,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    info!("🚀️ Starting shopsync server for shop {}", config.shopify.shop);
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone(), client.clone());
        let hmac = HmacMiddlewareFactory::new(
            "X-Shopify-Hmac-SHA256",
            config.shopify.hmac_secret.clone(),
            config.shopify.hmac_checks,
        );
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("ssg::access_log"))
            .app_data(web::Data::new(orders_api))
            .service(routes::health)
            .service(
                web::scope("/webhooks")
                    .wrap(hmac)
                    .route("/orders/paid", web::post().to(routes::order_paid_webhook::<Store, Commerce, Inventory>)),
            )
            .service(
                web::scope("/orders")
                    .route("", web::post().to(routes::create_order::<Store, Commerce, Inventory>))
                    .route("", web::get().to(routes::get_orders::<Store, Commerce, Inventory>))
                    .route("/checkout", web::post().to(routes::create_checkout::<Store, Commerce, Inventory>))
                    .route("/payment-session", web::post().to(routes::payment_session::<Store, Commerce, Inventory>))
                    .route("/sync/{user_id}", web::post().to(routes::sync_orders::<Store, Commerce, Inventory>))
                    .route("/pending/{user_id}", web::get().to(routes::pending_orders::<Store, Commerce, Inventory>))
                    .route("/{id}", web::get().to(routes::get_order::<Store, Commerce, Inventory>)),
            )
            .service(
                web::scope("/inventory")
                    .route("/check", web::post().to(routes::check_stock::<Store, Commerce, Inventory>)),
            )
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
