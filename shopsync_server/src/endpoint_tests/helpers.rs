use actix_web::{dev::HttpServiceFactory, web};
use shopsync_engine::{test_utils::FakeCommerce, InventoryApi, OrderFlowApi, SqliteDatabase};
use sqlx::{migrate::MigrateDatabase, Sqlite};
use ssg_common::Secret;

use crate::{middleware::HmacMiddlewareFactory, routes};

pub type TestApi = OrderFlowApi<SqliteDatabase, FakeCommerce, InventoryApi<FakeCommerce>>;

type Store = SqliteDatabase;
type Commerce = FakeCommerce;
type Inventory = InventoryApi<FakeCommerce>;

pub async fn prepare_test_db() -> SqliteDatabase {
    let _ = env_logger::try_init();
    let url = format!("sqlite://../data/test_server_{}.db", rand::random::<u64>());
    let _ = Sqlite::drop_database(&url).await;
    Sqlite::create_database(&url).await.expect("Error creating database");
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
    db.migrate().await.expect("Error running DB migrations");
    db
}

pub fn test_api(db: SqliteDatabase, client: FakeCommerce) -> TestApi {
    OrderFlowApi::new(db, client)
}

/// The webhook scope as wired in `server.rs`, with the fake commerce client in place of the
/// HTTP-backed one.
pub fn webhook_scope(secret: &str, hmac_checks: bool) -> impl HttpServiceFactory {
    web::scope("/webhooks")
        .wrap(HmacMiddlewareFactory::new("X-Shopify-Hmac-SHA256", Secret::new(secret.to_string()), hmac_checks))
        .route("/orders/paid", web::post().to(routes::order_paid_webhook::<Store, Commerce, Inventory>))
}

pub fn orders_scope() -> impl HttpServiceFactory {
    web::scope("/orders")
        .route("", web::post().to(routes::create_order::<Store, Commerce, Inventory>))
        .route("", web::get().to(routes::get_orders::<Store, Commerce, Inventory>))
        .route("/checkout", web::post().to(routes::create_checkout::<Store, Commerce, Inventory>))
        .route("/payment-session", web::post().to(routes::payment_session::<Store, Commerce, Inventory>))
        .route("/sync/{user_id}", web::post().to(routes::sync_orders::<Store, Commerce, Inventory>))
        .route("/pending/{user_id}", web::get().to(routes::pending_orders::<Store, Commerce, Inventory>))
        .route("/{id}", web::get().to(routes::get_order::<Store, Commerce, Inventory>))
}

pub fn inventory_scope() -> impl HttpServiceFactory {
    web::scope("/inventory").route("/check", web::post().to(routes::check_stock::<Store, Commerce, Inventory>))
}
