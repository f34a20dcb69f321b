use actix_web::{http::StatusCode, test, web, App};
use shopsync_engine::{
    db_types::{FinancialStatus, LineItem, NewLocalOrder},
    test_utils::FakeCommerce,
    OrderStore,
    SqliteDatabase,
};
use ssg_common::Cents;

use super::helpers::{inventory_scope, orders_scope, prepare_test_db, test_api};

fn order_body(variant_id: &str, quantity: i64) -> serde_json::Value {
    serde_json::json!({
        "user_id": "user-1",
        "customer_id": "cust-1",
        "line_items": [{ "variant_id": variant_id, "quantity": quantity }]
    })
}

async fn seed_order(db: &SqliteDatabase, remote_id: &str, user_id: &str, status: FinancialStatus) {
    let mut order = NewLocalOrder::new(user_id, "cust-1", status, vec![LineItem::new("V1", 1)]);
    order.shopify_order_id = Some(remote_id.to_string());
    db.insert_order(order).await.unwrap();
}

#[actix_web::test]
async fn create_order_round_trip() {
    let db = prepare_test_db().await;
    let client = FakeCommerce::new();
    client.set_stock("V1", 5, Cents::new(1000));
    let app = test::init_service(
        App::new().app_data(web::Data::new(test_api(db.clone(), client))).service(orders_scope()),
    )
    .await;
    let req = test::TestRequest::post().uri("/orders").set_json(order_body("V1", 2)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["shopify_order"]["id"], "R-1001");
    assert_eq!(body["local_order"]["status"], "pending");
    assert_eq!(body["local_order"]["total_price"], "20.00");
    assert!(db.fetch_order_by_remote_id("R-1001").await.unwrap().is_some());
}

#[actix_web::test]
async fn create_order_with_insufficient_stock_conflicts() {
    let db = prepare_test_db().await;
    let client = FakeCommerce::new();
    client.set_stock("V1", 1, Cents::new(1000));
    let app =
        test::init_service(App::new().app_data(web::Data::new(test_api(db, client))).service(orders_scope())).await;
    let req = test::TestRequest::post().uri("/orders").set_json(order_body("V1", 3)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn create_order_rejects_empty_line_items() {
    let db = prepare_test_db().await;
    let app = test::init_service(
        App::new().app_data(web::Data::new(test_api(db, FakeCommerce::new()))).service(orders_scope()),
    )
    .await;
    let body = serde_json::json!({ "user_id": "user-1", "customer_id": "cust-1", "line_items": [] });
    let req = test::TestRequest::post().uri("/orders").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn checkout_returns_a_payment_session() {
    let db = prepare_test_db().await;
    let client = FakeCommerce::new();
    client.set_stock("V1", 5, Cents::new(1000));
    let app = test::init_service(
        App::new().app_data(web::Data::new(test_api(db.clone(), client))).service(orders_scope()),
    )
    .await;
    let req = test::TestRequest::post().uri("/orders/checkout").set_json(order_body("V1", 1)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let checkout_url = body["checkout_url"].as_str().unwrap();
    assert!(checkout_url.contains("invoices"));
    let order_id = body["order_id"].as_str().unwrap();
    let order = db.fetch_order_by_id(&order_id.to_string().into()).await.unwrap().unwrap();
    assert_eq!(order.shopify_draft_order_id.as_deref(), Some("D-1"));
}

#[actix_web::test]
async fn orders_can_be_filtered_by_status() {
    let db = prepare_test_db().await;
    seed_order(&db, "4001", "user-1", FinancialStatus::Pending).await;
    seed_order(&db, "4002", "user-1", FinancialStatus::Paid).await;
    seed_order(&db, "4003", "user-2", FinancialStatus::Paid).await;
    let app = test::init_service(
        App::new().app_data(web::Data::new(test_api(db, FakeCommerce::new()))).service(orders_scope()),
    )
    .await;
    let req = test::TestRequest::get().uri("/orders?user_id=user-1&status=paid").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["shopify_order_id"], "4002");
}

#[actix_web::test]
async fn sync_for_an_unlinked_user_is_a_bad_request() {
    let db = prepare_test_db().await;
    let app = test::init_service(
        App::new().app_data(web::Data::new(test_api(db, FakeCommerce::new()))).service(orders_scope()),
    )
    .await;
    let req = test::TestRequest::post().uri("/orders/sync/user-1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn stock_check_returns_live_availability() {
    let db = prepare_test_db().await;
    let client = FakeCommerce::new();
    client.set_stock("V1", 5, Cents::new(1000));
    let app = test::init_service(
        App::new().app_data(web::Data::new(test_api(db, client))).service(inventory_scope()),
    )
    .await;
    let body = serde_json::json!({ "variant_ids": ["V1", "VX"] });
    let req = test::TestRequest::post().uri("/inventory/check").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let stock: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(stock.as_array().unwrap().len(), 1);
    assert_eq!(stock[0]["id"], "V1");
    assert_eq!(stock[0]["quantity_available"], 5);
}
