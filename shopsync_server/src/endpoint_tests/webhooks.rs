use actix_web::{http::StatusCode, test, web, App};
use shopsync_engine::{
    db_types::{FinancialStatus, LineItem, NewLocalOrder},
    test_utils::FakeCommerce,
    OrderStore,
    SqliteDatabase,
};

use super::helpers::{prepare_test_db, test_api, webhook_scope};
use crate::helpers::calculate_hmac;

const SECRET: &str = "hush";

fn payload_json(remote_id: i64, status: &str) -> String {
    serde_json::json!({
        "order_number": "#1001",
        "id": remote_id,
        "total_price": "42.50",
        "financial_status": status,
        "line_items": [{ "variant_id": "V1", "quantity": 2 }],
        "customer": { "id": 207119551, "email": "bob@example.com" }
    })
    .to_string()
}

async fn seed_pending_order(db: &SqliteDatabase, remote_id: &str) {
    let mut order = NewLocalOrder::new("user-1", "cust-1", FinancialStatus::Pending, vec![LineItem::new("V1", 2)]);
    order.shopify_order_id = Some(remote_id.to_string());
    db.insert_order(order).await.unwrap();
}

fn webhook_request(body: String, signature: Option<&str>) -> actix_web::test::TestRequest {
    let mut req = test::TestRequest::post()
        .uri("/webhooks/orders/paid")
        .insert_header(("Content-Type", "application/json"))
        .insert_header(("X-Shopify-Shop-Domain", "example.myshopify.com"))
        .set_payload(body);
    if let Some(signature) = signature {
        req = req.insert_header(("X-Shopify-Hmac-SHA256", signature));
    }
    req
}

#[actix_web::test]
async fn verified_webhook_applies_the_transition() {
    let db = prepare_test_db().await;
    seed_pending_order(&db, "9010").await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_api(db.clone(), FakeCommerce::new())))
            .service(webhook_scope(SECRET, true)),
    )
    .await;
    let body = payload_json(9010, "paid");
    let signature = calculate_hmac(SECRET, body.as_bytes());
    let resp = test::call_service(&app, webhook_request(body, Some(&signature)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ack: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(ack["status"], "success");
    let order = db.fetch_order_by_remote_id("9010").await.unwrap().unwrap();
    assert_eq!(order.status, FinancialStatus::Paid);
}

#[actix_web::test]
async fn bad_signature_never_reaches_the_reconciler() {
    let db = prepare_test_db().await;
    seed_pending_order(&db, "9011").await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_api(db.clone(), FakeCommerce::new())))
            .service(webhook_scope(SECRET, true)),
    )
    .await;
    let body = payload_json(9011, "paid");
    let resp = test::call_service(&app, webhook_request(body, Some("bm90IGEgcmVhbCBzaWduYXR1cmU=")).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    // The order is untouched.
    let order = db.fetch_order_by_remote_id("9011").await.unwrap().unwrap();
    assert_eq!(order.status, FinancialStatus::Pending);
}

#[actix_web::test]
async fn missing_signature_is_unauthorized() {
    let db = prepare_test_db().await;
    seed_pending_order(&db, "9012").await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_api(db.clone(), FakeCommerce::new())))
            .service(webhook_scope(SECRET, true)),
    )
    .await;
    let resp = test::call_service(&app, webhook_request(payload_json(9012, "paid"), None).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn webhook_for_unknown_order_is_not_found() {
    let db = prepare_test_db().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_api(db, FakeCommerce::new())))
            .service(webhook_scope(SECRET, true)),
    )
    .await;
    let body = payload_json(777777, "paid");
    let signature = calculate_hmac(SECRET, body.as_bytes());
    let resp = test::call_service(&app, webhook_request(body, Some(&signature)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn disabled_hmac_checks_admit_unsigned_payloads() {
    let db = prepare_test_db().await;
    seed_pending_order(&db, "9013").await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_api(db.clone(), FakeCommerce::new())))
            .service(webhook_scope(SECRET, false)),
    )
    .await;
    let resp = test::call_service(&app, webhook_request(payload_json(9013, "refunded"), None).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let order = db.fetch_order_by_remote_id("9013").await.unwrap().unwrap();
    assert_eq!(order.status, FinancialStatus::Refunded);
}
