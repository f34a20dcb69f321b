mod support;

use shopsync_engine::{
    db_types::{FinancialStatus, LineItem, NewLocalOrder},
    order_objects::{CheckoutRequest, OrderPaidPayload, PayloadCustomer, PayloadLineItem},
    test_utils::{FakeCommerce, InventoryCall, RecordingInventory},
    InventoryApi,
    InventoryCoordinator,
    OrderFlowApi,
    OrderFlowError,
    OrderStore,
    SqliteDatabase,
};
use ssg_common::Cents;

type TestInventory = RecordingInventory<InventoryApi<FakeCommerce>>;
type TestApi = OrderFlowApi<SqliteDatabase, FakeCommerce, TestInventory>;

async fn new_test_api() -> (TestApi, FakeCommerce, TestInventory, SqliteDatabase) {
    let db = support::prepare_test_env(&support::random_db_path()).await;
    let client = FakeCommerce::new();
    let inventory = RecordingInventory::new(InventoryApi::new(client.clone()));
    let api = OrderFlowApi::with_inventory(db.clone(), client.clone(), inventory.clone());
    (api, client, inventory, db)
}

fn pending_order(remote_id: &str, line_items: Vec<LineItem>) -> NewLocalOrder {
    let mut order = NewLocalOrder::new("user-1", "cust-1", FinancialStatus::Pending, line_items);
    order.shopify_order_id = Some(remote_id.to_string());
    order
}

fn paid_payload(remote_id: i64, status: &str, line_items: Vec<PayloadLineItem>) -> OrderPaidPayload {
    OrderPaidPayload {
        order_number: "#1001".to_string(),
        id: remote_id,
        total_price: "42.50".to_string(),
        financial_status: status.to_string(),
        line_items,
        customer: PayloadCustomer { id: 207119551, email: "bob@example.com".to_string() },
    }
}

#[tokio::test]
async fn create_local_order_reserves_and_persists() {
    let (api, client, inventory, db) = new_test_api().await;
    client.set_stock("V1", 5, Cents::new(1000));
    client.set_stock("V2", 3, Cents::new(250));
    let items = vec![LineItem::new("V1", 2), LineItem::new("V2", 1)];
    let created = api.create_local_order(pending_order("9001", items.clone())).await.unwrap();
    assert_eq!(created.line_items, items);
    assert_eq!(created.status, FinancialStatus::Pending);
    assert_eq!(
        inventory.calls(),
        vec![InventoryCall::Reserve("V1".into(), 2), InventoryCall::Reserve("V2".into(), 1)]
    );
    let fetched = db.fetch_order_by_remote_id("9001").await.unwrap().expect("order was not persisted");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn insufficient_stock_aborts_creation_and_compensates() {
    let (api, client, inventory, db) = new_test_api().await;
    client.set_stock("V1", 5, Cents::new(1000));
    client.set_stock("V2", 1, Cents::new(250));
    client.set_stock("V3", 10, Cents::new(100));
    let items = vec![LineItem::new("V1", 2), LineItem::new("V2", 2), LineItem::new("V3", 1)];
    let err = api.create_local_order(pending_order("9002", items)).await.unwrap_err();
    match err {
        OrderFlowError::InsufficientStock { variant_id, requested, available } => {
            assert_eq!(variant_id, "V2");
            assert_eq!(requested, 2);
            assert_eq!(available, 1);
        },
        other => panic!("Expected InsufficientStock, got {other}"),
    }
    // The failing item and everything after it were never reserved; everything before it was
    // released exactly once.
    assert_eq!(
        inventory.calls(),
        vec![
            InventoryCall::Reserve("V1".into(), 2),
            InventoryCall::Reserve("V2".into(), 2),
            InventoryCall::Release("V1".into(), 2),
        ]
    );
    assert!(db.fetch_orders_for_user("user-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_variant_fails_with_not_found() {
    let (api, client, inventory, _db) = new_test_api().await;
    client.set_stock("V1", 5, Cents::new(1000));
    let items = vec![LineItem::new("V1", 1), LineItem::new("VX", 1)];
    let err = api.create_local_order(pending_order("9003", items)).await.unwrap_err();
    assert!(matches!(err, OrderFlowError::NotFound(_)), "got {err}");
    assert_eq!(inventory.releases(), vec![("V1".to_string(), 1)]);
}

#[tokio::test]
async fn unreachable_platform_fails_with_remote_unavailable() {
    let (api, client, _inventory, db) = new_test_api().await;
    client.set_stock("V1", 5, Cents::new(1000));
    client.set_unavailable(true);
    let err = api.create_local_order(pending_order("9004", vec![LineItem::new("V1", 1)])).await.unwrap_err();
    assert!(matches!(err, OrderFlowError::RemoteUnavailable(_)), "got {err}");
    assert!(db.fetch_orders_for_user("user-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn persistence_failure_releases_reservations() {
    let (api, client, inventory, _db) = new_test_api().await;
    client.set_stock("V1", 10, Cents::new(1000));
    api.create_local_order(pending_order("9005", vec![LineItem::new("V1", 1)])).await.unwrap();
    // A second order with the same remote id violates the unique index, after its reservation
    // succeeded. The reservation must be handed back.
    let err = api.create_local_order(pending_order("9005", vec![LineItem::new("V1", 2)])).await.unwrap_err();
    assert!(matches!(err, OrderFlowError::PersistenceError(_)), "got {err}");
    assert_eq!(inventory.releases(), vec![("V1".to_string(), 2)]);
}

#[tokio::test]
async fn checkout_creates_remote_order_then_local_record() {
    let (api, client, _inventory, db) = new_test_api().await;
    client.set_stock("V1", 5, Cents::new(1000));
    let request = CheckoutRequest {
        user_id: "user-1".to_string(),
        customer_id: "cust-9".to_string(),
        line_items: vec![LineItem::new("V1", 2)],
        shipping_address: None,
    };
    let result = api.checkout(request).await.unwrap();
    assert_eq!(result.shopify_order.id, "R-1001");
    assert_eq!(result.local_order.shopify_order_id.as_deref(), Some("R-1001"));
    assert_eq!(result.local_order.order_number.as_deref(), Some("#1001"));
    assert_eq!(result.local_order.total_price, Some(Cents::new(2000)));
    assert_eq!(result.local_order.status, FinancialStatus::Pending);
    assert!(db.fetch_order_by_remote_id("R-1001").await.unwrap().is_some());
}

#[tokio::test]
async fn payment_session_creates_draft_linked_order() {
    let (api, client, _inventory, db) = new_test_api().await;
    client.set_stock("V1", 5, Cents::new(1000));
    let request = CheckoutRequest {
        user_id: "user-1".to_string(),
        customer_id: "cust-9".to_string(),
        line_items: vec![LineItem::new("V1", 1)],
        shipping_address: None,
    };
    let session = api.create_payment_session(request).await.unwrap();
    assert!(session.payment_url.contains("invoices"));
    let order = db.fetch_order_by_remote_id("D-1").await.unwrap().expect("draft order was not persisted");
    assert_eq!(order.id, session.order_id);
    assert_eq!(order.shopify_draft_order_id.as_deref(), Some("D-1"));
    assert!(order.shopify_order_id.is_none());
    assert!(order.order_number.is_none());
    assert!(order.total_price.is_none());
    assert_eq!(order.status, FinancialStatus::Pending);
}

#[tokio::test]
async fn paid_webhook_confirms_stock_and_is_idempotent() {
    let (api, client, inventory, _db) = new_test_api().await;
    client.set_stock("V1", 5, Cents::new(1000));
    let created = api.create_local_order(pending_order("9010", vec![LineItem::new("V1", 2)])).await.unwrap();
    assert_eq!(created.status, FinancialStatus::Pending);

    let payload = paid_payload(9010, "paid", vec![PayloadLineItem { variant_id: "V1".to_string(), quantity: 2 }]);
    let updated = api.handle_order_paid(payload.clone()).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.status, FinancialStatus::Paid);
    assert_eq!(inventory.confirms(), vec![("V1".to_string(), 2)]);

    // Redelivery converges on the same state; confirm tolerates any number of repeats.
    let redelivered = api.handle_order_paid(payload).await.unwrap();
    assert_eq!(redelivered.status, FinancialStatus::Paid);
    assert_eq!(inventory.confirms(), vec![("V1".to_string(), 2), ("V1".to_string(), 2)]);
}

#[tokio::test]
async fn failed_payment_webhook_releases_stock() {
    for status in ["voided", "refunded", "failed"] {
        let (api, client, inventory, _db) = new_test_api().await;
        client.set_stock("V1", 5, Cents::new(1000));
        api.create_local_order(pending_order("9011", vec![LineItem::new("V1", 2)])).await.unwrap();
        let payload = paid_payload(9011, status, vec![PayloadLineItem { variant_id: "V1".to_string(), quantity: 2 }]);
        let updated = api.handle_order_paid(payload).await.unwrap();
        assert_eq!(updated.status, FinancialStatus::from(status));
        assert_eq!(inventory.releases(), vec![("V1".to_string(), 2)]);
        assert!(inventory.confirms().is_empty());
    }
}

#[tokio::test]
async fn unrecognized_webhook_status_passes_through() {
    let (api, client, inventory, _db) = new_test_api().await;
    client.set_stock("V1", 5, Cents::new(1000));
    api.create_local_order(pending_order("9012", vec![LineItem::new("V1", 1)])).await.unwrap();
    let payload =
        paid_payload(9012, "partially_paid", vec![PayloadLineItem { variant_id: "V1".to_string(), quantity: 1 }]);
    let updated = api.handle_order_paid(payload).await.unwrap();
    assert_eq!(updated.status, FinancialStatus::Other("partially_paid".to_string()));
    assert!(inventory.confirms().is_empty());
    assert!(inventory.releases().is_empty());
}

#[tokio::test]
async fn webhook_for_unknown_order_fails() {
    let (api, _client, _inventory, _db) = new_test_api().await;
    let payload = paid_payload(424242, "paid", vec![]);
    let err = api.handle_order_paid(payload).await.unwrap_err();
    assert!(matches!(err, OrderFlowError::OrderNotFound(_)), "got {err}");
}

#[tokio::test]
async fn confirm_and_release_are_repeatable_no_ops() {
    let client = FakeCommerce::new();
    let inventory = InventoryApi::new(client);
    for _ in 0..3 {
        inventory.confirm_reservation("V1", 2).await.unwrap();
        inventory.release("V1", 2).await.unwrap();
    }
}

#[tokio::test]
async fn availability_check_is_a_single_batched_call() {
    let client = FakeCommerce::new();
    client.set_stock("V1", 5, Cents::new(1000));
    client.set_stock("V2", 0, Cents::new(500));
    let inventory = InventoryApi::new(client.clone());
    let ids = vec!["V1".to_string(), "V2".to_string(), "VX".to_string()];
    let stock = inventory.check_availability(&ids).await.unwrap();
    assert_eq!(stock.len(), 2);
    assert_eq!(stock[0].quantity_available, 5);
    assert_eq!(client.calls(), vec!["check_variants:V1,V2,VX".to_string()]);
}
