use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use ssg_common::Cents;

use crate::{
    db_types::FinancialStatus,
    traits::{CommerceApiError, CommerceClient, NewRemoteOrder, RemoteDraftOrder, RemoteOrder, VariantStock},
};

#[derive(Default)]
struct FakeCommerceState {
    stock: HashMap<String, VariantStock>,
    orders_by_customer: HashMap<String, Vec<RemoteOrder>>,
    created_orders: u64,
    created_drafts: u64,
    unavailable: bool,
    calls: Vec<String>,
}

/// An in-memory stand-in for the remote platform. Stock levels and per-customer order lists are
/// seeded by the test; created orders are numbered `R-1001`, `R-1002`, … and drafts `D-1`,
/// `D-2`, …. Flip [`FakeCommerce::set_unavailable`] to simulate an unreachable platform.
#[derive(Clone, Default)]
pub struct FakeCommerce {
    inner: Arc<Mutex<FakeCommerceState>>,
}

impl FakeCommerce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stock(&self, variant_id: &str, quantity_available: i64, price: Cents) {
        let mut state = self.inner.lock().unwrap();
        state.stock.insert(
            variant_id.to_string(),
            VariantStock { id: variant_id.to_string(), quantity_available, price },
        );
    }

    pub fn push_customer_order(&self, customer_id: &str, order: RemoteOrder) {
        let mut state = self.inner.lock().unwrap();
        state.orders_by_customer.entry(customer_id.to_string()).or_default().push(order);
    }

    /// Replaces the financial status of a previously pushed remote order.
    pub fn set_remote_status(&self, remote_order_id: &str, status: FinancialStatus) {
        let mut state = self.inner.lock().unwrap();
        for orders in state.orders_by_customer.values_mut() {
            for order in orders.iter_mut().filter(|o| o.id == remote_order_id) {
                order.financial_status = Some(status.clone());
            }
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unwrap().unavailable = unavailable;
    }

    /// The coarse call log, one entry per remote call, e.g. `"variant_stock:V1"`.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    fn record(&self, call: String) -> Result<(), CommerceApiError> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(call);
        if state.unavailable {
            Err(CommerceApiError::Unavailable("the fake platform is down".to_string()))
        } else {
            Ok(())
        }
    }
}

impl CommerceClient for FakeCommerce {
    async fn create_order(&self, order: NewRemoteOrder) -> Result<RemoteOrder, CommerceApiError> {
        self.record(format!("create_order:{}", order.customer_id))?;
        let mut state = self.inner.lock().unwrap();
        state.created_orders += 1;
        let n = 1000 + state.created_orders;
        let total = order
            .line_items
            .iter()
            .map(|item| {
                let price = state.stock.get(&item.variant_id).map(|s| s.price.value()).unwrap_or_default();
                Cents::new(price * item.quantity)
            })
            .sum();
        let now = Utc::now();
        Ok(RemoteOrder {
            id: format!("R-{n}"),
            draft_order_id: None,
            order_number: Some(format!("#{n}")),
            total_price: Some(total),
            financial_status: Some(FinancialStatus::Pending),
            line_items: order.line_items,
            created_at: now,
            updated_at: now,
        })
    }

    async fn create_draft_order(&self, order: NewRemoteOrder) -> Result<RemoteDraftOrder, CommerceApiError> {
        self.record(format!("create_draft_order:{}", order.customer_id))?;
        let mut state = self.inner.lock().unwrap();
        state.created_drafts += 1;
        let n = state.created_drafts;
        Ok(RemoteDraftOrder { id: format!("D-{n}"), invoice_url: format!("https://shop.example/invoices/{n}") })
    }

    async fn customer_orders(&self, customer_id: &str) -> Result<Vec<RemoteOrder>, CommerceApiError> {
        self.record(format!("customer_orders:{customer_id}"))?;
        let state = self.inner.lock().unwrap();
        Ok(state.orders_by_customer.get(customer_id).cloned().unwrap_or_default())
    }

    async fn variant_stock(&self, variant_id: &str) -> Result<VariantStock, CommerceApiError> {
        self.record(format!("variant_stock:{variant_id}"))?;
        let state = self.inner.lock().unwrap();
        state.stock.get(variant_id).cloned().ok_or_else(|| CommerceApiError::NotFound(variant_id.to_string()))
    }

    async fn check_variants(&self, variant_ids: &[String]) -> Result<Vec<VariantStock>, CommerceApiError> {
        self.record(format!("check_variants:{}", variant_ids.join(",")))?;
        let state = self.inner.lock().unwrap();
        Ok(variant_ids.iter().filter_map(|id| state.stock.get(id).cloned()).collect())
    }
}
