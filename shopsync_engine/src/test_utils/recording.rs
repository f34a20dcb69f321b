use std::sync::{Arc, Mutex};

use crate::traits::{InventoryCoordinator, InventoryError, VariantStock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryCall {
    Reserve(String, i64),
    Confirm(String, i64),
    Release(String, i64),
}

/// Wraps an [`InventoryCoordinator`] and records every call, in order, so tests can assert on the
/// exact compensation traffic a flow produced.
#[derive(Clone)]
pub struct RecordingInventory<I> {
    inner: I,
    calls: Arc<Mutex<Vec<InventoryCall>>>,
}

impl<I> RecordingInventory<I> {
    pub fn new(inner: I) -> Self {
        Self { inner, calls: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn calls(&self) -> Vec<InventoryCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn releases(&self) -> Vec<(String, i64)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                InventoryCall::Release(id, qty) => Some((id, qty)),
                _ => None,
            })
            .collect()
    }

    pub fn confirms(&self) -> Vec<(String, i64)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                InventoryCall::Confirm(id, qty) => Some((id, qty)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: InventoryCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl<I: InventoryCoordinator> InventoryCoordinator for RecordingInventory<I> {
    async fn check_availability(&self, variant_ids: &[String]) -> Result<Vec<VariantStock>, InventoryError> {
        self.inner.check_availability(variant_ids).await
    }

    async fn reserve(&self, variant_id: &str, quantity: i64) -> Result<(), InventoryError> {
        self.record(InventoryCall::Reserve(variant_id.to_string(), quantity));
        self.inner.reserve(variant_id, quantity).await
    }

    async fn confirm_reservation(&self, variant_id: &str, quantity: i64) -> Result<(), InventoryError> {
        self.record(InventoryCall::Confirm(variant_id.to_string(), quantity));
        self.inner.confirm_reservation(variant_id, quantity).await
    }

    async fn release(&self, variant_id: &str, quantity: i64) -> Result<(), InventoryError> {
        self.record(InventoryCall::Release(variant_id.to_string(), quantity));
        self.inner.release(variant_id, quantity).await
    }
}
