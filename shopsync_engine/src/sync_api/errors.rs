use thiserror::Error;

use crate::{
    db_types::OrderValidationError,
    traits::{CommerceApiError, InventoryError, OrderStoreError},
};

/// The failure modes of the order flow, kept distinct so callers can tell "out of stock" apart
/// from "platform unreachable" and map each to its own response.
#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Insufficient stock for variant {variant_id}: requested {requested}, available {available}")]
    InsufficientStock { variant_id: String, requested: i64, available: i64 },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("The commerce platform could not be reached: {0}")]
    RemoteUnavailable(String),
    #[error("The commerce platform returned bad data: {0}")]
    RemoteDataError(String),
    #[error("User {0} has no linked storefront customer")]
    UserNotLinked(String),
    #[error("No local order matches remote order {0}")]
    OrderNotFound(String),
    #[error("Could not write to the order store: {0}")]
    PersistenceError(String),
    #[error("Invalid order: {0}")]
    InvalidOrder(#[from] OrderValidationError),
}

impl From<InventoryError> for OrderFlowError {
    fn from(e: InventoryError) -> Self {
        match e {
            InventoryError::InsufficientStock { variant_id, requested, available } => {
                OrderFlowError::InsufficientStock { variant_id, requested, available }
            },
            InventoryError::VariantNotFound(id) => OrderFlowError::NotFound(format!("variant {id}")),
            InventoryError::RemoteUnavailable(msg) => OrderFlowError::RemoteUnavailable(msg),
            InventoryError::RemoteDataError(msg) => OrderFlowError::RemoteDataError(msg),
        }
    }
}

impl From<CommerceApiError> for OrderFlowError {
    fn from(e: CommerceApiError) -> Self {
        match e {
            CommerceApiError::Unavailable(msg) => OrderFlowError::RemoteUnavailable(msg),
            CommerceApiError::ResponseError(msg) => OrderFlowError::RemoteDataError(msg),
            CommerceApiError::NotFound(what) => OrderFlowError::NotFound(what),
        }
    }
}

impl From<OrderStoreError> for OrderFlowError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::OrderNotFound(id) => OrderFlowError::OrderNotFound(id.to_string()),
            OrderStoreError::DatabaseError(msg) => OrderFlowError::PersistenceError(msg),
        }
    }
}
