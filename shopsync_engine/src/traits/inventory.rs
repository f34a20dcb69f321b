use thiserror::Error;

use crate::traits::{CommerceApiError, VariantStock};

/// The stock-gating contract consumed by the order flow.
///
/// A reservation here is a live check against the remote platform, not a durable hold: two
/// concurrent reservations for the same variant can both observe sufficient stock. The platform's
/// own decrement at payment time is the final arbiter.
///
/// `confirm_reservation` and `release` are state-transition hooks with no remote side effect.
/// They must be idempotent and must never fail a caller's compensating flow, regardless of how
/// many times or in what order they are invoked.
#[allow(async_fn_in_trait)]
pub trait InventoryCoordinator {
    /// Queries availability for all the given variants in a single batched remote call.
    async fn check_availability(&self, variant_ids: &[String]) -> Result<Vec<VariantStock>, InventoryError>;

    /// Succeeds iff the variant's live availability covers the requested quantity.
    async fn reserve(&self, variant_id: &str, quantity: i64) -> Result<(), InventoryError>;

    async fn confirm_reservation(&self, variant_id: &str, quantity: i64) -> Result<(), InventoryError>;

    async fn release(&self, variant_id: &str, quantity: i64) -> Result<(), InventoryError>;
}

#[derive(Debug, Clone, Error)]
pub enum InventoryError {
    #[error("Insufficient stock for variant {variant_id}: requested {requested}, available {available}")]
    InsufficientStock { variant_id: String, requested: i64, available: i64 },
    #[error("Variant {0} was not found on the commerce platform")]
    VariantNotFound(String),
    #[error("The commerce platform could not be reached: {0}")]
    RemoteUnavailable(String),
    #[error("The commerce platform returned bad data: {0}")]
    RemoteDataError(String),
}

impl From<CommerceApiError> for InventoryError {
    fn from(e: CommerceApiError) -> Self {
        match e {
            CommerceApiError::Unavailable(msg) => InventoryError::RemoteUnavailable(msg),
            CommerceApiError::ResponseError(msg) => InventoryError::RemoteDataError(msg),
            CommerceApiError::NotFound(id) => InventoryError::VariantNotFound(id),
        }
    }
}
