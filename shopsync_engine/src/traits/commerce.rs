use thiserror::Error;

use crate::traits::{NewRemoteOrder, RemoteDraftOrder, RemoteOrder, VariantStock};

/// The remote commerce platform capability consumed by the engine.
///
/// Implementations wrap the platform's HTTP APIs and carry no business logic: they translate wire
/// shapes and surface transport errors, nothing more. The client is always injected through a
/// constructor so tests can substitute a fake.
///
/// Every call must be bounded by a timeout. An expired or unreachable call surfaces as
/// [`CommerceApiError::Unavailable`]; an application-level error body surfaces as
/// [`CommerceApiError::ResponseError`].
#[allow(async_fn_in_trait)]
pub trait CommerceClient {
    /// Creates a real (unpaid) order. The platform performs its own stock decrement at payment
    /// time.
    async fn create_order(&self, order: NewRemoteOrder) -> Result<RemoteOrder, CommerceApiError>;

    /// Creates a draft order and returns its invoice URL for the customer to pay.
    async fn create_draft_order(&self, order: NewRemoteOrder) -> Result<RemoteDraftOrder, CommerceApiError>;

    /// Fetches the full order list for the given remote customer.
    async fn customer_orders(&self, customer_id: &str) -> Result<Vec<RemoteOrder>, CommerceApiError>;

    /// Fetches the live stock figure for a single variant.
    async fn variant_stock(&self, variant_id: &str) -> Result<VariantStock, CommerceApiError>;

    /// Checks availability for a batch of variants in a single call. Unknown ids are omitted from
    /// the result.
    async fn check_variants(&self, variant_ids: &[String]) -> Result<Vec<VariantStock>, CommerceApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum CommerceApiError {
    #[error("The commerce platform could not be reached: {0}")]
    Unavailable(String),
    #[error("The commerce platform returned an error: {0}")]
    ResponseError(String),
    #[error("Not found on the commerce platform: {0}")]
    NotFound(String),
}
