//! # Shopsync Engine
//!
//! The engine keeps a local, queryable record of storefront orders consistent with a remote
//! commerce platform that is reached over HTTP and that reports state changes asynchronously.
//! There is no shared transaction between the two systems, so the engine leans on three things:
//! compensating actions during order creation, idempotent upserts during pull-based syncs, and
//! no-op-tolerant inventory transitions when webhooks are redelivered or arrive out of order.
//!
//! The crate is split into:
//! 1. The trait seams ([`mod@traits`]): the persistence boundary ([`OrderStore`]), the remote
//!    platform capability ([`CommerceClient`]) and the stock-gating contract
//!    ([`InventoryCoordinator`]). Every dependency is injected through a constructor so tests can
//!    substitute fakes; nothing reaches for ambient global state.
//! 2. The public API ([`mod@sync_api`]): [`OrderFlowApi`] drives order creation, webhook
//!    transitions and syncs; [`InventoryApi`] performs live availability checks against the
//!    remote platform.
//! 3. The SQLite backend ([`mod@sqlite`]), the bundled [`OrderStore`] implementation.
#[cfg(feature = "sqlite")]
mod sqlite;

pub mod db_types;
pub mod sync_api;
pub mod traits;

pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use sync_api::{
    errors::OrderFlowError,
    inventory_api::InventoryApi,
    order_flow_api::OrderFlowApi,
    order_objects,
};
pub use traits::{CommerceApiError, CommerceClient, InventoryCoordinator, InventoryError, OrderStore, OrderStoreError};
