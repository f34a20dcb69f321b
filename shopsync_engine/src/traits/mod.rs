//! # Engine trait seams
//!
//! The engine talks to two independently failing systems: the remote commerce platform and the
//! local order store. Both are reached through traits so that the reconciliation logic can be
//! exercised against fakes, and so that no component depends on a shared global client.
//!
//! * [`CommerceClient`] is the capability the remote platform exposes (order creation, order
//!   lists, live stock figures). The bundled HTTP implementation lives in the server crate; the
//!   engine never constructs one itself.
//! * [`InventoryCoordinator`] is the stock-gating contract consumed by the order flow. Reserve is
//!   a live availability check; confirm and release are idempotent transition hooks.
//! * [`OrderStore`] is the persistence boundary for [`crate::db_types::LocalOrder`] records.
mod commerce;
mod data_objects;
mod inventory;
mod order_store;

pub use commerce::{CommerceApiError, CommerceClient};
pub use data_objects::{DraftPromotion, NewRemoteOrder, RemoteDraftOrder, RemoteOrder, ShippingAddress, VariantStock};
pub use inventory::{InventoryCoordinator, InventoryError};
pub use order_store::{OrderStore, OrderStoreError};
