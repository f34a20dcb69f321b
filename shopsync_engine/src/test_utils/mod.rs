//! Test fixtures for exercising the order flow without a live storefront.
//!
//! [`FakeCommerce`] stands in for the remote platform behind the [`crate::traits::CommerceClient`]
//! seam; [`RecordingInventory`] wraps any coordinator and records the reserve/confirm/release
//! traffic so tests can assert on compensation behaviour.
mod fake_commerce;
mod recording;

pub use fake_commerce::FakeCommerce;
pub use recording::{InventoryCall, RecordingInventory};
