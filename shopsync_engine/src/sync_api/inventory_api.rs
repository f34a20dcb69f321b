use log::*;

use crate::traits::{CommerceClient, InventoryCoordinator, InventoryError, VariantStock};

/// The bundled [`InventoryCoordinator`] implementation: every check is a fresh remote call, and
/// nothing is cached or held locally.
///
/// Reservation is check-then-act against a platform with no compare-and-swap primitive, so two
/// concurrent reservations for the same variant can both pass even if their combined demand
/// exceeds supply. The platform performs the authoritative decrement when an order is paid, which
/// is why [`InventoryApi::confirm_reservation`] and [`InventoryApi::release`] need no remote
/// effect of their own.
#[derive(Debug, Clone)]
pub struct InventoryApi<C> {
    client: C,
}

impl<C> InventoryApi<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: CommerceClient> InventoryCoordinator for InventoryApi<C> {
    async fn check_availability(&self, variant_ids: &[String]) -> Result<Vec<VariantStock>, InventoryError> {
        let stock = self.client.check_variants(variant_ids).await?;
        debug!("📦️ Availability check returned {} of {} variants", stock.len(), variant_ids.len());
        Ok(stock)
    }

    async fn reserve(&self, variant_id: &str, quantity: i64) -> Result<(), InventoryError> {
        let stock = self.client.variant_stock(variant_id).await?;
        if stock.quantity_available < quantity {
            return Err(InventoryError::InsufficientStock {
                variant_id: variant_id.to_string(),
                requested: quantity,
                available: stock.quantity_available,
            });
        }
        debug!("📦️ Reserved {quantity} × variant {variant_id} ({} available)", stock.quantity_available);
        Ok(())
    }

    async fn confirm_reservation(&self, variant_id: &str, quantity: i64) -> Result<(), InventoryError> {
        // The platform decrements stock itself when the order is marked paid.
        trace!("📦️ Confirmed reservation of {quantity} × variant {variant_id}");
        Ok(())
    }

    async fn release(&self, variant_id: &str, quantity: i64) -> Result<(), InventoryError> {
        // Nothing is held locally, so there is nothing to give back yet. The hook stays so a
        // future reservation ledger can slot in without touching the order flow.
        trace!("📦️ Released reservation of {quantity} × variant {variant_id}");
        Ok(())
    }
}
