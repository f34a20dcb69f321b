use ssg_common::Cents;

use crate::ShopifyApiError;

const VARIANT_GID_PREFIX: &str = "gid://shopify/ProductVariant/";

/// Shopify expresses prices as decimal strings, e.g. "42.50".
pub fn parse_shopify_price(price: &str) -> Result<Cents, ShopifyApiError> {
    price.parse::<Cents>().map_err(|e| ShopifyApiError::InvalidCurrencyAmount(e.to_string()))
}

/// Strips the Storefront GID prefix from a variant id, if present. The Admin REST endpoints only
/// accept the bare numeric id.
pub fn numeric_variant_id(id: &str) -> &str {
    if id.contains("gid://") {
        id.rsplit('/').next().unwrap_or(id)
    } else {
        id
    }
}

/// Expands a bare numeric variant id into the GID form the Storefront GraphQL API expects.
pub fn variant_gid(id: &str) -> String {
    if id.starts_with("gid://") {
        id.to_string()
    } else {
        format!("{VARIANT_GID_PREFIX}{id}")
    }
}
