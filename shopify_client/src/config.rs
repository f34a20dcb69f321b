use log::*;
use ssg_common::Secret;

#[derive(Debug, Clone, Default)]
pub struct ShopifyConfig {
    /// The shop domain, e.g. "my-shop.myshopify.com"
    pub shop: String,
    pub api_version: String,
    /// Admin API token. Used for order, draft order, customer and variant endpoints.
    pub admin_access_token: Secret<String>,
    /// Storefront API token. Used for the batched availability check.
    pub storefront_access_token: Secret<String>,
    /// The shared secret used to sign webhook payloads.
    pub shared_secret: Secret<String>,
}

impl ShopifyConfig {
    pub fn new_from_env_or_default() -> Self {
        let shop = std::env::var("SSG_SHOPIFY_SHOP").unwrap_or_else(|_| {
            warn!("SSG_SHOPIFY_SHOP not set, using a (probably useless) default");
            "example.myshopify.com".to_string()
        });
        let api_version = std::env::var("SSG_SHOPIFY_API_VERSION").unwrap_or_else(|_| {
            warn!("SSG_SHOPIFY_API_VERSION not set, using 2024-01 as default");
            "2024-01".to_string()
        });
        let admin_access_token = Secret::new(std::env::var("SSG_SHOPIFY_ADMIN_ACCESS_TOKEN").unwrap_or_else(|_| {
            warn!("SSG_SHOPIFY_ADMIN_ACCESS_TOKEN not set, using a (probably useless) default");
            "shpat_00000000000000".to_string()
        }));
        let storefront_access_token =
            Secret::new(std::env::var("SSG_SHOPIFY_STOREFRONT_ACCESS_TOKEN").unwrap_or_else(|_| {
                warn!("SSG_SHOPIFY_STOREFRONT_ACCESS_TOKEN not set, using a (probably useless) default");
                "00000000000000".to_string()
            }));
        let shared_secret = Secret::new(std::env::var("SSG_SHOPIFY_WEBHOOK_SECRET").unwrap_or_else(|_| {
            warn!("SSG_SHOPIFY_WEBHOOK_SECRET not set, using a (probably useless) default");
            "00000000000000".to_string()
        }));
        Self { shop, api_version, admin_access_token, storefront_access_token, shared_secret }
    }
}
