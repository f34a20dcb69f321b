use std::env;

use log::*;
use shopify_client::ShopifyConfig as ShopifyApiConfig;
use ssg_common::{parse_boolean_flag, Secret};

const DEFAULT_SSG_HOST: &str = "127.0.0.1";
const DEFAULT_SSG_PORT: u16 = 8480;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/shopsync.db";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Shopify storefront configuration
    pub shopify: ShopifySyncConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SSG_HOST.to_string(),
            port: DEFAULT_SSG_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            shopify: ShopifySyncConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SSG_HOST").ok().unwrap_or_else(|| DEFAULT_SSG_HOST.into());
        let port = env::var("SSG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for SSG_PORT. {e} Using the default, {DEFAULT_SSG_PORT}, instead.");
                    DEFAULT_SSG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SSG_PORT);
        let database_url = env::var("SSG_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ SSG_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let shopify = ShopifySyncConfig::from_env_or_defaults();
        Self { host, port, database_url, shopify }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ShopifySyncConfig {
    /// The shop domain, e.g. "my-shop.myshopify.com"
    pub shop: String,
    pub api_version: String,
    pub admin_access_token: Secret<String>,
    pub storefront_access_token: Secret<String>,
    /// The key used to verify webhook signatures.
    pub hmac_secret: Secret<String>,
    /// When false, webhook signature checks are skipped. Local development only.
    pub hmac_checks: bool,
}

impl ShopifySyncConfig {
    pub fn from_env_or_defaults() -> Self {
        let api_config = ShopifyApiConfig::new_from_env_or_default();
        let hmac_checks = parse_boolean_flag(env::var("SSG_SHOPIFY_HMAC_CHECKS").ok(), true);
        if !hmac_checks {
            warn!("🚨️ Webhook HMAC checks are DISABLED. Anyone can forge order-state callbacks. Do not run like this in production.");
        }
        Self {
            shop: api_config.shop,
            api_version: api_config.api_version,
            hmac_secret: api_config.shared_secret.clone(),
            admin_access_token: api_config.admin_access_token,
            storefront_access_token: api_config.storefront_access_token,
            hmac_checks,
        }
    }

    pub fn shopify_api_config(&self) -> ShopifyApiConfig {
        ShopifyApiConfig {
            shop: self.shop.clone(),
            api_version: self.api_version.clone(),
            admin_access_token: self.admin_access_token.clone(),
            storefront_access_token: self.storefront_access_token.clone(),
            shared_secret: self.hmac_secret.clone(),
        }
    }
}
