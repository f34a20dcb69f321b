use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Computes the base64-encoded HMAC-SHA256 signature Shopify attaches to webhook deliveries.
/// The signature is over the exact payload bytes as sent, so callers must not re-serialize the
/// body before checking it.
pub fn calculate_hmac(secret: &str, data: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC keys can be any length");
    mac.update(data);
    base64::encode(mac.finalize().into_bytes())
}
