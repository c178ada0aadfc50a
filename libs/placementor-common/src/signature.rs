use std::fmt::Write as _;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

/// Payment signature semantics - defines only the signing scheme, not
/// request plumbing. Ensures the probe and any local verification agree
/// on the exact bytes being signed.
///
/// The gateway signs the byte string `"{order_id}|{payment_id}"` with
/// HMAC-SHA256 under the shared key secret and compares lowercase hex.

type HmacSha256 = Hmac<Sha256>;

/// Compute the expected gateway signature for an (order, payment) pair.
pub fn payment_signature(order_id: &str, payment_id: &str, secret: &str) -> String {
    hmac_sha256_hex(secret.as_bytes(), format!("{order_id}|{payment_id}").as_bytes())
}

/// Generate a gateway-format mock payment id: `pay_` + 14 hex chars.
pub fn mock_payment_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("pay_{}", &hex[..14])
}

fn hmac_sha256_hex(key: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(message);
    let digest = mac.finalize().into_bytes();

    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
