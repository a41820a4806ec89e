//! Webhook request signing: `base64(HMAC-SHA256(channel_secret, body))`.

use {
    base64::{Engine, engine::general_purpose::STANDARD},
    hmac::{Hmac, Mac},
    sha2::Sha256,
};

use crate::error::LineError;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

type HmacSha256 = Hmac<Sha256>;

fn mac(channel_secret: &str, body: &[u8]) -> Result<HmacSha256, LineError> {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .map_err(|_| LineError::InvalidSignature)?;
    mac.update(body);
    Ok(mac)
}

/// The signature LINE would send for `body`.
pub fn sign(channel_secret: &str, body: &[u8]) -> Result<String, LineError> {
    Ok(STANDARD.encode(mac(channel_secret, body)?.finalize().into_bytes()))
}

/// Check `signature` against `body`. A missing header is an invalid signature.
pub fn verify(channel_secret: &str, signature: Option<&str>, body: &[u8]) -> Result<(), LineError> {
    let signature = signature.ok_or(LineError::InvalidSignature)?;
    let expected = STANDARD
        .decode(signature.trim())
        .map_err(|_| LineError::InvalidSignature)?;
    mac(channel_secret, body)?
        .verify_slice(&expected)
        .map_err(|_| LineError::InvalidSignature)
}
