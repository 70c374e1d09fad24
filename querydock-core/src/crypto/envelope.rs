//! The on-disk encrypted envelope and its shape check.
//!
//! Two generations coexist:
//! - legacy — exactly `{"iv","hmac","ciphertext"}`, lowercase hex, written
//!   by historical clients;
//! - current — the same three fields plus an explicit `"version"`
//!   discriminator, so future algorithm changes don't have to rely on
//!   structural sniffing forever.
//!
//! Both decrypt identically today; version numbers other than
//! [`CURRENT_ENVELOPE_VERSION`] are rejected rather than guessed at.

use serde::{Deserialize, Serialize};

/// Current envelope format version number.
pub const CURRENT_ENVELOPE_VERSION: u32 = 1;

/// The serialized form of an encrypted favorites file.
///
/// `hmac` authenticates `ciphertext` (encrypt-then-MAC) — not the plaintext
/// and not the IV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncryptedPayload {
    /// 16 random bytes, lowercase hex.
    pub iv: String,
    /// HMAC-SHA-256 over the ciphertext, lowercase hex.
    pub hmac: String,
    /// AES-256-CBC ciphertext, lowercase hex.
    pub ciphertext: String,
    /// Format discriminator; absent on legacy payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

fn is_lower_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl EncryptedPayload {
    /// Structural validity: every field non-empty lowercase hex.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        is_lower_hex(&self.iv) && is_lower_hex(&self.hmac) && is_lower_hex(&self.ciphertext)
    }
}

/// Whether `text` is an encrypted envelope, judged purely by shape.
///
/// Used to tell legacy plaintext favorites files from encrypted ones
/// without semantically parsing untrusted input. True only for exact-shape
/// JSON (the three hex fields, optionally `version`); false for profile
/// arrays, truncated payloads, and anything with extra keys.
#[must_use]
pub fn is_encrypted(text: &str) -> bool {
    serde_json::from_str::<EncryptedPayload>(text)
        .map(|payload| payload.is_well_formed())
        .unwrap_or(false)
}
