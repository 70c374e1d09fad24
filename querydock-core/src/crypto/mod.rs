//! Authenticated encryption of the favorites file.
//!
//! AES-256-CBC with PKCS#7 padding, authenticated by HMAC-SHA-256 over the
//! ciphertext (encrypt-then-MAC). The construction is fixed by the on-disk
//! format written by historical clients; the key is a raw 256-bit value
//! supplied by an external secret store — no derivation happens here.

mod envelope;
mod key;

pub use envelope::{is_encrypted, EncryptedPayload, CURRENT_ENVELOPE_VERSION};
pub use key::{KeyCache, SymmetricKey, KEY_LENGTH};

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::Aes256;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::error::{CoreError, CoreResult};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

const IV_LENGTH: usize = 16;

fn hmac_over(key: &SymmetricKey, ciphertext: &[u8]) -> CoreResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| CoreError::Format(format!("invalid HMAC key: {e}")))?;
    mac.update(ciphertext);
    Ok(mac)
}

/// Encrypts `plaintext` under `key` into a serialized envelope.
///
/// A fresh random 128-bit IV is generated per call; the integrity tag is
/// computed over the ciphertext only.
pub fn encrypt(plaintext: &str, key: &SymmetricKey) -> CoreResult<String> {
    let mut iv = [0u8; IV_LENGTH];
    rand::rng().fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new(key.into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let tag = hmac_over(key, &ciphertext)?.finalize().into_bytes();

    let payload = EncryptedPayload {
        iv: hex::encode(iv),
        hmac: hex::encode(tag),
        ciphertext: hex::encode(&ciphertext),
        version: Some(CURRENT_ENVELOPE_VERSION),
    };
    serde_json::to_string(&payload).map_err(|e| CoreError::Serialization(e.to_string()))
}

/// Decrypts a serialized envelope produced by [`encrypt`] (or a legacy
/// client).
///
/// The tag is recomputed over the received ciphertext and compared in
/// constant time before any decryption is attempted; a mismatch fails with
/// [`CoreError::Integrity`]. Malformed JSON, hex, IV length, or padding
/// fail with [`CoreError::Format`].
pub fn decrypt(payload: &str, key: &SymmetricKey) -> CoreResult<String> {
    let envelope: EncryptedPayload = serde_json::from_str(payload)
        .map_err(|e| CoreError::Format(format!("malformed encrypted payload: {e}")))?;

    if let Some(version) = envelope.version {
        if version != CURRENT_ENVELOPE_VERSION {
            return Err(CoreError::Format(format!(
                "unsupported envelope version {version}"
            )));
        }
    }

    let ciphertext = hex::decode(&envelope.ciphertext)
        .map_err(|e| CoreError::Format(format!("invalid ciphertext hex: {e}")))?;
    let tag = hex::decode(&envelope.hmac)
        .map_err(|e| CoreError::Format(format!("invalid hmac hex: {e}")))?;

    // Constant-time comparison via the Mac verifier; abort before touching
    // the cipher on mismatch.
    hmac_over(key, &ciphertext)?
        .verify_slice(&tag)
        .map_err(|_| CoreError::Integrity)?;

    let iv = hex::decode(&envelope.iv)
        .map_err(|e| CoreError::Format(format!("invalid iv hex: {e}")))?;
    let plaintext = Aes256CbcDec::new_from_slices(key, &iv)
        .map_err(|_| CoreError::Format("invalid IV length".to_string()))?
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| CoreError::Format("invalid padding".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|e| CoreError::Format(format!("decrypted payload is not UTF-8: {e}")))
}
