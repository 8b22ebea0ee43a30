//! Best-effort decryption of wrapped configuration secrets.
//!
//! Responsibilities:
//! - Recognize `{cipher}…` and `ENC(…)` wrapped values.
//! - Decrypt payloads produced by Spring's `Encryptors.text(key, "deadbeef")`:
//!   hex text holding a 16-byte IV followed by AES-256-CBC ciphertext, keyed
//!   with PBKDF2-HMAC-SHA1 over the passphrase and a fixed salt.
//!
//! Does NOT handle:
//! - Key management or encryption of new secrets.
//!
//! Invariants:
//! - [`decrypt`] never fails. Missing keys and any decryption error return the
//!   trimmed input unchanged.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};
use sha1::Sha1;
use thiserror::Error;

const CIPHER_PREFIX: &str = "{cipher}";
const ENC_PREFIX: &str = "ENC(";
const ENC_SUFFIX: &str = ")";

/// Hex salt shared by every Spring text encryptor built with it.
const FIXED_SALT_HEX: &str = "deadbeef";
const PBKDF2_ROUNDS: u32 = 1024;
const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Reasons a wrapped payload could not be decrypted. Internal only.
#[derive(Debug, Error)]
pub(crate) enum DecryptError {
	#[error("payload is not valid hex: {0}")]
	InvalidHex(#[from] hex::FromHexError),

	#[error("payload too short: {0} bytes")]
	TooShort(usize),

	#[error("invalid key or iv length")]
	InvalidLength,

	#[error("bad padding or wrong key")]
	Unpad,

	#[error("plaintext is not UTF-8")]
	NotUtf8(#[from] std::string::FromUtf8Error),
}

/// Extract the payload of a wrapped secret, or `None` if `value` is not wrapped.
fn unwrap_payload(value: &str) -> Option<&str> {
	if let Some(payload) = value.strip_prefix(CIPHER_PREFIX) {
		return Some(payload);
	}
	value
		.strip_prefix(ENC_PREFIX)
		.and_then(|rest| rest.strip_suffix(ENC_SUFFIX))
}

/// Whether `value` is wrapped in a recognized cipher marker.
pub fn is_wrapped(value: &str) -> bool {
	unwrap_payload(value.trim()).is_some()
}

/// Decrypt `value` if it is wrapped and a passphrase is available.
///
/// Unwrapped values come back trimmed. Wrapped values come back unchanged
/// (trimmed) when there is no passphrase or decryption fails.
pub fn decrypt(value: &str, passphrase: Option<&str>) -> String {
	let trimmed = value.trim();
	let Some(payload) = unwrap_payload(trimmed) else {
		return trimmed.to_string();
	};

	let Some(passphrase) = passphrase.filter(|p| !p.is_empty()) else {
		return trimmed.to_string();
	};

	match decrypt_payload(payload, passphrase) {
		Ok(plain) => plain,
		Err(e) => {
			tracing::debug!(error = %e, "secret decryption failed, keeping wrapped value");
			trimmed.to_string()
		}
	}
}

fn derive_key(passphrase: &str) -> Result<[u8; KEY_LEN], DecryptError> {
	let salt = hex::decode(FIXED_SALT_HEX)?;
	let mut key = [0u8; KEY_LEN];
	pbkdf2::pbkdf2_hmac::<Sha1>(passphrase.as_bytes(), &salt, PBKDF2_ROUNDS, &mut key);
	Ok(key)
}

fn decrypt_payload(payload: &str, passphrase: &str) -> Result<String, DecryptError> {
	let bytes = hex::decode(payload.trim())?;
	if bytes.len() <= IV_LEN {
		return Err(DecryptError::TooShort(bytes.len()));
	}
	let (iv, ciphertext) = bytes.split_at(IV_LEN);

	let key = derive_key(passphrase)?;
	let plain = Aes256CbcDec::new_from_slices(&key, iv)
		.map_err(|_| DecryptError::InvalidLength)?
		.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
		.map_err(|_| DecryptError::Unpad)?;

	Ok(String::from_utf8(plain)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use cbc::cipher::BlockEncryptMut;

	/// Encrypt the way Spring's hex text encryptor does, with a caller-chosen IV.
	fn spring_encrypt(plain: &str, passphrase: &str, iv: [u8; IV_LEN]) -> String {
		let key = derive_key(passphrase).unwrap();
		let ciphertext = cbc::Encryptor::<Aes256>::new_from_slices(&key, &iv)
			.unwrap()
			.encrypt_padded_vec_mut::<Pkcs7>(plain.as_bytes());
		let mut out = iv.to_vec();
		out.extend_from_slice(&ciphertext);
		hex::encode(out)
	}

	#[test]
	fn test_cipher_without_key_is_unchanged() {
		assert_eq!(decrypt("{cipher}abc", None), "{cipher}abc");
		assert_eq!(decrypt("{cipher}abc", Some("")), "{cipher}abc");
	}

	#[test]
	fn test_enc_with_bad_key_is_unchanged() {
		assert_eq!(decrypt("ENC(xyz)", Some("bad")), "ENC(xyz)");
	}

	#[test]
	fn test_plain_values_are_trimmed() {
		assert_eq!(decrypt("  hunter2  ", Some("key")), "hunter2");
		assert_eq!(decrypt("ENC(unterminated", Some("key")), "ENC(unterminated");
	}

	#[test]
	fn test_cipher_round_trip() {
		let payload = spring_encrypt("s3cret-password", "my-key", [7u8; IV_LEN]);

		let wrapped = format!("{{cipher}}{payload}");
		assert_eq!(decrypt(&wrapped, Some("my-key")), "s3cret-password");

		let wrapped = format!("  ENC({payload})  ");
		assert_eq!(decrypt(&wrapped, Some("my-key")), "s3cret-password");
	}

	#[test]
	fn test_wrong_key_keeps_wrapped_value() {
		let payload = spring_encrypt("value", "right-key", [1u8; IV_LEN]);
		let wrapped = format!("{{cipher}}{payload}");

		// A wrong key almost always fails padding; if it unpads by chance the
		// bytes are garbage and must not equal the original plaintext.
		assert_ne!(decrypt(&wrapped, Some("wrong-key")), "value");
	}

	#[test]
	fn test_short_payload_fails_open() {
		assert_eq!(decrypt("{cipher}00ff", Some("k")), "{cipher}00ff");
		assert!(matches!(
			decrypt_payload("00ff", "k"),
			Err(DecryptError::TooShort(2))
		));
	}

	#[test]
	fn test_misaligned_ciphertext_fails_open() {
		let payload = "00".repeat(IV_LEN + 5);
		let wrapped = format!("{{cipher}}{payload}");

		assert_eq!(decrypt(&wrapped, Some("k")), wrapped);
	}

	#[test]
	fn test_is_wrapped() {
		assert!(is_wrapped("{cipher}abc"));
		assert!(is_wrapped(" ENC(abc) "));
		assert!(!is_wrapped("ENC(abc"));
		assert!(!is_wrapped("plain"));
	}
}
