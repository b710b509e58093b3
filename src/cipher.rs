//! Repeating-key XOR cipher over an established key.
//!
//! Each message byte is XORed with one key bit (0 or 1), the key being
//! cycled to the message length. This is a demonstration of using the
//! shared secret, not a secure construction.

use crate::core::errors::CipherError;

/// Encrypts `message` with `key` cycled to the message length.
///
/// The output has the same length as `message`.
///
/// # Errors
///
/// `CipherError::InvalidKey` if `key` is empty.
pub fn encrypt(message: &[u8], key: &[bool]) -> Result<Vec<u8>, CipherError> {
    if key.is_empty() {
        return Err(CipherError::InvalidKey);
    }

    Ok(message
        .iter()
        .zip(key.iter().cycle())
        .map(|(&byte, &bit)| byte ^ u8::from(bit))
        .collect())
}

/// Inverse of [`encrypt`]; XOR is its own inverse.
pub fn decrypt(ciphertext: &[u8], key: &[bool]) -> Result<Vec<u8>, CipherError> {
    encrypt(ciphertext, key)
}

pub fn encrypt_str(message: &str, key: &[bool]) -> Result<Vec<u8>, CipherError> {
    encrypt(message.as_bytes(), key)
}

pub fn decrypt_to_string(ciphertext: &[u8], key: &[bool]) -> Result<String, CipherError> {
    String::from_utf8(decrypt(ciphertext, key)?).map_err(|_| CipherError::InvalidUtf8)
}
