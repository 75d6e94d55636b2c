use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes128Gcm, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

/// Fixed settings key. Not derived from any user secret; changing it would
/// make every existing settings file unreadable.
const ENCRYPTION_KEY: &[u8; 16] = b"0123456789012345";

pub const NONCE_SIZE: usize = 12;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption error")]
    EncryptionError,
    #[error("Decryption error")]
    DecryptionError,
    #[error("encrypted data is too short")]
    CiphertextTooShort,
}

fn cipher() -> Aes128Gcm {
    Aes128Gcm::new(ENCRYPTION_KEY.into())
}

/// Encrypt with AES-128-GCM. Output is `nonce || ciphertext || tag`.
pub fn encrypt_data(data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let encrypted = cipher()
        .encrypt(Nonce::from_slice(&nonce), data)
        .map_err(|_| CryptoError::EncryptionError)?;

    let mut out = Vec::with_capacity(NONCE_SIZE + encrypted.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&encrypted);
    Ok(out)
}

pub fn decrypt_data(encrypted_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if encrypted_data.len() < NONCE_SIZE {
        return Err(CryptoError::CiphertextTooShort);
    }
    let (nonce, ciphertext) = encrypted_data.split_at(NONCE_SIZE);
    cipher()
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::DecryptionError)
}
