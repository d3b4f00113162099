//! Key and nonce sizes per AEAD algorithm.
//!
//! Sizes come from [`SecurityParameters`]; the checks here run before any key
//! material reaches a cipher.

use crate::error::CryptoError;
use crate::params::SecurityParameters;

/// AEAD algorithms the parameters cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cipher {
    Aes256Gcm,
    ChaCha20Poly1305,
}

impl Cipher {
    pub fn name(&self) -> &'static str {
        match self {
            Cipher::Aes256Gcm => "AES-256-GCM",
            Cipher::ChaCha20Poly1305 => "ChaCha20-Poly1305",
        }
    }

    pub fn key_len(&self, params: &SecurityParameters) -> usize {
        match self {
            Cipher::Aes256Gcm => params.aes_key_size_bytes() as usize,
            Cipher::ChaCha20Poly1305 => params.chacha_key_size_bytes() as usize,
        }
    }

    pub fn nonce_len(&self, params: &SecurityParameters) -> usize {
        match self {
            Cipher::Aes256Gcm => params.aes_nonce_size_bytes() as usize,
            Cipher::ChaCha20Poly1305 => params.chacha_nonce_size_bytes() as usize,
        }
    }

    /// Rejects key material of the wrong length before any cipher sees it.
    pub fn check_key(&self, params: &SecurityParameters, key: &[u8]) -> Result<(), CryptoError> {
        let expected = self.key_len(params);
        if key.len() != expected {
            return Err(CryptoError::InvalidKey {
                algorithm: self.name(),
                expected,
                actual: key.len(),
            });
        }
        Ok(())
    }

    /// A nonce of the wrong size is reported as a bad key input; the nonce
    /// itself is public so its length is safe to echo.
    pub fn check_nonce(
        &self,
        params: &SecurityParameters,
        nonce: &[u8],
    ) -> Result<(), CryptoError> {
        let expected = self.nonce_len(params);
        if nonce.len() != expected {
            return Err(CryptoError::InvalidKey {
                algorithm: self.name(),
                expected,
                actual: nonce.len(),
            });
        }
        Ok(())
    }

    /// The error a nonce tracker raises when it sees a repeat under this
    /// cipher.
    pub fn nonce_reused(&self) -> CryptoError {
        CryptoError::NonceReuse {
            algorithm: self.name(),
        }
    }
}
