//! Argon2id settings derived from the security parameters.
//!
//! This module only configures the KDF; running it is left to the caller.
//! Parameters that fail [`validate`] never produce an Argon2 instance.

use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::{CryptoError, KeyDerivationFailure};
use crate::params::{SecurityParameters, validate};

pub const ALGORITHM: Algorithm = Algorithm::Argon2id;
pub const VERSION: Version = Version::V0x13;

/// Argon2 cost parameters with an output length of one AES key.
pub fn argon2_params(params: &SecurityParameters) -> Result<Params, CryptoError> {
    validate(params).map_err(|err| {
        tracing::warn!(error = %err, "refusing to configure Argon2 below the policy floor");
        CryptoError::KeyDerivation {
            reason: KeyDerivationFailure::Parameters {
                detail: err.to_string(),
            },
        }
    })?;

    Ok(Params::new(
        params.argon2_memory_cost_kib(),
        params.argon2_time_cost(),
        params.argon2_parallelism(),
        Some(params.aes_key_size_bytes() as usize),
    )?)
}

pub fn argon2id(params: &SecurityParameters) -> Result<Argon2<'static>, CryptoError> {
    Ok(Argon2::new(ALGORITHM, VERSION, argon2_params(params)?))
}

pub fn check_salt(params: &SecurityParameters, salt: &[u8]) -> Result<(), CryptoError> {
    let minimum = params.salt_size_bytes() as usize;
    if salt.len() < minimum {
        return Err(CryptoError::KeyDerivation {
            reason: KeyDerivationFailure::InvalidSalt {
                detail: format!("{} bytes, at least {minimum} required", salt.len()),
            },
        });
    }
    Ok(())
}
