//! Security parameters for password hashing and authenticated encryption.
//!
//! Sizes are fixed at compile time. The KDF cost factors default to the
//! constants in [`defaults`] and can only be replaced by building a new
//! value with [`SecurityParameters::with_kdf_cost`], which still has to pass
//! [`validate`] before anything uses it.

use serde::Serialize;

use crate::error::ConfigError;

/// Compiled-in parameter values.
pub mod defaults {
    /// 256-bit salt.
    pub const SALT_SIZE_BYTES: u32 = 32;
    /// AES-256.
    pub const AES_KEY_SIZE_BYTES: u32 = 32;
    pub const CHACHA_KEY_SIZE_BYTES: u32 = 32;
    /// 96-bit GCM nonce (RFC 5116).
    pub const AES_NONCE_SIZE_BYTES: u32 = 12;
    /// 96-bit ChaCha20-Poly1305 nonce (RFC 8439).
    pub const CHACHA_NONCE_SIZE_BYTES: u32 = 12;

    /// Legacy KDF, kept for reading old data only.
    pub const PBKDF2_ITERATIONS: u32 = 600_000;

    pub const ARGON2_TIME_COST: u32 = 3;
    /// 64 MiB
    pub const ARGON2_MEMORY_COST_KIB: u32 = 64 * 1024;
    pub const ARGON2_PARALLELISM: u32 = 4;

    pub const CRYPTO_VERSION: &str = "1.0.0";
    /// NIST SP 800-63B
    pub const MIN_PASSWORD_LENGTH: u32 = 12;
}

/// Policy floors enforced by [`validate`](super::validate).
pub mod minimums {
    /// OWASP 2023 minimum for PBKDF2-HMAC-SHA256.
    pub const PBKDF2_ITERATIONS: u32 = 600_000;
    /// 64 MiB
    pub const ARGON2_MEMORY_COST_KIB: u32 = 65_536;
    pub const ARGON2_TIME_COST: u32 = 2;
    pub const ARGON2_PARALLELISM: u32 = 1;
}

/// The tunable KDF cost factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfCost {
    pub pbkdf2_iterations: u32,
    pub argon2_time_cost: u32,
    pub argon2_memory_cost_kib: u32,
    pub argon2_parallelism: u32,
}

impl Default for KdfCost {
    fn default() -> Self {
        Self {
            pbkdf2_iterations: defaults::PBKDF2_ITERATIONS,
            argon2_time_cost: defaults::ARGON2_TIME_COST,
            argon2_memory_cost_kib: defaults::ARGON2_MEMORY_COST_KIB,
            argon2_parallelism: defaults::ARGON2_PARALLELISM,
        }
    }
}

/// Immutable parameter set shared by every cryptographic operation.
///
/// Fields are private and there are no setters. The process-wide instance
/// lives in [`crate::registry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityParameters {
    salt_size_bytes: u32,
    aes_key_size_bytes: u32,
    chacha_key_size_bytes: u32,
    aes_nonce_size_bytes: u32,
    chacha_nonce_size_bytes: u32,
    pbkdf2_iterations: u32,
    argon2_time_cost: u32,
    argon2_memory_cost_kib: u32,
    argon2_parallelism: u32,
    crypto_version: &'static str,
    min_password_length: u32,
}

impl Default for SecurityParameters {
    fn default() -> Self {
        Self::with_kdf_cost(KdfCost::default())
    }
}

impl SecurityParameters {
    /// Fixed sizes with the given cost factors. Not validated.
    pub const fn with_kdf_cost(cost: KdfCost) -> Self {
        Self {
            salt_size_bytes: defaults::SALT_SIZE_BYTES,
            aes_key_size_bytes: defaults::AES_KEY_SIZE_BYTES,
            chacha_key_size_bytes: defaults::CHACHA_KEY_SIZE_BYTES,
            aes_nonce_size_bytes: defaults::AES_NONCE_SIZE_BYTES,
            chacha_nonce_size_bytes: defaults::CHACHA_NONCE_SIZE_BYTES,
            pbkdf2_iterations: cost.pbkdf2_iterations,
            argon2_time_cost: cost.argon2_time_cost,
            argon2_memory_cost_kib: cost.argon2_memory_cost_kib,
            argon2_parallelism: cost.argon2_parallelism,
            crypto_version: defaults::CRYPTO_VERSION,
            min_password_length: defaults::MIN_PASSWORD_LENGTH,
        }
    }

    pub fn salt_size_bytes(&self) -> u32 {
        self.salt_size_bytes
    }

    pub fn aes_key_size_bytes(&self) -> u32 {
        self.aes_key_size_bytes
    }

    pub fn chacha_key_size_bytes(&self) -> u32 {
        self.chacha_key_size_bytes
    }

    pub fn aes_nonce_size_bytes(&self) -> u32 {
        self.aes_nonce_size_bytes
    }

    pub fn chacha_nonce_size_bytes(&self) -> u32 {
        self.chacha_nonce_size_bytes
    }

    pub fn pbkdf2_iterations(&self) -> u32 {
        self.pbkdf2_iterations
    }

    pub fn argon2_time_cost(&self) -> u32 {
        self.argon2_time_cost
    }

    pub fn argon2_memory_cost_kib(&self) -> u32 {
        self.argon2_memory_cost_kib
    }

    pub fn argon2_parallelism(&self) -> u32 {
        self.argon2_parallelism
    }

    pub fn crypto_version(&self) -> &str {
        self.crypto_version
    }

    pub fn min_password_length(&self) -> u32 {
        self.min_password_length
    }

    pub fn kdf_cost(&self) -> KdfCost {
        KdfCost {
            pbkdf2_iterations: self.pbkdf2_iterations,
            argon2_time_cost: self.argon2_time_cost,
            argon2_memory_cost_kib: self.argon2_memory_cost_kib,
            argon2_parallelism: self.argon2_parallelism,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }
}

/// Checks the cost factors against the policy floors.
///
/// Stops at the first violation, in this order: PBKDF2 iterations, Argon2
/// memory, Argon2 time, Argon2 parallelism.
pub fn validate(params: &SecurityParameters) -> Result<(), ConfigError> {
    tracing::debug!(
        pbkdf2_iterations = params.pbkdf2_iterations,
        argon2_memory_cost_kib = params.argon2_memory_cost_kib,
        argon2_time_cost = params.argon2_time_cost,
        argon2_parallelism = params.argon2_parallelism,
        "validating security parameters"
    );

    if params.pbkdf2_iterations < minimums::PBKDF2_ITERATIONS {
        return Err(ConfigError::Pbkdf2TooWeak {
            actual: params.pbkdf2_iterations,
            minimum: minimums::PBKDF2_ITERATIONS,
        });
    }
    if params.argon2_memory_cost_kib < minimums::ARGON2_MEMORY_COST_KIB {
        return Err(ConfigError::Argon2MemoryTooWeak {
            actual: params.argon2_memory_cost_kib,
            minimum: minimums::ARGON2_MEMORY_COST_KIB,
        });
    }
    if params.argon2_time_cost < minimums::ARGON2_TIME_COST {
        return Err(ConfigError::Argon2TimeTooWeak {
            actual: params.argon2_time_cost,
            minimum: minimums::ARGON2_TIME_COST,
        });
    }
    if params.argon2_parallelism < minimums::ARGON2_PARALLELISM {
        return Err(ConfigError::Argon2ParallelismInvalid {
            actual: params.argon2_parallelism,
            minimum: minimums::ARGON2_PARALLELISM,
        });
    }
    Ok(())
}
