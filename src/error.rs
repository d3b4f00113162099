//! Error types for parameter validation and cryptographic operations.
//!
//! Two independent families live here:
//!
//! - [`ConfigError`] is raised only while validating [`SecurityParameters`].
//!   It is always fatal and its messages name the violated threshold.
//! - [`CryptoError`] is the taxonomy raised by the code that actually
//!   encrypts, decrypts and derives keys. This crate never raises it itself
//!   beyond the size checks in [`crate::Cipher`] and [`crate::kdf`].
//!
//! [`SecurityParameters`]: crate::SecurityParameters

use thiserror::Error;

use crate::params::SecurityParameters;

/// A security parameter is below the policy floor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("PBKDF2 iterations too low: {actual} (OWASP 2023 minimum: {})", grouped(.minimum))]
    Pbkdf2TooWeak { actual: u32, minimum: u32 },

    #[error(
        "Argon2 memory cost too low: {actual} KiB (OWASP 2023 minimum: {minimum} KiB / {} MiB)",
        kib_to_mib(.minimum)
    )]
    Argon2MemoryTooWeak { actual: u32, minimum: u32 },

    #[error("Argon2 time cost too low: {actual} (minimum: {minimum})")]
    Argon2TimeTooWeak { actual: u32, minimum: u32 },

    #[error("Argon2 parallelism too low: {actual} (minimum: {minimum})")]
    Argon2ParallelismInvalid { actual: u32, minimum: u32 },
}

impl ConfigError {
    /// The configured value that failed the check.
    pub fn actual(&self) -> u32 {
        match self {
            Self::Pbkdf2TooWeak { actual, .. }
            | Self::Argon2MemoryTooWeak { actual, .. }
            | Self::Argon2TimeTooWeak { actual, .. }
            | Self::Argon2ParallelismInvalid { actual, .. } => *actual,
        }
    }

    /// The policy floor the value had to meet.
    pub fn minimum(&self) -> u32 {
        match self {
            Self::Pbkdf2TooWeak { minimum, .. }
            | Self::Argon2MemoryTooWeak { minimum, .. }
            | Self::Argon2TimeTooWeak { minimum, .. }
            | Self::Argon2ParallelismInvalid { minimum, .. } => *minimum,
        }
    }
}

/// Why a password was refused.
///
/// Unlike every other failure in [`CryptoError`], this detail is meant to
/// reach the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeakPasswordReason {
    /// Shorter than the configured minimum length.
    TooShort { length: usize, minimum: usize },
    /// An external strength check refused it.
    Rejected { policy: String },
}

/// Why a key derivation step failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDerivationFailure {
    /// Salt of the wrong length or format.
    InvalidSalt { detail: String },
    UnsupportedAlgorithm { algorithm: String },
    /// The KDF could not get the memory or threads it needs right now.
    ResourceExhausted,
    /// The KDF backend refused the cost parameters.
    Parameters { detail: String },
}

/// Failure raised by a cryptographic operation.
///
/// Match on the variant for specific handling, or on [`CryptoError::kind`]
/// when any failure of a class is handled the same way. No variant ever
/// carries key material, plaintext or passwords.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key material has the wrong length or format for the algorithm.
    #[error("invalid {algorithm} key: expected {expected} bytes, got {actual}")]
    InvalidKey {
        algorithm: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Authenticated decryption failed.
    ///
    /// Wrong key, tag mismatch and corrupted ciphertext all collapse into
    /// this one variant with one message so callers cannot act as an oracle.
    #[error("invalid password or corrupted data")]
    Decryption,

    /// A nonce was seen twice under the same key.
    ///
    /// This is a security incident: abort the operation and escalate.
    #[error("nonce reuse detected for {algorithm}")]
    NonceReuse { algorithm: &'static str },

    #[error("{}", describe_weak_password(.reason))]
    WeakPassword { reason: WeakPasswordReason },

    #[error("key derivation failed: {}", describe_kdf_failure(.reason))]
    KeyDerivation { reason: KeyDerivationFailure },
}

/// The variant of a [`CryptoError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CryptoErrorKind {
    InvalidKey,
    Decryption,
    NonceReuse,
    WeakPassword,
    KeyDerivation,
}

impl CryptoErrorKind {
    pub const ALL: [CryptoErrorKind; 5] = [
        Self::InvalidKey,
        Self::Decryption,
        Self::NonceReuse,
        Self::WeakPassword,
        Self::KeyDerivation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidKey => "invalid_key",
            Self::Decryption => "decryption",
            Self::NonceReuse => "nonce_reuse",
            Self::WeakPassword => "weak_password",
            Self::KeyDerivation => "key_derivation",
        }
    }
}

impl CryptoError {
    pub fn kind(&self) -> CryptoErrorKind {
        match self {
            Self::InvalidKey { .. } => CryptoErrorKind::InvalidKey,
            Self::Decryption => CryptoErrorKind::Decryption,
            Self::NonceReuse { .. } => CryptoErrorKind::NonceReuse,
            Self::WeakPassword { .. } => CryptoErrorKind::WeakPassword,
            Self::KeyDerivation { .. } => CryptoErrorKind::KeyDerivation,
        }
    }

    /// Password shorter than `params.min_password_length()`.
    pub fn password_too_short(params: &SecurityParameters, length: usize) -> Self {
        Self::WeakPassword {
            reason: WeakPasswordReason::TooShort {
                length,
                minimum: params.min_password_length() as usize,
            },
        }
    }

    /// Must be routed to incident handling, never logged and ignored.
    pub fn is_security_incident(&self) -> bool {
        matches!(self, Self::NonceReuse { .. })
    }

    /// The user can fix this by choosing different input.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::WeakPassword { .. })
    }

    /// Retrying the same operation later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::KeyDerivation {
                reason: KeyDerivationFailure::ResourceExhausted
            }
        )
    }
}

impl From<chacha20poly1305::aead::Error> for CryptoError {
    fn from(_: chacha20poly1305::aead::Error) -> Self {
        Self::Decryption
    }
}

impl From<argon2::Error> for CryptoError {
    fn from(err: argon2::Error) -> Self {
        use argon2::Error as A;

        let reason = match err {
            A::AlgorithmInvalid | A::VersionInvalid => KeyDerivationFailure::UnsupportedAlgorithm {
                algorithm: "argon2".to_string(),
            },
            A::SaltTooShort | A::SaltTooLong => KeyDerivationFailure::InvalidSalt {
                detail: err.to_string(),
            },
            // Everything else, including the memory and thread limits, is a
            // deterministic check on the cost parameters.
            other => KeyDerivationFailure::Parameters {
                detail: other.to_string(),
            },
        };
        Self::KeyDerivation { reason }
    }
}

/// `600000` -> `600,000`
fn grouped(n: &u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn kib_to_mib(kib: &u32) -> u32 {
    kib / 1024
}

fn describe_weak_password(reason: &WeakPasswordReason) -> String {
    match reason {
        WeakPasswordReason::TooShort { length, minimum } => format!(
            "password too short: {length} characters, at least {minimum} required"
        ),
        WeakPasswordReason::Rejected { policy } => format!("password rejected: {policy}"),
    }
}

fn describe_kdf_failure(reason: &KeyDerivationFailure) -> String {
    match reason {
        KeyDerivationFailure::InvalidSalt { detail } => format!("invalid salt: {detail}"),
        KeyDerivationFailure::UnsupportedAlgorithm { algorithm } => {
            format!("unsupported algorithm '{algorithm}'")
        }
        KeyDerivationFailure::ResourceExhausted => "insufficient resources".to_string(),
        KeyDerivationFailure::Parameters { detail } => format!("invalid parameters: {detail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chacha20poly1305::{
        ChaCha20Poly1305, Key, Nonce,
        aead::{Aead, KeyInit},
    };

    fn one_of_each() -> Vec<CryptoError> {
        vec![
            CryptoError::InvalidKey {
                algorithm: "AES-256-GCM",
                expected: 32,
                actual: 16,
            },
            CryptoError::Decryption,
            CryptoError::NonceReuse {
                algorithm: "ChaCha20-Poly1305",
            },
            CryptoError::password_too_short(&SecurityParameters::default(), 5),
            CryptoError::KeyDerivation {
                reason: KeyDerivationFailure::ResourceExhausted,
            },
        ]
    }

    #[test]
    fn every_kind_is_constructible_and_distinct() {
        let kinds: Vec<CryptoErrorKind> = one_of_each().iter().map(CryptoError::kind).collect();
        assert_eq!(kinds, CryptoErrorKind::ALL.to_vec());

        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }

    #[test]
    fn only_nonce_reuse_is_an_incident() {
        for err in one_of_each() {
            assert_eq!(
                err.is_security_incident(),
                err.kind() == CryptoErrorKind::NonceReuse,
                "{err:?}"
            );
        }
    }

    #[test]
    fn only_weak_password_is_user_correctable() {
        for err in one_of_each() {
            assert_eq!(
                err.is_user_correctable(),
                err.kind() == CryptoErrorKind::WeakPassword
            );
        }
    }

    #[test]
    fn only_resource_exhaustion_is_retryable() {
        assert!(
            CryptoError::KeyDerivation {
                reason: KeyDerivationFailure::ResourceExhausted
            }
            .is_retryable()
        );
        assert!(
            !CryptoError::KeyDerivation {
                reason: KeyDerivationFailure::UnsupportedAlgorithm {
                    algorithm: "scrypt".to_string()
                }
            }
            .is_retryable()
        );
        assert!(!CryptoError::Decryption.is_retryable());
    }

    #[test]
    fn weak_password_message_is_actionable() {
        let err = CryptoError::password_too_short(&SecurityParameters::default(), 8);
        assert_eq!(
            err.to_string(),
            "password too short: 8 characters, at least 12 required"
        );
    }

    #[test]
    fn aead_failure_maps_to_generic_decryption() {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&[7u8; 32]));
        let nonce = Nonce::from_slice(&[1u8; 12]);
        let mut ciphertext = cipher.encrypt(nonce, b"secret".as_slice()).unwrap();
        ciphertext[0] ^= 0xff;

        let err: CryptoError = cipher
            .decrypt(nonce, ciphertext.as_slice())
            .map_err(CryptoError::from)
            .unwrap_err();

        assert_eq!(err, CryptoError::Decryption);
        assert_eq!(err.to_string(), "invalid password or corrupted data");
    }

    #[test]
    fn argon2_limit_errors_are_not_retryable() {
        for source in [argon2::Error::MemoryTooMuch, argon2::Error::ThreadsTooMany] {
            let err = CryptoError::from(source);
            assert_eq!(err.kind(), CryptoErrorKind::KeyDerivation);
            assert!(!err.is_retryable(), "{err:?}");
            assert!(matches!(
                err,
                CryptoError::KeyDerivation { reason: KeyDerivationFailure::Parameters { .. } }
            ));
        }
    }

    #[test]
    fn argon2_salt_errors_are_invalid_salt() {
        for source in [argon2::Error::SaltTooShort, argon2::Error::SaltTooLong] {
            assert!(matches!(
                CryptoError::from(source),
                CryptoError::KeyDerivation { reason: KeyDerivationFailure::InvalidSalt { .. } }
            ));
        }
    }

    #[test]
    fn argon2_version_error_is_unsupported_algorithm() {
        assert!(matches!(
            CryptoError::from(argon2::Error::VersionInvalid),
            CryptoError::KeyDerivation {
                reason: KeyDerivationFailure::UnsupportedAlgorithm { .. }
            }
        ));
    }

    #[test]
    fn grouped_inserts_thousands_separators() {
        assert_eq!(grouped(&999), "999");
        assert_eq!(grouped(&65_536), "65,536");
        assert_eq!(grouped(&600_000), "600,000");
        assert_eq!(grouped(&1_000_000), "1,000,000");
    }

    #[test]
    fn argon2_memory_message_shows_mib() {
        let err = ConfigError::Argon2MemoryTooWeak {
            actual: 65_535,
            minimum: 65_536,
        };
        assert_eq!(
            err.to_string(),
            "Argon2 memory cost too low: 65535 KiB (OWASP 2023 minimum: 65536 KiB / 64 MiB)"
        );
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::Pbkdf2TooWeak {
            actual: 599_999,
            minimum: 600_000,
        };
        assert_eq!(
            err.to_string(),
            "PBKDF2 iterations too low: 599999 (OWASP 2023 minimum: 600,000)"
        );
        assert_eq!(err.actual(), 599_999);
        assert_eq!(err.minimum(), 600_000);
    }
}
