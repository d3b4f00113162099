//! Security parameter registry and error taxonomy for password-based
//! key derivation and authenticated encryption.
//!
//! ```
//! let params = cryptoconf::registry::init().expect("weak crypto configuration");
//! assert_eq!(params.aes_key_size_bytes(), 32);
//! ```

mod cipher;
mod error;
pub mod kdf;
mod params;
pub mod registry;

pub use crate::cipher::Cipher;
pub use crate::error::{
    ConfigError, CryptoError, CryptoErrorKind, KeyDerivationFailure, WeakPasswordReason,
};
pub use crate::params::{KdfCost, SecurityParameters, defaults, minimums, validate};
