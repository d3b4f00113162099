//! Process-wide security parameters.
//!
//! The registry is built from the compiled-in defaults and validated exactly
//! once, on the first call to [`init`]. The outcome, success or failure, is
//! stored and returned to every later caller, so a process whose parameters
//! fail validation can never hand them out.

use std::sync::OnceLock;

use crate::error::ConfigError;
use crate::params::{SecurityParameters, validate};

type Slot = OnceLock<Result<SecurityParameters, ConfigError>>;

static REGISTRY: Slot = OnceLock::new();

/// Builds and validates the registry. Call this during startup and treat an
/// error as fatal.
pub fn init() -> Result<&'static SecurityParameters, ConfigError> {
    init_in(&REGISTRY, SecurityParameters::default)
}

/// The validated parameters, or `None` if [`init`] has not run or failed.
/// Never triggers initialisation.
pub fn get() -> Option<&'static SecurityParameters> {
    REGISTRY.get().and_then(|outcome| outcome.as_ref().ok())
}

fn init_in(
    slot: &Slot,
    build: impl FnOnce() -> SecurityParameters,
) -> Result<&SecurityParameters, ConfigError> {
    slot.get_or_init(|| load(build()))
        .as_ref()
        .map_err(ConfigError::clone)
}

fn load(params: SecurityParameters) -> Result<SecurityParameters, ConfigError> {
    match validate(&params) {
        Ok(()) => {
            tracing::info!(
                crypto_version = params.crypto_version(),
                pbkdf2_iterations = params.pbkdf2_iterations(),
                argon2_memory_cost_kib = params.argon2_memory_cost_kib(),
                argon2_time_cost = params.argon2_time_cost(),
                "crypto configuration validated"
            );
            Ok(params)
        }
        Err(err) => {
            tracing::error!(error = %err, "crypto configuration rejected");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::KdfCost;

    fn weak() -> SecurityParameters {
        SecurityParameters::with_kdf_cost(KdfCost {
            argon2_memory_cost_kib: 32 * 1024,
            ..KdfCost::default()
        })
    }

    #[test]
    fn init_succeeds_with_defaults() {
        let params = init().unwrap();
        assert_eq!(*params, SecurityParameters::default());
        assert!(get().is_some());
    }

    #[test]
    fn reads_return_the_same_instance() {
        let a = init().unwrap();
        let b = init().unwrap();
        let c = get().unwrap();
        assert!(std::ptr::eq(a, b));
        assert!(std::ptr::eq(a, c));
    }

    #[test]
    fn concurrent_readers_agree() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| init().unwrap().clone()))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), *init().unwrap());
        }
    }

    #[test]
    fn rejection_is_stored_for_every_later_call() {
        let slot = Slot::new();
        let expected = ConfigError::Argon2MemoryTooWeak {
            actual: 32 * 1024,
            minimum: 65_536,
        };

        assert_eq!(init_in(&slot, weak), Err(expected.clone()));
        // A second call with valid parameters must not replace the stored failure.
        assert_eq!(init_in(&slot, SecurityParameters::default), Err(expected.clone()));
        assert_eq!(slot.get(), Some(&Err(expected)));
    }

    #[test]
    fn success_is_built_only_once() {
        let slot = Slot::new();
        let first = init_in(&slot, SecurityParameters::default).unwrap();
        let second = init_in(&slot, || panic!("registry rebuilt")).unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
