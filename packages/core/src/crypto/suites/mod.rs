//! Provider implementations (backend suites).
//!
//! This module contains the [`Provider`](crate::crypto::provider::Provider)
//! implementations shipped with the crate.
//!
//! ## Available suites
//!
//! ### Reference Suite (`"ref"`)
//! - **Digest**: SHA-256, SHA-384, SHA-512
//! - **AEAD**: AES-256-GCM, ChaCha20-Poly1305
//! - **Signing**: Ed25519
//! - **Randomness**: OS RNG
//!
//! Built entirely on audited RustCrypto crates; no custom primitives.
//!
//! ## Registering a suite
//!
//! ```rust
//! use cryptel_core::crypto::registry::Registry;
//! use cryptel_core::crypto::suites::register_reference_suite;
//!
//! let registry = Registry::new();
//! register_reference_suite(&registry).unwrap();
//! ```

use std::sync::Arc;

use crate::crypto::provider::{Capability, Provider};
use crate::crypto::registry::Registry;
use crate::error::CryptoError;

pub mod reference;

pub use reference::ReferenceProvider;

/// Register the reference suite's full algorithm set with `registry`.
///
/// One shared provider instance is bound to every identifier, so
/// resolution stays identity-stable across algorithms.
pub fn register_reference_suite(registry: &Registry) -> Result<(), CryptoError> {
    register_provider(registry, Arc::new(ReferenceProvider::new()))
}

/// Register an already-constructed reference provider instance.
pub fn register_provider(
    registry: &Registry,
    provider: Arc<dyn Provider>,
) -> Result<(), CryptoError> {
    for id in ["sha256", "sha384", "sha512"] {
        registry.register(Capability::Digest, id, Arc::clone(&provider))?;
    }
    for id in ["aes-256-gcm", "chacha20-poly1305"] {
        registry.register(Capability::SymmetricCipher, id, Arc::clone(&provider))?;
    }
    registry.register(Capability::AsymmetricSign, "ed25519", Arc::clone(&provider))?;
    registry.register(Capability::RandomBytes, "os", provider)?;
    Ok(())
}
