// Cryptel Core
// Provider abstraction layer over pluggable cryptographic backends

#![warn(clippy::all)]

pub mod config;
pub mod crypto;
pub mod error;

// Re-exports for convenience
pub use config::Config;
pub use crypto::{
    select_provider, AlgorithmId, Capability, CipherDirection, KeyMaterial, Provider, Registry,
    ResolverConfig, Session, SessionState, Version,
};
pub use error::{CryptoError, Result};
