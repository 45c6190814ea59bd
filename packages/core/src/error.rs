use thiserror::Error;

use crate::crypto::provider::Capability;

/// Unified error type for registry, session and resolver operations.
///
/// Every failure is reported to the immediate caller as a typed value;
/// nothing in this crate aborts the process or swallows an error.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("'{identifier}' is already registered for capability {capability}")]
    DuplicateRegistration {
        capability: Capability,
        identifier: String,
    },

    #[error("Unknown algorithm '{identifier}' for capability {capability}")]
    UnknownAlgorithm {
        capability: Capability,
        identifier: String,
    },

    #[error("Provider '{provider}' does not support {capability}")]
    UnsupportedOperation {
        provider: String,
        capability: Capability,
    },

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("Invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("Invalid session state: {0}")]
    InvalidState(String),

    #[error("Session already finalized")]
    AlreadyFinalized,

    // Deliberately carries no data: the diagnostic must not leak partial
    // plaintext or tag material.
    #[error("Verification failed (authentication tag mismatch)")]
    VerificationFailed,

    #[error("No compatible provider found, attempted paths: {attempted:?}")]
    NoCompatibleProvider { attempted: Vec<String> },

    #[error("Invalid version string: {0}")]
    InvalidVersion(String),

    #[error("Provider backend failure: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
