//! Defines the Provider trait for backend-agility.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::crypto::key_material::KeyMaterial;
use crate::crypto::resolver::Version;
use crate::error::CryptoError;

/// A category of cryptographic operation a backend may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Digest,
    SymmetricCipher,
    AsymmetricSign,
    AsymmetricEncrypt,
    RandomBytes,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Digest => "Digest",
            Capability::SymmetricCipher => "SymmetricCipher",
            Capability::AsymmetricSign => "AsymmetricSign",
            Capability::AsymmetricEncrypt => "AsymmetricEncrypt",
            Capability::RandomBytes => "RandomBytes",
        };
        f.write_str(name)
    }
}

/// An algorithm name, compared case-insensitively.
///
/// The name is normalized to ASCII lowercase at construction, so
/// `AlgorithmId::new("SHA256")` and `AlgorithmId::new("sha256")` are equal
/// and hash identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlgorithmId(String);

impl AlgorithmId {
    pub fn new(name: &str) -> Self {
        Self(name.to_ascii_lowercase())
    }

    /// The normalized (lowercase) algorithm name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AlgorithmId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a cipher session produces ciphertext or recovers plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherDirection {
    Encrypt,
    Decrypt,
}

/// Streaming digest computation owned by a [`Session`](crate::crypto::session::Session).
///
/// Implementations accumulate state across `update` calls; `finalize`
/// consumes the operation and produces the digest bytes.
pub trait DigestOp: Send {
    fn update(&mut self, data: &[u8]);

    fn finalize(self: Box<Self>) -> Result<Vec<u8>, CryptoError>;
}

/// Streaming cipher operation.
///
/// AEAD implementations must buffer input and authenticate before
/// releasing any plaintext: a decrypt `finalize` either returns the whole
/// verified message or fails with `VerificationFailed` and nothing else.
pub trait CipherOp: Send {
    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError>;

    fn finalize(self: Box<Self>) -> Result<Vec<u8>, CryptoError>;
}

/// Streaming signature computation over a message.
pub trait SignOp: Send {
    fn update(&mut self, data: &[u8]);

    fn finalize(self: Box<Self>) -> Result<Vec<u8>, CryptoError>;
}

/// Trait that formalizes the contract any cryptographic backend must satisfy.
///
/// This is the sole extension point of the crate: swapping the backend a
/// deployment uses means registering a different `Provider`, the same way
/// the wrapped native library used to be swapped at build time.
///
/// A provider owns no caller state. Factory methods hand out boxed
/// operations that a [`Session`](crate::crypto::session::Session) drives
/// through its open/update/finalize lifecycle. Key material passed to a
/// factory is borrowed for construction only; implementations copy what
/// they need into buffers that are zeroized on drop.
///
/// The factory methods default to `UnsupportedOperation`, so a backend
/// only implements the capabilities it declares.
pub trait Provider: Send + Sync {
    /// Short backend name, e.g. `"ref"`.
    fn name(&self) -> &str;

    /// Declared backend version.
    ///
    /// Compatibility is a declared property of the provider, never
    /// inferred from installation artifacts.
    fn version(&self) -> Version;

    /// The installation path this backend stands for. The configuration
    /// resolver matches search paths against this value.
    fn origin(&self) -> &str;

    /// The capability set this backend implements.
    fn capabilities(&self) -> &[Capability];

    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Create a streaming digest operation for `algorithm`.
    fn digest(&self, algorithm: &AlgorithmId) -> Result<Box<dyn DigestOp>, CryptoError> {
        let _ = algorithm;
        Err(CryptoError::UnsupportedOperation {
            provider: self.name().to_string(),
            capability: Capability::Digest,
        })
    }

    /// Create a streaming cipher operation bound to `key`.
    fn cipher(
        &self,
        algorithm: &AlgorithmId,
        direction: CipherDirection,
        key: &KeyMaterial,
    ) -> Result<Box<dyn CipherOp>, CryptoError> {
        let _ = (algorithm, direction, key);
        Err(CryptoError::UnsupportedOperation {
            provider: self.name().to_string(),
            capability: Capability::SymmetricCipher,
        })
    }

    /// Create a streaming signing operation bound to `key`.
    fn signer(
        &self,
        algorithm: &AlgorithmId,
        key: &KeyMaterial,
    ) -> Result<Box<dyn SignOp>, CryptoError> {
        let _ = (algorithm, key);
        Err(CryptoError::UnsupportedOperation {
            provider: self.name().to_string(),
            capability: Capability::AsymmetricSign,
        })
    }

    /// Fill `buf` with cryptographically secure random bytes.
    fn random_bytes(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        let _ = buf;
        Err(CryptoError::UnsupportedOperation {
            provider: self.name().to_string(),
            capability: Capability::RandomBytes,
        })
    }
}

impl fmt::Debug for dyn Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Provider({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_id_case_insensitive() {
        assert_eq!(AlgorithmId::new("SHA256"), AlgorithmId::new("sha256"));
        assert_eq!(AlgorithmId::new("AES-256-GCM").as_str(), "aes-256-gcm");
    }

    #[test]
    fn test_capability_display() {
        assert_eq!(Capability::Digest.to_string(), "Digest");
        assert_eq!(Capability::SymmetricCipher.to_string(), "SymmetricCipher");
    }
}
