//! Owned, zeroizing wrapper around secret key bytes.

use core::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::crypto::provider::{Capability, Provider};
use crate::error::CryptoError;

/// Secret key bytes with guaranteed cleanup.
///
/// The underlying buffer is overwritten with zeros when the value is
/// dropped, on every exit path. `KeyMaterial` deliberately does not
/// implement `Clone`; the only copy path is the explicit
/// [`duplicate`](Self::duplicate), and each duplicate zeroizes
/// independently.
pub struct KeyMaterial {
    bytes: Zeroizing<Vec<u8>>,
}

impl KeyMaterial {
    /// Take ownership of raw key bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
        }
    }

    /// Generate `len` random key bytes through a provider's RandomBytes
    /// capability.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` if the provider does not declare
    /// [`Capability::RandomBytes`].
    pub fn generate(provider: &dyn Provider, len: usize) -> Result<Self, CryptoError> {
        if !provider.supports(Capability::RandomBytes) {
            return Err(CryptoError::UnsupportedOperation {
                provider: provider.name().to_string(),
                capability: Capability::RandomBytes,
            });
        }
        let mut bytes = Zeroizing::new(vec![0u8; len]);
        provider.random_bytes(&mut bytes)?;
        Ok(Self { bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw key bytes, for backend consumption when constructing an
    /// operation. Callers must not copy these into unmanaged buffers.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Intentional, explicit duplication of the key material.
    pub fn duplicate(&self) -> Self {
        Self {
            bytes: Zeroizing::new(self.bytes.to_vec()),
        }
    }

    /// Constant-time equality.
    ///
    /// Runs in time independent of where the bytes differ. Lengths are
    /// not secret; a length mismatch returns `false` immediately.
    pub fn ct_eq(&self, other: &KeyMaterial) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }

    /// Validate the key length required by an algorithm.
    pub fn expect_len(&self, expected: usize) -> Result<(), CryptoError> {
        if self.bytes.len() != expected {
            return Err(CryptoError::InvalidKeyLength {
                expected,
                got: self.bytes.len(),
            });
        }
        Ok(())
    }
}

/// Redacts the key bytes; only the length is printed.
impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial({} bytes)", self.bytes.len())
    }
}
