//! Session API: the stateful handle for an in-progress operation.
//!
//! Lifecycle:
//!
//! ```text
//! open_*() ──► Open ──update()──► Updated ──finalize()──► Finalized
//!                │                   │
//!                └──── backend failure during finalize ──► Errored
//! ```
//!
//! `Finalized` and `Errored` are terminal. After `Finalized` the only
//! valid call is [`Session::result`]; after `Errored` no call is valid.
//! Dropping a session at any state is safe, discards partial state, and
//! wipes backend buffers that hold key or intermediate secret material.

use core::fmt;

use zeroize::Zeroizing;

use crate::crypto::key_material::KeyMaterial;
use crate::crypto::provider::{
    AlgorithmId, Capability, CipherDirection, CipherOp, DigestOp, Provider, SignOp,
};
use crate::error::CryptoError;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Updated,
    Finalized,
    Errored,
}

enum SessionOp {
    Digest(Box<dyn DigestOp>),
    Cipher(Box<dyn CipherOp>),
    Sign(Box<dyn SignOp>),
}

/// A single-owner handle bound to one provider operation.
///
/// Sessions are not shared across threads; callers needing concurrency
/// run independent sessions on separate threads. No internal threading
/// is spawned here, and long updates block the calling thread.
pub struct Session {
    state: SessionState,
    op: Option<SessionOp>,
    result: Option<Zeroizing<Vec<u8>>>,
}

impl Session {
    /// Open a streaming digest session.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation` if the provider lacks the Digest
    /// capability; `UnknownAlgorithm` if it does not implement
    /// `algorithm`.
    pub fn open_digest(
        provider: &dyn Provider,
        algorithm: &AlgorithmId,
    ) -> Result<Self, CryptoError> {
        Self::require(provider, Capability::Digest)?;
        let op = provider.digest(algorithm)?;
        Ok(Self::with_op(SessionOp::Digest(op)))
    }

    /// Open an encrypting cipher session bound to `key`.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation`, `UnknownAlgorithm`, or
    /// `InvalidKeyLength` when the key does not match the algorithm.
    pub fn open_encrypt(
        provider: &dyn Provider,
        algorithm: &AlgorithmId,
        key: &KeyMaterial,
    ) -> Result<Self, CryptoError> {
        Self::require(provider, Capability::SymmetricCipher)?;
        let op = provider.cipher(algorithm, CipherDirection::Encrypt, key)?;
        Ok(Self::with_op(SessionOp::Cipher(op)))
    }

    /// Open a decrypting cipher session bound to `key`.
    ///
    /// For AEAD algorithms no plaintext is released until the
    /// authentication tag verifies at [`finalize`](Self::finalize).
    pub fn open_decrypt(
        provider: &dyn Provider,
        algorithm: &AlgorithmId,
        key: &KeyMaterial,
    ) -> Result<Self, CryptoError> {
        Self::require(provider, Capability::SymmetricCipher)?;
        let op = provider.cipher(algorithm, CipherDirection::Decrypt, key)?;
        Ok(Self::with_op(SessionOp::Cipher(op)))
    }

    /// Open a signing session bound to `key`.
    pub fn open_sign(
        provider: &dyn Provider,
        algorithm: &AlgorithmId,
        key: &KeyMaterial,
    ) -> Result<Self, CryptoError> {
        Self::require(provider, Capability::AsymmetricSign)?;
        let op = provider.signer(algorithm, key)?;
        Ok(Self::with_op(SessionOp::Sign(op)))
    }

    /// Append data to the in-progress computation.
    ///
    /// Valid from `Open` or `Updated`; fails with `InvalidState`
    /// afterwards.
    pub fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        match self.state {
            SessionState::Open | SessionState::Updated => {}
            SessionState::Finalized => {
                return Err(CryptoError::InvalidState(
                    "update called after finalize".to_string(),
                ))
            }
            SessionState::Errored => {
                return Err(CryptoError::InvalidState(
                    "update called on errored session".to_string(),
                ))
            }
        }

        // op is always present outside of Finalized/Errored
        let outcome = match self.op.as_mut() {
            Some(SessionOp::Digest(op)) => {
                op.update(data);
                Ok(())
            }
            Some(SessionOp::Cipher(op)) => op.update(data),
            Some(SessionOp::Sign(op)) => {
                op.update(data);
                Ok(())
            }
            None => Err(CryptoError::InvalidState(
                "session has no active operation".to_string(),
            )),
        };

        match outcome {
            Ok(()) => {
                self.state = SessionState::Updated;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Errored;
                self.op = None;
                Err(e)
            }
        }
    }

    /// Produce the final output and move to `Finalized`.
    ///
    /// A second call fails with `AlreadyFinalized`. A backend failure
    /// (for AEAD decrypt, a tag mismatch) moves the session to `Errored`
    /// and returns `VerificationFailed`; no partial output is ever
    /// released.
    pub fn finalize(&mut self) -> Result<&[u8], CryptoError> {
        match self.state {
            SessionState::Open | SessionState::Updated => {}
            SessionState::Finalized => return Err(CryptoError::AlreadyFinalized),
            SessionState::Errored => {
                return Err(CryptoError::InvalidState(
                    "finalize called on errored session".to_string(),
                ))
            }
        }

        let op = self.op.take().ok_or_else(|| {
            CryptoError::InvalidState("session has no active operation".to_string())
        })?;

        let output = match op {
            SessionOp::Digest(op) => op.finalize(),
            SessionOp::Cipher(op) => op.finalize(),
            SessionOp::Sign(op) => op.finalize(),
        };

        match output {
            Ok(bytes) => {
                self.state = SessionState::Finalized;
                let stored = self.result.insert(Zeroizing::new(bytes));
                Ok(stored.as_slice())
            }
            Err(e) => {
                self.state = SessionState::Errored;
                Err(e)
            }
        }
    }

    /// The already-produced result, readable any number of times after a
    /// successful `finalize`.
    pub fn result(&self) -> Option<&[u8]> {
        self.result.as_ref().map(|bytes| bytes.as_slice())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn with_op(op: SessionOp) -> Self {
        Self {
            state: SessionState::Open,
            op: Some(op),
            result: None,
        }
    }

    fn require(provider: &dyn Provider, capability: Capability) -> Result<(), CryptoError> {
        if !provider.supports(capability) {
            return Err(CryptoError::UnsupportedOperation {
                provider: provider.name().to_string(),
                capability,
            });
        }
        Ok(())
    }
}

/// Redacts buffered data and any produced result; only the state is
/// printed.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Session({:?})", self.state)
    }
}
