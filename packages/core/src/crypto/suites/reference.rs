use aes_gcm::aead::{Aead, Nonce, OsRng as AeadOsRng, Payload};
use aes_gcm::{Aes256Gcm, KeyInit};
use chacha20poly1305::ChaCha20Poly1305;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use rand_core::RngCore;
use sha2::{Digest, Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use crate::config::Config;
use crate::crypto::key_material::KeyMaterial;
use crate::crypto::provider::{
    AlgorithmId, Capability, CipherDirection, CipherOp, DigestOp, Provider, SignOp,
};
use crate::crypto::resolver::Version;
use crate::error::CryptoError;

/// Concrete [`Provider`] for the reference suite.
///
/// Digests: SHA-256 / SHA-384 / SHA-512. AEAD: AES-256-GCM and
/// ChaCha20-Poly1305 (both 32-byte keys, 96-bit nonces). Signing:
/// Ed25519. Randomness: the operating system RNG.
///
/// AsymmetricEncrypt is deliberately not declared; opening such a
/// session against this suite fails with `UnsupportedOperation`.
pub struct ReferenceProvider {
    origin: String,
    version: Version,
}

impl ReferenceProvider {
    pub const NAME: &'static str = "ref";

    /// Origin string of the built-in instance.
    pub const BUILTIN_ORIGIN: &'static str = "builtin:ref";

    const CAPABILITIES: &'static [Capability] = &[
        Capability::Digest,
        Capability::SymmetricCipher,
        Capability::AsymmetricSign,
        Capability::RandomBytes,
    ];

    pub fn new() -> Self {
        Self::with_version(Self::BUILTIN_ORIGIN, Version::new(1, 0, 0, 0))
    }

    /// A reference provider standing for an arbitrary origin/version,
    /// used to exercise the configuration resolver.
    pub fn with_version(origin: impl Into<String>, version: Version) -> Self {
        Self {
            origin: origin.into(),
            version,
        }
    }
}

impl Default for ReferenceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for ReferenceProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> Version {
        self.version
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    fn capabilities(&self) -> &[Capability] {
        Self::CAPABILITIES
    }

    fn digest(&self, algorithm: &AlgorithmId) -> Result<Box<dyn DigestOp>, CryptoError> {
        match algorithm.as_str() {
            "sha256" => Ok(Box::new(Sha2DigestOp {
                inner: Sha256::new(),
            })),
            "sha384" => Ok(Box::new(Sha2DigestOp {
                inner: Sha384::new(),
            })),
            "sha512" => Ok(Box::new(Sha2DigestOp {
                inner: Sha512::new(),
            })),
            _ => Err(CryptoError::UnknownAlgorithm {
                capability: Capability::Digest,
                identifier: algorithm.to_string(),
            }),
        }
    }

    fn cipher(
        &self,
        algorithm: &AlgorithmId,
        direction: CipherDirection,
        key: &KeyMaterial,
    ) -> Result<Box<dyn CipherOp>, CryptoError> {
        match algorithm.as_str() {
            "aes-256-gcm" => {
                key.expect_len(Config::global().aead_key_length)?;
                Ok(Box::new(AeadCipherOp::<Aes256Gcm>::new(key, direction)?))
            }
            "chacha20-poly1305" => {
                key.expect_len(Config::global().aead_key_length)?;
                Ok(Box::new(AeadCipherOp::<ChaCha20Poly1305>::new(
                    key, direction,
                )?))
            }
            _ => Err(CryptoError::UnknownAlgorithm {
                capability: Capability::SymmetricCipher,
                identifier: algorithm.to_string(),
            }),
        }
    }

    fn signer(
        &self,
        algorithm: &AlgorithmId,
        key: &KeyMaterial,
    ) -> Result<Box<dyn SignOp>, CryptoError> {
        match algorithm.as_str() {
            "ed25519" => {
                key.expect_len(Config::global().signing_key_length)?;
                let bytes: &[u8; 32] = key
                    .as_bytes()
                    .try_into()
                    .map_err(|_| CryptoError::InvalidKey("bad Ed25519 key".to_string()))?;
                Ok(Box::new(Ed25519SignOp {
                    key: SigningKey::from_bytes(bytes),
                    message: Zeroizing::new(Vec::new()),
                }))
            }
            _ => Err(CryptoError::UnknownAlgorithm {
                capability: Capability::AsymmetricSign,
                identifier: algorithm.to_string(),
            }),
        }
    }

    fn random_bytes(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| CryptoError::Backend(format!("OS RNG failure: {e}")))
    }
}

/// Streaming SHA-2 digest over any hash from the `sha2` crate.
struct Sha2DigestOp<D: Digest + Send> {
    inner: D,
}

impl<D: Digest + Send + 'static> DigestOp for Sha2DigestOp<D> {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.inner, data);
    }

    fn finalize(self: Box<Self>) -> Result<Vec<u8>, CryptoError> {
        Ok(self.inner.finalize().to_vec())
    }
}

/// Buffering AEAD operation.
///
/// AEAD cannot release plaintext before the tag verifies, so both
/// directions accumulate input in a zeroized buffer and run the cipher
/// once at finalize.
///
/// Wire format: `[ nonce (12 bytes) | ciphertext + tag ]`, so an
/// encrypt session's output feeds a decrypt session unchanged.
struct AeadCipherOp<C: Aead + Send> {
    cipher: C,
    direction: CipherDirection,
    buffer: Zeroizing<Vec<u8>>,
}

impl<C: Aead + KeyInit + Send> AeadCipherOp<C> {
    fn new(key: &KeyMaterial, direction: CipherDirection) -> Result<Self, CryptoError> {
        let cipher = C::new_from_slice(key.as_bytes())
            .map_err(|_| CryptoError::InvalidKey("bad AEAD key".to_string()))?;
        Ok(Self {
            cipher,
            direction,
            buffer: Zeroizing::new(Vec::new()),
        })
    }
}

impl<C: Aead + Send + 'static> CipherOp for AeadCipherOp<C> {
    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<Vec<u8>, CryptoError> {
        // Both reference AEADs use 96-bit nonces, matching the config
        let nonce_length = Config::global().aead_nonce_length;
        match self.direction {
            CipherDirection::Encrypt => {
                let nonce = C::generate_nonce(&mut AeadOsRng);
                let ciphertext = self
                    .cipher
                    .encrypt(
                        &nonce,
                        Payload {
                            msg: self.buffer.as_slice(),
                            aad: b"",
                        },
                    )
                    .map_err(|_| CryptoError::Backend("AEAD encryption failed".to_string()))?;

                // Prepend nonce
                let mut out = Vec::with_capacity(nonce_length + ciphertext.len());
                out.extend_from_slice(&nonce);
                out.extend_from_slice(&ciphertext);
                Ok(out)
            }
            CipherDirection::Decrypt => {
                if self.buffer.len() < nonce_length + Config::global().aead_tag_length {
                    return Err(CryptoError::VerificationFailed);
                }
                let (nonce_bytes, ct) = self.buffer.split_at(nonce_length);
                let nonce = Nonce::<C>::from_slice(nonce_bytes);

                // Authenticates before releasing any plaintext; a tag
                // mismatch yields no output at all
                self.cipher
                    .decrypt(
                        nonce,
                        Payload {
                            msg: ct,
                            aad: b"",
                        },
                    )
                    .map_err(|_| CryptoError::VerificationFailed)
            }
        }
    }
}

/// Ed25519 signing over a buffered message.
struct Ed25519SignOp {
    key: SigningKey,
    message: Zeroizing<Vec<u8>>,
}

impl SignOp for Ed25519SignOp {
    fn update(&mut self, data: &[u8]) {
        self.message.extend_from_slice(data);
    }

    fn finalize(self: Box<Self>) -> Result<Vec<u8>, CryptoError> {
        let signature = self.key.sign(&self.message);
        Ok(signature.to_bytes().to_vec())
    }
}
