//! Algorithm registry: maps (capability, algorithm) pairs to providers.
//!
//! Registration normally happens once at startup; resolution is
//! read-mostly and safe under unlimited concurrent access. Prefer
//! passing a `Registry` instance through call sites; a process-wide
//! instance is available via [`Registry::global`] for callers that want
//! the init-once/read-many singleton lifecycle.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::debug;

use crate::crypto::provider::{AlgorithmId, Capability, Provider};
use crate::error::CryptoError;

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

type RegistryKey = (Capability, AlgorithmId);

/// Process-lifetime map from algorithm identifiers to backends.
///
/// Resolution is identity-stable: for the lifetime of a registry,
/// `resolve` after `register` returns the same `Arc<dyn Provider>`
/// (pointer-equal) unless an explicit override replaced it.
pub struct Registry {
    entries: RwLock<HashMap<RegistryKey, Arc<dyn Provider>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry instance.
    pub fn global() -> &'static Registry {
        GLOBAL_REGISTRY.get_or_init(Registry::new)
    }

    /// Bind `provider` to `(capability, identifier)`.
    ///
    /// # Errors
    ///
    /// `DuplicateRegistration` if the pair is already bound (use
    /// [`register_override`](Self::register_override) to replace);
    /// `UnsupportedOperation` if the provider does not declare
    /// `capability`.
    pub fn register(
        &self,
        capability: Capability,
        identifier: impl Into<AlgorithmId>,
        provider: Arc<dyn Provider>,
    ) -> Result<(), CryptoError> {
        let identifier = identifier.into();
        Self::check_capability(&provider, capability)?;

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(&(capability, identifier.clone())) {
            return Err(CryptoError::DuplicateRegistration {
                capability,
                identifier: identifier.to_string(),
            });
        }

        debug!(provider = provider.name(), %capability, %identifier, "registered algorithm");
        entries.insert((capability, identifier), provider);
        Ok(())
    }

    /// Bind `provider` to `(capability, identifier)`, replacing any
    /// existing binding. Most-recent wins only through this explicit
    /// override path.
    pub fn register_override(
        &self,
        capability: Capability,
        identifier: impl Into<AlgorithmId>,
        provider: Arc<dyn Provider>,
    ) -> Result<(), CryptoError> {
        let identifier = identifier.into();
        Self::check_capability(&provider, capability)?;

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        debug!(provider = provider.name(), %capability, %identifier, "registered algorithm (override)");
        entries.insert((capability, identifier), provider);
        Ok(())
    }

    /// Look up the provider bound to `(capability, identifier)`.
    ///
    /// # Errors
    ///
    /// `UnknownAlgorithm` if nothing is registered for the pair. The
    /// failure is local to this call; the registry stays usable.
    pub fn resolve(
        &self,
        capability: Capability,
        identifier: impl Into<AlgorithmId>,
    ) -> Result<Arc<dyn Provider>, CryptoError> {
        let identifier = identifier.into();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&(capability, identifier.clone()))
            .cloned()
            .ok_or(CryptoError::UnknownAlgorithm {
                capability,
                identifier: identifier.to_string(),
            })
    }

    /// All distinct registered providers, in no particular order.
    ///
    /// This is the candidate set the configuration resolver selects
    /// from.
    pub fn providers(&self) -> Vec<Arc<dyn Provider>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut seen: Vec<Arc<dyn Provider>> = Vec::new();
        for provider in entries.values() {
            if !seen.iter().any(|p| Arc::ptr_eq(p, provider)) {
                seen.push(Arc::clone(provider));
            }
        }
        seen
    }

    fn check_capability(
        provider: &Arc<dyn Provider>,
        capability: Capability,
    ) -> Result<(), CryptoError> {
        if !provider.supports(capability) {
            return Err(CryptoError::UnsupportedOperation {
                provider: provider.name().to_string(),
                capability,
            });
        }
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
