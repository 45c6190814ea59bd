//! Centralized configuration for the provider layer.
//!
//! All tunables live here so that algorithm parameters and resolver
//! defaults are not hardcoded across the crate.

use std::sync::OnceLock;

use crate::crypto::resolver::Version;

/// Global application configuration (singleton)
static GLOBAL_CONFIG: OnceLock<Config> = OnceLock::new();

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    // ============================================
    // AEAD PARAMETERS
    // ============================================
    /// Nonce length for AES-GCM and ChaCha20-Poly1305 (bytes)
    pub aead_nonce_length: usize,

    /// Authentication tag length (bytes)
    pub aead_tag_length: usize,

    /// Key length for AES-256-GCM / ChaCha20-Poly1305 (bytes)
    pub aead_key_length: usize,

    // ============================================
    // SIGNING PARAMETERS
    // ============================================
    /// Ed25519 signing key length (bytes)
    pub signing_key_length: usize,

    /// Ed25519 signature length (bytes)
    pub signature_length: usize,

    // ============================================
    // RESOLVER DEFAULTS
    // ============================================
    /// Minimum provider version accepted when a resolver config does not
    /// specify one explicitly
    pub default_min_version: Version,

    /// Origins probed (in order) when a resolver config carries no search
    /// paths of its own
    pub default_search_paths: Vec<String>,
}

impl Config {
    /// Create a configuration with default values
    pub fn default() -> Self {
        Self {
            // AEAD
            aead_nonce_length: 12,
            aead_tag_length: 16,
            aead_key_length: 32,

            // Signing
            signing_key_length: 32,
            signature_length: 64,

            // Resolver
            default_min_version: Version::new(1, 0, 0, 0),
            default_search_paths: vec!["builtin:ref".to_string()],
        }
    }

    /// Create a configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Override defaults from env when set
        if let Ok(val) = std::env::var("CRYPTEL_MIN_VERSION") {
            if let Ok(parsed) = val.parse() {
                config.default_min_version = parsed;
            }
        }

        if let Ok(val) = std::env::var("CRYPTEL_SEARCH_PATH") {
            let paths: Vec<String> = val
                .split(':')
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if !paths.is_empty() {
                config.default_search_paths = paths;
            }
        }

        config
    }

    /// Get the global configuration instance
    ///
    /// Initializes the configuration with default values on first call.
    pub fn global() -> &'static Config {
        GLOBAL_CONFIG.get_or_init(Config::default)
    }

    /// Initialize the global configuration with default values
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration was already initialized
    pub fn init() -> std::result::Result<(), &'static str> {
        GLOBAL_CONFIG
            .set(Self::default())
            .map_err(|_| "Config already initialized")
    }

    /// Initialize the global configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration was already initialized
    pub fn init_from_env() -> std::result::Result<(), &'static str> {
        GLOBAL_CONFIG
            .set(Self::from_env())
            .map_err(|_| "Config already initialized")
    }

    /// Initialize the global configuration with a custom instance
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration was already initialized
    pub fn init_with(config: Config) -> std::result::Result<(), &'static str> {
        GLOBAL_CONFIG
            .set(config)
            .map_err(|_| "Config already initialized")
    }

    /// Check whether the global configuration has been initialized
    pub fn is_initialized() -> bool {
        GLOBAL_CONFIG.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.aead_nonce_length, 12);
        assert_eq!(config.aead_tag_length, 16);
        assert_eq!(config.aead_key_length, 32);
    }

    #[test]
    fn test_config_values() {
        let config = Config::default();

        // Signing params
        assert_eq!(config.signing_key_length, 32);
        assert_eq!(config.signature_length, 64);

        // Resolver defaults
        assert_eq!(config.default_min_version, Version::new(1, 0, 0, 0));
        assert_eq!(config.default_search_paths, vec!["builtin:ref".to_string()]);
    }
}
