//! Configuration resolver: selecting a compatible backend.
//!
//! What used to be a build-time probing step (walking installation
//! directories, loading the library, comparing hex-encoded version
//! numbers) is reduced here to a pure function over declared inputs: a
//! [`ResolverConfig`] record plus the set of candidate providers, each
//! of which declares its own origin and version.

use core::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::crypto::provider::Provider;
use crate::error::CryptoError;

/// A provider version, ordered numerically.
///
/// Comparison is lexicographic on the `(major, minor, patch, build)`
/// tuple, never on the string form: `3.0.1` > `3.0.0.9`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
    pub build: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16, patch: u16, build: u16) -> Self {
        Self {
            major,
            minor,
            patch,
            build,
        }
    }

    /// Parse a dotted version string with one to four components
    /// (`"3"`, `"3.0"`, `"3.0.1"`, `"1.1.0.4"`).
    ///
    /// A `0x`-prefixed hex literal is decoded with
    /// [`from_openssl_num`](Self::from_openssl_num), mirroring the
    /// second detection strategy of the original installer (reading the
    /// `OPENSSL_VERSION_NUMBER` define out of a header).
    pub fn parse(s: &str) -> Result<Self, CryptoError> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let num = u64::from_str_radix(hex, 16)
                .map_err(|_| CryptoError::InvalidVersion(s.to_string()))?;
            return Ok(Self::from_openssl_num(num));
        }

        let mut parts = [0u16; 4];
        let mut count = 0;
        for component in s.split('.') {
            if count == 4 {
                return Err(CryptoError::InvalidVersion(s.to_string()));
            }
            parts[count] = component
                .parse()
                .map_err(|_| CryptoError::InvalidVersion(s.to_string()))?;
            count += 1;
        }
        Ok(Self::new(parts[0], parts[1], parts[2], parts[3]))
    }

    /// Decode the OpenSSL `0xMNNFFPPS` version number encoding:
    /// major nibble, minor byte, fix byte, patch byte, status nibble
    /// (status is dropped). `0x10100000` decodes to `1.1.0`.
    pub fn from_openssl_num(num: u64) -> Self {
        Self {
            major: ((num >> 28) & 0xf) as u16,
            minor: ((num >> 20) & 0xff) as u16,
            patch: ((num >> 12) & 0xff) as u16,
            build: ((num >> 4) & 0xff) as u16,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.build != 0 {
            write!(f, ".{}", self.build)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Declarative input to provider selection.
///
/// The record mirrors what the original build script gathered
/// imperatively: installation prefixes to probe, a minimum acceptable
/// version, and an optional operator-supplied override path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Origins probed in declared order.
    pub search_paths: Vec<String>,
    /// Candidates older than this are rejected.
    pub min_version: Version,
    /// When set, only this origin is considered; there is no fallback to
    /// the search paths.
    pub explicit_override: Option<String>,
}

impl ResolverConfig {
    /// Deserialize a config record from JSON.
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let config = Config::global();
        Self {
            search_paths: config.default_search_paths.clone(),
            min_version: config.default_min_version,
            explicit_override: None,
        }
    }
}

/// Select a single compatible backend from `candidates`.
///
/// With an explicit override, only the override origin is considered.
/// Otherwise the search paths are probed in declared order and the
/// first candidate at a probed origin that satisfies `min_version`
/// wins.
///
/// # Errors
///
/// `NoCompatibleProvider`, enumerating every attempted path, when
/// nothing matched. The failure is local to this call; other
/// algorithms and providers remain usable.
pub fn select_provider(
    config: &ResolverConfig,
    candidates: &[Arc<dyn Provider>],
) -> Result<Arc<dyn Provider>, CryptoError> {
    let mut attempted = Vec::new();

    let paths: Vec<&String> = match &config.explicit_override {
        Some(path) => vec![path],
        None => config.search_paths.iter().collect(),
    };

    for path in paths {
        attempted.push(path.clone());
        match candidates.iter().find(|p| p.origin() == path.as_str()) {
            Some(provider) if provider.version() >= config.min_version => {
                debug!(
                    provider = provider.name(),
                    origin = provider.origin(),
                    version = %provider.version(),
                    "selected provider"
                );
                return Ok(Arc::clone(provider));
            }
            Some(provider) => {
                warn!(
                    provider = provider.name(),
                    origin = provider.origin(),
                    version = %provider.version(),
                    min_version = %config.min_version,
                    "provider too old, skipping"
                );
            }
            None => {
                debug!(path = path.as_str(), "no provider at path");
            }
        }
    }

    Err(CryptoError::NoCompatibleProvider { attempted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::suites::reference::ReferenceProvider;

    fn candidate(origin: &str, version: Version) -> Arc<dyn Provider> {
        Arc::new(ReferenceProvider::with_version(origin, version))
    }

    #[test]
    fn test_version_parse_dotted() {
        assert_eq!(Version::parse("3.0.1").unwrap(), Version::new(3, 0, 1, 0));
        assert_eq!(Version::parse("1.1").unwrap(), Version::new(1, 1, 0, 0));
        assert_eq!(
            Version::parse("1.1.0.4").unwrap(),
            Version::new(1, 1, 0, 4)
        );
        assert!(Version::parse("1.2.3.4.5").is_err());
        assert!(Version::parse("one.two").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn test_version_parse_openssl_hex() {
        // 0xMNNFFPPS: 1.1.0 with status nibble dropped
        assert_eq!(
            Version::parse("0x10100000").unwrap(),
            Version::new(1, 1, 0, 0)
        );
        assert_eq!(
            Version::from_openssl_num(0x1010107f),
            Version::new(1, 1, 1, 0x07)
        );
    }

    #[test]
    fn test_version_orders_numerically_not_lexically() {
        // As strings "3.0.10" < "3.0.9"; as versions it is the reverse
        let newer = Version::parse("3.0.10").unwrap();
        let older = Version::parse("3.0.9").unwrap();
        assert!(newer > older);

        assert!(Version::new(1, 1, 0, 0) > Version::new(1, 0, 2, 9));
        assert!(Version::new(2, 0, 0, 0) > Version::new(1, 255, 255, 255));
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(3, 0, 1, 0).to_string(), "3.0.1");
        assert_eq!(Version::new(1, 1, 0, 4).to_string(), "1.1.0.4");
    }

    #[test]
    fn test_select_first_compatible_path() {
        let candidates = vec![
            candidate("/opt/crypto/legacy", Version::new(0, 9, 8, 0)),
            candidate("/opt/crypto/current", Version::new(3, 0, 1, 0)),
        ];
        let config = ResolverConfig {
            search_paths: vec![
                "/opt/crypto/legacy".to_string(),
                "/opt/crypto/current".to_string(),
            ],
            min_version: Version::new(1, 1, 0, 0),
            explicit_override: None,
        };

        let selected = select_provider(&config, &candidates).unwrap();
        assert_eq!(selected.origin(), "/opt/crypto/current");
    }

    #[test]
    fn test_explicit_override_has_no_fallback() {
        let candidates = vec![
            candidate("/opt/crypto/current", Version::new(3, 0, 1, 0)),
            candidate("/custom/prefix", Version::new(1, 0, 0, 0)),
        ];
        let config = ResolverConfig {
            search_paths: vec!["/opt/crypto/current".to_string()],
            min_version: Version::new(2, 0, 0, 0),
            explicit_override: Some("/custom/prefix".to_string()),
        };

        // The override candidate is too old and the search paths are not
        // consulted behind an explicit override
        let err = select_provider(&config, &candidates).unwrap_err();
        match err {
            CryptoError::NoCompatibleProvider { attempted } => {
                assert_eq!(attempted, vec!["/custom/prefix".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_no_compatible_provider_enumerates_attempts() {
        let candidates = vec![candidate("/opt/crypto", Version::new(0, 9, 8, 0))];
        let config = ResolverConfig {
            search_paths: vec!["/missing/a".to_string(), "/opt/crypto".to_string()],
            min_version: Version::new(1, 0, 0, 0),
            explicit_override: None,
        };

        let err = select_provider(&config, &candidates).unwrap_err();
        match err {
            CryptoError::NoCompatibleProvider { attempted } => {
                assert_eq!(
                    attempted,
                    vec!["/missing/a".to_string(), "/opt/crypto".to_string()]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_config_from_json() {
        let config = ResolverConfig::from_json(
            r#"{
                "search_paths": ["/opt/crypto"],
                "min_version": { "major": 1, "minor": 1, "patch": 0, "build": 0 },
                "explicit_override": null
            }"#,
        )
        .unwrap();
        assert_eq!(config.search_paths, vec!["/opt/crypto".to_string()]);
        assert_eq!(config.min_version, Version::new(1, 1, 0, 0));
        assert!(config.explicit_override.is_none());
    }
}
