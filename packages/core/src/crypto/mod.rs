//! Cryptographic provider layer
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Caller                              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ resolve(capability, "sha256")
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Registry                             │
//! │  - (capability, algorithm id) -> Provider                   │
//! │  - populated at startup, concurrent reads thereafter        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Provider (Backend-Agility)                │
//! │  - Digest / SymmetricCipher / AsymmetricSign / RandomBytes  │
//! │  - declares its origin + version for the resolver           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ open
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Session                             │
//! │  - open → update* → finalize state machine                  │
//! │  - single owner, zeroizes secret buffers on drop            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! ### Core traits
//! - [`provider`]: the Provider trait and backend op seams
//!
//! ### Implementations
//! - [`suites`]: shipped Provider implementations (reference suite)
//!
//! ### Runtime
//! - [`registry`]: algorithm identifier -> provider map
//! - [`session`]: stateful handles for incremental operations
//! - [`key_material`]: zeroizing secret key wrapper
//! - [`resolver`]: declarative backend selection (version constraints)

// ============================================================================
// Core traits
// ============================================================================

/// Provider trait for backend-agility
pub mod provider;

// ============================================================================
// Implementations
// ============================================================================

/// Backend suites (reference implementation)
pub mod suites;

// ============================================================================
// Runtime
// ============================================================================

pub mod key_material;

pub mod registry;

pub mod resolver;

pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

pub use key_material::KeyMaterial;
pub use provider::{AlgorithmId, Capability, CipherDirection, Provider};
pub use registry::Registry;
pub use resolver::{select_provider, ResolverConfig, Version};
pub use session::{Session, SessionState};
