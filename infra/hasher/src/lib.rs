//! Deterministic one-way derivation of secrets from a master secret.
//!
//! A hasher is configured once with a secret, a salt and a variant tag. From then on every
//! call to [`Hasher::derive`] with the same `(context, version, length)` returns the same
//! bytes, while a different context or version yields independent output. That single
//! property is what lets a credential store keep only metadata and recompute values on
//! demand: rotating a credential is a version bump, and isolating namespaces is a matter
//! of choosing distinct contexts.
//!
//! ## Variants
//!
//! | Tag | Function | Cost |
//! |---|---|---|
//! | `hkdf-sha256` | HKDF-SHA256 (default) | microseconds |
//! | `hkdf-sha512` | HKDF-SHA512 | microseconds |
//! | `argon2id` | Argon2id, m=19 MiB, t=2, p=1 | tens of milliseconds |
//!
//! Variants are resolved through the build-time [`registry`]; there is no runtime plugin
//! loading.
//!
//! ## Configuration
//!
//! [`HasherConfig`] is the serializable form (`{variant, secret, salt}`, byte fields as
//! unpadded Base64). Key material is zeroized on drop and never printed by `Debug`.
//!
//! ## Example
//!
//! ```rust
//! use keystash_hasher::prelude::*;
//!
//! # fn main() -> Result<(), HasherError> {
//! let secret = b"master-secret".as_slice();
//! let salt = b"unique-salt".as_slice();
//! let hasher = registry::create("hkdf-sha256", Some(secret), Some(salt))?;
//!
//! let first = hasher.derive("db/password", 0, 24)?;
//! let again = hasher.derive("db/password", 0, 24)?;
//! let rotated = hasher.derive("db/password", 1, 24)?;
//!
//! assert_eq!(first, again);
//! assert_ne!(first, rotated);
//! assert_eq!(first.len(), 24);
//!
//! // Persist the configuration, restore it later.
//! let restored = registry::from_config(&hasher.to_config())?;
//! assert_eq!(restored.derive("db/password", 0, 24)?, first);
//! # Ok(())
//! # }
//! ```

mod argon2id;
mod config;
pub mod encoding;
mod error;
mod hasher;
mod hkdf_sha2;
pub mod registry;

pub use argon2id::Argon2Hasher;
pub use config::{GENERATED_KEY_LEN, HasherConfig, KeyMaterial, MIN_SALT_LEN};
pub use error::{HasherError, HasherErrorExt};
pub use hasher::Hasher;
pub use hkdf_sha2::{HkdfDigest, HkdfHasher, HkdfSha256, HkdfSha512};
pub use registry::DEFAULT_VARIANT;
pub use zeroize::Zeroizing;

pub mod prelude {
    pub use crate::config::HasherConfig;
    pub use crate::error::{HasherError, HasherErrorExt};
    pub use crate::hasher::Hasher;
    pub use crate::registry;
}
