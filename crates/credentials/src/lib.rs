//! Hierarchical credential store built on deterministic derivation.
//!
//! A [`CredentialCollection`] owns one hasher and a namespace of credentials addressed by
//! `[name]` or `[group, name]`. Most credentials are derived: their value is recomputed from
//! the hasher, the composite key and the credential's version, so nothing secret is stored
//! for them. Explicit credentials hold a supplied value (for example the contents of a file)
//! and are frozen by default.
//!
//! ## Rotation
//!
//! * [`CredentialCollection::rotate`]: one credential, or every member of a group.
//! * [`CredentialCollection::rotate_credentials`]: every non-frozen credential.
//! * [`CredentialCollection::rotate_hasher`]: new key material, then every non-frozen
//!   credential.
//!
//! Frozen credentials keep their value and version through all three.
//!
//! ## Persistence
//!
//! [`CredentialCollection::to_snapshot`] produces a [`CollectionSnapshot`]; its JSON form
//! stores the hasher configuration, credential metadata and explicit values only.
//!
//! ## Logging
//!
//! Lifecycle events are emitted through `tracing` (`debug` for individual credentials,
//! `info` for collection-wide operations, `warn` for unreadable secret files). Values and
//! key material are never logged. Installing a subscriber is left to the application.

mod collection;
mod config;
mod credential;
mod error;
mod options;
mod path;
mod snapshot;
mod source;

pub use collection::{CredentialCollection, Entry, Group, Rotated};
pub use config::{CollectionDefaults, ENV_PREFIX, load_defaults};
pub use credential::{Credential, CredentialRecord};
pub use error::{CredentialError, CredentialErrorExt};
pub use options::AddOptions;
pub use path::{CredentialPath, GROUP_SEPARATOR, composite_key, validate_segment};
pub use snapshot::{CollectionSnapshot, SCHEMA_VERSION, SnapshotEntry};
pub use source::{FsSource, SecretSource};

pub mod prelude {
    pub use crate::collection::{CredentialCollection, Rotated};
    pub use crate::config::CollectionDefaults;
    pub use crate::credential::Credential;
    pub use crate::error::{CredentialError, CredentialErrorExt};
    pub use crate::options::AddOptions;
}
