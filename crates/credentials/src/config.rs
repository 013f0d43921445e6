use crate::error::{CredentialError, CredentialErrorExt};
use config::{Config, Environment, File};
use keystash_hasher::{DEFAULT_VARIANT, registry};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Prefix of environment overrides, e.g. `KEYSTASH__DEFAULT_LENGTH=48`.
pub const ENV_PREFIX: &str = "KEYSTASH";

/// Construction-time settings of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionDefaults {
    /// Length given to credentials added without an explicit `length`.
    pub default_length: usize,
    /// Hasher variant used by [`CredentialCollection::create`](crate::CredentialCollection::create).
    pub hasher: String,
}

impl Default for CollectionDefaults {
    fn default() -> Self {
        Self { default_length: 32, hasher: DEFAULT_VARIANT.to_owned() }
    }
}

impl CollectionDefaults {
    #[must_use]
    pub const fn with_default_length(mut self, default_length: usize) -> Self {
        self.default_length = default_length;
        self
    }

    #[must_use]
    pub fn with_hasher(mut self, hasher: impl Into<String>) -> Self {
        self.hasher = hasher.into();
        self
    }

    /// # Errors
    /// * [`CredentialError::InvalidConfiguration`] for a zero `default_length`.
    /// * [`CredentialError::Hasher`] wrapping
    ///   [`HasherError::UnknownHasherVariant`](keystash_hasher::HasherError::UnknownHasherVariant) for an
    ///   unregistered hasher tag.
    pub fn validate(&self) -> Result<(), CredentialError> {
        if self.default_length == 0 {
            return Err(CredentialError::InvalidConfiguration {
                message: "default_length must be positive".into(),
                context: None,
            });
        }
        registry::lookup(&self.hasher).map(|_| ()).context(format!(
            "Expected one of: {}",
            registry::variants().collect::<Vec<_>>().join(", ")
        ))
    }
}

/// Loads [`CollectionDefaults`] from an optional file plus `KEYSTASH__*` environment overrides.
///
/// Without a file the built-in defaults are the base layer. A supplied file must exist; its
/// format is picked from the extension (`.toml`, `.json`, `.yaml`).
///
/// # Errors
/// * [`CredentialError::Config`] if the file is missing or malformed.
/// * [`CredentialError::InvalidConfiguration`] or [`CredentialError::Hasher`] if the merged
///   values fail [`CollectionDefaults::validate`].
pub fn load_defaults(path: Option<impl AsRef<Path>>) -> Result<CollectionDefaults, CredentialError> {
    let mut builder = Config::builder();

    if let Some(path) = &path {
        let path: &Path = path.as_ref();
        info!(path = %path.display(), "Loading collection defaults");
        builder = builder.add_source(File::from(path).required(true));
    }

    let defaults = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true))
        .build()
        .context("Failed to build collection defaults")?
        .try_deserialize::<CollectionDefaults>()
        .context("Failed to deserialize collection defaults")?;

    defaults.validate()?;
    Ok(defaults)
}
