use crate::error::CredentialError;
use crate::path::composite_key;
use keystash_hasher::encoding::option_bytes_as_base64;
use keystash_hasher::{Hasher, Zeroizing};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A single secret entry.
///
/// A credential either carries an explicit value, returned verbatim, or derives its value on
/// demand from the collection's hasher using the composite key, its version and its length.
/// Derived values are never cached.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    name: String,
    group: Option<String>,
    length: usize,
    version: u64,
    frozen: bool,
    value: Option<Zeroizing<Vec<u8>>>,
}

impl Credential {
    /// A derived credential at version 0.
    #[must_use]
    pub fn derived(name: impl Into<String>, group: Option<String>, length: usize, frozen: bool) -> Self {
        Self { name: name.into(), group, length, version: 0, frozen, value: None }
    }

    /// A credential holding an explicit value. `length` is advisory for such entries.
    #[must_use]
    pub fn explicit(
        name: impl Into<String>,
        group: Option<String>,
        value: Zeroizing<Vec<u8>>,
        length: usize,
        frozen: bool,
    ) -> Self {
        Self { name: name.into(), group, length, version: 0, frozen, value: Some(value) }
    }

    /// Restores a credential from its persisted record without recomputing anything.
    #[must_use]
    pub fn from_record(name: impl Into<String>, group: Option<String>, record: &CredentialRecord) -> Self {
        Self {
            name: name.into(),
            group,
            length: record.length,
            version: record.version,
            frozen: record.frozen,
            value: record.value.as_ref().map(|bytes| Zeroizing::new(bytes.clone())),
        }
    }

    /// Persisted form: metadata plus the explicit value if one exists.
    #[must_use]
    pub fn to_record(&self) -> CredentialRecord {
        CredentialRecord {
            length: self.length,
            version: self.version,
            frozen: self.frozen,
            value: self.value.as_ref().map(|bytes| bytes.to_vec()),
        }
    }

    /// Computes the current value.
    ///
    /// # Errors
    /// Returns [`CredentialError::Hasher`] if derivation fails.
    pub fn value(&self, hasher: &dyn Hasher) -> Result<Zeroizing<Vec<u8>>, CredentialError> {
        if let Some(value) = &self.value {
            return Ok(value.clone());
        }

        hasher.derive(&self.key(), self.version, self.length).map_err(|source| {
            CredentialError::Hasher { source, context: Some(format!("Deriving '{}'", self.key()).into()) }
        })
    }

    /// Bumps the version unless frozen. Frozen credentials are returned untouched.
    pub const fn rotate(&mut self) -> &Self {
        if !self.frozen {
            self.version += 1;
        }
        self
    }

    /// Turns a derived credential into an explicit one holding `value`.
    ///
    /// Used to keep frozen derived credentials stable when the hasher is replaced.
    pub(crate) fn pin(&mut self, value: Zeroizing<Vec<u8>>) {
        self.value = Some(value);
    }

    /// Composite derivation context: `group/name` or `name`.
    #[must_use]
    pub fn key(&self) -> String {
        composite_key(self.group.as_deref(), &self.name)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        self.value.is_some()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("length", &self.length)
            .field("version", &self.version)
            .field("frozen", &self.frozen)
            .field("value", &self.value.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Serialized form of a [`Credential`].
///
/// ```json
/// { "length": 32, "version": 0, "frozen": false, "value": null }
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(deny_unknown_fields)]
pub struct CredentialRecord {
    pub length: usize,
    pub version: u64,
    pub frozen: bool,
    #[serde(default, with = "option_bytes_as_base64")]
    pub value: Option<Vec<u8>>,
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("length", &self.length)
            .field("version", &self.version)
            .field("frozen", &self.frozen)
            .field("value", &self.value.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
