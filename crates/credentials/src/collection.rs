use crate::config::CollectionDefaults;
use crate::credential::{Credential, CredentialRecord};
use crate::error::{CredentialError, CredentialErrorExt};
use crate::options::AddOptions;
use crate::path::{CredentialPath, composite_key, validate_segment};
use crate::snapshot::{CollectionSnapshot, SCHEMA_VERSION, SnapshotEntry};
use crate::source::{FsSource, SecretSource};
use keystash_hasher::{DEFAULT_VARIANT, Hasher, HasherConfig, Zeroizing, registry};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Credentials of one group, keyed by name.
pub type Group = BTreeMap<String, Credential>;

/// Shape of a top-level key. Fixed at first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Flat(Credential),
    Group(Group),
}

impl Entry {
    const fn shape(&self) -> &'static str {
        match self {
            Self::Flat(_) => "flat",
            Self::Group(_) => "group",
        }
    }

    fn credentials(&self) -> Box<dyn Iterator<Item = &Credential> + '_> {
        match self {
            Self::Flat(credential) => Box::new(std::iter::once(credential)),
            Self::Group(group) => Box::new(group.values()),
        }
    }

    fn credentials_mut(&mut self) -> Box<dyn Iterator<Item = &mut Credential> + '_> {
        match self {
            Self::Flat(credential) => Box::new(std::iter::once(credential)),
            Self::Group(group) => Box::new(group.values_mut()),
        }
    }
}

/// Result of [`CredentialCollection::rotate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotated<'a> {
    Credential(&'a Credential),
    Group(&'a Group),
}

/// A hasher plus a two-level namespace of credentials.
///
/// Top-level keys hold either a single credential or a group of credentials. Derived values
/// are recomputed on every [`get`](Self::get); only metadata and explicit values are stored.
///
/// ```rust
/// use keystash_credentials::prelude::*;
///
/// # fn main() -> Result<(), CredentialError> {
/// let mut collection = CredentialCollection::create(None)?;
///
/// collection.add(&["db", "pwd"], AddOptions::new().length(15))?;
/// let first = collection.get(&["db", "pwd"])?;
/// assert_eq!(first.len(), 15);
///
/// collection.rotate(&["db", "pwd"]);
/// assert_ne!(collection.get(&["db", "pwd"])?, first);
///
/// let restored = CredentialCollection::from_json(&collection.to_json()?)?;
/// assert_eq!(restored.get(&["db", "pwd"])?, collection.get(&["db", "pwd"])?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CredentialCollection {
    hasher: Box<dyn Hasher>,
    namespace: BTreeMap<String, Entry>,
    defaults: CollectionDefaults,
    schema_version: u32,
    source: Box<dyn SecretSource>,
}

impl CredentialCollection {
    /// An empty collection with a freshly generated hasher.
    ///
    /// # Errors
    /// * [`CredentialError::InvalidConfiguration`] for a zero `default_length`.
    /// * [`CredentialError::Hasher`] for an unknown hasher variant or if key material cannot
    ///   be generated.
    pub fn create(defaults: Option<CollectionDefaults>) -> Result<Self, CredentialError> {
        let defaults = defaults.unwrap_or_default();
        defaults.validate()?;

        let hasher = registry::generate(&defaults.hasher).context("Failed to create hasher")?;
        info!(variant = hasher.variant(), "Created credential collection");

        Ok(Self {
            hasher,
            namespace: BTreeMap::new(),
            defaults,
            schema_version: SCHEMA_VERSION,
            source: Box::new(FsSource),
        })
    }

    /// Rebuilds a collection from its serialized parts. A missing hasher configuration yields
    /// a freshly generated default hasher.
    ///
    /// # Errors
    /// * [`CredentialError::Hasher`] for an unknown variant or rejected key material.
    /// * [`CredentialError::InvalidLength`] for a derived record of length 0.
    /// * [`CredentialError::InvalidPathSegment`] for a key or name containing `/`.
    pub fn new(
        hasher: Option<&HasherConfig>,
        credentials: Option<&BTreeMap<String, SnapshotEntry>>,
        schema_version: u32,
    ) -> Result<Self, CredentialError> {
        let hasher = match hasher {
            Some(config) => registry::from_config(config).context("Failed to restore hasher")?,
            None => registry::generate(DEFAULT_VARIANT).context("Failed to create hasher")?,
        };

        let mut namespace = BTreeMap::new();
        for (key, entry) in credentials.into_iter().flatten() {
            validate_segment(key)?;
            let entry = match entry {
                SnapshotEntry::Flat(record) => Entry::Flat(restore(key, None, record)?),
                SnapshotEntry::Group(records) => Entry::Group(
                    records
                        .iter()
                        .map(|(name, record)| Ok((name.clone(), restore(name, Some(key.as_str()), record)?)))
                        .collect::<Result<_, CredentialError>>()?,
                ),
            };
            namespace.insert(key.clone(), entry);
        }

        info!(
            variant = hasher.variant(),
            entries = namespace.len(),
            schema_version,
            "Restored credential collection"
        );

        let defaults = CollectionDefaults { hasher: hasher.variant().to_owned(), ..Default::default() };

        Ok(Self {
            hasher,
            namespace,
            defaults,
            schema_version,
            source: Box::new(FsSource),
        })
    }

    /// # Errors
    /// See [`CredentialCollection::new`].
    pub fn from_snapshot(snapshot: &CollectionSnapshot) -> Result<Self, CredentialError> {
        Self::new(snapshot.hasher.as_ref(), Some(&snapshot.credentials), snapshot.schema_version)
    }

    /// # Errors
    /// [`CredentialError::Serialization`] for malformed input, otherwise see
    /// [`CredentialCollection::new`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, CredentialError> {
        let snapshot: CollectionSnapshot =
            serde_json::from_value(value).context("Failed to parse collection snapshot")?;
        Self::from_snapshot(&snapshot)
    }

    /// # Errors
    /// [`CredentialError::Serialization`] for malformed input, otherwise see
    /// [`CredentialCollection::new`].
    pub fn from_json(json: &str) -> Result<Self, CredentialError> {
        let snapshot: CollectionSnapshot =
            serde_json::from_str(json).context("Failed to parse collection snapshot")?;
        Self::from_snapshot(&snapshot)
    }

    /// Replaces the construction defaults. Existing credentials keep their lengths.
    ///
    /// # Errors
    /// See [`CollectionDefaults::validate`].
    pub fn with_defaults(mut self, defaults: CollectionDefaults) -> Result<Self, CredentialError> {
        defaults.validate()?;
        self.defaults = defaults;
        Ok(self)
    }

    /// Replaces the reader used by [`add_from_file`](Self::add_from_file).
    #[must_use]
    pub fn with_source(mut self, source: impl SecretSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Creates the credential at `path` unless it already exists.
    ///
    /// Without `force` an existing credential is returned unchanged. With `force` it is
    /// replaced wholesale and its version history is lost.
    ///
    /// # Errors
    /// * [`CredentialError::InvalidPathArity`] unless the path has 1 or 2 segments.
    /// * [`CredentialError::InvalidPathSegment`] if a segment contains `/`.
    /// * [`CredentialError::ShapeConflict`] if the top-level key has the other shape.
    /// * [`CredentialError::InvalidLength`] if the effective length is 0.
    pub fn add<S: AsRef<str>>(
        &mut self,
        path: &[S],
        options: AddOptions,
    ) -> Result<&Credential, CredentialError> {
        let path = CredentialPath::parse(path)?;
        self.insert(path, options)
    }

    /// Adds an explicit, always frozen credential holding the contents of `file`.
    ///
    /// `value` and `frozen` of `options` are overridden; `length` and `force` apply as in
    /// [`add`](Self::add). A failed read leaves the collection untouched.
    ///
    /// # Errors
    /// [`CredentialError::FileNotReadable`] on any read failure, otherwise see
    /// [`add`](Self::add).
    pub fn add_from_file<S: AsRef<str>>(
        &mut self,
        file: impl AsRef<Path>,
        path: &[S],
        options: AddOptions,
    ) -> Result<&Credential, CredentialError> {
        let file = file.as_ref();
        let path = CredentialPath::parse(path)?;
        self.check_shape(path)?;

        let contents = self.source.read(file).map_err(|source| {
            warn!(file = %file.display(), credential = %path, error = %source, "Secret file is not readable");
            CredentialError::FileNotReadable { path: file.to_path_buf(), source, context: None }
        })?;

        let options = AddOptions { value: Some(Zeroizing::new(contents)), frozen: Some(true), ..options };
        self.insert(path, options)
    }

    /// Computes the value at `path`.
    ///
    /// # Errors
    /// * [`CredentialError::InvalidPathArity`] unless the path has 1 or 2 segments.
    /// * [`CredentialError::GroupNotFound`] if the first of two segments is not a group.
    /// * [`CredentialError::CredentialNotFound`] if the credential is absent.
    /// * [`CredentialError::Hasher`] if derivation fails.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Result<Zeroizing<Vec<u8>>, CredentialError> {
        let path = CredentialPath::parse(path)?;

        let credential = match path {
            CredentialPath::Flat(name) => match self.namespace.get(name) {
                Some(Entry::Flat(credential)) => Some(credential),
                _ => None,
            },
            CredentialPath::Grouped { group, name } => match self.namespace.get(group) {
                Some(Entry::Group(credentials)) => credentials.get(name),
                _ => {
                    return Err(CredentialError::GroupNotFound { group: group.to_owned(), context: None });
                }
            },
        };

        credential
            .ok_or_else(|| CredentialError::CredentialNotFound { path: path.to_string(), context: None })?
            .value(self.hasher.as_ref())
    }

    /// Returns `true` if a credential exists at `path`. Malformed paths yield `false`.
    #[must_use]
    pub fn exists<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.credential(path).is_some()
    }

    /// Metadata of the credential at `path`, if any.
    #[must_use]
    pub fn credential<S: AsRef<str>>(&self, path: &[S]) -> Option<&Credential> {
        CredentialPath::parse(path).ok().and_then(|path| self.lookup(path))
    }

    /// Credentials of the group `name`, if it is a group.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        match self.namespace.get(name) {
            Some(Entry::Group(group)) => Some(group),
            _ => None,
        }
    }

    /// Removes and returns the credential at `path`. A group left empty keeps its key and shape.
    pub fn remove<S: AsRef<str>>(&mut self, path: &[S]) -> Option<Credential> {
        let path = CredentialPath::parse(path).ok()?;

        let removed = match path {
            CredentialPath::Flat(name) => match self.namespace.get(name) {
                Some(Entry::Flat(_)) => match self.namespace.remove(name) {
                    Some(Entry::Flat(credential)) => Some(credential),
                    _ => None,
                },
                _ => None,
            },
            CredentialPath::Grouped { group, name } => {
                let Some(Entry::Group(credentials)) = self.namespace.get_mut(group) else {
                    return None;
                };
                credentials.remove(name)
            }
        };

        if removed.is_some() {
            debug!(credential = %path, "Removed credential");
        }
        removed
    }

    /// Rotates the credential at `path`, or every credential of the group named by a
    /// one-segment path. Frozen credentials are skipped.
    pub fn rotate<S: AsRef<str>>(&mut self, path: &[S]) -> Option<Rotated<'_>> {
        let path = CredentialPath::parse(path).ok()?;

        match path {
            CredentialPath::Flat(key) => match self.namespace.get_mut(key)? {
                Entry::Flat(credential) => {
                    let credential = credential.rotate();
                    debug!(credential = %path, version = credential.version(), "Rotated credential");
                    Some(Rotated::Credential(credential))
                }
                Entry::Group(group) => {
                    let rotated = group.values_mut().map(Credential::rotate).filter(|c| !c.is_frozen()).count();
                    debug!(group = key, rotated, "Rotated group");
                    Some(Rotated::Group(group))
                }
            },
            CredentialPath::Grouped { group, name } => match self.namespace.get_mut(group)? {
                Entry::Group(credentials) => {
                    let credential = credentials.get_mut(name)?.rotate();
                    debug!(credential = %path, version = credential.version(), "Rotated credential");
                    Some(Rotated::Credential(credential))
                }
                Entry::Flat(_) => None,
            },
        }
    }

    /// Rotates every non-frozen credential under the current hasher. Returns how many
    /// credentials changed version.
    pub fn rotate_credentials(&mut self) -> usize {
        let rotated = self
            .namespace
            .values_mut()
            .flat_map(Entry::credentials_mut)
            .map(Credential::rotate)
            .filter(|credential| !credential.is_frozen())
            .count();

        info!(rotated, "Rotated credentials");
        rotated
    }

    /// Replaces the hasher with a freshly generated one of the same variant, then rotates
    /// every non-frozen credential. Returns how many credentials changed version.
    ///
    /// Frozen credentials keep their value: derived ones are pinned to the value computed
    /// with the outgoing hasher. Nothing changes if generation or derivation fails.
    ///
    /// Pinning turns such a credential into an explicit one, so its value is written to
    /// [`to_snapshot`](Self::to_snapshot) from then on instead of `null`. Freeze a derived
    /// credential only if persisting its secret after a hasher rotation is acceptable.
    ///
    /// # Errors
    /// Returns [`CredentialError::Hasher`] if key generation or derivation fails.
    pub fn rotate_hasher(&mut self) -> Result<usize, CredentialError> {
        let hasher = registry::generate(self.hasher.variant()).context("Failed to rotate hasher")?;

        let mut pinned = Vec::new();
        for (key, entry) in &self.namespace {
            for credential in entry.credentials() {
                if credential.is_frozen() && !credential.is_explicit() {
                    let value = credential.value(self.hasher.as_ref())?;
                    pinned.push((key.clone(), credential.name().to_owned(), value));
                }
            }
        }

        let pinned_count = pinned.len();
        for (key, name, value) in pinned {
            let credential = match self.namespace.get_mut(&key) {
                Some(Entry::Flat(credential)) => Some(credential),
                Some(Entry::Group(group)) => group.get_mut(&name),
                None => None,
            };
            if let Some(credential) = credential {
                credential.pin(value);
            }
        }

        self.hasher = hasher;
        info!(variant = self.hasher.variant(), pinned = pinned_count, "Rotated hasher");

        Ok(self.rotate_credentials())
    }

    /// Structured form of the whole collection: hasher configuration, credential records
    /// and schema version.
    #[must_use]
    pub fn to_snapshot(&self) -> CollectionSnapshot {
        let credentials = self
            .namespace
            .iter()
            .map(|(key, entry)| {
                let entry = match entry {
                    Entry::Flat(credential) => SnapshotEntry::Flat(credential.to_record()),
                    Entry::Group(group) => SnapshotEntry::Group(
                        group.iter().map(|(name, credential)| (name.clone(), credential.to_record())).collect(),
                    ),
                };
                (key.clone(), entry)
            })
            .collect();

        CollectionSnapshot {
            hasher: Some(self.hasher.to_config()),
            credentials,
            schema_version: self.schema_version,
        }
    }

    /// Alias of [`to_snapshot`](Self::to_snapshot).
    #[must_use]
    pub fn to_hash(&self) -> CollectionSnapshot {
        self.to_snapshot()
    }

    /// # Errors
    /// Returns [`CredentialError::Serialization`] if the snapshot cannot be rendered.
    pub fn to_value(&self) -> Result<serde_json::Value, CredentialError> {
        serde_json::to_value(self.to_snapshot()).context("Failed to serialize collection")
    }

    /// # Errors
    /// Returns [`CredentialError::Serialization`] if the snapshot cannot be rendered.
    pub fn to_json(&self) -> Result<String, CredentialError> {
        serde_json::to_string_pretty(&self.to_snapshot()).context("Failed to serialize collection")
    }

    /// Number of credentials, counting each member of a group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespace.values().map(|entry| entry.credentials().count()).sum()
    }

    /// `true` if no credential exists. Empty groups do not count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// All credentials in key order, groups expanded.
    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.namespace.values().flat_map(Entry::credentials)
    }

    /// Path segments of every credential, in key order.
    pub fn paths(&self) -> impl Iterator<Item = Vec<&str>> {
        self.iter().map(|credential| credential.group().into_iter().chain([credential.name()]).collect())
    }

    #[must_use]
    pub fn hasher(&self) -> &dyn Hasher {
        self.hasher.as_ref()
    }

    #[must_use]
    pub const fn defaults(&self) -> &CollectionDefaults {
        &self.defaults
    }

    #[must_use]
    pub const fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn lookup(&self, path: CredentialPath<'_>) -> Option<&Credential> {
        match (path, self.namespace.get(path.key())?) {
            (CredentialPath::Flat(_), Entry::Flat(credential)) => Some(credential),
            (CredentialPath::Grouped { name, .. }, Entry::Group(group)) => group.get(name),
            _ => None,
        }
    }

    fn check_shape(&self, path: CredentialPath<'_>) -> Result<(), CredentialError> {
        let Some(existing) = self.namespace.get(path.key()) else {
            return Ok(());
        };

        let matches = matches!(
            (path, existing),
            (CredentialPath::Flat(_), Entry::Flat(_)) | (CredentialPath::Grouped { .. }, Entry::Group(_))
        );
        if matches {
            Ok(())
        } else {
            Err(CredentialError::ShapeConflict {
                key: path.key().to_owned(),
                existing: existing.shape(),
                context: None,
            })
        }
    }

    fn insert(&mut self, path: CredentialPath<'_>, options: AddOptions) -> Result<&Credential, CredentialError> {
        self.check_shape(path)?;

        let exists = self.lookup(path).is_some();
        if !exists || options.force {
            let length = options.length.unwrap_or(self.defaults.default_length);
            if length == 0 {
                return Err(CredentialError::InvalidLength { length, context: Some(path.to_string().into()) });
            }

            let frozen = options.effective_frozen();
            let group = path.group().map(str::to_owned);
            let credential = match options.value {
                Some(value) => Credential::explicit(path.name(), group, value, length, frozen),
                None => Credential::derived(path.name(), group, length, frozen),
            };

            match path {
                CredentialPath::Flat(name) => {
                    self.namespace.insert(name.to_owned(), Entry::Flat(credential));
                }
                CredentialPath::Grouped { group, name } => {
                    if let Entry::Group(credentials) =
                        self.namespace.entry(group.to_owned()).or_insert_with(|| Entry::Group(Group::new()))
                    {
                        credentials.insert(name.to_owned(), credential);
                    }
                }
            }

            debug!(credential = %path, length, frozen, replaced = exists, "Stored credential");
        }

        self.lookup(path).ok_or_else(|| CredentialError::Internal {
            message: format!("Credential '{path}' vanished after insert").into(),
            context: None,
        })
    }
}

fn restore(name: &str, group: Option<&str>, record: &CredentialRecord) -> Result<Credential, CredentialError> {
    validate_segment(name)?;
    if record.length == 0 && record.value.is_none() {
        return Err(CredentialError::InvalidLength {
            length: 0,
            context: Some(format!("Restoring '{}'", composite_key(group, name)).into()),
        });
    }
    Ok(Credential::from_record(name, group.map(str::to_owned), record))
}
