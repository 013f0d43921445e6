use keystash_credentials::prelude::*;
use keystash_credentials::{SCHEMA_VERSION, SecretSource};
use keystash_hasher::HasherConfig;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

pub const SECRET: &[u8] = b"collection-secret";
pub const SALT: &[u8] = b"collection-salt";

#[must_use]
pub fn fixed_config() -> HasherConfig {
    HasherConfig::new("hkdf-sha256", SECRET.to_vec(), SALT.to_vec())
}

/// A collection with fixed key material, so derived values are reproducible across tests.
/// # Panics
/// * If the fixed configuration is rejected.
#[must_use]
pub fn fixed_collection() -> CredentialCollection {
    CredentialCollection::new(Some(&fixed_config()), None, SCHEMA_VERSION)
        .expect("Collection setup failed")
}

/// In-memory secret files; any path not registered fails with `NotFound`.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: &[u8]) -> Self {
        self.files.insert(path.into(), contents.to_vec());
        self
    }
}

impl SecretSource for MemorySource {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such secret"))
    }
}
