use std::fmt::Debug;
use std::io;
use std::path::Path;

/// Reads the raw bytes of externally managed secrets.
pub trait SecretSource: Debug + Send + Sync {
    /// Returns the full contents at `path`.
    ///
    /// # Errors
    /// Any I/O failure; the collection reports it as `FileNotReadable`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads secrets from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl SecretSource for FsSource {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}
