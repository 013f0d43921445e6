use crate::config::{HasherConfig, KeyMaterial};
use crate::error::HasherError;
use std::fmt;
use zeroize::Zeroizing;

/// Version of the `info` framing below. Bumping it changes every derived value.
pub(crate) const INFO_PREFIX: &[u8] = b"keystash:v1:";

/// A deterministic one-way derivation capability.
///
/// Implementations own their key material. For a fixed configuration, `derive` must return
/// the same bytes for the same `(context, version, length)` and must return exactly `length`
/// bytes. Different contexts or versions must produce independent outputs.
///
/// The trait is object safe; collections hold a `Box<dyn Hasher>` selected through the
/// [`registry`](crate::registry).
pub trait Hasher: fmt::Debug + Send + Sync {
    /// Builds the hasher from validated key material.
    fn from_keys(keys: KeyMaterial) -> Self
    where
        Self: Sized;

    /// Registry tag of this variant (e.g. `hkdf-sha256`).
    fn variant(&self) -> &'static str;

    /// Derives `length` pseudorandom bytes bound to `context` and `version`.
    ///
    /// # Errors
    /// Returns [`HasherError::Derivation`] if the underlying function rejects its inputs.
    fn derive(
        &self,
        context: &str,
        version: u64,
        length: usize,
    ) -> Result<Zeroizing<Vec<u8>>, HasherError>;

    /// Returns the configuration that reproduces this hasher.
    fn to_config(&self) -> HasherConfig;
}

/// Binds a derivation to its context and version: `keystash:v1:<context>:<version>`.
///
/// The version is the last `:`-separated field and only contains digits, so two different
/// `(context, version)` pairs can never produce the same framing.
pub(crate) fn derivation_info(context: &str, version: u64) -> Zeroizing<Vec<u8>> {
    let version = version.to_string();
    let mut info = Vec::with_capacity(INFO_PREFIX.len() + context.len() + 1 + version.len());
    info.extend_from_slice(INFO_PREFIX);
    info.extend_from_slice(context.as_bytes());
    info.push(b':');
    info.extend_from_slice(version.as_bytes());
    Zeroizing::new(info)
}
