//! HKDF-based hashers (RFC 5869).
//!
//! The salt is used as the HKDF salt, the secret as input keying material and the
//! `(context, version)` framing as `info`. A single HKDF expansion is capped at
//! `255 * HashLen` bytes; longer outputs are assembled from consecutive blocks whose `info`
//! additionally carries a big-endian block counter.

use crate::config::{HasherConfig, KeyMaterial};
use crate::error::HasherError;
use crate::hasher::{Hasher, derivation_info};
use hkdf::Hkdf;
use private::Sealed;
use sha2::{Sha256, Sha512};
use std::fmt;
use std::marker::PhantomData;
use zeroize::Zeroizing;

mod private {
    pub trait Sealed {}
    impl Sealed for sha2::Sha256 {}
    impl Sealed for sha2::Sha512 {}
}

/// Digest functions usable with [`HkdfHasher`].
pub trait HkdfDigest: Sealed + 'static {
    /// Registry tag of the resulting hasher.
    const TAG: &'static str;
    /// Digest output length in bytes.
    const OUTPUT_LEN: usize;

    /// Longest output obtainable from one HKDF expansion.
    const MAX_EXPAND: usize = 255 * Self::OUTPUT_LEN;

    /// Runs HKDF-Extract followed by HKDF-Expand into `okm`.
    ///
    /// # Errors
    /// Returns [`HasherError::Derivation`] when `okm` exceeds [`HkdfDigest::MAX_EXPAND`].
    fn extract_expand(keys: &KeyMaterial, info: &[u8], okm: &mut [u8]) -> Result<(), HasherError>;
}

impl HkdfDigest for Sha256 {
    const TAG: &'static str = "hkdf-sha256";
    const OUTPUT_LEN: usize = 32;

    fn extract_expand(keys: &KeyMaterial, info: &[u8], okm: &mut [u8]) -> Result<(), HasherError> {
        Hkdf::<Self>::new(Some(keys.salt()), keys.secret())
            .expand(info, okm)
            .map_err(|_| expand_failed(Self::TAG, okm.len()))
    }
}

impl HkdfDigest for Sha512 {
    const TAG: &'static str = "hkdf-sha512";
    const OUTPUT_LEN: usize = 64;

    fn extract_expand(keys: &KeyMaterial, info: &[u8], okm: &mut [u8]) -> Result<(), HasherError> {
        Hkdf::<Self>::new(Some(keys.salt()), keys.secret())
            .expand(info, okm)
            .map_err(|_| expand_failed(Self::TAG, okm.len()))
    }
}

fn expand_failed(tag: &'static str, len: usize) -> HasherError {
    HasherError::Derivation {
        message: format!("HKDF expansion of {len} bytes failed").into(),
        context: Some(tag.into()),
    }
}

/// HKDF hasher generic over the SHA-2 digest.
pub struct HkdfHasher<D: HkdfDigest> {
    keys: KeyMaterial,
    _digest: PhantomData<fn() -> D>,
}

/// HKDF with SHA-256, the default variant.
pub type HkdfSha256 = HkdfHasher<Sha256>;

/// HKDF with SHA-512.
pub type HkdfSha512 = HkdfHasher<Sha512>;

impl<D: HkdfDigest> HkdfHasher<D> {
    #[must_use]
    pub const fn new(keys: KeyMaterial) -> Self {
        Self { keys, _digest: PhantomData }
    }
}

impl<D: HkdfDigest> fmt::Debug for HkdfHasher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HkdfHasher").field("variant", &D::TAG).field("keys", &self.keys).finish()
    }
}

impl<D: HkdfDigest> Hasher for HkdfHasher<D> {
    fn from_keys(keys: KeyMaterial) -> Self {
        Self::new(keys)
    }

    fn variant(&self) -> &'static str {
        D::TAG
    }

    fn derive(
        &self,
        context: &str,
        version: u64,
        length: usize,
    ) -> Result<Zeroizing<Vec<u8>>, HasherError> {
        let info = derivation_info(context, version);
        let mut okm = Zeroizing::new(vec![0u8; length]);

        if length <= D::MAX_EXPAND {
            D::extract_expand(&self.keys, &info, &mut okm)?;
            return Ok(okm);
        }

        let mut block_info = Zeroizing::new(Vec::with_capacity(info.len() + 5));
        for (index, block) in okm.chunks_mut(D::MAX_EXPAND).enumerate() {
            let index = u32::try_from(index).map_err(|_| HasherError::Derivation {
                message: format!("Requested length {length} needs too many HKDF blocks").into(),
                context: Some(D::TAG.into()),
            })?;
            block_info.clear();
            block_info.extend_from_slice(&info);
            block_info.push(b'#');
            block_info.extend_from_slice(&index.to_be_bytes());
            D::extract_expand(&self.keys, &block_info, block)?;
        }

        Ok(okm)
    }

    fn to_config(&self) -> HasherConfig {
        self.keys.to_config(D::TAG)
    }
}
