//! Build-time registry of hasher variants.
//!
//! Adding a variant means implementing [`Hasher`] and appending one line to [`REGISTRY`];
//! nothing that resolves hashers by tag needs to change.

use crate::argon2id::Argon2Hasher;
use crate::config::{HasherConfig, KeyMaterial};
use crate::error::HasherError;
use crate::hasher::Hasher;
use crate::hkdf_sha2::{HkdfDigest, HkdfSha256, HkdfSha512};
use sha2::{Sha256, Sha512};
use std::fmt;

/// Tag used when none is configured.
pub const DEFAULT_VARIANT: &str = <Sha256 as HkdfDigest>::TAG;

/// Maps a variant tag to its constructor.
pub struct HasherEntry {
    pub tag: &'static str,
    construct: fn(KeyMaterial) -> Box<dyn Hasher>,
}

impl fmt::Debug for HasherEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HasherEntry").field("tag", &self.tag).finish_non_exhaustive()
    }
}

fn boxed<H: Hasher + 'static>(keys: KeyMaterial) -> Box<dyn Hasher> {
    Box::new(H::from_keys(keys))
}

/// Every hasher variant known to this build.
pub const REGISTRY: &[HasherEntry] = &[
    HasherEntry { tag: <Sha256 as HkdfDigest>::TAG, construct: boxed::<HkdfSha256> },
    HasherEntry { tag: <Sha512 as HkdfDigest>::TAG, construct: boxed::<HkdfSha512> },
    HasherEntry { tag: Argon2Hasher::TAG, construct: boxed::<Argon2Hasher> },
];

/// Looks up a registry entry by exact tag.
///
/// # Errors
/// Returns [`HasherError::UnknownHasherVariant`] if the tag is not registered.
pub fn lookup(variant: &str) -> Result<&'static HasherEntry, HasherError> {
    REGISTRY.iter().find(|entry| entry.tag == variant).ok_or_else(|| {
        HasherError::UnknownHasherVariant { variant: variant.to_owned().into(), context: None }
    })
}

/// Returns `true` if `variant` names a registered hasher.
#[must_use]
pub fn is_known(variant: &str) -> bool {
    REGISTRY.iter().any(|entry| entry.tag == variant)
}

/// Iterates over all registered tags in registration order.
pub fn variants() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|entry| entry.tag)
}

/// Creates a hasher of the given variant.
///
/// Omitted secret or salt halves are filled with 32 random bytes from the system CSPRNG.
///
/// # Errors
/// * [`HasherError::UnknownHasherVariant`] if the tag is not registered.
/// * [`HasherError::InvalidConfiguration`] if supplied key material is rejected.
/// * [`HasherError::Entropy`] if random generation fails.
pub fn create(
    variant: &str,
    secret: Option<&[u8]>,
    salt: Option<&[u8]>,
) -> Result<Box<dyn Hasher>, HasherError> {
    let entry = lookup(variant)?;
    let keys = KeyMaterial::from_parts(secret, salt)?;
    Ok((entry.construct)(keys))
}

/// Creates a hasher with freshly generated key material.
///
/// # Errors
/// See [`create`].
pub fn generate(variant: &str) -> Result<Box<dyn Hasher>, HasherError> {
    create(variant, None, None)
}

/// Rebuilds a hasher from its serialized configuration.
///
/// # Errors
/// * [`HasherError::UnknownHasherVariant`] if the configured tag is not registered.
/// * [`HasherError::InvalidConfiguration`] if the key material is rejected.
pub fn from_config(config: &HasherConfig) -> Result<Box<dyn Hasher>, HasherError> {
    let entry = lookup(&config.variant)?;
    let keys = KeyMaterial::new(config.secret.clone(), config.salt.clone())?;
    Ok((entry.construct)(keys))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_tags_are_unique() {
        let mut tags: Vec<_> = variants().collect();
        let total = tags.len();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), total);
    }

    #[test]
    fn test_default_variant_is_registered() {
        assert!(is_known(DEFAULT_VARIANT));
        assert_eq!(DEFAULT_VARIANT, "hkdf-sha256");
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        let err = create("md5", None, None).unwrap_err();
        assert!(
            matches!(err, HasherError::UnknownHasherVariant { ref variant, .. } if variant == "md5")
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(lookup("HKDF-SHA256").is_err());
    }

    #[test]
    fn test_every_variant_roundtrips_its_config() {
        for tag in variants() {
            let hasher = create(tag, Some(b"secret".as_slice()), Some(b"salt-salt".as_slice()))
                .expect("registered variant should build");
            assert_eq!(hasher.variant(), tag);

            let restored = from_config(&hasher.to_config()).unwrap();
            assert_eq!(
                hasher.derive("ctx", 1, 24).unwrap(),
                restored.derive("ctx", 1, 24).unwrap(),
                "variant {tag} must reproduce its output"
            );
        }
    }
}
