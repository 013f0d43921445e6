//! Argon2id hasher: a deliberately slow, memory-hard variant.
//!
//! The secret is the Argon2 password and the salt is `salt ‖ info`, so each
//! `(context, version)` pair gets its own memory-hard evaluation. Expect tens of
//! milliseconds per call with the default cost parameters.

use crate::config::{HasherConfig, KeyMaterial};
use crate::error::HasherError;
use crate::hasher::{Hasher, derivation_info};
use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

/// Argon2 refuses to produce fewer bytes than this; shorter requests are truncated.
const MIN_OUTPUT_LEN: usize = 4;

#[derive(Debug)]
pub struct Argon2Hasher {
    keys: KeyMaterial,
}

impl Argon2Hasher {
    pub const TAG: &'static str = "argon2id";

    #[must_use]
    pub const fn new(keys: KeyMaterial) -> Self {
        Self { keys }
    }

    fn engine() -> Argon2<'static> {
        // m = 19 MiB, t = 2, p = 1
        Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
    }
}

impl Hasher for Argon2Hasher {
    fn from_keys(keys: KeyMaterial) -> Self {
        Self::new(keys)
    }

    fn variant(&self) -> &'static str {
        Self::TAG
    }

    fn derive(
        &self,
        context: &str,
        version: u64,
        length: usize,
    ) -> Result<Zeroizing<Vec<u8>>, HasherError> {
        let info = derivation_info(context, version);
        let mut salt = Zeroizing::new(Vec::with_capacity(self.keys.salt().len() + info.len()));
        salt.extend_from_slice(self.keys.salt());
        salt.extend_from_slice(&info);

        let mut out = Zeroizing::new(vec![0u8; length.max(MIN_OUTPUT_LEN)]);
        Self::engine().hash_password_into(self.keys.secret(), &salt, &mut out).map_err(|e| {
            HasherError::Derivation { message: e.to_string().into(), context: Some(Self::TAG.into()) }
        })?;

        out.truncate(length);
        Ok(out)
    }

    fn to_config(&self) -> HasherConfig {
        self.keys.to_config(Self::TAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::new(KeyMaterial::new(b"master".to_vec(), b"salt-1234".to_vec()).unwrap())
    }

    #[test]
    fn test_short_outputs_are_truncated_prefixes() {
        let h = hasher();
        let short = h.derive("pin", 0, 2).unwrap();
        let min = h.derive("pin", 0, MIN_OUTPUT_LEN).unwrap();

        assert_eq!(short.len(), 2);
        assert_eq!(&min[..2], short.as_slice());
    }

    #[test]
    fn test_versions_diverge() {
        let h = hasher();
        assert_ne!(h.derive("db/pwd", 0, 16).unwrap(), h.derive("db/pwd", 1, 16).unwrap());
    }
}
