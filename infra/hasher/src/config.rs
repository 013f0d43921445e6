use crate::encoding::bytes_as_base64;
use crate::error::HasherError;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Length of generated secrets and salts, in bytes.
pub const GENERATED_KEY_LEN: usize = 32;

/// Shortest accepted salt. Argon2 refuses anything below eight bytes, and the same floor is
/// applied to every variant so that a configuration stays valid when its tag changes.
pub const MIN_SALT_LEN: usize = 8;

/// Serializable configuration of a hasher.
///
/// Byte fields are encoded as unpadded Base64 strings:
///
/// ```json
/// { "variant": "hkdf-sha256", "secret": "…", "salt": "…" }
/// ```
///
/// The structure is wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(deny_unknown_fields)]
pub struct HasherConfig {
    pub variant: String,
    #[serde(with = "bytes_as_base64")]
    pub secret: Vec<u8>,
    #[serde(with = "bytes_as_base64")]
    pub salt: Vec<u8>,
}

impl HasherConfig {
    #[must_use]
    pub fn new(variant: impl Into<String>, secret: impl Into<Vec<u8>>, salt: impl Into<Vec<u8>>) -> Self {
        Self { variant: variant.into(), secret: secret.into(), salt: salt.into() }
    }
}

impl fmt::Debug for HasherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HasherConfig")
            .field("variant", &self.variant)
            .field("secret", &"<redacted>")
            .field("salt", &"<redacted>")
            .finish()
    }
}

/// Validated secret and salt owned by a concrete hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    secret: Zeroizing<Vec<u8>>,
    salt: Zeroizing<Vec<u8>>,
}

impl KeyMaterial {
    /// Wraps caller-supplied key material.
    ///
    /// # Errors
    /// Returns [`HasherError::InvalidConfiguration`] if the secret is empty or the salt is
    /// shorter than [`MIN_SALT_LEN`].
    pub fn new(secret: impl Into<Vec<u8>>, salt: impl Into<Vec<u8>>) -> Result<Self, HasherError> {
        let secret = Zeroizing::new(secret.into());
        let salt = Zeroizing::new(salt.into());

        if secret.is_empty() {
            return Err(HasherError::InvalidConfiguration {
                message: "Secret cannot be empty".into(),
                context: None,
            });
        }
        if salt.len() < MIN_SALT_LEN {
            return Err(HasherError::InvalidConfiguration {
                message: format!("Salt must be at least {MIN_SALT_LEN} bytes, got {}", salt.len())
                    .into(),
                context: None,
            });
        }

        Ok(Self { secret, salt })
    }

    /// Generates a fresh random secret and salt from the system CSPRNG.
    ///
    /// # Errors
    /// Returns [`HasherError::Entropy`] if the operating system RNG is unavailable.
    pub fn generate() -> Result<Self, HasherError> {
        Ok(Self { secret: random_bytes(GENERATED_KEY_LEN)?, salt: random_bytes(GENERATED_KEY_LEN)? })
    }

    /// Uses the supplied halves where present and random bytes for the rest.
    ///
    /// # Errors
    /// See [`KeyMaterial::new`] and [`KeyMaterial::generate`].
    pub fn from_parts(secret: Option<&[u8]>, salt: Option<&[u8]>) -> Result<Self, HasherError> {
        let secret = match secret {
            Some(secret) => Zeroizing::new(secret.to_vec()),
            None => random_bytes(GENERATED_KEY_LEN)?,
        };
        let salt = match salt {
            Some(salt) => Zeroizing::new(salt.to_vec()),
            None => random_bytes(GENERATED_KEY_LEN)?,
        };
        Self::new(secret.to_vec(), salt.to_vec())
    }

    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    #[must_use]
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Produces the serializable configuration for the given variant tag.
    #[must_use]
    pub fn to_config(&self, variant: &str) -> HasherConfig {
        HasherConfig::new(variant, self.secret.to_vec(), self.salt.to_vec())
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("secret_len", &self.secret.len())
            .field("salt_len", &self.salt.len())
            .finish()
    }
}

fn random_bytes(len: usize) -> Result<Zeroizing<Vec<u8>>, HasherError> {
    let mut bytes = Zeroizing::new(vec![0u8; len]);
    getrandom::fill(&mut bytes).map_err(|e| HasherError::Entropy {
        message: e.to_string().into(),
        context: Some("Failed to generate hasher key material".into()),
    })?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_material_is_random() {
        let a = KeyMaterial::generate().unwrap();
        let b = KeyMaterial::generate().unwrap();

        assert_eq!(a.secret().len(), GENERATED_KEY_LEN);
        assert_eq!(a.salt().len(), GENERATED_KEY_LEN);
        assert_ne!(a.secret(), b.secret());
        assert_ne!(a.salt(), b.salt());
    }

    #[test]
    fn test_short_salt_is_rejected() {
        let result = KeyMaterial::new(b"secret".to_vec(), b"short".to_vec());
        assert!(matches!(result, Err(HasherError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let result = KeyMaterial::new(Vec::new(), b"long-enough-salt".to_vec());
        assert!(matches!(result, Err(HasherError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_partial_parts_keep_supplied_half() {
        let keys = KeyMaterial::from_parts(Some(b"fixed-secret".as_slice()), None).unwrap();
        assert_eq!(keys.secret(), b"fixed-secret");
        assert_eq!(keys.salt().len(), GENERATED_KEY_LEN);
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let config = HasherConfig::new("hkdf-sha256", b"top-secret".to_vec(), b"salt-salt".to_vec());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("hkdf-sha256"));
    }

    #[test]
    fn test_config_json_uses_base64() {
        let config = HasherConfig::new("hkdf-sha256", vec![0xff; 3], vec![0u8; 8]);
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["variant"], "hkdf-sha256");
        assert_eq!(json["secret"], "////");
        assert_eq!(json["salt"], "AAAAAAAAAAA");

        let back: HasherConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
