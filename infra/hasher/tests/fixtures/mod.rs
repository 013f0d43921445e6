use keystash_hasher::prelude::*;

pub const SECRET: &[u8] = b"master-secret-123";
pub const SALT: &[u8] = b"unique-salt";

/// Builds a hasher of the given variant from fixed key material.
/// # Panics
/// * If the variant is not registered.
#[must_use]
pub fn fixed_hasher(variant: &str) -> Box<dyn Hasher> {
    registry::create(variant, Some(SECRET), Some(SALT)).expect("Hasher setup failed")
}
