//! # Hasher Errors
//!
//! This module defines the [`HasherError`] enum used throughout the hasher crate for
//! reporting registry, configuration, entropy and derivation failures.

use std::borrow::Cow;

/// A specialized [`HasherError`] enum for derivation-related failures.
#[keystash_derive::keystash_error]
pub enum HasherError {
    /// The requested variant tag is not part of the build-time registry.
    #[error("Unknown hasher variant '{variant}'{}", format_context(.context))]
    UnknownHasherVariant { variant: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Key material or a serialized configuration was rejected.
    #[error("Invalid hasher configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The operating system RNG could not produce key material.
    #[error("Entropy source failure{}: {message}", format_context(.context))]
    Entropy { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The underlying one-way function refused its inputs.
    ///
    /// With validated key material this only happens for absurd output lengths.
    #[error("Derivation error{}: {message}", format_context(.context))]
    Derivation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal hasher error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
