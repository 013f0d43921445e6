#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the keystash crates.
//!
//! ## Usage
//! Depend on the crate from any workspace member that declares its own error enum:
//! ```toml
//! [dependencies]
//! keystash-derive.workspace = true
//! thiserror.workspace = true
//! ```
//!
//! The examples below are `ignore`d to avoid compiling in this crate.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining the error enum of a keystash crate.
///
/// Turns a plain enum into an error type wired into the rest of the workspace.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to `Result<T, Name>` and to `Result<T, Source>` for wrapped upstream errors.
/// * **Standard Conversions**: Implements `From<Source>` for variants whose only fields are a
///   source and a context, so that `?` works on upstream errors.
/// * **Internal Fallback**: Implements `From<&'static str>` and `From<String>` when an
///   `Internal { message, context }` variant exists.
/// * **`format_context` helper**: A module-level function usable from `#[error(...)]`
///   strings that renders ` (context)` or nothing.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Every variant must use named fields.
/// 3. A `context` field must have the type `Option<Cow<'static, str>>`.
/// 4. Variants wrapping an upstream error (a `source` field or a field marked
///    `#[source]`/`#[from]`) must also carry a `context` field.
///
/// Variants that carry extra data next to their source (for example a file path) still get
/// `.context()` support but no `From` impl, since the extra data cannot be invented.
///
/// # Example
///
/// ```rust,ignore
/// use keystash_derive::keystash_error;
/// use std::borrow::Cow;
///
/// #[keystash_error]
/// pub enum StoreError {
///     #[error("Serialization error{}: {source}", format_context(.context))]
///     Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn decode(raw: &str) -> Result<Snapshot, StoreError> {
///     let snapshot = serde_json::from_str(raw).context("Decoding snapshot")?;
///     validate(&snapshot).map_err(|_| "Snapshot failed validation".into())
/// }
/// ```
#[proc_macro_attribute]
pub fn keystash_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
