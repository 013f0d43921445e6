use keystash_hasher::HasherError;
use std::borrow::Cow;
use std::path::PathBuf;

/// Error types of the credential store.
///
/// Lookups and creation report failures through this type. Probing operations
/// (`exists`, `credential`, `remove`, `rotate`) return `bool`/`Option` instead.
#[keystash_derive::keystash_error]
pub enum CredentialError {
    /// The terminal key of a path is absent.
    #[error("Credential '{path}' not found{}", format_context(.context))]
    CredentialNotFound { path: String, context: Option<Cow<'static, str>> },

    /// The first segment of a two-segment path does not name a group.
    #[error("Group '{group}' not found{}", format_context(.context))]
    GroupNotFound { group: String, context: Option<Cow<'static, str>> },

    /// A path had neither one nor two segments.
    #[error("Expected 1 or 2 path segments, got {segments}{}", format_context(.context))]
    InvalidPathArity { segments: usize, context: Option<Cow<'static, str>> },

    /// A path segment contains the group separator and would share a derivation context
    /// with a grouped credential.
    #[error("Path segment '{segment}' must not contain '/'{}", format_context(.context))]
    InvalidPathSegment { segment: String, context: Option<Cow<'static, str>> },

    /// The top-level key already holds the other shape (flat vs group).
    #[error("Key '{key}' already holds a {existing} entry{}", format_context(.context))]
    ShapeConflict { key: String, existing: &'static str, context: Option<Cow<'static, str>> },

    /// A derived credential would have no bytes.
    #[error("Credential length must be positive, got {length}{}", format_context(.context))]
    InvalidLength { length: usize, context: Option<Cow<'static, str>> },

    /// The secret source could not read a file.
    #[error("File '{}' is not readable{}: {source}", .path.display(), format_context(.context))]
    FileNotReadable { path: PathBuf, source: std::io::Error, context: Option<Cow<'static, str>> },

    /// Hasher construction or derivation failed.
    #[error("Hasher error{}: {source}", format_context(.context))]
    Hasher { source: HasherError, context: Option<Cow<'static, str>> },

    /// Snapshot JSON could not be produced or parsed.
    #[error("Serialization error{}: {source}", format_context(.context))]
    Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Collection defaults could not be loaded.
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    /// Invalid collection defaults.
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal credential error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
