use crate::error::CredentialError;
use std::fmt;

/// Separator between group and name in the composite derivation context.
pub const GROUP_SEPARATOR: char = '/';

/// Address of a credential: either a flat top-level name or a name inside a group.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialPath<'a> {
    Flat(&'a str),
    Grouped { group: &'a str, name: &'a str },
}

impl<'a> CredentialPath<'a> {
    #[must_use]
    pub const fn flat(name: &'a str) -> Self {
        Self::Flat(name)
    }

    #[must_use]
    pub const fn grouped(group: &'a str, name: &'a str) -> Self {
        Self::Grouped { group, name }
    }

    /// Interprets a list of path segments.
    ///
    /// # Errors
    /// * [`CredentialError::InvalidPathArity`] unless there are exactly one or two segments.
    /// * [`CredentialError::InvalidPathSegment`] if a segment contains [`GROUP_SEPARATOR`].
    pub fn parse<S: AsRef<str>>(segments: &'a [S]) -> Result<Self, CredentialError> {
        let path = match segments {
            [name] => Self::Flat(name.as_ref()),
            [group, name] => Self::Grouped { group: group.as_ref(), name: name.as_ref() },
            _ => {
                return Err(CredentialError::InvalidPathArity {
                    segments: segments.len(),
                    context: None,
                });
            }
        };

        if let Some(group) = path.group() {
            validate_segment(group)?;
        }
        validate_segment(path.name())?;
        Ok(path)
    }

    /// The top-level namespace key this path lives under.
    #[must_use]
    pub const fn key(&self) -> &'a str {
        match self {
            Self::Flat(name) => name,
            Self::Grouped { group, .. } => group,
        }
    }

    /// The credential's own name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        match self {
            Self::Flat(name) | Self::Grouped { name, .. } => name,
        }
    }

    #[must_use]
    pub const fn group(&self) -> Option<&'a str> {
        match self {
            Self::Flat(_) => None,
            Self::Grouped { group, .. } => Some(group),
        }
    }
}

impl fmt::Display for CredentialPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat(name) => f.write_str(name),
            Self::Grouped { group, name } => write!(f, "{group}{GROUP_SEPARATOR}{name}"),
        }
    }
}

/// Rejects segments that would make two distinct paths share one composite key.
///
/// # Errors
/// Returns [`CredentialError::InvalidPathSegment`] if `segment` contains [`GROUP_SEPARATOR`].
pub fn validate_segment(segment: &str) -> Result<(), CredentialError> {
    if segment.contains(GROUP_SEPARATOR) {
        return Err(CredentialError::InvalidPathSegment { segment: segment.to_owned(), context: None });
    }
    Ok(())
}

/// Builds the derivation context for a credential: `group/name` or `name`.
#[must_use]
pub fn composite_key(group: Option<&str>, name: &str) -> String {
    group.map_or_else(|| name.to_owned(), |group| format!("{group}{GROUP_SEPARATOR}{name}"))
}
