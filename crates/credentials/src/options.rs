use keystash_hasher::Zeroizing;
use std::fmt;

/// Options for [`CredentialCollection::add`](crate::CredentialCollection::add).
///
/// | Field | Default |
/// |---|---|
/// | `value` | none, the credential is derived |
/// | `length` | the collection's `default_length` |
/// | `frozen` | `true` if `value` is set, `false` otherwise |
/// | `force` | `false`, an existing entry is returned unchanged |
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AddOptions {
    pub value: Option<Zeroizing<Vec<u8>>>,
    pub length: Option<usize>,
    pub frozen: Option<bool>,
    pub force: bool,
}

impl AddOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.value = Some(Zeroizing::new(value.into()));
        self
    }

    #[must_use]
    pub const fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    #[must_use]
    pub const fn frozen(mut self, frozen: bool) -> Self {
        self.frozen = Some(frozen);
        self
    }

    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// The frozen flag a new credential receives.
    #[must_use]
    pub const fn effective_frozen(&self) -> bool {
        match self.frozen {
            Some(frozen) => frozen,
            None => self.value.is_some(),
        }
    }
}

impl fmt::Debug for AddOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddOptions")
            .field("value", &self.value.as_ref().map(|_| "<redacted>"))
            .field("length", &self.length)
            .field("frozen", &self.frozen)
            .field("force", &self.force)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frozen_defaults_follow_value() {
        assert!(!AddOptions::new().effective_frozen());
        assert!(AddOptions::new().value("x").effective_frozen());
        assert!(!AddOptions::new().value("x").frozen(false).effective_frozen());
        assert!(AddOptions::new().frozen(true).effective_frozen());
    }

    #[test]
    fn test_builder_sets_fields() {
        let options = AddOptions::new().length(15).force(true);
        assert_eq!(options.length, Some(15));
        assert!(options.force);
        assert!(options.value.is_none());
    }
}
