//! Persisted layout of a collection.
//!
//! ```json
//! {
//!   "hasher": { "variant": "hkdf-sha256", "secret": "…", "salt": "…" },
//!   "credentials": {
//!     "token": { "length": 32, "version": 3, "frozen": false, "value": null },
//!     "db": {
//!       "pwd": { "length": 15, "version": 1, "frozen": false, "value": null }
//!     }
//!   },
//!   "schema_version": 1
//! }
//! ```
//!
//! A flat entry and a group are told apart by their fields: a record has exactly
//! `length`, `version`, `frozen` and an optional `value`; anything else is a group.

use crate::credential::CredentialRecord;
use keystash_hasher::HasherConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

const fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Structured form of a whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hasher: Option<HasherConfig>,
    #[serde(default)]
    pub credentials: BTreeMap<String, SnapshotEntry>,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

impl Default for CollectionSnapshot {
    fn default() -> Self {
        Self { hasher: None, credentials: BTreeMap::new(), schema_version: SCHEMA_VERSION }
    }
}

/// One top-level key of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotEntry {
    Flat(CredentialRecord),
    Group(BTreeMap<String, CredentialRecord>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entries_are_told_apart_by_shape() {
        let snapshot: CollectionSnapshot = serde_json::from_value(json!({
            "credentials": {
                "token": { "length": 32, "version": 3, "frozen": false, "value": null },
                "db": { "pwd": { "length": 15, "version": 1, "frozen": false } }
            }
        }))
        .unwrap();

        assert!(snapshot.hasher.is_none());
        assert_eq!(snapshot.schema_version, SCHEMA_VERSION);
        assert!(matches!(snapshot.credentials["token"], SnapshotEntry::Flat(ref r) if r.version == 3));
        assert!(matches!(snapshot.credentials["db"], SnapshotEntry::Group(ref g) if g["pwd"].length == 15));
    }

    #[test]
    fn test_malformed_entry_is_rejected() {
        let result = serde_json::from_value::<CollectionSnapshot>(json!({
            "credentials": { "token": { "length": "long" } }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_hasher_is_not_serialized() {
        let json = serde_json::to_value(CollectionSnapshot::default()).unwrap();
        assert_eq!(json, json!({ "credentials": {}, "schema_version": 1 }));
    }
}
