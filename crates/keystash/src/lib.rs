//! Facade crate for the `keystash` secret store.
//! Re-exports the hasher and credential crates under one name.
//! Keep this crate thin: it should compose other crates, not implement logic.
//!
//! ## Usage
//! ```rust
//! use keystash::prelude::*;
//!
//! # fn main() -> Result<(), CredentialError> {
//! let mut stash = CredentialCollection::create(None)?;
//! stash.add(&["smtp", "password"], AddOptions::new().length(24))?;
//! stash.add(&["api_token"], AddOptions::new().value("issued-by-vendor"))?;
//!
//! assert_eq!(stash.get(&["smtp", "password"])?.len(), 24);
//! assert!(stash.credential(&["api_token"]).is_some_and(Credential::is_frozen));
//! # Ok(())
//! # }
//! ```

pub use keystash_credentials as credentials;
pub use keystash_hasher as hasher;

/// Hasher variants compiled into this build.
pub mod variants {
    pub use keystash_hasher::DEFAULT_VARIANT;
    pub use keystash_hasher::registry::{is_known, variants as all};
}

pub mod prelude {
    pub use keystash_credentials::load_defaults;
    pub use keystash_credentials::prelude::*;
    pub use keystash_hasher::prelude::{Hasher, HasherConfig, HasherError};
}
