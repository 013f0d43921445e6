pub mod fixtures;

use fixtures::fixed_hasher;
use keystash_hasher::DEFAULT_VARIANT;
use proptest::prelude::*;

proptest! {
    #[test]
    fn output_length_matches_request(context in ".{0,64}", version in any::<u64>(), length in 0usize..20_000) {
        let hasher = fixed_hasher(DEFAULT_VARIANT);
        let out = hasher.derive(&context, version, length).unwrap();
        prop_assert_eq!(out.len(), length);
    }

    #[test]
    fn versions_never_collide(context in "[a-z/]{1,32}", version in 0u64..u64::MAX) {
        let hasher = fixed_hasher("hkdf-sha512");
        let current = hasher.derive(&context, version, 32).unwrap();
        let next = hasher.derive(&context, version + 1, 32).unwrap();
        prop_assert_ne!(current, next);
    }
}
