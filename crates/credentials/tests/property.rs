pub mod fixtures;

use fixtures::fixed_collection;
use keystash_credentials::prelude::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add {
        group: Option<String>,
        name: String,
        length: usize,
        frozen: Option<bool>,
        value: Option<Vec<u8>>,
        force: bool,
    },
    Remove { group: Option<String>, name: String },
    Rotate { group: Option<String>, name: String },
    RotateAll,
    RotateHasher,
}

fn key() -> impl Strategy<Value = String> {
    "[a-d]{1,2}"
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (
            proptest::option::of(key()),
            key(),
            1usize..96,
            proptest::option::of(any::<bool>()),
            proptest::option::of(proptest::collection::vec(any::<u8>(), 0..24)),
            any::<bool>(),
        )
            .prop_map(|(group, name, length, frozen, value, force)| Op::Add {
                group,
                name,
                length,
                frozen,
                value,
                force,
            }),
        (proptest::option::of(key()), key()).prop_map(|(group, name)| Op::Remove { group, name }),
        (proptest::option::of(key()), key()).prop_map(|(group, name)| Op::Rotate { group, name }),
        Just(Op::RotateAll),
        Just(Op::RotateHasher),
    ]
}

fn segments<'a>(group: Option<&'a str>, name: &'a str) -> Vec<&'a str> {
    group.into_iter().chain([name]).collect()
}

fn build(ops: &[Op]) -> CredentialCollection {
    let mut collection = fixed_collection();
    for op in ops {
        match op {
            Op::Add { group, name, length, frozen, value, force } => {
                let mut options = AddOptions::new().length(*length).force(*force);
                if let Some(frozen) = frozen {
                    options = options.frozen(*frozen);
                }
                if let Some(value) = value {
                    options = options.value(value.clone());
                }
                // Shape conflicts are expected for random keys.
                let _ = collection.add(&segments(group.as_deref(), name), options);
            }
            Op::Remove { group, name } => {
                collection.remove(&segments(group.as_deref(), name));
            }
            Op::Rotate { group, name } => {
                collection.rotate(&segments(group.as_deref(), name));
            }
            Op::RotateAll => {
                collection.rotate_credentials();
            }
            Op::RotateHasher => {
                collection.rotate_hasher().unwrap();
            }
        }
    }
    collection
}

proptest! {
    #[test]
    fn snapshot_roundtrip_reproduces_every_value(ops in proptest::collection::vec(op(), 0..24)) {
        let collection = build(&ops);
        let restored = CredentialCollection::from_value(collection.to_value().unwrap()).unwrap();

        // Empty groups left behind by removals survive the round trip too.
        prop_assert_eq!(restored.to_snapshot(), collection.to_snapshot());
        prop_assert_eq!(restored.len(), collection.len());
        for credential in collection.iter() {
            let path = segments(credential.group(), credential.name());
            let copy = restored.credential(&path).expect("restored credential");

            prop_assert_eq!(copy.length(), credential.length());
            prop_assert_eq!(copy.version(), credential.version());
            prop_assert_eq!(copy.is_frozen(), credential.is_frozen());
            prop_assert_eq!(restored.get(&path).unwrap(), collection.get(&path).unwrap());
        }
    }

    #[test]
    fn frozen_values_survive_hasher_rotation(ops in proptest::collection::vec(op(), 0..24)) {
        let mut collection = build(&ops);
        let frozen: Vec<_> = collection
            .iter()
            .filter(|credential| credential.is_frozen())
            .map(|credential| {
                let path: Vec<String> =
                    segments(credential.group(), credential.name()).into_iter().map(str::to_owned).collect();
                (path, credential.version())
            })
            .collect();
        let before: Vec<_> = frozen.iter().map(|(path, _)| collection.get(path).unwrap()).collect();

        collection.rotate_hasher().unwrap();

        for ((path, version), value) in frozen.iter().zip(before) {
            prop_assert_eq!(collection.get(path).unwrap(), value);
            prop_assert_eq!(collection.credential(path).unwrap().version(), *version);
        }
    }

    #[test]
    fn derived_values_have_exact_length(length in 1usize..512, name in key()) {
        let mut collection = fixed_collection();
        collection.add(&[name.as_str()], AddOptions::new().length(length)).unwrap();
        prop_assert_eq!(collection.get(&[name.as_str()]).unwrap().len(), length);
    }
}
