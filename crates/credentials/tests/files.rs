pub mod fixtures;

use fixtures::*;
use keystash_credentials::prelude::*;
use keystash_credentials::load_defaults;
use std::io::Write;

#[test]
fn add_from_file_stores_contents_frozen() {
    let mut collection =
        fixed_collection().with_source(MemorySource::default().with_file("/run/secrets/db", b"s3cr3t\n"));

    let credential = collection
        .add_from_file("/run/secrets/db", &["db", "pwd"], AddOptions::new().frozen(false))
        .unwrap();
    assert!(credential.is_frozen(), "file-sourced credentials are always frozen");
    assert!(credential.is_explicit());

    assert_eq!(collection.get(&["db", "pwd"]).unwrap().as_slice(), b"s3cr3t\n");

    collection.rotate_hasher().unwrap();
    assert_eq!(collection.get(&["db", "pwd"]).unwrap().as_slice(), b"s3cr3t\n");
    assert_eq!(collection.credential(&["db", "pwd"]).unwrap().version(), 0);
}

#[test]
fn unreadable_file_leaves_collection_unmodified() {
    let mut collection = fixed_collection().with_source(MemorySource::default());
    collection.add(&["token"], AddOptions::new()).unwrap();
    let before = collection.to_value().unwrap();

    let err = collection.add_from_file("/unreadable", &["db", "pwd"], AddOptions::new()).unwrap_err();
    assert!(matches!(
        err,
        CredentialError::FileNotReadable { ref path, .. } if path.as_os_str() == "/unreadable"
    ));
    assert!(err.to_string().contains("/unreadable"));

    assert_eq!(collection.to_value().unwrap(), before);
    assert!(collection.group("db").is_none());
}

#[test]
fn add_from_file_respects_existing_entry_without_force() {
    let source = MemorySource::default().with_file("/a", b"first").with_file("/b", b"second");
    let mut collection = fixed_collection().with_source(source);

    collection.add_from_file("/a", &["api"], AddOptions::new()).unwrap();
    collection.add_from_file("/b", &["api"], AddOptions::new()).unwrap();
    assert_eq!(collection.get(&["api"]).unwrap().as_slice(), b"first");

    collection.add_from_file("/b", &["api"], AddOptions::new().force(true)).unwrap();
    assert_eq!(collection.get(&["api"]).unwrap().as_slice(), b"second");
}

#[test]
fn add_from_file_checks_shape_before_reading() {
    let mut collection = fixed_collection().with_source(MemorySource::default());
    collection.add(&["db"], AddOptions::new()).unwrap();

    assert!(matches!(
        collection.add_from_file("/missing", &["db", "pwd"], AddOptions::new()),
        Err(CredentialError::ShapeConflict { .. })
    ));
}

#[test]
fn add_from_real_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"-----BEGIN KEY-----").unwrap();

    let mut collection = fixed_collection();
    collection.add_from_file(file.path(), &["tls", "key"], AddOptions::new()).unwrap();

    assert_eq!(collection.get(&["tls", "key"]).unwrap().as_slice(), b"-----BEGIN KEY-----");
}

#[test]
fn defaults_file_drives_collection_creation() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "default_length = 24\nhasher = \"hkdf-sha512\"").unwrap();

    let defaults = load_defaults(Some(file.path())).unwrap();
    let mut collection = CredentialCollection::create(Some(defaults)).unwrap();

    assert_eq!(collection.hasher().variant(), "hkdf-sha512");
    collection.add(&["token"], AddOptions::new()).unwrap();
    assert_eq!(collection.get(&["token"]).unwrap().len(), 24);
}
