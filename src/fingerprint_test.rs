//! Tests for script fingerprinting.

use crate::fingerprint::{hash_bytes, hash_source};
use proptest::prelude::*;

#[test]
fn known_digest_for_empty_input() {
  // SHA-256 of the empty string.
  assert_eq!(
    hash_bytes(b""),
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
  );
}

#[test]
fn same_file_hashes_identically() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("script.rsg");
  std::fs::write(&path, "stage {\n  work\n}\n").unwrap();
  let a = hash_source(&path).unwrap();
  let b = hash_source(&path).unwrap();
  assert_eq!(a, b);
}

#[test]
fn single_character_change_changes_hash() {
  assert_ne!(hash_bytes(b"stage { a }"), hash_bytes(b"stage { b }"));
}

#[test]
fn line_ending_change_changes_hash() {
  assert_ne!(hash_bytes(b"a\nb\n"), hash_bytes(b"a\r\nb\r\n"));
}

#[test]
fn missing_file_is_an_error() {
  let dir = tempfile::tempdir().unwrap();
  assert!(hash_source(&dir.path().join("absent.rsg")).is_err());
}

proptest! {
  #[test]
  fn hash_is_stable_hex(source in ".*") {
    let a = hash_bytes(source.as_bytes());
    let b = hash_bytes(source.as_bytes());
    prop_assert_eq!(&a, &b);
    prop_assert_eq!(a.len(), 64);
    prop_assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
  }

  #[test]
  fn appending_a_byte_changes_hash(source in ".*", extra in any::<u8>()) {
    let mut changed = source.clone().into_bytes();
    changed.push(extra);
    prop_assert_ne!(hash_bytes(source.as_bytes()), hash_bytes(&changed));
  }
}
