//! Tests for `StageIdentity`.

use super::StageIdentity;

#[test]
fn display_is_path_colon_line() {
  let id = StageIdentity::new("deploy.rsg", 12);
  assert_eq!(id.to_string(), "deploy.rsg:12");
}

#[test]
fn identity_roundtrip_serde() {
  let id = StageIdentity::new("/work/build.rsg", 3);
  let json = serde_json::to_string(&id).unwrap();
  let id2: StageIdentity = serde_json::from_str(&json).unwrap();
  assert_eq!(id2, id);
}

#[test]
fn equality_is_path_and_line() {
  let a = StageIdentity::new("a.rsg", 5);
  let b = StageIdentity::new("a.rsg", 5);
  let c = StageIdentity::new("a.rsg", 6);
  assert_eq!(a, b);
  assert_ne!(a, c);
}
