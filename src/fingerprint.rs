//! Script fingerprinting: SHA-256 over the exact bytes of the source file.

use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::instrument;

/// Hashes raw source bytes to a lowercase hex digest.
///
/// Byte-exact: any content change, including whitespace or line-ending
/// changes, yields a different fingerprint.
pub fn hash_bytes(source: &[u8]) -> String {
  let digest = Sha256::digest(source);
  digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Reads the full file and returns its fingerprint.
#[instrument(level = "trace", skip(path))]
pub fn hash_source(path: &Path) -> Result<String, std::io::Error> {
  let bytes = std::fs::read(path)?;
  Ok(hash_bytes(&bytes))
}
