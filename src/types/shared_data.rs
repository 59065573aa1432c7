//! Operator-visible key→value store shared across stages and launches.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key→value store scoped to one script, writable from any stage body.
///
/// Values are JSON so the checkpoint round-trips every shape the map may hold,
/// including nested structures. The map is snapshotted into the checkpoint
/// after each successful stage and re-hydrated at the start of a resumed
/// launch, before any stage executes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedData {
  values: BTreeMap<String, Value>,
}

impl SharedData {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.values.get(key)
  }

  /// Sets `key` to any JSON-convertible value, replacing a prior entry.
  pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
    self.values.insert(key.into(), value.into());
  }

  pub fn remove(&mut self, key: &str) -> Option<Value> {
    self.values.remove(key)
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  /// Entries in key order.
  pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
    self.values.iter()
  }
}
