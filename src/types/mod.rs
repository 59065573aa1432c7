//! Core data model for the checkpoint/resume engine.
//!
//! One type per file: stage identity, the persisted checkpoint record, the
//! cross-stage shared data store, and the scanner's non-resumable block.

mod block;
#[cfg(test)]
mod block_test;
mod checkpoint;
mod shared_data;
mod stage_identity;
#[cfg(test)]
mod stage_identity_test;

pub use block::{NonResumableBlock, RemediationAction};
pub use checkpoint::CheckpointRecord;
pub use shared_data::SharedData;
pub use stage_identity::StageIdentity;
