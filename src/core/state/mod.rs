//! Run state and checkpoint persistence

pub mod checkpoint;
pub mod run_state;

pub use checkpoint::{write_records, Checkpoint, CheckpointStore};
pub use run_state::RunState;
