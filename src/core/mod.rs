//! Core collection logic.
//!
//! # Modules
//!
//! - [`collect`] - Day collection with retries, and the run controller
//! - [`state`] - The run accumulator and its checkpoint file
//!
//! # Collection Workflow
//!
//! 1. **Load State**: Read the checkpoint, if any, into a [`state::RunState`]
//! 2. **Pick First Day**: Resume after the last checkpointed day, or restart
//! 3. **Collect**: Page through each day until a short page
//! 4. **Checkpoint**: Rewrite the checkpoint after every day that added records
//! 5. **Output**: Write every record as a single JSON array
//!
//! # Example
//!
//! ```rust,no_run
//! use comunica::config::load_config;
//! use comunica::core::collect::RunController;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("comunica.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let controller = RunController::from_config(&config, shutdown_rx)?;
//! let summary = controller.run().await;
//!
//! println!("Total: {}", summary.total_records);
//! # Ok(())
//! # }
//! ```

pub mod collect;
pub mod state;
