//! Collection loop
//!
//! - [`DayCollector`] pages through one day with bounded retries
//! - [`RunController`] walks the date range, checkpoints and writes the output
//! - [`RunSummary`] reports what happened

pub mod controller;
pub mod day;
pub mod summary;

pub use controller::{RunController, RunPlan};
pub use day::{DayCollector, DayOutcome, DayResult, RetryPolicy};
pub use summary::RunSummary;

use tokio::sync::watch;

/// Resolves once the shutdown flag is set
///
/// If every sender is gone the flag can no longer change, so this never
/// resolves.
pub(crate) async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
