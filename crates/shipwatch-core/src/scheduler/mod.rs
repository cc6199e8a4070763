pub mod cadence;
pub mod runner;
pub mod snapshot;

pub use cadence::{Cadence, CadenceController};
pub use runner::{Presenter, Scheduler, SchedulerHandle, TICK_INTERVAL, run_cycle};
pub use snapshot::{FetchOutcome, Snapshot};
