//! ms-dispatch: incremental submission of cases to a batch queue.
//!
//! The dispatcher is meant to be invoked repeatedly (e.g. from cron). Each
//! call asks the scheduler how many jobs are queued, fills the remaining
//! quota with the next cases after the persisted watermark, and returns the
//! new watermark for the caller to persist.

pub mod dispatcher;
pub mod error;
pub mod mock;
pub mod scheduler;
pub mod watermark;

pub use dispatcher::{
    DispatchOutcome, DispatchPlan, LaunchSpec, ResubmitOutcome, dispatch_next_batch, resubmit,
    submit_case,
};
pub use error::{DispatchError, DispatchResult};
pub use mock::MockScheduler;
pub use scheduler::{BatchScheduler, JobId, SchedulerError, SlurmScheduler};
pub use watermark::{DispatchState, WatermarkStore};
