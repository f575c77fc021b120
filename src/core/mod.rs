pub mod engine;
pub mod event;
pub mod observer;
pub mod state;
pub mod stats;

pub use engine::{EngineSnapshot, SchedulerEngine};
pub use event::SchedEvent;
pub use state::{CoreId, CoreSlot, Job, JobId, JobKey, SchedState, Ticks};
pub use stats::Statistics;
