pub use crate::config::SimConfig;
pub use crate::core::{EngineSnapshot, Job, JobId, SchedEvent, SchedulerEngine, Ticks};
pub use crate::error::{Result, SchedError};
pub use crate::scheduler::{OrderedQueue, Policy, Ranking};
pub use crate::sim::{JobRecord, JobSpec, Sim, SimReport};
