//! Discrete-event CPU scheduling core: an ordered ready queue plus a decision
//! engine placing jobs on cores under FCFS, SJF, PSJF, PRI, PPRI or RR.

pub mod config;
pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

/// Prelude for convenient imports
pub mod prelude;

pub use config::SimConfig;
pub use crate::core::{SchedEvent, SchedulerEngine};
pub use error::{Result, SchedError};
pub use scheduler::{OrderedQueue, Policy};
pub use sim::{JobSpec, Sim};
