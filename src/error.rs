use thiserror::Error;

use crate::core::{CoreId, JobId, Ticks};

/// Caller-contract violations rejected by the engine and the driver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedError {
    #[error("scheduler requires at least one core")]
    NoCores,

    #[error("job {0} has a zero burst time")]
    ZeroBurst(JobId),

    #[error("job {0} is already known to the scheduler")]
    DuplicateJob(JobId),

    #[error("event at t={time} precedes current time t={now}")]
    TimeWentBackwards { now: Ticks, time: Ticks },

    #[error("job {job} arrives at t={time}, not after the previous arrival at t={last}")]
    ArrivalNotIncreasing { job: JobId, time: Ticks, last: Ticks },

    #[error("core {core} out of range (cores: {cores})")]
    CoreOutOfRange { core: CoreId, cores: usize },

    #[error("job {job} is not running on core {core}")]
    JobNotOnCore { core: CoreId, job: JobId },

    #[error("quantum expiry delivered under a non round-robin policy")]
    QuantumWithoutRoundRobin,

    #[error("round-robin requires a non-zero quantum")]
    ZeroQuantum,

    #[error("no job has completed yet")]
    NoCompletedJobs,

    #[error("unknown scheduling policy: {0}")]
    UnknownPolicy(String),
}

pub type Result<T> = std::result::Result<T, SchedError>;
