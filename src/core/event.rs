use super::state::{CoreId, JobId, Ticks};

/// Scheduling decisions taken by the engine, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedEvent {
    Dispatched {
        time: Ticks,
        core: CoreId,
        job: JobId,
    },
    // Victim goes back to the queue, `by` takes its core
    Preempted {
        time: Ticks,
        core: CoreId,
        victim: JobId,
        by: JobId,
    },
    Queued {
        time: Ticks,
        job: JobId,
        position: usize,
    },
    // Quantum expiry put the job back in line
    Requeued {
        time: Ticks,
        job: JobId,
        position: usize,
    },
    Completed {
        time: Ticks,
        core: CoreId,
        job: JobId,
    },
    // Core left idle after completion or expiry
    CoreIdle {
        time: Ticks,
        core: CoreId,
    },
}

impl SchedEvent {
    pub fn time(&self) -> Ticks {
        match *self {
            SchedEvent::Dispatched { time, .. }
            | SchedEvent::Preempted { time, .. }
            | SchedEvent::Queued { time, .. }
            | SchedEvent::Requeued { time, .. }
            | SchedEvent::Completed { time, .. }
            | SchedEvent::CoreIdle { time, .. } => time,
        }
    }
}
