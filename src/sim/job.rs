use crate::core::state::Ticks;

pub use crate::core::state::JobId;

/// One job of a workload, as handed to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub id: JobId,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub priority: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub spec: JobSpec,
    pub start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
}

impl JobRecord {
    pub fn turnaround_time(&self) -> Option<Ticks> {
        Some(self.completion_time? - self.spec.arrival_time)
    }

    pub fn waiting_time(&self) -> Option<Ticks> {
        Some(self.turnaround_time()? - self.spec.burst_time)
    }

    pub fn response_time(&self) -> Option<Ticks> {
        Some(self.start_time? - self.spec.arrival_time)
    }
}
