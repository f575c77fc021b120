pub mod queue;

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::{
    core::state::{Job, JobKey},
    error::SchedError,
};
pub use queue::OrderedQueue;

/// Scheduling discipline, selected once at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Policy {
    Fcfs,
    Sjf,
    Psjf,
    Pri,
    Ppri,
    Rr,
}

impl Policy {
    pub const ALL: [Policy; 6] = [
        Policy::Fcfs,
        Policy::Sjf,
        Policy::Psjf,
        Policy::Pri,
        Policy::Ppri,
        Policy::Rr,
    ];

    /// Ranks `candidate` against `incumbent`.
    ///
    /// `Less` means the candidate must run before the incumbent. `Equal` is a
    /// tie, which every caller resolves by placing the candidate after the
    /// incumbent.
    pub fn compare(self, candidate: &Job, incumbent: &Job) -> Ordering {
        match self {
            Policy::Fcfs => candidate.arrival_time.cmp(&incumbent.arrival_time),
            Policy::Sjf => candidate.burst_time.cmp(&incumbent.burst_time),
            Policy::Psjf => candidate
                .remaining_burst_time
                .cmp(&incumbent.remaining_burst_time),
            Policy::Pri | Policy::Ppri => candidate.priority.cmp(&incumbent.priority),
            // Arrival order for fresh jobs, requeue order after a quantum.
            Policy::Rr => candidate.ready_since.cmp(&incumbent.ready_since),
        }
    }

    /// Whether an arrival may displace a running job.
    pub fn is_preemptive(self) -> bool {
        matches!(self, Policy::Psjf | Policy::Ppri)
    }

    pub fn is_round_robin(self) -> bool {
        self == Policy::Rr
    }

    pub fn name(self) -> &'static str {
        match self {
            Policy::Fcfs => "FCFS",
            Policy::Sjf => "SJF",
            Policy::Psjf => "PSJF",
            Policy::Pri => "PRI",
            Policy::Ppri => "PPRI",
            Policy::Rr => "RR",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|policy| policy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SchedError::UnknownPolicy(s.to_string()))
    }
}

/// Ordering used by [`OrderedQueue`] to place a new element.
pub trait Ranking<K> {
    fn rank(&self, candidate: &K, incumbent: &K) -> Ordering;
}

impl<K, F> Ranking<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    fn rank(&self, candidate: &K, incumbent: &K) -> Ordering {
        self(candidate, incumbent)
    }
}

/// Applies a [`Policy`] to job handles by resolving them in the job arena.
pub struct PolicyRanking<'a> {
    pub policy: Policy,
    pub jobs: &'a SlotMap<JobKey, Job>,
}

impl Ranking<JobKey> for PolicyRanking<'_> {
    fn rank(&self, candidate: &JobKey, incumbent: &JobKey) -> Ordering {
        self.policy
            .compare(&self.jobs[*candidate], &self.jobs[*incumbent])
    }
}
