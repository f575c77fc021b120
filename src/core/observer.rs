use std::cmp::Ordering;

use rustc_hash::FxHashSet;

use super::state::{JobKey, SchedState};
use crate::scheduler::{OrderedQueue, Policy};

#[derive(Debug)]
pub struct Observer {
    step: u64,
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, state: &SchedState, queue: &OrderedQueue<JobKey>, policy: Policy) {
        self.step += 1;
        if !cfg!(debug_assertions) {
            return;
        }

        for violation in Self::check(state, queue, policy) {
            debug_assert!(false, "step {}: {violation}", self.step);
        }
    }

    /// Lists every broken invariant. Empty when the model is consistent.
    pub fn check(state: &SchedState, queue: &OrderedQueue<JobKey>, policy: Policy) -> Vec<String> {
        let mut violations = Vec::new();
        let mut placed = FxHashSet::default();

        for (core, slot) in state.cores.iter().enumerate() {
            let Some(key) = slot.current else { continue };
            match state.jobs.get(key) {
                Some(job) => {
                    if !job.ever_run || job.start_time.is_none() {
                        violations.push(format!("job {} on core {core} never marked started", job.id));
                    }
                }
                None => violations.push(format!("core {core} holds a released job")),
            }
            if !placed.insert(key) {
                violations.push(format!("core {core} holds a job already running elsewhere"));
            }
        }

        for key in queue.iter() {
            if !state.jobs.contains_key(*key) {
                violations.push("queue holds a released job".to_string());
                continue;
            }
            let job = &state.jobs[*key];
            if !placed.insert(*key) {
                violations.push(format!("job {} is both queued and placed elsewhere", job.id));
            }
            // A job with nothing left to run should have completed instead
            if job.remaining_burst_time == 0 {
                violations.push(format!("job {} queued with no remaining burst", job.id));
            }
        }

        for (key, job) in &state.jobs {
            if !placed.contains(&key) {
                violations.push(format!("job {} is neither queued nor running", job.id));
            }
            if state.by_id.get(&job.id) != Some(&key) {
                violations.push(format!("job {} missing from id index", job.id));
            }
        }

        let live = queue.len() + state.occupied_cores();
        if live as u64 != state.arrived - state.completed {
            violations.push(format!(
                "{live} live jobs but {} arrived and {} completed",
                state.arrived, state.completed
            ));
        }

        let keys: Vec<_> = queue.iter().filter(|key| state.jobs.contains_key(**key)).collect();
        for pair in keys.windows(2) {
            let (ahead, behind) = (state.job(*pair[0]), state.job(*pair[1]));
            if policy.compare(behind, ahead) == Ordering::Less {
                violations.push(format!(
                    "queue out of order: job {} ranks before job {}",
                    behind.id, ahead.id
                ));
            }
        }

        violations
    }
}
