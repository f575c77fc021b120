use std::{cmp::Ordering, fmt};

use tracing::{debug, info, trace, warn};

use super::{
    event::SchedEvent,
    observer::Observer,
    state::{CoreId, Job, JobId, JobKey, SchedState, Ticks},
    stats::Statistics,
};
use crate::{
    config::SimConfig,
    error::{Result, SchedError},
    scheduler::{OrderedQueue, Policy, PolicyRanking},
};

/// Decides which job runs on which core, one event at a time.
pub struct SchedulerEngine {
    state: SchedState,
    queue: OrderedQueue<JobKey>,
    policy: Policy,
    stats: Statistics,
    events: Vec<SchedEvent>,
    observer: Observer,
}

/// Per-core residents and queue contents, front to back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub now: Ticks,
    pub cores: Vec<Option<JobId>>,
    pub queue: Vec<JobId>,
}

impl SchedulerEngine {
    pub fn start_up(num_cores: usize, policy: Policy) -> Result<Self> {
        if num_cores == 0 {
            return Err(SchedError::NoCores);
        }
        info!(cores = num_cores, %policy, "scheduler started");
        Ok(Self {
            state: SchedState::new(num_cores),
            queue: OrderedQueue::new(),
            policy,
            stats: Statistics::new(),
            events: Vec::new(),
            observer: Observer::new(),
        })
    }

    pub fn from_config(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        Self::start_up(config.cores, config.policy)
    }

    /// Admits a new job. Returns the core it was placed on, or `None` if it
    /// has to wait in the queue.
    pub fn job_arrived(
        &mut self,
        id: JobId,
        time: Ticks,
        burst_time: Ticks,
        priority: i32,
    ) -> Result<Option<CoreId>> {
        self.state
            .check_arrival(id, time, burst_time)
            .inspect_err(|err| warn!(job = id, time, %err, "arrival rejected"))?;

        self.sync(time);
        let key = self.state.create_job(id, time, burst_time, priority);

        let placed = if let Some(core) = self.state.pick_idle_core() {
            self.dispatch(core, key);
            Some(core)
        } else if let Some(core) = self.preemption_target(key) {
            self.preempt(core, key);
            Some(core)
        } else {
            let position = self.enqueue(key);
            debug!(job = id, time, position, "queued");
            self.events.push(SchedEvent::Queued { time, job: id, position });
            None
        };

        self.observe();
        Ok(placed)
    }

    /// Retires the job running on `core` and returns the job to run there
    /// next, or `None` if the core goes idle.
    pub fn job_finished(&mut self, core: CoreId, id: JobId, time: Ticks) -> Result<Option<JobId>> {
        let key = self
            .running_job(core, id, time)
            .inspect_err(|err| warn!(core, job = id, time, %err, "completion rejected"))?;

        self.sync(time);
        self.state.clear_core(core);
        let job = self.state.release_job(key);
        self.stats.record(&job, time);
        debug!(core, job = id, time, "completed");
        self.events.push(SchedEvent::Completed { time, core, job: id });

        let next = self.dispatch_next(core);
        self.observe();
        Ok(next)
    }

    /// Rotates the job on `core` to the back of the queue and returns the job
    /// to run there next. The same job comes back when nothing else waits.
    pub fn quantum_expired(&mut self, core: CoreId, time: Ticks) -> Result<Option<JobId>> {
        self.check_quantum(core, time)
            .inspect_err(|err| warn!(core, time, %err, "quantum expiry rejected"))?;

        self.sync(time);
        if let Some(key) = self.state.clear_core(core) {
            let position = self.enqueue(key);
            let job = self.state.job(key).id;
            debug!(core, job, time, position, "requeued");
            self.events.push(SchedEvent::Requeued { time, job, position });
        }

        let next = self.dispatch_next(core);
        self.observe();
        Ok(next)
    }

    pub fn average_waiting_time(&self) -> Result<f64> {
        self.stats.average_waiting_time()
    }

    pub fn average_turnaround_time(&self) -> Result<f64> {
        self.stats.average_turnaround_time()
    }

    pub fn average_response_time(&self) -> Result<f64> {
        self.stats.average_response_time()
    }

    /// Releases the queue and the core slots.
    pub fn clean_up(self) {
        info!(
            completed = self.stats.jobs,
            pending = self.state.jobs.len(),
            steps = self.observer.steps(),
            "scheduler cleaned up"
        );
        self.queue.destroy();
    }

    pub fn take_events(&mut self) -> Vec<SchedEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            now: self.state.now,
            cores: self
                .state
                .cores
                .iter()
                .map(|slot| slot.current.map(|key| self.state.job(key).id))
                .collect(),
            queue: self.queue.iter().map(|key| self.state.job(*key).id).collect(),
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn now(&self) -> Ticks {
        self.state.now
    }

    pub fn state(&self) -> &SchedState {
        &self.state
    }

    pub fn queue(&self) -> &OrderedQueue<JobKey> {
        &self.queue
    }

    /// Looks up a live (queued or running) job by id.
    pub fn job(&self, id: JobId) -> Option<&Job> {
        self.state.by_id.get(&id).map(|key| self.state.job(*key))
    }

    fn sync(&mut self, time: Ticks) {
        trace!(from = self.state.now, to = time, "sync running jobs");
        self.state.sync_time(time);
    }

    fn running_job(&self, core: CoreId, id: JobId, time: Ticks) -> Result<JobKey> {
        self.state.check_time(time)?;
        self.state.check_core(core)?;
        match self.state.running_on(core) {
            Some(key) if self.state.job(key).id == id => Ok(key),
            _ => Err(SchedError::JobNotOnCore { core, job: id }),
        }
    }

    fn check_quantum(&self, core: CoreId, time: Ticks) -> Result<()> {
        if !self.policy.is_round_robin() {
            return Err(SchedError::QuantumWithoutRoundRobin);
        }
        self.state.check_time(time)?;
        self.state.check_core(core)
    }

    // Running job ranked worst by the policy, if the arrival ranks strictly
    // ahead of it. Ties among victims go to the lowest core index.
    fn preemption_target(&self, arrival: JobKey) -> Option<CoreId> {
        if !self.policy.is_preemptive() {
            return None;
        }

        let mut victim: Option<(CoreId, &Job)> = None;
        for (core, slot) in self.state.cores.iter().enumerate() {
            let Some(key) = slot.current else { continue };
            let running = self.state.job(key);
            match victim {
                Some((_, worst)) if self.policy.compare(running, worst) != Ordering::Greater => {}
                _ => victim = Some((core, running)),
            }
        }

        let (core, worst) = victim?;
        (self.policy.compare(self.state.job(arrival), worst) == Ordering::Less).then_some(core)
    }

    fn preempt(&mut self, core: CoreId, key: JobKey) {
        let time = self.state.now;
        let victim = self
            .state
            .set_running(core, key)
            .expect("Preempted core must be running a job");
        let by = self.state.job(key).id;
        let victim_id = self.state.job(victim).id;
        debug!(
            core,
            victim = victim_id,
            by,
            time,
            remaining = self.state.job(victim).remaining_burst_time,
            "preempted"
        );
        self.events.push(SchedEvent::Preempted {
            time,
            core,
            victim: victim_id,
            by,
        });

        let position = self.enqueue(victim);
        self.events.push(SchedEvent::Queued {
            time,
            job: victim_id,
            position,
        });
    }

    fn dispatch(&mut self, core: CoreId, key: JobKey) {
        let displaced = self.state.set_running(core, key);
        debug_assert!(displaced.is_none(), "core {core} was not idle");

        let time = self.state.now;
        let job = self.state.job(key).id;
        debug!(core, job, time, "dispatched");
        self.events.push(SchedEvent::Dispatched { time, core, job });
    }

    fn dispatch_next(&mut self, core: CoreId) -> Option<JobId> {
        match self.queue.poll() {
            Some(key) => {
                self.dispatch(core, key);
                Some(self.state.job(key).id)
            }
            None => {
                let time = self.state.now;
                debug!(core, time, "core idle");
                self.events.push(SchedEvent::CoreIdle { time, core });
                None
            }
        }
    }

    fn enqueue(&mut self, key: JobKey) -> usize {
        let now = self.state.now;
        self.state.job_mut(key).ready_since = now;
        let ranking = PolicyRanking {
            policy: self.policy,
            jobs: &self.state.jobs,
        };
        self.queue.insert(key, &ranking)
    }

    fn observe(&mut self) {
        self.observer.observe(&self.state, &self.queue, self.policy);
    }
}

impl fmt::Display for SchedulerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        writeln!(f, "CORES:")?;
        for (core, job) in snapshot.cores.iter().enumerate() {
            match job {
                Some(job) => writeln!(f, "  - {core}: {job}")?,
                None => writeln!(f, "  - {core}: EMPTY")?,
            }
        }
        writeln!(f, "QUEUE:")?;
        for job in &snapshot.queue {
            writeln!(f, "  - [{job}]")?;
        }
        Ok(())
    }
}
