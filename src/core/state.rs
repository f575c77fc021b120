use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, SchedError};

pub type JobId = u64;
pub type CoreId = usize;
pub type Ticks = u64;
new_key_type! {
    pub struct JobKey;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub arrival_time: Ticks,
    pub start_time: Option<Ticks>,
    pub burst_time: Ticks,
    pub remaining_burst_time: Ticks,
    pub priority: i32,
    pub ever_run: bool,
    // Last time the job entered the ready state; orders the round-robin queue
    pub ready_since: Ticks,
}

impl Job {
    pub fn new(id: JobId, arrival_time: Ticks, burst_time: Ticks, priority: i32) -> Self {
        Self {
            id,
            arrival_time,
            start_time: None,
            burst_time,
            remaining_burst_time: burst_time,
            priority,
            ever_run: false,
            ready_since: arrival_time,
        }
    }

    /// Records the first dispatch. Later dispatches leave `start_time` alone.
    pub fn mark_dispatched(&mut self, now: Ticks) {
        if !self.ever_run {
            debug_assert!(self.start_time.is_none(), "job {} started twice", self.id);
            self.ever_run = true;
            self.start_time = Some(now);
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CoreSlot {
    pub current: Option<JobKey>,
}

impl CoreSlot {
    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }
}

/// Everything the engine owns apart from the ready queue and statistics.
#[derive(Debug)]
pub struct SchedState {
    pub now: Ticks,
    pub cores: Vec<CoreSlot>,
    pub jobs: SlotMap<JobKey, Job>,
    pub by_id: FxHashMap<JobId, JobKey>,
    pub arrived: u64,
    pub completed: u64,
    last_arrival: Option<Ticks>,
}

impl SchedState {
    pub fn new(num_cores: usize) -> Self {
        Self {
            now: 0,
            cores: vec![CoreSlot::default(); num_cores],
            jobs: SlotMap::with_key(),
            by_id: FxHashMap::default(),
            arrived: 0,
            completed: 0,
            last_arrival: None,
        }
    }

    pub fn check_time(&self, time: Ticks) -> Result<()> {
        if time < self.now {
            return Err(SchedError::TimeWentBackwards {
                now: self.now,
                time,
            });
        }
        Ok(())
    }

    pub fn check_core(&self, core: CoreId) -> Result<()> {
        if core >= self.cores.len() {
            return Err(SchedError::CoreOutOfRange {
                core,
                cores: self.cores.len(),
            });
        }
        Ok(())
    }

    pub fn check_arrival(&self, id: JobId, time: Ticks, burst_time: Ticks) -> Result<()> {
        self.check_time(time)?;
        if burst_time == 0 {
            return Err(SchedError::ZeroBurst(id));
        }
        if self.by_id.contains_key(&id) {
            return Err(SchedError::DuplicateJob(id));
        }
        match self.last_arrival {
            Some(last) if time <= last => Err(SchedError::ArrivalNotIncreasing {
                job: id,
                time,
                last,
            }),
            _ => Ok(()),
        }
    }

    /// Charges the time elapsed since the last event to every running job.
    pub fn sync_time(&mut self, time: Ticks) {
        let elapsed = time.saturating_sub(self.now);
        if elapsed > 0 {
            for core in &self.cores {
                if let Some(key) = core.current {
                    let job = self
                        .jobs
                        .get_mut(key)
                        .expect("Running job missing from job arena");
                    job.remaining_burst_time = job.remaining_burst_time.saturating_sub(elapsed);
                }
            }
        }
        self.now = time;
    }

    pub fn create_job(
        &mut self,
        id: JobId,
        arrival_time: Ticks,
        burst_time: Ticks,
        priority: i32,
    ) -> JobKey {
        let key = self
            .jobs
            .insert(Job::new(id, arrival_time, burst_time, priority));
        self.by_id.insert(id, key);
        self.arrived += 1;
        self.last_arrival = Some(arrival_time);
        key
    }

    /// Drops a completed job from the model entirely.
    pub fn release_job(&mut self, key: JobKey) -> Job {
        let job = self
            .jobs
            .remove(key)
            .expect("Released job missing from job arena");
        self.by_id.remove(&job.id);
        self.completed += 1;
        job
    }

    pub fn job(&self, key: JobKey) -> &Job {
        &self.jobs[key]
    }

    pub fn job_mut(&mut self, key: JobKey) -> &mut Job {
        &mut self.jobs[key]
    }

    pub fn running_on(&self, core: CoreId) -> Option<JobKey> {
        self.cores[core].current
    }

    pub fn pick_idle_core(&self) -> Option<CoreId> {
        self.cores.iter().position(CoreSlot::is_idle)
    }

    /// Puts `key` on `core`, returning whichever job it displaced.
    pub fn set_running(&mut self, core: CoreId, key: JobKey) -> Option<JobKey> {
        let now = self.now;
        self.job_mut(key).mark_dispatched(now);
        self.cores[core].current.replace(key)
    }

    pub fn clear_core(&mut self, core: CoreId) -> Option<JobKey> {
        self.cores[core].current.take()
    }

    pub fn occupied_cores(&self) -> usize {
        self.cores.iter().filter(|core| !core.is_idle()).count()
    }
}
