use rustc_hash::{FxHashMap, FxHashSet};
use tracing::info;

use super::job::{JobId, JobRecord, JobSpec};
use crate::{
    config::SimConfig,
    core::{CoreId, SchedEvent, SchedulerEngine, Ticks},
    error::{Result, SchedError},
    scheduler::Policy,
};

#[derive(Debug, Clone, Copy)]
struct Running {
    job: JobId,
    // Ticks left before the next quantum expiry; round-robin only
    slice_left: Option<Ticks>,
}

/// Averages reported by the engine once every job has completed.
#[derive(Debug, Clone, PartialEq)]
pub struct SimReport {
    pub policy: Policy,
    pub average_waiting_time: f64,
    pub average_turnaround_time: f64,
    pub average_response_time: f64,
    pub jobs: Vec<JobRecord>,
}

/// Event clock feeding a [`SchedulerEngine`] with arrivals, completions and
/// quantum expiries in simulated-time order.
pub struct Sim {
    engine: SchedulerEngine,
    config: SimConfig,
    jobs: Vec<JobRecord>,
    // JobId --> jobs[index]; used to propagate start and completion times
    job_index: FxHashMap<JobId, usize>,
    remaining: FxHashMap<JobId, Ticks>,
    cores: Vec<Option<Running>>,
    job_cursor: usize,
    now: Ticks,
}

impl Sim {
    pub fn new(mut jobs: Vec<JobSpec>, config: SimConfig) -> Result<Self> {
        let engine = SchedulerEngine::from_config(&config)?;
        jobs.sort_by(|a, b| {
            a.arrival_time
                .cmp(&b.arrival_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        check_workload(&jobs)?;

        let job_index = jobs
            .iter()
            .enumerate()
            .map(|(index, job)| (job.id, index))
            .collect();
        let jobs = jobs
            .into_iter()
            .map(|spec| JobRecord {
                spec,
                start_time: None,
                completion_time: None,
            })
            .collect();

        Ok(Self {
            engine,
            cores: vec![None; config.cores],
            config,
            jobs,
            job_index,
            remaining: FxHashMap::default(),
            job_cursor: 0,
            now: 0,
        })
    }

    /// Advances to the next event instant and delivers everything due then:
    /// completions first, quantum expiries next, arrivals last.
    pub fn step(&mut self) -> Result<Vec<SchedEvent>> {
        let Some(next) = self.next_event_time() else {
            return Ok(Vec::new());
        };
        self.advance_to(next);

        self.handle_completions()?;
        if self.config.policy.is_round_robin() {
            self.handle_expiries()?;
        }
        self.handle_arrivals()?;

        Ok(self.engine.take_events())
    }

    /// Runs until every job has completed.
    pub fn run(&mut self) -> Result<SimReport> {
        while !self.all_jobs_completed() {
            if self.next_event_time().is_none() {
                break;
            }
            self.step()?;
        }
        self.report()
    }

    /// Builds the report from the engine's averages. Fails until at least one
    /// job has completed.
    pub fn report(&self) -> Result<SimReport> {
        let report = SimReport {
            policy: self.config.policy,
            average_waiting_time: self.engine.average_waiting_time()?,
            average_turnaround_time: self.engine.average_turnaround_time()?,
            average_response_time: self.engine.average_response_time()?,
            jobs: self.jobs.clone(),
        };
        info!(
            policy = %report.policy,
            jobs = report.jobs.len(),
            finished_at = self.now,
            wait = report.average_waiting_time,
            turnaround = report.average_turnaround_time,
            response = report.average_response_time,
            "simulation complete"
        );
        Ok(report)
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.jobs.iter().all(|job| job.completion_time.is_some())
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn engine(&self) -> &SchedulerEngine {
        &self.engine
    }

    /// Remaining service of a job the driver has admitted but not retired.
    pub fn remaining(&self, id: JobId) -> Option<Ticks> {
        self.remaining.get(&id).copied()
    }

    /// Hands the engine back for final queries and clean-up.
    pub fn into_engine(self) -> SchedulerEngine {
        self.engine
    }

    fn next_event_time(&self) -> Option<Ticks> {
        let arrival = self
            .jobs
            .get(self.job_cursor)
            .map(|job| job.spec.arrival_time);

        let running = self.cores.iter().flatten().map(|run| {
            let left = self.remaining[&run.job];
            let until = run.slice_left.map_or(left, |slice| slice.min(left));
            self.now + until
        });

        arrival.into_iter().chain(running).min()
    }

    fn advance_to(&mut self, time: Ticks) {
        let delta = time - self.now;
        for run in self.cores.iter_mut().flatten() {
            let left = self
                .remaining
                .get_mut(&run.job)
                .expect("Running job missing remaining time");
            *left -= delta;
            if let Some(slice) = run.slice_left.as_mut() {
                *slice -= delta;
            }
        }
        self.now = time;
    }

    fn handle_completions(&mut self) -> Result<()> {
        for core in 0..self.cores.len() {
            let Some(run) = self.cores[core] else { continue };
            if self.remaining[&run.job] > 0 {
                continue;
            }

            let next = self.engine.job_finished(core, run.job, self.now)?;
            self.remaining.remove(&run.job);
            let index = self.job_index[&run.job];
            self.jobs[index].completion_time = Some(self.now);
            self.place(core, next);
        }
        Ok(())
    }

    fn handle_expiries(&mut self) -> Result<()> {
        for core in 0..self.cores.len() {
            let Some(run) = self.cores[core] else { continue };
            if run.slice_left != Some(0) {
                continue;
            }

            let next = self.engine.quantum_expired(core, self.now)?;
            self.place(core, next);
        }
        Ok(())
    }

    fn handle_arrivals(&mut self) -> Result<()> {
        // Contiguous, since jobs are sorted by arrival
        while let Some(job) = self.jobs.get(self.job_cursor) {
            if job.spec.arrival_time != self.now {
                break;
            }
            let spec = job.spec.clone();
            self.job_cursor += 1;

            self.remaining.insert(spec.id, spec.burst_time);
            let placed =
                self.engine
                    .job_arrived(spec.id, spec.arrival_time, spec.burst_time, spec.priority)?;
            if let Some(core) = placed {
                // Any previous occupant was preempted back into the queue
                self.place(core, Some(spec.id));
            }
        }
        Ok(())
    }

    fn place(&mut self, core: CoreId, job: Option<JobId>) {
        let Some(job) = job else {
            self.cores[core] = None;
            return;
        };

        let index = self.job_index[&job];
        let record = &mut self.jobs[index];
        if record.start_time.is_none() {
            record.start_time = Some(self.now);
        }
        let slice_left = self
            .config
            .policy
            .is_round_robin()
            .then_some(self.config.quantum);
        self.cores[core] = Some(Running { job, slice_left });
    }
}

fn check_workload(jobs: &[JobSpec]) -> Result<()> {
    let mut seen = FxHashSet::default();
    let mut last_arrival: Option<Ticks> = None;
    for job in jobs {
        if job.burst_time == 0 {
            return Err(SchedError::ZeroBurst(job.id));
        }
        if !seen.insert(job.id) {
            return Err(SchedError::DuplicateJob(job.id));
        }
        match last_arrival {
            Some(last) if job.arrival_time <= last => {
                return Err(SchedError::ArrivalNotIncreasing {
                    job: job.id,
                    time: job.arrival_time,
                    last,
                });
            }
            _ => {}
        }
        last_arrival = Some(job.arrival_time);
    }
    Ok(())
}
