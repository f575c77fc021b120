use super::state::{Job, Ticks};
use crate::error::{Result, SchedError};

/// Running sums over completed jobs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub total_wait: Ticks,
    pub total_turnaround: Ticks,
    pub total_response: Ticks,
    pub jobs: u64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a job finishing at `completion_time` into the sums.
    pub fn record(&mut self, job: &Job, completion_time: Ticks) {
        let start = job
            .start_time
            .expect("Completed job was never dispatched");
        let turnaround = completion_time.saturating_sub(job.arrival_time);

        self.total_wait += turnaround.saturating_sub(job.burst_time);
        self.total_turnaround += turnaround;
        self.total_response += start - job.arrival_time;
        self.jobs += 1;
    }

    pub fn average_waiting_time(&self) -> Result<f64> {
        self.average(self.total_wait)
    }

    pub fn average_turnaround_time(&self) -> Result<f64> {
        self.average(self.total_turnaround)
    }

    pub fn average_response_time(&self) -> Result<f64> {
        self.average(self.total_response)
    }

    fn average(&self, total: Ticks) -> Result<f64> {
        if self.jobs == 0 {
            return Err(SchedError::NoCompletedJobs);
        }
        Ok(total as f64 / self.jobs as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(arrival: Ticks, burst: Ticks, start: Ticks) -> Job {
        let mut job = Job::new(0, arrival, burst, 0);
        job.start_time = Some(start);
        job.ever_run = true;
        job
    }

    #[test]
    fn averages_refuse_empty_sums() {
        let stats = Statistics::new();
        assert_eq!(stats.average_waiting_time(), Err(SchedError::NoCompletedJobs));
        assert_eq!(stats.average_turnaround_time(), Err(SchedError::NoCompletedJobs));
        assert_eq!(stats.average_response_time(), Err(SchedError::NoCompletedJobs));
    }

    #[test]
    fn folds_wait_turnaround_and_response() {
        let mut stats = Statistics::new();
        stats.record(&finished(0, 5, 0), 5);
        stats.record(&finished(1, 3, 5), 8);

        assert_eq!(stats.total_wait, 4);
        assert_eq!(stats.total_turnaround, 12);
        assert_eq!(stats.total_response, 4);
        assert_eq!(stats.average_waiting_time(), Ok(2.0));
        assert_eq!(stats.average_turnaround_time(), Ok(6.0));
        assert_eq!(stats.average_response_time(), Ok(2.0));
    }
}
