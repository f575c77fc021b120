use cpusched_model::core::observer::Observer;
use cpusched_model::prelude::*;

fn engine(cores: usize, policy: Policy) -> SchedulerEngine {
    SchedulerEngine::start_up(cores, policy).unwrap()
}

#[test]
fn fcfs_two_jobs_one_core() {
    let mut e = engine(1, Policy::Fcfs);

    assert_eq!(e.job_arrived(1, 0, 5, 0), Ok(Some(0)));
    assert_eq!(e.job_arrived(2, 1, 3, 0), Ok(None));
    assert_eq!(e.snapshot().queue, vec![2]);

    assert_eq!(e.job_finished(0, 1, 5), Ok(Some(2)));
    assert_eq!(e.job(2).and_then(|j| j.start_time), Some(5));

    // Completion time as delivered by the driver.
    assert_eq!(e.job_finished(0, 2, 9), Ok(None));
    assert_eq!(e.average_waiting_time(), Ok(2.5));
    assert_eq!(e.average_turnaround_time(), Ok(6.5));
    assert_eq!(e.average_response_time(), Ok(2.0));
    e.clean_up();
}

#[test]
fn psjf_shorter_arrival_preempts() {
    let mut e = engine(1, Policy::Psjf);

    assert_eq!(e.job_arrived(1, 0, 10, 0), Ok(Some(0)));
    assert_eq!(e.job_arrived(2, 2, 3, 0), Ok(Some(0)));

    let a = e.job(1).unwrap();
    assert_eq!(a.remaining_burst_time, 8);
    assert_eq!(a.start_time, Some(0));
    let b = e.job(2).unwrap();
    assert_eq!(b.start_time, Some(2));
    assert!(b.ever_run);

    let snapshot = e.snapshot();
    assert_eq!(snapshot.cores, vec![Some(2)]);
    assert_eq!(snapshot.queue, vec![1]);
}

#[test]
fn psjf_never_compares_against_queued_jobs() {
    let mut e = engine(1, Policy::Psjf);
    e.job_arrived(1, 0, 4, 0).unwrap();
    e.job_arrived(2, 1, 20, 0).unwrap();
    // Beats the queued 20 but not the running job's remaining 2.
    assert_eq!(e.job_arrived(3, 2, 5, 0), Ok(None));
    assert_eq!(e.snapshot().queue, vec![3, 2]);
}

#[test]
fn psjf_picks_longest_remaining_victim() {
    let mut e = engine(3, Policy::Psjf);
    e.job_arrived(1, 0, 9, 0).unwrap();
    e.job_arrived(2, 1, 30, 0).unwrap();
    e.job_arrived(3, 2, 12, 0).unwrap();
    assert_eq!(e.job_arrived(4, 3, 5, 0), Ok(Some(1)));
    assert_eq!(e.snapshot().cores, vec![Some(1), Some(4), Some(3)]);
    assert_eq!(e.job(2).map(|j| j.remaining_burst_time), Some(28));
}

#[test]
fn round_robin_requeues_behind_waiting_job() {
    let mut e = engine(1, Policy::Rr);
    e.job_arrived(1, 0, 6, 0).unwrap();
    e.job_arrived(2, 1, 3, 0).unwrap();

    assert_eq!(e.quantum_expired(0, 2), Ok(Some(2)));
    assert_eq!(e.job(1).map(|j| j.remaining_burst_time), Some(4));
    assert_eq!(e.snapshot().queue, vec![1]);

    // Arrivals after the expiry queue behind the rotated job.
    e.job_arrived(3, 3, 2, 0).unwrap();
    assert_eq!(e.snapshot().queue, vec![1, 3]);
    assert_eq!(e.quantum_expired(0, 4), Ok(Some(1)));
    assert_eq!(e.snapshot().queue, vec![3, 2]);
}

#[test]
fn averages_before_any_completion_are_rejected() {
    let mut e = engine(1, Policy::Sjf);
    e.job_arrived(1, 0, 5, 0).unwrap();
    assert_eq!(e.average_waiting_time(), Err(SchedError::NoCompletedJobs));
    assert_eq!(e.average_turnaround_time(), Err(SchedError::NoCompletedJobs));
    assert_eq!(e.average_response_time(), Err(SchedError::NoCompletedJobs));
}

#[test]
fn contract_violations_leave_engine_untouched() {
    let mut e = engine(1, Policy::Fcfs);
    e.job_arrived(1, 4, 5, 0).unwrap();
    let before = e.snapshot();

    assert_eq!(e.job_arrived(1, 6, 5, 0), Err(SchedError::DuplicateJob(1)));
    assert_eq!(
        e.job_arrived(2, 4, 5, 0),
        Err(SchedError::ArrivalNotIncreasing { job: 2, time: 4, last: 4 })
    );
    assert_eq!(
        e.job_finished(0, 1, 2),
        Err(SchedError::TimeWentBackwards { now: 4, time: 2 })
    );
    assert_eq!(e.job_arrived(3, 7, 0, 0), Err(SchedError::ZeroBurst(3)));

    assert_eq!(e.snapshot(), before);
    assert_eq!(e.take_events().len(), 1);
}

#[test]
fn tie_break_is_fifo_for_every_policy() {
    for policy in Policy::ALL {
        let mut e = engine(1, policy);
        // Occupy the core with a job nothing can preempt.
        e.job_arrived(1, 0, 1, -100).unwrap();
        // Same burst and priority; only arrival differs.
        e.job_arrived(2, 1, 50, 3).unwrap();
        e.job_arrived(3, 2, 50, 3).unwrap();

        assert_eq!(e.snapshot().queue, vec![2, 3], "{policy}");
        assert_eq!(e.job_finished(0, 1, 2), Ok(Some(2)), "{policy}");
    }
}

#[test]
fn observer_sees_consistent_state() {
    let mut e = engine(2, Policy::Ppri);
    e.job_arrived(1, 0, 8, 4).unwrap();
    e.job_arrived(2, 1, 8, 6).unwrap();
    e.job_arrived(3, 2, 8, 1).unwrap();
    e.job_arrived(4, 3, 8, 5).unwrap();
    e.job_finished(0, 1, 8).unwrap();

    let violations = Observer::check(e.state(), e.queue(), e.policy());
    assert!(violations.is_empty(), "{violations:?}");

    let state = e.state();
    let live = e.queue().size() + state.occupied_cores();
    assert_eq!(live as u64, state.arrived - state.completed);
}
