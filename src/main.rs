use average::Estimate;
use cpusched_model::{JobSpec, Policy, Sim, SimConfig, sim::SimReport};
use rand::prelude::*;

fn main() -> cpusched_model::Result<()> {
    tracing_subscriber::fmt::init();

    let jobs = bernoulli_jobs(500, 0.3, 0.3, 2, 6, 0);
    let num_cores = 2;

    for policy in Policy::ALL {
        let config = SimConfig::new(num_cores, policy).with_quantum(3);
        let mut sim = Sim::new(jobs.clone(), config)?;

        while !sim.all_jobs_completed() {
            let events = sim.step()?;
            for event in events {
                tracing::debug!(t = event.time(), ?event, "decision");
            }
        }

        let report = sim.report()?;
        print_report(&report);
        sim.into_engine().clean_up();
    }

    Ok(())
}

fn print_report(report: &SimReport) {
    // Recomputed from per-job records as a cross-check on the engine's sums
    let waits = report.jobs.iter().filter_map(|j| j.waiting_time());
    let responses = report.jobs.iter().filter_map(|j| j.response_time());

    println!("{}:", report.policy);
    println!(
        "  Average waiting time:    {:.2} ticks (records: {:.2})",
        report.average_waiting_time,
        avg(waits)
    );
    println!(
        "  Average turnaround time: {:.2} ticks",
        report.average_turnaround_time
    );
    println!(
        "  Average response time:   {:.2} ticks (records: {:.2})",
        report.average_response_time,
        avg(responses)
    );
}

fn bernoulli_jobs(
    ticks: u64,
    p_arrival: f64,
    p_short: f64,
    short_ticks: u64,
    long_ticks: u64,
    seed: u64,
) -> Vec<JobSpec> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut jobs = Vec::new();

    for t in 0..ticks {
        if rng.random::<f64>() < p_arrival {
            let burst_time = if rng.random::<f64>() < p_short {
                short_ticks
            } else {
                long_ticks
            };

            jobs.push(JobSpec {
                id: jobs.len() as u64,
                arrival_time: t,
                burst_time,
                priority: rng.random_range(0..8),
            });
        }
    }

    jobs
}

fn avg(iter: impl Iterator<Item = u64>) -> f64 {
    iter.map(|x| x as f64).collect::<average::Mean>().estimate()
}
