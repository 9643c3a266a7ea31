use tracing::info;

use super::{Algorithm, Job, RunResult, SchedParams};
use crate::{
    core::{Process, SchedCore, SimEvent, Ticks, compute_averages, compute_metrics},
    error::{InputError, SimError},
    scheduler::{
        FcfsScheduler, MlfqScheduler, RoundRobinScheduler, Scheduler, SjfScheduler,
        SrtfScheduler,
    },
};

/// One run of policy `S` over an engine-owned copy of the caller's jobs.
pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
}

impl<S: Scheduler> Sim<S> {
    pub fn new(jobs: &[Job], config: S::Config) -> Result<Self, SimError> {
        let processes = build_processes(jobs)?;
        Ok(Self {
            core: SchedCore::new(processes, config),
        })
    }

    pub fn from_params(jobs: &[Job], params: &SchedParams) -> Result<Self, SimError> {
        let config = S::configure(params)?;
        Self::new(jobs, config)
    }

    pub fn step(&mut self) -> Option<Vec<SimEvent>> {
        self.core.step()
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.core.ctx.all_completed()
    }

    pub fn processes(&self) -> &[Process] {
        &self.core.ctx.processes
    }

    pub fn run(mut self) -> Result<RunResult, SimError> {
        info!(
            algorithm = %S::ALGORITHM,
            processes = self.processes().len(),
            "simulation started"
        );
        while self.step().is_some() {}

        let ctx = self.core.into_ctx();
        let mut processes = ctx.processes;
        processes.iter_mut().for_each(compute_metrics);
        let averages = compute_averages(&processes)?;

        let result = RunResult::new(S::ALGORITHM, ctx.timeline, processes, averages);
        info!(
            algorithm = %S::ALGORITHM,
            makespan = result.makespan(),
            avg_turnaround = result.averages().turnaround_time,
            avg_response = result.averages().response_time,
            "simulation finished"
        );
        Ok(result)
    }
}

/// Runs `algorithm` over `jobs` and returns the timeline, per-process metrics
/// and averages. Input and parameters are validated before anything runs; the
/// caller's jobs are never modified.
pub fn run_simulation(
    jobs: &[Job],
    algorithm: Algorithm,
    params: &SchedParams,
) -> Result<RunResult, SimError> {
    match algorithm {
        Algorithm::Fcfs => simulate::<FcfsScheduler>(jobs, params),
        Algorithm::Sjf => simulate::<SjfScheduler>(jobs, params),
        Algorithm::Srtf => simulate::<SrtfScheduler>(jobs, params),
        Algorithm::RoundRobin => simulate::<RoundRobinScheduler>(jobs, params),
        Algorithm::Mlfq => simulate::<MlfqScheduler>(jobs, params),
    }
}

fn simulate<S: Scheduler>(jobs: &[Job], params: &SchedParams) -> Result<RunResult, SimError> {
    Sim::<S>::from_params(jobs, params)?.run()
}

pub fn validate_jobs(jobs: &[Job]) -> Result<(), SimError> {
    if jobs.is_empty() {
        return Err(InputError::EmptyProcessSet.into());
    }

    for (i, job) in jobs.iter().enumerate() {
        let index = i + 1;
        if job.arrival_time < 0 {
            return Err(InputError::NegativeArrival {
                index,
                arrival_time: job.arrival_time,
            }
            .into());
        }
        if job.burst_time <= 0 {
            return Err(InputError::NonPositiveBurst {
                index,
                burst_time: job.burst_time,
            }
            .into());
        }
    }
    Ok(())
}

fn build_processes(jobs: &[Job]) -> Result<Vec<Process>, SimError> {
    validate_jobs(jobs)?;
    Ok(jobs
        .iter()
        .enumerate()
        .map(|(i, job)| Process::new(i + 1, job.arrival_time as Ticks, job.burst_time as Ticks))
        .collect())
}
