use rustc_hash::FxHashMap;
use std::num::NonZeroU64;
use tracing::debug;

use super::{
    Dispatch, ENQ_ARRIVAL, ENQ_PREEMPT, EnqueueFlags, Pid, SchedParams, Scheduler, SimCtx,
    SimError, Slice, Ticks,
};
use crate::{
    core::{DsqId, SimEvent},
    sim::Algorithm,
};

pub const MLFQ_LEVELS: usize = 4;
const LOWEST: usize = MLFQ_LEVELS - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MlfqConfig {
    pub quantum: NonZeroU64,
    pub allotment: NonZeroU64,
}

/// Multilevel feedback queue with four FIFO levels.
///
/// Levels 0..=2 are time-sliced; a process that has used `allotment` ticks at
/// one level drops to the next when it is requeued. The last level runs
/// processes to completion.
/// Processes are never promoted.
pub struct MlfqScheduler {
    levels: [DsqId; MLFQ_LEVELS],
    quantum: Ticks,
    allotment: Ticks,
    // Ticks consumed at the current level
    used: FxHashMap<Pid, Ticks>,
}

impl MlfqScheduler {
    pub fn allotment_used(&self, pid: Pid) -> Ticks {
        self.used.get(&pid).copied().unwrap_or(0)
    }

    // Runs on requeue after preemption, so the slice is already charged
    fn demote_if_spent(&mut self, ctx: &mut SimCtx, pid: Pid) {
        let level = ctx.process(pid).priority_level;
        if level == LOWEST || self.allotment_used(pid) < self.allotment {
            return;
        }

        self.used.insert(pid, 0);
        debug!(now = ctx.now, pid, level = level + 1, "demoted");
        ctx.process_mut(pid).priority_level = level + 1;
        ctx.emit(SimEvent::Demoted {
            pid,
            from: level,
            to: level + 1,
        });
    }
}

impl Scheduler for MlfqScheduler {
    type Config = MlfqConfig;

    const ALGORITHM: Algorithm = Algorithm::Mlfq;

    fn configure(params: &SchedParams) -> Result<Self::Config, SimError> {
        Ok(MlfqConfig {
            quantum: params.quantum_for(Self::ALGORITHM)?,
            allotment: params.allotment_for(Self::ALGORITHM)?,
        })
    }

    fn init(ctx: &mut SimCtx, config: MlfqConfig) -> Self {
        Self {
            levels: std::array::from_fn(|_| ctx.create_dsq_fifo()),
            quantum: config.quantum.get(),
            allotment: config.allotment.get(),
            used: FxHashMap::default(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, pid: Pid, flags: EnqueueFlags) {
        if flags & ENQ_ARRIVAL != 0 {
            ctx.process_mut(pid).priority_level = 0;
            self.used.insert(pid, 0);
        } else if flags & ENQ_PREEMPT != 0 {
            self.demote_if_spent(ctx, pid);
        }
        let level = ctx.process(pid).priority_level;
        ctx.dsq_push_fifo(self.levels[level], pid);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        self.levels.iter().enumerate().find_map(|(level, &dsq)| {
            let pid = ctx.dsq_pop(dsq)?;
            let slice = if level < LOWEST {
                Slice::Quantum(self.quantum)
            } else {
                Slice::ToCompletion
            };
            Some(Dispatch {
                pid,
                slice,
                level: Some(level),
            })
        })
    }

    fn stopping(&mut self, _ctx: &mut SimCtx, pid: Pid, ran: Ticks, runnable: bool) {
        if runnable {
            *self.used.entry(pid).or_insert(0) += ran;
        } else {
            self.used.remove(&pid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::Process,
        sim::{Job, RunResult, Sim, run_simulation},
        workload,
    };

    fn run(jobs: &[Job], quantum: u64, allotment: u64) -> RunResult {
        run_simulation(
            jobs,
            Algorithm::Mlfq,
            &SchedParams::new(Some(quantum), Some(allotment)),
        )
        .unwrap()
    }

    #[test]
    fn long_job_sinks_through_every_level() {
        let result = run(&[Job::new(0, 10)], 2, 2);

        assert_eq!(
            result.timeline().labels(),
            vec![
                "P1Q0", "P1Q0", "P1Q1", "P1Q1", "P1Q2", "P1Q2", "P1Q3", "P1Q3", "P1Q3", "P1Q3"
            ]
        );
        assert_eq!(result.process(1).unwrap().priority_level, 3);
    }

    #[test]
    fn allotment_accumulates_across_quanta() {
        let result = run(&[Job::new(0, 10)], 2, 5);

        let segments = result.timeline().segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].duration(), 6);
        assert_eq!(segments[1].duration(), 4);
        assert_eq!(result.process(1).unwrap().priority_level, 1);
    }

    #[test]
    fn sample_set_demotes_only_the_longest_job() {
        let result = run(&workload::sample(), 2, 5);

        let levels: Vec<_> = result
            .processes()
            .iter()
            .map(|p| p.priority_level)
            .collect();
        assert_eq!(levels, vec![0, 0, 0, 1, 0]);

        let labels = result.timeline().labels();
        assert_eq!(labels.len(), 23);
        assert_eq!(labels[19..], ["P4Q0", "P4Q0", "P4Q1", "P4Q1"]);
    }

    #[test]
    fn higher_level_always_runs_first() {
        // P1 is demoted to Q1 at t=2; P2 arrives at t=3 and takes over at t=4
        let result = run(&[Job::new(0, 6), Job::new(3, 2)], 2, 2);
        assert_eq!(
            result.timeline().labels(),
            vec!["P1Q0", "P1Q0", "P1Q1", "P1Q1", "P2Q0", "P2Q0", "P1Q2", "P1Q2"]
        );
    }

    #[test]
    fn same_instant_arrival_runs_before_preempted_process() {
        let result = run(&[Job::new(0, 3), Job::new(2, 2)], 2, 10);
        assert_eq!(
            result.timeline().labels(),
            vec!["P1Q0", "P1Q0", "P2Q0", "P2Q0", "P1Q0"]
        );
    }

    #[test]
    fn lowest_level_is_not_preempted_by_new_arrivals() {
        let result = run(&[Job::new(0, 12), Job::new(7, 1)], 2, 2);

        let labels = result.timeline().labels();
        assert_eq!(labels.len(), 13);
        assert!(labels[6..12].iter().all(|l| l == "P1Q3"));
        assert_eq!(labels[12], "P2Q0");
        assert_eq!(result.process(1).unwrap().completion_time, Some(12));
    }

    #[test]
    fn preempted_requeue_demotes_once_allotment_is_spent() {
        let mut ctx = SimCtx::new(vec![Process::new(1, 0, 10)]);
        let config = MlfqConfig {
            quantum: NonZeroU64::new(2).unwrap(),
            allotment: NonZeroU64::new(2).unwrap(),
        };
        let mut mlfq = MlfqScheduler::init(&mut ctx, config);

        for pid in ctx.take_arrivals() {
            mlfq.enqueue(&mut ctx, pid, ENQ_ARRIVAL);
        }
        let dispatch = mlfq.dispatch(&mut ctx).unwrap();
        assert_eq!(dispatch.level, Some(0));

        ctx.set_running(1);
        ctx.execute(2, dispatch.level);
        mlfq.stopping(&mut ctx, 1, 2, true);
        // Charged, but the level only changes on requeue
        assert_eq!(mlfq.allotment_used(1), 2);
        assert_eq!(ctx.process(1).priority_level, 0);

        ctx.mark_ready(1);
        mlfq.enqueue(&mut ctx, 1, ENQ_PREEMPT);
        assert_eq!(ctx.process(1).priority_level, 1);
        assert_eq!(mlfq.allotment_used(1), 0);
        assert_eq!(
            ctx.drain_events().last(),
            Some(&SimEvent::Demoted {
                pid: 1,
                from: 0,
                to: 1
            })
        );
        assert_eq!(mlfq.dispatch(&mut ctx).map(|d| d.level), Some(Some(1)));
    }

    #[test]
    fn demotion_is_reported_and_counter_resets() {
        let config = MlfqConfig {
            quantum: NonZeroU64::new(2).unwrap(),
            allotment: NonZeroU64::new(4).unwrap(),
        };
        let mut sim = Sim::<MlfqScheduler>::new(&[Job::new(0, 9)], config).unwrap();

        let mut demotions = Vec::new();
        while let Some(events) = sim.step() {
            for event in events {
                if matches!(event, SimEvent::Demoted { .. }) {
                    assert_eq!(sim.core.scheduler.allotment_used(1), 0);
                    demotions.push(event);
                }
            }
        }

        assert_eq!(
            demotions,
            vec![
                SimEvent::Demoted {
                    pid: 1,
                    from: 0,
                    to: 1
                },
                SimEvent::Demoted {
                    pid: 1,
                    from: 1,
                    to: 2
                },
            ]
        );
        assert!(sim.all_jobs_completed());
    }
}
