use rustc_hash::FxHashMap;

use super::state::{DsqId, ProcessState, SimCtx};

/// Debug-build invariant checks, run by the core after every step.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    // Priority level seen for each process at the previous step
    levels: Vec<usize>,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        self.step += 1;

        debug_assert!(
            ctx.running.is_none(),
            "Every slice must be retired by the end of a step"
        );
        debug_assert_eq!(
            ctx.timeline.len(),
            ctx.now,
            "Timeline must cover every tick up to now"
        );

        for process in &ctx.processes {
            let pid = process.id;
            debug_assert!(
                process.remaining_time <= process.burst_time,
                "Process {pid} remaining time exceeds its burst"
            );
            match process.state {
                ProcessState::Completed => {
                    debug_assert_eq!(process.remaining_time, 0);
                    debug_assert!(
                        process
                            .completion_time
                            .is_some_and(|t| t > process.arrival_time),
                        "Process {pid} completion must follow its arrival"
                    );
                }
                ProcessState::Unarrived => {
                    debug_assert!(
                        process.arrival_time > ctx.now,
                        "Process {pid} should have been admitted by t={}",
                        ctx.now
                    );
                }
                ProcessState::Ready => {
                    debug_assert!(
                        ctx.proc_in_any_dsq(process.id),
                        "Ready process {pid} is in no DSQ"
                    );
                }
                ProcessState::Running => {
                    debug_assert!(false, "Process {pid} still Running between steps");
                }
            }
        }

        if cfg!(debug_assertions) {
            self.check_membership(ctx);
            self.check_levels(ctx);
        }
    }

    // Entries mapped to each DSQ must add up to that DSQ's length
    fn check_membership(&self, ctx: &SimCtx) {
        let mut mapped: FxHashMap<DsqId, usize> = FxHashMap::default();
        for (&pid, &dsq_id) in &ctx.proc_to_dsq {
            debug_assert_eq!(
                ctx.process(pid).state,
                ProcessState::Ready,
                "Process {pid} in DSQ {dsq_id:?} must be Ready"
            );
            debug_assert!(
                ctx.dsqs.contains_key(dsq_id),
                "proc_to_dsq references unknown DSQ {dsq_id:?}"
            );
            *mapped.entry(dsq_id).or_insert(0) += 1;
        }

        for (dsq_id, dsq) in &ctx.dsqs {
            let expected = mapped.get(&dsq_id).copied().unwrap_or(0);
            debug_assert_eq!(
                dsq.len(),
                expected,
                "DSQ {dsq_id:?} holds {} processes but proc_to_dsq maps {expected} to it",
                dsq.len()
            );
        }
    }

    fn check_levels(&mut self, ctx: &SimCtx) {
        if self.levels.len() != ctx.processes.len() {
            self.levels = vec![0; ctx.processes.len()];
        }
        for (seen, process) in self.levels.iter_mut().zip(&ctx.processes) {
            debug_assert!(
                process.priority_level >= *seen,
                "Process {} promoted from level {} to {}",
                process.id,
                seen,
                process.priority_level
            );
            *seen = process.priority_level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Dsq, Process},
        sim::{Algorithm, SchedParams, run_simulation},
        workload,
    };

    #[test]
    fn large_preemptive_run_stays_checked() {
        let jobs = workload::random(600, 11);
        let result = run_simulation(&jobs, Algorithm::Srtf, &SchedParams::default()).unwrap();
        assert_eq!(result.processes().len(), 600);
        assert!(result.processes().iter().all(|p| p.is_finished()));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "proc_to_dsq maps 1")]
    fn queue_entry_missing_from_membership_map_is_caught() {
        let mut ctx = SimCtx::new(vec![Process::new(1, 0, 3)]);
        ctx.take_arrivals();
        let fifo = ctx.create_dsq_fifo();
        ctx.dsq_push_fifo(fifo, 1);
        if let Dsq::Fifo { procs } = &mut ctx.dsqs[fifo] {
            procs.push_back(1);
        }

        Observer::new().observe(&ctx);
    }
}
