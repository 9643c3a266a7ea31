use super::{Dispatch, EnqueueFlags, Pid, SchedParams, Scheduler, SimCtx, SimError, Slice};
use crate::{
    core::{DsqId, JobLength},
    sim::Algorithm,
};

/// Non-preemptive shortest job first, keyed on the full burst time.
pub struct SjfScheduler {
    ready: DsqId,
}

impl Scheduler for SjfScheduler {
    type Config = ();

    const ALGORITHM: Algorithm = Algorithm::Sjf;

    fn configure(_params: &SchedParams) -> Result<Self::Config, SimError> {
        Ok(())
    }

    fn init(ctx: &mut SimCtx, _config: ()) -> Self {
        Self {
            ready: ctx.create_dsq_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, pid: Pid, _flags: EnqueueFlags) {
        let key = JobLength {
            ticks: ctx.process(pid).burst_time,
            pid,
        };
        ctx.dsq_push_priq(self.ready, pid, key);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let pid = ctx.dsq_pop(self.ready)?;
        Some(Dispatch {
            pid,
            slice: Slice::ToCompletion,
            level: None,
        })
    }
}
