use super::{Dispatch, EnqueueFlags, Pid, SchedParams, Scheduler, SimCtx, SimError, Slice};
use crate::{
    core::{DsqId, JobLength},
    sim::Algorithm,
};

/// Preemptive shortest remaining time first.
///
/// Every dispatch is a single tick, so the whole ready set is re-arbitrated
/// after each unit of work, including processes that arrived meanwhile.
pub struct SrtfScheduler {
    ready: DsqId,
}

impl Scheduler for SrtfScheduler {
    type Config = ();

    const ALGORITHM: Algorithm = Algorithm::Srtf;

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
            ticks: ctx.process(pid).remaining_time,
            pid,
        };
        ctx.dsq_push_priq(self.ready, pid, key);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let pid = ctx.dsq_pop(self.ready)?;
        Some(Dispatch {
            pid,
            slice: Slice::Quantum(1),
            level: None,
        })
    }
}
