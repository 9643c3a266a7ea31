use super::{Dispatch, EnqueueFlags, Pid, SchedParams, Scheduler, SimCtx, SimError, Slice};
use crate::{core::DsqId, sim::Algorithm};

/// First-come first-served: one FIFO queue fed in arrival order, every
/// process runs to completion.
pub struct FcfsScheduler {
    queue: DsqId,
}

impl Scheduler for FcfsScheduler {
    type Config = ();

    const ALGORITHM: Algorithm = Algorithm::Fcfs;

    fn configure(_params: &SchedParams) -> Result<Self::Config, SimError> {
        Ok(())
    }

    fn init(ctx: &mut SimCtx, _config: ()) -> Self {
        Self {
            queue: ctx.create_dsq_fifo(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, pid: Pid, _flags: EnqueueFlags) {
        ctx.dsq_push_fifo(self.queue, pid);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let pid = ctx.dsq_pop(self.queue)?;
        Some(Dispatch {
            pid,
            slice: Slice::ToCompletion,
            level: None,
        })
    }
}
