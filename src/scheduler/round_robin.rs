use std::num::NonZeroU64;

use super::{Dispatch, EnqueueFlags, Pid, SchedParams, Scheduler, SimCtx, SimError, Slice};
use crate::{core::DsqId, sim::Algorithm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRobinConfig {
    pub quantum: NonZeroU64,
}

/// Round robin over a single FIFO ready queue.
///
/// A preempted process is re-enqueued by the core only after the arrivals of
/// the same instant, so newcomers run before it.
pub struct RoundRobinScheduler {
    ready: DsqId,
    quantum: NonZeroU64,
}

impl Scheduler for RoundRobinScheduler {
    type Config = RoundRobinConfig;

    const ALGORITHM: Algorithm = Algorithm::RoundRobin;

    fn configure(params: &SchedParams) -> Result<Self::Config, SimError> {
        Ok(RoundRobinConfig {
            quantum: params.quantum_for(Self::ALGORITHM)?,
        })
    }

    fn init(ctx: &mut SimCtx, config: RoundRobinConfig) -> Self {
        Self {
            ready: ctx.create_dsq_fifo(),
            quantum: config.quantum,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, pid: Pid, _flags: EnqueueFlags) {
        ctx.dsq_push_fifo(self.ready, pid);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let pid = ctx.dsq_pop(self.ready)?;
        Some(Dispatch {
            pid,
            slice: Slice::Quantum(self.quantum.get()),
            level: None,
        })
    }
}
