pub mod fcfs;
pub mod mlfq;
pub mod round_robin;
pub mod sjf;
pub mod srtf;

use crate::{
    core::{
        Ticks,
        state::{Pid, SimCtx},
    },
    error::SimError,
    sim::{Algorithm, SchedParams},
};
pub use fcfs::FcfsScheduler;
pub use mlfq::{MLFQ_LEVELS, MlfqConfig, MlfqScheduler};
pub use round_robin::{RoundRobinConfig, RoundRobinScheduler};
pub use sjf::SjfScheduler;
pub use srtf::SrtfScheduler;

pub type EnqueueFlags = u64;

/// Process just arrived and has never been queued.
pub const ENQ_ARRIVAL: EnqueueFlags = 1 << 0;
/// Process used up its slice with work left.
pub const ENQ_PREEMPT: EnqueueFlags = 1 << 1;

/// How long a dispatched process may hold the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slice {
    Quantum(Ticks),
    ToCompletion,
}

impl Slice {
    pub fn length(self, remaining: Ticks) -> Ticks {
        match self {
            Self::Quantum(quantum) => quantum.min(remaining),
            Self::ToCompletion => remaining,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub pid: Pid,
    pub slice: Slice,
    pub level: Option<usize>,
}

/// A scheduling policy, driven by [`crate::core::SchedCore`].
///
/// The core owns the clock and the dispatch loop; a policy only decides where
/// ready processes wait (`enqueue`) and which one runs next (`dispatch`).
pub trait Scheduler {
    type Config;

    const ALGORITHM: Algorithm;

    /// Validates the policy's parameters before any process is created.
    fn configure(params: &SchedParams) -> Result<Self::Config, SimError>;

    fn init(ctx: &mut SimCtx, config: Self::Config) -> Self;

    fn enqueue(&mut self, ctx: &mut SimCtx, pid: Pid, flags: EnqueueFlags);

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch>;

    /// Called after every slice, before same-instant arrivals are admitted.
    fn stopping(&mut self, _ctx: &mut SimCtx, _pid: Pid, _ran: Ticks, _runnable: bool) {}
}
