use crate::core::{Pid, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    Arrived {
        pid: Pid,
    },
    Dispatched {
        pid: Pid,
        level: Option<usize>,
        ticks: Ticks,
    },
    // Slice ended with work left; the process goes back to a ready queue
    Preempted {
        pid: Pid,
        remaining: Ticks,
    },
    Demoted {
        pid: Pid,
        from: usize,
        to: usize,
    },
    Completed {
        pid: Pid,
    },
    // No arrived process had work left; the clock jumped to `until`
    CpuIdle {
        until: Ticks,
    },
}
