use serde::Serialize;

use super::Algorithm;
use crate::core::{Averages, Pid, Process, Ticks, Timeline};

/// Outcome of one completed simulation. Built once by the driver and read-only
/// afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    algorithm: Algorithm,
    timeline: Timeline,
    processes: Vec<Process>,
    averages: Averages,
}

impl RunResult {
    pub(crate) fn new(
        algorithm: Algorithm,
        timeline: Timeline,
        processes: Vec<Process>,
        averages: Averages,
    ) -> Self {
        Self {
            algorithm,
            timeline,
            processes,
            averages,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Processes in id order, with metrics filled in.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn process(&self, pid: Pid) -> Option<&Process> {
        pid.checked_sub(1).and_then(|i| self.processes.get(i))
    }

    pub fn averages(&self) -> Averages {
        self.averages
    }

    pub fn makespan(&self) -> Ticks {
        self.timeline.len()
    }

    pub fn cpu_utilization(&self) -> f64 {
        match self.makespan() {
            0 => 0.0,
            makespan => self.timeline.busy_time() as f64 / makespan as f64,
        }
    }

    /// Process ids ordered by completion time.
    pub fn completion_order(&self) -> Vec<Pid> {
        let mut finished: Vec<&Process> = self.processes.iter().collect();
        finished.sort_by_key(|p| (p.completion_time, p.id));
        finished.into_iter().map(|p| p.id).collect()
    }
}
