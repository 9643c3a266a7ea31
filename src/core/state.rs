use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use serde::Serialize;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

use super::{
    event::SimEvent,
    metrics::Metrics,
    timeline::{Slot, Timeline},
};

// Process ids are 1-based and index the arena at `pid - 1`
pub type Pid = usize;
pub type Ticks = u64;
new_key_type! {
    pub struct DsqId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    Unarrived,
    Ready,
    Running,
    Completed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Process {
    pub id: Pid,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub remaining_time: Ticks,
    pub start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
    pub priority_level: usize,
    pub state: ProcessState,
    pub metrics: Option<Metrics>,
}

impl Process {
    pub fn new(id: Pid, arrival_time: Ticks, burst_time: Ticks) -> Self {
        Self {
            id,
            arrival_time,
            burst_time,
            remaining_time: burst_time,
            start_time: None,
            completion_time: None,
            priority_level: 0,
            state: ProcessState::Unarrived,
            metrics: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.completion_time.is_some()
    }
}

/// Ordering key for shortest-first queues.
///
/// `KeyedPriorityQueue` is a max-heap, so the ordering is flipped: fewer ticks
/// compare greater, and on equal ticks the lower pid does.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct JobLength {
    pub ticks: Ticks,
    pub pid: Pid,
}

impl PartialOrd for JobLength {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for JobLength {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .ticks
            .cmp(&self.ticks)
            .then_with(|| other.pid.cmp(&self.pid))
    }
}

/// Dispatch queue: either plain FIFO or shortest-first.
#[derive(Debug)]
pub enum Dsq {
    Fifo {
        procs: VecDeque<Pid>,
    },
    Priq {
        procs: KeyedPriorityQueue<Pid, JobLength>,
    },
}

impl Dsq {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            procs: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            procs: KeyedPriorityQueue::new(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { procs } => procs.len(),
            Self::Priq { procs } => procs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything a single run owns: clock, process arena, queues and the
/// timeline being built. Schedulers only ever see the run through this.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub processes: Vec<Process>,
    pub dsqs: SlotMap<DsqId, Dsq>,
    pub proc_to_dsq: FxHashMap<Pid, DsqId>,
    pub running: Option<Pid>,
    pub timeline: Timeline,

    // Pids sorted by (arrival_time, id); everything before the cursor has arrived
    arrival_order: Vec<Pid>,
    arrival_cursor: usize,
    events: Vec<SimEvent>,
}

impl SimCtx {
    pub fn new(processes: Vec<Process>) -> Self {
        debug_assert!(
            processes.iter().enumerate().all(|(i, p)| p.id == i + 1),
            "Process ids must be 1..=N in arena order"
        );

        let mut arrival_order: Vec<Pid> = processes.iter().map(|p| p.id).collect();
        arrival_order.sort_by_key(|&pid| (processes[pid - 1].arrival_time, pid));

        Self {
            now: 0,
            processes,
            dsqs: SlotMap::with_key(),
            proc_to_dsq: FxHashMap::default(),
            running: None,
            timeline: Timeline::new(),
            arrival_order,
            arrival_cursor: 0,
            events: Vec::new(),
        }
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn process(&self, pid: Pid) -> &Process {
        &self.processes[pid - 1]
    }

    pub fn process_mut(&mut self, pid: Pid) -> &mut Process {
        &mut self.processes[pid - 1]
    }

    pub fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn create_dsq_fifo(&mut self) -> DsqId {
        self.dsqs.insert(Dsq::new_fifo())
    }

    pub fn create_dsq_priq(&mut self) -> DsqId {
        self.dsqs.insert(Dsq::new_priq())
    }

    fn dsq_push(&mut self, dsq_id: DsqId, pid: Pid, key: Option<JobLength>) {
        assert!(
            !self.proc_to_dsq.contains_key(&pid),
            "Process {pid} already present in some DSQ"
        );
        debug_assert_eq!(
            self.process(pid).state,
            ProcessState::Ready,
            "Process {pid} must be Ready when enqueued"
        );

        let dsq = self.dsqs.get_mut(dsq_id).expect("Unknown DSQ");
        match dsq {
            Dsq::Fifo { procs } => procs.push_back(pid),
            Dsq::Priq { procs } => {
                procs.push(
                    pid,
                    key.expect("Attempted to push to a priority DSQ with no key"),
                );
            }
        };

        self.proc_to_dsq.insert(pid, dsq_id);
    }

    pub fn dsq_push_fifo(&mut self, dsq_id: DsqId, pid: Pid) {
        self.dsq_push(dsq_id, pid, None);
    }

    pub fn dsq_push_priq(&mut self, dsq_id: DsqId, pid: Pid, key: JobLength) {
        self.dsq_push(dsq_id, pid, Some(key));
    }

    pub fn dsq_pop(&mut self, dsq_id: DsqId) -> Option<Pid> {
        let dsq = self.dsqs.get_mut(dsq_id)?;
        let pid = match dsq {
            Dsq::Fifo { procs } => procs.pop_front(),
            Dsq::Priq { procs } => procs.pop().map(|p| p.0),
        }?;

        let removed = self.proc_to_dsq.remove(&pid);
        debug_assert!(removed.is_some(), "Process {pid} missing DSQ membership");

        Some(pid)
    }

    pub fn dsq_len(&self, dsq_id: DsqId) -> usize {
        self.dsqs.get(dsq_id).map_or(0, Dsq::len)
    }

    pub fn proc_in_any_dsq(&self, pid: Pid) -> bool {
        self.proc_to_dsq.contains_key(&pid)
    }

    /// Marks every process with `arrival_time <= now` that has not arrived yet as
    /// Ready and returns them in `(arrival_time, id)` order.
    pub fn take_arrivals(&mut self) -> Vec<Pid> {
        let now = self.now;
        let arrived: Vec<Pid> = self.arrival_order[self.arrival_cursor..]
            .iter()
            .copied()
            .take_while(|&pid| self.processes[pid - 1].arrival_time <= now) // contiguous, since sorted
            .collect();
        self.arrival_cursor += arrived.len();

        for &pid in &arrived {
            self.process_mut(pid).state = ProcessState::Ready;
            self.emit(SimEvent::Arrived { pid });
        }
        arrived
    }

    pub fn next_arrival(&self) -> Option<Ticks> {
        self.arrival_order
            .get(self.arrival_cursor)
            .map(|&pid| self.process(pid).arrival_time)
    }

    /// Emits one idle segment up to `until` and jumps the clock there.
    pub fn idle_until(&mut self, until: Ticks) {
        debug_assert!(until > self.now, "Idle gap must be positive");
        debug_assert!(self.running.is_none(), "CPU idles while running a process");

        let gap = until - self.now;
        self.timeline.append(Slot::Idle, gap);
        self.advance_time(gap);
        self.emit(SimEvent::CpuIdle { until });
    }

    pub fn set_running(&mut self, pid: Pid) {
        debug_assert!(
            !self.proc_to_dsq.contains_key(&pid),
            "Running process {pid} must not be enqueued"
        );
        debug_assert!(self.running.is_none(), "CPU already running a process");

        self.running = Some(pid);
        let now = self.now;
        let process = self.process_mut(pid);
        process.state = ProcessState::Running;
        process.start_time.get_or_insert(now);
    }

    /// Runs the current process for `ticks` time units, tagging the timeline
    /// with `level` when the policy has one.
    pub fn execute(&mut self, ticks: Ticks, level: Option<usize>) {
        let Some(pid) = self.running else {
            debug_assert!(false, "execute() without a running process");
            return;
        };
        debug_assert!(
            ticks <= self.process(pid).remaining_time,
            "Process {pid} cannot run past its remaining time"
        );

        self.timeline.append(Slot::Run { pid, level }, ticks);
        self.advance_time(ticks);
        let process = self.process_mut(pid);
        process.remaining_time -= ticks;
    }

    pub fn mark_ready(&mut self, pid: Pid) {
        let process = self.process_mut(pid);
        debug_assert!(
            process.state != ProcessState::Completed,
            "Completed process {pid} cannot be ready"
        );
        process.state = ProcessState::Ready;
        if self.running == Some(pid) {
            self.running = None;
        }
    }

    pub fn mark_completed(&mut self, pid: Pid) {
        debug_assert!(
            !self.proc_to_dsq.contains_key(&pid),
            "Completing process {pid} that is still enqueued"
        );

        let now = self.now;
        let process = self.process_mut(pid);
        debug_assert!(
            process.state == ProcessState::Running,
            "Process {pid} must have been running before marked complete"
        );
        debug_assert!(
            process.completion_time.is_none(),
            "Process {pid} completed twice"
        );

        process.state = ProcessState::Completed;
        process.remaining_time = 0;
        process.completion_time = Some(now);
        self.running = None;
        self.emit(SimEvent::Completed { pid });
    }

    pub fn all_completed(&self) -> bool {
        self.processes.iter().all(Process::is_finished)
    }
}
