use tracing::{debug, trace};

use super::{
    event::SimEvent,
    observer::Observer,
    state::{Process, SimCtx, Ticks},
};
use crate::scheduler::{Dispatch, ENQ_ARRIVAL, ENQ_PREEMPT, Scheduler};

/// Single-CPU dispatch loop shared by every policy.
pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(processes: Vec<Process>, config: S::Config) -> Self {
        let mut ctx = SimCtx::new(processes);
        let scheduler = S::init(&mut ctx, config);
        Self {
            ctx,
            scheduler,
            observer: Observer::new(),
        }
    }

    /// Makes one scheduling decision: either runs one slice or idles up to the
    /// next arrival. Returns `None` once there is nothing left to do.
    pub fn step(&mut self) -> Option<Vec<SimEvent>> {
        self.admit_arrivals();

        match self.scheduler.dispatch(&mut self.ctx) {
            Some(dispatch) => self.run_slice(dispatch),
            None => {
                // Nothing ready: jump to the next arrival, or stop
                let next = self.ctx.next_arrival()?;
                debug!(now = self.ctx.now, until = next, "cpu idle");
                self.ctx.idle_until(next);
            }
        }
        self.admit_arrivals();

        self.observer.observe(&self.ctx);
        let events = self.ctx.drain_events();
        for event in &events {
            trace!(now = self.ctx.now, ?event);
        }
        Some(events)
    }

    fn admit_arrivals(&mut self) {
        for pid in self.ctx.take_arrivals() {
            self.scheduler.enqueue(&mut self.ctx, pid, ENQ_ARRIVAL);
        }
    }

    fn run_slice(&mut self, dispatch: Dispatch) {
        let Dispatch { pid, slice, level } = dispatch;
        let ticks = slice.length(self.ctx.process(pid).remaining_time);
        debug!(now = self.ctx.now, pid, ?level, ticks, "dispatch");

        self.ctx.set_running(pid);
        self.ctx.emit(SimEvent::Dispatched { pid, level, ticks });
        self.ctx.execute(ticks, level);

        let remaining = self.ctx.process(pid).remaining_time;
        let runnable = remaining > 0;
        self.scheduler
            .stopping(&mut self.ctx, pid, ticks, runnable);

        if runnable {
            self.ctx.mark_ready(pid);
            self.ctx.emit(SimEvent::Preempted { pid, remaining });
            // Processes arriving at this very instant queue ahead of the preempted one
            self.admit_arrivals();
            self.scheduler.enqueue(&mut self.ctx, pid, ENQ_PREEMPT);
        } else {
            self.ctx.mark_completed(pid);
            debug!(now = self.ctx.now, pid, "completed");
        }
    }

    pub fn into_ctx(self) -> SimCtx {
        self.ctx
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
