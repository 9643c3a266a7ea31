pub mod driver;
pub mod event;
pub mod metrics;
pub mod observer;
pub mod state;
pub mod timeline;

pub use driver::SchedCore;
pub use event::SimEvent;
pub use metrics::{Averages, Metrics, compute_averages, compute_metrics};
pub use state::{Dsq, DsqId, JobLength, Pid, Process, ProcessState, SimCtx, Ticks};
pub use timeline::{Segment, Slot, Timeline};
