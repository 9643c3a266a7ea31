//! Discrete-time CPU scheduling simulator.
//!
//! [`run_simulation`] runs one of five classic policies (FCFS, SJF, SRTF,
//! Round Robin, MLFQ) over a fixed set of jobs and returns the per-tick
//! timeline together with per-process metrics and their averages.

pub mod core;
pub mod error;
pub mod report;
pub mod scheduler;
pub mod sim;
pub mod workload;

pub use crate::core::{Averages, Metrics, Process, SimEvent, Slot, Timeline};
pub use error::{ConfigError, InputError, SimError};
pub use scheduler::Scheduler;
pub use sim::{Algorithm, Job, RunResult, SchedParams, Sim, run_simulation};
