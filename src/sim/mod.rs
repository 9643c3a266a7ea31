pub mod algorithm;
pub mod driver;
pub mod job;
pub mod result;

pub use algorithm::{Algorithm, SchedParams};
pub use driver::{Sim, run_simulation, validate_jobs};
pub use job::Job;
pub use result::RunResult;
