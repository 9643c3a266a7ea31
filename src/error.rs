use crate::{core::Pid, sim::Algorithm};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SimError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("empty process set")]
    EmptyProcessSet,
    #[error("process #{index} has negative arrival time {arrival_time}")]
    NegativeArrival { index: usize, arrival_time: i64 },
    #[error("process #{index} has non-positive burst time {burst_time}")]
    NonPositiveBurst { index: usize, burst_time: i64 },
    #[error("{0} requires a positive time quantum")]
    MissingTimeQuantum(Algorithm),
    #[error("{0} requires a positive allotment time")]
    MissingAllotmentTime(Algorithm),
    // Metrics requested for a process that never completed
    #[error("process P{0} has not finished")]
    Unfinished(Pid),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unrecognized scheduling algorithm `{0}`")]
    UnknownAlgorithm(String),
}

impl SimError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
