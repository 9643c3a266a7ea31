use serde::{Deserialize, Serialize};
use std::{fmt, num::NonZeroU64, str::FromStr};

use crate::error::{ConfigError, InputError, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    Fcfs,
    Sjf,
    Srtf,
    RoundRobin,
    Mlfq,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Self::Fcfs,
        Self::Sjf,
        Self::Srtf,
        Self::RoundRobin,
        Self::Mlfq,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Fcfs => "First-Come First-Served (FCFS)",
            Self::Sjf => "Shortest Job First (Non-Preemptive)",
            Self::Srtf => "Shortest Remaining Time First (Preemptive)",
            Self::RoundRobin => "Round Robin",
            Self::Mlfq => "Multilevel Feedback Queue (MLFQ)",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fcfs => "FCFS",
            Self::Sjf => "SJF",
            Self::Srtf => "SRTF",
            Self::RoundRobin => "Round Robin",
            Self::Mlfq => "MLFQ",
        };
        f.write_str(name)
    }
}

impl FromStr for Algorithm {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fcfs" => Ok(Self::Fcfs),
            "sjf" => Ok(Self::Sjf),
            "srtf" => Ok(Self::Srtf),
            "rr" | "round-robin" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            "mlfq" => Ok(Self::Mlfq),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_string()).into()),
        }
    }
}

/// Raw, caller-supplied policy parameters. Which ones are required depends on
/// the algorithm; see [`SchedParams::quantum_for`] and
/// [`SchedParams::allotment_for`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedParams {
    #[serde(default)]
    pub time_quantum: Option<u64>,
    #[serde(default)]
    pub allotment_time: Option<u64>,
}

impl SchedParams {
    pub fn new(time_quantum: Option<u64>, allotment_time: Option<u64>) -> Self {
        Self {
            time_quantum,
            allotment_time,
        }
    }

    pub fn quantum_for(&self, algorithm: Algorithm) -> Result<NonZeroU64, SimError> {
        self.time_quantum
            .and_then(NonZeroU64::new)
            .ok_or_else(|| InputError::MissingTimeQuantum(algorithm).into())
    }

    pub fn allotment_for(&self, algorithm: Algorithm) -> Result<NonZeroU64, SimError> {
        self.allotment_time
            .and_then(NonZeroU64::new)
            .ok_or_else(|| InputError::MissingAllotmentTime(algorithm).into())
    }
}
