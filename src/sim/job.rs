use serde::{Deserialize, Serialize};

/// Caller-side process descriptor. Ids are assigned by the driver from the
/// position in the input list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(alias = "arrival")]
    pub arrival_time: i64,
    #[serde(alias = "burst")]
    pub burst_time: i64,
}

impl Job {
    pub fn new(arrival_time: i64, burst_time: i64) -> Self {
        Self {
            arrival_time,
            burst_time,
        }
    }
}
