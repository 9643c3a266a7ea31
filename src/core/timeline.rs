use serde::Serialize;
use std::fmt;

use super::state::{Pid, Ticks};

/// Occupant of the CPU for one time unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slot {
    Idle,
    Run {
        pid: Pid,
        // MLFQ queue index the process ran at
        #[serde(skip_serializing_if = "Option::is_none")]
        level: Option<usize>,
    },
}

impl Slot {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn pid(&self) -> Option<Pid> {
        match self {
            Self::Idle => None,
            Self::Run { pid, .. } => Some(*pid),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Run { pid, level: None } => write!(f, "P{pid}"),
            Self::Run {
                pid,
                level: Some(level),
            } => write!(f, "P{pid}Q{level}"),
        }
    }
}

/// Maximal run of equal slots, covering `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub slot: Slot,
    pub start: Ticks,
    pub end: Ticks,
}

impl Segment {
    pub fn duration(&self) -> Ticks {
        self.end - self.start
    }
}

/// Per-time-unit record of CPU occupancy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    slots: Vec<Slot>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, slot: Slot, duration: Ticks) {
        debug_assert!(duration > 0, "Timeline segments must be non-empty");
        self.slots
            .extend(std::iter::repeat_n(slot, duration as usize));
    }

    pub fn len(&self) -> Ticks {
        self.slots.len() as Ticks
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().map(Slot::to_string).collect()
    }

    pub fn segments(&self) -> Vec<Segment> {
        let mut segments: Vec<Segment> = Vec::new();
        for (t, &slot) in self.slots.iter().enumerate() {
            let t = t as Ticks;
            match segments.last_mut() {
                Some(last) if last.slot == slot => last.end = t + 1,
                _ => segments.push(Segment {
                    slot,
                    start: t,
                    end: t + 1,
                }),
            }
        }
        segments
    }

    pub fn busy_time(&self) -> Ticks {
        self.slots.iter().filter(|s| !s.is_idle()).count() as Ticks
    }

    pub fn idle_time(&self) -> Ticks {
        self.len() - self.busy_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_occupant() {
        assert_eq!(Slot::Idle.to_string(), "IDLE");
        assert_eq!(Slot::Run { pid: 3, level: None }.to_string(), "P3");
        assert_eq!(
            Slot::Run {
                pid: 3,
                level: Some(2)
            }
            .to_string(),
            "P3Q2"
        );
    }

    #[test]
    fn consecutive_equal_slots_merge_into_segments() {
        let p1 = Slot::Run { pid: 1, level: None };
        let p2 = Slot::Run { pid: 2, level: None };
        let mut timeline = Timeline::new();
        timeline.append(Slot::Idle, 2);
        timeline.append(p1, 2);
        timeline.append(p1, 1);
        timeline.append(p2, 3);

        assert_eq!(timeline.len(), 8);
        assert_eq!(timeline.busy_time(), 6);
        assert_eq!(timeline.idle_time(), 2);
        assert_eq!(
            timeline.segments(),
            vec![
                Segment {
                    slot: Slot::Idle,
                    start: 0,
                    end: 2
                },
                Segment {
                    slot: p1,
                    start: 2,
                    end: 5
                },
                Segment {
                    slot: p2,
                    start: 5,
                    end: 8
                },
            ]
        );
    }

    #[test]
    fn queue_levels_split_segments() {
        let mut timeline = Timeline::new();
        timeline.append(
            Slot::Run {
                pid: 4,
                level: Some(0),
            },
            2,
        );
        timeline.append(
            Slot::Run {
                pid: 4,
                level: Some(1),
            },
            2,
        );

        let segments = timeline.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(timeline.labels(), vec!["P4Q0", "P4Q0", "P4Q1", "P4Q1"]);
    }

    #[test]
    fn serializes_as_slot_list() {
        let mut timeline = Timeline::new();
        timeline.append(Slot::Idle, 1);
        timeline.append(Slot::Run { pid: 1, level: None }, 1);

        let json = serde_json::to_string(&timeline).unwrap();
        assert_eq!(json, r#"[{"kind":"idle"},{"kind":"run","pid":1}]"#);
    }
}
