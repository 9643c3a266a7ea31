use average::Mean;
use serde::Serialize;

use super::state::{Process, Ticks};
use crate::error::{InputError, SimError};

/// Post-run timings of one finished process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub turnaround_time: Ticks,
    pub response_time: Ticks,
    pub waiting_time: Ticks,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Averages {
    pub turnaround_time: f64,
    pub response_time: f64,
    pub waiting_time: f64,
}

/// Fills in `process.metrics`. Unfinished processes are left untouched.
pub fn compute_metrics(process: &mut Process) {
    let (Some(completion), Some(start)) = (process.completion_time, process.start_time) else {
        return;
    };

    let turnaround_time = completion - process.arrival_time;
    process.metrics = Some(Metrics {
        turnaround_time,
        response_time: start - process.arrival_time,
        waiting_time: turnaround_time - process.burst_time,
    });
}

pub fn compute_averages(processes: &[Process]) -> Result<Averages, SimError> {
    if processes.is_empty() {
        return Err(InputError::EmptyProcessSet.into());
    }

    let metrics = processes
        .iter()
        .map(|p| p.metrics.ok_or(InputError::Unfinished(p.id)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Averages {
        turnaround_time: avg(metrics.iter().map(|m| m.turnaround_time)),
        response_time: avg(metrics.iter().map(|m| m.response_time)),
        waiting_time: avg(metrics.iter().map(|m| m.waiting_time)),
    })
}

fn avg(iter: impl Iterator<Item = Ticks>) -> f64 {
    iter.map(|t| t as f64).collect::<Mean>().mean()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(id: usize, arrival: Ticks, burst: Ticks, start: Ticks, end: Ticks) -> Process {
        let mut p = Process::new(id, arrival, burst);
        p.remaining_time = 0;
        p.start_time = Some(start);
        p.completion_time = Some(end);
        p
    }

    #[test]
    fn metrics_follow_timestamps() {
        let mut p = finished(2, 2, 4, 6, 10);
        compute_metrics(&mut p);

        assert_eq!(
            p.metrics,
            Some(Metrics {
                turnaround_time: 8,
                response_time: 4,
                waiting_time: 4,
            })
        );
    }

    #[test]
    fn unfinished_process_is_left_untouched() {
        let mut p = Process::new(1, 0, 5);
        p.start_time = Some(0);
        p.remaining_time = 2;
        compute_metrics(&mut p);

        assert_eq!(p.metrics, None);
    }

    #[test]
    fn averages_over_all_processes() {
        let mut processes = vec![finished(1, 0, 6, 0, 6), finished(2, 2, 4, 6, 10)];
        processes.iter_mut().for_each(compute_metrics);

        let averages = compute_averages(&processes).unwrap();
        assert_eq!(averages.turnaround_time, 7.0);
        assert_eq!(averages.response_time, 2.0);
        assert_eq!(averages.waiting_time, 2.0);
    }

    #[test]
    fn empty_set_fails_fast() {
        assert_eq!(
            compute_averages(&[]),
            Err(SimError::InvalidInput(InputError::EmptyProcessSet))
        );
    }

    #[test]
    fn unfinished_process_blocks_averages() {
        let mut processes = vec![finished(1, 0, 6, 0, 6), Process::new(2, 1, 3)];
        processes.iter_mut().for_each(compute_metrics);

        assert_eq!(
            compute_averages(&processes),
            Err(SimError::InvalidInput(InputError::Unfinished(2)))
        );
    }
}
