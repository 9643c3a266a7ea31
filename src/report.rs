//! Plain-text rendering of run results.

use std::fmt::Write;

use crate::{
    core::Timeline,
    sim::{Job, RunResult},
};

const RULE: usize = 84;

/// Segment bar with the tick at every segment boundary underneath:
///
/// ```text
/// | P1   | IDLE | P2 |
/// 0      4      6    7
/// ```
pub fn gantt(timeline: &Timeline) -> String {
    let segments = timeline.segments();
    if segments.is_empty() {
        return String::from("(empty)\n");
    }

    let mut bar = String::new();
    let mut ticks = String::from("0");
    for segment in &segments {
        let label = segment.slot.to_string();
        // At least one column per tick, so long segments look long
        let width = label.len().max(segment.duration() as usize);
        let _ = write!(bar, "| {label:<width$} ");

        let boundary = bar.len();
        if ticks.len() < boundary {
            ticks.extend(std::iter::repeat_n(' ', boundary - ticks.len()));
        } else {
            ticks.push(' ');
        }
        let _ = write!(ticks, "{}", segment.end);
    }
    bar.push('|');

    format!("{bar}\n{ticks}\n")
}

/// Input job list, numbered the way the driver will assign ids.
pub fn processes(jobs: &[Job]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(out, "{:<10} {:<12} {:<10}", "Process", "Arrival", "Burst");
    let _ = writeln!(out, "{}", "-".repeat(40));
    for (i, job) in jobs.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<10} {:<12} {:<10}",
            format!("P{}", i + 1),
            job.arrival_time,
            job.burst_time
        );
    }
    out
}

pub fn table(result: &RunResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "-".repeat(RULE));
    let _ = writeln!(
        out,
        "{:<10} {:<10} {:<10} {:<12} {:<12} {:<12} {:<12}",
        "Process", "Arrival", "Burst", "Completion", "Turnaround", "Response", "Waiting"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE));

    for p in result.processes() {
        let completion = p
            .completion_time
            .map_or_else(|| "-".to_string(), |t| t.to_string());
        let (turnaround, response, waiting) = match p.metrics {
            Some(m) => (
                m.turnaround_time.to_string(),
                m.response_time.to_string(),
                m.waiting_time.to_string(),
            ),
            None => ("-".into(), "-".into(), "-".into()),
        };
        let _ = writeln!(
            out,
            "{:<10} {:<10} {:<10} {:<12} {:<12} {:<12} {:<12}",
            format!("P{}", p.id),
            p.arrival_time,
            p.burst_time,
            completion,
            turnaround,
            response,
            waiting
        );
    }

    let averages = result.averages();
    let _ = writeln!(out, "{}", "-".repeat(RULE));
    let _ = writeln!(
        out,
        "{:<10} {:<10} {:<10} {:<12} {:<12.2} {:<12.2} {:<12.2}",
        "", "", "", "AVERAGE:", averages.turnaround_time, averages.response_time, averages.waiting_time
    );
    out
}

pub fn render(result: &RunResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(RULE));
    let _ = writeln!(out, "{}", result.algorithm().title());
    let _ = writeln!(out, "{}", "=".repeat(RULE));
    let _ = writeln!(out, "\nGANTT CHART:");
    out.push_str(&gantt(result.timeline()));
    let _ = writeln!(out, "\nPROCESS DETAILS:");
    out.push_str(&table(result));
    out
}

/// Side-by-side averages for several runs over the same job set.
pub fn comparison(results: &[RunResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14} {:>12} {:>12} {:>12} {:>10} {:>8}",
        "Algorithm", "Turnaround", "Response", "Waiting", "Makespan", "CPU %"
    );
    let _ = writeln!(out, "{}", "-".repeat(73));
    for result in results {
        let averages = result.averages();
        let _ = writeln!(
            out,
            "{:<14} {:>12.2} {:>12.2} {:>12.2} {:>10} {:>8.1}",
            result.algorithm().to_string(),
            averages.turnaround_time,
            averages.response_time,
            averages.waiting_time,
            result.makespan(),
            result.cpu_utilization() * 100.0
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::Slot,
        sim::{Algorithm, Job, SchedParams, run_simulation},
        workload,
    };

    #[test]
    fn gantt_marks_segment_boundaries() {
        let mut timeline = Timeline::new();
        timeline.append(Slot::Run { pid: 1, level: None }, 4);
        timeline.append(Slot::Idle, 2);
        timeline.append(Slot::Run { pid: 2, level: None }, 1);

        assert_eq!(
            gantt(&timeline),
            "| P1   | IDLE | P2 |\n0      4      6    7\n"
        );
    }

    #[test]
    fn gantt_of_empty_timeline() {
        assert_eq!(gantt(&Timeline::new()), "(empty)\n");
    }

    #[test]
    fn table_lists_every_process_and_averages() {
        let result =
            run_simulation(&workload::sample(), Algorithm::Fcfs, &SchedParams::default()).unwrap();
        let table = table(&result);

        for pid in 1..=5 {
            assert!(table.contains(&format!("P{pid} ")));
        }
        let average_row = table.lines().rev().find(|l| l.contains("AVERAGE:")).unwrap();
        assert!(average_row.contains("10.20"));
        assert!(average_row.contains("5.60"));
    }

    #[test]
    fn process_list_numbers_jobs_in_input_order() {
        let list = processes(&[Job::new(0, 6), Job::new(2, 4)]);
        let rows: Vec<Vec<&str>> = list
            .lines()
            .map(|l| l.split_whitespace().collect())
            .collect();

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[1], ["Process", "Arrival", "Burst"]);
        assert_eq!(rows[3], ["P1", "0", "6"]);
        assert_eq!(rows[4], ["P2", "2", "4"]);
    }

    #[test]
    fn comparison_has_a_row_per_run() {
        let jobs = workload::sample();
        let params = SchedParams::new(Some(2), Some(5));
        let results: Vec<_> = Algorithm::ALL
            .into_iter()
            .map(|a| run_simulation(&jobs, a, &params).unwrap())
            .collect();

        let report = comparison(&results);
        assert_eq!(report.lines().count(), 2 + results.len());
        assert!(report.contains("Round Robin"));
        assert!(report.contains("100.0"));
    }
}
