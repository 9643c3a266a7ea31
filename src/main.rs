use anyhow::{Context, Result};
use clap::Parser;
use sched_model::{Algorithm, Job, RunResult, SchedParams, report, run_simulation, workload};
use std::{fs, path::PathBuf, thread};
use tracing_subscriber::EnvFilter;

/// Simulate CPU scheduling policies over a fixed set of jobs.
#[derive(Debug, Parser)]
#[command(name = "sched_model", version)]
struct Cli {
    /// fcfs, sjf, srtf, rr or mlfq
    #[arg(short, long, default_value = "fcfs")]
    algorithm: String,

    /// Time quantum for rr and mlfq
    #[arg(short, long, default_value_t = 2)]
    quantum: u64,

    /// Per-level allotment for mlfq
    #[arg(long, default_value_t = 5)]
    allotment: u64,

    /// JSON array of {"arrival_time", "burst_time"} objects
    #[arg(short, long, conflicts_with = "random")]
    input: Option<PathBuf>,

    /// Generate this many random jobs instead of the sample set
    #[arg(short, long, value_name = "COUNT")]
    random: Option<usize>,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Run every algorithm and print a comparison
    #[arg(long)]
    compare: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let jobs = load_jobs(&cli)?;
    let params = SchedParams::new(Some(cli.quantum), Some(cli.allotment));

    if cli.compare {
        let results = compare(&jobs, &params)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else {
            println!("{}", report::comparison(&results));
        }
        return Ok(());
    }

    if !cli.json {
        println!("PROCESS LIST:");
        println!("{}", report::processes(&jobs));
    }

    let algorithm: Algorithm = cli.algorithm.parse()?;
    let result = run_simulation(&jobs, algorithm, &params)
        .with_context(|| format!("{algorithm} simulation failed"))?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", report::render(&result));
    }
    Ok(())
}

fn load_jobs(cli: &Cli) -> Result<Vec<Job>> {
    if let Some(path) = &cli.input {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading jobs from {}", path.display()))?;
        return serde_json::from_str(&text)
            .with_context(|| format!("parsing jobs in {}", path.display()));
    }
    Ok(match cli.random {
        Some(count) => workload::random(count, cli.seed),
        None => workload::sample(),
    })
}

// Every run owns its processes, so the policies can run side by side
fn compare(jobs: &[Job], params: &SchedParams) -> Result<Vec<RunResult>> {
    thread::scope(|s| {
        let handles: Vec<_> = Algorithm::ALL
            .into_iter()
            .map(|algorithm| s.spawn(move || run_simulation(jobs, algorithm, params)))
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => Ok(result?),
                Err(_) => anyhow::bail!("simulation thread panicked"),
            })
            .collect()
    })
}
