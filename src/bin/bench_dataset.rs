use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use clearcount::bench::{BenchConfig, run_dataset};
use clearcount::solve::Engine;

#[derive(Debug, Parser)]
#[command(name = "bench_dataset")]
struct Cli {
    #[arg(long)]
    dir: String,
    #[arg(long, default_value = "auto")]
    engine: String,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1)]
    threads: usize,
    #[arg(long = "timeout_ms", default_value_t = 30000)]
    timeout_ms: u64,
    #[arg(long)]
    csv: String,
    #[arg(long, default_value_t = false)]
    check: bool,
    #[arg(long, default_value_t = false)]
    progress: bool,
}

fn main() -> Result<()> {
    use env_logger::Env;
    env_logger::Builder::from_env(Env::default().filter_or("LOG", "warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    run_from_args(&cli)
}

fn run_from_args(cli: &Cli) -> Result<()> {
    let cfg = BenchConfig {
        engine: Engine::parse(&cli.engine)?,
        seed: cli.seed,
        threads: cli.threads,
        check: cli.check,
    };
    let rows = run_dataset(
        &PathBuf::from(&cli.dir),
        cfg,
        Duration::from_millis(cli.timeout_ms),
        &PathBuf::from(&cli.csv),
        cli.progress,
    )?;
    let solved = rows.iter().filter(|r| r.status == "ok").count();
    println!("rows={} ok={}", rows.len(), solved);
    Ok(())
}
