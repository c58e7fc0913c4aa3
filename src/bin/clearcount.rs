use std::fs::File;
use std::io::BufReader;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use clearcount::cnf::cnf::Cnf;
use clearcount::cnf::dimacs::{parse_dimacs_reader, to_dimacs};
use clearcount::cnf::random::{RandomCnfConfig, random_kcnf};
use clearcount::search::{CancelFlag, Direction};
use clearcount::solve::{Engine, SolveOptions, solve_cnf};

#[derive(Debug, Parser)]
#[command(name = "clearcount")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Args)]
struct SolveArgs {
    path: String,
    #[arg(long, default_value = "auto")]
    engine: String,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1)]
    threads: usize,
    // walk the counter down from the all-ones assignment
    #[arg(long)]
    descending: bool,
    #[arg(long = "timeout-ms")]
    timeout_ms: Option<u64>,
    #[arg(long)]
    verify: bool,
    #[arg(long)]
    stats: bool,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    Solve(SolveArgs),
    Info { path: String },
    Gen {
        #[arg(long)]
        vars: u32,
        #[arg(long)]
        clauses: usize,
        #[arg(long, default_value_t = 3)]
        k: usize,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long)]
        planted: bool,
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    use env_logger::Env;
    // log warnings and errors by default, do not print timestamps
    env_logger::Builder::from_env(Env::default().filter_or("LOG", "warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Cmd::Solve(args) => solve_cmd(&args)?,
        Cmd::Info { path } => info_cmd(&path)?,
        Cmd::Gen {
            vars,
            clauses,
            k,
            seed,
            planted,
            out,
        } => gen_cmd(vars, clauses, k, seed, planted, &out)?,
    }
    Ok(())
}

fn load_cnf(path: &str) -> Result<Cnf> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path))?;
    parse_dimacs_reader(BufReader::new(file)).with_context(|| format!("cannot parse {}", path))
}

fn solve_cmd(args: &SolveArgs) -> Result<()> {
    let start = Instant::now();
    let cnf = load_cnf(&args.path)?;
    let cancel = CancelFlag::new();
    if let Some(ms) = args.timeout_ms {
        cancel.cancel_after(Duration::from_millis(ms));
    }
    let direction = if args.descending {
        Direction::Descending
    } else {
        Direction::Ascending
    };
    let options = SolveOptions {
        engine: Engine::parse(&args.engine)?,
        seed: args.seed,
        threads: args.threads,
        direction,
        cancel,
    };
    let report = solve_cnf(&cnf, &options)?;

    match (&report.assignment, &report.model) {
        (Some(line), Some(model)) => {
            println!("Satisfiable! A solution is:");
            println!("{}", line);
            if args.verify && !cnf.is_satisfied_by(model) {
                bail!("reported assignment violates the formula");
            }
        }
        _ => println!("Unsatisfiable!"),
    }
    if args.stats {
        println!(
            "engine={} steps={} max_jump={} sub_ranges={}",
            report.engine.name(),
            report.stats.steps,
            report.stats.max_jump,
            report.stats.sub_ranges
        );
    }
    println!("CPU time is {:.3} s", start.elapsed().as_secs_f64());
    Ok(())
}

fn info_cmd(path: &str) -> Result<()> {
    let cnf = load_cnf(path)?;
    println!(
        "vars={} clauses={} max_clause_width={} engine={}",
        cnf.num_vars,
        cnf.clauses.len(),
        cnf.max_clause_width(),
        Engine::Auto.resolve(cnf.num_vars).name()
    );
    Ok(())
}

fn gen_cmd(vars: u32, clauses: usize, k: usize, seed: u64, planted: bool, out: &str) -> Result<()> {
    let cnf = random_kcnf(&RandomCnfConfig {
        vars,
        clauses,
        k,
        seed,
        planted,
    })?;
    std::fs::write(out, to_dimacs(&cnf))?;
    println!(
        "GEN: wrote {} | vars={} clauses={} k={} planted={}",
        out, vars, clauses, k, planted
    );
    Ok(())
}
