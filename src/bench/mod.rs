use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::cnf::cnf::Cnf;
use crate::cnf::dimacs::parse_dimacs_reader;
use crate::error::Error;
use crate::oracle::reference_sat;
use crate::search::CancelFlag;
use crate::solve::{Engine, SolveOptions, solve_cnf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    pub engine: Engine,
    pub seed: Option<u64>,
    pub threads: usize,
    pub check: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchRow {
    pub path: String,
    pub status: String,
    pub engine: String,
    pub verdict: String,
    pub wall_ms: Option<u128>,
    pub steps: Option<u64>,
    pub vars: Option<u32>,
    pub clauses: Option<usize>,
    pub reference: Option<bool>,
    pub oracle_ms: Option<u128>,
    pub file_bytes: Option<u64>,
}

impl BenchRow {
    pub fn csv_header() -> &'static str {
        "path,status,engine,verdict,wall_ms,steps,vars,clauses,reference,oracle_ms,file_bytes"
    }

    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{}",
            esc_csv(&self.path),
            self.status,
            self.engine,
            self.verdict,
            opt(self.wall_ms),
            opt(self.steps),
            opt(self.vars),
            opt(self.clauses),
            self.reference.map(verdict_name).unwrap_or_default(),
            opt(self.oracle_ms),
            opt(self.file_bytes),
        )
    }

    fn empty(path: &Path, cfg: BenchConfig, file_bytes: Option<u64>) -> Self {
        Self {
            path: path.to_string_lossy().to_string(),
            status: "ok".to_string(),
            engine: cfg.engine.name().to_string(),
            verdict: String::new(),
            wall_ms: None,
            steps: None,
            vars: None,
            clauses: None,
            reference: None,
            oracle_ms: None,
            file_bytes,
        }
    }
}

pub fn run_one(path: &Path, cfg: BenchConfig, timeout: Duration) -> BenchRow {
    let file_bytes = fs::metadata(path).ok().map(|m| m.len());
    let start = Instant::now();
    let p = path.to_path_buf();
    let cancel = CancelFlag::new();
    let worker_cancel = cancel.clone();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let row = run_one_inner(&p, cfg, worker_cancel, file_bytes);
        let _ = tx.send(row);
    });

    let mut row = match rx.recv_timeout(timeout) {
        Ok(row) => row,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            cancel.cancel();
            let mut row = BenchRow::empty(path, cfg, file_bytes);
            row.status = "timeout".to_string();
            row
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            let mut row = BenchRow::empty(path, cfg, file_bytes);
            row.status = "internal_error".to_string();
            row
        }
    };
    if row.wall_ms.is_none() {
        row.wall_ms = Some(start.elapsed().as_millis());
    }
    row
}

pub fn run_dataset(
    dir: &Path,
    cfg: BenchConfig,
    timeout: Duration,
    csv_path: &Path,
    progress: bool,
) -> std::io::Result<Vec<BenchRow>> {
    let paths = discover_paths(dir)?;
    let mut csv = File::create(csv_path)?;
    writeln!(csv, "{}", BenchRow::csv_header())?;
    csv.flush()?;

    let mut rows = Vec::new();
    for path in paths {
        let row = run_one(&path, cfg, timeout);
        if progress {
            println!(
                "path={} status={} verdict={} wall_ms={} steps={}",
                row.path,
                row.status,
                row.verdict,
                row.wall_ms.unwrap_or_default(),
                row.steps.unwrap_or_default()
            );
        }
        writeln!(csv, "{}", row.to_csv_line())?;
        csv.flush()?;
        rows.push(row);
    }

    Ok(rows)
}

fn run_one_inner(
    path: &Path,
    cfg: BenchConfig,
    cancel: CancelFlag,
    file_bytes: Option<u64>,
) -> BenchRow {
    let mut row = BenchRow::empty(path, cfg, file_bytes);

    let cnf = match load(path) {
        Ok(v) => v,
        Err(_) => {
            row.status = "parse_error".to_string();
            return row;
        }
    };
    row.vars = Some(cnf.num_vars);
    row.clauses = Some(cnf.clauses.len());

    let options = SolveOptions {
        engine: cfg.engine,
        seed: cfg.seed,
        threads: cfg.threads,
        cancel,
        ..SolveOptions::default()
    };
    let solve_start = Instant::now();
    let solved = solve_cnf(&cnf, &options);
    row.wall_ms = Some(solve_start.elapsed().as_millis());
    let report = match solved {
        Ok(v) => v,
        Err(Error::WidthExceeded { .. }) => {
            row.status = "width_error".to_string();
            return row;
        }
        Err(Error::Cancelled { steps }) => {
            row.status = "timeout".to_string();
            row.steps = Some(steps);
            return row;
        }
        Err(_) => {
            row.status = "internal_error".to_string();
            return row;
        }
    };

    row.engine = report.engine.name().to_string();
    row.verdict = verdict_name(report.is_sat()).to_string();
    row.steps = Some(report.stats.steps);
    if let Some(model) = &report.model {
        if !cnf.is_satisfied_by(model) {
            row.status = "mismatch".to_string();
        }
    }
    if cfg.check {
        let oracle_start = Instant::now();
        let reference = reference_sat(&cnf);
        row.oracle_ms = Some(oracle_start.elapsed().as_millis());
        match reference {
            Ok(expected) => {
                row.reference = Some(expected);
                if expected != report.is_sat() {
                    row.status = "mismatch".to_string();
                }
            }
            Err(_) => row.status = "internal_error".to_string(),
        }
    }
    row
}

fn load(path: &Path) -> anyhow::Result<Cnf> {
    let file = File::open(path)?;
    parse_dimacs_reader(BufReader::new(file))
}

fn discover_paths(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::<PathBuf>::new();
    collect_paths(dir, &mut out)?;
    out.sort();
    Ok(out)
}

fn collect_paths(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let p = entry.path();
        if p.is_dir() {
            collect_paths(&p, out)?;
            continue;
        }
        if p.extension().and_then(|x| x.to_str()) == Some("cnf") {
            out.push(p);
        }
    }
    Ok(())
}

fn verdict_name(sat: bool) -> &'static str {
    if sat { "sat" } else { "unsat" }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn esc_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
