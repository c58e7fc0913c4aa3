use anyhow::bail;
use log::info;

use crate::clause::BitWord;
use crate::cnf::cnf::{Cnf, Lit};
use crate::error::Result;
use crate::search::partitioned::{PartitionOptions, solve_partitioned};
use crate::search::{
    CancelFlag, Direction, SearchOptions, SearchOutcome, SearchStats, counting, wide,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Auto,
    Counting,
    Wide,
    Partitioned,
}

impl Engine {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "auto" => Ok(Engine::Auto),
            "counting" => Ok(Engine::Counting),
            "wide" => Ok(Engine::Wide),
            "partitioned" | "bomber" => Ok(Engine::Partitioned),
            _ => bail!(
                "unknown engine '{}', expected auto|counting|wide|partitioned",
                s
            ),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Engine::Auto => "auto",
            Engine::Counting => "counting",
            Engine::Wide => "wide",
            Engine::Partitioned => "partitioned",
        }
    }

    pub fn resolve(self, num_vars: u32) -> Self {
        match self {
            Engine::Auto => match <u64 as BitWord>::MAX_VARS {
                Some(max) if num_vars > max => Engine::Wide,
                _ => Engine::Counting,
            },
            other => other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SolveOptions {
    pub engine: Engine,
    pub seed: Option<u64>,
    pub threads: usize,
    pub direction: Direction,
    pub cancel: CancelFlag,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            engine: Engine::Auto,
            seed: None,
            threads: 1,
            direction: Direction::Ascending,
            cancel: CancelFlag::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveReport {
    pub engine: Engine,
    pub num_vars: u32,
    pub num_clauses: usize,
    pub stats: SearchStats,
    pub model: Option<Vec<Lit>>,
    pub assignment: Option<String>,
}

impl SolveReport {
    pub fn is_sat(&self) -> bool {
        self.model.is_some()
    }
}

pub fn solve_cnf(cnf: &Cnf, options: &SolveOptions) -> Result<SolveReport> {
    let engine = options.engine.resolve(cnf.num_vars);
    let search = SearchOptions {
        cancel: options.cancel.clone(),
        direction: options.direction,
    };
    info!("engine={} vars={} clauses={}", engine.name(), cnf.num_vars, cnf.clauses.len());

    let report = match engine {
        Engine::Auto | Engine::Counting => {
            report(engine, cnf, counting::solve_fixed(cnf, &search)?)
        }
        Engine::Wide => report(engine, cnf, wide::solve_wide(cnf, &search)?),
        Engine::Partitioned => {
            let seed = options.seed.unwrap_or_else(rand::random);
            info!("partition seed={}", seed);
            let partition = PartitionOptions {
                seed,
                threads: options.threads,
                search,
                ..PartitionOptions::default()
            };
            report(engine, cnf, solve_partitioned(cnf, &partition)?)
        }
    };
    Ok(report)
}

fn report<W: BitWord>(engine: Engine, cnf: &Cnf, outcome: SearchOutcome<W>) -> SolveReport {
    let solution = outcome.verdict.assignment();
    SolveReport {
        engine,
        num_vars: cnf.num_vars,
        num_clauses: cnf.clauses.len(),
        stats: outcome.stats,
        model: solution.map(|s| s.literals()),
        assignment: solution.map(|s| s.to_string()),
    }
}
