use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{
    CANCEL_POLL_INTERVAL, CancelFlag, SearchOptions, SearchOutcome, SearchStats, Step, Verdict,
    step,
};
use crate::clause::{BitClause, BitWord, ClauseStore, Counter};
use crate::cnf::cnf::Cnf;
use crate::error::{Error, Result};
use crate::width::Width;

#[derive(Debug, Clone)]
pub struct PartitionOptions {
    pub seed: u64,
    pub base_offset: u32,
    pub spread: u32,
    pub threads: usize,
    // sub-ranges are always walked upward, search.direction is ignored
    pub search: SearchOptions,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            base_offset: 10,
            spread: 4,
            threads: 1,
            search: SearchOptions::default(),
        }
    }
}

pub fn plan_partition<W: BitWord, R: Rng>(
    width: Width,
    base_offset: u32,
    spread: u32,
    rng: &mut R,
) -> Vec<W> {
    let n = width.num_vars();
    let base = n.saturating_sub(base_offset);
    let end = W::pow2(n);

    let mut bounds = vec![W::zero()];
    let mut current = W::zero();
    while current < end {
        let exp = (base + rng.random_range(0..=spread)).min(n);
        current.add_pow2(exp);
        if current > end {
            current = end.clone();
        }
        bounds.push(current.clone());
    }
    bounds
}

#[derive(Debug, Clone)]
struct SubRange<W> {
    index: usize,
    counter: Counter<W>,
    end: W,
    finished: bool,
}

impl<W: BitWord> SubRange<W> {
    fn new(width: Width, index: usize, bounds: &[W]) -> Self {
        Self {
            index,
            counter: Counter::starting_at(width, bounds[index].clone()),
            end: bounds[index + 1].clone(),
            finished: false,
        }
    }
}

enum Pass<W> {
    Solved(BitClause<W>),
    Pending,
    Done,
}

fn run_pass<W: BitWord>(
    store: &ClauseStore<W>,
    ranges: &mut [SubRange<W>],
    stats: &mut SearchStats,
) -> Pass<W> {
    let mut live = false;
    for range in ranges.iter_mut().filter(|r| !r.finished) {
        match step(store, &mut range.counter) {
            Step::Solved => return Pass::Solved(range.counter.solution()),
            Step::Jumped(exp) => {
                stats.record_jump(exp);
                if range.counter.reached(&range.end) {
                    range.finished = true;
                    debug!("sub-range {} exhausted", range.index);
                } else {
                    live = true;
                }
            }
        }
    }
    if live { Pass::Pending } else { Pass::Done }
}

fn validate<W: BitWord>(width: Width, bounds: &[W]) -> Result<()> {
    if bounds.len() < 2 {
        return Err(Error::InvalidPartition(format!(
            "need at least two boundaries, got {}",
            bounds.len()
        )));
    }
    if let Some(pair) = bounds.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(Error::InvalidPartition(format!(
            "boundaries must increase strictly: {:?} then {:?}",
            pair[0], pair[1]
        )));
    }
    let end = W::pow2(width.num_vars());
    if let Some(last) = bounds.last().filter(|last| **last > end) {
        return Err(Error::InvalidPartition(format!(
            "last boundary {:?} lies beyond 2^{}",
            last,
            width.num_vars()
        )));
    }
    Ok(())
}

pub fn search_ranges<W: BitWord>(
    store: &ClauseStore<W>,
    bounds: &[W],
    options: &SearchOptions,
) -> Result<SearchOutcome<W>> {
    let width = store.width();
    validate(width, bounds)?;
    let mut ranges = (0..bounds.len() - 1)
        .map(|i| SubRange::new(width, i, bounds))
        .collect::<Vec<_>>();
    let mut stats = SearchStats {
        sub_ranges: ranges.len(),
        ..SearchStats::default()
    };
    info!(
        "partitioned search: vars={} clauses={} sub_ranges={}",
        width.num_vars(),
        store.len(),
        ranges.len()
    );

    loop {
        if options.cancel.is_cancelled() {
            return Err(Error::Cancelled { steps: stats.steps });
        }
        match run_pass(store, &mut ranges, &mut stats) {
            Pass::Solved(solution) => {
                debug!("solution after {} steps", stats.steps);
                return Ok(SearchOutcome {
                    verdict: Verdict::Satisfiable(solution),
                    stats,
                });
            }
            Pass::Pending => {}
            Pass::Done => {
                debug!("all sub-ranges exhausted after {} steps", stats.steps);
                return Ok(SearchOutcome {
                    verdict: Verdict::Unsatisfiable,
                    stats,
                });
            }
        }
    }
}

struct Shared<'a> {
    stop: &'a AtomicBool,
    interrupted: &'a AtomicBool,
    steps: &'a AtomicU64,
    max_jump: &'a AtomicU32,
    cancel: &'a CancelFlag,
}

fn run_worker<W: BitWord>(
    store: &ClauseStore<W>,
    mut ranges: Vec<SubRange<W>>,
    shared: &Shared<'_>,
    tx: mpsc::Sender<BitClause<W>>,
) {
    let mut stats = SearchStats::default();
    let mut since_poll = 0u64;
    loop {
        if shared.stop.load(Ordering::Acquire) {
            break;
        }
        if since_poll >= CANCEL_POLL_INTERVAL {
            since_poll = 0;
            if shared.cancel.is_cancelled() {
                shared.interrupted.store(true, Ordering::Release);
                shared.stop.store(true, Ordering::Release);
                break;
            }
        }
        let before = stats.steps;
        match run_pass(store, &mut ranges, &mut stats) {
            Pass::Solved(solution) => {
                // only the first finder reports
                if !shared.stop.swap(true, Ordering::AcqRel) {
                    let _ = tx.send(solution);
                }
                break;
            }
            Pass::Pending => since_poll += stats.steps - before,
            Pass::Done => break,
        }
    }
    shared.steps.fetch_add(stats.steps, Ordering::Relaxed);
    shared.max_jump.fetch_max(stats.max_jump, Ordering::Relaxed);
}

pub fn search_ranges_parallel<W: BitWord>(
    store: &ClauseStore<W>,
    bounds: &[W],
    threads: usize,
    options: &SearchOptions,
) -> Result<SearchOutcome<W>> {
    let width = store.width();
    validate(width, bounds)?;
    if options.cancel.is_cancelled() {
        return Err(Error::Cancelled { steps: 0 });
    }
    let count = bounds.len() - 1;
    let threads = threads.clamp(1, count);
    info!(
        "parallel partitioned search: vars={} clauses={} sub_ranges={} threads={}",
        width.num_vars(),
        store.len(),
        count,
        threads
    );

    let stop = AtomicBool::new(false);
    let interrupted = AtomicBool::new(false);
    let steps = AtomicU64::new(0);
    let max_jump = AtomicU32::new(0);
    let shared = Shared {
        stop: &stop,
        interrupted: &interrupted,
        steps: &steps,
        max_jump: &max_jump,
        cancel: &options.cancel,
    };
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        for worker in 0..threads {
            let ranges = (worker..count)
                .step_by(threads)
                .map(|i| SubRange::new(width, i, bounds))
                .collect::<Vec<_>>();
            let tx = tx.clone();
            let shared = &shared;
            scope.spawn(move || run_worker(store, ranges, shared, tx));
        }
    });
    drop(tx);

    let stats = SearchStats {
        steps: steps.load(Ordering::Relaxed),
        max_jump: max_jump.load(Ordering::Relaxed),
        sub_ranges: count,
    };
    if let Ok(solution) = rx.try_recv() {
        return Ok(SearchOutcome {
            verdict: Verdict::Satisfiable(solution),
            stats,
        });
    }
    if interrupted.load(Ordering::Acquire) {
        return Err(Error::Cancelled { steps: stats.steps });
    }
    Ok(SearchOutcome {
        verdict: Verdict::Unsatisfiable,
        stats,
    })
}

pub fn search_partitioned<W: BitWord>(
    store: &ClauseStore<W>,
    options: &PartitionOptions,
) -> Result<SearchOutcome<W>> {
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let bounds =
        plan_partition::<W, _>(store.width(), options.base_offset, options.spread, &mut rng);
    if options.threads > 1 {
        search_ranges_parallel(store, &bounds, options.threads, &options.search)
    } else {
        search_ranges(store, &bounds, &options.search)
    }
}

pub fn solve_partitioned(cnf: &Cnf, options: &PartitionOptions) -> Result<SearchOutcome<u64>> {
    let store = ClauseStore::<u64>::from_cnf(cnf)?;
    search_partitioned(&store, options)
}
