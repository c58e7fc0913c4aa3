use log::{debug, info};

use super::{
    CANCEL_POLL_INTERVAL, Direction, SearchOptions, SearchOutcome, SearchStats, Step, Verdict,
    blocking_jump, step,
};
use crate::clause::{BitWord, ClauseStore, Counter};
use crate::cnf::cnf::Cnf;
use crate::error::{Error, Result};

pub fn search<W: BitWord>(
    store: &ClauseStore<W>,
    options: &SearchOptions,
) -> Result<SearchOutcome<W>> {
    match options.direction {
        Direction::Ascending => search_ascending(store, options),
        Direction::Descending => search_descending(store, options),
    }
}

fn search_ascending<W: BitWord>(
    store: &ClauseStore<W>,
    options: &SearchOptions,
) -> Result<SearchOutcome<W>> {
    let width = store.width();
    info!(
        "counting search: vars={} clauses={}",
        width.num_vars(),
        store.len()
    );

    let mut counter = Counter::new(width);
    let mut stats = SearchStats {
        sub_ranges: 1,
        ..SearchStats::default()
    };

    loop {
        if stats.steps % CANCEL_POLL_INTERVAL == 0 && options.cancel.is_cancelled() {
            return Err(Error::Cancelled { steps: stats.steps });
        }
        match step(store, &mut counter) {
            Step::Solved => {
                debug!("solution after {} steps", stats.steps);
                return Ok(solved(&counter, stats));
            }
            Step::Jumped(exp) => {
                stats.record_jump(exp);
                if counter.is_exhausted() {
                    debug!("space exhausted after {} steps", stats.steps);
                    return Ok(exhausted(stats));
                }
            }
        }
    }
}

pub fn search_descending<W: BitWord>(
    store: &ClauseStore<W>,
    options: &SearchOptions,
) -> Result<SearchOutcome<W>> {
    let width = store.width();
    info!(
        "descending counting search: vars={} clauses={}",
        width.num_vars(),
        store.len()
    );

    let mut counter = Counter::starting_at(width, W::low_ones(width.num_vars()));
    let mut stats = SearchStats {
        sub_ranges: 1,
        ..SearchStats::default()
    };

    loop {
        if stats.steps % CANCEL_POLL_INTERVAL == 0 && options.cancel.is_cancelled() {
            return Err(Error::Cancelled { steps: stats.steps });
        }
        let Some(exp) = blocking_jump(store, &counter) else {
            debug!("solution after {} steps", stats.steps);
            return Ok(solved(&counter, stats));
        };
        stats.record_jump(exp);
        if !counter.retreat(exp) {
            debug!("space exhausted after {} steps", stats.steps);
            return Ok(exhausted(stats));
        }
    }
}

fn solved<W: BitWord>(counter: &Counter<W>, stats: SearchStats) -> SearchOutcome<W> {
    SearchOutcome {
        verdict: Verdict::Satisfiable(counter.solution()),
        stats,
    }
}

fn exhausted<W>(stats: SearchStats) -> SearchOutcome<W> {
    SearchOutcome {
        verdict: Verdict::Unsatisfiable,
        stats,
    }
}

pub fn solve_fixed(cnf: &Cnf, options: &SearchOptions) -> Result<SearchOutcome<u64>> {
    let store = ClauseStore::<u64>::from_cnf(cnf)?;
    search(&store, options)
}
