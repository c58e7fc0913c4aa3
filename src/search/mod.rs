pub mod cancel;
pub mod counting;
pub mod partitioned;
pub mod wide;

use log::trace;

use crate::clause::{BitClause, BitWord, ClauseStore, Counter};

pub use cancel::CancelFlag;

pub(crate) const CANCEL_POLL_INTERVAL: u64 = 1 << 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<W> {
    Satisfiable(BitClause<W>),
    Unsatisfiable,
}

impl<W: BitWord> Verdict<W> {
    pub fn is_sat(&self) -> bool {
        matches!(self, Verdict::Satisfiable(_))
    }

    pub fn assignment(&self) -> Option<&BitClause<W>> {
        match self {
            Verdict::Satisfiable(clause) => Some(clause),
            Verdict::Unsatisfiable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub steps: u64,
    pub max_jump: u32,
    pub sub_ranges: usize,
}

impl SearchStats {
    pub(crate) fn record_jump(&mut self, exp: u32) {
        self.steps += 1;
        self.max_jump = self.max_jump.max(exp);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome<W> {
    pub verdict: Verdict<W>,
    pub stats: SearchStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    // from the all-zero counter up to 2^N
    #[default]
    Ascending,
    // from the all-ones counter down past zero
    Descending,
}

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub cancel: CancelFlag,
    pub direction: Direction,
}

pub(crate) enum Step {
    Solved,
    Jumped(u32),
}

// largest block skipped by any clause the counter violates
pub(crate) fn blocking_jump<W: BitWord>(
    store: &ClauseStore<W>,
    counter: &Counter<W>,
) -> Option<u32> {
    store
        .find_blocking(counter)
        .map(BitClause::trailing_free_bits)
        .max()
}

pub(crate) fn step<W: BitWord>(store: &ClauseStore<W>, counter: &mut Counter<W>) -> Step {
    match blocking_jump(store, counter) {
        None => Step::Solved,
        Some(exp) => {
            trace!("counter {:?} jumps by 2^{}", counter.value(), exp);
            counter.advance(exp);
            Step::Jumped(exp)
        }
    }
}
