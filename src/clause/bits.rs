use std::fmt;

use super::word::BitWord;
use crate::cnf::cnf::Lit;
use crate::width::Width;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitClause<W> {
    presence: W,
    polarity: W,
    width: Width,
}

impl<W: BitWord> BitClause<W> {
    pub fn empty(width: Width) -> Self {
        Self {
            presence: W::zero(),
            polarity: W::zero(),
            width,
        }
    }

    pub fn from_literals(width: Width, lits: &[Lit]) -> Self {
        let mut clause = Self::empty(width);
        for &lit in lits {
            clause.set_literal(lit);
        }
        clause
    }

    pub fn clear(width: Width, polarity: W) -> Self {
        let presence = W::low_ones(width.num_vars());
        let polarity = polarity.and(&presence);
        Self {
            presence,
            polarity,
            width,
        }
    }

    pub fn width(&self) -> Width {
        self.width
    }

    pub fn presence(&self) -> &W {
        &self.presence
    }

    pub fn polarity(&self) -> &W {
        &self.polarity
    }

    // conflicting signs for one variable are not detected, positive wins
    pub fn set_literal(&mut self, lit: Lit) {
        let pos = self.width.bit_of(lit.var);
        self.presence.set_bit(pos);
        if lit.sign {
            self.polarity.set_bit(pos);
        }
    }

    pub fn negate(&self) -> Self {
        Self {
            presence: self.presence.clone(),
            polarity: self.presence.and_not(&self.polarity),
            width: self.width,
        }
    }

    pub fn subsumes(&self, other: &Self) -> bool {
        if self.presence > other.presence {
            return false;
        }
        let common = self.presence.and(&other.presence);
        self.polarity.and(&common) == other.polarity.and(&common)
    }

    pub fn subsumes_counter(&self, counter: &Counter<W>) -> bool {
        counter
            .value()
            .masked_eq(&self.presence, &self.polarity)
    }

    pub fn trailing_free_bits(&self) -> u32 {
        let n = self.width.num_vars();
        self.presence.lowest_set_bit().map_or(n, |pos| pos.min(n))
    }

    pub fn is_clear(&self) -> bool {
        self.presence == W::low_ones(self.width.num_vars())
    }

    pub fn len(&self) -> usize {
        (0..self.width.num_vars())
            .filter(|&pos| self.presence.bit(pos))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.presence == W::zero()
    }

    pub fn literals(&self) -> Vec<Lit> {
        let n = self.width.num_vars();
        (0..n)
            .rev()
            .filter(|&pos| self.presence.bit(pos))
            .map(|pos| Lit::new(self.width.var_at(pos), self.polarity.bit(pos)))
            .collect()
    }
}

impl<W: BitWord> fmt::Display for BitClause<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lit in self.literals() {
            write!(f, "{} ", lit.to_dimacs())?;
        }
        write!(f, "0")
    }
}

// counter presence also covers the sentinel bit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter<W> {
    inner: BitClause<W>,
}

impl<W: BitWord> Counter<W> {
    pub fn new(width: Width) -> Self {
        Self::starting_at(width, W::zero())
    }

    pub fn starting_at(width: Width, value: W) -> Self {
        Self {
            inner: BitClause {
                presence: W::low_ones(width.counter_bits()),
                polarity: value,
                width,
            },
        }
    }

    pub fn value(&self) -> &W {
        &self.inner.polarity
    }

    pub fn width(&self) -> Width {
        self.inner.width
    }

    pub fn as_clause(&self) -> &BitClause<W> {
        &self.inner
    }

    pub fn advance(&mut self, exp: u32) {
        self.inner.polarity.add_pow2(exp);
    }

    pub fn retreat(&mut self, exp: u32) -> bool {
        self.inner.polarity.sub_pow2(exp)
    }

    pub fn is_exhausted(&self) -> bool {
        self.inner.polarity.reached_limit(self.inner.width.num_vars())
    }

    pub fn reached(&self, bound: &W) -> bool {
        self.inner.polarity >= *bound
    }

    pub fn solution(&self) -> BitClause<W> {
        BitClause::clear(self.inner.width, self.inner.polarity.clone()).negate()
    }
}
