use super::bits::{BitClause, Counter};
use super::word::BitWord;
use crate::cnf::cnf::Cnf;
use crate::error::{Error, Result};
use crate::width::Width;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseStore<W> {
    width: Width,
    clauses: Vec<BitClause<W>>,
}

impl<W: BitWord> ClauseStore<W> {
    pub fn new(width: Width) -> Self {
        Self {
            width,
            clauses: Vec::new(),
        }
    }

    pub fn from_cnf(cnf: &Cnf) -> Result<Self> {
        let width = Width::for_word::<W>(cnf.num_vars)?;
        let mut store = Self::new(width);
        for clause in &cnf.clauses {
            if let Some(bad) = clause
                .iter()
                .find(|lit| lit.var == 0 || lit.var > cnf.num_vars)
            {
                return Err(Error::LiteralOutOfRange {
                    lit: bad.to_dimacs(),
                    num_vars: cnf.num_vars,
                });
            }
            store.add(BitClause::from_literals(width, clause));
        }
        Ok(store)
    }

    pub fn add(&mut self, clause: BitClause<W>) {
        debug_assert_eq!(clause.width(), self.width);
        self.clauses.push(clause);
    }

    pub fn width(&self) -> Width {
        self.width
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BitClause<W>> {
        self.clauses.iter()
    }

    pub fn find_blocking<'a>(
        &'a self,
        counter: &'a Counter<W>,
    ) -> impl Iterator<Item = &'a BitClause<W>> + 'a {
        self.clauses
            .iter()
            .filter(move |clause| clause.subsumes_counter(counter))
    }

    pub fn subsumers_of<'a>(
        &'a self,
        other: &'a BitClause<W>,
    ) -> impl Iterator<Item = &'a BitClause<W>> + 'a {
        self.clauses
            .iter()
            .filter(move |clause| clause.subsumes(other))
    }
}
