use num_bigint::BigUint;

use super::{SearchOptions, SearchOutcome, counting};
use crate::clause::{BitClause, ClauseStore};
use crate::cnf::cnf::Cnf;
use crate::error::Result;

pub type WideClause = BitClause<BigUint>;
pub type WideStore = ClauseStore<BigUint>;

pub fn search_wide(store: &WideStore, options: &SearchOptions) -> Result<SearchOutcome<BigUint>> {
    counting::search(store, options)
}

pub fn solve_wide(cnf: &Cnf, options: &SearchOptions) -> Result<SearchOutcome<BigUint>> {
    let store = WideStore::from_cnf(cnf)?;
    search_wide(&store, options)
}
