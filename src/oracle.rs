use anyhow::{Result, anyhow, bail};
use varisat::ExtendFormula;

use crate::cnf::cnf::{Cnf, Lit};

struct VarisatOracle {
    inner: varisat::Solver<'static>,
    vars: Vec<varisat::Var>,
}

impl VarisatOracle {
    fn new(num_vars: u32) -> Self {
        let mut inner = varisat::Solver::new();
        let vars = (0..num_vars).map(|_| inner.new_var()).collect();
        Self { inner, vars }
    }

    fn to_lit(&self, lit: Lit) -> Option<varisat::Lit> {
        if lit.var == 0 {
            return None;
        }
        let var = self.vars.get(lit.var as usize - 1).copied()?;
        Some(varisat::Lit::from_var(var, lit.sign))
    }

    fn add_clause(&mut self, clause: &[Lit]) -> Result<()> {
        let mut lits = Vec::with_capacity(clause.len());
        for &lit in clause {
            let Some(mapped) = self.to_lit(lit) else {
                bail!("literal {} outside the declared variables", lit.to_dimacs());
            };
            lits.push(mapped);
        }
        self.inner.add_clause(&lits);
        Ok(())
    }

    fn model(&self) -> Option<Vec<Lit>> {
        let model = self.inner.model()?;
        let lits = self
            .vars
            .iter()
            .enumerate()
            .map(|(idx, &v)| Lit::new(idx as u32 + 1, model.contains(&v.lit(true))))
            .collect();
        Some(lits)
    }
}

fn load(cnf: &Cnf) -> Result<VarisatOracle> {
    let mut oracle = VarisatOracle::new(cnf.num_vars);
    for clause in &cnf.clauses {
        oracle.add_clause(clause)?;
    }
    Ok(oracle)
}

pub fn reference_sat(cnf: &Cnf) -> Result<bool> {
    let mut oracle = load(cnf)?;
    oracle
        .inner
        .solve()
        .map_err(|e| anyhow!("varisat failed: {:?}", e))
}

pub fn reference_model(cnf: &Cnf) -> Result<Option<Vec<Lit>>> {
    let mut oracle = load(cnf)?;
    let sat = oracle
        .inner
        .solve()
        .map_err(|e| anyhow!("varisat failed: {:?}", e))?;
    Ok(if sat { oracle.model() } else { None })
}
