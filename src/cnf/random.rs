use anyhow::{Result, bail};
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::cnf::{Cnf, Lit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomCnfConfig {
    pub vars: u32,
    pub clauses: usize,
    pub k: usize,
    pub seed: u64,
    pub planted: bool,
}

pub fn random_kcnf(cfg: &RandomCnfConfig) -> Result<Cnf> {
    if cfg.k == 0 {
        bail!("k must be >= 1");
    }
    if cfg.k > cfg.vars as usize {
        bail!("k={} exceeds the variable count {}", cfg.k, cfg.vars);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let hidden = (0..cfg.vars).map(|_| rng.random::<bool>()).collect::<Vec<_>>();

    let mut cnf = Cnf::new(cfg.vars);
    while cnf.clauses.len() < cfg.clauses {
        let clause = sample(&mut rng, cfg.vars as usize, cfg.k)
            .into_iter()
            .map(|idx| Lit::new(idx as u32 + 1, rng.random::<bool>()))
            .collect::<Vec<_>>();
        if cfg.planted && !clause.iter().any(|lit| hidden[lit.var as usize - 1] == lit.sign) {
            continue;
        }
        cnf.add_clause(clause);
    }
    Ok(cnf)
}

#[cfg(test)]
mod tests {
    use super::{RandomCnfConfig, random_kcnf};

    #[test]
    fn same_seed_same_formula() {
        let cfg = RandomCnfConfig {
            vars: 12,
            clauses: 40,
            k: 3,
            seed: 9,
            planted: false,
        };
        let a = random_kcnf(&cfg).expect("gen");
        let b = random_kcnf(&cfg).expect("gen");
        assert_eq!(a, b);
        assert_eq!(a.clauses.len(), 40);
        assert!(a.clauses.iter().all(|c| c.len() == 3));
    }

    #[test]
    fn planted_formula_is_satisfiable() {
        let cfg = RandomCnfConfig {
            vars: 10,
            clauses: 80,
            k: 3,
            seed: 3,
            planted: true,
        };
        let cnf = random_kcnf(&cfg).expect("gen");
        assert!(cnf.brute_force_sat());
    }

    #[test]
    fn rejects_oversized_k() {
        let cfg = RandomCnfConfig {
            vars: 2,
            clauses: 1,
            k: 3,
            seed: 0,
            planted: false,
        };
        assert!(random_kcnf(&cfg).is_err());
    }
}
