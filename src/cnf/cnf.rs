#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit {
    pub var: u32,
    pub sign: bool,
}

impl Lit {
    pub fn new(var: u32, sign: bool) -> Self {
        Self { var, sign }
    }

    pub fn neg(self) -> Self {
        Self {
            var: self.var,
            sign: !self.sign,
        }
    }

    pub fn from_dimacs(value: i64) -> Self {
        debug_assert!(value != 0, "0 is the clause terminator, not a literal");
        Self {
            var: value.unsigned_abs() as u32,
            sign: value > 0,
        }
    }

    pub fn to_dimacs(self) -> i64 {
        let v = i64::from(self.var);
        if self.sign { v } else { -v }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cnf {
    pub num_vars: u32,
    pub clauses: Vec<Vec<Lit>>,
}

impl Cnf {
    pub fn new(num_vars: u32) -> Self {
        Self {
            num_vars,
            clauses: Vec::new(),
        }
    }

    pub fn add_clause(&mut self, clause: Vec<Lit>) {
        self.clauses.push(clause);
    }

    pub fn max_clause_width(&self) -> usize {
        self.clauses.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn eval_lit_partial(lit: Lit, assignment: &[Option<bool>]) -> Option<bool> {
        let var = lit.var as usize;
        if var >= assignment.len() {
            return None;
        }
        assignment[var].map(|v| if lit.sign { v } else { !v })
    }

    pub fn eval_clause_partial(clause: &[Lit], assignment: &[Option<bool>]) -> Option<bool> {
        let mut any_unknown = false;
        for &lit in clause {
            match Self::eval_lit_partial(lit, assignment) {
                Some(true) => return Some(true),
                Some(false) => {}
                None => any_unknown = true,
            }
        }
        if any_unknown { None } else { Some(false) }
    }

    pub fn eval_formula_partial(&self, assignment: &[Option<bool>]) -> Option<bool> {
        let mut all_true = true;
        for clause in &self.clauses {
            match Self::eval_clause_partial(clause, assignment) {
                Some(true) => {}
                Some(false) => return Some(false),
                None => all_true = false,
            }
        }
        if all_true { Some(true) } else { None }
    }

    pub fn is_satisfied_by(&self, model: &[Lit]) -> bool {
        let mut assignment = vec![None; self.num_vars as usize + 1];
        for lit in model {
            let var = lit.var as usize;
            if var < assignment.len() {
                assignment[var] = Some(lit.sign);
            }
        }
        self.eval_formula_partial(&assignment) == Some(true)
    }

    pub fn brute_force_sat(&self) -> bool {
        let n = self.num_vars;
        debug_assert!(n < 32, "brute force over {n} variables");
        (0u64..1u64 << n).any(|bits| {
            let mut assignment = vec![None; n as usize + 1];
            for var in 1..=n {
                assignment[var as usize] = Some((bits >> (var - 1)) & 1 == 1);
            }
            self.eval_formula_partial(&assignment) == Some(true)
        })
    }
}
