use std::io::BufRead;

use anyhow::{Context, Result, bail};
use log::warn;

use super::cnf::{Cnf, Lit};

pub fn to_dimacs(cnf: &Cnf) -> String {
    let mut out = String::new();
    out.push_str(&format!("p cnf {} {}\n", cnf.num_vars, cnf.clauses.len()));
    for clause in &cnf.clauses {
        for &lit in clause {
            out.push_str(&format!("{} ", lit.to_dimacs()));
        }
        out.push_str("0\n");
    }
    out
}

pub fn parse_dimacs_str(s: &str) -> Result<Cnf> {
    parse_dimacs_reader(std::io::Cursor::new(s.as_bytes()))
}

pub fn parse_dimacs_reader<R: BufRead>(r: R) -> Result<Cnf> {
    let mut header = None::<(u32, usize)>;
    let mut clauses = Vec::<Vec<Lit>>::new();

    for (idx, line) in r.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read line {}", line_no))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(['c', '%', '0']) {
            continue;
        }
        if line.starts_with('p') {
            if header.is_some() {
                bail!("duplicate problem line on line {}", line_no);
            }
            header = Some(parse_header(line, line_no)?);
            continue;
        }
        let Some((num_vars, _)) = header else {
            bail!("clause on line {} precedes the problem line", line_no);
        };
        clauses.push(parse_clause(line, line_no, num_vars)?);
    }

    let Some((num_vars, declared)) = header else {
        bail!("missing problem line, expected: p cnf VARS CLAUSES");
    };
    if declared != clauses.len() {
        warn!(
            "problem line declares {} clauses, found {}",
            declared,
            clauses.len()
        );
    }
    Ok(Cnf { num_vars, clauses })
}

fn parse_header(line: &str, line_no: usize) -> Result<(u32, usize)> {
    let parts = line.split_whitespace().collect::<Vec<_>>();
    if parts.len() != 4 || parts[0] != "p" || parts[1] != "cnf" {
        bail!("invalid problem line {}, expected: p cnf VARS CLAUSES", line_no);
    }
    let vars = parts[2]
        .parse::<u32>()
        .with_context(|| format!("invalid variable count on line {}: {}", line_no, parts[2]))?;
    let clauses = parts[3]
        .parse::<usize>()
        .with_context(|| format!("invalid clause count on line {}: {}", line_no, parts[3]))?;
    Ok((vars, clauses))
}

fn parse_clause(line: &str, line_no: usize, num_vars: u32) -> Result<Vec<Lit>> {
    let mut clause = Vec::new();
    for token in line.split_whitespace() {
        let value = token
            .parse::<i64>()
            .with_context(|| format!("invalid literal on line {}: {}", line_no, token))?;
        if value == 0 {
            break;
        }
        if value.unsigned_abs() > u64::from(num_vars) {
            bail!(
                "literal {} on line {} exceeds declared variable count {}",
                value,
                line_no,
                num_vars
            );
        }
        clause.push(Lit::from_dimacs(value));
    }
    Ok(clause)
}

#[cfg(test)]
mod tests {
    use super::{parse_dimacs_str, to_dimacs};
    use crate::cnf::cnf::Lit;

    #[test]
    fn parse_small_satlib_file() {
        let src = "\
c tiny instance
p cnf 3 2
 1 -3 0
2 3 -1 0
%
0
";
        let cnf = match parse_dimacs_str(src) {
            Ok(v) => v,
            Err(e) => panic!("parse failed: {e}"),
        };
        assert_eq!(cnf.num_vars, 3);
        assert_eq!(cnf.clauses.len(), 2);
        assert_eq!(cnf.clauses[0], vec![Lit::new(1, true), Lit::new(3, false)]);
        assert_eq!(cnf.clauses[1][2], Lit::new(1, false));
    }

    #[test]
    fn writer_output_parses_back() {
        let src = "p cnf 2 2\n1 -2 0\n-1 0\n";
        let cnf = parse_dimacs_str(src).expect("parse");
        assert_eq!(to_dimacs(&cnf), src);
    }

    #[test]
    fn rejects_out_of_range_literal() {
        let err = parse_dimacs_str("p cnf 2 1\n1 3 0\n").expect_err("must fail");
        assert!(err.to_string().contains("exceeds declared variable count"));
    }

    #[test]
    fn rejects_missing_header() {
        assert!(parse_dimacs_str("c nothing here\n").is_err());
        assert!(parse_dimacs_str("1 2 0\np cnf 2 1\n").is_err());
    }

    #[test]
    fn rejects_garbage_tokens() {
        let err = parse_dimacs_str("p cnf 2 1\n1 x 0\n").expect_err("must fail");
        assert!(err.to_string().contains("line 2"));
    }
}
