use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clearcount::bench::{BenchConfig, BenchRow, run_dataset, run_one};
use clearcount::solve::Engine;

fn config(engine: Engine) -> BenchConfig {
    BenchConfig {
        engine,
        seed: Some(7),
        threads: 1,
        check: true,
    }
}

#[test]
fn benchmark_csv_has_expected_shape() {
    let root = temp_dataset_dir("bench_csv_shape");
    fs::create_dir_all(root.join("nested")).expect("mkdir");

    fs::write(root.join("sat.cnf"), "p cnf 3 2\n1 -2 0\n2 3 0\n").expect("write sat");
    fs::write(root.join("nested/unsat.cnf"), "c pinned\np cnf 1 2\n1 0\n-1 0\n")
        .expect("write unsat");
    fs::write(root.join("notes.txt"), "not a formula\n").expect("write txt");

    let csv_path = root.join("results.csv");
    let rows = run_dataset(
        &root,
        config(Engine::Auto),
        Duration::from_millis(10_000),
        &csv_path,
        false,
    )
    .expect("run dataset");
    assert_eq!(rows.len(), 2);

    let csv_text = fs::read_to_string(&csv_path).expect("read csv");
    let mut lines = csv_text.lines();
    assert_eq!(lines.next(), Some(BenchRow::csv_header()));
    let data = lines.collect::<Vec<_>>();
    assert_eq!(data.len(), 2);

    for line in &data {
        let cols = line.split(',').collect::<Vec<_>>();
        assert_eq!(cols.len(), 11);
        assert_eq!(cols[1], "ok");
        assert_eq!(cols[2], "counting");
        assert_eq!(cols[3], cols[8]);
        cols[4].parse::<u128>().expect("wall_ms");
        cols[9].parse::<u128>().expect("oracle_ms");
    }
    let verdicts = rows.iter().map(|r| r.verdict.as_str()).collect::<Vec<_>>();
    assert_eq!(verdicts, vec!["unsat", "sat"]);
}

#[test]
fn oracle_time_is_reported_apart_from_search() {
    let root = temp_dataset_dir("bench_csv_oracle");
    fs::create_dir_all(&root).expect("mkdir");
    let path = root.join("pair.cnf");
    fs::write(&path, "p cnf 2 2\n1 2 0\n-1 0\n").expect("write pair");

    let unchecked = BenchConfig {
        check: false,
        ..config(Engine::Counting)
    };
    let row = run_one(&path, unchecked, Duration::from_millis(10_000));
    assert_eq!(row.status, "ok");
    assert!(row.wall_ms.is_some());
    assert_eq!(row.reference, None);
    assert_eq!(row.oracle_ms, None);
    let cols = row.to_csv_line().split(',').map(str::to_string).collect::<Vec<_>>();
    assert_eq!(cols[8], "");
    assert_eq!(cols[9], "");

    let row = run_one(&path, config(Engine::Counting), Duration::from_millis(10_000));
    assert_eq!(row.status, "ok");
    assert_eq!(row.reference, Some(true));
    assert!(row.oracle_ms.is_some());
    assert!(row.wall_ms.is_some());
}

#[test]
fn malformed_and_oversized_inputs_are_labelled() {
    let root = temp_dataset_dir("bench_csv_errors");
    fs::create_dir_all(&root).expect("mkdir");

    let broken = root.join("broken.cnf");
    fs::write(&broken, "1 2 0\n").expect("write broken");
    let row = run_one(&broken, config(Engine::Auto), Duration::from_millis(10_000));
    assert_eq!(row.status, "parse_error");
    assert!(row.wall_ms.is_some());

    let wide = root.join("wide.cnf");
    fs::write(&wide, "p cnf 70 1\n70 0\n").expect("write wide");
    let row = run_one(&wide, config(Engine::Counting), Duration::from_millis(10_000));
    assert_eq!(row.status, "width_error");
    assert_eq!(row.vars, Some(70));

    let row = run_one(&wide, config(Engine::Auto), Duration::from_millis(10_000));
    assert_eq!(row.status, "ok");
    assert_eq!(row.engine, "wide");
    assert_eq!(row.verdict, "sat");
}

#[test]
fn partitioned_rows_repeat_under_fixed_seed() {
    let root = temp_dataset_dir("bench_csv_seed");
    fs::create_dir_all(&root).expect("mkdir");
    let path = root.join("chain.cnf");
    fs::write(&path, "p cnf 12 4\n-1 2 0\n-2 3 0\n-3 4 0\n1 5 0\n").expect("write chain");

    let cfg = config(Engine::Partitioned);
    let a = run_one(&path, cfg, Duration::from_millis(10_000));
    let b = run_one(&path, cfg, Duration::from_millis(10_000));
    assert_eq!(a.status, b.status);
    assert_eq!(a.engine, "partitioned");
    assert_eq!(a.verdict, b.verdict);
    assert_eq!(a.steps, b.steps);
}

fn temp_dataset_dir(tag: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    p.push(format!("clearcount_{}_{}", tag, t));
    p
}
