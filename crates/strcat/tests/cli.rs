use std::process::{Command, Output};

fn strcat(args: &[&str]) -> Output {
    strcat_with_env(args, &[])
}

fn strcat_with_env(args: &[&str], vars: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_strcat"))
        .args(args)
        .env_remove("STRCAT_BENCH")
        .env_remove("STRCAT_BENCHTIME")
        .env_remove("STRCAT_COUNT")
        .env_remove("STRCAT_SIZES")
        .env_remove("RUST_LOG")
        .envs(vars.iter().copied())
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run strcat")
}

fn benchmark_names(output: &Output) -> Vec<String> {
    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    results
        .as_array()
        .unwrap()
        .iter()
        .map(|result| result["name"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_json_report_for_selected_benchmarks() {
    let output = strcat(&["--bench", "10$", "--benchtime", "3x", "--json", "-q"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 4);

    for result in results {
        let name = result["name"].as_str().unwrap();
        assert!(name.starts_with("Benchmark"));
        assert!(name.contains("10"));
        assert_eq!(result["iterations"], 3);
        assert!(result["allocs_per_op"].is_u64());
        assert!(result["bytes_per_op"].is_u64());
    }
}

#[test]
fn test_text_report_layout() {
    let output = strcat(&["--bench", "Join", "--sizes", "10,100", "--benchtime", "2x", "-q"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();

    assert!(lines[0].starts_with("os: "));
    assert!(lines[1].starts_with("arch: "));
    assert_eq!(lines[2], "pkg: strcat");
    assert!(lines[3].starts_with("BenchmarkJoin10"));
    assert!(lines[4].starts_with("BenchmarkJoin100"));
    for line in &lines[3..5] {
        assert!(line.contains(" ns/op"));
        assert!(line.contains(" B/op"));
        assert!(line.ends_with(" allocs/op"));
    }
    assert_eq!(lines[5], "PASS");
    assert!(lines[6].starts_with("ok"));
}

#[test]
fn test_empty_selection_still_passes() {
    let output = strcat(&["--bench", "NoSuchStrategy", "-q"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("PASS"));
    assert!(!stdout.contains("ns/op"));
}

#[test]
fn test_invalid_benchtime_fails() {
    let output = strcat(&["--benchtime", "fast"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid benchtime"));
}

#[test]
fn test_invalid_pattern_fails() {
    let output = strcat(&["--bench", "(", "-q"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid benchmark selection"));
}

#[test]
fn test_bad_env_variable_does_not_discard_the_others() {
    let output = strcat_with_env(
        &["--benchtime", "1x", "--sizes", "10", "--json"],
        &[("STRCAT_BENCH", "Join"), ("STRCAT_SIZES", "10,abc")],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let names = benchmark_names(&output);
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("BenchmarkJoin10"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Ignoring STRCAT_SIZES"));
}

#[test]
fn test_zero_count_from_env_is_ignored() {
    let output = strcat_with_env(
        &["--bench", "Writer", "--benchtime", "1x", "--sizes", "10", "--json"],
        &[("STRCAT_COUNT", "0")],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    assert_eq!(benchmark_names(&output).len(), 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Ignoring STRCAT_COUNT"));
}

#[test]
fn test_env_sizes_apply_without_flags() {
    let output = strcat_with_env(
        &["--bench", "ByteBuffer", "--benchtime", "1x", "--json"],
        &[("STRCAT_SIZES", "3,7")],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let names = benchmark_names(&output);
    assert_eq!(names.len(), 2);
    assert!(names[0].starts_with("BenchmarkByteBuffer3"));
    assert!(names[1].starts_with("BenchmarkByteBuffer7"));
}
