use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;

const SCENARIO: &str = "offset native
# bench1 offset
2.0
4.0
# bench1 native
1.0
3.0
";

fn write_input(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn missing_input_is_a_usage_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("bench-chart")?;
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
    Ok(())
}

#[test]
fn help_lists_flags() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("bench-chart")?;
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--baseline"))
        .stdout(predicate::str::contains("--dispersion"));
    Ok(())
}

#[test]
fn summary_is_printed_and_dumped() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let input = write_input(tmp.path(), "result.dat", SCENARIO);

    let mut cmd = Command::cargo_bin("bench-chart")?;
    cmd.current_dir(tmp.path())
        .arg(&input)
        .args(["--baseline", "native", "--no-plot"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("=== bench1 ==="))
        .stdout(predicate::str::contains("1.5000"))
        .stdout(predicate::str::contains("1.0000"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("result.json"))?)?;
    assert_eq!(json["baseline"], "native");
    assert_eq!(json["dispersion"], "standard-error");
    assert_eq!(json["results"][0]["entries"][0]["mean"], 1.5);
    assert_eq!(json["results"][1]["entries"][0]["mean"], 1.0);
    assert!(!tmp.path().join("result.svg").exists());
    Ok(())
}

#[test]
fn output_dir_is_respected() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let out = tmp.path().join("out");
    fs::create_dir(&out)?;
    let input = write_input(tmp.path(), "counters.txt", "# list\nset 1\nget 2\n");

    let mut cmd = Command::cargo_bin("bench-chart")?;
    cmd.arg(&input)
        .arg("--output-dir")
        .arg(&out)
        .args(["--sum", "total=set+get", "--no-plot"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("total"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("counters.json"))?)?;
    assert_eq!(json["results"][2]["name"], "total");
    assert_eq!(json["results"][2]["entries"][0]["mean"], 3.0);
    Ok(())
}

#[test]
fn sample_before_marker_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let input = write_input(tmp.path(), "bad.dat", "1.0\n# b offset\n2.0\n");

    let mut cmd = Command::cargo_bin("bench-chart")?;
    cmd.current_dir(tmp.path()).arg(&input).args(["--layout", "headerless"]);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("sample before any marker line"));

    assert!(!tmp.path().join("bad.json").exists());
    Ok(())
}

#[test]
fn leading_sample_fails_with_detected_layout() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    for (name, content) in [("lone.dat", "1.0\n"), ("early.dat", "3.5\n# b offset\n1\n")] {
        let input = write_input(tmp.path(), name, content);

        let mut cmd = Command::cargo_bin("bench-chart")?;
        cmd.current_dir(tmp.path()).arg(&input).arg("--no-plot");
        cmd.assert()
            .code(1)
            .stderr(predicate::str::contains("line 1: sample before any marker line"));
    }

    assert!(!tmp.path().join("lone.json").exists());
    Ok(())
}

#[test]
fn non_finite_baseline_sample_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let input = write_input(tmp.path(), "inf.dat", "a b\n# x a\n1\n# x b\ninf\n");

    let mut cmd = Command::cargo_bin("bench-chart")?;
    cmd.current_dir(tmp.path())
        .arg(&input)
        .args(["--baseline", "b", "--no-plot"]);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("line 5: non-finite sample"));

    assert!(!tmp.path().join("inf.json").exists());
    Ok(())
}

#[test]
fn unknown_baseline_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let input = write_input(tmp.path(), "result.dat", SCENARIO);

    let mut cmd = Command::cargo_bin("bench-chart")?;
    cmd.current_dir(tmp.path())
        .arg(&input)
        .args(["--baseline", "jit", "--no-plot"]);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("baseline series `jit` not found"));
    Ok(())
}

#[test]
fn empty_group_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let input = write_input(tmp.path(), "empty.dat", "a b\n# x a\n# x b\n1\n");

    let mut cmd = Command::cargo_bin("bench-chart")?;
    cmd.current_dir(tmp.path()).arg(&input).arg("--no-plot");
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("no samples for series `a`"));
    Ok(())
}

#[test]
fn missing_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;

    let mut cmd = Command::cargo_bin("bench-chart")?;
    cmd.current_dir(tmp.path()).arg("nope.dat");
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("couldn't parse nope.dat"));
    Ok(())
}
