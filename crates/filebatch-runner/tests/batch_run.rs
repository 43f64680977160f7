use std::fs;
use std::path::Path;

use anyhow::Result;
use filebatch_config::OutputFormat;
use filebatch_runner::{BatchRunner, RunPlan, RunnerError};
use filebatch_telemetry::LogHandle;
use filebatch_test_support::{file_names, set_modified_ago, temp_dir, write_file};

fn plan(output_root: &Path, run_id: u64, max_commands: usize) -> RunPlan {
    RunPlan {
        run_id,
        output_root: output_root.to_path_buf(),
        max_commands,
        max_retained: 10,
        same_dir: false,
        format: OutputFormat::Csv,
    }
}

fn run(plan: RunPlan, script: &Path) -> Result<filebatch_runner::RunSummary> {
    Ok(BatchRunner::new(plan, LogHandle::disabled()).run(script)?)
}

fn read(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

#[test]
fn command_cap_limits_records() -> Result<()> {
    let temp = temp_dir("filebatch-batch-")?;
    let work = temp.path().join("work");
    fs::create_dir_all(&work)?;
    let dir = work.display().to_string();
    let script = write_file(
        temp.path(),
        "script.txt",
        format!("Count {dir}\nList {dir}\nCount {dir}\nList {dir}\nCount {dir}\n").as_bytes(),
    )?;
    let output = temp.path().join("out");

    let summary = run(plan(&output, 1, 2), &script)?;
    assert_eq!(summary.executed, 2);
    assert_eq!(summary.passed, 2);
    assert!(summary.stopped_early);
    assert_eq!(
        read(&output.join("Passed").join("PASSED1.csv"))?,
        "Count,Success\nList,Success\n"
    );
    assert!(file_names(&output.join("Failed"))?.is_empty());
    Ok(())
}

#[test]
fn trailing_blank_lines_do_not_count_as_cut_off() -> Result<()> {
    let temp = temp_dir("filebatch-batch-")?;
    let work = temp.path().join("work");
    fs::create_dir_all(&work)?;
    let dir = work.display().to_string();
    let script = write_file(
        temp.path(),
        "script.txt",
        format!("Count {dir}\nList {dir}\n\n   \n").as_bytes(),
    )?;
    let output = temp.path().join("out");

    let summary = run(plan(&output, 1, 2), &script)?;
    assert_eq!(summary.executed, 2);
    assert!(!summary.stopped_early);
    Ok(())
}

#[test]
fn malformed_and_blank_lines_are_skipped() -> Result<()> {
    let temp = temp_dir("filebatch-batch-")?;
    let work = temp.path().join("work");
    fs::create_dir_all(&work)?;
    let dir = work.display().to_string();
    let script = write_file(
        temp.path(),
        "script.txt",
        format!("\n   \nShred {dir}\nCount\nCategorize {dir} lots\nCount {dir}\n").as_bytes(),
    )?;
    let output = temp.path().join("out");

    let summary = run(plan(&output, 4, 5), &script)?;
    assert_eq!(summary.executed, 1);
    assert_eq!(summary.skipped, 3);
    assert!(!summary.stopped_early);
    assert_eq!(file_names(&output.join("Passed"))?, vec!["PASSED4.csv"]);
    assert_eq!(
        read(&output.join("Passed").join("PASSED4.csv"))?,
        "Count,Success\n"
    );
    Ok(())
}

#[test]
fn missing_file_is_recorded_as_failure() -> Result<()> {
    let temp = temp_dir("filebatch-batch-")?;
    let work = temp.path().join("dirA");
    fs::create_dir_all(&work)?;
    let script = write_file(
        temp.path(),
        "script.txt",
        format!("Delete ghost.txt {}\n", work.display()).as_bytes(),
    )?;
    let output = temp.path().join("out");

    let summary = run(plan(&output, 9, 5), &script)?;
    assert_eq!(summary.executed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(
        read(&output.join("Failed").join("FAILED9.csv"))?,
        "Delete,Failure\n"
    );
    assert!(file_names(&output.join("Passed"))?.is_empty());
    Ok(())
}

#[test]
fn log_format_in_shared_directory() -> Result<()> {
    let temp = temp_dir("filebatch-batch-")?;
    let work = temp.path().join("work");
    write_file(&work, "keep.txt", b"x")?;
    let script = write_file(
        temp.path(),
        "script.txt",
        format!(
            "Count {dir}\nSort {dir} colour\nMv_last {dir} {dir}\n",
            dir = work.display()
        )
        .as_bytes(),
    )?;
    let output = temp.path().join("out");
    let mut plan = plan(&output, 2, 5);
    plan.same_dir = true;
    plan.format = OutputFormat::Log;

    let summary = run(plan, &script)?;
    assert_eq!(summary.executed, 3);
    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(file_names(&output)?, vec!["FAILED2.log", "PASSED2.log"]);
    assert_eq!(
        read(&output.join("PASSED2.log"))?,
        "Count: Success\nMv_last: Success\n"
    );
    assert_eq!(read(&output.join("FAILED2.log"))?, "Sort: Failure\n");
    Ok(())
}

#[test]
fn retention_keeps_newest_artifacts() -> Result<()> {
    let temp = temp_dir("filebatch-batch-")?;
    let work = temp.path().join("work");
    fs::create_dir_all(&work)?;
    let output = temp.path().join("out");
    let passed = output.join("Passed");
    for (index, age) in [(1_u64, 3_000_u64), (2, 2_000), (3, 1_000)] {
        let path = write_file(&passed, &format!("PASSED{index}.csv"), b"Count,Success\n")?;
        set_modified_ago(&path, age)?;
    }
    let script = write_file(
        temp.path(),
        "script.txt",
        format!("Count {}\n", work.display()).as_bytes(),
    )?;
    let mut plan = plan(&output, 4, 5);
    plan.max_retained = 2;

    let summary = run(plan, &script)?;
    assert_eq!(summary.evicted, 2);
    assert_eq!(file_names(&passed)?, vec!["PASSED3.csv", "PASSED4.csv"]);
    Ok(())
}

#[test]
fn zero_cap_executes_nothing() -> Result<()> {
    let temp = temp_dir("filebatch-batch-")?;
    let work = temp.path().join("work");
    let doomed = write_file(&work, "doomed.txt", b"x")?;
    let script = write_file(
        temp.path(),
        "script.txt",
        format!("Delete doomed.txt {}\n", work.display()).as_bytes(),
    )?;
    let output = temp.path().join("out");

    let summary = run(plan(&output, 1, 0), &script)?;
    assert_eq!(summary.executed, 0);
    assert!(summary.stopped_early);
    assert!(doomed.exists());
    assert!(file_names(&output.join("Passed"))?.is_empty());
    Ok(())
}

#[test]
fn missing_script_is_an_infrastructure_error() -> Result<()> {
    let temp = temp_dir("filebatch-batch-")?;
    let output = temp.path().join("out");
    let result = BatchRunner::new(plan(&output, 1, 5), LogHandle::disabled())
        .run(&temp.path().join("absent.txt"));
    let Err(err) = result else {
        anyhow::bail!("expected the run to fail");
    };
    assert_eq!(err.operation(), "script.open");
    assert!(matches!(err, RunnerError::Io { .. }));
    Ok(())
}
