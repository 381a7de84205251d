mod common;

use common::{measurement_world, qoelog};
use predicates::prelude::*;
use qoelog_testing::assertions::{assert_all_fields, assert_found_count, found_indices};
use serde_json::json;

#[test]
fn test_search_without_criteria_lists_everything() -> anyhow::Result<()> {
    let world = measurement_world();
    let log_dir = world.log_dir().to_string_lossy().to_string();

    let result = world.run(&["--format", "json", "search", &log_dir])?;

    assert!(result.success(), "stderr: {}", result.stderr());
    let json = result.json()?;
    assert_eq!(json["total"], 3);
    assert_found_count(&json, 3)?;
    Ok(())
}

#[test]
fn test_where_and_flag_criteria() -> anyhow::Result<()> {
    let world = measurement_world();
    let log_dir = world.log_dir().to_string_lossy().to_string();

    let result = world.run(&[
        "--format",
        "json",
        "search",
        &log_dir,
        "--where",
        "operation=Test",
        "--where",
        "error=false",
    ])?;

    let json = result.json()?;
    assert_eq!(found_indices(&json)?, vec![0]);
    assert_all_fields(&json, "operation", &json!("Test"))?;
    Ok(())
}

#[test]
fn test_addendum_and_groups_are_applied() -> anyhow::Result<()> {
    let world = measurement_world();
    let log_dir = world.log_dir().to_string_lossy().to_string();

    let result = world.run(&[
        "--format",
        "json",
        "search",
        &log_dir,
        "--in-group",
        "runs.gr-log:runA",
        "--after",
        "02-Jan-2022 00:00:00",
    ])?;

    let json = result.json()?;
    assert_eq!(found_indices(&json)?, vec![2]);
    assert_all_fields(&json, "MOS", &json!("2.2"))?;
    assert_all_fields(&json, "amendedBy", &json!("session.ad-log"))?;
    Ok(())
}

#[test]
fn test_argument_search_and_show() -> anyhow::Result<()> {
    let world = measurement_world();
    let log_dir = world.log_dir().to_string_lossy().to_string();

    let result = world.run(&[
        "--format",
        "json",
        "search",
        &log_dir,
        "--arg",
        "trials=100",
        "--show-arg",
        "audio",
    ])?;

    let json = result.json()?;
    assert_eq!(found_indices(&json)?, vec![0]);
    assert_eq!(json["found"][0]["argument"], json!("a.wav"));
    Ok(())
}

#[test]
fn test_string_mode_xor() -> anyhow::Result<()> {
    let world = measurement_world();
    let log_dir = world.log_dir().to_string_lossy().to_string();

    let result = world.run(&[
        "--format",
        "json",
        "search",
        &log_dir,
        "--where",
        "MOS=^4",
        "--where",
        r"MOS=\.5$",
        "--string-mode",
        "xor",
    ])?;

    assert_found_count(&result.json()?, 0)?;
    Ok(())
}

#[test]
fn test_plain_output_summary() -> anyhow::Result<()> {
    let world = measurement_world();
    let log_dir = world.log_dir().to_string_lossy().to_string();

    let result = world.run(&["search", &log_dir, "--where", "operation=Access"])?;

    assert!(result.success());
    assert!(result.stdout().contains("03-Jan-2022 10:00:00"));
    assert!(result.stdout().contains("1 of 3 entries"));
    Ok(())
}

#[test]
fn test_fields_lists_free_form_names() -> anyhow::Result<()> {
    let world = measurement_world();
    let log_dir = world.log_dir().to_string_lossy().to_string();

    let result = world.run(&["--format", "json", "fields", &log_dir])?;

    let json = result.json()?;
    insta::assert_json_snapshot!(json, @r#"
    [
      "Arguments",
      "Git Hash",
      "MOS",
      "_Arguments",
      "amendedBy",
      "complete",
      "date",
      "error",
      "error_notes",
      "groups",
      "logFile",
      "operation",
      "pre_notes"
    ]
    "#);
    Ok(())
}

#[test]
fn test_strict_policy_fails_on_malformed_log() {
    let world = measurement_world().with_log(
        "broken.log",
        ">>Test started at 04-Jan-2022 10:00:00\n\tMOS:1.0\n===Bogus===\n",
    );

    let mut cmd = qoelog(&world);
    cmd.args(["search"])
        .arg(world.log_dir())
        .args(["--policy", "error"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("broken.log"));
}

#[test]
fn test_policy_from_config_file() {
    let world = measurement_world()
        .with_log(
            "broken.log",
            ">>Test started at 04-Jan-2022 10:00:00\n\tMOS:1.0\n===Bogus===\n",
        )
        .with_config("[search]\nparse_policy = \"error\"\n");

    let mut cmd = qoelog(&world);
    cmd.arg("search").arg(world.log_dir());

    cmd.assert().failure().stderr(predicate::str::contains("line 3"));
}

#[test]
fn test_bad_where_is_reported() {
    let world = measurement_world();

    let mut cmd = qoelog(&world);
    cmd.arg("search")
        .arg(world.log_dir())
        .args(["--where", "MOS"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--where expects NAME=VALUE"));
}
