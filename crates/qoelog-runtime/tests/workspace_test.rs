use qoelog_engine::{Criterion, UpdateMode};
use qoelog_runtime::{Config, Error, FileOutcome, LogWorkspace, Result, VersionControl};
use qoelog_testing::{PacketBuilder, TestWorld, log_text};
use std::collections::BTreeSet;
use std::path::Path;

const FIRST: &str = "01-Jan-2022 10:00:00";
const SECOND: &str = "02-Jan-2022 10:00:00";
const THIRD: &str = "03-Jan-2022 10:00:00";

fn world() -> TestWorld {
    TestWorld::new()
        .with_log(
            "run.log",
            &log_text(&[
                PacketBuilder::new("Test", FIRST).field("MOS", "4.5").git_hash("aaa"),
                PacketBuilder::new("Test", SECOND).field("MOS", "3.1").git_hash("bbb dty"),
                PacketBuilder::new("Access", THIRD).git_hash("ccc").incomplete(),
            ]),
        )
        .with_data_file("data/csv/capture_Test_01-Jan-2022_10-00-00.csv")
        .with_data_file("data/csv/capture_Test_02-Jan-2022_10-00-00.csv")
}

#[test]
fn test_open_uses_configured_modes() -> Result<()> {
    let world = world();
    let mut config = Config::default();
    config.search.update_mode = UpdateMode::Or;

    let mut ws = LogWorkspace::open_path(world.log_dir(), config)?;
    ws.search_mut().quick_search("MOS", Criterion::pattern("^4"))?;
    ws.search_mut().quick_search("MOS", Criterion::pattern("^3"))?;

    assert_eq!(ws.search().found().len(), 2);
    assert_eq!(ws.search().len(), 3);
    Ok(())
}

#[test]
fn test_resolve_found_entries() -> Result<()> {
    let world = world();
    let mut ws = LogWorkspace::open_path(world.log_dir(), Config::default())?;
    ws.search_mut().multi_search(&Default::default())?;

    let resolved = ws.resolve_files("csv", false)?;

    assert_eq!(resolved.len(), 3);
    assert_eq!(resolved[0].outcome.files().len(), 1);
    assert_eq!(resolved[1].outcome.files().len(), 1);
    assert_eq!(resolved[2].outcome, FileOutcome::Incomplete);

    let forced = ws.resolve_files("csv", true)?;
    assert_eq!(forced[2].outcome, FileOutcome::NoMatch);
    Ok(())
}

#[test]
fn test_sync_into_local_cache() -> Result<()> {
    let world = world();
    let mut ws = LogWorkspace::open_path(world.log_dir(), Config::default())?;
    ws.search_mut().quick_search("operation", Criterion::pattern("Test"))?;

    let local = world.temp_dir().join("cache");
    let report = ws.sync(&local, "csv")?;

    assert_eq!(report.copied.len(), 2);
    assert_eq!(report.files.len(), 2);
    assert!(report.files.iter().all(|f| f.starts_with(&local)));

    let again = ws.sync(&local, "csv")?;
    assert!(again.copied.is_empty());
    Ok(())
}

#[test]
fn test_unknown_file_type() -> Result<()> {
    let world = world();
    let mut ws = LogWorkspace::open_path(world.log_dir(), Config::default())?;
    ws.search_mut().multi_search(&Default::default())?;

    assert!(matches!(
        ws.resolve_files("flac", false),
        Err(Error::UnknownFileType(_))
    ));
    Ok(())
}

/// Every hash is its own commit; `aaa` precedes `bbb` precedes `ccc`
struct History;

impl VersionControl for History {
    fn resolve_commit(&self, _repo: &Path, rev: &str) -> Result<String> {
        Ok(rev.to_string())
    }

    fn verify_object(&self, _repo: &Path, _hash: &str) -> Result<()> {
        Ok(())
    }

    fn merge_base(&self, _repo: &Path, a: &str, b: &str) -> Result<String> {
        Ok(a.min(b).to_string())
    }

    fn clone_repo(&self, _url: &str, _dest: &Path) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_ancestry_folds_into_found_set() -> Result<()> {
    let world = world();
    let mut ws = LogWorkspace::open_path(world.log_dir(), Config::default())?;
    ws.search_mut().quick_search("operation", Criterion::pattern("Test"))?;
    ws.search_mut().update_mode = UpdateMode::And;

    let matches = ws.filter_ancestors_with(&History, "bbb", "/repo")?;

    assert_eq!(matches, BTreeSet::from([0, 1]));
    assert_eq!(ws.search().found(), &BTreeSet::from([0, 1]));

    ws.filter_ancestors_with(&History, "aaa", "/repo")?;
    assert_eq!(ws.search().found(), &BTreeSet::from([0]));
    Ok(())
}
