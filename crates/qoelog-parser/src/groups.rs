//! Group file (`*.gr-log`) loader
//!
//! Lines look like `runA,runB:01-Jan-2022 10:00:00,02-Jan-2022 09:30:00`.
//! Each timestamp must name exactly one entry; every group on the line is
//! added to each of them as `<file>:<group>`.

use qoelog_types::{Error, GroupRegistry, Location, LogIndex, Result, base_name, parse_log_date};
use std::path::Path;

pub fn load_group_file(index: &mut LogIndex, path: &Path) -> Result<()> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    tracing::info!(path = %path.display(), "loading group file");
    load_groups(index, &base_name(path), &text)
}

pub fn load_groups(index: &mut LogIndex, file_name: &str, text: &str) -> Result<()> {
    index.groups.register_file(file_name);

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let at = Location::new(file_name, i + 1);

        let Some((names, dates)) = line.split_once(':') else {
            return Err(Error::Sequence {
                at,
                message: format!("expected '<groups>:<dates>', found {:?}", line),
            });
        };

        let group_ids: Vec<String> = names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| GroupRegistry::composite_id(file_name, name))
            .collect();

        for date_text in dates.split(',') {
            let date_text = date_text.trim();
            let date = parse_log_date(date_text).ok_or_else(|| Error::InvalidDate {
                at: at.clone(),
                text: date_text.to_string(),
            })?;
            let target = index.lookup_unique(&date, None, &at, date_text)?;

            for id in &group_ids {
                index.entries[target].groups.insert(id.clone());
                index.groups.add(file_name, id, target);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use qoelog_types::LogEntry;

    fn date(s: &str) -> NaiveDateTime {
        parse_log_date(s).unwrap()
    }

    fn index() -> LogIndex {
        LogIndex::new(vec![
            LogEntry::new("Test", date("01-Jan-2022 10:00:00"), "a.log"),
            LogEntry::new("Test", date("02-Jan-2022 10:00:00"), "a.log"),
        ])
    }

    #[test]
    fn test_single_group() {
        let mut idx = index();
        load_groups(&mut idx, "runs.gr-log", "runA:01-Jan-2022 10:00:00\n").unwrap();

        assert!(idx.entries[0].groups.contains("runs.gr-log:runA"));
        assert!(idx.entries[1].groups.is_empty());
        assert!(
            idx.groups
                .groups_in_file("runs.gr-log")
                .unwrap()
                .contains("runs.gr-log:runA")
        );
    }

    #[test]
    fn test_many_groups_many_dates_with_comments() {
        let mut idx = index();
        let text = "# calibration runs\n\n runA, runB : 01-Jan-2022 10:00:00, 02-Jan-2022 10:00:00\n";
        load_groups(&mut idx, "runs.gr-log", text).unwrap();

        for entry in &idx.entries {
            assert_eq!(entry.groups.len(), 2);
        }
        assert_eq!(idx.groups.members("runs.gr-log:runB").unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_date_fails() {
        let mut idx = index();
        let err = load_groups(&mut idx, "runs.gr-log", "runA:03-Jan-2022 10:00:00\n").unwrap_err();

        assert!(matches!(err, Error::NotFound { at, .. } if at.line == 1));
    }

    #[test]
    fn test_duplicate_date_fails() {
        let mut idx = index();
        idx.entries
            .push(LogEntry::new("Access", date("01-Jan-2022 10:00:00"), "b.log"));

        let err = load_groups(&mut idx, "runs.gr-log", "runA:01-Jan-2022 10:00:00\n").unwrap_err();

        assert!(matches!(err, Error::AmbiguousMatch { count: 2, .. }));
    }

    #[test]
    fn test_bad_date_fails() {
        let mut idx = index();
        let err = load_groups(&mut idx, "runs.gr-log", "runA:yesterday\n").unwrap_err();

        assert!(matches!(err, Error::InvalidDate { ref text, .. } if text == "yesterday"));
    }

    #[test]
    fn test_empty_file_is_still_registered() {
        let mut idx = index();
        load_groups(&mut idx, "none.gr-log", "# nothing yet\n").unwrap();

        assert_eq!(idx.groups.files().collect::<Vec<_>>(), vec!["none.gr-log"]);
    }
}
