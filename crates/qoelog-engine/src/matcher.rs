use qoelog_types::{FieldValue, LogEntry, LogIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::criteria::{Compiled, Criteria, Criterion};
use crate::error::Result;

/// How several patterns for one text field combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringSearchMode {
    /// Every pattern must match
    And,
    /// At least one pattern must match
    #[default]
    Or,
    /// Exactly one pattern must match
    Xor,
}

impl fmt::Display for StringSearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringSearchMode::And => write!(f, "and"),
            StringSearchMode::Or => write!(f, "or"),
            StringSearchMode::Xor => write!(f, "xor"),
        }
    }
}

impl FromStr for StringSearchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(StringSearchMode::And),
            "or" => Ok(StringSearchMode::Or),
            "xor" => Ok(StringSearchMode::Xor),
            _ => Err(format!("invalid string search mode '{}'", s)),
        }
    }
}

/// Indices of all entries matching every criterion
pub fn match_entries(
    index: &LogIndex,
    criteria: &Criteria,
    mode: StringSearchMode,
) -> Result<BTreeSet<usize>> {
    let compiled = criteria.compile()?;
    Ok(index
        .iter()
        .enumerate()
        .filter(|(_, entry)| {
            compiled
                .iter()
                .all(|(field, criterion)| field_matches(entry, field, criterion, mode))
        })
        .map(|(i, _)| i)
        .collect())
}

fn field_matches(
    entry: &LogEntry,
    field: &str,
    criterion: &Compiled<'_>,
    mode: StringSearchMode,
) -> bool {
    match criterion {
        Compiled::Before(date) => entry.date < *date,
        Compiled::After(date) => entry.date > *date,
        _ => match entry.field(field) {
            None => false,
            Some(value) => value_matches(value, criterion, mode),
        },
    }
}

fn value_matches(value: FieldValue<'_>, criterion: &Compiled<'_>, mode: StringSearchMode) -> bool {
    match (value, criterion) {
        (FieldValue::Text(text), Compiled::Regex(re)) => re.is_match(text),
        (FieldValue::Text(text), Compiled::Regexes(res)) => {
            let hits = res.iter().filter(|re| re.is_match(text)).count();
            match mode {
                StringSearchMode::And => hits == res.len(),
                StringSearchMode::Or => hits > 0,
                StringSearchMode::Xor => hits == 1,
            }
        }
        (FieldValue::Set(set), Compiled::Exact(Criterion::Pattern(name))) => set.contains(name),
        (FieldValue::Set(set), Compiled::Exact(Criterion::Patterns(names))) => {
            names.iter().all(|n| set.contains(n))
        }
        (FieldValue::Set(set), Compiled::Exact(Criterion::Members(wanted))) => {
            wanted.is_subset(set)
        }
        (FieldValue::Flag(flag), Compiled::Exact(Criterion::Flag(wanted))) => flag == *wanted,
        (FieldValue::Date(date), Compiled::Exact(Criterion::Date(wanted))) => date == *wanted,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qoelog_types::parse_log_date;

    fn entry(op: &str, date: &str, mos: &str) -> LogEntry {
        let mut e = LogEntry::new(op, parse_log_date(date).unwrap(), "a.log");
        e.fields.insert("MOS".to_string(), mos.to_string());
        e
    }

    fn index() -> LogIndex {
        let mut errored = entry("Test", "03-Jan-2022 10:00:00", "1.2");
        errored.error = true;
        errored.groups.insert("g.gr-log:runA".to_string());
        LogIndex::new(vec![
            entry("Test", "01-Jan-2022 10:00:00", "4.5"),
            entry("Access", "02-Jan-2022 10:00:00", "3.9"),
            errored,
        ])
    }

    fn ids(v: &[usize]) -> BTreeSet<usize> {
        v.iter().copied().collect()
    }

    #[test]
    fn test_regex_searches_anywhere() {
        let c = Criteria::new().with("operation", Criterion::pattern("^T"));

        assert_eq!(match_entries(&index(), &c, StringSearchMode::Or).unwrap(), ids(&[0, 2]));
    }

    #[test]
    fn test_string_search_modes() {
        let c = Criteria::new().with("MOS", Criterion::patterns(["^4", r"\.5$", "^3"]));
        let idx = index();

        assert_eq!(match_entries(&idx, &c, StringSearchMode::Or).unwrap(), ids(&[0, 1]));
        assert_eq!(match_entries(&idx, &c, StringSearchMode::Xor).unwrap(), ids(&[1]));

        let both = Criteria::new().with("MOS", Criterion::patterns(["^4", r"\.5$"]));
        assert_eq!(match_entries(&idx, &both, StringSearchMode::And).unwrap(), ids(&[0]));
    }

    #[test]
    fn test_date_bounds_are_strict() {
        let c = Criteria::new()
            .after(parse_log_date("01-Jan-2022 10:00:00").unwrap())
            .before(parse_log_date("03-Jan-2022 10:00:00").unwrap());

        assert_eq!(match_entries(&index(), &c, StringSearchMode::Or).unwrap(), ids(&[1]));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let c = Criteria::new().with("Radio", Criterion::pattern(""));

        assert!(match_entries(&index(), &c, StringSearchMode::Or).unwrap().is_empty());
    }

    #[test]
    fn test_groups_subset_and_membership() {
        let idx = index();
        let subset = Criteria::new().with("groups", Criterion::members(["g.gr-log:runA"]));
        let member = Criteria::new().with("groups", Criterion::pattern("g.gr-log:runA"));
        let too_many = Criteria::new().with(
            "groups",
            Criterion::members(["g.gr-log:runA", "g.gr-log:runB"]),
        );

        assert_eq!(match_entries(&idx, &subset, StringSearchMode::Or).unwrap(), ids(&[2]));
        assert_eq!(match_entries(&idx, &member, StringSearchMode::Or).unwrap(), ids(&[2]));
        assert!(match_entries(&idx, &too_many, StringSearchMode::Or).unwrap().is_empty());
    }

    #[test]
    fn test_group_membership_ignores_regex_syntax() {
        let mut idx = index();
        idx.entries[0].groups.insert("g.gr-log:run(1".to_string());
        let c = Criteria::new().with("groups", Criterion::pattern("g.gr-log:run(1"));
        let dotted = Criteria::new().with("groups", Criterion::pattern("g.gr-log:run."));

        assert_eq!(match_entries(&idx, &c, StringSearchMode::Or).unwrap(), ids(&[0]));
        assert!(match_entries(&idx, &dotted, StringSearchMode::Or).unwrap().is_empty());
    }

    #[test]
    fn test_flags_compare_exactly() {
        let c = Criteria::new().with("error", Criterion::Flag(false));

        assert_eq!(match_entries(&index(), &c, StringSearchMode::Or).unwrap(), ids(&[0, 1]));
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        assert_eq!(
            match_entries(&index(), &Criteria::new(), StringSearchMode::Or).unwrap(),
            ids(&[0, 1, 2])
        );
    }
}
