//! Turn command-line query options into engine searches

use anyhow::{Context, Result, bail};
use qoelog_engine::{Criteria, Criterion, DATE_AFTER, DATE_BEFORE, LogSearch, UpdateMode};
use qoelog_parser::parse_arguments;
use qoelog_types::ArgValue;
use std::collections::{BTreeMap, BTreeSet};

use crate::args::QueryArgs;

/// A parsed query: field criteria plus argument comparisons
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub criteria: Criteria,
    pub arguments: Vec<(String, ArgValue)>,
}

impl Query {
    pub fn from_args(args: &QueryArgs) -> Result<Self> {
        let mut patterns: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for filter in &args.filters {
            let (field, pattern) = split_pair(filter, "--where")?;
            patterns.entry(field.to_string()).or_default().push(pattern.to_string());
        }

        let mut criteria = Criteria::new();
        for (field, texts) in patterns {
            let parsed = texts
                .iter()
                .map(|text| Criterion::parse_for(&field, text))
                .collect::<qoelog_engine::Result<Vec<_>>>()?;
            let criterion = combine(&field, parsed)?;
            criteria.insert(field, criterion);
        }

        if let Some(before) = &args.before {
            criteria.insert(DATE_BEFORE, Criterion::parse_for(DATE_BEFORE, before)?);
        }
        if let Some(after) = &args.after {
            criteria.insert(DATE_AFTER, Criterion::parse_for(DATE_AFTER, after)?);
        }
        if !args.groups.is_empty() {
            criteria.insert("groups", Criterion::members(args.groups.iter().cloned()));
        }

        let arguments = args
            .args
            .iter()
            .map(|arg| parse_argument(arg))
            .collect::<Result<_>>()?;

        Ok(Self {
            criteria,
            arguments,
        })
    }

    /// Run the field search, then narrow by every argument comparison
    pub fn run(&self, search: &mut LogSearch) -> Result<()> {
        search.clear();
        search.multi_search(&self.criteria)?;

        let mode = search.update_mode;
        search.update_mode = UpdateMode::And;
        let narrowed = self
            .arguments
            .iter()
            .try_for_each(|(name, value)| search.arg_search(name, value).map(|_| ()));
        search.update_mode = mode;
        narrowed?;

        tracing::debug!(found = search.found().len(), "query finished");
        Ok(())
    }
}

/// Merge repeated `--where` values for one field
///
/// Text patterns combine by the string search mode and group lists merge;
/// flags and dates take a single value.
fn combine(field: &str, mut parsed: Vec<Criterion>) -> Result<Criterion> {
    if parsed.len() == 1 {
        return Ok(parsed.remove(0));
    }

    let mut patterns = Vec::new();
    let mut groups = BTreeSet::new();
    for criterion in parsed {
        match criterion {
            Criterion::Pattern(p) => patterns.push(p),
            Criterion::Members(m) => groups.extend(m),
            _ => bail!("--where {} accepts a single value", field),
        }
    }
    if groups.is_empty() {
        Ok(Criterion::Patterns(patterns))
    } else {
        Ok(Criterion::Members(groups))
    }
}

fn split_pair<'a>(text: &'a str, option: &str) -> Result<(&'a str, &'a str)> {
    match text.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => bail!("{} expects NAME=VALUE, got {:?}", option, text),
    }
}

/// `NAME=VALUE` with VALUE written as in the Arguments field
fn parse_argument(text: &str) -> Result<(String, ArgValue)> {
    let (name, value) = split_pair(text, "--arg")?;
    let mut parsed = parse_arguments(&format!("'{}',{}", name, value));
    for warning in &parsed.warnings {
        tracing::warn!(argument = name, "{}", warning);
    }
    let value = parsed
        .values
        .remove(name)
        .with_context(|| format!("could not read argument value {:?}", value))?;
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> QueryArgs {
        QueryArgs::default()
    }

    #[test]
    fn test_single_and_repeated_filters() {
        let mut a = args();
        a.filters = vec![
            "operation=Test".to_string(),
            "MOS=^4".to_string(),
            "MOS=^3".to_string(),
        ];

        let q = Query::from_args(&a).unwrap();
        let items: Vec<_> = q.criteria.iter().collect();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0], ("MOS", &Criterion::patterns(["^4", "^3"])));
        assert_eq!(items[1], ("operation", &Criterion::pattern("Test")));
    }

    #[test]
    fn test_flags_dates_and_groups() {
        let mut a = args();
        a.filters = vec!["error=false".to_string()];
        a.before = Some("02-Jan-2022 00:00:00".to_string());
        a.groups = vec!["runs.gr-log:runA".to_string()];

        let q = Query::from_args(&a).unwrap();

        assert_eq!(q.criteria.len(), 3);
        assert!(
            q.criteria
                .iter()
                .any(|(f, c)| f == "error" && *c == Criterion::Flag(false))
        );
        assert!(
            q.criteria
                .iter()
                .any(|(f, c)| f == "groups" && *c == Criterion::members(["runs.gr-log:runA"]))
        );
    }

    #[test]
    fn test_argument_values() {
        let mut a = args();
        a.args = vec!["trials=100".to_string(), "audio='a.wav'".to_string()];

        let q = Query::from_args(&a).unwrap();

        assert_eq!(
            q.arguments,
            vec![
                ("trials".to_string(), ArgValue::Number(100.0)),
                ("audio".to_string(), ArgValue::text("a.wav")),
            ]
        );
    }

    #[test]
    fn test_repeated_flag_filter_is_rejected() {
        let mut a = args();
        a.filters = vec!["error=true".to_string(), "error=false".to_string()];

        let err = Query::from_args(&a).unwrap_err();
        assert!(err.to_string().contains("--where error accepts a single value"));
    }

    #[test]
    fn test_repeated_group_filters_merge() {
        let mut a = args();
        a.filters = vec![
            "groups=runs.gr-log:runA".to_string(),
            "groups=runs.gr-log:runB, runs.gr-log:runC".to_string(),
        ];

        let q = Query::from_args(&a).unwrap();

        assert_eq!(
            q.criteria.iter().next(),
            Some((
                "groups",
                &Criterion::members(["runs.gr-log:runA", "runs.gr-log:runB", "runs.gr-log:runC"])
            ))
        );
    }

    #[test]
    fn test_malformed_pairs_are_rejected() {
        let mut a = args();
        a.filters = vec!["no-equals".to_string()];
        assert!(Query::from_args(&a).is_err());

        let mut b = args();
        b.before = Some("soon".to_string());
        assert!(Query::from_args(&b).is_err());
    }
}
