use chrono::NaiveDateTime;
use qoelog_types::parse_log_date;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};

/// Pseudo-field: entries dated strictly before the criterion
pub const DATE_BEFORE: &str = "date_before";
/// Pseudo-field: entries dated strictly after the criterion
pub const DATE_AFTER: &str = "date_after";

const FLAG_FIELDS: [&str; 2] = ["complete", "error"];

/// What one field is compared against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// Regular expression searched anywhere in a text field
    Pattern(String),
    /// Several patterns combined by the string search mode
    Patterns(Vec<String>),
    Flag(bool),
    Date(NaiveDateTime),
    /// Group identifiers that must all be present
    Members(BTreeSet<String>),
}

impl Criterion {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Criterion::Pattern(pattern.into())
    }

    pub fn patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Criterion::Patterns(patterns.into_iter().map(Into::into).collect())
    }

    pub fn members<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Criterion::Members(groups.into_iter().map(Into::into).collect())
    }

    /// Interpret command-line text for `field`
    ///
    /// Flags take `true`/`false`, date fields take `DD-Mon-YYYY HH:MM:SS`,
    /// `groups` takes a comma separated list; everything else is a pattern.
    pub fn parse_for(field: &str, text: &str) -> Result<Self> {
        if FLAG_FIELDS.contains(&field) {
            return match text.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Criterion::Flag(true)),
                "false" => Ok(Criterion::Flag(false)),
                _ => Err(Error::InvalidCriterion {
                    field: field.to_string(),
                    message: format!("expected true or false, got {:?}", text),
                }),
            };
        }
        if matches!(field, "date" | DATE_BEFORE | DATE_AFTER) {
            return parse_log_date(text)
                .map(Criterion::Date)
                .ok_or_else(|| Error::InvalidCriterion {
                    field: field.to_string(),
                    message: format!("expected DD-Mon-YYYY HH:MM:SS, got {:?}", text),
                });
        }
        if field == "groups" {
            return Ok(Criterion::members(
                text.split(',').map(str::trim).filter(|g| !g.is_empty()),
            ));
        }
        Ok(Criterion::pattern(text))
    }
}

/// Field name to criterion; an entry must satisfy every key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    fields: BTreeMap<String, Criterion>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, criterion: Criterion) -> Self {
        self.insert(field, criterion);
        self
    }

    pub fn before(self, date: NaiveDateTime) -> Self {
        self.with(DATE_BEFORE, Criterion::Date(date))
    }

    pub fn after(self, date: NaiveDateTime) -> Self {
        self.with(DATE_AFTER, Criterion::Date(date))
    }

    pub fn insert(&mut self, field: impl Into<String>, criterion: Criterion) {
        self.fields.insert(field.into(), criterion);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Criterion)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn compile(&self) -> Result<Vec<(&str, Compiled<'_>)>> {
        self.iter()
            .map(|(field, criterion)| Ok((field, Compiled::new(field, criterion)?)))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Criterion)> for Criteria {
    fn from_iter<T: IntoIterator<Item = (K, Criterion)>>(iter: T) -> Self {
        let mut criteria = Criteria::new();
        for (field, criterion) in iter {
            criteria.insert(field, criterion);
        }
        criteria
    }
}

/// A criterion with its patterns compiled once per query
pub(crate) enum Compiled<'a> {
    Before(NaiveDateTime),
    After(NaiveDateTime),
    Regex(Regex),
    Regexes(Vec<Regex>),
    /// Compared by value; set fields take names, not patterns
    Exact(&'a Criterion),
}

impl<'a> Compiled<'a> {
    fn new(field: &str, criterion: &'a Criterion) -> Result<Self> {
        match (field, criterion) {
            (DATE_BEFORE, Criterion::Date(d)) => Ok(Compiled::Before(*d)),
            (DATE_AFTER, Criterion::Date(d)) => Ok(Compiled::After(*d)),
            (DATE_BEFORE | DATE_AFTER, _) => Err(Error::InvalidCriterion {
                field: field.to_string(),
                message: "a timestamp is required".to_string(),
            }),
            ("groups", _) => Ok(Compiled::Exact(criterion)),
            (_, Criterion::Pattern(p)) => Ok(Compiled::Regex(compile(p)?)),
            (_, Criterion::Patterns(ps)) => Ok(Compiled::Regexes(
                ps.iter().map(|p| compile(p)).collect::<Result<_>>()?,
            )),
            _ => Ok(Compiled::Exact(criterion)),
        }
    }
}

pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
