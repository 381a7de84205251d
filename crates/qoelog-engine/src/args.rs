//! Matching over the parsed `Arguments` field
//!
//! Text arguments are searched with the criterion as a regular expression,
//! everything else compares by equality. When either side is a list, every
//! argument element must match some criterion element and every criterion
//! element must be matched by some argument element.

use qoelog_types::{ArgValue, LogIndex};
use regex::Regex;
use std::collections::BTreeSet;
use std::slice;

use crate::criteria::compile;
use crate::error::Result;

enum ArgPattern {
    Regex(Regex),
    Value(ArgValue),
    List(Vec<ArgPattern>),
}

impl ArgPattern {
    fn new(value: &ArgValue) -> Result<Self> {
        Ok(match value {
            ArgValue::Text(pattern) => ArgPattern::Regex(compile(pattern)?),
            ArgValue::List(items) => {
                ArgPattern::List(items.iter().map(ArgPattern::new).collect::<Result<_>>()?)
            }
            other => ArgPattern::Value(other.clone()),
        })
    }
}

/// Indices of entries whose argument `name` matches `value`
pub fn match_arguments(
    index: &LogIndex,
    name: &str,
    value: &ArgValue,
) -> Result<BTreeSet<usize>> {
    let pattern = ArgPattern::new(value)?;
    Ok(index
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            let arg = entry.arguments.as_ref()?.get(name)?;
            value_matches(arg, &pattern).then_some(i)
        })
        .collect())
}

fn value_matches(arg: &ArgValue, pattern: &ArgPattern) -> bool {
    match (arg, pattern) {
        (ArgValue::List(args), ArgPattern::List(wanted)) => list_matches(args, wanted),
        (ArgValue::List(args), _) => list_matches(args, slice::from_ref(pattern)),
        (_, ArgPattern::List(wanted)) => list_matches(slice::from_ref(arg), wanted),
        (ArgValue::Text(text), ArgPattern::Regex(re)) => re.is_match(text),
        (_, ArgPattern::Value(wanted)) => arg == wanted,
        _ => false,
    }
}

fn list_matches(args: &[ArgValue], wanted: &[ArgPattern]) -> bool {
    let mut covered = vec![false; wanted.len()];
    for arg in args {
        let mut any = false;
        for (hit, pattern) in covered.iter_mut().zip(wanted) {
            if value_matches(arg, pattern) {
                *hit = true;
                any = true;
            }
        }
        if !any {
            return false;
        }
    }
    covered.into_iter().all(|hit| hit)
}
