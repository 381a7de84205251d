//! Best-effort reader for the `Arguments` preamble field
//!
//! The field is a flat list `'name',value,'name',value,...` where a value is
//! a scalar, a `[...]` array or a `{...}` cell list. Anything the grammar does
//! not understand is kept as raw text and reported as a conversion warning.

use qoelog_types::{ArgValue, Arguments, ConversionWarning};
use regex::Regex;
use std::sync::LazyLock;

static ARGUMENT_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"'(?P<name>[^']*)',(?P<value>(?P<cell_m>\{(?P<cell>[^}]*)\})|(?P<arr_m>\[(?P<arr>[^\]]*)\])|(?:[^{\[][^,]*))",
    )
    .expect("argument pattern is valid")
});

static LIST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;,]").expect("separator pattern is valid"));

/// Outcome of [`parse_arguments`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArguments {
    pub values: Arguments,
    pub warnings: Vec<ConversionWarning>,
}

/// Parse an `Arguments` field value
///
/// Warnings are returned, not logged; the caller knows where the text came
/// from.
pub fn parse_arguments(text: &str) -> ParsedArguments {
    let mut parsed = ParsedArguments::default();

    for caps in ARGUMENT_PAIR.captures_iter(text) {
        let Some(name) = caps.name("name") else {
            continue;
        };

        let list = if caps.name("cell_m").is_some() {
            Some(caps.name("cell").map_or("", |m| m.as_str()))
        } else if caps.name("arr_m").is_some() {
            Some(caps.name("arr").map_or("", |m| m.as_str()))
        } else {
            None
        };

        let value = match list {
            Some(body) => parse_list(body, &mut parsed.warnings),
            None => {
                let token = caps.name("value").map_or("", |m| m.as_str());
                parse_scalar(token, &mut parsed.warnings)
            }
        };

        parsed.values.insert(name.as_str().to_string(), value);
    }

    parsed
}

fn parse_list(body: &str, warnings: &mut Vec<ConversionWarning>) -> ArgValue {
    if body.trim().is_empty() {
        return ArgValue::List(Vec::new());
    }
    ArgValue::List(
        LIST_SEPARATOR
            .split(body)
            .map(|item| parse_scalar(item, warnings))
            .collect(),
    )
}

/// Classify one token: quoted string, boolean, number, else raw text
pub fn parse_scalar(token: &str, warnings: &mut Vec<ConversionWarning>) -> ArgValue {
    let token = token.trim();
    if token.is_empty() {
        return ArgValue::Empty;
    }

    if let Some(rest) = token.strip_prefix('\'')
        && let Some((inner, _)) = rest.split_once('\'')
    {
        return ArgValue::text(inner);
    }

    match token {
        "true" => return ArgValue::Bool(true),
        "false" => return ArgValue::Bool(false),
        _ => {}
    }

    match token.parse::<f64>() {
        Ok(n) => ArgValue::Number(n),
        Err(_) => {
            warnings.push(ConversionWarning {
                token: token.to_string(),
            });
            ArgValue::text(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_and_lists() {
        let parsed = parse_arguments(
            "'Trials',100,'Radio','uhf','Loop',true,'Levels',[1;2.5],'Names',{'a','b'}",
        );

        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.values["Trials"], ArgValue::Number(100.0));
        assert_eq!(parsed.values["Radio"], ArgValue::text("uhf"));
        assert_eq!(parsed.values["Loop"], ArgValue::Bool(true));
        assert_eq!(
            parsed.values["Levels"],
            ArgValue::List(vec![ArgValue::Number(1.0), ArgValue::Number(2.5)])
        );
        assert_eq!(
            parsed.values["Names"],
            ArgValue::List(vec![ArgValue::text("a"), ArgValue::text("b")])
        );
    }

    #[test]
    fn test_unconvertible_token_is_kept_with_warning() {
        let parsed = parse_arguments("'Device',uhf radio,'Gain',3");

        assert_eq!(parsed.values["Device"], ArgValue::text("uhf radio"));
        assert_eq!(parsed.values["Gain"], ArgValue::Number(3.0));
        assert_eq!(
            parsed.warnings,
            vec![ConversionWarning {
                token: "uhf radio".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_lists_and_tokens() {
        let parsed = parse_arguments("'A',[],'B',{},'C',[1;;2]");

        assert_eq!(parsed.values["A"], ArgValue::List(vec![]));
        assert_eq!(parsed.values["B"], ArgValue::List(vec![]));
        assert_eq!(
            parsed.values["C"],
            ArgValue::List(vec![
                ArgValue::Number(1.0),
                ArgValue::Empty,
                ArgValue::Number(2.0)
            ])
        );
    }

    #[test]
    fn test_garbage_never_fails() {
        let parsed = parse_arguments("not an argument list at all");

        assert!(parsed.values.is_empty());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_scalar_classification_order() {
        let mut warnings = Vec::new();

        assert_eq!(parse_scalar("'true'", &mut warnings), ArgValue::text("true"));
        assert_eq!(parse_scalar(" false ", &mut warnings), ArgValue::Bool(false));
        assert_eq!(parse_scalar("-1e3", &mut warnings), ArgValue::Number(-1000.0));
        assert!(warnings.is_empty());
    }
}
