use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Parsed form of the `Arguments` field, keyed by argument name
pub type Arguments = BTreeMap<String, ArgValue>;

/// One value of the `Arguments` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<ArgValue>),
    /// Empty token (`'name',,`)
    Empty,
}

impl ArgValue {
    pub fn text(value: impl Into<String>) -> Self {
        ArgValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ArgValue::List(_))
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Bool(b) => write!(f, "{}", b),
            ArgValue::Number(n) => write!(f, "{}", n),
            ArgValue::Text(s) => write!(f, "'{}'", s),
            ArgValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ArgValue::Empty => Ok(()),
        }
    }
}

/// A token that could not be read as string, boolean or number
///
/// The token is kept verbatim as [`ArgValue::Text`]; this only records that
/// the conversion failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionWarning {
    pub token: String,
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not convert '{}'", self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips_list_shape() {
        let value = ArgValue::List(vec![
            ArgValue::Number(1.5),
            ArgValue::text("a"),
            ArgValue::Bool(false),
        ]);

        assert_eq!(value.to_string(), "[1.5,'a',false]");
    }

    #[test]
    fn test_serializes_untagged() {
        let mut args = Arguments::new();
        args.insert("Trials".to_string(), ArgValue::Number(100.0));
        args.insert("Radio".to_string(), ArgValue::text("uhf"));
        args.insert("Skip".to_string(), ArgValue::Empty);

        let json = serde_json::to_value(&args).unwrap();

        assert_eq!(json["Trials"], 100.0);
        assert_eq!(json["Radio"], "uhf");
        assert!(json["Skip"].is_null());
    }
}
