use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How a new result combines with the current found set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    #[default]
    Replace,
    And,
    Or,
    Xor,
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateMode::Replace => write!(f, "replace"),
            UpdateMode::And => write!(f, "and"),
            UpdateMode::Or => write!(f, "or"),
            UpdateMode::Xor => write!(f, "xor"),
        }
    }
}

impl FromStr for UpdateMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "replace" => Ok(UpdateMode::Replace),
            "and" => Ok(UpdateMode::And),
            "or" => Ok(UpdateMode::Or),
            "xor" => Ok(UpdateMode::Xor),
            _ => Err(format!("invalid update mode '{}'", s)),
        }
    }
}

/// Current query result
///
/// Starts out cleared; the first result after a clear always replaces the
/// set, later ones combine according to the [`UpdateMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundSet {
    ids: BTreeSet<usize>,
    cleared: bool,
}

impl Default for FoundSet {
    fn default() -> Self {
        Self {
            ids: BTreeSet::new(),
            cleared: true,
        }
    }
}

impl FoundSet {
    pub fn apply(&mut self, result: BTreeSet<usize>, mode: UpdateMode) {
        if self.cleared {
            self.ids = result;
        } else {
            self.ids = match mode {
                UpdateMode::Replace => result,
                UpdateMode::And => &self.ids & &result,
                UpdateMode::Or => &self.ids | &result,
                UpdateMode::Xor => &self.ids ^ &result,
            };
        }
        self.cleared = false;
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.cleared = true;
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    pub fn ids(&self) -> &BTreeSet<usize> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
