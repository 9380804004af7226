// cartflow/src/config.rs

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to do with a refresh result when another refresh started after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshOrdering {
  /// Whichever refresh finishes last overwrites `items`.
  #[default]
  LastWriteWins,
  /// Each refresh takes a ticket; results older than the newest issued
  /// ticket are discarded.
  Sequenced,
}

impl FromStr for RefreshOrdering {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
      "last_write_wins" | "lww" => Ok(RefreshOrdering::LastWriteWins),
      "sequenced" => Ok(RefreshOrdering::Sequenced),
      other => Err(format!(
        "unknown refresh ordering '{}', expected 'last_write_wins' or 'sequenced'",
        other
      )),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
  #[serde(default)]
  pub refresh_ordering: RefreshOrdering,
}

impl CartConfig {
  pub fn sequenced() -> Self {
    Self {
      refresh_ordering: RefreshOrdering::Sequenced,
    }
  }
}
