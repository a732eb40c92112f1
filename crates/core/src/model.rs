use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Time units recognized in countdown text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Second,
    Minute,
    Hour,
    Day,
}

impl UnitKind {
    pub const ALL: [UnitKind; 4] = [
        UnitKind::Second,
        UnitKind::Minute,
        UnitKind::Hour,
        UnitKind::Day,
    ];

    pub fn seconds(&self) -> u64 {
        match self {
            UnitKind::Second => 1,
            UnitKind::Minute => 60,
            UnitKind::Hour => 60 * 60,
            UnitKind::Day => 24 * 60 * 60,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Second => "second",
            UnitKind::Minute => "minute",
            UnitKind::Hour => "hour",
            UnitKind::Day => "day",
        }
    }

    pub fn suffix(&self) -> char {
        match self {
            UnitKind::Second => 's',
            UnitKind::Minute => 'm',
            UnitKind::Hour => 'h',
            UnitKind::Day => 'd',
        }
    }

    pub fn from_suffix(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            's' => Some(UnitKind::Second),
            'm' => Some(UnitKind::Minute),
            'h' => Some(UnitKind::Hour),
            'd' => Some(UnitKind::Day),
            _ => None,
        }
    }

    /// Matches words that start with a unit name, e.g. "Minutes" or "days".
    pub fn from_word_prefix(word: &str) -> Option<Self> {
        let lower = word.to_lowercase();
        UnitKind::ALL
            .into_iter()
            .find(|unit| lower.starts_with(unit.as_str()))
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Added,
    RemainingTime,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Added => "added",
            SortBy::RemainingTime => "time",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SortBy::Added => SortBy::RemainingTime,
            SortBy::RemainingTime => SortBy::Added,
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "added" | "created" => Ok(SortBy::Added),
            "time" | "remaining" | "remaining_time" | "remaining-time" => {
                Ok(SortBy::RemainingTime)
            }
            other => Err(anyhow!(
                "Unknown sort field '{}': expected added|time",
                other
            )),
        }
    }
}

impl ValueEnum for SortBy {
    fn value_variants<'a>() -> &'a [Self] {
        &[SortBy::Added, SortBy::RemainingTime]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(anyhow!(
                "Unknown sort order '{}': expected asc|desc",
                other
            )),
        }
    }
}

impl ValueEnum for SortOrder {
    fn value_variants<'a>() -> &'a [Self] {
        &[SortOrder::Ascending, SortOrder::Descending]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub by: SortBy,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(by: SortBy, order: SortOrder) -> Self {
        Self { by, order }
    }

    pub fn summary(&self) -> String {
        format!("{} {}", self.by, self.order)
    }
}

/// What happens to a countdown once it reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryPolicy {
    /// Drop the entry from the registry as soon as it expires.
    Remove,
    /// Keep the entry listed as expired until it is removed explicitly.
    #[default]
    Retain,
}

impl ExpiryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpiryPolicy::Remove => "remove",
            ExpiryPolicy::Retain => "retain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Running,
    Expired,
}

impl CountdownState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountdownState::Running => "running",
            CountdownState::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CountdownEntry {
    pub id: String,
    pub label: String,
    pub seconds_remaining: u64,
    pub duration_seconds: u64,
    pub insertion_order: u64,
    pub state: CountdownState,
    pub created_at: DateTime<Utc>,
}

impl CountdownEntry {
    pub(crate) fn new(label: String, duration_seconds: u64, insertion_order: u64) -> Self {
        Self {
            id: Ulid::new().to_string(),
            label,
            seconds_remaining: duration_seconds,
            duration_seconds,
            insertion_order,
            state: CountdownState::Running,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.state == CountdownState::Expired
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continuing(u64),
    Expired,
}

/// Value assigned to one unit while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitValue {
    pub unit: UnitKind,
    pub value: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub total_seconds: u64,
    pub label: String,
    /// Units that contributed to `total_seconds`, in the order they were found.
    pub components: Vec<UnitValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_multipliers_match_calendar() {
        assert_eq!(UnitKind::Second.seconds(), 1);
        assert_eq!(UnitKind::Minute.seconds(), 60);
        assert_eq!(UnitKind::Hour.seconds(), 3_600);
        assert_eq!(UnitKind::Day.seconds(), 86_400);
    }

    #[test]
    fn unit_word_prefix_is_case_insensitive() {
        assert_eq!(UnitKind::from_word_prefix("Days"), Some(UnitKind::Day));
        assert_eq!(UnitKind::from_word_prefix("hourly"), Some(UnitKind::Hour));
        assert_eq!(UnitKind::from_word_prefix("SECONDS"), Some(UnitKind::Second));
        assert_eq!(UnitKind::from_word_prefix("min"), None);
        assert_eq!(UnitKind::from_word_prefix("cat"), None);
    }

    #[test]
    fn sort_axes_toggle_and_parse() {
        assert_eq!(SortBy::Added.toggle(), SortBy::RemainingTime);
        assert_eq!(SortOrder::Descending.toggle(), SortOrder::Ascending);
        assert_eq!("time".parse::<SortBy>().unwrap(), SortBy::RemainingTime);
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn default_sort_lists_newest_first() {
        let spec = SortSpec::default();
        assert_eq!(spec.by, SortBy::Added);
        assert_eq!(spec.order, SortOrder::Descending);
        assert_eq!(spec.summary(), "added desc");
    }
}
