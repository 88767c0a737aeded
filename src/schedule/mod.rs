//! Schedule rows as the model returns them and as the table shows them.

pub mod json;

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Where a game is played relative to the team whose page was scraped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ground {
    Home,
    Away,
    Neutral,
    /// Any other label the model produced. Kept for display and export,
    /// never matched by a filter toggle.
    Other(String),
}

impl Ground {
    /// Exact, case-sensitive match on the three labels the prompt asks for.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Home" => Self::Home,
            "Away" => Self::Away,
            "Neutral" => Self::Neutral,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Home => "Home",
            Self::Away => "Away",
            Self::Neutral => "Neutral",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for Ground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element of the model's JSON array.
///
/// Every field except the opponent name may be missing or `null`. A missing
/// key stays `None`; a `null` value is kept as an empty cell so the column
/// still exists. Keys the prompt did not ask for are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtractedRow {
    #[serde(rename = "Date", default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(rename = "Time", default, deserialize_with = "lenient_string")]
    pub time: Option<String>,
    #[serde(rename = "Team Name", default, deserialize_with = "lenient_string")]
    pub team_name: Option<String>,
    #[serde(rename = "Ground", default, deserialize_with = "lenient_ground")]
    pub ground: Option<Ground>,
    #[serde(rename = "Opponent Team Name")]
    pub opponent_team_name: String,
    #[serde(rename = "Venue", default, deserialize_with = "lenient_string")]
    pub venue: Option<String>,
    #[serde(rename = "Location", default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(rename = "Conference", default, deserialize_with = "lenient_string")]
    pub conference: Option<String>,
    #[serde(rename = "Promo", default, deserialize_with = "lenient_string")]
    pub promo: Option<String>,
}

/// Only called when the key is present. Strings pass through, numbers and
/// booleans are stringified, `null` becomes an empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(Some(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }))
}

fn lenient_ground<'de, D>(deserializer: D) -> Result<Option<Ground>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.map(|label| Ground::from_label(&label)))
}

/// An extracted row after domain enrichment.
#[derive(Clone, PartialEq, custom_debug_derive::Debug)]
pub struct ScheduleRow {
    #[debug(skip_if = Option::is_none, with = "debug_present")]
    pub date: Option<String>,
    #[debug(skip_if = Option::is_none, with = "debug_present")]
    pub time: Option<String>,
    #[debug(skip_if = Option::is_none, with = "debug_present")]
    pub team_name: Option<String>,
    pub opponent_team_name: String,
    pub team_domain: String,
    pub opponent_domain: String,
    #[debug(skip_if = Option::is_none, with = "debug_present")]
    pub ground: Option<Ground>,
    #[debug(skip_if = Option::is_none, with = "debug_present")]
    pub venue: Option<String>,
    #[debug(skip_if = Option::is_none, with = "debug_present")]
    pub location: Option<String>,
    #[debug(skip_if = Option::is_none, with = "debug_present")]
    pub conference: Option<String>,
    #[debug(skip_if = Option::is_none, with = "debug_present")]
    pub promo: Option<String>,
}

impl ScheduleRow {
    /// The value shown in `column`, or `None` when the model left it out.
    pub fn cell(&self, column: Column) -> Option<&str> {
        match column {
            Column::Date => self.date.as_deref(),
            Column::Time => self.time.as_deref(),
            Column::TeamName => self.team_name.as_deref(),
            Column::OpponentTeamName => Some(&self.opponent_team_name),
            Column::TeamDomain => Some(&self.team_domain),
            Column::OpponentDomain => Some(&self.opponent_domain),
            Column::Ground => self.ground.as_ref().map(Ground::as_str),
            Column::Venue => self.venue.as_deref(),
            Column::Location => self.location.as_deref(),
            Column::Conference => self.conference.as_deref(),
            Column::Promo => self.promo.as_deref(),
        }
    }
}

/// Debug-prints the value inside a field already known to be `Some`.
fn debug_present<T: fmt::Debug>(value: &Option<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Some(inner) => inner.fmt(f),
        None => f.write_str("None"),
    }
}

/// Table columns in display and export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Date,
    Time,
    TeamName,
    OpponentTeamName,
    TeamDomain,
    OpponentDomain,
    Ground,
    Venue,
    Location,
    Conference,
    Promo,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::Date,
        Column::Time,
        Column::TeamName,
        Column::OpponentTeamName,
        Column::TeamDomain,
        Column::OpponentDomain,
        Column::Ground,
        Column::Venue,
        Column::Location,
        Column::Conference,
        Column::Promo,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Time => "Time",
            Column::TeamName => "Team Name",
            Column::OpponentTeamName => "Opponent Team Name",
            Column::TeamDomain => "Team Domain",
            Column::OpponentDomain => "Opponent Domain",
            Column::Ground => "Ground",
            Column::Venue => "Venue",
            Column::Location => "Location",
            Column::Conference => "Conference",
            Column::Promo => "Promo",
        }
    }
}

/// Rows from every successfully processed URL of one extraction run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleTable {
    rows: Vec<ScheduleRow>,
}

impl ScheduleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = ScheduleRow>) {
        self.rows.extend(rows);
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Columns carried by at least one row, in fixed order.
    pub fn columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|&column| self.rows.iter().any(|row| row.cell(column).is_some()))
            .collect()
    }
}

impl FromIterator<ScheduleRow> for ScheduleTable {
    fn from_iter<I: IntoIterator<Item = ScheduleRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
