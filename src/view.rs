//! Ground filtering and CSV export of the aggregated table.

use serde::Deserialize;

use crate::csv::write_row;
use crate::schedule::{Column, Ground, ScheduleRow, ScheduleTable};

/// Download name for exports.
pub const EXPORT_FILENAME: &str = "combined_schedule.csv";

/// Which grounds are visible. Home only by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GroundFilter {
    #[serde(default)]
    pub home: bool,
    #[serde(default)]
    pub away: bool,
    #[serde(default)]
    pub neutral: bool,
}

impl Default for GroundFilter {
    fn default() -> Self {
        Self {
            home: true,
            away: false,
            neutral: false,
        }
    }
}

impl GroundFilter {
    /// Rows without a ground, or with an unrecognized one, never match.
    pub fn allows(&self, ground: Option<&Ground>) -> bool {
        match ground {
            Some(Ground::Home) => self.home,
            Some(Ground::Away) => self.away,
            Some(Ground::Neutral) => self.neutral,
            Some(Ground::Other(_)) | None => false,
        }
    }

    /// Matching rows in table order.
    pub fn apply<'a>(&self, table: &'a ScheduleTable) -> Vec<&'a ScheduleRow> {
        table
            .rows()
            .iter()
            .filter(|row| self.allows(row.ground.as_ref()))
            .collect()
    }
}

/// The filtered view as CSV with a header row. Columns are those present
/// anywhere in the full table, so the header does not change with toggles.
pub fn export_csv(table: &ScheduleTable, filter: &GroundFilter) -> String {
    let columns = table.columns();
    let mut out = String::new();

    let header: Vec<&str> = columns.iter().map(|c| c.header()).collect();
    write_row(&mut out, &header, ',');

    for row in filter.apply(table) {
        write_row(&mut out, &cells(row, &columns), ',');
    }
    out
}

/// Cell values for `columns`, absent ones as empty strings.
pub fn cells<'a>(row: &'a ScheduleRow, columns: &[Column]) -> Vec<&'a str> {
    columns
        .iter()
        .map(|&column| row.cell(column).unwrap_or(""))
        .collect()
}
