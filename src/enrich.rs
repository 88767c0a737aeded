//! Domain enrichment of extracted rows.

use crate::html::DomainLookup;
use crate::schedule::{ExtractedRow, ScheduleRow};

/// First lookup label, in insertion order, that occurs inside the lowercased
/// opponent name. Not a best match: with labels `["army", "navy"]` an opponent
/// called "Navy vs Army Alumni" resolves to Army's domain.
pub fn resolve_opponent_domain<'a>(lookup: &'a DomainLookup, opponent: &str) -> &'a str {
    let opponent = opponent.to_lowercase();
    lookup
        .iter()
        .find(|(label, _)| opponent.contains(label))
        .map(|(_, domain)| domain)
        .unwrap_or("")
}

pub fn enrich_row(row: ExtractedRow, lookup: &DomainLookup, team_domain: &str) -> ScheduleRow {
    let opponent_domain = resolve_opponent_domain(lookup, &row.opponent_team_name).to_string();
    ScheduleRow {
        date: row.date,
        time: row.time,
        team_name: row.team_name,
        opponent_team_name: row.opponent_team_name,
        team_domain: team_domain.to_string(),
        opponent_domain,
        ground: row.ground,
        venue: row.venue,
        location: row.location,
        conference: row.conference,
        promo: row.promo,
    }
}

/// Enrich every row of one page, preserving order.
pub fn enrich_rows(
    rows: Vec<ExtractedRow>,
    lookup: &DomainLookup,
    team_domain: &str,
) -> Vec<ScheduleRow> {
    rows.into_iter()
        .map(|row| enrich_row(row, lookup, team_domain))
        .collect()
}
