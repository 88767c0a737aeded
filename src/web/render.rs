//! Server-rendered HTML pages.

use html_escape::encode_text;
use std::fmt::Write;

use crate::schedule::ScheduleTable;
use crate::view::{GroundFilter, cells};
use crate::web::session::Notice;

const TITLE: &str = "NCAA Schedule Reader";

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{TITLE}</title>\n<link rel=\"stylesheet\" href=\"/static/app.css\">\n\
         </head>\n<body>\n{body}</body>\n</html>\n"
    )
}

fn notice_html(notice: Option<&Notice>) -> String {
    match notice {
        None => String::new(),
        Some(Notice::Success(text)) => {
            format!("<p class=\"notice success\">{}</p>\n", encode_text(text))
        }
        Some(Notice::Warning(text)) => {
            format!("<p class=\"notice warning\">{}</p>\n", encode_text(text))
        }
        Some(Notice::Error(text)) => {
            format!("<p class=\"notice error\">{}</p>\n", encode_text(text))
        }
    }
}

/// Password form shown until the gate opens.
pub fn gate_page(notice: Option<&Notice>) -> String {
    layout(&format!(
        "<main class=\"gate\">\n\
         <form method=\"post\" action=\"/login\">\n\
         <label for=\"password\">Enter access password:</label>\n\
         <input type=\"password\" id=\"password\" name=\"password\" autofocus>\n\
         <button type=\"submit\">Enter</button>\n\
         </form>\n{}</main>\n",
        notice_html(notice)
    ))
}

fn checkbox(name: &str, label: &str, checked: bool) -> String {
    format!(
        "<label class=\"toggle\"><input type=\"checkbox\" name=\"{name}\" value=\"true\"{}> {label}</label>\n",
        if checked { " checked" } else { "" }
    )
}

fn table_html(table: &ScheduleTable, filter: &GroundFilter) -> String {
    let columns = table.columns();
    let mut out = String::from("<table>\n<thead><tr>");
    for column in &columns {
        let _ = write!(out, "<th>{}</th>", encode_text(column.header()));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in filter.apply(table) {
        out.push_str("<tr>");
        for cell in cells(row, &columns) {
            let _ = write!(out, "<td>{}</td>", encode_text(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

/// URL form, and once a run has succeeded, the toggles, table and export link.
pub fn main_page(
    url_input: &str,
    table: Option<&ScheduleTable>,
    filter: &GroundFilter,
    notice: Option<&Notice>,
) -> String {
    let mut body = format!(
        "<header>\n<h1>{TITLE}</h1>\n\
         <form method=\"post\" action=\"/logout\"><button type=\"submit\" class=\"link\">Log out</button></form>\n\
         </header>\n<main>\n{}\
         <form method=\"post\" action=\"/extract\" class=\"urls\">\n\
         <label for=\"urls\">Paste one or more team schedule links (each on a new line):</label>\n\
         <textarea id=\"urls\" name=\"urls\" rows=\"3\">{}</textarea>\n\
         <button type=\"submit\">Get Schedule</button>\n\
         </form>\n",
        notice_html(notice),
        encode_text(url_input)
    );

    if let Some(table) = table {
        body.push_str("<section class=\"results\">\n<h3>Filter by Ground</h3>\n");
        body.push_str("<form method=\"post\" action=\"/filter\" class=\"filters\">\n");
        body.push_str(&checkbox("home", "Home", filter.home));
        body.push_str(&checkbox("away", "Away", filter.away));
        body.push_str(&checkbox("neutral", "Neutral", filter.neutral));
        body.push_str("<button type=\"submit\">Apply</button>\n</form>\n");
        body.push_str(&table_html(table, filter));
        body.push_str("<a class=\"download\" href=\"/export.csv\" download>Download CSV</a>\n");
        body.push_str("</section>\n");
    }

    body.push_str("</main>\n");
    layout(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Ground, ScheduleRow};

    fn table() -> ScheduleTable {
        let row = |opponent: &str, ground: Ground| ScheduleRow {
            date: Some("06-09-2025".into()),
            time: Some("19:30".into()),
            team_name: Some("Duke".into()),
            opponent_team_name: opponent.to_string(),
            team_domain: "goduke.com".into(),
            opponent_domain: String::new(),
            ground: Some(ground),
            venue: None,
            location: None,
            conference: None,
            promo: None,
        };
        vec![row("Texas A&M", Ground::Home), row("Navy", Ground::Away)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_gate_page_masked_input() {
        let html = gate_page(Some(&Notice::Error("Incorrect password".into())));
        assert!(html.contains("type=\"password\""));
        assert!(html.contains("Incorrect password"));
    }

    #[test]
    fn test_main_page_without_table_has_no_filters() {
        let html = main_page("", None, &GroundFilter::default(), None);
        assert!(html.contains("Get Schedule"));
        assert!(!html.contains("Filter by Ground"));
    }

    #[test]
    fn test_main_page_escapes_cells_and_filters_rows() {
        let table = table();
        let html = main_page(
            "https://goduke.com/<x>",
            Some(&table),
            &GroundFilter::default(),
            None,
        );
        assert!(html.contains("<td>Texas A&amp;M</td>"));
        assert!(!html.contains("<td>Navy</td>"));
        assert!(html.contains("https://goduke.com/&lt;x&gt;"));
        assert!(html.contains("name=\"home\" value=\"true\" checked"));
        assert!(html.contains("name=\"away\" value=\"true\">"));
    }
}
