//! Prompt-driven schedule extraction.

use tracing::debug;

use crate::error::ScheduleError;
use crate::openai::CompletionModel;
use crate::schedule::ExtractedRow;
use crate::schedule::json::parse_json_with_context;

pub const SYSTEM_PROMPT: &str = "You clean and structure NCAA schedules into JSON format.";

/// Field list and formats requested from the model. The date format is
/// day-month-year on purpose; exports depend on it.
const ROW_TEMPLATE: &str = r#"[
  {
    "Date": "DD-MM-YYYY",
    "Time": "hh:mm (24-hour)",
    "Team Name": "Team",
    "Ground": "Home/Away/Neutral",
    "Opponent Team Name": "Opponent",
    "Venue": "Stadium",
    "Location": "City, State",
    "Conference": "Conference" or empty,
    "Promo": "Promo Name" or empty
  },
  ...
]"#;

/// The user message for one page.
pub fn build_prompt(page_text: &str) -> String {
    format!(
        "You are a data extraction assistant. From the text below, extract the team's sports \
         schedule into a JSON list:\n\n{ROW_TEMPLATE}\n\n\
         Return valid JSON only. Do not wrap it in Markdown or include comments.\n\n\
         Text:\n{page_text}\n"
    )
}

/// Strictly parse a model response. Anything other than a JSON array of row
/// objects fails the whole page; no fence stripping or repair.
pub fn parse_rows(response: &str) -> Result<Vec<ExtractedRow>, ScheduleError> {
    parse_json_with_context(response.trim()).map_err(|e| ScheduleError::Decode(e.to_string()))
}

/// Ask `model` for the schedule contained in `page_text`.
pub async fn extract_rows(
    model: &dyn CompletionModel,
    page_text: &str,
) -> Result<Vec<ExtractedRow>, ScheduleError> {
    let response = model.complete(SYSTEM_PROMPT, &build_prompt(page_text)).await?;
    debug!(response_len = response.len(), "model responded");
    parse_rows(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::Result as ModelResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recording {
        reply: String,
        prompts: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl CompletionModel for Recording {
        async fn complete(&self, system: &str, user: &str) -> ModelResult<String> {
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn test_build_prompt_embeds_text_and_fields() {
        let prompt = build_prompt("Sep 6 vs Elon 7:30 PM");
        assert!(prompt.ends_with("Text:\nSep 6 vs Elon 7:30 PM\n"));
        for field in [
            "\"Date\": \"DD-MM-YYYY\"",
            "\"Time\": \"hh:mm (24-hour)\"",
            "\"Ground\": \"Home/Away/Neutral\"",
            "\"Opponent Team Name\"",
            "\"Promo\"",
        ] {
            assert!(prompt.contains(field), "missing {field}");
        }
        assert!(prompt.contains("Do not wrap it in Markdown"));
    }

    #[test]
    fn test_parse_rows_trims_whitespace() {
        let rows = parse_rows("\n  [{\"Opponent Team Name\": \"Elon\", \"Ground\": \"Home\"}]  \n")
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].opponent_team_name, "Elon");
    }

    #[test]
    fn test_parse_rows_rejects_markdown_fence() {
        let fenced = "```json\n[{\"Opponent Team Name\": \"Elon\"}]\n```";
        assert!(matches!(parse_rows(fenced), Err(ScheduleError::Decode(_))));
    }

    #[test]
    fn test_parse_rows_rejects_object() {
        let result = parse_rows(r#"{"games": []}"#);
        assert!(matches!(result, Err(ScheduleError::Decode(_))));
    }

    #[test]
    fn test_parse_rows_empty_array() {
        assert!(parse_rows("[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_extract_rows_uses_fixed_system_prompt() {
        let model = Recording {
            reply: r#"[{"Opponent Team Name": "Navy"}, {"Opponent Team Name": "Army"}]"#.into(),
            prompts: Mutex::new(Vec::new()),
        };
        let rows = extract_rows(&model, "schedule text").await.unwrap();
        assert_eq!(rows.len(), 2);

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts[0].0, SYSTEM_PROMPT);
        assert!(prompts[0].1.contains("schedule text"));
    }
}
