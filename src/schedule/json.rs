//! JSON parsing utilities for model responses.

use anyhow::Result;

/// Attempt to parse JSON and, on failure, include a contextual snippet of the
/// line where the error occurred along with the serde path and type mismatch.
pub fn parse_json_with_context<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let mut jd = serde_json::Deserializer::from_str(body);
    match serde_path_to_error::deserialize(&mut jd) {
        Ok(value) => {
            // Reject prose after an otherwise valid document.
            jd.end().map_err(|e| {
                anyhow::anyhow!(
                    "trailing characters after JSON (line {} col {})",
                    e.line(),
                    e.column()
                )
            })?;
            Ok(value)
        }
        Err(err) => {
            let inner_err = err.inner();
            let (line, column) = (inner_err.line(), inner_err.column());
            let path = err.path().to_string();

            let msg = inner_err.to_string();
            let loc = format!(" at line {line} column {column}");
            let msg_without_loc = msg.strip_suffix(&loc).unwrap_or(&msg).to_string();

            let type_info = parse_type_mismatch(&msg_without_loc);
            let snippet = build_error_snippet(body, line, column, 20);

            let mut final_err = String::new();
            if !path.is_empty() && path != "." {
                final_err.push_str(&format!("at path '{}': ", path));
            }
            final_err.push_str(&format!(
                "{} (line {} col {})\n{}",
                type_info, line, column, snippet
            ));

            Err(anyhow::anyhow!(final_err))
        }
    }
}

/// Turn "invalid type: null, expected a string" into "expected a string, got null".
/// Other messages are returned unchanged.
fn parse_type_mismatch(error_msg: &str) -> String {
    if let Some(invalid_start) = error_msg.find("invalid type: ") {
        let after_prefix = &error_msg[invalid_start + "invalid type: ".len()..];

        if let Some(comma_pos) = after_prefix.find(", expected ") {
            let actual_type = &after_prefix[..comma_pos];
            let expected_part = &after_prefix[comma_pos + ", expected ".len()..];

            let expected_type = expected_part
                .split(" at line ")
                .next()
                .unwrap_or(expected_part)
                .trim();

            return format!("expected {}, got {}", expected_type, actual_type);
        }
    }

    if error_msg.starts_with("expected ")
        && let Some(expected_part) = error_msg.split(" at line ").next()
    {
        return expected_part.to_string();
    }

    error_msg.to_string()
}

/// Model output is free text, so the window is widened to char boundaries
/// before slicing.
fn build_error_snippet(body: &str, line: usize, column: usize, context_len: usize) -> String {
    let target_line = body.lines().nth(line.saturating_sub(1)).unwrap_or("");
    if target_line.is_empty() {
        return "(empty line)".to_string();
    }

    // column is 1-based
    let mut error_idx = column.saturating_sub(1).min(target_line.len());
    while !target_line.is_char_boundary(error_idx) {
        error_idx -= 1;
    }

    let half_len = context_len / 2;
    let mut start = error_idx.saturating_sub(half_len);
    while !target_line.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (error_idx + half_len).min(target_line.len());
    while !target_line.is_char_boundary(end) {
        end += 1;
    }

    let slice = &target_line[start..end];
    let indicator_pos = target_line[start..error_idx].chars().count();
    let indicator = " ".repeat(indicator_pos) + "^";

    format!("...{slice}...\n   {indicator}")
}
