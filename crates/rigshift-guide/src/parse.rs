use rigshift_core::TutorialResponse;

use crate::error::GuideError;

/// Strip whitespace and an optional markdown code fence around the payload.
fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an info string such as "json" on the opening fence line.
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse raw model output into a tutorial. `tutorial` must be present and
/// an array of positively numbered steps; `warnings` defaults to empty.
pub fn parse_tutorial(raw: &str) -> Result<TutorialResponse, GuideError> {
    let json = strip_fence(raw);
    if json.is_empty() {
        return Err(GuideError::Format("empty response".to_string()));
    }

    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| GuideError::Format(format!("not JSON: {e}")))?;

    match value.get("tutorial") {
        Some(serde_json::Value::Array(_)) => {}
        Some(_) => return Err(GuideError::Format("'tutorial' is not an array".to_string())),
        None => return Err(GuideError::Format("missing 'tutorial'".to_string())),
    }

    let response: TutorialResponse =
        serde_json::from_value(value).map_err(|e| GuideError::Format(format!("unexpected shape: {e}")))?;

    if let Some(bad) = response.tutorial.iter().find(|s| s.step == 0) {
        return Err(GuideError::Format(format!("step numbers start at 1, got 0 for '{}'", bad.title)));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_payload() {
        let raw = r#"
            {"warnings": ["Check wattage"],
             "tutorial": [{"step": 1, "title": "Preparation", "details": "Unplug the PC."}]}
        "#;
        let resp = parse_tutorial(raw).unwrap();
        assert_eq!(resp.warnings, vec!["Check wattage"]);
        assert_eq!(resp.tutorial.len(), 1);
        assert_eq!(resp.tutorial[0].title, "Preparation");
    }

    #[test]
    fn missing_warnings_defaults_empty() {
        let resp = parse_tutorial(r#"{"tutorial": []}"#).unwrap();
        assert!(resp.warnings.is_empty());
        assert!(resp.tutorial.is_empty());
    }

    #[test]
    fn accepts_fenced_json() {
        let raw = "```json\n{\"warnings\": [], \"tutorial\": [{\"step\": 2, \"title\": \"T\", \"details\": \"D\"}]}\n```\n";
        let resp = parse_tutorial(raw).unwrap();
        assert_eq!(resp.tutorial[0].step, 2);
    }

    #[test]
    fn missing_tutorial_is_format_error() {
        let err = parse_tutorial(r#"{"warnings": []}"#).unwrap_err();
        assert!(matches!(err, GuideError::Format(m) if m.contains("missing")));
    }

    #[test]
    fn non_array_tutorial_is_format_error() {
        let err = parse_tutorial(r#"{"tutorial": "step one"}"#).unwrap_err();
        assert!(matches!(err, GuideError::Format(_)));
    }

    #[test]
    fn bad_step_shape_is_format_error() {
        let err = parse_tutorial(r#"{"tutorial": [{"step": "one", "title": "T", "details": "D"}]}"#).unwrap_err();
        assert!(matches!(err, GuideError::Format(m) if m.contains("unexpected shape")));
    }

    #[test]
    fn step_zero_is_format_error() {
        let raw = r#"{"tutorial": [
            {"step": 0, "title": "Preparation", "details": "Unplug the PC."},
            {"step": 1, "title": "Install", "details": "Seat the card."}
        ]}"#;
        let err = parse_tutorial(raw).unwrap_err();
        assert!(matches!(err, GuideError::Format(m) if m.contains("Preparation")));
    }

    #[test]
    fn negative_step_is_format_error() {
        let raw = r#"{"tutorial": [{"step": -2, "title": "T", "details": "D"}]}"#;
        assert!(matches!(parse_tutorial(raw), Err(GuideError::Format(_))));
    }

    #[test]
    fn prose_is_format_error() {
        assert!(matches!(parse_tutorial("Sure! Here is your guide."), Err(GuideError::Format(_))));
        assert!(matches!(parse_tutorial("   "), Err(GuideError::Format(_))));
    }
}
