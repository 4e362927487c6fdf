use crate::tutorial::TutorialResponse;

const STEP_RULE: &str = "----------------\n";

/// Plain-text rendering of a tutorial, warnings first.
pub fn render_text(response: &TutorialResponse) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str("PC Upgrade Guide\n");
    out.push_str("=====================\n\n");

    if !response.warnings.is_empty() {
        out.push_str("COMPATIBILITY WARNINGS:\n");
        out.push_str("------------------------\n");
        for warning in &response.warnings {
            out.push_str("- ");
            out.push_str(warning);
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str("UPGRADE STEPS:\n");
    out.push_str(STEP_RULE);
    for item in &response.tutorial {
        out.push_str(&format!("\nStep {}: {}\n\n", item.step, item.title));
        out.push_str(&item.details);
        out.push_str("\n\n");
        out.push_str(STEP_RULE);
    }
    out
}
