use serde_json::{json, Value};

/// Name under which the structured-output schema is declared.
pub const SCHEMA_NAME: &str = "upgrade_tutorial";

/// Fixed response schema sent with every request.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "warnings": {
                "type": "array",
                "description": "A list of potential compatibility warnings or important notes before starting.",
                "items": { "type": "string" }
            },
            "tutorial": {
                "type": "array",
                "description": "An array of steps for the upgrade process.",
                "items": {
                    "type": "object",
                    "properties": {
                        "step": { "type": "integer", "description": "The step number." },
                        "title": { "type": "string", "description": "A concise title for the step." },
                        "details": {
                            "type": "string",
                            "description": "Detailed instructions for completing the step."
                        }
                    },
                    "required": ["step", "title", "details"]
                }
            }
        },
        "required": ["warnings", "tutorial"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_tutorial_and_step_fields() {
        let schema = response_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("tutorial")));
        assert_eq!(
            schema["properties"]["tutorial"]["items"]["required"],
            json!(["step", "title", "details"])
        );
        assert_eq!(schema["properties"]["tutorial"]["items"]["properties"]["step"]["type"], "integer");
    }
}
