//! The `log_crm_entry` action declaration.

use fieldcrm_protocol::ActionSpec;
use serde_json::json;

/// Name of the save action the model must invoke.
pub const LOG_CRM_ENTRY: &str = "log_crm_entry";

/// Arguments the schema marks as required.
pub const REQUIRED_ARGS: [&str; 9] = [
    "call_id",
    "hcp_id",
    "rep_id",
    "call_date",
    "summary",
    "sentiment",
    "next_action",
    "risk_flag",
    "coaching_tip",
];

/// Declaration of the save action and its argument schema.
pub fn log_crm_entry_spec() -> ActionSpec {
    ActionSpec {
        name: LOG_CRM_ENTRY.to_string(),
        description: "Saves analyzed pharmaceutical call data to the CRM database.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "call_id": { "type": "string" },
                "hcp_id": { "type": "string" },
                "rep_id": { "type": "string" },
                "call_date": { "type": "string" },
                "summary": { "type": "string", "description": "Concise business summary" },
                "sentiment": { "type": "string", "description": "High/Medium/Low" },
                "topics": { "type": "string", "description": "Medical topics discussed" },
                "next_action": { "type": "string", "description": "Specific follow-up" },
                "risk_flag": { "type": "string", "description": "TRUE if compliance risk detected" },
                "coaching_tip": { "type": "string", "description": "Feedback for the Rep" },
            },
            "required": REQUIRED_ARGS,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn topics_is_the_only_optional_argument() {
        let spec = log_crm_entry_spec();
        let properties = spec.parameters["properties"]
            .as_object()
            .expect("properties");
        let required = spec.parameters["required"].as_array().expect("required");
        let optional = properties
            .keys()
            .filter(|key| !required.iter().any(|value| value == key.as_str()))
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(optional, vec!["topics".to_string()]);
        assert_eq!(required.len(), 9);
    }
}
