//! Validation and normalisation of `log_crm_entry` arguments.

use fieldcrm_protocol::{
    ActionInvocation, CallAnalysis, CallDate, CallRecord, STATUS_SUCCESS, SubmitRequest,
    WorkflowError,
};
use log::warn;
use serde_json::{Map, Value};

/// Analysis arguments the workflow needs downstream, in check order.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "summary",
    "sentiment",
    "next_action",
    "risk_flag",
    "coaching_tip",
];

/// Analysis fields taken from a validated save action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAction {
    pub summary: String,
    pub sentiment: String,
    pub topics: String,
    pub next_action: String,
    pub risk_flag: String,
    pub coaching_tip: String,
}

impl ValidatedAction {
    /// Full record for `request`, carrying the caller's identity fields and
    /// the verbatim note.
    pub fn to_record(&self, request: &SubmitRequest) -> CallRecord {
        CallRecord {
            call_id: request.call_id.clone(),
            hcp_id: request.hcp_id.clone(),
            rep_id: request.rep_id.clone(),
            call_date: request.call_date,
            raw_note: request.raw_note.clone(),
            summary: self.summary.clone(),
            sentiment: self.sentiment.clone(),
            topics: self.topics.clone(),
            next_action: self.next_action.clone(),
            risk_flag: self.risk_flag.clone(),
            coaching_tip: self.coaching_tip.clone(),
        }
    }

    pub fn into_analysis(self) -> CallAnalysis {
        CallAnalysis {
            summary: self.summary,
            hcp_sentiment: self.sentiment,
            next_best_action: self.next_action,
            compliance_flag: self.risk_flag,
            coaching_tip: self.coaching_tip,
            status: STATUS_SUCCESS.to_string(),
        }
    }
}

/// Check the invocation for every required field and normalise the values.
///
/// The first missing field in `REQUIRED_FIELDS` order is reported.
pub fn validate_action(
    invocation: &ActionInvocation,
    request: &SubmitRequest,
) -> Result<ValidatedAction, WorkflowError> {
    let args = &invocation.args;
    let [summary, sentiment, next_action, risk_flag, coaching_tip] =
        REQUIRED_FIELDS.map(|field| required(args, field));
    let topics = args
        .get("topics")
        .and_then(coerce)
        .unwrap_or_else(|| CallRecord::DEFAULT_TOPICS.to_string());

    check_identity_echo(args, request);

    Ok(ValidatedAction {
        summary: summary?,
        sentiment: sentiment?,
        topics,
        next_action: next_action?,
        risk_flag: risk_flag?,
        coaching_tip: coaching_tip?,
    })
}

fn required(args: &Map<String, Value>, field: &str) -> Result<String, WorkflowError> {
    args.get(field)
        .and_then(coerce)
        .ok_or_else(|| WorkflowError::MalformedAction(field.to_string()))
}

/// Scalar argument as text; `None` for null, blank, or structured values.
/// Strings are kept exactly as the model sent them.
fn coerce(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.clone(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(number) => number.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

fn check_identity_echo(args: &Map<String, Value>, request: &SubmitRequest) {
    let expected = [
        ("call_id", request.call_id.to_string()),
        ("hcp_id", request.hcp_id.clone()),
        ("rep_id", request.rep_id.clone()),
    ];
    for (field, expected) in expected {
        if let Some(echoed) = args.get(field).and_then(coerce)
            && echoed.trim() != expected
        {
            warn!(
                "model echoed a different {} (call_id={}, echoed={})",
                field, request.call_id, echoed
            );
        }
    }
    if let Some(echoed) = args.get("call_date").and_then(coerce)
        && CallDate::parse(&echoed) != Some(request.call_date)
    {
        warn!(
            "model echoed a different call_date (call_id={}, echoed={})",
            request.call_id, echoed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcrm_test_utils::{log_crm_entry_args, sample_request};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn invocation(args: Map<String, Value>) -> ActionInvocation {
        ActionInvocation {
            name: "log_crm_entry".to_string(),
            args,
        }
    }

    #[test]
    fn complete_arguments_validate() {
        let action = validate_action(&invocation(log_crm_entry_args()), &sample_request())
            .expect("valid");
        assert_eq!(action.sentiment, "Low");
        assert_eq!(action.risk_flag, "FALSE");
        assert_eq!(action.topics, "General");
    }

    #[test]
    fn first_missing_field_is_reported() {
        let mut args = log_crm_entry_args();
        args.remove("risk_flag");
        args.remove("coaching_tip");
        assert_eq!(
            validate_action(&invocation(args), &sample_request()),
            Err(WorkflowError::MalformedAction("risk_flag".to_string()))
        );
    }

    #[test]
    fn blank_and_structured_values_count_as_missing() {
        for value in [json!(""), json!("   "), json!(null), json!(["a"]), json!({"k": 1})] {
            let mut args = log_crm_entry_args();
            args.insert("summary".to_string(), value);
            assert_eq!(
                validate_action(&invocation(args), &sample_request()),
                Err(WorkflowError::MalformedAction("summary".to_string()))
            );
        }
    }

    #[test]
    fn scalars_are_coerced_to_text() {
        let mut args = log_crm_entry_args();
        args.insert("risk_flag".to_string(), json!(true));
        args.insert("sentiment".to_string(), json!(3));
        args.insert("topics".to_string(), json!("Efficacy, Dosing"));
        let action = validate_action(&invocation(args), &sample_request()).expect("valid");
        assert_eq!(action.risk_flag, "TRUE");
        assert_eq!(action.sentiment, "3");
        assert_eq!(action.topics, "Efficacy, Dosing");
    }

    #[test]
    fn string_arguments_pass_through_unmodified() {
        let mut args = log_crm_entry_args();
        args.insert(
            "coaching_tip".to_string(),
            json!("  1. Lead with data\n  2. Ask about dosing\n"),
        );
        let action = validate_action(&invocation(args), &sample_request()).expect("valid");
        assert_eq!(action.coaching_tip, "  1. Lead with data\n  2. Ask about dosing\n");
    }

    #[test]
    fn record_keeps_caller_identity_and_note() {
        let mut args = log_crm_entry_args();
        args.insert("hcp_id".to_string(), json!("HCP_99999"));
        args.insert("summary".to_string(), json!("Model rewrote the note."));
        let request = sample_request();
        let record = validate_action(&invocation(args), &request)
            .expect("valid")
            .to_record(&request);
        assert_eq!(record.hcp_id, "HCP_00123");
        assert_eq!(record.raw_note, request.raw_note);
        assert_eq!(record.summary, "Model rewrote the note.");
    }

    #[test]
    fn analysis_uses_response_field_names() {
        let analysis = validate_action(&invocation(log_crm_entry_args()), &sample_request())
            .expect("valid")
            .into_analysis();
        assert_eq!(analysis.hcp_sentiment, "Low");
        assert_eq!(analysis.next_best_action, "Follow up with study data");
        assert_eq!(analysis.compliance_flag, "FALSE");
        assert_eq!(analysis.status, "success");
    }
}
