use fieldcrm_protocol::{CallDate, CallId, SubmitRequest};
use serde_json::{Map, Value, json};

/// Visit used across workflow tests.
pub fn sample_request() -> SubmitRequest {
    SubmitRequest {
        call_id: CallId::from_sequence(7),
        hcp_id: "HCP_00123".to_string(),
        rep_id: "REP_048".to_string(),
        call_date: CallDate::parse("01/02/2024").unwrap_or_else(CallDate::today),
        raw_note: "Discussed drug X efficacy, HCP skeptical".to_string(),
    }
}

/// Complete `log_crm_entry` arguments for `sample_request`, without topics.
pub fn log_crm_entry_args() -> Map<String, Value> {
    let value = json!({
        "call_id": "CALL_000007",
        "hcp_id": "HCP_00123",
        "rep_id": "REP_048",
        "call_date": "01/02/2024",
        "summary": "HCP skeptical about drug X efficacy.",
        "sentiment": "Low",
        "next_action": "Follow up with study data",
        "risk_flag": "FALSE",
        "coaching_tip": "Lead with data next time",
    });
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
