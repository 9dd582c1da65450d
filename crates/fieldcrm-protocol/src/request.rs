//! Submission request and response contract for presentation layers.

use crate::error::{IntakeError, WorkflowError};
use crate::id::{CallDate, CallId};
use serde::{Deserialize, Serialize};

/// Status value carried by successful responses.
pub const STATUS_SUCCESS: &str = "success";
/// HCP identifiers must be longer than this.
const MIN_HCP_ID_LEN: usize = 6;

/// Fields captured for one visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub call_id: CallId,
    pub hcp_id: String,
    pub rep_id: String,
    pub call_date: CallDate,
    pub raw_note: String,
}

impl SubmitRequest {
    /// Caller-boundary precondition check, run before `submit`.
    pub fn check_intake(&self) -> Result<(), IntakeError> {
        if self.hcp_id.trim().chars().count() <= MIN_HCP_ID_LEN {
            return Err(IntakeError::InvalidHcpId);
        }
        if self.raw_note.trim().is_empty() {
            return Err(IntakeError::EmptyNote);
        }
        if self.call_id.is_offline() {
            return Err(IntakeError::OfflineCallId(self.call_id.to_string()));
        }
        Ok(())
    }
}

/// Normalized analysis returned after a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallAnalysis {
    pub summary: String,
    pub hcp_sentiment: String,
    pub next_best_action: String,
    pub compliance_flag: String,
    pub coaching_tip: String,
    pub status: String,
}

impl CallAnalysis {
    /// True when the model flagged a compliance risk.
    pub fn compliance_risk(&self) -> bool {
        self.compliance_flag.trim().eq_ignore_ascii_case("TRUE")
    }
}

/// Result of one submission: the analysis, or a single human-readable error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmitResponse {
    Success(CallAnalysis),
    Failed { error: String },
}

impl SubmitResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitResponse::Success(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmitResponse::Success(_) => None,
            SubmitResponse::Failed { error } => Some(error),
        }
    }

    pub fn analysis(&self) -> Option<&CallAnalysis> {
        match self {
            SubmitResponse::Success(analysis) => Some(analysis),
            SubmitResponse::Failed { .. } => None,
        }
    }
}

impl From<WorkflowError> for SubmitResponse {
    fn from(err: WorkflowError) -> Self {
        SubmitResponse::Failed {
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request(hcp_id: &str, note: &str) -> SubmitRequest {
        SubmitRequest {
            call_id: CallId::from_sequence(7),
            hcp_id: hcp_id.to_string(),
            rep_id: "REP_048".to_string(),
            call_date: CallDate::parse("01/02/2024").expect("date"),
            raw_note: note.to_string(),
        }
    }

    #[test]
    fn intake_requires_hcp_id_and_note() {
        assert_eq!(request("HCP_00123", "met").check_intake(), Ok(()));
        assert_eq!(
            request("HCP_00", "met").check_intake(),
            Err(IntakeError::InvalidHcpId)
        );
        assert_eq!(
            request("HCP_00123", "  \n").check_intake(),
            Err(IntakeError::EmptyNote)
        );
    }

    #[test]
    fn intake_rejects_offline_sentinel() {
        let mut req = request("HCP_00123", "met");
        req.call_id = CallId::offline();
        assert_eq!(
            req.check_intake(),
            Err(IntakeError::OfflineCallId("CALL_000000".to_string()))
        );
    }

    #[test]
    fn responses_serialize_to_flat_maps() {
        let ok = SubmitResponse::Success(CallAnalysis {
            summary: "s".to_string(),
            hcp_sentiment: "Low".to_string(),
            next_best_action: "n".to_string(),
            compliance_flag: "FALSE".to_string(),
            coaching_tip: "c".to_string(),
            status: STATUS_SUCCESS.to_string(),
        });
        assert_eq!(
            serde_json::to_value(&ok).expect("json"),
            json!({
                "summary": "s",
                "hcp_sentiment": "Low",
                "next_best_action": "n",
                "compliance_flag": "FALSE",
                "coaching_tip": "c",
                "status": "success",
            })
        );

        let failed = SubmitResponse::from(WorkflowError::ActionRefused);
        assert_eq!(
            serde_json::to_value(&failed).expect("json"),
            json!({ "error": "Agent analyzed but refused to execute save." })
        );
        assert_eq!(failed.is_success(), false);
    }

    #[test]
    fn compliance_risk_reads_flag() {
        let mut analysis = CallAnalysis {
            summary: String::new(),
            hcp_sentiment: String::new(),
            next_best_action: String::new(),
            compliance_flag: "true".to_string(),
            coaching_tip: String::new(),
            status: STATUS_SUCCESS.to_string(),
        };
        assert!(analysis.compliance_risk());
        analysis.compliance_flag = "FALSE".to_string();
        assert!(!analysis.compliance_risk());
    }
}
