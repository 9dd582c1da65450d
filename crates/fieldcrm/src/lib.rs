//! Public surface of the fieldcrm call intake agent.
//!
//! Re-exports the workspace crates and holds the small pieces of glue the
//! `fieldcrm` binary needs: logging setup and terminal progress output.

pub use fieldcrm_config as config;
pub use fieldcrm_core as core;
pub use fieldcrm_protocol as protocol;
pub use fieldcrm_store as store;

use fieldcrm_config::RepProfile;
use fieldcrm_protocol::{EventSink, SubmitResponse, WorkflowEvent, WorkflowState};

/// Initialize `env_logger` with millisecond timestamps; `RUST_LOG` applies.
///
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}

/// Writes one progress line per workflow transition to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrProgress;

impl EventSink for StderrProgress {
    fn emit(&self, event: WorkflowEvent) {
        eprintln!("{}", progress_line(&event));
    }
}

pub fn progress_line(event: &WorkflowEvent) -> String {
    let label = match event.state {
        WorkflowState::Idle => "waiting",
        WorkflowState::Analyzing => "analyzing note and checking compliance",
        WorkflowState::Validating => "validating agent action",
        WorkflowState::Persisting => "saving record",
        WorkflowState::Done => "saved",
        WorkflowState::Failed => "failed",
    };
    match &event.error {
        Some(error) => format!("[{}] {}: {}", event.call_id, label, error),
        None => format!("[{}] {}", event.call_id, label),
    }
}

/// Header naming the rep a submission is logged for.
pub fn rep_banner(rep: &RepProfile) -> String {
    format!("Rep: {} ({}) | Territory: {}", rep.name, rep.id, rep.territory)
}

/// Alert line for a saved analysis that carries a compliance risk.
pub fn compliance_notice(response: &SubmitResponse) -> Option<String> {
    let analysis = response.analysis()?;
    analysis.compliance_risk().then(|| {
        format!(
            "COMPLIANCE RISK flagged; review before follow-up: {}",
            analysis.summary
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fieldcrm_protocol::{CallAnalysis, CallId, STATUS_SUCCESS, WorkflowError};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn event(state: WorkflowState, error: Option<&str>) -> WorkflowEvent {
        WorkflowEvent {
            submission_id: Uuid::new_v4(),
            call_id: CallId::from_sequence(12),
            state,
            error: error.map(str::to_string),
            at: Utc::now(),
        }
    }

    #[test]
    fn progress_lines_name_the_call() {
        assert_eq!(
            progress_line(&event(WorkflowState::Persisting, None)),
            "[CALL_000012] saving record"
        );
        assert_eq!(
            progress_line(&event(
                WorkflowState::Failed,
                Some("Agent produced empty response.")
            )),
            "[CALL_000012] failed: Agent produced empty response."
        );
    }

    #[test]
    fn rep_banner_shows_profile() {
        assert_eq!(
            rep_banner(&RepProfile::default()),
            "Rep: Sarah Jenkins (REP_048) | Territory: Northeast - Oncology"
        );
    }

    #[test]
    fn compliance_notice_only_for_flagged_saves() {
        let analysis = |flag: &str| {
            SubmitResponse::Success(CallAnalysis {
                summary: "Mentioned off-label use".to_string(),
                hcp_sentiment: "Medium".to_string(),
                next_best_action: "Send label".to_string(),
                compliance_flag: flag.to_string(),
                coaching_tip: "Stay on label".to_string(),
                status: STATUS_SUCCESS.to_string(),
            })
        };
        assert_eq!(
            compliance_notice(&analysis("TRUE")),
            Some("COMPLIANCE RISK flagged; review before follow-up: Mentioned off-label use".to_string())
        );
        assert_eq!(compliance_notice(&analysis("FALSE")), None);
        assert_eq!(
            compliance_notice(&SubmitResponse::from(WorkflowError::EmptyResponse)),
            None
        );
    }
}
