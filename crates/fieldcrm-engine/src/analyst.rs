use crate::action::{LOG_CRM_ENTRY, log_crm_entry_spec};
use crate::prompt::build_instruction;
use fieldcrm_protocol::{
    ActionInvocation, ActionPolicy, EngineResponse, GenerationRequest, ReasoningEngine,
    SubmitRequest, WorkflowError,
};
use log::{debug, warn};
use std::sync::Arc;

/// Runs the forced-action analysis of one visit note.
#[derive(Clone)]
pub struct CallAnalyst {
    engine: Arc<dyn ReasoningEngine>,
}

impl CallAnalyst {
    pub fn new(engine: Arc<dyn ReasoningEngine>) -> Self {
        Self { engine }
    }

    /// Generation request offering only `log_crm_entry`, with invocation forced.
    pub fn build_request(request: &SubmitRequest) -> GenerationRequest {
        GenerationRequest {
            instruction: build_instruction(request),
            actions: vec![log_crm_entry_spec()],
            policy: ActionPolicy::forced(LOG_CRM_ENTRY),
        }
    }

    /// Ask the engine to analyze the note and invoke the save action.
    ///
    /// Exactly one engine call is made. Engine faults surface as
    /// `EngineException`; a text-only answer or an invocation of anything
    /// other than `log_crm_entry` is `ActionRefused`.
    pub async fn analyze_and_decide(
        &self,
        request: &SubmitRequest,
    ) -> Result<ActionInvocation, WorkflowError> {
        let generation = Self::build_request(request);
        debug!(
            "requesting analysis (call_id={}, prompt_len={})",
            request.call_id,
            generation.instruction.len()
        );
        let response = self.engine.generate(&generation).await.map_err(|err| {
            warn!("engine call failed (call_id={}): {}", request.call_id, err);
            WorkflowError::from(err)
        })?;
        match response {
            EngineResponse::Invocation(invocation) if invocation.name == LOG_CRM_ENTRY => {
                debug!(
                    "engine invoked {} with {} argument(s)",
                    invocation.name,
                    invocation.args.len()
                );
                Ok(invocation)
            }
            EngineResponse::Invocation(invocation) => {
                warn!(
                    "engine invoked unexpected action {} (call_id={})",
                    invocation.name, request.call_id
                );
                Err(WorkflowError::ActionRefused)
            }
            EngineResponse::Refusal { text } => {
                warn!(
                    "engine answered without saving (call_id={}, text_len={})",
                    request.call_id,
                    text.len()
                );
                Err(WorkflowError::ActionRefused)
            }
            EngineResponse::Empty => Err(WorkflowError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcrm_protocol::{CallingMode, EngineError};
    use fieldcrm_test_utils::{FailingEngine, ScriptedEngine, log_crm_entry_args, sample_request};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn forced_invocation_is_returned() {
        let engine = ScriptedEngine::invoking(LOG_CRM_ENTRY, log_crm_entry_args());
        let analyst = CallAnalyst::new(Arc::new(engine.clone()));

        let invocation = analyst
            .analyze_and_decide(&sample_request())
            .await
            .expect("invocation");

        assert_eq!(invocation.args, log_crm_entry_args());
        assert_eq!(engine.call_count(), 1);
        let request = engine.last_request().expect("request");
        assert_eq!(request.policy.mode, CallingMode::Any);
        assert_eq!(request.policy.allowed, vec![LOG_CRM_ENTRY.to_string()]);
        assert_eq!(request.actions.len(), 1);
    }

    #[tokio::test]
    async fn text_answer_is_refusal() {
        let analyst = CallAnalyst::new(Arc::new(ScriptedEngine::refusing("Looks fine to me.")));
        let err = analyst
            .analyze_and_decide(&sample_request())
            .await
            .expect_err("refusal");
        assert_eq!(err, WorkflowError::ActionRefused);
    }

    #[tokio::test]
    async fn other_action_is_refusal() {
        let analyst = CallAnalyst::new(Arc::new(ScriptedEngine::invoking(
            "delete_everything",
            log_crm_entry_args(),
        )));
        let err = analyst
            .analyze_and_decide(&sample_request())
            .await
            .expect_err("refusal");
        assert_eq!(err, WorkflowError::ActionRefused);
    }

    #[tokio::test]
    async fn empty_output_is_reported() {
        let analyst = CallAnalyst::new(Arc::new(ScriptedEngine::empty()));
        let err = analyst
            .analyze_and_decide(&sample_request())
            .await
            .expect_err("empty");
        assert_eq!(err, WorkflowError::EmptyResponse);
    }

    #[tokio::test]
    async fn engine_faults_become_exceptions() {
        let analyst = CallAnalyst::new(Arc::new(FailingEngine::new(EngineError::Quota(
            "429 Resource exhausted".to_string(),
        ))));
        let err = analyst
            .analyze_and_decide(&sample_request())
            .await
            .expect_err("exception");
        assert_eq!(
            err.to_string(),
            "Workflow Exception: quota exceeded: 429 Resource exhausted"
        );
    }
}
