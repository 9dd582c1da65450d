//! Analysis instruction assembly.

use crate::action::LOG_CRM_ENTRY;
use fieldcrm_protocol::SubmitRequest;

/// Render the instruction for one visit.
///
/// Output depends only on the request, so identical submissions produce
/// identical prompts.
pub fn build_instruction(request: &SubmitRequest) -> String {
    let mut sections = Vec::with_capacity(3);
    sections.push("ROLE: You are an expert pharmaceutical sales operations agent.".to_string());
    sections.push(format!(
        "CONTEXT:\n- ID: {} | HCP: {} | Rep: {} | Date: {}\n- INPUT NOTE: \"{}\"",
        request.call_id, request.hcp_id, request.rep_id, request.call_date, request.raw_note
    ));
    sections.push(format!(
        "GOAL:\n\
         1. Analyze the note for compliance risks (off-label claims, side effects).\n\
         2. Extract business intelligence (sentiment, topics).\n\
         3. Generate a coaching tip for the rep.\n\
         4. EXECUTE the '{LOG_CRM_ENTRY}' tool to save the record."
    ));
    sections.join("\n\n")
}
