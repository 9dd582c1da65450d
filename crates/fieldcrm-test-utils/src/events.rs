use fieldcrm_protocol::{EventSink, WorkflowEvent, WorkflowState};
use parking_lot::Mutex;
use std::sync::Arc;

/// Sink that keeps every event it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Arc<Mutex<Vec<WorkflowEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> Vec<WorkflowState> {
        self.events.lock().iter().map(|event| event.state).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: WorkflowEvent) {
        self.events.lock().push(event);
    }
}
