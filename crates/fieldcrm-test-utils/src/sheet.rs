use fieldcrm_protocol::{CallRecord, Sheet, SheetConnector, StoreError};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct SheetState {
    rows: Vec<Vec<String>>,
    appends: usize,
    read_error: Option<String>,
    write_error: Option<String>,
}

/// In-memory table with the call record header. Clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    state: Arc<Mutex<SheetState>>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows holding only a call id; other cells are blank.
    pub fn with_call_ids(ids: &[&str]) -> Self {
        let sheet = Self::new();
        for id in ids {
            let mut row = vec![String::new(); CallRecord::COLUMNS.len()];
            row[0] = id.to_string();
            sheet.push_row(row);
        }
        sheet
    }

    pub fn failing_reads(self, message: impl Into<String>) -> Self {
        self.state.lock().read_error = Some(message.into());
        self
    }

    pub fn failing_writes(self, message: impl Into<String>) -> Self {
        self.state.lock().write_error = Some(message.into());
        self
    }

    /// Insert a row directly, bypassing the append counter.
    pub fn push_row(&self, row: Vec<String>) {
        self.state.lock().rows.push(row);
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.state.lock().rows.clone()
    }

    /// Number of successful appends made through a handle.
    pub fn append_count(&self) -> usize {
        self.state.lock().appends
    }
}

impl SheetConnector for MemorySheet {
    fn connect(&self) -> Result<Box<dyn Sheet>, StoreError> {
        Ok(Box::new(MemorySheetHandle {
            state: self.state.clone(),
        }))
    }
}

struct MemorySheetHandle {
    state: Arc<Mutex<SheetState>>,
}

impl MemorySheetHandle {
    fn check_read(&self) -> Result<(), StoreError> {
        match &self.state.lock().read_error {
            Some(message) => Err(StoreError::ReadFailed(message.clone())),
            None => Ok(()),
        }
    }
}

impl Sheet for MemorySheetHandle {
    fn header(&self) -> Result<Vec<String>, StoreError> {
        self.check_read()?;
        Ok(CallRecord::COLUMNS
            .iter()
            .map(|column| column.to_string())
            .collect())
    }

    fn column(&self, index: usize) -> Result<Vec<String>, StoreError> {
        self.check_read()?;
        Ok(self
            .state
            .lock()
            .rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or_default())
            .collect())
    }

    fn rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        self.check_read()?;
        Ok(self.state.lock().rows.clone())
    }

    fn append_row(&mut self, row: Vec<String>) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if let Some(message) = &state.write_error {
            return Err(StoreError::WriteFailed(message.clone()));
        }
        state.rows.push(row);
        state.appends += 1;
        Ok(())
    }
}

/// Connector whose store can never be reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineConnector;

impl SheetConnector for OfflineConnector {
    fn connect(&self) -> Result<Box<dyn Sheet>, StoreError> {
        Err(StoreError::ConnectionFailed)
    }
}
