//! Sequence allocation, row append and recent-row reads over a sheet.

use fieldcrm_protocol::{CallId, CallRecord, SheetConnector, SheetRow, StoreError};
use log::{debug, info, warn};
use std::sync::Arc;

/// Column holding the call identifier.
const CALL_ID_COLUMN: usize = 0;

/// Record store adapter over a column-ordered table.
#[derive(Clone)]
pub struct RecordStore {
    connector: Arc<dyn SheetConnector>,
}

impl RecordStore {
    pub fn new(connector: Arc<dyn SheetConnector>) -> Self {
        Self { connector }
    }

    /// Derive the next call identifier from the highest stored one.
    ///
    /// Re-appended older identifiers (the update path) never lower the
    /// sequence. Never fails: an unreachable store yields `CALL_000000`; an
    /// empty store, a failed scan, or an unparseable last identifier yields
    /// `CALL_000001`.
    pub fn allocate_next_id(&self) -> CallId {
        let sheet = match self.connector.connect() {
            Ok(sheet) => sheet,
            Err(err) => {
                warn!("store unreachable during id allocation: {err}");
                return CallId::offline();
            }
        };
        let ids = match sheet.column(CALL_ID_COLUMN) {
            Ok(ids) => ids,
            Err(err) => {
                warn!("call id scan failed: {err}");
                return CallId::first();
            }
        };
        let Some(last) = ids.last() else {
            debug!("store is empty; starting a new sequence");
            return CallId::first();
        };
        if CallId::parse(last).is_none() {
            warn!("last call id is not sequential (last={last}); restarting sequence");
            return CallId::first();
        }
        let highest = ids
            .iter()
            .filter_map(|raw| CallId::parse(raw))
            .max_by_key(|id| id.sequence().unwrap_or_default());
        match highest.as_ref().and_then(CallId::next) {
            Some(next) => {
                debug!("allocated call id (last={}, next={})", last, next);
                next
            }
            None => {
                warn!("call id sequence exhausted (last={last}); restarting sequence");
                CallId::first()
            }
        }
    }

    /// Append one record in `CallRecord::COLUMNS` order.
    pub fn append(&self, record: &CallRecord) -> Result<(), StoreError> {
        info!("appending call record (call_id={})", record.call_id);
        let mut sheet = self.connector.connect()?;
        sheet.append_row(record.to_row()).map_err(|err| match err {
            StoreError::WriteFailed(reason) => StoreError::WriteFailed(reason),
            other => StoreError::WriteFailed(other.to_string()),
        })
    }

    /// Best-effort read of the last `n` rows, oldest first.
    ///
    /// Returns an empty list on any store fault.
    pub fn read_recent(&self, n: usize) -> Vec<SheetRow> {
        match self.try_read_recent(n) {
            Ok(rows) => rows,
            Err(err) => {
                warn!("recent records unavailable: {err}");
                Vec::new()
            }
        }
    }

    fn try_read_recent(&self, n: usize) -> Result<Vec<SheetRow>, StoreError> {
        let sheet = self.connector.connect()?;
        let header = sheet.header()?;
        let rows = sheet.rows()?;
        let skip = rows.len().saturating_sub(n);
        Ok(rows
            .iter()
            .skip(skip)
            .map(|values| SheetRow::from_header(&header, values))
            .collect())
    }
}
