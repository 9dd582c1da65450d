//! Append-only JSONL table: one JSON array of strings per line, header first.

use fieldcrm_protocol::{Sheet, SheetConnector, StoreError};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Opens the JSONL table file per operation, creating it with a header line
/// on first use. A missing parent directory makes the store unreachable.
#[derive(Debug, Clone)]
pub struct JsonlSheetConnector {
    path: PathBuf,
    columns: Vec<String>,
    /// Serializes appends from handles of this connector.
    write_lock: Arc<Mutex<()>>,
}

impl JsonlSheetConnector {
    pub fn new(path: impl AsRef<Path>, columns: &[&str]) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Write the header line unless the file already has content.
    ///
    /// A zero-byte file (interrupted creation, `touch`) is treated as new.
    fn ensure_header(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| {
                warn!(
                    "failed to open jsonl store (path={}): {err}",
                    self.path.display()
                );
                StoreError::ConnectionFailed
            })?;
        let len = file
            .metadata()
            .map_err(|_| StoreError::ConnectionFailed)?
            .len();
        if len > 0 {
            return Ok(());
        }
        let header = serde_json::to_string(&self.columns)
            .map_err(|err| StoreError::WriteFailed(err.to_string()))?;
        writeln!(file, "{header}").map_err(|_| StoreError::ConnectionFailed)?;
        info!("initialized jsonl store (path={})", self.path.display());
        Ok(())
    }
}

impl SheetConnector for JsonlSheetConnector {
    fn connect(&self) -> Result<Box<dyn Sheet>, StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.is_dir()
        {
            warn!(
                "jsonl store directory missing (path={})",
                self.path.display()
            );
            return Err(StoreError::ConnectionFailed);
        }
        self.ensure_header()?;
        debug!("opened jsonl store (path={})", self.path.display());
        Ok(Box::new(JsonlSheet {
            path: self.path.clone(),
            write_lock: self.write_lock.clone(),
        }))
    }
}

struct JsonlSheet {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonlSheet {
    /// Read every line, header included.
    fn read_lines(&self) -> Result<Vec<Vec<String>>, StoreError> {
        let file = File::open(&self.path).map_err(|err| StoreError::ReadFailed(err.to_string()))?;
        let mut lines = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|err| StoreError::ReadFailed(err.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            let cells: Vec<String> = serde_json::from_str(&line)
                .map_err(|err| StoreError::ReadFailed(err.to_string()))?;
            lines.push(cells);
        }
        Ok(lines)
    }
}

impl Sheet for JsonlSheet {
    fn header(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read_lines()?.into_iter().next().unwrap_or_default())
    }

    fn column(&self, index: usize) -> Result<Vec<String>, StoreError> {
        Ok(self
            .rows()?
            .into_iter()
            .map(|row| row.into_iter().nth(index).unwrap_or_default())
            .collect())
    }

    fn rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        Ok(self.read_lines()?.into_iter().skip(1).collect())
    }

    fn append_row(&mut self, row: Vec<String>) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let line =
            serde_json::to_string(&row).map_err(|err| StoreError::WriteFailed(err.to_string()))?;
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|err| StoreError::WriteFailed(err.to_string()))?;
        writeln!(file, "{line}").map_err(|err| StoreError::WriteFailed(err.to_string()))?;
        Ok(())
    }
}
