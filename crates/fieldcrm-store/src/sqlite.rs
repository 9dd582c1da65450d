//! SQLite-backed table.

use fieldcrm_protocol::{Sheet, SheetConnector, StoreError};
use log::{debug, warn};
use rusqlite::{Connection, params_from_iter};
use std::path::{Path, PathBuf};

/// Opens a fresh SQLite connection per operation.
///
/// The table stores every column as TEXT; insertion order is `rowid` order.
#[derive(Debug, Clone)]
pub struct SqliteSheetConnector {
    path: PathBuf,
    table: String,
    columns: Vec<String>,
}

impl SqliteSheetConnector {
    /// `table` must be a plain identifier; config validation enforces this.
    pub fn new(path: impl AsRef<Path>, table: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            table: table.into(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
        }
    }
}

impl SheetConnector for SqliteSheetConnector {
    fn connect(&self) -> Result<Box<dyn Sheet>, StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.is_dir()
        {
            warn!(
                "sqlite store directory missing (path={})",
                self.path.display()
            );
            return Err(StoreError::ConnectionFailed);
        }
        let conn = Connection::open(&self.path).map_err(|err| {
            warn!(
                "failed to open sqlite store (path={}): {err}",
                self.path.display()
            );
            StoreError::ConnectionFailed
        })?;
        let columns = self
            .columns
            .iter()
            .map(|column| format!("\"{column}\" TEXT NOT NULL DEFAULT ''"))
            .collect::<Vec<_>>()
            .join(", ");
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" ({columns});",
            self.table
        ))
        .map_err(|err| {
            warn!("failed to prepare sqlite table {}: {err}", self.table);
            StoreError::ConnectionFailed
        })?;
        debug!(
            "opened sqlite store (path={}, table={})",
            self.path.display(),
            self.table
        );
        Ok(Box::new(SqliteSheet {
            conn,
            table: self.table.clone(),
            columns: self.columns.clone(),
        }))
    }
}

struct SqliteSheet {
    conn: Connection,
    table: String,
    columns: Vec<String>,
}

impl SqliteSheet {
    fn select(&self, columns: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let sql = format!("SELECT {columns} FROM \"{}\" ORDER BY rowid", self.table);
        let mut stmt = self.conn.prepare(&sql).map_err(read_failed)?;
        let width = stmt.column_count();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|idx| row.get::<_, String>(idx))
                    .collect::<Result<Vec<_>, _>>()
            })
            .map_err(read_failed)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(read_failed)
    }

    fn quoted_columns(&self) -> String {
        self.columns
            .iter()
            .map(|column| format!("\"{column}\""))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Sheet for SqliteSheet {
    fn header(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.columns.clone())
    }

    fn column(&self, index: usize) -> Result<Vec<String>, StoreError> {
        let Some(column) = self.columns.get(index) else {
            return Err(StoreError::ReadFailed(format!("no column at index {index}")));
        };
        let rows = self.select(&format!("\"{column}\""))?;
        Ok(rows.into_iter().filter_map(|row| row.into_iter().next()).collect())
    }

    fn rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        self.select(&self.quoted_columns())
    }

    fn append_row(&mut self, row: Vec<String>) -> Result<(), StoreError> {
        if row.len() != self.columns.len() {
            return Err(StoreError::WriteFailed(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        let placeholders = vec!["?"; row.len()].join(", ");
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({placeholders})",
            self.table,
            self.quoted_columns()
        );
        self.conn
            .execute(&sql, params_from_iter(row.iter()))
            .map_err(|err| StoreError::WriteFailed(err.to_string()))?;
        Ok(())
    }
}

fn read_failed(err: rusqlite::Error) -> StoreError {
    StoreError::ReadFailed(err.to_string())
}
