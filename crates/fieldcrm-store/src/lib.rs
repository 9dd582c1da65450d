//! Record store adapter for analyzed calls.
//!
//! `RecordStore` allocates sequential call identifiers, appends call records
//! in fixed column order, and serves advisory reads of recent rows. Tables are
//! reached through a `SheetConnector`; SQLite and JSONL backends ship here.

mod adapter;
mod jsonl;
mod sqlite;

pub use adapter::RecordStore;
pub use jsonl::JsonlSheetConnector;
pub use sqlite::SqliteSheetConnector;
