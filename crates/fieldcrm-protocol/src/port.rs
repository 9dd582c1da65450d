//! Capability ports for the record store and the reasoning engine.

use crate::action::{EngineResponse, GenerationRequest};
use crate::error::{EngineError, StoreError};
use async_trait::async_trait;

/// Opens handles to a column-ordered table.
///
/// A fresh handle is opened for every store operation; connectors must not
/// cache state such as the last sequence value between calls.
pub trait SheetConnector: Send + Sync {
    /// Establish a handle, or fail with `StoreError::ConnectionFailed`.
    fn connect(&self) -> Result<Box<dyn Sheet>, StoreError>;
}

/// An open handle to a column-ordered, append-only table.
pub trait Sheet {
    /// Column names in table order.
    fn header(&self) -> Result<Vec<String>, StoreError>;

    /// Data values of one column in insertion order, header excluded.
    fn column(&self, index: usize) -> Result<Vec<String>, StoreError>;

    /// All data rows in insertion order, header excluded.
    fn rows(&self) -> Result<Vec<Vec<String>>, StoreError>;

    /// Append one row in column order.
    fn append_row(&mut self, row: Vec<String>) -> Result<(), StoreError>;
}

/// Remote structured-generation capability.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Run one generation call and report the first output part.
    async fn generate(&self, request: &GenerationRequest) -> Result<EngineResponse, EngineError>;
}
