//! # ToolVault Store
//!
//! Persistence for execution history and parameter templates. Both sit on
//! the [`RecordStore`] trait so callers choose where records live:
//! [`MemoryStore`] for tests and embedding, [`FileStore`] for the CLI.
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use toolvault_core::OutputType;
//! use toolvault_store::{ExecutionHistory, HistoryEntry, MemoryStore};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let history = ExecutionHistory::new(Arc::new(MemoryStore::new()), 100);
//! let entry = HistoryEntry::new("word-count", json!({"text": "a b"}), json!(2), OutputType::Generic);
//! history.record(entry).await.unwrap();
//! assert_eq!(history.list().await.unwrap().len(), 1);
//! # });
//! ```

pub mod file_store;
pub mod history;
pub mod store;
pub mod templates;

pub use file_store::FileStore;
pub use history::{ExecutionHistory, HistoryEntry};
pub use store::{MemoryStore, RecordStore};
pub use templates::{ExecutionTemplate, TemplateBuilder, TemplateLibrary};
