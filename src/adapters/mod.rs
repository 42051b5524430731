// Adapters layer: concrete implementations of the domain ports.

pub mod audit_log;
pub mod storage;

pub use audit_log::{FileAuditLog, MemoryAuditLog};
pub use storage::CsvRosterStore;
