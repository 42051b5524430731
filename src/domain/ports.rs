use crate::domain::model::{AuditEntry, RosterSnapshot};
use crate::utils::error::Result;

/// Append-only destination for audit entries.
pub trait AuditSink {
    /// Writes one entry and makes it durable before returning.
    fn append(&mut self, entry: &AuditEntry) -> Result<()>;

    /// Flushes and releases the sink. Called once at shutdown.
    fn close(&mut self) -> Result<()>;
}

pub trait RosterStore {
    fn load(&self) -> Result<RosterSnapshot>;
    fn save(&self, snapshot: &RosterSnapshot) -> Result<()>;
}

pub trait ConfigProvider {
    fn audit_log_path(&self) -> &str;
    fn data_dir(&self) -> Option<&str>;
    fn autosave(&self) -> bool;
    fn verbose(&self) -> bool;
}
