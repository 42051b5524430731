pub mod registration;

pub use crate::domain::model::{AuditEntry, AuditLevel, Course, RosterSnapshot, Student};
pub use crate::domain::ports::{AuditSink, RosterStore};
pub use crate::utils::error::Result;
