pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{CsvRosterStore, FileAuditLog, MemoryAuditLog};
pub use app::Shell;
pub use core::registration::RegistrationService;
pub use domain::model::{AuditEntry, AuditLevel, Course, RosterSnapshot, Student};
pub use domain::ports::{AuditSink, ConfigProvider, RosterStore};
pub use utils::error::{RegistrarError, Result};
