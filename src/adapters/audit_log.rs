use crate::domain::model::AuditEntry;
use crate::domain::ports::AuditSink;
use crate::utils::error::{RegistrarError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Audit log backed by an append-only text file, one entry per line.
#[derive(Debug)]
pub struct FileAuditLog {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileAuditLog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::debug!("Audit log opened at {}", path.display());

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }
}

impl AuditSink for FileAuditLog {
    fn append(&mut self, entry: &AuditEntry) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            RegistrarError::IoError(std::io::Error::other(format!(
                "audit log {} is closed",
                self.path.display()
            )))
        })?;
        writeln!(writer, "{}", entry)?;
        writer.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        // 只釋放一次，重複呼叫為 no-op
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        tracing::debug!("Audit log closed at {}", self.path.display());
        Ok(())
    }
}

impl Drop for FileAuditLog {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.flush() {
                tracing::warn!("Failed to flush audit log {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Keeps entries in memory. Useful when no durable log is wanted.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Vec<AuditEntry>,
    closed: bool,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl AuditSink for MemoryAuditLog {
    fn append(&mut self, entry: &AuditEntry) -> Result<()> {
        self.entries.push(entry.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
