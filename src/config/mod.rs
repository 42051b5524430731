pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use toml_config::RegistrarConfig;

pub const DEFAULT_AUDIT_LOG: &str = "registration.log";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, clap::Parser)]
#[command(name = "course-roster")]
#[command(about = "Interactive student and course registration")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Audit log file (default: registration.log)
    #[arg(long)]
    pub audit_log: Option<String>,

    /// Directory holding students.csv, courses.csv and enrollments.csv
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Do not save the roster on exit
    #[arg(long)]
    pub no_autosave: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(skip)]
    pub file_config: Option<RegistrarConfig>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the `--config` file, if any. Flags given on the command line
    /// still take precedence over file values.
    pub fn load_config_file(&mut self) -> Result<()> {
        if let Some(path) = &self.config {
            tracing::debug!("Loading configuration from {}", path);
            self.file_config = Some(RegistrarConfig::from_file(path)?);
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn audit_log_path(&self) -> &str {
        self.audit_log
            .as_deref()
            .or_else(|| self.file_config.as_ref().map(|f| f.audit_log_path()))
            .unwrap_or(DEFAULT_AUDIT_LOG)
    }

    fn data_dir(&self) -> Option<&str> {
        self.data_dir
            .as_deref()
            .or_else(|| self.file_config.as_ref().and_then(|f| f.data_dir()))
    }

    fn autosave(&self) -> bool {
        !self.no_autosave && self.file_config.as_ref().map_or(true, |f| f.autosave())
    }

    fn verbose(&self) -> bool {
        self.verbose || self.file_config.as_ref().is_some_and(|f| f.verbose())
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(file_config) = &self.file_config {
            file_config.validate()?;
        }

        validate_path("audit_log", self.audit_log_path())?;
        if let Some(dir) = self.data_dir() {
            validate_path("data_dir", dir)?;
        }
        Ok(())
    }
}
