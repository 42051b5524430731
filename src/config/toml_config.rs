use crate::config::DEFAULT_AUDIT_LOG;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{RegistrarError, Result};
use crate::utils::validation::{validate_path, validate_required_field, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrarConfig {
    pub audit: AuditConfig,
    pub storage: Option<StorageConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: Option<String>,
    pub autosave: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
}

impl RegistrarConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RegistrarError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RegistrarError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ROSTER_HOME})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RegistrarError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for RegistrarConfig {
    fn audit_log_path(&self) -> &str {
        self.audit.path.as_deref().unwrap_or(DEFAULT_AUDIT_LOG)
    }

    fn data_dir(&self) -> Option<&str> {
        self.storage.as_ref().and_then(|s| s.data_dir.as_deref())
    }

    fn autosave(&self) -> bool {
        self.storage
            .as_ref()
            .and_then(|s| s.autosave)
            .unwrap_or(true)
    }

    fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }
}

impl Validate for RegistrarConfig {
    fn validate(&self) -> Result<()> {
        validate_path("audit.path", self.audit_log_path())?;

        // [storage] 存在時必須指定目錄
        if let Some(storage) = &self.storage {
            let dir = validate_required_field("storage.data_dir", &storage.data_dir)?;
            validate_path("storage.data_dir", dir)?;
        }

        Ok(())
    }
}
