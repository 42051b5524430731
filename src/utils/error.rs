use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistrarError {
    #[error("Student ID '{id}' is already registered")]
    DuplicateId { id: String },

    #[error("Course '{name}' already exists")]
    DuplicateName { name: String },

    #[error("Student '{id}' not found")]
    StudentNotFound { id: String },

    #[error("Course '{name}' not found")]
    CourseNotFound { name: String },

    #[error("Student '{student_id}' is already enrolled in '{course}'")]
    AlreadyEnrolled { student_id: String, course: String },

    #[error("Student '{student_id}' is not enrolled in '{course}'")]
    NotEnrolled { student_id: String, course: String },

    #[error("Course '{course}' is full (capacity {capacity})")]
    CourseFull { course: String, capacity: u32 },

    #[error("{target} still has {count} enrollment(s)")]
    HasEnrollments { target: String, count: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

pub type Result<T> = std::result::Result<T, RegistrarError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Registry,
    Enrollment,
    Io,
    Configuration,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RegistrarError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateId { .. }
            | Self::DuplicateName { .. }
            | Self::StudentNotFound { .. }
            | Self::CourseNotFound { .. }
            | Self::HasEnrollments { .. } => ErrorCategory::Registry,
            Self::AlreadyEnrolled { .. } | Self::NotEnrolled { .. } | Self::CourseFull { .. } => {
                ErrorCategory::Enrollment
            }
            Self::IoError(_) | Self::CsvError(_) => ErrorCategory::Io,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 使用者操作被拒絕，狀態不變
            ErrorCategory::Registry | ErrorCategory::Enrollment | ErrorCategory::Validation => {
                ErrorSeverity::Low
            }
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Could not access a file: {}", e),
            Self::CsvError(e) => format!("Roster file is malformed: {}", e),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => format!("Invalid configuration. {}", self),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "Use a different student ID",
            Self::DuplicateName { .. } => "Use a different course name",
            Self::StudentNotFound { .. } => "List students to check the ID",
            Self::CourseNotFound { .. } => "List courses to check the name",
            Self::AlreadyEnrolled { .. } => "No action needed",
            Self::NotEnrolled { .. } => "Check the student's enrollments first",
            Self::CourseFull { .. } => "Pick a course from the available list",
            Self::HasEnrollments { .. } => "Withdraw all enrollments before removing",
            Self::IoError(_) => "Check file permissions and available disk space",
            Self::CsvError(_) => "Fix or remove the roster CSV files",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Check the command line flags and config file",
            Self::ValidationError { .. } => "Re-enter the value in the expected format",
        }
    }
}
