use crate::domain::model::{CourseRecord, EnrollmentRecord, RosterSnapshot, StudentRecord};
use crate::domain::ports::RosterStore;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const STUDENTS_FILE: &str = "students.csv";
const COURSES_FILE: &str = "courses.csv";
const ENROLLMENTS_FILE: &str = "enrollments.csv";

/// Roster persisted as three CSV files under one directory.
#[derive(Debug, Clone)]
pub struct CsvRosterStore {
    base_path: PathBuf,
}

impl CsvRosterStore {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn read_rows<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let full_path = self.base_path.join(file);
        if !full_path.exists() {
            tracing::debug!("{} not found, starting empty", full_path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&full_path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize::<T>() {
            rows.push(row?);
        }
        Ok(rows)
    }

    fn write_rows<T: Serialize>(&self, file: &str, rows: &[T], header: &[&str]) -> Result<()> {
        let full_path = self.base_path.join(file);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&full_path)?;

        // 空表也寫入標頭
        writer.write_record(header)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl RosterStore for CsvRosterStore {
    fn load(&self) -> Result<RosterSnapshot> {
        let snapshot = RosterSnapshot {
            students: self.read_rows::<StudentRecord>(STUDENTS_FILE)?,
            courses: self.read_rows::<CourseRecord>(COURSES_FILE)?,
            enrollments: self.read_rows::<EnrollmentRecord>(ENROLLMENTS_FILE)?,
        };
        tracing::debug!(
            "Loaded {} student rows, {} course rows, {} enrollment rows from {}",
            snapshot.students.len(),
            snapshot.courses.len(),
            snapshot.enrollments.len(),
            self.base_path.display()
        );
        Ok(snapshot)
    }

    fn save(&self, snapshot: &RosterSnapshot) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;

        self.write_rows(
            STUDENTS_FILE,
            &snapshot.students,
            &["student_id", "first_name", "last_name", "birth_date"],
        )?;
        self.write_rows(
            COURSES_FILE,
            &snapshot.courses,
            &["name", "capacity", "start_date"],
        )?;
        self.write_rows(
            ENROLLMENTS_FILE,
            &snapshot.enrollments,
            &["student_id", "course_name"],
        )?;

        tracing::debug!("Roster saved to {}", self.base_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = CsvRosterStore::new(temp_dir.path().join("nothing-here"));

        let snapshot = store.load().unwrap();
        assert_eq!(snapshot, RosterSnapshot::default());
    }

    #[test]
    fn test_save_writes_headers_and_rows() {
        let temp_dir = TempDir::new().unwrap();
        let store = CsvRosterStore::new(temp_dir.path());

        let snapshot = RosterSnapshot {
            students: vec![StudentRecord {
                student_id: "1".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
            }],
            courses: vec![],
            enrollments: vec![],
        };
        store.save(&snapshot).unwrap();

        let students = fs::read_to_string(temp_dir.path().join(STUDENTS_FILE)).unwrap();
        assert_eq!(
            students,
            "student_id,first_name,last_name,birth_date\n1,Ada,Lovelace,1815-12-10\n"
        );
        let courses = fs::read_to_string(temp_dir.path().join(COURSES_FILE)).unwrap();
        assert_eq!(courses, "name,capacity,start_date\n");

        assert_eq!(store.load().unwrap(), snapshot);
    }

    #[test]
    fn test_malformed_rows_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(COURSES_FILE),
            "name,capacity,start_date\nAlgorithms,lots,2024-01-10\n",
        )
        .unwrap();

        let store = CsvRosterStore::new(temp_dir.path());
        assert!(matches!(
            store.load(),
            Err(crate::utils::error::RegistrarError::CsvError(_))
        ));
    }
}
