use crate::utils::error::{RegistrarError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_positive_number};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A registered student.
///
/// Enrolled courses are held as course names, never as references; the
/// [`RegistrationService`](crate::core::registration::RegistrationService)
/// owns the actual `Course` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    first_name: String,
    last_name: String,
    birth_date: NaiveDate,
    student_id: String,
    courses: Vec<String>,
}

impl Student {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birth_date: NaiveDate,
        student_id: impl Into<String>,
    ) -> Result<Self> {
        let student = Self {
            first_name: first_name.into().trim().to_string(),
            last_name: last_name.into().trim().to_string(),
            birth_date,
            student_id: student_id.into().trim().to_string(),
            courses: Vec::new(),
        };
        validate_non_empty_string("first name", &student.first_name)?;
        validate_non_empty_string("last name", &student.last_name)?;
        validate_non_empty_string("student ID", &student.student_id)?;
        Ok(student)
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    /// Course names in enrollment order.
    pub fn courses(&self) -> &[String] {
        &self.courses
    }

    pub fn is_enrolled_in(&self, course_name: &str) -> bool {
        self.courses.iter().any(|c| c == course_name)
    }

    pub fn is_enrolled_in_any(&self) -> bool {
        !self.courses.is_empty()
    }

    /// Enrolls on both sides. The course side is updated first so a full
    /// course leaves the student untouched.
    pub fn enroll(&mut self, course: &mut Course) -> Result<()> {
        if self.is_enrolled_in(course.name()) {
            return Err(RegistrarError::AlreadyEnrolled {
                student_id: self.student_id.clone(),
                course: course.name().to_string(),
            });
        }
        course.add_student(&self.student_id)?;
        self.courses.push(course.name().to_string());
        Ok(())
    }

    pub fn withdraw(&mut self, course: &mut Course) -> Result<()> {
        let position = self
            .courses
            .iter()
            .position(|c| c == course.name())
            .ok_or_else(|| RegistrarError::NotEnrolled {
                student_id: self.student_id.clone(),
                course: course.name().to_string(),
            })?;
        course.remove_student(&self.student_id)?;
        self.courses.remove(position);
        Ok(())
    }

    /// Display ordering: last name, then first name.
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        self.last_name
            .cmp(&other.last_name)
            .then_with(|| self.first_name.cmp(&other.first_name))
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (ID: {}, born {})",
            self.first_name, self.last_name, self.student_id, self.birth_date
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    name: String,
    capacity: u32,
    start_date: NaiveDate,
    students: Vec<String>,
}

impl Course {
    pub fn new(name: impl Into<String>, capacity: u32, start_date: NaiveDate) -> Result<Self> {
        let name = name.into().trim().to_string();
        validate_non_empty_string("course name", &name)?;
        validate_positive_number("capacity", capacity, 1)?;
        Ok(Self {
            name,
            capacity,
            start_date,
            students: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Student IDs in enrollment order.
    pub fn students(&self) -> &[String] {
        &self.students
    }

    pub fn enrolled_count(&self) -> usize {
        self.students.len()
    }

    pub fn has_available_slots(&self) -> bool {
        self.students.len() < self.capacity as usize
    }

    pub fn add_student(&mut self, student_id: &str) -> Result<()> {
        if !self.has_available_slots() {
            return Err(RegistrarError::CourseFull {
                course: self.name.clone(),
                capacity: self.capacity,
            });
        }
        if self.students.iter().any(|s| s == student_id) {
            return Err(RegistrarError::AlreadyEnrolled {
                student_id: student_id.to_string(),
                course: self.name.clone(),
            });
        }
        self.students.push(student_id.to_string());
        Ok(())
    }

    pub fn remove_student(&mut self, student_id: &str) -> Result<()> {
        let position = self
            .students
            .iter()
            .position(|s| s == student_id)
            .ok_or_else(|| RegistrarError::NotEnrolled {
                student_id: student_id.to_string(),
                course: self.name.clone(),
            })?;
        self.students.remove(position);
        Ok(())
    }

    /// Display ordering: start date.
    pub fn cmp_by_start_date(&self, other: &Self) -> Ordering {
        self.start_date.cmp(&other.start_date)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (starts {}, {}/{} enrolled)",
            self.name,
            self.start_date,
            self.students.len(),
            self.capacity
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Info,
    Error,
}

impl fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("INFO"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub timestamp: NaiveDateTime,
    pub level: AuditLevel,
    pub message: String,
}

impl AuditEntry {
    pub fn now(level: AuditLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Local::now().naive_local(),
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.level,
            self.message
        )
    }
}

/// Row-oriented copy of the roster used by [`RosterStore`](crate::domain::ports::RosterStore).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterSnapshot {
    pub students: Vec<StudentRecord>,
    pub courses: Vec<CourseRecord>,
    pub enrollments: Vec<EnrollmentRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub name: String,
    pub capacity: u32,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub student_id: String,
    pub course_name: String,
}

impl From<&Student> for StudentRecord {
    fn from(student: &Student) -> Self {
        Self {
            student_id: student.student_id.clone(),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            birth_date: student.birth_date,
        }
    }
}

impl From<&Course> for CourseRecord {
    fn from(course: &Course) -> Self {
        Self {
            name: course.name.clone(),
            capacity: course.capacity,
            start_date: course.start_date,
        }
    }
}

impl TryFrom<StudentRecord> for Student {
    type Error = RegistrarError;

    fn try_from(record: StudentRecord) -> Result<Self> {
        Student::new(
            record.first_name,
            record.last_name,
            record.birth_date,
            record.student_id,
        )
    }
}

impl TryFrom<CourseRecord> for Course {
    type Error = RegistrarError;

    fn try_from(record: CourseRecord) -> Result<Self> {
        Course::new(record.name, record.capacity, record.start_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn student(first: &str, last: &str, id: &str) -> Student {
        Student::new(first, last, date(2000, 1, 1), id).unwrap()
    }

    #[test]
    fn test_enroll_updates_both_sides() {
        let mut s = student("Ada", "Lovelace", "1");
        let mut c = Course::new("Algorithms", 2, date(2024, 1, 10)).unwrap();

        s.enroll(&mut c).unwrap();

        assert_eq!(s.courses(), ["Algorithms".to_string()]);
        assert_eq!(c.students(), ["1".to_string()]);
        assert!(s.is_enrolled_in_any());
    }

    #[test]
    fn test_enroll_full_course_leaves_student_untouched() {
        let mut a = student("Ada", "Lovelace", "1");
        let mut b = student("Alan", "Turing", "2");
        let mut c = Course::new("Algorithms", 1, date(2024, 1, 10)).unwrap();

        a.enroll(&mut c).unwrap();
        let err = b.enroll(&mut c).unwrap_err();

        assert!(matches!(err, RegistrarError::CourseFull { capacity: 1, .. }));
        assert!(!b.is_enrolled_in_any());
        assert_eq!(c.enrolled_count(), 1);
    }

    #[test]
    fn test_double_enroll_is_rejected() {
        let mut s = student("Ada", "Lovelace", "1");
        let mut c = Course::new("Algorithms", 5, date(2024, 1, 10)).unwrap();

        s.enroll(&mut c).unwrap();
        let err = s.enroll(&mut c).unwrap_err();

        assert!(matches!(err, RegistrarError::AlreadyEnrolled { .. }));
        assert_eq!(s.courses().len(), 1);
        assert_eq!(c.students().len(), 1);
    }

    #[test]
    fn test_withdraw_removes_both_sides() {
        let mut s = student("Ada", "Lovelace", "1");
        let mut c = Course::new("Algorithms", 5, date(2024, 1, 10)).unwrap();

        s.enroll(&mut c).unwrap();
        s.withdraw(&mut c).unwrap();

        assert!(!s.is_enrolled_in_any());
        assert!(c.students().is_empty());
        assert!(matches!(
            s.withdraw(&mut c),
            Err(RegistrarError::NotEnrolled { .. })
        ));
    }

    #[test]
    fn test_course_add_and_remove_student() {
        let mut c = Course::new("Databases", 1, date(2024, 2, 1)).unwrap();
        assert!(c.has_available_slots());

        c.add_student("7").unwrap();
        assert!(!c.has_available_slots());
        assert!(matches!(
            c.remove_student("8"),
            Err(RegistrarError::NotEnrolled { .. })
        ));

        c.remove_student("7").unwrap();
        assert!(c.has_available_slots());
    }

    #[test]
    fn test_student_ordering_by_last_then_first_name() {
        let a = student("Zed", "Adams", "1");
        let b = student("Amy", "Baker", "2");
        let c = student("Bob", "Adams", "3");

        let mut all = [&a, &b, &c];
        all.sort_by(|x, y| x.cmp_by_name(y));

        let ids: Vec<_> = all.iter().map(|s| s.student_id()).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }

    #[test]
    fn test_constructor_rejects_blank_and_zero() {
        assert!(Student::new(" ", "Lovelace", date(2000, 1, 1), "1").is_err());
        assert!(Student::new("Ada", "Lovelace", date(2000, 1, 1), "").is_err());
        assert!(Course::new("", 3, date(2024, 1, 1)).is_err());
        assert!(Course::new("Algorithms", 0, date(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_audit_entry_format() {
        let entry = AuditEntry {
            timestamp: date(2024, 1, 10).and_hms_opt(9, 5, 0).unwrap(),
            level: AuditLevel::Error,
            message: "Course 'Algorithms' is full (capacity 1)".to_string(),
        };
        assert_eq!(
            entry.to_string(),
            "[2024-01-10 09:05:00] ERROR: Course 'Algorithms' is full (capacity 1)"
        );
    }
}
