use crate::core::{
    AuditEntry, AuditLevel, AuditSink, Course, Result, RosterSnapshot, RosterStore, Student,
};
use crate::domain::model::EnrollmentRecord;
use crate::utils::error::RegistrarError;
use std::collections::HashMap;

/// Owns the student and course registries and audits every attempted change.
///
/// Students and courses reference each other only by key (student ID and
/// course name), so both registries can be borrowed mutably at once when a
/// two-sided update is applied.
pub struct RegistrationService<A: AuditSink> {
    students: HashMap<String, Student>,
    courses: HashMap<String, Course>,
    /// Sequence number of every live (student ID, course name) link.
    enrollment_seq: HashMap<(String, String), u64>,
    next_seq: u64,
    audit: A,
}

impl<A: AuditSink> RegistrationService<A> {
    pub fn new(audit: A) -> Self {
        Self {
            students: HashMap::new(),
            courses: HashMap::new(),
            enrollment_seq: HashMap::new(),
            next_seq: 0,
            audit,
        }
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }

    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.get(student_id)
    }

    pub fn course(&self, course_name: &str) -> Option<&Course> {
        self.courses.get(course_name)
    }

    pub fn add_student(&mut self, student: Student) -> Result<()> {
        let id = student.student_id().to_string();
        let result = self.insert_student(student);
        self.record(result, || format!("Student {} added", id))
    }

    pub fn add_course(&mut self, course: Course) -> Result<()> {
        let name = course.name().to_string();
        let result = self.insert_course(course);
        self.record(result, || format!("Course {} added", name))
    }

    pub fn enroll(&mut self, student_id: &str, course_name: &str) -> Result<()> {
        let result = self.link(student_id, course_name);
        self.record(result, || {
            format!("Student {} enrolled in {}", student_id, course_name)
        })
    }

    pub fn withdraw(&mut self, student_id: &str, course_name: &str) -> Result<()> {
        let result = self.unlink(student_id, course_name);
        self.record(result, || {
            format!("Student {} withdrawn from {}", student_id, course_name)
        })
    }

    pub fn remove_student(&mut self, student_id: &str) -> Result<Student> {
        let result = match self.students.get(student_id).map(|s| s.courses().len()) {
            None => Err(RegistrarError::StudentNotFound {
                id: student_id.to_string(),
            }),
            Some(count) if count > 0 => Err(RegistrarError::HasEnrollments {
                target: format!("Student {}", student_id),
                count,
            }),
            Some(_) => self
                .students
                .remove(student_id)
                .ok_or_else(|| RegistrarError::StudentNotFound {
                    id: student_id.to_string(),
                }),
        };
        self.record(result, || format!("Student {} removed", student_id))
    }

    pub fn remove_course(&mut self, course_name: &str) -> Result<Course> {
        let result = match self.courses.get(course_name).map(Course::enrolled_count) {
            None => Err(RegistrarError::CourseNotFound {
                name: course_name.to_string(),
            }),
            Some(count) if count > 0 => Err(RegistrarError::HasEnrollments {
                target: format!("Course {}", course_name),
                count,
            }),
            Some(_) => self
                .courses
                .remove(course_name)
                .ok_or_else(|| RegistrarError::CourseNotFound {
                    name: course_name.to_string(),
                }),
        };
        self.record(result, || format!("Course {} removed", course_name))
    }

    /// All students, by last name then first name.
    pub fn list_students(&self) -> Vec<&Student> {
        let mut students: Vec<&Student> = self.students.values().collect();
        students.sort_by(|a, b| {
            a.cmp_by_name(b)
                .then_with(|| a.student_id().cmp(b.student_id()))
        });
        students
    }

    /// All courses, by start date.
    pub fn list_courses(&self) -> Vec<&Course> {
        let mut courses: Vec<&Course> = self.courses.values().collect();
        courses.sort_by(|a, b| {
            a.cmp_by_start_date(b)
                .then_with(|| a.name().cmp(b.name()))
        });
        courses
    }

    pub fn list_available_courses(&self) -> Vec<&Course> {
        self.list_courses()
            .into_iter()
            .filter(|c| c.has_available_slots())
            .collect()
    }

    /// Students of one course in enrollment order.
    pub fn course_roster(&self, course_name: &str) -> Result<Vec<&Student>> {
        let course = self
            .courses
            .get(course_name)
            .ok_or_else(|| RegistrarError::CourseNotFound {
                name: course_name.to_string(),
            })?;
        Ok(course
            .students()
            .iter()
            .filter_map(|id| self.students.get(id))
            .collect())
    }

    /// Courses of one student in enrollment order.
    pub fn student_courses(&self, student_id: &str) -> Result<Vec<&Course>> {
        let student = self
            .students
            .get(student_id)
            .ok_or_else(|| RegistrarError::StudentNotFound {
                id: student_id.to_string(),
            })?;
        Ok(student
            .courses()
            .iter()
            .filter_map(|name| self.courses.get(name))
            .collect())
    }

    /// Replaces the registries with stored rows, applying the same checks as
    /// the interactive operations. Only a summary entry is audited. On failure
    /// the previous registries are kept.
    pub fn restore(&mut self, snapshot: RosterSnapshot) -> Result<()> {
        let counts = (
            snapshot.students.len(),
            snapshot.courses.len(),
            snapshot.enrollments.len(),
        );
        let previous_students = std::mem::take(&mut self.students);
        let previous_courses = std::mem::take(&mut self.courses);
        let previous_seq = std::mem::take(&mut self.enrollment_seq);
        let previous_next_seq = std::mem::replace(&mut self.next_seq, 0);

        let result = self.apply_snapshot(snapshot);
        if result.is_err() {
            self.students = previous_students;
            self.courses = previous_courses;
            self.enrollment_seq = previous_seq;
            self.next_seq = previous_next_seq;
        }
        self.record(result, || {
            format!(
                "Roster loaded: {} students, {} courses, {} enrollments",
                counts.0, counts.1, counts.2
            )
        })
    }

    /// Loads rows from `store` and restores them. A store failure is audited
    /// like any other rejected operation.
    pub fn load_from<S: RosterStore>(&mut self, store: &S) -> Result<()> {
        match store.load() {
            Ok(snapshot) => self.restore(snapshot),
            Err(e) => self.record(Err(e), String::new),
        }
    }

    /// Enrollments are listed in the order they were made, so replaying them
    /// rebuilds the course order of every student and the student order of
    /// every course.
    pub fn snapshot(&self) -> RosterSnapshot {
        let mut links: Vec<(&u64, &(String, String))> =
            self.enrollment_seq.iter().map(|(k, v)| (v, k)).collect();
        links.sort_unstable_by_key(|(seq, _)| **seq);

        RosterSnapshot {
            students: self.list_students().into_iter().map(Into::into).collect(),
            courses: self.list_courses().into_iter().map(Into::into).collect(),
            enrollments: links
                .into_iter()
                .map(|(_, (student_id, course_name))| EnrollmentRecord {
                    student_id: student_id.clone(),
                    course_name: course_name.clone(),
                })
                .collect(),
        }
    }

    /// Closes the audit sink and hands it back. A close failure is reported
    /// and swallowed.
    pub fn shutdown(mut self) -> A {
        if let Err(e) = self.audit.close() {
            tracing::error!("❌ Failed to close audit log: {}", e);
            eprintln!("❌ Failed to close audit log: {}", e.user_friendly_message());
        } else {
            tracing::debug!("Registration service shut down");
        }
        self.audit
    }

    fn insert_student(&mut self, student: Student) -> Result<()> {
        if self.students.contains_key(student.student_id()) {
            return Err(RegistrarError::DuplicateId {
                id: student.student_id().to_string(),
            });
        }
        self.students
            .insert(student.student_id().to_string(), student);
        Ok(())
    }

    fn insert_course(&mut self, course: Course) -> Result<()> {
        if self.courses.contains_key(course.name()) {
            return Err(RegistrarError::DuplicateName {
                name: course.name().to_string(),
            });
        }
        self.courses.insert(course.name().to_string(), course);
        Ok(())
    }

    fn lookup_pair(
        &mut self,
        student_id: &str,
        course_name: &str,
    ) -> Result<(&mut Student, &mut Course)> {
        let student = self
            .students
            .get_mut(student_id)
            .ok_or_else(|| RegistrarError::StudentNotFound {
                id: student_id.to_string(),
            })?;
        let course = self
            .courses
            .get_mut(course_name)
            .ok_or_else(|| RegistrarError::CourseNotFound {
                name: course_name.to_string(),
            })?;
        Ok((student, course))
    }

    fn link(&mut self, student_id: &str, course_name: &str) -> Result<()> {
        let (student, course) = self.lookup_pair(student_id, course_name)?;
        student.enroll(course)?;

        let seq = self.next_seq;
        self.next_seq += 1;
        self.enrollment_seq
            .insert((student_id.to_string(), course_name.to_string()), seq);
        Ok(())
    }

    fn unlink(&mut self, student_id: &str, course_name: &str) -> Result<()> {
        let (student, course) = self.lookup_pair(student_id, course_name)?;
        student.withdraw(course)?;

        self.enrollment_seq
            .remove(&(student_id.to_string(), course_name.to_string()));
        Ok(())
    }

    fn apply_snapshot(&mut self, snapshot: RosterSnapshot) -> Result<()> {
        for record in snapshot.students {
            self.insert_student(record.try_into()?)?;
        }
        for record in snapshot.courses {
            self.insert_course(record.try_into()?)?;
        }
        for record in snapshot.enrollments {
            self.link(&record.student_id, &record.course_name)?;
        }
        Ok(())
    }

    /// Audits the outcome of an operation and hands the result back unchanged.
    fn record<T>(&mut self, result: Result<T>, success: impl FnOnce() -> String) -> Result<T> {
        let entry = match &result {
            Ok(_) => {
                let message = success();
                tracing::debug!("{}", message);
                AuditEntry::now(AuditLevel::Info, message)
            }
            Err(e) => {
                tracing::debug!("{}", e);
                AuditEntry::now(AuditLevel::Error, e.to_string())
            }
        };

        // 稽核寫入失敗不改變操作結果
        if let Err(e) = self.audit.append(&entry) {
            tracing::error!("❌ Failed to write audit entry '{}': {}", entry.message, e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryAuditLog;
    use chrono::NaiveDate;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_audit_mirror_stays_quiet_at_info_level() {
        let captured = CapturedLog::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut service = RegistrationService::new(MemoryAuditLog::new());
            let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
            service
                .add_course(Course::new("Algorithms", 1, start).unwrap())
                .unwrap();
            assert!(service.enroll("404", "Algorithms").is_err());
            assert_eq!(service.audit().entries().len(), 2);
        });

        // 選單畫面不應混入稽核訊息
        assert!(captured.0.lock().unwrap().is_empty());
    }
}
