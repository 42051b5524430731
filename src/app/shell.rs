use crate::core::registration::RegistrationService;
use crate::core::{AuditSink, Course, Student};
use crate::utils::error::{ErrorCategory, RegistrarError, Result};
use chrono::NaiveDate;
use std::io::{BufRead, Write};

const DATE_FORMAT: &str = "%Y-%m-%d";

const MENU: &str = "\
==== Course Registration ====
 1) Add student
 2) Add course
 3) Enroll student in course
 4) Withdraw student from course
 5) List students
 6) List courses
 7) List available courses
 8) Remove student
 9) Remove course
10) Show course roster
 0) Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Blocking text menu. Every service error is printed and the loop goes on;
/// only console I/O failures end [`Shell::run`] with an error.
pub struct Shell<'a, R: BufRead, W: Write, A: AuditSink> {
    service: &'a mut RegistrationService<A>,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write, A: AuditSink> Shell<'a, R, W, A> {
    pub fn new(service: &'a mut RegistrationService<A>, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n{}", MENU)?;
            let Some(choice) = self.ask("Select an option")? else {
                break;
            };

            let outcome = match choice.as_str() {
                "1" => self.add_student(),
                "2" => self.add_course(),
                "3" => self.enroll(),
                "4" => self.withdraw(),
                "5" => self.list_students(),
                "6" => self.list_courses(),
                "7" => self.list_available_courses(),
                "8" => self.remove_student(),
                "9" => self.remove_course(),
                "10" => self.show_roster(),
                "0" => Ok(Flow::Exit),
                other => {
                    writeln!(self.output, "❌ Unknown option '{}'", other)?;
                    Ok(Flow::Continue)
                }
            };

            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) if e.category() == ErrorCategory::Io => return Err(e),
                Err(e) => {
                    tracing::debug!("Operation rejected: {}", e);
                    writeln!(self.output, "❌ {}", e.user_friendly_message())?;
                }
            }
        }

        writeln!(self.output, "Goodbye!")?;
        self.output.flush()?;
        Ok(())
    }

    /// Returns `None` once input is exhausted.
    fn ask(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn add_student(&mut self) -> Result<Flow> {
        let Some(first_name) = self.ask("First name")? else {
            return Ok(Flow::Exit);
        };
        let Some(last_name) = self.ask("Last name")? else {
            return Ok(Flow::Exit);
        };
        let Some(birth_date) = self.ask("Birth date (YYYY-MM-DD)")? else {
            return Ok(Flow::Exit);
        };
        let Some(student_id) = self.ask("Student ID")? else {
            return Ok(Flow::Exit);
        };

        let student = Student::new(first_name, last_name, parse_date(&birth_date)?, student_id)?;
        let id = student.student_id().to_string();
        self.service.add_student(student)?;
        writeln!(self.output, "✅ Student {} added", id)?;
        Ok(Flow::Continue)
    }

    fn add_course(&mut self) -> Result<Flow> {
        let Some(name) = self.ask("Course name")? else {
            return Ok(Flow::Exit);
        };
        let Some(capacity) = self.ask("Capacity")? else {
            return Ok(Flow::Exit);
        };
        let Some(start_date) = self.ask("Start date (YYYY-MM-DD)")? else {
            return Ok(Flow::Exit);
        };

        let course = Course::new(name, parse_capacity(&capacity)?, parse_date(&start_date)?)?;
        let name = course.name().to_string();
        self.service.add_course(course)?;
        writeln!(self.output, "✅ Course {} added", name)?;
        Ok(Flow::Continue)
    }

    fn enroll(&mut self) -> Result<Flow> {
        let Some(student_id) = self.ask("Student ID")? else {
            return Ok(Flow::Exit);
        };
        let Some(course_name) = self.ask("Course name")? else {
            return Ok(Flow::Exit);
        };

        self.service.enroll(&student_id, &course_name)?;
        writeln!(
            self.output,
            "✅ Student {} enrolled in {}",
            student_id, course_name
        )?;
        Ok(Flow::Continue)
    }

    fn withdraw(&mut self) -> Result<Flow> {
        let Some(student_id) = self.ask("Student ID")? else {
            return Ok(Flow::Exit);
        };
        let Some(course_name) = self.ask("Course name")? else {
            return Ok(Flow::Exit);
        };

        self.service.withdraw(&student_id, &course_name)?;
        writeln!(
            self.output,
            "✅ Student {} withdrawn from {}",
            student_id, course_name
        )?;
        Ok(Flow::Continue)
    }

    fn list_students(&mut self) -> Result<Flow> {
        let students = self.service.list_students();
        if students.is_empty() {
            writeln!(self.output, "No students registered")?;
        }
        for student in students {
            writeln!(self.output, "- {}", student)?;
            if student.is_enrolled_in_any() {
                writeln!(self.output, "    courses: {}", student.courses().join(", "))?;
            }
        }
        Ok(Flow::Continue)
    }

    fn list_courses(&mut self) -> Result<Flow> {
        let courses = self.service.list_courses();
        write_courses(&mut self.output, &courses, "No courses registered")?;
        Ok(Flow::Continue)
    }

    fn list_available_courses(&mut self) -> Result<Flow> {
        let courses = self.service.list_available_courses();
        write_courses(&mut self.output, &courses, "No courses with free seats")?;
        Ok(Flow::Continue)
    }

    fn remove_student(&mut self) -> Result<Flow> {
        let Some(student_id) = self.ask("Student ID")? else {
            return Ok(Flow::Exit);
        };

        let student = self.service.remove_student(&student_id)?;
        writeln!(self.output, "✅ Removed {}", student)?;
        Ok(Flow::Continue)
    }

    fn remove_course(&mut self) -> Result<Flow> {
        let Some(course_name) = self.ask("Course name")? else {
            return Ok(Flow::Exit);
        };

        let course = self.service.remove_course(&course_name)?;
        writeln!(self.output, "✅ Removed {}", course.name())?;
        Ok(Flow::Continue)
    }

    fn show_roster(&mut self) -> Result<Flow> {
        let Some(course_name) = self.ask("Course name")? else {
            return Ok(Flow::Exit);
        };

        let students = self.service.course_roster(&course_name)?;
        if students.is_empty() {
            writeln!(self.output, "Nobody is enrolled in {}", course_name)?;
        }
        for student in students {
            writeln!(self.output, "- {}", student)?;
        }
        Ok(Flow::Continue)
    }
}

fn write_courses<W: Write>(output: &mut W, courses: &[&Course], empty_message: &str) -> Result<()> {
    if courses.is_empty() {
        writeln!(output, "{}", empty_message)?;
    }
    for course in courses {
        writeln!(output, "- {}", course)?;
    }
    Ok(())
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|e| {
        RegistrarError::validation(format!("'{}' is not a valid date (YYYY-MM-DD): {}", input, e))
    })
}

pub fn parse_capacity(input: &str) -> Result<u32> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| RegistrarError::validation(format!("'{}' is not a valid capacity", input)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-10").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
        assert!(parse_date("10/01/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_parse_capacity() {
        assert_eq!(parse_capacity(" 30 ").unwrap(), 30);
        assert!(parse_capacity("-1").is_err());
        assert!(parse_capacity("thirty").is_err());
    }
}
