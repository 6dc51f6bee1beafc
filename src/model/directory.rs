use super::{Student, StudentId};
use crate::error::DirectoryError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// The immutable, ordered set of students served over HTTP.
#[derive(Clone, Debug)]
pub struct Directory {
    students: Vec<Student>,
}

#[derive(Deserialize)]
struct Dataset {
    students: Vec<Student>,
}

impl Directory {
    pub fn new(students: Vec<Student>) -> Result<Self, DirectoryError> {
        let mut seen = HashSet::new();
        for s in &students {
            if s.id.0 == 0 {
                return Err(DirectoryError::ZeroId(s.name.clone()));
            }
            if !seen.insert(s.id) {
                return Err(DirectoryError::DuplicateId(s.id));
            }
        }
        Ok(Self { students })
    }

    /// The built-in dataset.
    pub fn seed() -> Self {
        Self {
            students: vec![
                Student::new(StudentId(1), "Sky", "BSIT", None),
                Student::new(StudentId(2), "Zephyr", "BSCpE", None),
                Student::new(StudentId(3), "Quinn", "BSCS", None),
                Student::new(StudentId(4), "Alexie", "BSOA", None),
            ],
        }
    }

    /// Load a dataset made of `[[students]]` TOML tables.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let dataset_error = |reason: String| DirectoryError::Dataset {
            path: path.to_owned(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| dataset_error(e.to_string()))?;
        let dataset: Dataset = toml::from_str(&content).map_err(|e| dataset_error(e.to_string()))?;
        let directory = Self::new(dataset.students)?;
        info!(
            path = %path.display(),
            students = %directory.students.len(),
            "Dataset loaded"
        );
        Ok(directory)
    }

    pub fn list(&self) -> &[Student] {
        &self.students
    }

    /// Look a student up from the raw path segment. Anything that does not
    /// designate an existing id is reported as not found.
    pub fn get_by_id(&self, raw: &str) -> Result<&Student, DirectoryError> {
        let Some(id) = parse_id(raw) else {
            debug!(raw, "Unparsable student id");
            return Err(DirectoryError::NotFound);
        };
        self.students
            .iter()
            .find(|s| s.id == id)
            .ok_or(DirectoryError::NotFound)
    }

    /// Students whose course equals `course` ignoring case, or every student
    /// when no course is given.
    pub fn filter_by_course(&self, course: Option<&str>) -> Vec<Student> {
        match course {
            Some(course) => self
                .students
                .iter()
                .filter(|s| s.is_in_course(course))
                .cloned()
                .collect(),
            None => self.students.clone(),
        }
    }
}

/// Read the leading integer of `raw`: whitespace is skipped, a sign is
/// accepted, a `0x` prefix selects hexadecimal, and parsing stops at the
/// first character which is not a digit.
fn parse_id(raw: &str) -> Option<StudentId> {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let end = rest
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(rest.len());
    let digits = rest[..end].trim_start_matches('0');
    if end == 0 || (negative && !digits.is_empty()) {
        return None;
    }
    if digits.is_empty() {
        return Some(StudentId(0));
    }
    u32::from_str_radix(digits, radix).ok().map(StudentId)
}
