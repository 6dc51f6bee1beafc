use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct StudentId(pub u32);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub course: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl Student {
    pub fn new(id: StudentId, name: &str, course: &str, age: Option<u32>) -> Self {
        Self {
            id,
            name: name.to_owned(),
            course: course.to_owned(),
            age,
        }
    }

    /// Age used when the record does not carry one.
    pub fn fallback_age(&self) -> u32 {
        18 + self.id.0 % 10
    }

    /// Fill in a missing age with [`Student::fallback_age`].
    #[must_use]
    pub fn normalized(self) -> Self {
        let age = self.age.unwrap_or_else(|| self.fallback_age());
        Self {
            age: Some(age),
            ..self
        }
    }

    /// Check whether the search query appears in the name, the course or
    /// the id, ignoring case. A blank query matches every student.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.course.to_lowercase().contains(&query)
            || self.id.to_string().contains(&query)
    }

    pub fn is_in_course(&self, course: &str) -> bool {
        self.course.to_lowercase() == course.to_lowercase()
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, #{})", self.name, self.course, self.id)
    }
}

/// Records the browser falls back to when the service cannot be reached.
pub fn sample_students() -> Vec<Student> {
    vec![
        Student::new(StudentId(1), "Sky", "BSIT", Some(19)),
        Student::new(StudentId(2), "Zephyr", "BSCpE", Some(20)),
        Student::new(StudentId(3), "Quinn", "BSCS", Some(21)),
        Student::new(StudentId(4), "Alexie", "BSOA", Some(22)),
    ]
}
