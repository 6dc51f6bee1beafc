use crate::model::Student;
use crate::view::DirectoryView;
use std::io::{self, Write};

pub fn display_summary(out: &mut impl Write, view: &DirectoryView) -> io::Result<()> {
    let total = view.students().len();
    writeln!(
        out,
        "Showing {} of {} student{}",
        view.filtered().len(),
        total,
        if total == 1 { "" } else { "s" }
    )
}

pub fn display_list(out: &mut impl Write, view: &DirectoryView) -> io::Result<()> {
    let students = view.filtered();
    if students.is_empty() {
        return writeln!(out, "No students found.");
    }
    let width = students
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0);
    for s in students {
        writeln!(out, "  {:>4}  {:<width$}  {}", s.id, s.name, s.course)?;
    }
    Ok(())
}

pub fn display_students(out: &mut impl Write, view: &DirectoryView) -> io::Result<()> {
    display_summary(out, view)?;
    display_list(out, view)
}

pub fn display_detail(out: &mut impl Write, student: &Student) -> io::Result<()> {
    writeln!(out, "+--------------------------------")?;
    writeln!(out, "| {}", student.name)?;
    writeln!(out, "| Course: {}", student.course)?;
    match student.age {
        Some(age) => writeln!(out, "| Age: {age}")?,
        None => writeln!(out, "| Age: —")?,
    }
    writeln!(out, "+--------------------------------")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StudentId, sample_students};

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_students() {
        let mut view = DirectoryView::new(sample_students());
        view.set_query("bsc");
        let text = render(|out| display_students(out, &view));
        assert_eq!(
            text,
            "Showing 2 of 4 students\n     2  Zephyr  BSCpE\n     3  Quinn   BSCS\n"
        );
        view.set_query("zz");
        let text = render(|out| display_students(out, &view));
        assert_eq!(text, "Showing 0 of 4 students\nNo students found.\n");
    }

    #[test]
    fn test_singular() {
        let view = DirectoryView::new(vec![Student::new(StudentId(1), "Sky", "BSIT", Some(19))]);
        let text = render(|out| display_summary(out, &view));
        assert_eq!(text, "Showing 1 of 1 student\n");
    }

    #[test]
    fn test_detail() {
        let sky = Student::new(StudentId(1), "Sky", "BSIT", Some(19));
        let text = render(|out| display_detail(out, &sky));
        assert!(text.contains("| Sky\n"));
        assert!(text.contains("| Course: BSIT\n"));
        assert!(text.contains("| Age: 19\n"));
        let text = render(|out| display_detail(out, &Student { age: None, ..sky }));
        assert!(text.contains("| Age: —\n"));
    }
}
