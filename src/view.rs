use crate::model::{Student, StudentId};

/// State of the browser: the loaded students, the search query and the
/// student whose detail is shown.
#[derive(Debug, Default)]
pub struct DirectoryView {
    students: Vec<Student>,
    query: String,
    selected: Option<Student>,
    generation: u64,
}

/// Identifies a detail request. Only the most recent ticket can install its
/// result, and closing the detail view invalidates every ticket.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DetailTicket {
    pub id: StudentId,
    generation: u64,
}

impl DirectoryView {
    pub fn new(students: Vec<Student>) -> Self {
        Self {
            students,
            ..Self::default()
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn replace_students(&mut self, students: Vec<Student>) {
        self.students = students;
    }

    pub fn set_query(&mut self, query: &str) {
        query.clone_into(&mut self.query);
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    /// Students matching the current query, in loading order.
    pub fn filtered(&self) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|s| s.matches(&self.query))
            .collect()
    }

    pub fn selected(&self) -> Option<&Student> {
        self.selected.as_ref()
    }

    pub fn open_detail(&mut self, id: StudentId) -> DetailTicket {
        self.generation += 1;
        DetailTicket {
            id,
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: DetailTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Install the result of a detail request. Returns `false` if the
    /// request has been superseded, in which case the result is dropped.
    pub fn apply_detail(&mut self, ticket: DetailTicket, student: Option<Student>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.selected = student;
        true
    }

    pub fn close_detail(&mut self) {
        self.generation += 1;
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample_students;

    fn names(view: &DirectoryView) -> Vec<&str> {
        view.filtered().into_iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_search() {
        let mut view = DirectoryView::new(sample_students());
        assert_eq!(names(&view), vec!["Sky", "Zephyr", "Quinn", "Alexie"]);
        view.set_query("  BSC ");
        assert_eq!(names(&view), vec!["Zephyr", "Quinn"]);
        view.set_query("3");
        assert_eq!(names(&view), vec!["Quinn"]);
        view.set_query("e");
        assert_eq!(names(&view), vec!["Zephyr", "Alexie"]);
        for s in view.filtered() {
            assert!(s.matches("e"));
        }
        view.set_query("nobody");
        assert!(view.filtered().is_empty());
        view.clear_query();
        assert_eq!(view.students(), &sample_students()[..]);
        assert_eq!(view.filtered().len(), 4);
    }

    #[test]
    fn test_filter_follows_students() {
        let mut view = DirectoryView::new(Vec::new());
        view.set_query("sky");
        assert!(view.filtered().is_empty());
        view.replace_students(sample_students());
        assert_eq!(names(&view), vec!["Sky"]);
    }

    #[test]
    fn test_detail() {
        let mut view = DirectoryView::new(sample_students());
        let ticket = view.open_detail(StudentId(2));
        assert!(view.is_current(ticket));
        assert!(view.apply_detail(ticket, view.students().get(1).cloned()));
        assert_eq!(view.selected().map(|s| s.name.as_str()), Some("Zephyr"));
        view.close_detail();
        assert!(!view.is_current(ticket));
        assert!(view.selected().is_none());
    }

    #[test]
    fn test_stale_detail_is_dropped() {
        let mut view = DirectoryView::new(sample_students());
        let ticket = view.open_detail(StudentId(1));
        view.close_detail();
        assert!(!view.apply_detail(ticket, view.students().first().cloned()));
        assert!(view.selected().is_none());

        let first = view.open_detail(StudentId(1));
        let second = view.open_detail(StudentId(3));
        assert!(view.apply_detail(second, view.students().get(2).cloned()));
        assert!(!view.apply_detail(first, view.students().first().cloned()));
        assert_eq!(view.selected().map(|s| s.id), Some(StudentId(3)));
    }
}
