pub use self::directory::Directory;
pub use self::student::{Student, StudentId, sample_students};

mod directory;
mod student;
