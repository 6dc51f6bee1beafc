use crate::client::{DirectoryClient, fetch_course, fetch_detail, load_students};
use crate::display::{display_detail, display_list, display_students};
use crate::model::{Student, StudentId};
use crate::view::{DetailTicket, DirectoryView};
use eyre::{Error, WrapErr};
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::signal::ctrl_c;
use tokio::sync::mpsc;
use tracing::{debug, info};

const HELP: &str = "\
Type text to search by name, course or id.
  :view ID      show a student
  :close        close the student view
  :clear        clear the search
  :course CODE  list students of a course
  :reload       load students again
  :help         show this help
  :quit         leave";

#[derive(Debug, Eq, PartialEq)]
pub enum Command {
    Search(String),
    View(StudentId),
    Close,
    Clear,
    Course(String),
    Reload,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let Some(command) = line.trim().strip_prefix(':') else {
            return Ok(Command::Search(line.to_owned()));
        };
        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, arg)| (name, arg.trim()));
        match (name, arg) {
            ("view" | "v", "") => Err("usage: :view ID".to_owned()),
            ("view" | "v", id) => id
                .parse()
                .map(|id| Command::View(StudentId(id)))
                .map_err(|_| format!("invalid student id: {id}")),
            ("course", "") => Err("usage: :course CODE".to_owned()),
            ("course", course) => Ok(Command::Course(course.to_owned())),
            ("close", "") => Ok(Command::Close),
            ("clear", "") => Ok(Command::Clear),
            ("reload", "") => Ok(Command::Reload),
            ("help" | "h", "") => Ok(Command::Help),
            ("quit" | "q", "") => Ok(Command::Quit),
            _ => Err(format!("unknown command :{command} (try :help)")),
        }
    }
}

/// Run the interactive browser until the input ends, `:quit` is entered or
/// Ctrl-C is pressed.
pub async fn browse<R, W>(client: &DirectoryClient, input: R, out: &mut W) -> Result<(), Error>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let loaded = load_students(client).await;
    if loaded.is_remote() {
        writeln!(out, "Loaded students from {}", client.base_url())?;
    } else {
        writeln!(out, "Service unavailable, showing sample data")?;
    }
    let mut view = DirectoryView::new(loaded.into_students());
    display_students(out, &view)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<(DetailTicket, Option<Student>)>();
    let mut lines = input.lines();
    let mut pending = None;
    loop {
        write!(out, "> ")?;
        out.flush()?;
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.wrap_err("cannot read input")? else {
                    writeln!(out)?;
                    break;
                };
                match Command::parse(&line) {
                    Ok(Command::Search(query)) => {
                        view.set_query(&query);
                        display_students(out, &view)?;
                    }
                    Ok(Command::View(id)) => {
                        let ticket = view.open_detail(id);
                        pending = Some(ticket);
                        let client = client.clone();
                        let local = view.students().to_vec();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let student = fetch_detail(&client, id, &local).await;
                            let _ = tx.send((ticket, student));
                        });
                    }
                    Ok(Command::Close) => view.close_detail(),
                    Ok(Command::Clear) => {
                        view.clear_query();
                        display_students(out, &view)?;
                    }
                    Ok(Command::Course(course)) => {
                        let students = fetch_course(client, &course, view.students()).await;
                        writeln!(out, "Course {course}:")?;
                        display_list(out, &DirectoryView::new(students))?;
                    }
                    Ok(Command::Reload) => {
                        let loaded = load_students(client).await;
                        info!(remote = loaded.is_remote(), "Students reloaded");
                        view.replace_students(loaded.into_students());
                        display_students(out, &view)?;
                    }
                    Ok(Command::Help) => writeln!(out, "{HELP}")?,
                    Ok(Command::Quit) => break,
                    Err(message) => writeln!(out, "{message}")?,
                }
            }
            Some((ticket, student)) = rx.recv() => {
                if pending == Some(ticket) {
                    pending = None;
                }
                show_detail(out, &mut view, ticket, student)?;
            }
            _ = ctrl_c() => {
                writeln!(out)?;
                return Ok(());
            }
        }
    }

    // The input is over, but the last requested detail still has to be shown.
    drop(tx);
    if let Some(ticket) = pending.filter(|&t| view.is_current(t)) {
        while let Some((received, student)) = rx.recv().await {
            show_detail(out, &mut view, received, student)?;
            if received == ticket {
                break;
            }
        }
    }
    Ok(())
}

fn show_detail(
    out: &mut impl Write,
    view: &mut DirectoryView,
    ticket: DetailTicket,
    student: Option<Student>,
) -> io::Result<()> {
    if !view.apply_detail(ticket, student) {
        debug!(id = %ticket.id, "Dropping stale student detail");
        return Ok(());
    }
    writeln!(out)?;
    match view.selected() {
        Some(student) => display_detail(out, student),
        None => writeln!(out, "Student {} not found", ticket.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::model::Directory;
    use crate::server::{build_router, tests::spawn};

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("sky"), Ok(Command::Search("sky".to_owned())));
        assert_eq!(Command::parse(""), Ok(Command::Search(String::new())));
        assert_eq!(Command::parse(":view 2"), Ok(Command::View(StudentId(2))));
        assert_eq!(Command::parse("  :v  12 "), Ok(Command::View(StudentId(12))));
        assert_eq!(
            Command::parse(":course bsit"),
            Ok(Command::Course("bsit".to_owned()))
        );
        assert_eq!(Command::parse(":close"), Ok(Command::Close));
        assert_eq!(Command::parse(":clear"), Ok(Command::Clear));
        assert_eq!(Command::parse(":q"), Ok(Command::Quit));
        assert!(Command::parse(":view").is_err());
        assert!(Command::parse(":view x").is_err());
        assert!(Command::parse(":close now").is_err());
        assert!(Command::parse(":dance").is_err());
    }

    async fn session(base_url: String, input: &str) -> String {
        let client = DirectoryClient::new(&ClientConfig {
            base_url,
            timeout_secs: 5,
        })
        .unwrap();
        let mut out = Vec::new();
        browse(&client, input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_search_session() {
        let addr = spawn(build_router(Directory::seed())).await;
        let input = "zep\n:course BSCS\n:clear\n:quit\n";
        let text = session(format!("http://{addr}"), input).await;
        let expected = [
            "Loaded students from",
            "Showing 4 of 4 students",
            "Showing 1 of 4 students",
            "Zephyr",
            "Course BSCS:",
            "Quinn",
            "Showing 4 of 4 students",
        ];
        let mut rest = text.as_str();
        for e in expected {
            let pos = rest.find(e).unwrap_or_else(|| panic!("{e:?} missing in {text:?}"));
            rest = &rest[pos + e.len()..];
        }
    }

    #[tokio::test]
    async fn test_view_session() {
        let addr = spawn(build_router(Directory::seed())).await;
        let text = session(format!("http://{addr}"), ":view 2\n").await;
        assert!(text.contains("| Zephyr\n"), "{text:?}");
        assert!(text.contains("| Course: BSCpE\n"), "{text:?}");
        assert!(text.contains("| Age: 20\n"), "{text:?}");

        let text = session(format!("http://{addr}"), ":view 9\n:quit\n").await;
        assert!(text.contains("Student 9 not found"), "{text:?}");
    }

    #[tokio::test]
    async fn test_offline_view_uses_sample_data() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let text = session(format!("http://{addr}"), ":view 4\n").await;
        assert!(text.contains("| Alexie\n"), "{text:?}");
        assert!(text.contains("| Age: 22\n"), "{text:?}");
    }

    #[tokio::test]
    async fn test_offline_session() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let text = session(format!("http://{addr}"), ":nope\n").await;
        assert!(text.contains("Service unavailable, showing sample data"));
        assert!(text.contains("Showing 4 of 4 students"));
        assert!(text.contains("unknown command :nope"));
    }
}
