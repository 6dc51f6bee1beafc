use crate::config::ServerConfig;
use crate::error::DirectoryError;
use crate::model::{Directory, Student};
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::PathRejection},
    routing::get,
};
use eyre::{Error, WrapErr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

pub type AppState = Arc<Directory>;

pub fn build_router(directory: Directory) -> Router {
    Router::new()
        .route("/students", get(list_handler))
        .route("/students/filter", get(filter_handler))
        .route("/students/:id", get(student_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(directory))
}

async fn list_handler(State(directory): State<AppState>) -> Json<Vec<Student>> {
    debug!("Listing all students");
    Json(directory.list().to_vec())
}

async fn student_handler(
    State(directory): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Student>, DirectoryError> {
    let Ok(Path(id)) = id else {
        debug!("Undecodable student id");
        return Err(DirectoryError::NotFound);
    };
    match directory.get_by_id(&id) {
        Ok(student) => {
            debug!(%student, "Student found");
            Ok(Json(student.clone()))
        }
        Err(e) => {
            debug!(%id, "Student not found");
            Err(e)
        }
    }
}

async fn filter_handler(
    State(directory): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Student>> {
    // Only the first course counts, and an empty one is the same as none.
    let course = params
        .iter()
        .find(|(key, _)| key == "course")
        .map(|(_, value)| value.as_str())
        .filter(|c| !c.is_empty());
    let students = directory.filter_by_course(course);
    debug!(
        ?course,
        matching = %students.len(),
        "Filtering students by course"
    );
    Json(students)
}

/// Serve the directory until Ctrl-C or SIGTERM is received.
pub async fn serve(config: &ServerConfig, directory: Directory) -> Result<(), Error> {
    let students = directory.list().len();
    let app = build_router(directory);
    let address = format!("{}:{}", config.address, config.port);
    let listener = TcpListener::bind(&address)
        .await
        .wrap_err_with(|| format!("cannot bind to {address}"))?;
    info!(%address, %students, "Server running");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server failed")?;
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        } else {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
