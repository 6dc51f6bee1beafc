use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::model::{Student, StudentId, sample_students};
use eyre::{Error, WrapErr};
use reqwest::Response;
use tracing::{debug, instrument, warn};

/// HTTP client for the directory service.
#[derive(Clone, Debug)]
pub struct DirectoryClient {
    base_url: String,
    client: reqwest::Client,
}

/// Where the browser's students come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Loaded {
    Remote(Vec<Student>),
    LocalFallback(Vec<Student>),
}

impl Loaded {
    pub fn into_students(self) -> Vec<Student> {
        match self {
            Loaded::Remote(students) | Loaded::LocalFallback(students) => students,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Loaded::Remote(_))
    }
}

impl DirectoryClient {
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .wrap_err("cannot create HTTP client")?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, TransportError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .query(query)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(TransportError::Status(status))
        }
    }

    /// `GET /students`
    pub async fn fetch_all(&self) -> Result<Vec<Student>, TransportError> {
        Ok(self.get("/students", &[]).await?.json().await?)
    }

    /// `GET /students/:id`
    pub async fn fetch_one(&self, id: StudentId) -> Result<Student, TransportError> {
        Ok(self
            .get(&format!("/students/{id}"), &[])
            .await?
            .json()
            .await?)
    }

    /// `GET /students/filter?course=`
    pub async fn fetch_by_course(&self, course: &str) -> Result<Vec<Student>, TransportError> {
        Ok(self
            .get("/students/filter", &[("course", course)])
            .await?
            .json()
            .await?)
    }
}

/// Load every student from the service, or the local sample set if the
/// service cannot provide them.
#[instrument(skip_all, fields(base_url = %client.base_url()))]
pub async fn load_students(client: &DirectoryClient) -> Loaded {
    match client.fetch_all().await {
        Ok(students) => {
            debug!(students = %students.len(), "Students loaded from service");
            Loaded::Remote(students.into_iter().map(Student::normalized).collect())
        }
        Err(e) => {
            warn!(error = %e, "Service unavailable, using sample data");
            Loaded::LocalFallback(sample_students())
        }
    }
}

/// Fetch the latest version of a student, falling back to the copy in
/// `local` when the service does not answer.
#[instrument(skip(client, local))]
pub async fn fetch_detail(
    client: &DirectoryClient,
    id: StudentId,
    local: &[Student],
) -> Option<Student> {
    match client.fetch_one(id).await {
        Ok(student) => Some(student.normalized()),
        Err(e) => {
            debug!(error = %e, "Cannot fetch student detail, using local copy");
            local.iter().find(|s| s.id == id).cloned()
        }
    }
}

/// Students in `course`, asked to the service first, then computed from
/// `local`.
#[instrument(skip(client, local))]
pub async fn fetch_course(
    client: &DirectoryClient,
    course: &str,
    local: &[Student],
) -> Vec<Student> {
    match client.fetch_by_course(course).await {
        Ok(students) => students.into_iter().map(Student::normalized).collect(),
        Err(e) => {
            debug!(error = %e, "Cannot filter by course remotely, filtering locally");
            local
                .iter()
                .filter(|s| s.is_in_course(course))
                .cloned()
                .collect()
        }
    }
}
