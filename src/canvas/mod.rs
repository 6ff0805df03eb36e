//! Canvas LMS REST client
//!
//! Stateless pass-through: the caller's API token is forwarded verbatim
//! as a bearer token on every request. List endpoints are walked to the
//! last page before returning.
//!
//! API docs: https://canvas.instructure.com/doc/api/

pub mod models;
pub mod pagination;

use models::{Enrollment, Section, Submission};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("assessment-bridge/", env!("CARGO_PKG_VERSION"));

type Query = Vec<(&'static str, String)>;

#[derive(Debug, Error)]
pub enum CanvasError {
    /// Canvas answered with a non-success status; body is passed back as-is
    #[error("Canvas returned status {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Failed to reach Canvas: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected Canvas response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid Canvas base URL '{0}'")]
    InvalidBaseUrl(String),
}

#[derive(Clone)]
pub struct CanvasClient {
    http: Client,
    api_base: String,
}

impl CanvasClient {
    /// `api_base` is the `/api/v1` root, e.g. `https://usflearn.instructure.com/api/v1`
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, CanvasError> {
        url::Url::parse(api_base).map_err(|_| CanvasError::InvalidBaseUrl(api_base.to_string()))?;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn authed(&self, req: RequestBuilder, token: &str) -> RequestBuilder {
        req.bearer_auth(token).header(reqwest::header::ACCEPT, "application/json")
    }

    /// Walk every page of a list endpoint and flatten the results.
    ///
    /// `query` is only sent with the first request; `next` links already
    /// carry it.
    pub async fn fetch_all_pages(
        &self,
        url: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<Value>, CanvasError> {
        let mut results = Vec::new();
        let mut next_url = Some(url.to_string());
        let mut first = true;
        let mut pages = 0u32;

        while let Some(url) = next_url.take() {
            let mut req = self.authed(self.http.get(&url), token);
            if first {
                req = req.query(query);
                first = false;
            }

            let res = expect_status(req.send().await?, &[200]).await?;
            next_url = res
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(pagination::parse_next_link);

            match res.json::<Value>().await? {
                Value::Array(items) => results.extend(items),
                other => results.push(other),
            }
            pages += 1;
        }

        tracing::debug!(url, pages, items = results.len(), "fetched Canvas list");
        Ok(results)
    }

    async fn fetch_all_as<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, CanvasError> {
        self.fetch_all_pages(url, token, query)
            .await?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(CanvasError::from))
            .collect()
    }

    async fn get_one(&self, url: &str, token: &str, query: &[(&str, String)]) -> Result<Value, CanvasError> {
        let req = self.authed(self.http.get(url), token).query(query);
        let res = expect_status(req.send().await?, &[200]).await?;
        Ok(res.json().await?)
    }

    /// Active courses (available or completed) with their term
    pub async fn list_courses(&self, token: &str) -> Result<Vec<Value>, CanvasError> {
        let url = format!("{}/courses", self.api_base);
        let query: Query = vec![
            ("enrollment_state", "active".to_string()),
            ("state[]", "available".to_string()),
            ("state[]", "completed".to_string()),
            ("include[]", "term".to_string()),
            ("per_page", "100".to_string()),
        ];
        self.fetch_all_pages(&url, token, &query).await
    }

    /// Assignments ordered by due date, including `needs_grading_count`
    pub async fn list_assignments(&self, token: &str, course_id: u64) -> Result<Vec<Value>, CanvasError> {
        let url = format!("{}/courses/{}/assignments", self.api_base, course_id);
        let query: Query = vec![
            ("include[]", "submission".to_string()),
            ("order_by", "due_at".to_string()),
            ("per_page", "100".to_string()),
        ];
        self.fetch_all_pages(&url, token, &query).await
    }

    pub async fn get_assignment(
        &self,
        token: &str,
        course_id: u64,
        assignment_id: u64,
    ) -> Result<Value, CanvasError> {
        let url = format!("{}/courses/{}/assignments/{}", self.api_base, course_id, assignment_id);
        self.get_one(&url, token, &[]).await
    }

    pub async fn list_sections(&self, token: &str, course_id: u64) -> Result<Vec<Section>, CanvasError> {
        let url = format!("{}/courses/{}/sections", self.api_base, course_id);
        self.fetch_all_as(&url, token, &[("per_page", "100".to_string())]).await
    }

    /// Student enrollments with embedded users. Submissions' own user
    /// objects usually lack `sis_user_id`, so this is where U-numbers come from.
    pub async fn list_enrollments(&self, token: &str, course_id: u64) -> Result<Vec<Enrollment>, CanvasError> {
        let url = format!("{}/courses/{}/enrollments", self.api_base, course_id);
        let query: Query = vec![
            ("type[]", "StudentEnrollment".to_string()),
            ("include[]", "user".to_string()),
            ("per_page", "100".to_string()),
        ];
        self.fetch_all_as(&url, token, &query).await
    }

    pub async fn list_submissions(
        &self,
        token: &str,
        course_id: u64,
        assignment_id: u64,
        include_user: bool,
    ) -> Result<Vec<Submission>, CanvasError> {
        let url = format!(
            "{}/courses/{}/assignments/{}/submissions",
            self.api_base, course_id, assignment_id
        );
        let mut query: Query = vec![("per_page", "100".to_string())];
        if include_user {
            query.insert(0, ("include[]", "user".to_string()));
        }
        self.fetch_all_as(&url, token, &query).await
    }

    /// One student's submission with comments, for the grading page
    pub async fn get_submission(
        &self,
        token: &str,
        course_id: u64,
        assignment_id: u64,
        user_id: u64,
    ) -> Result<Value, CanvasError> {
        let url = format!(
            "{}/courses/{}/assignments/{}/submissions/{}",
            self.api_base, course_id, assignment_id, user_id
        );
        let query: Query = vec![
            ("include[]", "submission_comments".to_string()),
            ("include[]", "user".to_string()),
        ];
        self.get_one(&url, token, &query).await
    }

    /// Post a grade and optional text comment
    pub async fn put_grade(
        &self,
        token: &str,
        course_id: u64,
        assignment_id: u64,
        user_id: u64,
        score: f64,
        comment: Option<&str>,
    ) -> Result<Value, CanvasError> {
        let url = format!(
            "{}/courses/{}/assignments/{}/submissions/{}",
            self.api_base, course_id, assignment_id, user_id
        );
        let payload = grade_payload(score, comment);

        let req = self.authed(self.http.put(&url), token).json(&payload);
        let res = expect_status(req.send().await?, &[200, 201]).await?;
        tracing::info!(course_id, assignment_id, user_id, score, "grade posted");
        Ok(res.json().await?)
    }
}

fn grade_payload(score: f64, comment: Option<&str>) -> Value {
    let mut payload = serde_json::json!({ "submission": { "posted_grade": score } });
    if let Some(text) = comment.filter(|c| !c.is_empty()) {
        payload["comment"] = serde_json::json!({ "text_comment": text });
    }
    payload
}

async fn expect_status(res: Response, allowed: &[u16]) -> Result<Response, CanvasError> {
    let status = res.status().as_u16();
    if allowed.contains(&status) {
        return Ok(res);
    }
    let url = res.url().to_string();
    let body = res.text().await.unwrap_or_default();
    tracing::warn!(status, %url, "Canvas request failed");
    Err(CanvasError::Upstream { status, body })
}
