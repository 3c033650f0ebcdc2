use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Endpoint used when neither the config file, the environment nor the
/// command line names one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/query";

/// Failures the answer service call can produce.
#[derive(Debug, Error)]
pub enum AskError {
    /// Connection refused, DNS failure, timeout, or a body that could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The body arrived but is not JSON.
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub text: &'a str,
}

/// The only part of the service response this client consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerResponse {
    /// `None` when the body has no string `answer` field.
    pub answer: Option<String>,
}

impl AnswerResponse {
    /// Parse a raw response body.
    ///
    /// Any JSON document is accepted. Only a string-valued `answer` field is
    /// picked up; every other shape yields an empty response.
    pub fn from_body(body: &str) -> Result<Self, AskError> {
        let value: Value = serde_json::from_str(body)?;
        Ok(Self {
            answer: value
                .get("answer")
                .and_then(Value::as_str)
                .map(str::to_owned),
        })
    }
}

#[derive(Clone)]
pub struct AnswerClient {
    endpoint: String,
    client: reqwest::Client,
}

impl AnswerClient {
    /// Build a client for `endpoint`. Without a timeout the transport default applies.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, AskError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoint: endpoint.to_string(),
            client: builder.build()?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `{"text": query}` and parse whatever comes back.
    ///
    /// The status code is not inspected: an error status whose body still
    /// parses as JSON is treated like any other response.
    pub async fn ask(&self, query: &str) -> Result<AnswerResponse, AskError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&QueryRequest { text: query })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(target: "api", "{} responded {} ({} bytes)", self.endpoint, status, body.len());

        AnswerResponse::from_body(&body)
    }
}
