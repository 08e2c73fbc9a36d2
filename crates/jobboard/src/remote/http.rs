//! HTTP implementation of [`JobService`] over reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response, Url};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::types::{Ack, JobList, ProcessResponse, ProcessedEnvelope, ProcessedJob, RemoteJob};
use super::{JobService, TokenProvider};
use crate::board::JobStatus;
use crate::config::ApiConfig;
use crate::error::RemoteError;

/// Maximum length of an error body carried into errors and logs.
const MAX_ERROR_BODY_LENGTH: usize = 200;

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() > MAX_ERROR_BODY_LENGTH {
        let head: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
        format!("{}... (truncated)", head)
    } else {
        body.to_string()
    }
}

/// Talks to the job-management REST API.
pub struct HttpJobService {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl HttpJobService {
    pub fn new(
        base_url: &str,
        tokens: Arc<dyn TokenProvider>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RemoteError::Client(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::Client(format!(
                "Base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| RemoteError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    pub fn from_config(api: &ApiConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, RemoteError> {
        Self::new(
            &api.base_url,
            tokens,
            Duration::from_secs(api.connect_timeout_secs),
            Duration::from_secs(api.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response, RemoteError> {
        let token = self.tokens.bearer_token().await?;
        let response = request
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| RemoteError::network(operation, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                operation: operation.to_string(),
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        debug!("{} succeeded ({})", operation, status);
        Ok(response)
    }

    async fn body(operation: &str, response: Response) -> Result<String, RemoteError> {
        response
            .text()
            .await
            .map_err(|e| RemoteError::network(operation, e.to_string()))
    }

    /// Accepts any 2xx body unless it is a JSON ack with `success: false`.
    async fn expect_ack(operation: &str, response: Response) -> Result<(), RemoteError> {
        let body = Self::body(operation, response).await?;
        if let Ok(ack) = serde_json::from_str::<Ack>(&body) {
            if let Some(message) = ack.refusal() {
                return Err(RemoteError::rejected(operation, message));
            }
        }
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T, RemoteError> {
        let body = Self::body(operation, response).await?;
        if let Ok(ack) = serde_json::from_str::<Ack>(&body) {
            if let Some(message) = ack.refusal() {
                return Err(RemoteError::rejected(operation, message));
            }
        }
        serde_json::from_str(&body).map_err(|e| RemoteError::Decode {
            operation: operation.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl JobService for HttpJobService {
    async fn list_jobs(&self) -> Result<Vec<RemoteJob>, RemoteError> {
        const OP: &str = "list jobs";
        let request = self.client.get(self.endpoint(&["jobs"]));
        let response = self.send(OP, request).await?;
        let list: JobList = Self::decode(OP, response).await?;
        Ok(list.into_jobs())
    }

    async fn move_job(&self, id: &str, to: JobStatus) -> Result<(), RemoteError> {
        const OP: &str = "move job";
        let body = json!({
            "action": "move",
            "data": { "id": id, "toStatus": to.as_str() },
        });
        let request = self.client.post(self.endpoint(&["jobs"])).json(&body);
        let response = self.send(OP, request).await?;
        Self::expect_ack(OP, response).await
    }

    async fn process_job(&self, id: &str, activate: bool) -> Result<ProcessResponse, RemoteError> {
        const OP: &str = "process job";
        let mut body = json!({ "id": id, "asIs": true });
        if activate {
            body["to"] = json!("active");
        }
        let request = self
            .client
            .post(self.endpoint(&["jobs", "process"]))
            .json(&body);
        let response = self.send(OP, request).await?;
        Self::decode(OP, response).await
    }

    async fn get_processed_job(&self, id: &str) -> Result<ProcessedJob, RemoteError> {
        const OP: &str = "fetch processed job";
        let request = self.client.get(self.endpoint(&["processed-jobs", id]));
        let response = self.send(OP, request).await?;
        let envelope: ProcessedEnvelope = Self::decode(OP, response).await?;
        Ok(envelope.into_job())
    }

    async fn update_processed_job(&self, id: &str, status: &str) -> Result<(), RemoteError> {
        const OP: &str = "update processed job";
        let body = json!({
            "action": "update",
            "data": { "id": id, "status": status },
        });
        let request = self
            .client
            .post(self.endpoint(&["processed-jobs"]))
            .json(&body);
        let response = self.send(OP, request).await?;
        Self::expect_ack(OP, response).await
    }

    async fn delete_job(&self, id: &str) -> Result<(), RemoteError> {
        const OP: &str = "delete job";
        let body = json!({
            "action": "delete",
            "data": { "id": id },
        });
        let request = self.client.post(self.endpoint(&["jobs"])).json(&body);
        let response = self.send(OP, request).await?;
        Self::expect_ack(OP, response).await
    }
}
