use std::time::Duration;

use dashboard_core::{
    BatchRequest, BatchSummary, Config, Message, MessageKind, RedoCommand, RedoId,
};
use engine_logging::{engine_debug, engine_trace};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::types::{ActionResponse, BatchResponse};
use crate::{ApiError, FailureKind};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The backend HTTP/JSON contract.
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    async fn get_config(&self) -> Result<Config, ApiError>;

    async fn save_config(&self, config: &Config) -> Result<(), ApiError>;

    /// Most recent first, at most `limit` entries, optionally of one type.
    async fn list_messages(
        &self,
        limit: usize,
        kind: Option<MessageKind>,
    ) -> Result<Vec<Message>, ApiError>;

    async fn toggle_monitor(&self, enabled: bool) -> Result<(), ApiError>;

    async fn run_batch(&self, request: &BatchRequest) -> Result<BatchSummary, ApiError>;

    /// Clears messages of one type, or all messages for `None`.
    async fn clear_messages(&self, kind: Option<MessageKind>) -> Result<(), ApiError>;

    async fn list_redo_commands(&self) -> Result<Vec<RedoCommand>, ApiError>;

    async fn execute_redo(&self, id: RedoId) -> Result<(), ApiError>;
}

#[derive(Serialize)]
struct ToggleRequest {
    enabled: bool,
}

#[derive(Serialize)]
struct ClearRequest {
    #[serde(rename = "type")]
    kind: Option<MessageKind>,
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        // `join` replaces the last segment unless the base ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        engine_trace!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }

    /// POSTs and decodes the body even on error statuses, since the backend
    /// reports rejections as 4xx/5xx with a JSON envelope.
    async fn post_json<B, R>(&self, url: Url, body: Option<&B>) -> Result<R, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        engine_trace!("POST {}", url);
        let request = self.client.post(url);
        let request = match body {
            Some(body) => request.json(body),
            None => request.header(CONTENT_TYPE, "application/json"),
        };
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        match serde_json::from_slice::<R>(&bytes) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            )),
            Err(err) => Err(ApiError::new(FailureKind::Decode, err.to_string())),
        }
    }
}

impl ActionResponse {
    fn into_result(self) -> Result<(), ApiError> {
        if self.success {
            return Ok(());
        }
        let message = self
            .error
            .clone()
            .unwrap_or_else(|| "server reported failure".to_string());
        Err(ApiError::new(FailureKind::Rejected(self.error), message))
    }
}

#[async_trait::async_trait]
impl DashboardApi for ReqwestApi {
    async fn get_config(&self) -> Result<Config, ApiError> {
        self.get_json(self.endpoint("api/config")?).await
    }

    async fn save_config(&self, config: &Config) -> Result<(), ApiError> {
        let url = self.endpoint("api/config")?;
        self.post_json::<_, ActionResponse>(url, Some(config))
            .await?
            .into_result()
    }

    async fn list_messages(
        &self,
        limit: usize,
        kind: Option<MessageKind>,
    ) -> Result<Vec<Message>, ApiError> {
        let mut url = self.endpoint("api/messages")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &limit.to_string());
            if let Some(kind) = kind {
                query.append_pair("type", kind.as_str());
            }
        }
        let messages: Vec<Message> = self.get_json(url).await?;
        engine_debug!("Fetched {} messages", messages.len());
        Ok(messages)
    }

    async fn toggle_monitor(&self, enabled: bool) -> Result<(), ApiError> {
        let url = self.endpoint("api/toggle_monitor")?;
        self.post_json::<_, ActionResponse>(url, Some(&ToggleRequest { enabled }))
            .await?
            .into_result()
    }

    async fn run_batch(&self, request: &BatchRequest) -> Result<BatchSummary, ApiError> {
        let url = self.endpoint("api/run_batch_process")?;
        let response: BatchResponse = self.post_json(url, Some(request)).await?;
        if !response.success {
            let message = response
                .error
                .clone()
                .unwrap_or_else(|| "batch rejected".to_string());
            return Err(ApiError::new(FailureKind::Rejected(response.error), message));
        }
        Ok(BatchSummary {
            success_count: response.success_count,
            error_count: response.error_count,
            total: response.total,
        })
    }

    async fn clear_messages(&self, kind: Option<MessageKind>) -> Result<(), ApiError> {
        let url = self.endpoint("api/clear_messages")?;
        self.post_json::<_, ActionResponse>(url, Some(&ClearRequest { kind }))
            .await?
            .into_result()
    }

    async fn list_redo_commands(&self) -> Result<Vec<RedoCommand>, ApiError> {
        self.get_json(self.endpoint("api/redo_commands")?).await
    }

    async fn execute_redo(&self, id: RedoId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("api/execute_redo/{id}"))?;
        self.post_json::<(), ActionResponse>(url, None)
            .await?
            .into_result()
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
