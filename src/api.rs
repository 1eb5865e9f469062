use crate::errors::{ClientError, ConfigError};
use crate::models::{
    AnalyticsShape, AnalyticsSummary, CompletionAnalytics, NewTask, ProductivityAnalytics,
    StatusFilter, Task, TaskId,
};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

#[async_trait::async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self, filter: StatusFilter) -> Result<Vec<Task>, ClientError>;

    async fn create_task(&self, task: &NewTask) -> Result<Task, ClientError>;

    async fn complete_task(&self, id: &TaskId) -> Result<(), ClientError>;

    async fn delete_task(&self, id: &TaskId) -> Result<(), ClientError>;

    async fn analytics(&self, shape: AnalyticsShape) -> Result<AnalyticsSummary, ClientError>;
}

pub struct HttpTaskApi {
    base_url: Url,
    client: Client,
}

impl HttpTaskApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ConfigError::invalid("TASK_API_BASE_URL", base_url, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::invalid(
                "TASK_API_BASE_URL",
                base_url.as_str(),
                "not a base URL",
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ConfigError::invalid("TASK_API_TIMEOUT_SECS", format!("{timeout:?}"), err.to_string()))?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base path, one encoded segment each.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn list_url(&self, filter: StatusFilter) -> Url {
        let mut url = self.endpoint(&["tasks"]);
        if let Some(status) = filter.query_value() {
            url.query_pairs_mut().append_pair("status", status);
        }
        url
    }
}

#[async_trait::async_trait]
impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self, filter: StatusFilter) -> Result<Vec<Task>, ClientError> {
        let url = self.list_url(filter);
        debug!("GET {url}");
        let res = self.client.get(url).send().await?;
        read_json(res).await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ClientError> {
        let url = self.endpoint(&["tasks"]);
        debug!("POST {url}");
        let res = self.client.post(url).json(task).send().await?;
        read_json(res).await
    }

    async fn complete_task(&self, id: &TaskId) -> Result<(), ClientError> {
        let url = self.endpoint(&["tasks", id.as_str(), "complete"]);
        debug!("PATCH {url}");
        let res = self.client.patch(url).send().await?;
        check_status(res).await.map(drop)
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ClientError> {
        let url = self.endpoint(&["tasks", id.as_str()]);
        debug!("DELETE {url}");
        let res = self.client.delete(url).send().await?;
        check_status(res).await.map(drop)
    }

    async fn analytics(&self, shape: AnalyticsShape) -> Result<AnalyticsSummary, ClientError> {
        let url = self.endpoint(&shape.endpoint());
        debug!("GET {url}");
        let res = self.client.get(url).send().await?;
        let summary = match shape {
            AnalyticsShape::Completion => read_json::<CompletionAnalytics>(res).await?.into(),
            AnalyticsShape::Productivity => read_json::<ProductivityAnalytics>(res).await?.into(),
        };
        Ok(summary)
    }
}

async fn check_status(res: Response) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        body.trim().to_string()
    };
    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let res = check_status(res).await?;
    let bytes = res.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::network)
}
