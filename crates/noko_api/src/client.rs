use crate::config::{NokoConfig, TOKEN_HEADER};
use crate::error::{NokoError, Result};
use crate::models::{
    ApiEntry, ApiProject, ApiTag, ApiTimer, ApiUser, CreateEntryRequest, LogTimerRequest,
};
use crate::pacer::RequestPacer;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone)]
pub struct NokoClient {
    http: HttpClient,
    config: NokoConfig,
    pacer: RequestPacer,
}

impl NokoClient {
    pub fn new(config: NokoConfig) -> Result<Self> {
        let pacer = RequestPacer::new(config.request_spacing);
        Self::new_with_pacer(config, pacer)
    }

    pub fn new_with_pacer(config: NokoConfig, pacer: RequestPacer) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self {
            http,
            config,
            pacer,
        })
    }

    pub fn config(&self) -> &NokoConfig {
        &self.config
    }

    pub fn pacer(&self) -> &RequestPacer {
        &self.pacer
    }

    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_with_body(Method::GET, path, Option::<&Value>::None).await
    }

    pub async fn get_with_query<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.pacer.acquire().await;
        tracing::debug!(path, "GET with query");
        let response = self.http.get(self.url_for(path)).query(query).send().await?;
        Self::parse_json(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_with_body(Method::POST, path, Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_with_body(Method::PUT, path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send_expect_empty(Method::DELETE, path, None::<&Value>).await
    }

    pub async fn send_with_body<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.pacer.acquire().await;
        tracing::debug!(%method, path, "sending request");
        let mut request = self.http.request(method, self.url_for(path));
        if let Some(payload) = body {
            request = request.json(payload);
        }
        let response = request.send().await?;
        Self::parse_json(response).await
    }

    /// Sends a request whose response body, if any, is ignored.
    pub async fn send_expect_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.pacer.acquire().await;
        tracing::debug!(%method, path, "sending request");
        let mut request = self.http.request(method, self.url_for(path));
        if let Some(payload) = body {
            request = request.json(payload);
        }
        let response = request.send().await?;
        Self::ensure_success(response).await
    }

    fn url_for(&self, path: &str) -> String {
        let mut base = self.config.api_root();
        base.push_str(path.trim_start_matches('/'));
        base
    }

    async fn parse_json<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::failure(status, response).await);
        }
        let text = response.text().await?;
        if text.trim().is_empty() {
            return serde_json::from_value(Value::Null).map_err(NokoError::from);
        }
        serde_json::from_str(&text).map_err(NokoError::from)
    }

    async fn ensure_success(response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::failure(status, response).await)
        }
    }

    async fn failure(status: StatusCode, response: Response) -> NokoError {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, "Noko API request failed");
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            NokoError::Authentication(format!("Access denied ({}) - {}", status, body))
        } else {
            NokoError::http(status, extract_error_message(&body).unwrap_or(body))
        }
    }

    pub async fn get_current_user(&self) -> Result<ApiUser> {
        self.get("current_user").await
    }

    pub async fn list_timers(&self) -> Result<Vec<ApiTimer>> {
        self.get("timers").await
    }

    /// Returns the project's timer, or `None` when the project has no timer (404).
    pub async fn get_project_timer(&self, project_id: &str) -> Result<Option<ApiTimer>> {
        let path = format!("projects/{}/timer", project_id);
        match self.get::<ApiTimer>(&path).await {
            Ok(timer) => Ok(Some(timer)),
            Err(err) if err.status() == Some(StatusCode::NOT_FOUND) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn start_timer(&self, project_id: &str) -> Result<ApiTimer> {
        let path = format!("projects/{}/timer/start", project_id);
        self.put(&path, None::<&Value>).await
    }

    pub async fn pause_timer(&self, project_id: &str) -> Result<ApiTimer> {
        let path = format!("projects/{}/timer/pause", project_id);
        self.put(&path, None::<&Value>).await
    }

    pub async fn discard_timer(&self, project_id: &str) -> Result<()> {
        let path = format!("projects/{}/timer", project_id);
        self.delete(&path).await
    }

    pub async fn log_timer(&self, project_id: &str, payload: &LogTimerRequest) -> Result<()> {
        let path = format!("projects/{}/timer/log", project_id);
        self.send_expect_empty(Method::PUT, &path, Some(payload)).await
    }

    pub async fn list_projects(&self) -> Result<Vec<ApiProject>> {
        self.get_with_query("projects", &[("enabled", "true")]).await
    }

    pub async fn list_tags(&self) -> Result<Vec<ApiTag>> {
        self.get("tags").await
    }

    /// Entries of the current user between two `YYYY-MM-DD` dates, both inclusive.
    pub async fn current_user_entries(&self, from: &str, to: &str) -> Result<Vec<ApiEntry>> {
        self.get_with_query("current_user/entries", &[("from", from), ("to", to)])
            .await
    }

    pub async fn create_entry(&self, payload: &CreateEntryRequest) -> Result<ApiEntry> {
        self.post("entries", payload).await
    }

    pub async fn delete_entry(&self, entry_id: &str) -> Result<()> {
        let path = format!("entries/{}", entry_id);
        self.delete(&path).await
    }
}

fn build_http_client(config: &NokoConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    let token_header = HeaderName::from_bytes(TOKEN_HEADER.as_bytes())
        .map_err(|err| NokoError::Other(err.to_string()))?;
    headers.insert(token_header, header_value(config.token.clone())?);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| NokoError::Other(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| NokoError::Other(err.to_string()))
}

fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(|m| m.as_str()).map(|s| s.to_string()))
}
