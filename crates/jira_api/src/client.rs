use crate::auth::basic_authorization;
use crate::config::JiraConfig;
use crate::error::{JiraError, Result};
use crate::models::IssueCreateRequest;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

const ISSUE_PATH: &str = "issue";

#[derive(Clone)]
pub struct JiraClient {
    http: HttpClient,
    config: JiraConfig,
}

/// Whatever the server answered, undecoded.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &JiraConfig {
        &self.config
    }

    /// Files a single issue. Non-2xx answers are returned as a [`RawResponse`]
    /// like any other; only transport failures become errors.
    pub async fn create_issue(&self, issue: &IssueCreateRequest) -> Result<RawResponse> {
        self.send_raw(Method::POST, ISSUE_PATH, Some(issue)).await
    }

    pub async fn send_raw<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url_for(path);
        debug!(%method, %url, "sending jira request");
        let mut request = self.http.request(method, url);
        if let Some(payload) = body {
            let encoded = serde_json::to_vec(payload)?;
            request = request.header(CONTENT_TYPE, "application/json").body(encoded);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            warn!(%status, "jira answered with a non-success status");
        }
        Ok(RawResponse { status, body })
    }

    fn url_for(&self, path: &str) -> String {
        let mut base = self.config.api_root();
        base.push_str(path.trim_start_matches('/'));
        base
    }
}

fn build_http_client(config: &JiraConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    let mut auth_value = header_value(basic_authorization(&config.user, &config.token))?;
    auth_value.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth_value);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    if config.accept_invalid_certs {
        warn!(
            base_url = %config.base_url,
            "TLS certificate verification is disabled for this Jira instance"
        );
    }

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()
        .map_err(|err| JiraError::Other(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| JiraError::Other(err.to_string()))
}
