use crate::core::error::ServiceError;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// JSON-over-HTTP client shared by the completion providers and the classifier.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    auth_header: Option<(String, String)>,
    timeout: Option<Duration>,
    require_ok: bool,
}

impl HttpClient {
    pub fn new(
        base_url: String,
        auth_header: Option<(String, String)>,
        timeout: Option<Duration>,
    ) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            auth_header,
            timeout,
            require_ok: false,
        })
    }

    /// Bearer-token client, the auth scheme every backing service here uses.
    pub fn with_bearer(
        base_url: String,
        api_key: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ServiceError> {
        let auth_header = Some(("Authorization".to_string(), format!("Bearer {}", api_key)));
        Self::new(base_url, auth_header, timeout)
    }

    /// Only `200 OK` counts as success; other 2xx codes are failures too.
    pub fn require_ok(mut self) -> Self {
        self.require_ok = true;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url.trim_end_matches('/'), path)
        }
    }

    fn accepts(&self, status: StatusCode) -> bool {
        if self.require_ok {
            status == StatusCode::OK
        } else {
            status.is_success()
        }
    }

    /// POSTs `payload` as JSON and returns the response body.
    ///
    /// A rejected status becomes [`ServiceError::Status`] carrying the raw body.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<String, ServiceError> {
        let mut request = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json");

        if let Some((key, value)) = &self.auth_header {
            request = request.header(key, value);
        }

        let response = request.json(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !self.accepts(status) {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
