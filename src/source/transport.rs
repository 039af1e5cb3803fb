use super::SourceError;
use serde_json::Value;
use std::time::Duration;

/// Status and raw body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Reply {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Body parsed as JSON, `None` when it is not valid JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// The two HTTP verbs the schema source needs.
///
/// Transport errors (connection refused, timeout) are `Err`; any HTTP status,
/// including 401, is an `Ok(Reply)` so the retry logic can inspect it.
pub trait Transport {
    fn get(&self, url: &str, bearer: Option<&str>) -> Result<Reply, SourceError>;
    fn post_json(&self, url: &str, body: &Value, bearer: Option<&str>) -> Result<Reply, SourceError>;
}

/// Blocking `reqwest` transport with a fixed request timeout.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| SourceError::Http {
                url: "<client>".to_string(),
                source,
            })?;
        Ok(HttpTransport { client })
    }

    fn finish(
        url: &str,
        request: reqwest::blocking::RequestBuilder,
        bearer: Option<&str>,
    ) -> Result<Reply, SourceError> {
        let request = match bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let http_err = |source| SourceError::Http {
            url: url.to_string(),
            source,
        };
        let response = request.send().map_err(http_err)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(http_err)?;
        Ok(Reply { status, body })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, bearer: Option<&str>) -> Result<Reply, SourceError> {
        Self::finish(url, self.client.get(url), bearer)
    }

    fn post_json(&self, url: &str, body: &Value, bearer: Option<&str>) -> Result<Reply, SourceError> {
        Self::finish(url, self.client.post(url).json(body), bearer)
    }
}
