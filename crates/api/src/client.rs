use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::request::{Request, Response};
use crate::transport::{ReqwestTransport, Transport, TransportRequest};

/// Authenticated Beanstalk HTTP client.
///
/// Cloning is cheap and clones share the same configuration and transport,
/// so one client can serve any number of concurrent tasks.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Client with the default configuration and a `reqwest` transport.
    pub fn new() -> Result<Self> {
        Self::from_config(ClientConfig::default(), None)
    }

    pub fn with_transport<T: Transport + 'static>(transport: T) -> Self {
        Self {
            config: Arc::new(ClientConfig::default()),
            transport: Arc::new(transport),
        }
    }

    /// Without a transport, a `reqwest` one is built using the configured
    /// timeout. Failing to build it is a [`ApiError::Config`].
    pub fn from_config(config: ClientConfig, transport: Option<Arc<dyn Transport>>) -> Result<Self> {
        let transport: Arc<dyn Transport> = match transport {
            Some(transport) => transport,
            None => {
                let reqwest = ReqwestTransport::with_timeout(config.timeout()).map_err(|err| {
                    ApiError::Config(format!("failed to build HTTP client: {err}"))
                })?;
                Arc::new(reqwest)
            }
        };
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve `path` against the base URL and append `query` in order.
    ///
    /// Leading slashes are ignored, so `/repositories.json` and
    /// `repositories.json` name the same resource. Paths that are absolute
    /// URLs or climb above the base URL are rejected.
    pub fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let relative = path.trim_start_matches('/');

        match Url::parse(relative) {
            Ok(_) => return Err(ApiError::invalid_path(path, "absolute URLs are not allowed")),
            Err(url::ParseError::RelativeUrlWithoutBase) => {}
            Err(err) => return Err(ApiError::invalid_path(path, err.to_string())),
        }

        let base = self.config.base_url();
        let mut url = base
            .join(relative)
            .map_err(|err| ApiError::invalid_path(path, err.to_string()))?;

        if !url.as_str().starts_with(base.as_str()) {
            return Err(ApiError::invalid_path(
                path,
                format!("resolves outside of {base}"),
            ));
        }

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// Perform one authenticated round trip.
    ///
    /// Only 2xx responses come back as `Ok`; the returned response is not
    /// decoded yet.
    pub async fn execute<B: Serialize>(&self, request: &Request<B>) -> Result<Response> {
        let url = self.build_url(&request.path, &request.query)?;
        let body = request
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(ApiError::Encode)?;

        debug!(method = %request.method, url = %url, "Sending request");

        let response = self
            .transport
            .execute(TransportRequest {
                method: request.method,
                url,
                headers: self.headers(),
                body,
            })
            .await?;

        let status = response.status;
        debug!(status, bytes = response.body.len(), "Received response");

        match status {
            200..=299 => Ok(Response {
                status,
                headers: response.headers,
                body: response.body,
                decoded: None,
            }),
            401 | 403 => Err(ApiError::Auth {
                status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            }),
            _ => Err(ApiError::Api {
                status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            }),
        }
    }

    /// Parse the body of `response` into `T` without touching the response.
    ///
    /// An empty body is read as JSON `null`, which lets `()` and `Option<_>`
    /// targets accept bodiless replies.
    pub fn decode<T: DeserializeOwned>(&self, response: &Response<impl Sized>) -> Result<T> {
        let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &response.body
        };
        serde_json::from_slice(body).map_err(ApiError::Decode)
    }

    /// Like [`decode`](Self::decode), keeping the value on the response.
    pub fn decode_response<T: DeserializeOwned>(
        &self,
        response: Response<impl Sized>,
    ) -> Result<Response<T>> {
        let decoded = self.decode(&response)?;
        Ok(Response {
            status: response.status,
            headers: response.headers,
            body: response.body,
            decoded: Some(decoded),
        })
    }

    /// `execute` followed by `decode`.
    pub async fn fetch<T: DeserializeOwned, B: Serialize>(&self, request: &Request<B>) -> Result<T> {
        let response = self.execute(request).await?;
        self.decode(&response)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch(&Request::get(path)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.fetch(&Request::post(path).body(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.fetch(&Request::put(path).body(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(&Request::delete(path)).await?;
        Ok(())
    }

    fn headers(&self) -> Vec<(String, String)> {
        let content_type = self.config.content_type();
        let mut headers = vec![
            ("User-Agent".to_string(), self.config.user_agent().to_string()),
            ("Accept".to_string(), content_type.to_string()),
            ("Content-Type".to_string(), content_type.to_string()),
        ];

        if self.config.has_credentials() {
            let credentials = format!("{}:{}", self.config.username(), self.config.password());
            headers.push((
                "Authorization".to_string(),
                format!("Basic {}", STANDARD.encode(credentials)),
            ));
        }

        headers
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
