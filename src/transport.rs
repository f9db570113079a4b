use log::{debug, trace, warn};
use reqwest::header::{HeaderMap, HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::classify::{classify, CapturedResponse, Exchange, ResponseBody};
use crate::forms::UploadForm;
use crate::outcome::{Download, UploadOutcome};
use crate::platform::Platform;
use crate::request::UploadRequest;
use crate::{Result, UNEXPECTED_FAILURE};

/// How a response body is captured before classification.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// Keep the body as raw bytes. The backend's success path is a file.
    #[default]
    Blob,
    /// Parse the body as JSON when possible, else keep raw bytes.
    Json,
}

/// Sends uploads and turns responses into outcomes.
///
/// One call to [`submit`](Self::submit) issues exactly one request. There is
/// no retry and no cancellation; callers are responsible for not submitting
/// the same form twice while a request is pending.
pub struct UploadTransport<P: Platform> {
    client: Client,
    platform: P,
    mode: ResponseMode,
}

impl<P: Platform> UploadTransport<P> {
    pub fn new(platform: P) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, platform))
    }

    pub fn with_client(client: Client, platform: P) -> Self {
        Self {
            client,
            platform,
            mode: ResponseMode::default(),
        }
    }

    pub fn response_mode(mut self, mode: ResponseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Post `request` to `endpoint` below the platform's base URL.
    pub async fn submit(
        &self,
        endpoint: &str,
        request: UploadRequest,
    ) -> UploadOutcome {
        let exchange = match self.exchange(endpoint, request).await {
            Ok(exchange) => exchange,
            Err(e) => {
                warn!("Could not send upload to {}: {}", endpoint, e);
                return UploadOutcome::transport_failed(UNEXPECTED_FAILURE);
            }
        };

        let outcome = classify(&exchange);
        self.deliver(outcome)
    }

    /// Blocking version of [`submit`](Self::submit).
    pub fn submit_sync(
        &self,
        endpoint: &str,
        request: UploadRequest,
    ) -> Result<UploadOutcome> {
        let runtime = tokio::runtime::Runtime::new()?;
        Ok(runtime.block_on(self.submit(endpoint, request)))
    }

    /// Validate `form`, then submit it to its endpoint.
    ///
    /// Only form validation can fail; the submission itself always yields
    /// an outcome.
    pub async fn upload<F: UploadForm>(
        &self,
        form: F,
    ) -> Result<UploadOutcome> {
        let request = form.into_request()?;
        Ok(self.submit(F::ENDPOINT, request).await)
    }

    async fn exchange(
        &self,
        endpoint: &str,
        request: UploadRequest,
    ) -> Result<Exchange> {
        let base = self.platform.resolve_base_url()?;
        let url = endpoint_url(&base, endpoint)?;
        let parts = request.len();
        let form = request.into_form()?;

        debug!("POST {} ({} parts)", url, parts);
        let response = match self.client.post(url).multipart(form).send().await
        {
            Ok(response) => response,
            Err(e) => {
                return Ok(Exchange::Failed {
                    reason: e.to_string(),
                })
            }
        };

        match capture(response, self.mode).await {
            Ok(captured) => Ok(Exchange::Completed(captured)),
            Err(e) => Ok(Exchange::Failed {
                reason: e.to_string(),
            }),
        }
    }

    fn deliver(&self, outcome: UploadOutcome) -> UploadOutcome {
        match outcome {
            UploadOutcome::FileDelivered {
                filename,
                content_type,
                bytes,
            } => {
                let download = Download {
                    filename,
                    content_type,
                    bytes,
                };
                match self.platform.deliver_download(&download) {
                    Ok(()) => download.into(),
                    Err(e) => {
                        warn!(
                            "Could not deliver {}: {}",
                            download.filename, e
                        );
                        UploadOutcome::transport_failed(UNEXPECTED_FAILURE)
                    }
                }
            }
            other => other,
        }
    }
}

/// `{base}{endpoint}`, with exactly one `/` between the two.
pub fn endpoint_url(base: &Url, endpoint: &str) -> Result<Url> {
    let base = base.as_str().trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');
    Ok(Url::parse(&format!("{base}/{endpoint}"))?)
}

async fn capture(
    response: Response,
    mode: ResponseMode,
) -> reqwest::Result<CapturedResponse> {
    let status = response.status();
    let content_type = header(response.headers(), CONTENT_TYPE);
    let content_disposition = header(response.headers(), CONTENT_DISPOSITION);
    trace!(
        "Response {} ({})",
        status,
        content_type.as_deref().unwrap_or("no content type")
    );

    let bytes = response.bytes().await?.to_vec();
    let body = match mode {
        ResponseMode::Blob => ResponseBody::Binary(bytes),
        ResponseMode::Json => match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => ResponseBody::Structured(value),
            Err(_) => ResponseBody::Binary(bytes),
        },
    };

    Ok(CapturedResponse {
        status,
        content_type,
        content_disposition,
        body,
    })
}

fn header(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}
