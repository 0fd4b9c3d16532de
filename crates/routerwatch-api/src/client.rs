// Graph endpoint HTTP client
//
// Wraps `reqwest::Client` with template-based URL derivation and status /
// body handling. One method per request kind; today that is just the
// per-router series read.

use reqwest::header::{CACHE_CONTROL, HeaderValue};
use tracing::{debug, trace};

use crate::error::Error;
use crate::models::GraphPayload;
use crate::template::UrlTemplate;
use crate::transport::TransportConfig;

/// Header the graph endpoint uses to tell XHR calls from page loads.
const REQUESTED_WITH: &str = "X-Requested-With";
const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// Longest body excerpt carried in error messages.
const BODY_PREVIEW_LEN: usize = 200;

/// Raw HTTP client for the router graph endpoint.
///
/// Cheap to clone: `reqwest::Client` is reference-counted internally.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    template: UrlTemplate,
}

impl GraphClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(template: UrlTemplate, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, template })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, template: UrlTemplate) -> Self {
        Self { http, template }
    }

    /// The URL template requests are derived from.
    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }

    /// Fetch the current series for one router.
    ///
    /// Responses are never served from a cache: every poll must observe the
    /// backend's latest samples.
    pub async fn fetch_series(&self, router: &str) -> Result<GraphPayload, Error> {
        let url = self.template.resolve(router)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .header(REQUESTED_WITH, XML_HTTP_REQUEST)
            .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_payload(resp).await
    }
}

/// Check the status, then decode the body as a [`GraphPayload`].
async fn parse_payload(resp: reqwest::Response) -> Result<GraphPayload, Error> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Http {
            status: status.as_u16(),
            message: preview(&body).to_owned(),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;
    trace!(len = body.len(), "graph payload received");

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body: body.clone(),
    })
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(BODY_PREVIEW_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
