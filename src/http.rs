//! Transport primitives for management API calls.
//!
//! The module exposes [`ApiHttpClient`] alongside the resolved [`HttpRequest`] and raw
//! [`HttpResponse`] values exchanged with it, so downstream crates can plug in any HTTP stack
//! while the connection keeps ownership of URL resolution, headers, and JSON decoding.
//! [`ResponseMetadata`] summarizes the headers the error hook cares about.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, request::Method};
#[cfg(feature = "reqwest")] use crate::error::{ConfigError, TransportError};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing a fully resolved request.
///
/// The connection hands over an [`HttpRequest`] whose URL, headers, and body are final;
/// implementations only move bytes. Transport failures must surface as
/// [`Error::Transport`], header validation failures as [`Error::Config`]. Non-success
/// statuses are not errors at this layer and must be returned as regular responses.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves with the raw response.
	fn execute<'a>(&'a self, request: &'a HttpRequest) -> HttpFuture<'a>;
}

/// Outbound request produced by the connection.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
	/// HTTP verb.
	pub method: Method,
	/// Absolute URL with segments substituted and query applied.
	pub url: Url,
	/// Header list in send order.
	pub headers: Vec<(String, String)>,
	/// Serialized JSON body, if any.
	pub body: Option<Vec<u8>>,
}
impl HttpRequest {
	/// Returns the first header value matching `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}

	/// Parses the body as JSON, mainly for hooks and tests.
	pub fn json_body(&self) -> Option<serde_json::Value> {
		self.body.as_deref().and_then(|bytes| serde_json::from_slice(bytes).ok())
	}
}
impl Debug for HttpRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(name, value)| {
				if name.eq_ignore_ascii_case("authorization") {
					(name.as_str(), "<redacted>")
				} else {
					(name.as_str(), value.as_str())
				}
			})
			.collect::<Vec<_>>();

		f.debug_struct("HttpRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.finish()
	}
}

/// Raw response returned by a transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers; non UTF-8 values are decoded lossily.
	pub headers: Vec<(String, String)>,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response with the given status and body and no headers.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: Vec::new(), body: body.into() }
	}

	/// Appends a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns the first header value matching `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}

	/// Extracts the [`ResponseMetadata`] carried by this response.
	pub fn metadata(&self) -> ResponseMetadata {
		ResponseMetadata {
			status: self.status,
			retry_after: self.header("retry-after").and_then(parse_retry_after),
		}
	}
}

/// Metadata captured from a response for error reporting.
///
/// Additional fields may be added in future releases, so downstream code should construct
/// values using field names instead of struct update syntax.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code.
	pub status: u16,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Timeouts, proxies, and TLS settings belong on the wrapped client; pass a configured one
/// through [`ReqwestHttpClient::with_client`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute<'a>(&'a self, request: &'a HttpRequest) -> HttpFuture<'a> {
		Box::pin(execute_reqwest(&self.0, request))
	}
}

#[cfg(feature = "reqwest")]
async fn execute_reqwest(client: &ReqwestClient, request: &HttpRequest) -> Result<HttpResponse> {
	let mut headers = HeaderMap::with_capacity(request.headers.len());

	for (name, value) in &request.headers {
		let header_name = HeaderName::from_bytes(name.as_bytes())
			.map_err(|e| ConfigError::invalid_header(name.as_str(), e))?;
		let header_value = HeaderValue::from_str(value)
			.map_err(|e| ConfigError::invalid_header(name.as_str(), e))?;

		headers.append(header_name, header_value);
	}

	let mut builder = client.request(request.method.into(), request.url.clone()).headers(headers);

	if let Some(body) = &request.body {
		builder = builder.body(body.clone());
	}

	let response = builder.send().await.map_err(TransportError::from)?;
	let status = response.status().as_u16();
	let headers = response
		.headers()
		.iter()
		.map(|(name, value)| {
			(name.as_str().to_owned(), String::from_utf8_lossy(value.as_bytes()).into_owned())
		})
		.collect();
	let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

	Ok(HttpResponse { status, headers, body })
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
	headers
		.iter()
		.find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
		.map(|(_, value)| value.as_str())
}

fn parse_retry_after(value: &str) -> Option<Duration> {
	let raw = value.trim();

	if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
		return raw.parse::<i64>().ok().map(Duration::seconds);
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
