//! Request dispatcher bound to one base URL and bearer token.

pub mod builder;

pub use builder::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	error::ConfigError,
	hook::ErrorHook,
	http::{ApiHttpClient, HttpRequest, HttpResponse},
	obs::{self, CallOutcome, CallSpan},
	request::{self, ApiRequest},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

const JSON: &str = "application/json";
/// Header names the connection sets itself.
pub const RESERVED_HEADERS: [&str; 2] = ["authorization", "content-type"];

#[cfg(feature = "reqwest")]
/// Connection specialized for the crate's default reqwest transport.
pub type ReqwestApiConnection = ApiConnection<ReqwestHttpClient>;

/// Dispatches JSON calls to a management API under `Authorization: Bearer <token>`.
///
/// Every verb helper funnels into [`ApiConnection::send`], which resolves the resource
/// against the base URL, merges headers, prunes `null` body fields, hands the request to the
/// transport, and decodes the response. The connection holds no mutable state, so clones
/// share the transport and hook and calls may run concurrently.
pub struct ApiConnection<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP client used for every outbound request.
	pub http_client: Arc<C>,
	/// Hook notified about non-success responses.
	pub error_hook: Arc<dyn ErrorHook>,
	base_url: Url,
	token: BearerToken,
	default_headers: Vec<(String, String)>,
}
#[cfg(feature = "reqwest")]
impl ApiConnection<ReqwestHttpClient> {
	/// Creates a connection backed by a default reqwest client.
	pub fn new(token: impl Into<String>, base_url: impl AsRef<str>) -> Result<Self> {
		Self::builder(token, base_url).build()
	}

	/// Starts a builder backed by a default reqwest client.
	pub fn builder(
		token: impl Into<String>,
		base_url: impl AsRef<str>,
	) -> ApiConnectionBuilder<ReqwestHttpClient> {
		ApiConnectionBuilder::new(token, base_url, ReqwestHttpClient::default())
	}
}
impl<C> ApiConnection<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Starts a builder that reuses the caller-provided transport.
	pub fn with_http_client(
		token: impl Into<String>,
		base_url: impl AsRef<str>,
		http_client: impl Into<Arc<C>>,
	) -> ApiConnectionBuilder<C> {
		ApiConnectionBuilder::new(token, base_url, http_client)
	}

	/// Base URL every resource is resolved against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Sends `DELETE resource`.
	pub async fn delete<T>(&self, resource: &str, url_segments: &[(&str, &str)]) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.send(ApiRequest::delete(resource).url_segments(url_segments.iter().copied())).await
	}

	/// Sends `GET resource` with optional query pairs.
	pub async fn get<T>(
		&self,
		resource: &str,
		url_segments: &[(&str, &str)],
		query: &[(&str, &str)],
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.send(
			ApiRequest::get(resource)
				.url_segments(url_segments.iter().copied())
				.queries(query.iter().copied()),
		)
		.await
	}

	/// Sends `POST resource` with a JSON body.
	pub async fn post<T, B>(&self, resource: &str, body: &B) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.send(ApiRequest::post(resource).json_body(body)?).await
	}

	/// Sends `PATCH resource` with a JSON body.
	pub async fn patch<T, B>(
		&self,
		resource: &str,
		body: &B,
		url_segments: &[(&str, &str)],
	) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.send(
			ApiRequest::patch(resource).url_segments(url_segments.iter().copied()).json_body(body)?,
		)
		.await
	}

	/// Executes `request` and decodes the response body as `T`.
	///
	/// An empty success body decodes as JSON `null`, so `()` and `Option<_>` suit
	/// `204 No Content` endpoints. Non-success statuses invoke the error hook and surface as
	/// [`Error::Status`].
	pub async fn send<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let method = request.method;
		let span = CallSpan::new(method, &request.resource);

		obs::record_call_outcome(method, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let http_request = self.prepare(&request)?;
				let response = self.http_client.execute(&http_request).await?;

				self.handle_errors(&http_request, &response)?;

				decode::<T>(&response)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(method, CallOutcome::Success),
			Err(e) => {
				obs::warn_call_failed(method, &request.resource, e);
				obs::record_call_outcome(method, CallOutcome::Failure);
			},
		}

		result
	}

	/// Resolves `request` into the exact wire request the transport will send.
	pub fn prepare(&self, request: &ApiRequest) -> Result<HttpRequest> {
		let url = request.resolve_url(&self.base_url)?;
		let body = request::body::encode_body(request.body.clone())?;
		let mut headers = vec![("accept".to_owned(), JSON.to_owned())];

		for (name, value) in self.default_headers.iter().chain(request.headers.iter()) {
			ensure_not_reserved(name)?;
			merge_header(&mut headers, name, value);
		}

		headers.push(("authorization".to_owned(), self.token.header_value()));

		if body.is_some() {
			headers.push(("content-type".to_owned(), JSON.to_owned()));
		}

		Ok(HttpRequest { method: request.method, url, headers, body })
	}

	fn handle_errors(&self, request: &HttpRequest, response: &HttpResponse) -> Result<()> {
		if response.is_success() {
			return Ok(());
		}

		let metadata = response.metadata();

		self.error_hook.on_error(request, response, &metadata);

		Err(Error::Status {
			status: response.status,
			metadata,
			body: String::from_utf8_lossy(&response.body).into_owned(),
		})
	}
}
impl<C> Clone for ApiConnection<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			error_hook: Arc::clone(&self.error_hook),
			base_url: self.base_url.clone(),
			token: self.token.clone(),
			default_headers: self.default_headers.clone(),
		}
	}
}
impl<C> Debug for ApiConnection<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiConnection")
			.field("base_url", &self.base_url.as_str())
			.field("token", &self.token)
			.field("default_headers", &self.default_headers)
			.finish_non_exhaustive()
	}
}

pub(crate) fn ensure_not_reserved(name: &str) -> Result<(), ConfigError> {
	if RESERVED_HEADERS.iter().any(|reserved| name.eq_ignore_ascii_case(reserved)) {
		return Err(ConfigError::ReservedHeader { name: name.to_owned() });
	}

	Ok(())
}

fn merge_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
	headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
	headers.push((name.to_owned(), value.to_owned()));
}

fn decode<T>(response: &HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let body: &[u8] =
		if response.body.iter().all(u8::is_ascii_whitespace) { b"null" } else { &response.body };
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let value = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::Decode { status: response.status, source })?;

	// Bytes after the first JSON value belong to no path.
	deserializer.end().map_err(|e| Error::Decode {
		status: response.status,
		source: serde_path_to_error::Error::new(serde_path_to_error::Track::new().path(), e),
	})?;

	Ok(value)
}
