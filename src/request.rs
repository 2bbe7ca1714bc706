//! Per-call request value bags and the helpers that resolve them into wire requests.

pub mod body;
pub mod template;

pub use body::*;
pub use template::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// HTTP verbs understood by the connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl Method {
	/// Returns the canonical upper-case verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<Method> for reqwest::Method {
	fn from(method: Method) -> Self {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}

/// One outbound management API call before it is resolved against a connection.
///
/// `resource` is a path template relative to the connection's base URL; `{name}`
/// placeholders are filled from `url_segments`. Query pairs and headers keep insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: Method,
	/// Resource path template, e.g. `users/{id}`.
	pub resource: String,
	/// Values substituted into `{name}` placeholders.
	pub url_segments: BTreeMap<String, String>,
	/// Query pairs appended to the URL.
	pub query: Vec<(String, String)>,
	/// JSON body; `null` fields are pruned before sending.
	pub body: Option<serde_json::Value>,
	/// Extra headers merged after the connection defaults.
	pub headers: Vec<(String, String)>,
}
impl ApiRequest {
	/// Creates an empty request for `method` + `resource`.
	pub fn new(method: Method, resource: impl Into<String>) -> Self {
		Self {
			method,
			resource: resource.into(),
			url_segments: BTreeMap::new(),
			query: Vec::new(),
			body: None,
			headers: Vec::new(),
		}
	}

	/// Shorthand for [`Method::Get`].
	pub fn get(resource: impl Into<String>) -> Self {
		Self::new(Method::Get, resource)
	}

	/// Shorthand for [`Method::Post`].
	pub fn post(resource: impl Into<String>) -> Self {
		Self::new(Method::Post, resource)
	}

	/// Shorthand for [`Method::Put`].
	pub fn put(resource: impl Into<String>) -> Self {
		Self::new(Method::Put, resource)
	}

	/// Shorthand for [`Method::Patch`].
	pub fn patch(resource: impl Into<String>) -> Self {
		Self::new(Method::Patch, resource)
	}

	/// Shorthand for [`Method::Delete`].
	pub fn delete(resource: impl Into<String>) -> Self {
		Self::new(Method::Delete, resource)
	}

	/// Sets one URL segment, replacing any previous value for `name`.
	pub fn url_segment(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.url_segments.insert(name.into(), value.into());

		self
	}

	/// Sets several URL segments.
	pub fn url_segments<I, K, V>(mut self, segments: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.url_segments.extend(segments.into_iter().map(|(k, v)| (k.into(), v.into())));

		self
	}

	/// Appends one query pair.
	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Appends a query pair only when `value` is present.
	pub fn query_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
		match value {
			Some(value) => self.query(key, value),
			None => self,
		}
	}

	/// Appends several query pairs.
	pub fn queries<I, K, V>(mut self, pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));

		self
	}

	/// Serializes `body` as the JSON payload, dropping `null` fields.
	pub fn json_body<B>(mut self, body: &B) -> Result<Self, ConfigError>
	where
		B: ?Sized + Serialize,
	{
		self.body = Some(to_json_value(body)?);

		Ok(self)
	}

	/// Appends one extra header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Resolves the resource, segments, and query against `base`.
	pub fn resolve_url(&self, base: &Url) -> Result<Url, ConfigError> {
		template::resolve_url(base, &self.resource, &self.url_segments, &self.query)
	}
}
