//! Builder for [`ApiConnection`] with validation of the base URL, token, and default headers.

// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	connection::{ApiConnection, ensure_not_reserved},
	error::ConfigError,
	hook::{ErrorHook, NoopErrorHook},
	http::ApiHttpClient,
};

/// Collects connection settings; [`ApiConnectionBuilder::build`] validates them.
pub struct ApiConnectionBuilder<C>
where
	C: ?Sized + ApiHttpClient,
{
	token: String,
	base_url: String,
	http_client: Arc<C>,
	error_hook: Arc<dyn ErrorHook>,
	default_headers: Vec<(String, String)>,
}
impl<C> ApiConnectionBuilder<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a builder for `token` + `base_url` over `http_client`.
	pub fn new(
		token: impl Into<String>,
		base_url: impl AsRef<str>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			token: token.into(),
			base_url: base_url.as_ref().to_owned(),
			http_client: http_client.into(),
			error_hook: Arc::new(NoopErrorHook),
			default_headers: Vec::new(),
		}
	}

	/// Adds a header sent with every call; request headers with the same name win.
	pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.default_headers.push((name.into(), value.into()));

		self
	}

	/// Replaces the hook notified about non-success responses.
	pub fn error_hook(mut self, hook: Arc<dyn ErrorHook>) -> Self {
		self.error_hook = hook;

		self
	}

	/// Swaps the transport, keeping every other setting.
	pub fn http_client<D>(self, http_client: Arc<D>) -> ApiConnectionBuilder<D>
	where
		D: ?Sized + ApiHttpClient,
	{
		ApiConnectionBuilder {
			token: self.token,
			base_url: self.base_url,
			http_client,
			error_hook: self.error_hook,
			default_headers: self.default_headers,
		}
	}

	/// Validates the settings and creates the connection.
	pub fn build(self) -> Result<ApiConnection<C>> {
		let token = BearerToken::new(self.token)?;
		let base_url =
			Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		if base_url.cannot_be_a_base() {
			return Err(ConfigError::BaseUrlCannotBeABase { url: self.base_url }.into());
		}

		for (name, _) in &self.default_headers {
			ensure_not_reserved(name)?;
		}

		Ok(ApiConnection {
			http_client: self.http_client,
			error_hook: self.error_hook,
			base_url,
			token,
			default_headers: self.default_headers,
		})
	}
}
impl<C> Debug for ApiConnectionBuilder<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiConnectionBuilder")
			.field("base_url", &self.base_url)
			.field("default_headers", &self.default_headers)
			.finish_non_exhaustive()
	}
}
