//! Connection-level error types shared by the dispatcher, transports, and request builders.

// self
use crate::{_prelude::*, http::ResponseMetadata};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Remote API answered with a non-success status.
	#[error("Management API responded with HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Metadata captured from the response headers.
		metadata: ResponseMetadata,
		/// Response body decoded as UTF-8 (lossy).
		body: String,
	},
	/// Success response body could not be decoded into the requested type.
	#[error("Management API returned a body that does not match the expected shape.")]
	Decode {
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Returns the HTTP status attached to the error, when the request reached the server.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL cannot carry path segments (e.g. `mailto:`).
	#[error("Base URL `{url}` cannot be used as a base for resource paths.")]
	BaseUrlCannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Bearer token is empty.
	#[error("Bearer token must not be empty.")]
	EmptyToken,

	/// Resource template references a segment that was not supplied.
	#[error("Resource `{resource}` references URL segment `{segment}` which was not supplied.")]
	MissingUrlSegment {
		/// Resource template.
		resource: String,
		/// Placeholder name without braces.
		segment: String,
	},
	/// Resource template contains an unterminated `{` placeholder.
	#[error("Resource `{resource}` contains an unterminated URL segment placeholder.")]
	MalformedResource {
		/// Resource template.
		resource: String,
	},
	/// Caller attempted to override a header managed by the connection.
	#[error("Header `{name}` is managed by the connection and cannot be overridden.")]
	ReservedHeader {
		/// Header name as supplied.
		name: String,
	},
	/// Header name or value was rejected by the transport.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Header name as supplied.
		name: String,
		/// Underlying validation failure.
		#[source]
		source: BoxError,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized to JSON.")]
	BodySerialize(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a header validation failure inside [`ConfigError`].
	pub fn invalid_header(
		name: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::InvalidHeader { name: name.into(), source: Box::new(src) }
	}
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the management API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
