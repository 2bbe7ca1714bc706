//! Error hook invoked when the management API answers with a non-success status.

// self
use crate::http::{HttpRequest, HttpResponse, ResponseMetadata};

/// Observer notified before a non-success response is returned to the caller as
/// [`Error::Status`](crate::error::Error::Status).
///
/// Hooks cannot alter the outcome; they exist for logging, auditing, or collecting
/// rate-limit hints. The request's `Authorization` header is redacted in its `Debug`
/// output, but [`HttpRequest::header`] still exposes it, so implementations must not log
/// raw header values.
pub trait ErrorHook
where
	Self: 'static + Send + Sync,
{
	/// Called once per failed response.
	fn on_error(&self, request: &HttpRequest, response: &HttpResponse, metadata: &ResponseMetadata);
}

/// Default hook that ignores every failure.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopErrorHook;
impl ErrorHook for NoopErrorHook {
	fn on_error(&self, _: &HttpRequest, _: &HttpResponse, _: &ResponseMetadata) {}
}
