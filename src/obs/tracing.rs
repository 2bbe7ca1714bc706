// self
use crate::{_prelude::*, request::Method};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span wrapping one dispatched call.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the verb and resource template.
	pub fn new(method: Method, resource: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("management_api.call", method = method.as_str(), resource);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, resource);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a warning for a failed call (when tracing is enabled).
pub fn warn_call_failed(method: Method, resource: &str, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			method = method.as_str(),
			resource,
			status = error.status(),
			%error,
			"Management API call failed."
		);
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, resource, error);
	}
}
