// self
use crate::{obs::CallOutcome, request::Method};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(method: Method, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"management_api_call_total",
			"method" => method.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (method, outcome);
	}
}
