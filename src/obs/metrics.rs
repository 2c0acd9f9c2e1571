// self
use crate::{flows::FlowPhase, obs::DispatchOutcome};

/// Records a dispatch outcome via the global metrics recorder (when enabled).
pub fn record_dispatch_outcome(phase: FlowPhase, outcome: DispatchOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"hubspot_oauth2_dispatch_total",
			"phase" => phase.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (phase, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_dispatch_outcome_noop_without_metrics() {
		record_dispatch_outcome(FlowPhase::CodeExchange, DispatchOutcome::Error);
	}
}
