use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::context::Error;

/// Availability of the simulation service, as last observed.
///
/// Starts out available. Transitions are logged once, not on every probe.
#[derive(Debug)]
pub struct CircuitState {
	available: AtomicBool,
}

impl Default for CircuitState {
	fn default() -> Self {
		Self {
			available: AtomicBool::new(true),
		}
	}
}

impl CircuitState {
	#[inline]
	pub fn is_available(&self) -> bool {
		self.available.load(Ordering::Acquire)
	}

	/// Opens the circuit. Returns whether this changed the state.
	pub fn record_failure(&self, reason: &Error) -> bool {
		let flipped = self.available.swap(false, Ordering::AcqRel);
		if flipped {
			warn!("Simulation service is unavailable: {reason:#}");
		}

		flipped
	}

	/// Closes the circuit. Returns whether this changed the state.
	pub fn record_success(&self) -> bool {
		let flipped = !self.available.swap(true, Ordering::AcqRel);
		if flipped {
			info!("Simulation service is available again");
		}

		flipped
	}
}

// {{{ Tests
#[cfg(test)]
mod circuit_tests {
	use anyhow::anyhow;

	use super::*;

	#[test]
	fn transitions_are_reported_once() {
		let circuit = CircuitState::default();
		assert!(circuit.is_available());
		assert!(!circuit.record_success());

		let reason = anyhow!("connection refused");
		assert!(circuit.record_failure(&reason));
		assert!(!circuit.record_failure(&reason));
		assert!(!circuit.is_available());

		assert!(circuit.record_success());
		assert!(!circuit.record_success());
		assert!(circuit.is_available());
	}
}
// }}}
