// {{{ Imports
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::context::config::{SimulationBackendKind, SimulationConfig};
use crate::estimation::providers::EstimationProviders;
use crate::simulation::backend::SimulationBackend;
use crate::simulation::http::HttpSimulationClient;
use crate::simulation::local::{BeatmapFileSource, LocalScoreSimulationsDao};
use crate::simulation::remote::RemoteScoreSimulationsDao;
use crate::timed;
// }}}

pub mod config;

// {{{ Common types
pub type Error = anyhow::Error;
// }}}
// {{{ Error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	User,
	Internal,
}

#[derive(Debug)]
pub struct TaggedError {
	pub kind: ErrorKind,
	pub error: Error,
}

impl TaggedError {
	#[inline]
	pub fn new(kind: ErrorKind, error: Error) -> Self {
		Self { kind, error }
	}
}

#[macro_export]
macro_rules! get_user_error {
	($err:expr) => {{
		match $err.kind {
			$crate::context::ErrorKind::User => $err.error,
			$crate::context::ErrorKind::Internal => Err($err.error)?,
		}
	}};
}

impl<E: Into<Error>> From<E> for TaggedError {
	fn from(value: E) -> Self {
		Self::new(ErrorKind::Internal, value.into())
	}
}

pub trait TagError {
	fn tag(self, tag: ErrorKind) -> TaggedError;
}

impl TagError for Error {
	fn tag(self, tag: ErrorKind) -> TaggedError {
		TaggedError::new(tag, self)
	}
}
// }}}
// {{{ BotContext
/// Everything a command handler needs to estimate scores.
pub struct BotContext {
	pub config: SimulationConfig,
	pub simulations: Arc<SimulationBackend>,
	pub estimators: EstimationProviders<SimulationBackend>,

	/// Circuit-breaker probe for the remote backend. Aborted on drop.
	health_checks: Option<JoinHandle<()>>,
}

impl BotContext {
	pub fn new(config: SimulationConfig) -> Result<Self, Error> {
		timed!("create_context", {
			let (backend, health_checks) = match config.backend {
				SimulationBackendKind::Remote => {
					let client = HttpSimulationClient::from_config(&config)?;
					let dao = Arc::new(RemoteScoreSimulationsDao::new(client));
					let handle = dao.spawn_health_checks(config.health_check_interval());
					debug!(
						"Checking on {} every {:?}",
						dao.client().api_url(),
						config.health_check_interval()
					);

					(SimulationBackend::Remote(dao), Some(handle))
				}
				SimulationBackendKind::Local => {
					let source = BeatmapFileSource::from_config(&config)?;

					(
						SimulationBackend::Local(LocalScoreSimulationsDao::new(source)),
						None,
					)
				}
			};

			info!("Using the {} simulation backend", backend.name());
			let simulations = Arc::new(backend);
			let estimators = EstimationProviders::new(simulations.clone());

			Ok(Self {
				config,
				simulations,
				estimators,
				health_checks,
			})
		})
	}
}

impl Drop for BotContext {
	fn drop(&mut self) {
		if let Some(handle) = self.health_checks.take() {
			handle.abort();
		}
	}
}
// }}}
// {{{ Tests
#[cfg(test)]
mod error_tests {
	use anyhow::anyhow;

	use super::*;

	fn user_facing() -> Result<(), TaggedError> {
		Err(anyhow!("Unknown mod XX").tag(ErrorKind::User))
	}

	fn internal() -> Result<(), TaggedError> {
		let value: u32 = "not a number".parse()?;
		let _ = value;
		Ok(())
	}

	fn surface(res: Result<(), TaggedError>) -> Result<String, Error> {
		match res {
			Ok(()) => Ok(String::new()),
			Err(err) => Ok(format!("{}", get_user_error!(err))),
		}
	}

	#[test]
	fn user_errors_become_messages() {
		assert_eq!(surface(user_facing()).unwrap(), "Unknown mod XX");
	}

	#[test]
	fn internal_errors_propagate() {
		assert!(surface(internal()).is_err());
	}
}
// }}}
