use tracing_subscriber::EnvFilter;

use crate::context::Error;

/// Installs the global `tracing` subscriber.
///
/// `$RUST_LOG` takes precedence; `default_directive` (e.g. `osu_bot=info`)
/// is added on top of whatever it specifies.
pub fn init_tracing(default_directive: &str) -> Result<(), Error> {
	let filter = EnvFilter::from_default_env().add_directive(default_directive.parse()?);

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.try_init()
		.map_err(|e| anyhow::anyhow!("Could not install the tracing subscriber: {e}"))?;

	Ok(())
}
