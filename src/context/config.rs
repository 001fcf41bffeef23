//! This module provides helpers for working with environment
//! variables, together with a struct that keeps track of all the
//! runtime-relevant simulation settings.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use serde::Deserialize;

/// Wrapper around [std::env::var] which adds [anyhow] context around errors.
pub fn get_var(name: &str) -> anyhow::Result<String> {
	std::env::var(name).with_context(|| format!("Missing ${name} environment variable"))
}

/// Reads an optional environment variable, parsing it when present.
pub fn get_parsed_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
	T: FromStr,
	T::Err: std::error::Error + Send + Sync + 'static,
{
	match std::env::var(name) {
		Ok(value) => {
			let parsed = value
				.trim()
				.parse()
				.with_context(|| format!("${name} has an invalid value: {value:?}"))?;
			Ok(Some(parsed))
		}
		Err(_) => Ok(None),
	}
}

// {{{ Backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationBackendKind {
	/// HTTP simulation service, guarded by a circuit breaker.
	#[default]
	Remote,
	/// Built-in engine.
	Local,
}

impl FromStr for SimulationBackendKind {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"remote" => Ok(Self::Remote),
			"local" => Ok(Self::Local),
			other => Err(anyhow!("Unknown simulation backend {other:?}")),
		}
	}
}
// }}}
// {{{ Config
pub const DEFAULT_HEALTH_CHECK_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BEATMAP_DOWNLOAD_URL: &str = "https://osu.ppy.sh/osu";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
	#[serde(default)]
	pub backend: SimulationBackendKind,

	/// Base url of the simulation service. Required by the remote backend.
	#[serde(default)]
	pub api_url: Option<String>,
	#[serde(default)]
	pub api_token: Option<String>,

	#[serde(default = "default_health_check_interval_secs")]
	pub health_check_interval_secs: u64,
	#[serde(default = "default_request_timeout_secs")]
	pub request_timeout_secs: u64,

	/// Directory holding `<beatmap id>.osu` files for the local backend.
	#[serde(default)]
	pub beatmaps_dir: Option<PathBuf>,
	#[serde(default = "default_beatmap_download_url")]
	pub beatmap_download_url: String,
}

fn default_health_check_interval_secs() -> u64 {
	DEFAULT_HEALTH_CHECK_INTERVAL_SECS
}

fn default_request_timeout_secs() -> u64 {
	DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_beatmap_download_url() -> String {
	DEFAULT_BEATMAP_DOWNLOAD_URL.to_owned()
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			backend: SimulationBackendKind::default(),
			api_url: None,
			api_token: None,
			health_check_interval_secs: DEFAULT_HEALTH_CHECK_INTERVAL_SECS,
			request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
			beatmaps_dir: None,
			beatmap_download_url: default_beatmap_download_url(),
		}
	}
}

impl SimulationConfig {
	/// Reads the file pointed at by `$OSU_BOT_CONFIG` if set,
	/// falling back to individual environment variables otherwise.
	pub fn load() -> anyhow::Result<Self> {
		match std::env::var("OSU_BOT_CONFIG") {
			Ok(path) => {
				let contents = std::fs::read_to_string(&path)
					.with_context(|| format!("Could not read config file at {path:?}"))?;
				Self::from_toml_str(&contents)
					.with_context(|| format!("Invalid config file at {path:?}"))
			}
			Err(_) => Self::from_env(),
		}
	}

	pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
		let config: Self = toml::from_str(contents)?;
		config.validate()?;
		Ok(config)
	}

	pub fn from_env() -> anyhow::Result<Self> {
		let mut config = Self::default();

		if let Some(backend) = get_parsed_var::<String>("OSU_BOT_SIMULATION_BACKEND")? {
			config.backend = backend.parse()?;
		}

		config.api_url = get_var("OSU_BOT_SIMULATION_API_URL").ok();
		config.api_token = get_var("OSU_BOT_SIMULATION_API_TOKEN").ok();

		if let Some(secs) = get_parsed_var("OSU_BOT_HEALTH_CHECK_INTERVAL")? {
			config.health_check_interval_secs = secs;
		}

		if let Some(secs) = get_parsed_var("OSU_BOT_REQUEST_TIMEOUT")? {
			config.request_timeout_secs = secs;
		}

		config.beatmaps_dir = get_var("OSU_BOT_BEATMAPS_DIR").ok().map(PathBuf::from);

		if let Ok(url) = get_var("OSU_BOT_BEATMAP_DOWNLOAD_URL") {
			config.beatmap_download_url = url;
		}

		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> anyhow::Result<()> {
		if self.backend == SimulationBackendKind::Remote && self.api_url.is_none() {
			bail!("The remote simulation backend requires an api url");
		}

		if self.health_check_interval_secs == 0 {
			bail!("The health check interval must be positive");
		}

		Ok(())
	}

	#[inline]
	pub fn health_check_interval(&self) -> Duration {
		Duration::from_secs(self.health_check_interval_secs)
	}

	#[inline]
	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.request_timeout_secs)
	}
}
// }}}
