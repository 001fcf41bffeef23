use std::future::Future;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::context::config::SimulationConfig;
use crate::context::Error;
use crate::osu::ruleset::Ruleset;

/// Transport to the simulation service.
///
/// Futures are required to be `Send` so health checks can run on a spawned
/// task.
pub trait SimulationHttpClient: Send + Sync + 'static {
	fn simulate<Req, Res>(
		&self,
		ruleset: Ruleset,
		request: &Req,
	) -> impl Future<Output = Result<Res, Error>> + Send
	where
		Req: Serialize + Sync,
		Res: DeserializeOwned + Send;

	/// Succeeds iff the service reports itself healthy.
	fn check_health(&self) -> impl Future<Output = Result<(), Error>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpSimulationClient {
	client: reqwest::Client,
	api_url: String,
	api_token: Option<String>,
}

impl HttpSimulationClient {
	pub fn new(client: reqwest::Client, api_url: &str, api_token: Option<String>) -> Self {
		Self {
			client,
			api_url: api_url.trim_end_matches('/').to_owned(),
			api_token,
		}
	}

	pub fn from_config(config: &SimulationConfig) -> Result<Self, Error> {
		let api_url = config
			.api_url
			.as_deref()
			.context("The remote simulation backend requires an api url")?;

		let client = reqwest::Client::builder()
			.timeout(config.request_timeout())
			.build()
			.context("Could not build the http client")?;

		Ok(Self::new(client, api_url, config.api_token.clone()))
	}

	#[inline]
	pub fn api_url(&self) -> &str {
		&self.api_url
	}
}

impl SimulationHttpClient for HttpSimulationClient {
	async fn simulate<Req, Res>(&self, ruleset: Ruleset, request: &Req) -> Result<Res, Error>
	where
		Req: Serialize + Sync,
		Res: DeserializeOwned + Send,
	{
		let url = format!("{}/simulate/{}", self.api_url, ruleset.api_name());

		let mut builder = self.client.post(&url).json(request);
		if let Some(token) = &self.api_token {
			builder = builder.header("Token", token);
		}

		let response = builder
			.send()
			.await
			.with_context(|| format!("Could not reach {url}"))?
			.error_for_status()?;

		let body = response
			.json::<Res>()
			.await
			.with_context(|| format!("Invalid {ruleset} simulation response"))?;

		Ok(body)
	}

	async fn check_health(&self) -> Result<(), Error> {
		self.client
			.get(format!("{}/health", self.api_url))
			.send()
			.await?
			.error_for_status()?;

		Ok(())
	}
}

// }}}
