use std::{
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
	time::Duration,
};

use reqwest::Client;

use crate::{
	error::{VolleyError, VolleyErrorKind},
	options::RunOptions,
};

pub const VOLLEY_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const REQWEST_VERSION: &str = env!("REQWEST_VERSION");
pub const USER_AGENT: &str = concat!(
	"Volley/",
	env!("CARGO_PKG_VERSION"),
	" reqwest/",
	env!("REQWEST_VERSION")
);

#[derive(Debug, Clone, Default)]
pub struct AgentOptions {
	pub user_agent: Option<String>,
	pub timeout: Option<Duration>,
}

impl From<&RunOptions> for AgentOptions {
	fn from(options: &RunOptions) -> Self {
		Self {
			user_agent: options.user_agent().map(ToOwned::to_owned),
			timeout: options.timeout(),
		}
	}
}

/// Counters shared by every clone of an [`Agent`].
#[derive(Debug, Default)]
pub struct AgentStats {
	pub requests_sent: AtomicU64,
	pub responses_received: AtomicU64,
	pub bytes_received: AtomicU64,
	pub in_flight: AtomicU64,
	pub peak_in_flight: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
	pub requests_sent: u64,
	pub responses_received: u64,
	pub bytes_received: u64,
	pub in_flight: u64,
	pub peak_in_flight: u64,
}

impl AgentStats {
	/// Marks a request as in flight until the guard drops, including on panic.
	pub(crate) fn begin(&self) -> InFlight<'_> {
		self.requests_sent.fetch_add(1, Ordering::Relaxed);
		let now = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
		self.peak_in_flight.fetch_max(now, Ordering::AcqRel);
		InFlight(self)
	}

	pub fn snapshot(&self) -> StatsSnapshot {
		StatsSnapshot {
			requests_sent: self.requests_sent.load(Ordering::Relaxed),
			responses_received: self.responses_received.load(Ordering::Relaxed),
			bytes_received: self.bytes_received.load(Ordering::Relaxed),
			in_flight: self.in_flight.load(Ordering::Acquire),
			peak_in_flight: self.peak_in_flight.load(Ordering::Acquire),
		}
	}
}

pub(crate) struct InFlight<'a>(&'a AgentStats);

impl Drop for InFlight<'_> {
	fn drop(&mut self) {
		self.0.in_flight.fetch_sub(1, Ordering::AcqRel);
	}
}

#[derive(Debug, Clone)]
pub struct Agent {
	pub(crate) client: Client,
	pub(crate) stats: Arc<AgentStats>,
}

impl Agent {
	pub fn new() -> Result<Self, VolleyError> {
		Self::with_options(AgentOptions::default())
	}

	pub fn with_options(options: AgentOptions) -> Result<Self, VolleyError> {
		let mut client =
			Client::builder().user_agent(options.user_agent.as_deref().unwrap_or(USER_AGENT));

		if let Some(timeout) = options.timeout {
			client = client.timeout(timeout);
		}

		let client = client
			.build()
			.map_err(|err| VolleyError::new(VolleyErrorKind::Client, Some(err.to_string())))?;

		Ok(Self {
			client,
			stats: Arc::default(),
		})
	}

	pub fn stats(&self) -> StatsSnapshot {
		self.stats.snapshot()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_user_agent_names_both_versions() {
		assert!(USER_AGENT.starts_with(&format!("Volley/{VOLLEY_VERSION} ")));
		assert!(USER_AGENT.ends_with(&format!("reqwest/{REQWEST_VERSION}")));
	}

	#[test]
	fn test_in_flight_guard_tracks_peak() {
		let stats = AgentStats::default();
		{
			let _a = stats.begin();
			let _b = stats.begin();
			assert_eq!(stats.snapshot().in_flight, 2);
		}
		let _c = stats.begin();

		let snapshot = stats.snapshot();
		assert_eq!(snapshot.requests_sent, 3);
		assert_eq!(snapshot.in_flight, 1);
		assert_eq!(snapshot.peak_in_flight, 2);
	}

	#[test]
	fn test_clones_share_stats() {
		let agent = Agent::new().unwrap();
		let clone = agent.clone();
		drop(clone.stats.begin());
		assert_eq!(agent.stats().requests_sent, 1);
		assert_eq!(agent.stats().in_flight, 0);
	}
}
