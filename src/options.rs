use std::time::Duration;

use crate::error::{VolleyError, VolleyErrorKind};

pub const DEFAULT_TARGET_URL: &str = "http://127.0.0.1:80";
pub const DEFAULT_TOTAL_REQUESTS: u64 = 1000;
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Everything one run needs. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct RunOptions {
	target_url: String,
	total_requests: u64,
	concurrency: usize,
	timeout: Option<Duration>,
	user_agent: Option<String>,
}

impl Default for RunOptions {
	fn default() -> Self {
		Self {
			target_url: DEFAULT_TARGET_URL.to_owned(),
			total_requests: DEFAULT_TOTAL_REQUESTS,
			concurrency: DEFAULT_CONCURRENCY,
			timeout: None,
			user_agent: None,
		}
	}
}

impl RunOptions {
	/// The URL is deliberately not parsed here: a bad URL fails each request,
	/// not the run.
	pub fn new(
		target_url: impl Into<String>,
		total_requests: u64,
		concurrency: usize,
	) -> Result<Self, VolleyError> {
		if concurrency == 0 {
			return Err(VolleyError::new(
				VolleyErrorKind::InvalidOptions,
				Some("concurrency must be at least 1"),
			));
		}

		Ok(Self {
			target_url: target_url.into(),
			total_requests,
			concurrency,
			..Self::default()
		})
	}

	/// Per-request timeout. Without one, requests wait as long as the client does.
	pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, VolleyError> {
		if timeout.is_zero() {
			return Err(VolleyError::new(
				VolleyErrorKind::InvalidOptions,
				Some("timeout must be greater than zero"),
			));
		}

		self.timeout = Some(timeout);
		Ok(self)
	}

	/// Same as [`with_timeout`](Self::with_timeout), in (fractional) seconds.
	pub fn with_timeout_secs(self, secs: f64) -> Result<Self, VolleyError> {
		let timeout = Duration::try_from_secs_f64(secs).map_err(|err| {
			VolleyError::new(
				VolleyErrorKind::InvalidOptions,
				Some(format!("invalid timeout {secs}: {err}")),
			)
		})?;
		self.with_timeout(timeout)
	}

	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());
		self
	}

	pub fn target_url(&self) -> &str {
		&self.target_url
	}

	pub fn total_requests(&self) -> u64 {
		self.total_requests
	}

	pub fn concurrency(&self) -> usize {
		self.concurrency
	}

	pub fn timeout(&self) -> Option<Duration> {
		self.timeout
	}

	pub fn user_agent(&self) -> Option<&str> {
		self.user_agent.as_deref()
	}

	/// Workers actually started: never more than there is work for.
	pub fn worker_count(&self) -> usize {
		usize::try_from(self.total_requests)
			.map_or(self.concurrency, |total| total.min(self.concurrency))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_match_constants() {
		let options = RunOptions::default();
		assert_eq!(options.target_url(), "http://127.0.0.1:80");
		assert_eq!(options.total_requests(), 1000);
		assert_eq!(options.concurrency(), 50);
		assert_eq!(options.timeout(), None);
		assert_eq!(options.user_agent(), None);
	}

	#[test]
	fn test_zero_concurrency_rejected() {
		let err = RunOptions::new("http://localhost", 10, 0).unwrap_err();
		assert_eq!(err.kind, VolleyErrorKind::InvalidOptions);
	}

	#[test]
	fn test_zero_requests_allowed() {
		let options = RunOptions::new("http://localhost", 0, 4).unwrap();
		assert_eq!(options.total_requests(), 0);
		assert_eq!(options.worker_count(), 0);
	}

	#[test]
	fn test_malformed_url_accepted() {
		assert!(RunOptions::new("not a url", 1, 1).is_ok());
	}

	#[test]
	fn test_worker_count_capped_by_total() {
		assert_eq!(RunOptions::new("http://x", 3, 10).unwrap().worker_count(), 3);
		assert_eq!(RunOptions::new("http://x", 100, 10).unwrap().worker_count(), 10);
	}

	#[test]
	fn test_timeout_secs() {
		let options = RunOptions::new("http://x", 1, 1)
			.unwrap()
			.with_timeout_secs(1.5)
			.unwrap();
		assert_eq!(options.timeout(), Some(Duration::from_millis(1500)));
	}

	#[test]
	fn test_bad_timeouts_rejected() {
		let base = RunOptions::new("http://x", 1, 1).unwrap();
		for secs in [0.0, -1.0, f64::NAN] {
			let err = base.clone().with_timeout_secs(secs).unwrap_err();
			assert_eq!(err.kind, VolleyErrorKind::InvalidOptions, "{secs}");
		}
	}
}
