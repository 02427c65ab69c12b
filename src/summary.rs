use std::{collections::BTreeMap, fmt, time::Duration};

use serde::Serialize;

use crate::{error::VolleyError, outcome::Outcome};

/// Requests per second, or `0.0` when there is nothing to divide.
pub fn requests_per_second(total: u64, elapsed: Duration) -> f64 {
	let secs = elapsed.as_secs_f64();
	if total == 0 || secs <= 0.0 {
		0.0
	} else {
		total as f64 / secs
	}
}

/// Running counts, fed one [`Outcome`] at a time by the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct Tally {
	success_count: u64,
	error_count: u64,
	transport_errors: u64,
	statuses: BTreeMap<u16, u64>,
}

impl Tally {
	pub fn record(&mut self, outcome: &Outcome) {
		if outcome.is_success() {
			self.success_count += 1;
		} else {
			self.error_count += 1;
		}

		match outcome.status() {
			Some(status) => *self.statuses.entry(status).or_insert(0) += 1,
			None => self.transport_errors += 1,
		}
	}

	/// Units that were claimed but never reported (their worker died).
	pub fn record_lost(&mut self, count: u64) {
		self.error_count += count;
		self.transport_errors += count;
	}

	pub fn collected(&self) -> u64 {
		self.success_count + self.error_count
	}

	pub fn finish(self, total: u64, elapsed: Duration) -> RunSummary {
		RunSummary {
			total,
			success_count: self.success_count,
			error_count: self.error_count,
			elapsed_seconds: elapsed.as_secs_f64(),
			requests_per_second: requests_per_second(total, elapsed),
			statuses: self.statuses,
			transport_errors: self.transport_errors,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
	pub total: u64,
	pub success_count: u64,
	pub error_count: u64,
	pub elapsed_seconds: f64,
	pub requests_per_second: f64,
	/// Responses by status code.
	pub statuses: BTreeMap<u16, u64>,
	/// Requests that got no response at all.
	pub transport_errors: u64,
}

impl RunSummary {
	pub fn to_json(&self) -> Result<String, VolleyError> {
		Ok(serde_json::to_string(self)?)
	}
}

impl fmt::Display for RunSummary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Run complete")?;
		writeln!(f, "Total requests:      {}", self.total)?;
		writeln!(f, "Successful requests: {}", self.success_count)?;
		writeln!(f, "Failed requests:     {}", self.error_count)?;
		writeln!(f, "Elapsed time:        {:.2} s", self.elapsed_seconds)?;
		writeln!(f, "Requests per second: {:.2}", self.requests_per_second)?;

		if self.statuses.is_empty() && self.transport_errors == 0 {
			return Ok(());
		}

		writeln!(f, "Breakdown:")?;
		for (status, count) in &self.statuses {
			writeln!(f, "  {status}: {count}")?;
		}
		if self.transport_errors > 0 {
			writeln!(f, "  transport error: {}", self.transport_errors)?;
		}
		Ok(())
	}
}
