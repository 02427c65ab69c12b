use reqwest::StatusCode;

/// What one request came back with.
///
/// Any response at all is a `Success`, whatever its status; `Failure` is
/// reserved for requests that never got one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	Success(u16),
	Failure(String),
}

impl Outcome {
	/// Only a plain `200 OK` counts towards the success tally.
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(status) if StatusCode::OK == *status)
	}

	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Success(status) => Some(*status),
			Self::Failure(_) => None,
		}
	}
}
