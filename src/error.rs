use std::{error::Error as StdError, fmt};

use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum VolleyErrorKind {
	InvalidUrl,
	InvalidOptions,
	Connect,
	Timeout,
	Redirect,
	Body,
	Network,
	Client,
	Serialize,
	WorkerLost,
	Generic,
}

impl VolleyErrorKind {
	fn default_message(self) -> &'static str {
		match self {
			Self::InvalidUrl => "invalid URL",
			Self::InvalidOptions => "invalid run options",
			Self::Connect => "could not connect",
			Self::Timeout => "timed out",
			Self::Redirect => "redirect policy violated",
			Self::Body => "failed to read response body",
			Self::Network => "network error",
			Self::Client => "could not build HTTP client",
			Self::Serialize => "could not serialize summary",
			Self::WorkerLost => "worker stopped before reporting",
			Self::Generic => "request error",
		}
	}
}

impl From<VolleyErrorKind> for VolleyError {
	fn from(kind: VolleyErrorKind) -> Self {
		Self {
			kind,
			message: None,
		}
	}
}

#[derive(Debug, Clone)]
pub struct VolleyError {
	pub kind: VolleyErrorKind,
	pub message: Option<String>,
}

impl VolleyError {
	pub fn new(kind: VolleyErrorKind, message: Option<impl Into<String>>) -> Self {
		Self {
			kind,
			message: message.map(|m| m.into()),
		}
	}
}

impl fmt::Display for VolleyError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let kind: &'static str = self.kind.into();
		write!(
			f,
			"{kind}: {}",
			self.message
				.as_deref()
				.unwrap_or_else(|| self.kind.default_message())
		)
	}
}

impl StdError for VolleyError {}

/// Flattens an error and its sources into one line.
///
/// reqwest keeps the useful part (e.g. "Connection refused") a few sources
/// down, so `to_string()` alone reads as "error sending request".
fn describe(err: &dyn StdError) -> String {
	let mut message = err.to_string();
	let mut source = err.source();
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}

impl From<reqwest::Error> for VolleyError {
	fn from(err: reqwest::Error) -> Self {
		// connect timeouts report as both, timeout wins
		let kind = if err.is_timeout() {
			VolleyErrorKind::Timeout
		} else if err.is_connect() {
			VolleyErrorKind::Connect
		} else if err.is_builder() {
			VolleyErrorKind::InvalidUrl
		} else if err.is_redirect() {
			VolleyErrorKind::Redirect
		} else if err.is_body() || err.is_decode() {
			VolleyErrorKind::Body
		} else if err.is_request() {
			VolleyErrorKind::Network
		} else {
			VolleyErrorKind::Generic
		};

		VolleyError::new(kind, Some(describe(&err)))
	}
}

/// Names of every error kind, as they prefix failure reasons.
pub fn error_codes() -> Vec<&'static str> {
	VolleyErrorKind::iter().map(<&'static str>::from).collect()
}

impl From<serde_json::Error> for VolleyError {
	fn from(err: serde_json::Error) -> Self {
		VolleyError::new(VolleyErrorKind::Serialize, Some(err.to_string()))
	}
}
