use std::sync::atomic::Ordering;

use reqwest::Url;

use crate::{
	agent::Agent,
	error::{VolleyError, VolleyErrorKind},
	outcome::Outcome,
};

/// Issues one GET against `url` and reports what happened.
///
/// Never fails: transport problems become [`Outcome::Failure`] with the
/// error description as the reason.
pub async fn fetch_once(agent: &Agent, url: &str) -> Outcome {
	match get(agent, url).await {
		Ok(status) => Outcome::Success(status),
		Err(err) => Outcome::Failure(err.to_string()),
	}
}

async fn get(agent: &Agent, url: &str) -> Result<u16, VolleyError> {
	let parsed_url = Url::parse(url)
		.map_err(|err| VolleyError::new(VolleyErrorKind::InvalidUrl, Some(format!("{url}: {err}"))))?;

	if !matches!(parsed_url.scheme(), "http" | "https") {
		return Err(VolleyError::new(
			VolleyErrorKind::InvalidUrl,
			Some(format!("{url}: unsupported scheme")),
		));
	}
	let request = agent.client.get(parsed_url).build()?;

	// only counted once something is about to go on the wire
	let _in_flight = agent.stats.begin();
	let mut response = agent.client.execute(request).await?;

	agent
		.stats
		.responses_received
		.fetch_add(1, Ordering::Relaxed);

	let status = response.status().as_u16();

	// read the body out so the connection goes back to the pool
	while let Some(chunk) = response.chunk().await? {
		agent
			.stats
			.bytes_received
			.fetch_add(chunk.len() as u64, Ordering::Relaxed);
	}

	Ok(status)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_malformed_url_is_a_failure() {
		let agent = Agent::new().unwrap();
		let outcome = fetch_once(&agent, "not a url").await;

		let Outcome::Failure(reason) = outcome else {
			panic!("expected a failure, got {outcome:?}");
		};
		assert!(reason.starts_with("InvalidUrl: not a url"), "{reason}");
		assert_eq!(agent.stats().requests_sent, 0);
	}

	#[tokio::test]
	async fn test_unsupported_scheme_is_a_failure() {
		let agent = Agent::new().unwrap();
		let outcome = fetch_once(&agent, "ftp://127.0.0.1/").await;

		let Outcome::Failure(reason) = outcome else {
			panic!("expected a failure, got {outcome:?}");
		};
		assert!(reason.starts_with("InvalidUrl: ftp://"), "{reason}");

		let stats = agent.stats();
		assert_eq!(stats.requests_sent, 0);
		assert_eq!(stats.peak_in_flight, 0);
	}
}
