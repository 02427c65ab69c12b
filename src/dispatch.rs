use std::{
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
	time::Instant,
};

use futures::future::join_all;
use tokio::{spawn, sync::mpsc};
use tracing::{debug, info, warn};

use crate::{
	agent::{Agent, AgentOptions},
	error::{VolleyError, VolleyErrorKind},
	fetch::fetch_once,
	options::RunOptions,
	summary::{RunSummary, Tally},
};

/// Runs `total_requests` GETs with at most `concurrency` of them in flight.
///
/// Workers claim units off a shared counter and send each [`Outcome`] to a
/// single aggregator over a channel, so the tally itself is never shared.
///
/// [`Outcome`]: crate::Outcome
#[derive(Debug, Clone)]
pub struct Dispatcher {
	agent: Agent,
	options: Arc<RunOptions>,
}

impl Dispatcher {
	pub fn new(options: RunOptions) -> Result<Self, VolleyError> {
		let agent = Agent::with_options(AgentOptions::from(&options))?;
		Ok(Self::with_agent(agent, options))
	}

	pub fn with_agent(agent: Agent, options: RunOptions) -> Self {
		Self {
			agent,
			options: Arc::new(options),
		}
	}

	pub fn agent(&self) -> &Agent {
		&self.agent
	}

	pub fn options(&self) -> &RunOptions {
		&self.options
	}

	pub async fn run(&self) -> RunSummary {
		let total = self.options.total_requests();
		let workers = self.options.worker_count();
		info!(
			url = self.options.target_url(),
			total,
			workers,
			"starting run"
		);

		let claimed = Arc::new(AtomicU64::new(0));
		let (outcomes, mut collect) = mpsc::channel(workers.max(1));

		let started = Instant::now();
		let handles: Vec<_> = (0..workers)
			.map(|worker| {
				let agent = self.agent.clone();
				let options = Arc::clone(&self.options);
				let claimed = Arc::clone(&claimed);
				let outcomes = outcomes.clone();
				spawn(async move {
					while claimed.fetch_add(1, Ordering::Relaxed) < total {
						let outcome = fetch_once(&agent, options.target_url()).await;
						debug!(worker, ?outcome, "request done");
						if outcomes.send(outcome).await.is_err() {
							break;
						}
					}
				})
			})
			.collect();

		// the channel closes once every worker is gone
		drop(outcomes);

		let mut tally = Tally::default();
		while let Some(outcome) = collect.recv().await {
			tally.record(&outcome);
		}
		let elapsed = started.elapsed();

		for result in join_all(handles).await {
			if let Err(err) = result {
				warn!(%err, "worker stopped unexpectedly");
			}
		}

		// only reachable when a worker panicked (the JoinError above): its
		// claimed unit never reached the channel
		let lost = total.saturating_sub(tally.collected());
		if lost > 0 {
			warn!(
				lost,
				error = %VolleyError::from(VolleyErrorKind::WorkerLost),
				"counting unreported requests as errors"
			);
			tally.record_lost(lost);
		}

		let summary = tally.finish(total, elapsed);
		info!(
			success = summary.success_count,
			errors = summary.error_count,
			elapsed = summary.elapsed_seconds,
			"run complete"
		);
		summary
	}
}
