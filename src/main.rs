use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use volley::{
	Dispatcher, RunOptions, VolleyError,
	options::{DEFAULT_CONCURRENCY, DEFAULT_TARGET_URL, DEFAULT_TOTAL_REQUESTS},
};

/// Fire a fixed number of GET requests at a URL and report how they went.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
	/// Target URL
	#[arg(env = "VOLLEY_URL", default_value = DEFAULT_TARGET_URL)]
	url: String,

	/// Total number of requests to send
	#[arg(short = 'n', long = "requests", env = "VOLLEY_REQUESTS", default_value_t = DEFAULT_TOTAL_REQUESTS)]
	requests: u64,

	/// Maximum number of requests in flight at once
	#[arg(short, long, env = "VOLLEY_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
	concurrency: usize,

	/// Per-request timeout in seconds (no timeout if unset)
	#[arg(long, env = "VOLLEY_TIMEOUT")]
	timeout: Option<f64>,

	/// User-Agent sent with each request
	#[arg(long, env = "VOLLEY_USER_AGENT")]
	user_agent: Option<String>,

	/// Print the summary as JSON
	#[arg(long)]
	json: bool,
}

impl Cli {
	fn run_options(&self) -> Result<RunOptions, VolleyError> {
		let mut options = RunOptions::new(&self.url, self.requests, self.concurrency)?;
		if let Some(secs) = self.timeout {
			options = options.with_timeout_secs(secs)?;
		}
		if let Some(user_agent) = &self.user_agent {
			options = options.with_user_agent(user_agent);
		}
		Ok(options)
	}
}

#[tokio::main]
async fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		)
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();
	match run(&cli).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			error!(%err, "run aborted");
			eprintln!("volley: {err}");
			ExitCode::FAILURE
		}
	}
}

async fn run(cli: &Cli) -> Result<(), VolleyError> {
	let dispatcher = Dispatcher::new(cli.run_options()?)?;
	let summary = dispatcher.run().await;

	if cli.json {
		println!("{}", summary.to_json()?);
	} else {
		print!("{summary}");
	}

	Ok(())
}
