mod agent;
mod dispatch;
mod error;
mod fetch;
pub mod options;
mod outcome;
mod summary;

pub use agent::*;
pub use dispatch::Dispatcher;
pub use error::{VolleyError, VolleyErrorKind, error_codes};
pub use fetch::fetch_once;
pub use options::RunOptions;
pub use outcome::Outcome;
pub use summary::{RunSummary, Tally, requests_per_second};
