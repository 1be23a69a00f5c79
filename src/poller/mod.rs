mod controller;
mod target;

pub use controller::{PollController, PollPhase, ViewState, MIN_POLL_INTERVAL_MS};
pub use target::{HttpPollTarget, PollTarget};
