//! Step-through viewer for uop graphs.
//!
//! [`Viewer`] owns the cursor and the fetch sequencer. It never touches the
//! network itself: key presses and the initial load produce a
//! [`FetchRequest`], the page runs it with [`client::fetch_graph`], and asks
//! [`Viewer::is_current`] before applying whatever came back.

pub mod client;
pub mod navigation;
pub mod response;
pub mod sequence;

use log::info;

pub use client::{ClientError, fetch_graph, step_url};
pub use navigation::{Cursor, NavAction, ViewerState};
pub use response::{GraphResponse, UOpNode};
pub use sequence::{RequestSequencer, Ticket};

/// Where to fetch from and which step to open first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewerConfig {
	/// Prefix for step URLs. Empty means the page's own origin.
	pub endpoint_base: String,
	/// Step shown on first load.
	pub initial_step: u64,
}

impl ViewerConfig {
	/// Read the `step` query parameter, falling back to step 0 when it is
	/// missing or not a non-negative integer.
	pub fn with_step_param(mut self, step: Option<&str>) -> Self {
		self.initial_step = step.and_then(|s| s.trim().parse().ok()).unwrap_or(0);
		self
	}
}

/// A fetch the page should run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
	/// Compare against [`Viewer::is_current`] once the fetch resolves.
	pub ticket: Ticket,
	/// Step being fetched.
	pub cursor: Cursor,
	/// Full request URL.
	pub url: String,
}

/// Cursor plus request bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct Viewer {
	config: ViewerConfig,
	state: ViewerState,
	sequencer: RequestSequencer,
}

impl Viewer {
	/// Viewer positioned at `config.initial_step`.
	pub fn new(config: ViewerConfig) -> Self {
		Self {
			state: ViewerState::at(config.initial_step),
			config,
			sequencer: RequestSequencer::default(),
		}
	}

	/// Current step.
	pub fn cursor(&self) -> Cursor {
		self.state.cursor
	}

	/// Fetch the current step again. Used for the initial render.
	pub fn load(&mut self) -> FetchRequest {
		let ticket = self.sequencer.issue();
		let cursor = self.state.cursor;
		let url = step_url(&self.config.endpoint_base, cursor);
		info!("fetching step {cursor} from {url} (#{})", ticket.generation());
		FetchRequest {
			ticket,
			cursor,
			url,
		}
	}

	/// Apply a key press. Unrecognised keys leave the cursor alone and
	/// request nothing.
	pub fn handle_key(&mut self, key: &str) -> Option<FetchRequest> {
		let action = NavAction::from_key(key)?;
		self.state = self.state.reduce(action);
		Some(self.load())
	}

	/// Whether a finished fetch is still the newest one issued.
	pub fn is_current(&self, ticket: Ticket) -> bool {
		self.sequencer.is_current(ticket)
	}
}

/// What the overlay shows about the last render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
	/// A fetch for this step is in flight.
	Loading(Cursor),
	/// The step is on screen.
	Ready {
		/// Step shown.
		cursor: Cursor,
		/// Node count.
		nodes: usize,
		/// Edge count.
		edges: usize,
	},
	/// The fetch failed; the previous graph stays on screen.
	Failed {
		/// Step that failed.
		cursor: Cursor,
		/// Rendered [`ClientError`].
		message: String,
	},
}

impl LoadStatus {
	/// One-line summary for the overlay.
	pub fn describe(&self) -> String {
		match self {
			LoadStatus::Loading(cursor) => format!("step {cursor}: loading…"),
			LoadStatus::Ready {
				cursor,
				nodes,
				edges,
			} => format!("step {cursor}: {nodes} uops, {edges} edges"),
			LoadStatus::Failed { cursor, message } => format!("step {cursor}: {message}"),
		}
	}

	/// True for [`LoadStatus::Failed`].
	pub fn is_error(&self) -> bool {
		matches!(self, LoadStatus::Failed { .. })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn press(viewer: &mut Viewer, keys: &[&str]) -> Vec<FetchRequest> {
		keys.iter().filter_map(|k| viewer.handle_key(k)).collect()
	}

	#[test]
	fn initial_load_targets_initial_step() {
		let mut viewer = Viewer::new(ViewerConfig::default());
		let req = viewer.load();
		assert_eq!(req.cursor, Cursor(0));
		assert_eq!(req.url, "/0");
		assert!(viewer.is_current(req.ticket));
	}

	#[test]
	fn two_right_presses_fetch_in_order() {
		let mut viewer = Viewer::new(ViewerConfig::default());
		viewer.load();
		let reqs = press(&mut viewer, &["ArrowRight", "ArrowRight"]);

		assert_eq!(viewer.cursor(), Cursor(2));
		let urls: Vec<&str> = reqs.iter().map(|r| r.url.as_str()).collect();
		assert_eq!(urls, ["/1", "/2"]);
		assert!(reqs[0].ticket < reqs[1].ticket);
	}

	#[test]
	fn left_presses_clamp_and_still_fetch() {
		let mut viewer = Viewer::new(ViewerConfig {
			initial_step: 2,
			..Default::default()
		});
		let reqs = press(&mut viewer, &["ArrowLeft", "ArrowLeft", "ArrowLeft"]);

		let cursors: Vec<u64> = reqs.iter().map(|r| r.cursor.0).collect();
		assert_eq!(cursors, [1, 0, 0]);
		assert_eq!(viewer.cursor(), Cursor(0));
	}

	#[test]
	fn other_keys_do_nothing() {
		let mut viewer = Viewer::new(ViewerConfig::default());
		let first = viewer.load();
		assert!(press(&mut viewer, &["a", "ArrowUp", "Escape"]).is_empty());
		assert_eq!(viewer.cursor(), Cursor(0));
		assert!(viewer.is_current(first.ticket), "no new ticket was issued");
	}

	#[test]
	fn stale_responses_are_rejected() {
		let mut viewer = Viewer::new(ViewerConfig::default());
		let initial = viewer.load();
		let reqs = press(&mut viewer, &["ArrowRight", "ArrowRight"]);

		// Resolution order 2, 1, 0 must only ever apply /2.
		assert!(viewer.is_current(reqs[1].ticket));
		assert!(!viewer.is_current(reqs[0].ticket));
		assert!(!viewer.is_current(initial.ticket));
	}

	#[test]
	fn endpoint_base_prefixes_urls() {
		let mut viewer = Viewer::new(ViewerConfig {
			endpoint_base: "http://127.0.0.1:8000".into(),
			initial_step: 4,
		});
		assert_eq!(viewer.load().url, "http://127.0.0.1:8000/4");
		assert_eq!(viewer.handle_key("ArrowRight").unwrap().url, "http://127.0.0.1:8000/5");
	}

	#[test]
	fn step_param_parsing() {
		let parse = |s| ViewerConfig::default().with_step_param(s).initial_step;
		assert_eq!(parse(Some("7")), 7);
		assert_eq!(parse(Some(" 12 ")), 12);
		assert_eq!(parse(Some("-3")), 0);
		assert_eq!(parse(Some("abc")), 0);
		assert_eq!(parse(None), 0);
	}

	#[test]
	fn status_lines() {
		assert_eq!(LoadStatus::Loading(Cursor(3)).describe(), "step 3: loading…");
		let ready = LoadStatus::Ready {
			cursor: Cursor(1),
			nodes: 2,
			edges: 1,
		};
		assert_eq!(ready.describe(), "step 1: 2 uops, 1 edges");
		assert!(!ready.is_error());

		let failed = LoadStatus::Failed {
			cursor: Cursor(9),
			message: ClientError::Status {
				status: 500,
				url: "/9".into(),
			}
			.to_string(),
		};
		assert!(failed.is_error());
		assert_eq!(failed.describe(), "step 9: /9 answered with HTTP 500");
	}
}
