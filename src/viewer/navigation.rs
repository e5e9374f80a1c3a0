//! Step cursor and the keys that move it.

use std::fmt;

/// Index of the trace step currently on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor(pub u64);

impl Cursor {
	/// Next step.
	pub fn next(self) -> Self {
		Cursor(self.0.saturating_add(1))
	}

	/// Previous step, floored at 0.
	pub fn prev(self) -> Self {
		Cursor(self.0.saturating_sub(1))
	}
}

impl fmt::Display for Cursor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A navigation request decoded from a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
	/// `ArrowLeft`
	Back,
	/// `ArrowRight`
	Forward,
}

impl NavAction {
	/// Map a `KeyboardEvent.key` value to an action. Keys other than the two
	/// horizontal arrows map to nothing.
	pub fn from_key(key: &str) -> Option<Self> {
		match key {
			"ArrowLeft" => Some(NavAction::Back),
			"ArrowRight" => Some(NavAction::Forward),
			_ => None,
		}
	}
}

/// Everything the viewer remembers between renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewerState {
	/// Step on screen.
	pub cursor: Cursor,
}

impl ViewerState {
	/// State positioned at `step`.
	pub fn at(step: u64) -> Self {
		Self {
			cursor: Cursor(step),
		}
	}

	/// State after `action`; going back from step 0 stays at 0.
	pub fn reduce(self, action: NavAction) -> Self {
		let cursor = match action {
			NavAction::Back => self.cursor.prev(),
			NavAction::Forward => self.cursor.next(),
		};
		Self { cursor }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn arrow_keys_map_to_actions() {
		assert_eq!(NavAction::from_key("ArrowLeft"), Some(NavAction::Back));
		assert_eq!(NavAction::from_key("ArrowRight"), Some(NavAction::Forward));
		for key in ["a", "ArrowUp", "ArrowDown", "Enter", " ", "", "arrowleft"] {
			assert_eq!(NavAction::from_key(key), None, "{key:?}");
		}
	}

	#[test]
	fn forward_increments_by_one() {
		let mut state = ViewerState::default();
		for expected in 1..=25 {
			state = state.reduce(NavAction::Forward);
			assert_eq!(state.cursor, Cursor(expected));
		}
	}

	#[test]
	fn back_is_clamped_at_zero() {
		let mut state = ViewerState::at(2);
		let seen: Vec<u64> = (0..3)
			.map(|_| {
				state = state.reduce(NavAction::Back);
				state.cursor.0
			})
			.collect();
		assert_eq!(seen, vec![1, 0, 0]);
		assert_eq!(ViewerState::default().reduce(NavAction::Back).cursor, Cursor(0));
	}

	#[test]
	fn forward_saturates() {
		let state = ViewerState::at(u64::MAX).reduce(NavAction::Forward);
		assert_eq!(state.cursor, Cursor(u64::MAX));
	}
}
