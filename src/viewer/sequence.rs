//! Generation counter for overlapping fetches.
//!
//! Every fetch takes a [`Ticket`]. When its response arrives the result is
//! only applied if no newer ticket has been handed out in the meantime, so a
//! slow response for an old step can never overwrite a newer one.

/// Generation number attached to one fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
	/// Raw generation number, for logging.
	pub fn generation(self) -> u64 {
		self.0
	}
}

/// Hands out increasing tickets and remembers the latest one.
#[derive(Clone, Debug, Default)]
pub struct RequestSequencer {
	latest: u64,
}

impl RequestSequencer {
	/// New ticket, superseding every earlier one.
	pub fn issue(&mut self) -> Ticket {
		self.latest += 1;
		Ticket(self.latest)
	}

	/// Whether `ticket` is the most recently issued.
	pub fn is_current(&self, ticket: Ticket) -> bool {
		ticket.0 == self.latest
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tickets_increase() {
		let mut seq = RequestSequencer::default();
		let a = seq.issue();
		let b = seq.issue();
		assert!(b > a);
		assert_eq!(b.generation(), a.generation() + 1);
	}

	#[test]
	fn only_latest_is_current() {
		let mut seq = RequestSequencer::default();
		let first = seq.issue();
		assert!(seq.is_current(first));

		let second = seq.issue();
		let third = seq.issue();
		assert!(!seq.is_current(first));
		assert!(!seq.is_current(second));
		assert!(seq.is_current(third));
	}
}
