//! Animation lifecycle as an explicit state machine.
//!
//! The machine never touches the browser directly. Frames are requested and
//! cancelled through a [`FrameScheduler`], so tests can drive it with a fake
//! scheduler and clock.

use log::debug;
use thiserror::Error;

/// Identifier of a pending frame request.
pub type FrameHandle = i32;

/// The platform's per-frame callback primitive.
pub trait FrameScheduler {
	/// Schedule the next frame callback.
	fn request(&mut self) -> Option<FrameHandle>;
	/// Cancel a previously requested frame.
	fn cancel(&mut self, handle: FrameHandle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
	Idle,
	Running,
	Paused,
	Destroyed,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
	#[error("lifecycle already destroyed")]
	Destroyed,
}

pub struct Lifecycle<S: FrameScheduler> {
	state: LifecycleState,
	scheduler: S,
	pending: Option<FrameHandle>,
	hidden: bool,
	/// Whether the loop should run again once the document is visible.
	resume: bool,
}

impl<S: FrameScheduler> Lifecycle<S> {
	pub fn new(scheduler: S) -> Self {
		Self {
			state: LifecycleState::Idle,
			scheduler,
			pending: None,
			hidden: false,
			resume: false,
		}
	}

	pub fn state(&self) -> LifecycleState {
		self.state
	}

	pub fn is_running(&self) -> bool {
		self.state == LifecycleState::Running
	}

	pub fn is_destroyed(&self) -> bool {
		self.state == LifecycleState::Destroyed
	}

	pub fn has_pending_frame(&self) -> bool {
		self.pending.is_some()
	}

	pub fn scheduler(&self) -> &S {
		&self.scheduler
	}

	fn guard(&self) -> Result<(), LifecycleError> {
		if self.is_destroyed() {
			return Err(LifecycleError::Destroyed);
		}
		Ok(())
	}

	fn schedule(&mut self) {
		if self.pending.is_none() {
			self.pending = self.scheduler.request();
		}
	}

	fn cancel_pending(&mut self) {
		if let Some(handle) = self.pending.take() {
			self.scheduler.cancel(handle);
		}
	}

	/// Idle → Running. While hidden, only records the intent to run.
	pub fn start(&mut self) -> Result<(), LifecycleError> {
		self.guard()?;
		if self.hidden {
			self.resume = true;
			if self.state == LifecycleState::Idle {
				self.state = LifecycleState::Paused;
			}
			return Ok(());
		}
		if self.state != LifecycleState::Running {
			debug!("animation {:?} -> Running", self.state);
			self.state = LifecycleState::Running;
		}
		self.schedule();
		Ok(())
	}

	/// Running/Paused → Idle.
	pub fn stop(&mut self) -> Result<(), LifecycleError> {
		self.guard()?;
		self.cancel_pending();
		self.resume = false;
		self.state = LifecycleState::Idle;
		Ok(())
	}

	/// Document visibility changed.
	pub fn set_hidden(&mut self, hidden: bool) -> Result<(), LifecycleError> {
		self.guard()?;
		self.hidden = hidden;
		match (hidden, self.state) {
			(true, LifecycleState::Running) => {
				self.cancel_pending();
				self.resume = true;
				self.state = LifecycleState::Paused;
				debug!("animation paused: document hidden");
			}
			(false, LifecycleState::Paused) if self.resume => {
				self.resume = false;
				self.state = LifecycleState::Running;
				self.schedule();
				debug!("animation resumed: document visible");
			}
			_ => {}
		}
		Ok(())
	}

	/// A frame callback fired. Returns whether to draw; when running, the
	/// next frame is already scheduled.
	pub fn on_frame(&mut self) -> bool {
		if self.pending.take().is_none() || self.is_destroyed() {
			return false;
		}
		if self.is_running() {
			self.schedule();
		}
		true
	}

	/// Ask for a single frame outside the running loop, e.g. to redraw a
	/// static graph after a pointer move.
	pub fn request_redraw(&mut self) -> Result<(), LifecycleError> {
		self.guard()?;
		if !self.hidden {
			self.schedule();
		}
		Ok(())
	}

	/// Any state → Destroyed. Returns `true` only for the call that tore down.
	pub fn destroy(&mut self) -> bool {
		if self.is_destroyed() {
			return false;
		}
		self.cancel_pending();
		self.resume = false;
		self.state = LifecycleState::Destroyed;
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Scheduler that records requests and cancellations.
	#[derive(Default)]
	pub struct FakeScheduler {
		pub next: FrameHandle,
		pub requested: Vec<FrameHandle>,
		pub cancelled: Vec<FrameHandle>,
	}

	impl FakeScheduler {
		pub fn outstanding(&self) -> usize {
			self.requested.len() - self.cancelled.len()
		}
	}

	impl FrameScheduler for FakeScheduler {
		fn request(&mut self) -> Option<FrameHandle> {
			self.next += 1;
			self.requested.push(self.next);
			Some(self.next)
		}

		fn cancel(&mut self, handle: FrameHandle) {
			self.cancelled.push(handle);
		}
	}

	fn lifecycle() -> Lifecycle<FakeScheduler> {
		Lifecycle::new(FakeScheduler::default())
	}

	#[test]
	fn starts_idle_and_runs_on_start() {
		let mut lc = lifecycle();
		assert_eq!(lc.state(), LifecycleState::Idle);
		lc.start().unwrap();
		assert_eq!(lc.state(), LifecycleState::Running);
		assert_eq!(lc.scheduler().requested, vec![1]);
	}

	#[test]
	fn start_is_idempotent() {
		let mut lc = lifecycle();
		lc.start().unwrap();
		lc.start().unwrap();
		assert_eq!(lc.scheduler().requested.len(), 1);
	}

	#[test]
	fn frames_reschedule_only_while_running() {
		let mut lc = lifecycle();
		lc.start().unwrap();
		for _ in 0..3 {
			assert!(lc.on_frame());
		}
		assert_eq!(lc.scheduler().requested.len(), 4);

		lc.stop().unwrap();
		assert_eq!(lc.state(), LifecycleState::Idle);
		assert!(!lc.on_frame());
		assert!(!lc.has_pending_frame());
	}

	#[test]
	fn hiding_cancels_the_in_flight_frame() {
		let mut lc = lifecycle();
		lc.start().unwrap();
		lc.set_hidden(true).unwrap();
		assert_eq!(lc.state(), LifecycleState::Paused);
		assert_eq!(lc.scheduler().cancelled, vec![1]);
		assert_eq!(lc.scheduler().outstanding(), 0);

		lc.set_hidden(true).unwrap();
		assert_eq!(lc.scheduler().cancelled.len(), 1);
	}

	#[test]
	fn visibility_restores_only_a_previously_running_loop() {
		let mut lc = lifecycle();
		lc.start().unwrap();
		lc.set_hidden(true).unwrap();
		lc.set_hidden(false).unwrap();
		assert_eq!(lc.state(), LifecycleState::Running);
		assert!(lc.has_pending_frame());

		let mut idle = lifecycle();
		idle.set_hidden(true).unwrap();
		idle.set_hidden(false).unwrap();
		assert_eq!(idle.state(), LifecycleState::Idle);
		assert!(idle.scheduler().requested.is_empty());
	}

	#[test]
	fn start_while_hidden_waits_for_visibility() {
		let mut lc = lifecycle();
		lc.set_hidden(true).unwrap();
		lc.start().unwrap();
		assert_eq!(lc.state(), LifecycleState::Paused);
		assert!(lc.scheduler().requested.is_empty());
		lc.set_hidden(false).unwrap();
		assert_eq!(lc.state(), LifecycleState::Running);
	}

	#[test]
	fn redraw_requests_one_frame_when_idle() {
		let mut lc = lifecycle();
		lc.request_redraw().unwrap();
		lc.request_redraw().unwrap();
		assert_eq!(lc.scheduler().requested.len(), 1);
		assert!(lc.on_frame());
		assert!(!lc.has_pending_frame());
		assert!(!lc.on_frame());
	}

	#[test]
	fn destroy_is_terminal_and_idempotent() {
		let mut lc = lifecycle();
		lc.start().unwrap();
		assert!(lc.destroy());
		assert!(!lc.destroy());
		assert_eq!(lc.state(), LifecycleState::Destroyed);
		assert_eq!(lc.scheduler().outstanding(), 0);

		assert_eq!(lc.start(), Err(LifecycleError::Destroyed));
		assert_eq!(lc.set_hidden(false), Err(LifecycleError::Destroyed));
		assert_eq!(lc.request_redraw(), Err(LifecycleError::Destroyed));
		assert!(!lc.on_frame());
	}
}
