use web_time::{Duration, Instant};

/// One-shot timer polled from the frame loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    pub fn arm(&mut self, now: Instant, after: Duration) {
        self.deadline = Some(now + after);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fires at most once: returns true the first time `now` reaches the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
