//! Delayed actions driven by the fixed step
//!
//! Staggered bursts are queued as `{delay, payload}` pairs and released when
//! their delay runs out, so replays land on the same ticks every time.

#[derive(Debug, Clone)]
pub struct Countdown<T> {
    pending: Vec<(f32, T)>,
}

impl<T> Default for Countdown<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> Countdown<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release `payload` after `delay` milliseconds
    pub fn push(&mut self, delay: f32, payload: T) {
        self.pending.push((delay, payload));
    }

    /// Decrement every delay by `dt` and return the payloads that came due,
    /// in the order they were pushed
    pub fn tick(&mut self, dt: f32) -> Vec<T> {
        let mut due = Vec::new();
        let mut waiting = Vec::with_capacity(self.pending.len());
        for (delay, payload) in self.pending.drain(..) {
            let remaining = delay - dt;
            if remaining <= 0.0 {
                due.push(payload);
            } else {
                waiting.push((remaining, payload));
            }
        }
        self.pending = waiting;
        due
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
