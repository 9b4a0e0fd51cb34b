//! Time abstraction and the elapsed-time gauge.

/// Trait for abstracting the board's millisecond counter.
///
/// The counter is free-running and allowed to wrap at `u32::MAX`; every
/// consumer in this crate measures intervals with wrapping subtraction.
pub trait TimeSource {
    /// Returns the current monotonic millisecond count.
    fn millis(&self) -> u32;
}

/// Millisecond stopwatch measuring time since the last [`reset`](Self::reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElapsedTime {
    epoch: u32,
}

impl ElapsedTime {
    /// Creates a gauge whose epoch is the current time.
    pub fn new<T: TimeSource>(time: &T) -> Self {
        Self {
            epoch: time.millis(),
        }
    }

    /// Creates a gauge anchored at an explicit millisecond count.
    pub const fn starting_at(epoch: u32) -> Self {
        Self { epoch }
    }

    /// Captures the current time as the new epoch.
    pub fn reset<T: TimeSource>(&mut self, time: &T) {
        self.epoch = time.millis();
    }

    /// Milliseconds since the epoch, correct across counter overflow.
    pub fn elapsed_ms<T: TimeSource>(&self, time: &T) -> u32 {
        time.millis().wrapping_sub(self.epoch)
    }

    /// Returns true once at least `ms` milliseconds have passed.
    pub fn has_elapsed<T: TimeSource>(&self, time: &T, ms: u32) -> bool {
        self.elapsed_ms(time) >= ms
    }
}
