// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic tick source.
//!
//! [`FixedClock`] stands in for a display callback when there is no display:
//! every [`advance`](FixedClock::advance) moves host time forward by a fixed
//! interval, so frame passes see exact, reproducible elapsed times.

use core::time::Duration;

use veneer_core::time::HostTime;

/// A clock that advances by a fixed interval per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock {
    now: HostTime,
    interval: Duration,
    frames: u64,
}

impl FixedClock {
    /// A 16 ms interval, the usual stand-in for 60 Hz.
    pub const SIXTY_HZ: Duration = Duration::from_millis(16);

    /// Creates a clock at [`HostTime::ZERO`].
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            now: HostTime::ZERO,
            interval,
            frames: 0,
        }
    }

    /// The current host time.
    #[must_use]
    pub const fn now(&self) -> HostTime {
        self.now
    }

    /// The fixed interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of intervals advanced so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Moves time forward by one interval and returns the new time.
    pub fn advance(&mut self) -> HostTime {
        self.now = self.now + self.interval;
        self.frames += 1;
        self.now
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(Self::SIXTY_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_by_the_interval() {
        let mut clock = FixedClock::default();
        assert_eq!(clock.now(), HostTime::ZERO);
        clock.advance();
        let t = clock.advance();
        assert_eq!(t, HostTime::from_millis(32));
        assert_eq!(clock.frames(), 2);
    }
}
