// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0
/*! Time structures.

The synthesizer handshake is specified in wall clock units: reset pulses in
microseconds, power supply recovery in milliseconds. The board has no free
running timer we can trust, so waiting is delegated to a blocking
[`DelayNs`] provider and this module only carries the amounts.

 - [`Duration`] is used to represent relative time.
 - [`wait`] spins on a [`DelayNs`] for a [`Duration`].
*/

use core::fmt;
use embedded_hal::delay::DelayNs;
use ufmt::derive::uDebug;

/// A representation of a relative time, stored in microseconds.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Duration {
    micros: u64,
}

impl Duration {
    pub const ZERO: Duration = Duration { micros: 0 };

    /// Create a new `Duration` from a number of microseconds.
    pub const fn from_micros(micros: u64) -> Duration {
        Duration { micros }
    }

    /// Create a new `Duration` from a number of milliseconds.
    pub const fn from_millis(millis: u64) -> Duration {
        Duration {
            micros: millis * 1_000,
        }
    }

    /// Create a new `Duration` from a number of seconds.
    pub const fn from_secs(secs: u64) -> Duration {
        Duration {
            micros: secs * 1_000_000,
        }
    }

    /// The number of whole seconds represented by this Duration.
    pub const fn secs(&self) -> u64 {
        self.micros / 1_000_000
    }

    /// The number of whole milliseconds represented by this Duration.
    pub const fn millis(&self) -> u64 {
        self.micros / 1_000
    }

    /// The number of whole microseconds represented by this Duration.
    pub const fn micros(&self) -> u64 {
        self.micros
    }

    pub const fn is_zero(&self) -> bool {
        self.micros == 0
    }
}

/// Block for `duration` using `delay`.
///
/// A zero duration does not touch the delay provider at all. Durations that
/// do not fit the microsecond API of [`DelayNs`] are split into whole
/// milliseconds and a microsecond remainder.
pub fn wait<D: DelayNs>(delay: &mut D, duration: Duration) {
    if duration.is_zero() {
        return;
    }
    match u32::try_from(duration.micros()) {
        Ok(micros) => delay.delay_us(micros),
        Err(_) => {
            let mut millis = duration.millis();
            while millis > 0 {
                let chunk = millis.min(u32::MAX as u64);
                delay.delay_ms(chunk as u32);
                millis -= chunk;
            }
            let rest = (duration.micros() % 1_000) as u32;
            if rest > 0 {
                delay.delay_us(rest);
            }
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.secs();
        let millis = self.millis() % 1000;
        let micros = self.micros() % 1000;

        write!(f, "{secs}.{millis}.{micros}")
    }
}
