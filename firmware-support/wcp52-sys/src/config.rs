// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use wcp52_hal::time::Duration;

/// Board level synthesizer settings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SynthConfig {
    /// Crystal frequency on REF_CLK.
    pub reference_clock_hz: f64,
    /// Reference clock multiplier programmed into FR1. Valid ratios are 4 to 20.
    pub pll_ratio: u8,
    /// Selects the high range VCO, needed above 255 MHz system clock.
    pub vco_gain_high: bool,
    /// Wait after releasing power down before the master reset.
    pub power_down_settle: Duration,
    /// Master reset pulse width, and the hold time after it.
    pub reset_pulse: Duration,
    /// Settle time before raising IO_UPDATE and the pulse width itself.
    pub io_update_pulse: Duration,
    /// Reject out of range parameters instead of letting them wrap.
    pub validate_parameters: bool,
}

impl SynthConfig {
    /// System clock after the PLL.
    pub fn sysclk_hz(&self) -> f64 {
        self.reference_clock_hz * self.pll_ratio as f64
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            reference_clock_hz: 25e6,
            pll_ratio: 20,
            vco_gain_high: true,
            power_down_settle: Duration::from_millis(50),
            reset_pulse: Duration::from_micros(1),
            io_update_pulse: Duration::ZERO,
            validate_parameters: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_clock_is_500_mhz() {
        assert_eq!(SynthConfig::default().sysclk_hz(), 500e6);
    }
}
