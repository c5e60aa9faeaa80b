// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0
//! Conversions between physical quantities and AD9958 register images.
//!
//! Encoders never clamp: fractional parts are truncated and out of range
//! values wrap into the register width. The `check_*` functions are the
//! opt-in range checks applied by the driver when validation is enabled.

use ufmt::derive::uDebug;
use ufmt::{uDisplay, uWrite};

/// Full scale of the 32-bit frequency tuning word.
pub const FTW_SCALE: f64 = 4_294_967_296.0;

/// Number of phase steps in one turn.
pub const POW_STEPS: f64 = 16_384.0;
pub const POW_MASK: u16 = 0x3FFF;

/// Amplitude scale factor of a full scale output.
pub const ACR_FULL_SCALE: f64 = 1023.0;
pub const ACR_SCALE_MASK: u16 = 0x03FF;
/// Amplitude multiplier enable. Without it the scale factor is ignored.
pub const ACR_MULTIPLIER_ENABLE: u16 = 1 << 12;

pub const FR1_VCO_GAIN_SHIFT: u8 = 7;
pub const FR1_PLL_RATIO_SHIFT: u8 = 2;

pub const CFR_DAC_FULL_SCALE_MASK: u8 = 0b11;
/// Power-on value of the DAC full scale current field.
pub const CFR_DAC_FULL_SCALE_DEFAULT: u8 = 0b11;

/// A physical parameter, used to report which one was out of range.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Parameter {
    Frequency,
    Phase,
    Amplitude,
    DacFullScale,
}

impl uDisplay for Parameter {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(match self {
            Parameter::Frequency => "frequency",
            Parameter::Phase => "phase",
            Parameter::Amplitude => "amplitude",
            Parameter::DacFullScale => "DAC full scale",
        })
    }
}

// Truncates toward zero and then wraps into 32 bits. NaN becomes zero.
fn truncate(value: f64) -> u32 {
    value as i64 as u32
}

/// Frequency tuning word for `freq_hz` at system clock `sysclk_hz`,
/// `FTW = 2^32 * f / sysclk`, most significant byte first.
pub fn encode_frequency_tuning_word(freq_hz: f64, sysclk_hz: f64) -> [u8; 4] {
    truncate(freq_hz * FTW_SCALE / sysclk_hz).to_be_bytes()
}

/// Phase offset word for `phase_deg`. Whole turns wrap away.
pub fn encode_phase_offset_word(phase_deg: f64) -> [u8; 2] {
    let pow = truncate(phase_deg * POW_STEPS / 360.0) as u16 & POW_MASK;
    pow.to_be_bytes()
}

/// Amplitude control image for a `fraction` of full scale. The ramp rate
/// byte is left at zero and the multiplier is always enabled.
pub fn encode_amplitude_control(fraction: f64) -> [u8; 3] {
    let scale = truncate(ACR_FULL_SCALE * fraction) as u16 & ACR_SCALE_MASK;
    let [high, low] = (scale | ACR_MULTIPLIER_ENABLE).to_be_bytes();
    [0, high, low]
}

/// Function register 1 image. The PLL ratio is shifted into bits 2..=7 of
/// byte 0 with the VCO gain OR'd over bit 7; ratio bits shifted past the
/// byte are lost.
pub fn encode_function_register_1(pll_ratio: u8, vco_gain_high: bool) -> [u8; 3] {
    let vco = (vco_gain_high as u8) << FR1_VCO_GAIN_SHIFT;
    let pll = pll_ratio << FR1_PLL_RATIO_SHIFT;
    [vco | pll, 0, 0]
}

/// Channel function image with only the DAC full scale current field set.
pub fn encode_channel_function(dac_full_scale: u8) -> [u8; 3] {
    [0, dac_full_scale & CFR_DAC_FULL_SCALE_MASK, 0]
}

pub fn decode_frequency_tuning_word(image: [u8; 4], sysclk_hz: f64) -> f64 {
    u32::from_be_bytes(image) as f64 * sysclk_hz / FTW_SCALE
}

pub fn decode_phase_offset_word(image: [u8; 2]) -> f64 {
    (u16::from_be_bytes(image) & POW_MASK) as f64 * 360.0 / POW_STEPS
}

pub fn decode_amplitude_control(image: [u8; 3]) -> f64 {
    (u16::from_be_bytes([image[1], image[2]]) & ACR_SCALE_MASK) as f64 / ACR_FULL_SCALE
}

/// Accepts finite frequencies from DC up to the Nyquist limit of `sysclk_hz`.
pub fn check_frequency(freq_hz: f64, sysclk_hz: f64) -> Result<f64, Parameter> {
    if freq_hz.is_finite() && (0.0..=sysclk_hz / 2.0).contains(&freq_hz) {
        Ok(freq_hz)
    } else {
        Err(Parameter::Frequency)
    }
}

/// Any finite phase is accepted, it wraps when encoded.
pub fn check_phase(phase_deg: f64) -> Result<f64, Parameter> {
    if phase_deg.is_finite() {
        Ok(phase_deg)
    } else {
        Err(Parameter::Phase)
    }
}

pub fn check_amplitude(fraction: f64) -> Result<f64, Parameter> {
    if fraction.is_finite() && (0.0..=1.0).contains(&fraction) {
        Ok(fraction)
    } else {
        Err(Parameter::Amplitude)
    }
}

pub fn check_dac_full_scale(level: u8) -> Result<u8, Parameter> {
    if level <= CFR_DAC_FULL_SCALE_MASK {
        Ok(level)
    } else {
        Err(Parameter::DacFullScale)
    }
}
