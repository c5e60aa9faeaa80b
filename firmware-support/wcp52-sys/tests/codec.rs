// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use proptest::prelude::*;
use test_strategy::proptest;

use wcp52_sys::synth::codec::*;

const SYSCLK: f64 = 500e6;

// Truncation loses less than one tuning step.
#[proptest]
fn frequency_round_trip(#[strategy(0.0..SYSCLK)] freq_hz: f64) {
    let lsb = SYSCLK / FTW_SCALE;
    let image = encode_frequency_tuning_word(freq_hz, SYSCLK);
    let decoded = decode_frequency_tuning_word(image, SYSCLK);

    prop_assert!((freq_hz - decoded).abs() < lsb);
}

// Phases on the 14-bit grid encode to their step, whole turns added or not.
#[proptest]
fn phase_wraps_per_turn(#[strategy(0u16..16384)] step: u16, #[strategy(-3i32..4)] turns: i32) {
    let phase = step as f64 * 360.0 / POW_STEPS + 360.0 * turns as f64;

    prop_assert_eq!(encode_phase_offset_word(phase), step.to_be_bytes());
    prop_assert_eq!(
        decode_phase_offset_word(encode_phase_offset_word(phase)),
        step as f64 * 360.0 / POW_STEPS
    );
}

#[proptest]
fn phase_high_byte_is_six_bits(phase_deg: f64) {
    prop_assert_eq!(encode_phase_offset_word(phase_deg)[0] & 0xC0, 0);
}

#[proptest]
fn amplitude_image_layout(#[strategy(0.0..=1.0)] fraction: f64) {
    let image = encode_amplitude_control(fraction);
    let value = u16::from_be_bytes([image[1], image[2]]);

    prop_assert_eq!(image[0], 0);
    prop_assert_eq!(value & ACR_MULTIPLIER_ENABLE, ACR_MULTIPLIER_ENABLE);
    prop_assert_eq!(value & !(ACR_MULTIPLIER_ENABLE | ACR_SCALE_MASK), 0);
    prop_assert_eq!((value & ACR_SCALE_MASK) as f64, (fraction * ACR_FULL_SCALE).trunc());
}

#[proptest]
fn function_register_1_fields(pll_ratio: u8, vco_gain_high: bool) {
    let [byte0, byte1, byte2] = encode_function_register_1(pll_ratio, vco_gain_high);

    let vco = (vco_gain_high as u8) << FR1_VCO_GAIN_SHIFT;
    // Every ratio bit that lands in the byte is kept.
    prop_assert_eq!(byte0, vco | pll_ratio.wrapping_shl(FR1_PLL_RATIO_SHIFT as u32));
    prop_assert_eq!(byte0 >> FR1_PLL_RATIO_SHIFT, (pll_ratio & 0x3F) | (vco >> FR1_PLL_RATIO_SHIFT));
    prop_assert_eq!(byte0 & 0b11, 0);
    prop_assert_eq!([byte1, byte2], [0, 0]);
}

#[proptest]
fn checks_agree_with_ranges(value: f64) {
    let in_nyquist = value.is_finite() && (0.0..=SYSCLK / 2.0).contains(&value);
    prop_assert_eq!(check_frequency(value, SYSCLK).is_ok(), in_nyquist);
    prop_assert_eq!(check_phase(value).is_ok(), value.is_finite());
    prop_assert_eq!(
        check_amplitude(value).is_ok(),
        (0.0..=1.0).contains(&value)
    );
}

#[test]
fn reference_points() {
    assert_eq!(encode_phase_offset_word(0.0), encode_phase_offset_word(360.0));
    assert_eq!(
        u16::from_be_bytes(encode_phase_offset_word(180.0)),
        (POW_MASK + 1) / 2
    );
    assert_eq!(encode_amplitude_control(0.0), [0x00, 0x10, 0x00]);
    assert_eq!(encode_amplitude_control(1.0), [0x00, 0x13, 0xFF]);
    assert_eq!(
        encode_frequency_tuning_word(125e6, SYSCLK),
        [0x40, 0x00, 0x00, 0x00]
    );
}
