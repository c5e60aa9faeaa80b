// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0
//! Driver for the AD9958 two channel DDS.
//!
//! [`Synth`] owns the SPI bus, the control lines and a delay provider. All
//! operations take `&mut self`, so at most one register write is ever in
//! flight.

pub mod codec;
pub mod registers;
pub mod transport;

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};
use ufmt::derive::uDebug;
use ufmt::{uDisplay, uWrite, uwrite};
use wcp52_hal::gpio::{ControlLines, Line};
use wcp52_hal::spi::SpiMaster;

use crate::config::SynthConfig;
use codec::Parameter;
use registers::{Channel, Register, CACR, CFR, CFTW, CPOW, CSR_ADDRESS, CSR_SERIAL_MODE, FR1};
use transport::Transport;

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SynthState {
    Uninitialized,
    /// Master reset done and serial mode selected.
    InterfaceReady,
    /// PLL programmed.
    ClockReady,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SynthError<E> {
    /// Channel number other than 0 or 1. Nothing was sent.
    ChannelOutOfRange(u8),
    /// Only reported when parameter validation is enabled. Nothing was sent.
    ParameterOutOfRange(Parameter),
    /// Driving a control line failed.
    Line(E),
}

impl<E> uDisplay for SynthError<E> {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            SynthError::ChannelOutOfRange(channel) => {
                uwrite!(f, "channel {} out of range", channel)
            }
            SynthError::ParameterOutOfRange(parameter) => {
                uwrite!(f, "{} out of range", parameter)
            }
            SynthError::Line(_) => f.write_str("control line failure"),
        }
    }
}

pub struct Synth<B, L, D> {
    transport: Transport<B, L, D>,
    config: SynthConfig,
    state: SynthState,
}

impl<B, L, D> Synth<B, L, D>
where
    B: SpiMaster,
    L: ControlLines,
    D: DelayNs,
{
    /// Wrap the peripherals. Nothing is driven until
    /// [`initialize_interface`](Synth::initialize_interface).
    pub fn new(bus: B, lines: L, delay: D, config: SynthConfig) -> Self {
        Self {
            transport: Transport::new(bus, lines, delay, config.io_update_pulse),
            config,
            state: SynthState::Uninitialized,
        }
    }

    pub fn state(&self) -> SynthState {
        self.state
    }

    /// Bring up the serial interface: release power down, master reset, and
    /// select 3-wire serial mode. Safe to repeat; it also discards the PLL
    /// setting.
    pub fn initialize_interface(&mut self) -> Result<(), SynthError<L::Error>> {
        info!("Initializing synthesizer interface");
        self.interface_sequence().map_err(SynthError::Line)?;
        self.state = SynthState::InterfaceReady;
        Ok(())
    }

    fn interface_sequence(&mut self) -> Result<(), L::Error> {
        let settle = self.config.power_down_settle;
        let reset_pulse = self.config.reset_pulse;
        debug!("Power down settle {}", settle);

        let t = &mut self.transport;
        t.set_line(Line::PowerDown, false)?;
        t.frame(|t| {
            t.set_line(Line::IoUpdate, false)?;
            t.wait(settle);

            t.set_line(Line::MasterReset, true)?;
            t.wait(reset_pulse);
            t.set_line(Line::MasterReset, false)?;
            t.wait(reset_pulse);

            t.sync_io()?;
            t.transmit(&[CSR_ADDRESS, CSR_SERIAL_MODE]);
            Ok(())
        })
    }

    /// Program the PLL multiplier and VCO range from the configuration.
    pub fn initialize_clock(&mut self) -> Result<(), SynthError<L::Error>> {
        if self.state == SynthState::Uninitialized {
            warn!("Initializing synthesizer clock before its interface");
        }
        let image =
            codec::encode_function_register_1(self.config.pll_ratio, self.config.vco_gain_high);
        self.write_control(FR1, &image)?;
        self.state = SynthState::ClockReady;
        info!("Synthesizer system clock at {} Hz", self.config.sysclk_hz());
        Ok(())
    }

    pub fn set_frequency(
        &mut self,
        channel: u8,
        freq_hz: f64,
    ) -> Result<(), SynthError<L::Error>> {
        let channel = self.channel(channel)?;
        let sysclk_hz = self.config.sysclk_hz();
        if self.config.validate_parameters {
            self.check(codec::check_frequency(freq_hz, sysclk_hz))?;
        }
        let image = codec::encode_frequency_tuning_word(freq_hz, sysclk_hz);
        self.write_channel(channel, CFTW, &image)
    }

    pub fn set_phase(&mut self, channel: u8, phase_deg: f64) -> Result<(), SynthError<L::Error>> {
        let channel = self.channel(channel)?;
        if self.config.validate_parameters {
            self.check(codec::check_phase(phase_deg))?;
        }
        let image = codec::encode_phase_offset_word(phase_deg);
        self.write_channel(channel, CPOW, &image)
    }

    pub fn set_amplitude(
        &mut self,
        channel: u8,
        fraction: f64,
    ) -> Result<(), SynthError<L::Error>> {
        let channel = self.channel(channel)?;
        if self.config.validate_parameters {
            self.check(codec::check_amplitude(fraction))?;
        }
        let image = codec::encode_amplitude_control(fraction);
        self.write_channel(channel, CACR, &image)
    }

    /// Set the 2-bit DAC full scale current of `channel`. The rest of CFR is
    /// written as zero.
    pub fn set_dac_full_scale(
        &mut self,
        channel: u8,
        level: u8,
    ) -> Result<(), SynthError<L::Error>> {
        let channel = self.channel(channel)?;
        if self.config.validate_parameters {
            self.check(codec::check_dac_full_scale(level))?;
        }
        let image = codec::encode_channel_function(level);
        self.write_channel(channel, CFR, &image)
    }

    /// Put a single byte on the bus outside of any write cycle.
    pub fn transmit_byte(&mut self, byte: u8) {
        debug!("Raw SPI byte {:#04x}", byte);
        self.transport.transmit(&[byte]);
    }

    /// Drive a control line directly.
    pub fn set_line(&mut self, line: Line, high: bool) -> Result<(), SynthError<L::Error>> {
        debug!("{:?} <- {}", line, high as u8);
        self.transport.set_line(line, high).map_err(SynthError::Line)
    }

    /// Level last driven on `line`.
    pub fn line_level(&self, line: Line) -> bool {
        self.transport.level(line)
    }

    fn channel(&self, number: u8) -> Result<Channel, SynthError<L::Error>> {
        Channel::try_from(number).map_err(|number| {
            warn!("Rejected synthesizer channel {}", number);
            SynthError::ChannelOutOfRange(number)
        })
    }

    fn check<T>(&self, checked: Result<T, Parameter>) -> Result<T, SynthError<L::Error>> {
        checked.map_err(|parameter| {
            warn!("Rejected out of range {:?}", parameter);
            SynthError::ParameterOutOfRange(parameter)
        })
    }

    fn write_control<const N: usize>(
        &mut self,
        register: Register<N>,
        image: &[u8; N],
    ) -> Result<(), SynthError<L::Error>> {
        debug!("{} <- {:02x?}", register.name, image);
        self.transport
            .write_control(register, image)
            .map_err(SynthError::Line)
    }

    fn write_channel<const N: usize>(
        &mut self,
        channel: Channel,
        register: Register<N>,
        image: &[u8; N],
    ) -> Result<(), SynthError<L::Error>> {
        debug!("{}{} <- {:02x?}", register.name, channel.number(), image);
        self.transport
            .write_channel(channel, register, image)
            .map_err(SynthError::Line)
    }
}
