// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0
//! Line based command console on top of a [`Synth`].
//!
//! Bytes are collected until `\r` or `\n` and the completed line is parsed
//! with [`parse_command`] and executed. Replies and errors go to any
//! [`uWrite`], errors in the `**ERROR: <code>, "<message>"` form.

use embedded_hal::delay::DelayNs;
use heapless::String;
use log::warn;
use ufmt::{uWrite, uwrite};
use wcp52_hal::gpio::{ControlLines, PINS};
use wcp52_hal::spi::SpiMaster;
use wcp52_hal::uart::Uart;

use crate::command::{parse_command, Command, CommandError};
use crate::synth::{Synth, SynthError};

/// Longest accepted line, in bytes, excluding the terminator.
pub const LINE_CAPACITY: usize = 256;

pub const IDENTIFICATION: &str = concat!("WCP52,DDS synthesizer,0,", env!("CARGO_PKG_VERSION"));

pub struct Console<B, L, D> {
    synth: Synth<B, L, D>,
    line: String<LINE_CAPACITY>,
    overflow: bool,
}

impl<B, L, D> Console<B, L, D>
where
    B: SpiMaster,
    L: ControlLines,
    D: DelayNs,
{
    pub fn new(synth: Synth<B, L, D>) -> Self {
        Self {
            synth,
            line: String::new(),
            overflow: false,
        }
    }

    pub fn synth(&self) -> &Synth<B, L, D> {
        &self.synth
    }

    /// Feed one received byte. A line that does not fit is dropped and
    /// reported once its terminator arrives.
    pub fn receive<W>(&mut self, byte: u8, out: &mut W) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match byte {
            b'\r' | b'\n' => {
                let mut line = core::mem::take(&mut self.line);
                let result = if core::mem::replace(&mut self.overflow, false) {
                    report(out, CommandError::TooMuchData)
                } else {
                    self.execute(&line, out)
                };
                line.clear();
                self.line = line;
                result
            }
            _ if self.overflow => Ok(()),
            _ => {
                if self.line.push(byte as char).is_err() {
                    self.line.clear();
                    self.overflow = true;
                }
                Ok(())
            }
        }
    }

    /// Consume every byte the UART has buffered, replying on the same UART.
    pub fn poll(&mut self, uart: &mut Uart) -> Result<(), ()> {
        while let Ok(byte) = uart.try_receive() {
            self.receive(byte, uart)?;
        }
        Ok(())
    }

    /// Parse and run a single command line.
    pub fn execute<W>(&mut self, line: &str, out: &mut W) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match parse_command(line) {
            Ok(Some(command)) => self.run(command, out),
            Ok(None) => Ok(()),
            Err(error) => {
                warn!("Rejected console command: {:?}", error);
                report(out, error)
            }
        }
    }

    fn run<W>(&mut self, command: Command, out: &mut W) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let result = match command {
            Command::Identify => {
                uwrite!(out, "{}\r\n", IDENTIFICATION)?;
                Ok(())
            }
            Command::InitializeInterface => self.synth.initialize_interface(),
            Command::InitializeClock => self.synth.initialize_clock(),
            Command::SetFrequency { channel, freq_hz } => {
                uwrite!(
                    out,
                    "Setting frequency {} to {} Hz\r\n",
                    channel,
                    freq_hz as i64
                )?;
                self.synth.set_frequency(channel, freq_hz)
            }
            Command::SetPhase { channel, phase_deg } => self.synth.set_phase(channel, phase_deg),
            Command::SetAmplitude { channel, fraction } => {
                self.synth.set_amplitude(channel, fraction)
            }
            Command::TransmitByte(byte) => {
                out.write_str("Transmitting value ")?;
                hex_byte(out, byte)?;
                out.write_str("\r\n")?;
                self.synth.transmit_byte(byte);
                Ok(())
            }
            Command::DriveLine { line, high } => self.synth.set_line(line, high),
            Command::ReadLine(line) => {
                uwrite!(out, "{}\r\n", self.synth.line_level(line) as u8)?;
                Ok(())
            }
            Command::ListPins => {
                list_pins(out)?;
                Ok(())
            }
        };
        match result {
            Ok(()) => Ok(()),
            Err(error) => report(out, command_error(&error)),
        }
    }
}

fn command_error<E>(error: &SynthError<E>) -> CommandError {
    match error {
        SynthError::ChannelOutOfRange(_) | SynthError::ParameterOutOfRange(_) => {
            CommandError::IllegalParameterValue
        }
        SynthError::Line(_) => CommandError::HardwareError,
    }
}

fn report<W>(out: &mut W, error: CommandError) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    uwrite!(out, "**ERROR: {}\r\n", error)
}

fn list_pins<W>(out: &mut W) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    uwrite!(out, "==== AD9958 interface ====\r\n")?;
    for pin in PINS.iter() {
        padded(out, pin.name, 20)?;
        padded(out, pin.pin, 6)?;
        uwrite!(out, "{}\r\n", pin.description)?;
    }
    Ok(())
}

// Left aligned in a column of `width`, with at least one space after.
fn padded<W>(out: &mut W, text: &str, width: usize) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    out.write_str(text)?;
    for _ in text.len()..width.max(text.len() + 1) {
        out.write_char(' ')?;
    }
    Ok(())
}

// Two lowercase hex digits.
fn hex_byte<W>(out: &mut W, byte: u8) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    out.write_char(DIGITS[(byte >> 4) as usize] as char)?;
    out.write_char(DIGITS[(byte & 0xF) as usize] as char)
}
