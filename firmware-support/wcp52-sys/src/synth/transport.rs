// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0
//! Serial port framing for register writes.
//!
//! Every write follows the same handshake:
//!
//! 1. chip select low
//! 2. SYNCIO pulse, so a previously aborted cycle cannot shift our bytes
//! 3. for channel registers, a CSR write selecting the channel
//! 4. register address, then the image most significant byte first
//! 5. wait until the SPI shifter is empty
//! 6. chip select high
//! 7. IO_UPDATE pulse to latch the buffered value
//!
//! The levels last driven on each line are kept, the hardware is never read
//! back.

use embedded_hal::delay::DelayNs;
use wcp52_hal::gpio::{ControlLines, Line};
use wcp52_hal::spi::SpiMaster;
use wcp52_hal::time::{self, Duration};

use super::registers::{Channel, Register, CSR_ADDRESS};

pub struct Transport<B, L, D> {
    bus: B,
    lines: L,
    delay: D,
    levels: [bool; 5],
    io_update_pulse: Duration,
}

impl<B, L, D> Transport<B, L, D>
where
    B: SpiMaster,
    L: ControlLines,
    D: DelayNs,
{
    /// The line levels start out at the board's reset configuration.
    pub fn new(bus: B, lines: L, delay: D, io_update_pulse: Duration) -> Self {
        let mut levels = [false; 5];
        for line in Line::ALL {
            levels[line.index()] = line.info().reset_high;
        }
        Self {
            bus,
            lines,
            delay,
            levels,
            io_update_pulse,
        }
    }

    pub fn set_line(&mut self, line: Line, high: bool) -> Result<(), L::Error> {
        self.lines.set_line(line, high)?;
        self.levels[line.index()] = high;
        Ok(())
    }

    /// Last level driven on `line`.
    pub fn level(&self, line: Line) -> bool {
        self.levels[line.index()]
    }

    /// Drive `line` high and then low again.
    pub fn pulse(&mut self, line: Line) -> Result<(), L::Error> {
        self.set_line(line, true)?;
        self.set_line(line, false)
    }

    pub fn sync_io(&mut self) -> Result<(), L::Error> {
        self.pulse(Line::SyncIo)
    }

    pub fn io_update(&mut self) -> Result<(), L::Error> {
        self.wait(self.io_update_pulse);
        self.set_line(Line::IoUpdate, true)?;
        self.wait(self.io_update_pulse);
        self.set_line(Line::IoUpdate, false)
    }

    /// Queue `bytes` on the bus without any framing.
    pub fn transmit(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.bus.transmit_byte(byte);
        }
    }

    pub fn wait(&mut self, duration: Duration) {
        time::wait(&mut self.delay, duration);
    }

    /// Run `body` with chip select low and close the cycle with
    /// [`finish`](Transport::finish). If `body` fails, chip select is raised
    /// again on a best effort basis and the first error is returned.
    pub fn frame<F>(&mut self, body: F) -> Result<(), L::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), L::Error>,
    {
        self.set_line(Line::ChipSelect, false)?;
        if let Err(error) = body(self) {
            let _ = self.set_line(Line::ChipSelect, true);
            return Err(error);
        }
        self.finish()
    }

    /// Close a write cycle: wait for the shifter, raise chip select and
    /// latch with IO_UPDATE.
    pub fn finish(&mut self) -> Result<(), L::Error> {
        self.bus.wait_idle();
        self.set_line(Line::ChipSelect, true)?;
        self.io_update()
    }

    pub fn write_control<const N: usize>(
        &mut self,
        register: Register<N>,
        image: &[u8; N],
    ) -> Result<(), L::Error> {
        self.frame(|t| {
            t.sync_io()?;
            t.transmit(&[register.address]);
            t.transmit(image);
            Ok(())
        })
    }

    pub fn write_channel<const N: usize>(
        &mut self,
        channel: Channel,
        register: Register<N>,
        image: &[u8; N],
    ) -> Result<(), L::Error> {
        self.frame(|t| {
            t.sync_io()?;
            t.transmit(&[CSR_ADDRESS, channel.select_byte()]);
            t.transmit(&[register.address]);
            t.transmit(image);
            Ok(())
        })
    }
}
