// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0
//! Synthesizer control lines.
//!
//! The AD9958 serial port is framed by five GPIO lines next to the SPI data
//! pins. The driver talks to them through [`ControlLines`]; [`ControlPins`]
//! implements that on top of any five [`OutputPin`]s and [`PioPin`] is the
//! memory mapped SAM4S implementation of a single pin.

use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, OutputPin};
use ufmt::derive::uDebug;

/// One of the synthesizer control lines.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Line {
    /// Serial port chip select, active low.
    ChipSelect,
    /// SYNCIO, resets the serial port state machine.
    SyncIo,
    /// IO_UPDATE, latches shifted register data into the core.
    IoUpdate,
    /// PWR_DWN_CTL.
    PowerDown,
    /// MASTER_RESET.
    MasterReset,
}

impl Line {
    pub const ALL: [Line; 5] = [
        Line::SyncIo,
        Line::ChipSelect,
        Line::MasterReset,
        Line::IoUpdate,
        Line::PowerDown,
    ];

    pub const fn index(self) -> usize {
        match self {
            Line::ChipSelect => 0,
            Line::SyncIo => 1,
            Line::IoUpdate => 2,
            Line::PowerDown => 3,
            Line::MasterReset => 4,
        }
    }

    pub fn info(self) -> &'static PinInfo {
        // `PINS` is ordered like `Line::ALL`.
        let position = match self {
            Line::SyncIo => 0,
            Line::ChipSelect => 1,
            Line::MasterReset => 2,
            Line::IoUpdate => 3,
            Line::PowerDown => 4,
        };
        &PINS[position]
    }

    /// Look a line up by its board name, e.g. `GPIO_DDS_nCS`. Names are
    /// matched exactly.
    pub fn from_name(name: &str) -> Option<Line> {
        PINS.iter().find(|pin| pin.name == name).map(|pin| pin.line)
    }
}

/// Board wiring of a control line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PinInfo {
    pub line: Line,
    pub name: &'static str,
    /// Package pin, e.g. `PA5`.
    pub pin: &'static str,
    /// Bit within the owning PIO controller.
    pub bit: u8,
    /// Level the pin is configured to drive out of reset.
    pub reset_high: bool,
    pub description: &'static str,
}

pub const PINS: [PinInfo; 5] = [
    PinInfo {
        line: Line::SyncIo,
        name: "GPIO_DDS_SYNCIO",
        pin: "PA5",
        bit: 5,
        reset_high: false,
        description: "Resets IO interface",
    },
    PinInfo {
        line: Line::ChipSelect,
        name: "GPIO_DDS_nCS",
        pin: "PA6",
        bit: 6,
        reset_high: true,
        description: "SPI chip select (active low)",
    },
    PinInfo {
        line: Line::MasterReset,
        name: "GPIO_DDS_MRST",
        pin: "PA31",
        bit: 31,
        reset_high: true,
        description: "DDS master reset",
    },
    PinInfo {
        line: Line::IoUpdate,
        name: "GPIO_DDS_IOUPDATE",
        pin: "PB2",
        bit: 2,
        reset_high: false,
        description: "SPI register control",
    },
    PinInfo {
        line: Line::PowerDown,
        name: "GPIO_DDS_PWRDN",
        pin: "PC30",
        bit: 30,
        reset_high: true,
        description: "DDS powerdown",
    },
];

/// Level control over the synthesizer lines. `true` drives the pin high.
pub trait ControlLines {
    type Error;

    fn set_line(&mut self, line: Line, high: bool) -> Result<(), Self::Error>;
}

impl<T: ControlLines + ?Sized> ControlLines for &mut T {
    type Error = T::Error;

    fn set_line(&mut self, line: Line, high: bool) -> Result<(), Self::Error> {
        T::set_line(self, line, high)
    }
}

/// The five control lines as individual output pins sharing one error type.
pub struct ControlPins<Cs, Sio, Upd, Pd, Rst> {
    pub chip_select: Cs,
    pub sync_io: Sio,
    pub io_update: Upd,
    pub power_down: Pd,
    pub master_reset: Rst,
}

impl<Cs, Sio, Upd, Pd, Rst, E> ControlLines
    for ControlPins<Cs, Sio, Upd, Pd, Rst>
where
    Cs: OutputPin<Error = E>,
    Sio: OutputPin<Error = E>,
    Upd: OutputPin<Error = E>,
    Pd: OutputPin<Error = E>,
    Rst: OutputPin<Error = E>,
{
    type Error = E;

    fn set_line(&mut self, line: Line, high: bool) -> Result<(), E> {
        match line {
            Line::ChipSelect => drive(&mut self.chip_select, high),
            Line::SyncIo => drive(&mut self.sync_io, high),
            Line::IoUpdate => drive(&mut self.io_update, high),
            Line::PowerDown => drive(&mut self.power_down, high),
            Line::MasterReset => drive(&mut self.master_reset, high),
        }
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), P::Error> {
    if high {
        pin.set_high()
    } else {
        pin.set_low()
    }
}

/// A single output of a SAM4S PIO controller.
///
/// Register offsets, in 32-bit words from the controller base address:
/// - `0x30` `PIO_SODR`, set output data
/// - `0x34` `PIO_CODR`, clear output data
/// - `0x38` `PIO_ODSR`, output data status
pub struct PioPin {
    sodr_addr: *mut u32,
    codr_addr: *mut u32,
    odsr_addr: *const u32,
    mask: u32,
}

impl PioPin {
    const SODR_OFFSET: usize = 0x30 / 4;
    const CODR_OFFSET: usize = 0x34 / 4;
    const ODSR_OFFSET: usize = 0x38 / 4;

    /// Create a new [`PioPin`] for bit `bit` of the controller at `base_addr`.
    ///
    /// # Safety
    ///
    /// The `base_addr` pointer MUST BE a valid pointer that is backed
    /// by a memory mapped PIO controller, and the pin must already be
    /// configured as an output.
    pub const unsafe fn new(base_addr: *mut u32, bit: u8) -> PioPin {
        PioPin {
            sodr_addr: base_addr.add(Self::SODR_OFFSET),
            codr_addr: base_addr.add(Self::CODR_OFFSET),
            odsr_addr: base_addr.add(Self::ODSR_OFFSET).cast_const(),
            mask: 1 << bit,
        }
    }

    /// Level currently driven by the controller.
    pub fn is_driven_high(&self) -> bool {
        let status = unsafe { self.odsr_addr.read_volatile() };
        status & self.mask != 0
    }
}

impl ErrorType for PioPin {
    type Error = Infallible;
}

impl OutputPin for PioPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        unsafe { self.codr_addr.write_volatile(self.mask) };
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        unsafe { self.sodr_addr.write_volatile(self.mask) };
        Ok(())
    }
}
