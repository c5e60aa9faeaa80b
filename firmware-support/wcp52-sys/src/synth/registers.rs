// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0
//! AD9958 register map, limited to the registers this driver writes.

use ufmt::derive::uDebug;

/// A register descriptor. The length of the register image is carried in the
/// type, so an image of the wrong size does not compile.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Register<const N: usize> {
    pub address: u8,
    pub name: &'static str,
}

impl<const N: usize> Register<N> {
    pub const LEN: usize = N;
}

/// Channel select register. Written as the preamble of every channel write.
pub const CSR_ADDRESS: u8 = 0x00;

/// Function register 1, PLL and VCO configuration.
pub const FR1: Register<3> = Register {
    address: 0x01,
    name: "FR1",
};

/// Channel function register.
pub const CFR: Register<3> = Register {
    address: 0x03,
    name: "CFR",
};

/// Channel frequency tuning word.
pub const CFTW: Register<4> = Register {
    address: 0x04,
    name: "CFTW",
};

/// Channel phase offset word.
pub const CPOW: Register<2> = Register {
    address: 0x05,
    name: "CPOW",
};

/// Amplitude control register.
pub const CACR: Register<3> = Register {
    address: 0x06,
    name: "CACR",
};

/// CSR value enabling channel 0 with 3-wire serial I/O.
pub const CSR_CHANNEL_0: u8 = 0x82;
/// CSR value enabling channel 1 with 3-wire serial I/O.
pub const CSR_CHANNEL_1: u8 = 0x42;
/// CSR value selecting 3-wire serial I/O without touching channel enables.
pub const CSR_SERIAL_MODE: u8 = 0x02;

/// One of the two synthesizer output channels.
#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Channel {
    Zero,
    One,
}

impl Channel {
    pub const fn number(self) -> u8 {
        match self {
            Channel::Zero => 0,
            Channel::One => 1,
        }
    }

    /// CSR value that routes the following register write to this channel.
    pub const fn select_byte(self) -> u8 {
        match self {
            Channel::Zero => CSR_CHANNEL_0,
            Channel::One => CSR_CHANNEL_1,
        }
    }
}

impl TryFrom<u8> for Channel {
    type Error = u8;

    fn try_from(number: u8) -> Result<Self, u8> {
        match number {
            0 => Ok(Channel::Zero),
            1 => Ok(Channel::One),
            n => Err(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_numbers() {
        assert_eq!(Channel::try_from(0), Ok(Channel::Zero));
        assert_eq!(Channel::try_from(1), Ok(Channel::One));
        assert_eq!(Channel::try_from(2), Err(2));
        assert_eq!(Channel::One.number(), 1);
    }

    #[test]
    fn register_lengths() {
        assert_eq!(Register::<3>::LEN, 3);
        assert_eq!(CFTW.address, 0x04);
        assert_eq!(CPOW.address, 0x05);
        assert_eq!(CACR.address, 0x06);
    }
}
