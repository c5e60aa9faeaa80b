// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

/// Byte level transmit side of a SPI master.
///
/// The synthesizer is write only, so this is the whole surface the driver
/// needs: queue a byte, and find out whether the shifter has drained.
pub trait SpiMaster {
    /// Queue a single byte for transmission. Does not wait for the byte to
    /// leave the shift register.
    fn transmit_byte(&mut self, data: u8);

    /// `true` once every queued byte has been shifted out on the wire.
    fn is_idle(&self) -> bool;

    /// Busy-wait until [`is_idle`](SpiMaster::is_idle) reports completion.
    fn wait_idle(&mut self) {
        while !self.is_idle() {
            core::hint::spin_loop();
        }
    }
}

impl<T: SpiMaster + ?Sized> SpiMaster for &mut T {
    fn transmit_byte(&mut self, data: u8) {
        T::transmit_byte(self, data)
    }

    fn is_idle(&self) -> bool {
        T::is_idle(self)
    }

    fn wait_idle(&mut self) {
        T::wait_idle(self)
    }
}

pub struct SpiStatus {
    pub transmit_data_empty: bool,
    pub transmitter_empty: bool,
}

pub struct TransmitDataFull;

/// `MmioSpi` is a memory mapped SAM4S-style SPI master peripheral.
///
/// Register offsets, in 32-bit words from the base address:
/// - `0x0C` `SPI_TDR`, transmit data
/// - `0x10` `SPI_SR`, status
pub struct MmioSpi {
    /// `tdr_addr` is a mutable pointer to the transmit data register.
    tdr_addr: *mut u32,
    /// `sr_addr` is a constant pointer to the status register.
    sr_addr: *const u32,
}

impl MmioSpi {
    const TDR_OFFSET: usize = 0x0C / 4;
    const SR_OFFSET: usize = 0x10 / 4;
    const SR_TDRE: u32 = 1 << 1;
    const SR_TXEMPTY: u32 = 1 << 9;

    /// Create a new [`MmioSpi`] instance given a base address.
    ///
    /// # Safety
    ///
    /// The `base_addr` pointer MUST BE a valid pointer that is backed
    /// by either a memory mapped SPI instance or at valid read-writable memory
    /// (which will likely cause incorrect behaviour, but not break memory safety)
    pub const unsafe fn new(base_addr: *mut u32) -> MmioSpi {
        MmioSpi {
            tdr_addr: base_addr.add(Self::TDR_OFFSET),
            sr_addr: base_addr.add(Self::SR_OFFSET).cast_const(),
        }
    }

    /// SPI status register output
    pub fn read_status(&self) -> SpiStatus {
        // SAFETY: the address was validated by the caller of `new`.
        let flags = unsafe { self.sr_addr.read_volatile() };

        SpiStatus {
            transmit_data_empty: flags & Self::SR_TDRE != 0,
            transmitter_empty: flags & Self::SR_TXEMPTY != 0,
        }
    }

    /// Attempt to hand `data` to the transmit data register. Fails if the
    /// previous byte has not been moved into the shifter yet.
    pub fn try_send(&self, data: u8) -> Result<(), TransmitDataFull> {
        if !self.read_status().transmit_data_empty {
            Err(TransmitDataFull)
        } else {
            // SAFETY: the address was validated by the caller of `new`.
            unsafe { self.tdr_addr.write_volatile(data as u32) };
            Ok(())
        }
    }
}

impl SpiMaster for MmioSpi {
    fn transmit_byte(&mut self, data: u8) {
        loop {
            if let Ok(()) = self.try_send(data) {
                return;
            }
        }
    }

    fn is_idle(&self) -> bool {
        self.read_status().transmitter_empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transmit_lands_in_data_register() {
        let mut regs = [0u32; 8];
        let base = regs.as_mut_ptr();
        let mut spi = unsafe { MmioSpi::new(base) };
        let status = unsafe { base.add(MmioSpi::SR_OFFSET) };

        unsafe { status.write_volatile(MmioSpi::SR_TDRE) };
        spi.transmit_byte(0xA5);
        assert!(!spi.is_idle());

        unsafe { status.write_volatile(MmioSpi::SR_TDRE | MmioSpi::SR_TXEMPTY) };
        assert!(spi.is_idle());
        assert_eq!(regs[MmioSpi::TDR_OFFSET], 0xA5);
    }

    #[test]
    fn full_data_register_rejects_byte() {
        let mut regs = [0u32; 8];
        let spi = unsafe { MmioSpi::new(regs.as_mut_ptr()) };

        assert!(spi.try_send(0x01).is_err());
        assert_eq!(regs[MmioSpi::TDR_OFFSET], 0);
    }
}
