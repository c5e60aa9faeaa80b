// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

pub struct UartStatus {
    pub receiver_ready: bool,
    pub transmitter_ready: bool,
}

pub struct TransmitterBusy;
pub struct ReceiveBufferEmpty;

#[derive(Clone)]
/// `Uart` is the SAM4S debug UART used as the command console.
///
/// Register offsets, in 32-bit words from the base address:
/// - `0x14` `UART_SR`, status (`RXRDY` bit 0, `TXRDY` bit 1)
/// - `0x18` `UART_RHR`, receive holding
/// - `0x1C` `UART_THR`, transmit holding
pub struct Uart {
    /// `status_addr` is a constant pointer to the status register.
    status_addr: *const u32,
    /// `rhr_addr` is a constant pointer to the receive holding register.
    rhr_addr: *const u32,
    /// `thr_addr` is a mutable pointer to the transmit holding register.
    thr_addr: *mut u32,
}

impl Uart {
    const SR_OFFSET: usize = 0x14 / 4;
    const RHR_OFFSET: usize = 0x18 / 4;
    const THR_OFFSET: usize = 0x1C / 4;
    const SR_RXRDY: u32 = 1 << 0;
    const SR_TXRDY: u32 = 1 << 1;

    /// Create a new [`Uart`] instance given a base address.
    ///
    /// # Safety
    ///
    /// The `base_addr` pointer MUST BE a valid pointer that is backed
    /// by a memory mapped UART instance.
    pub const unsafe fn new(base_addr: *mut u32) -> Uart {
        Uart {
            status_addr: base_addr.add(Self::SR_OFFSET).cast_const(),
            rhr_addr: base_addr.add(Self::RHR_OFFSET).cast_const(),
            thr_addr: base_addr.add(Self::THR_OFFSET),
        }
    }

    /// UART status register output
    pub fn read_status(&self) -> UartStatus {
        let flags = unsafe { self.status_addr.read_volatile() };

        UartStatus {
            receiver_ready: flags & Self::SR_RXRDY != 0,
            transmitter_ready: flags & Self::SR_TXRDY != 0,
        }
    }

    /// The `receive` function attempts to receive data from the UART. If no
    /// data is available, it keeps looping until data is available.
    pub fn receive(&self) -> u8 {
        loop {
            if let Ok(val) = self.try_receive() {
                return val;
            }
        }
    }

    /// The `try_receive` function attempts to receive data from the UART. If no
    /// data is available, it returns an error.
    pub fn try_receive(&self) -> Result<u8, ReceiveBufferEmpty> {
        if !self.read_status().receiver_ready {
            Err(ReceiveBufferEmpty)
        } else {
            let data = unsafe { self.rhr_addr.read_volatile() };
            Ok(data as u8)
        }
    }

    /// The `send` function sends the given data to the UART. If the UART is
    /// unable to accept the data, it keeps looping until it can send the data.
    pub fn send(&self, data: u8) {
        loop {
            if let Ok(()) = self.try_send(data) {
                return;
            }
        }
    }

    /// The `try_send` function attempts to send the given data to the UART. If
    /// the UART is unable to accept the data, it returns an error.
    pub fn try_send(&self, data: u8) -> Result<(), TransmitterBusy> {
        if !self.read_status().transmitter_ready {
            Err(TransmitterBusy)
        } else {
            unsafe { self.thr_addr.write_volatile(data as u32) };
            Ok(())
        }
    }
}

impl ufmt::uWrite for Uart {
    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for b in s.bytes() {
            self.send(b);
        }
        Ok(())
    }

    type Error = ();
}

impl core::fmt::Write for Uart {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for b in s.bytes() {
            self.send(b);
        }
        Ok(())
    }
}
