// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0
use wcp52_hal::uart::Uart;

// The logger utilizes core::fmt to format the log messages because ufmt formatting is not
// compatible with (dependencies of) the log crate.
use core::fmt::Write;
use log::LevelFilter;

/// A global logger instance to be used with the `log` crate.
///
/// Use [`init`] to attach the console `Uart` and register the logger.
/// # Safety
/// Using this logger is only safe if there is only one thread of execution.
/// Even though `UartLogger` is `Send` and `Sync`, The underlying `Uart` is not `Send` or `Sync`.
pub static mut LOGGER: UartLogger = UartLogger::new();

/// Wrapper for `Uart` to be used as a logger with the `log` crate.
pub struct UartLogger {
    uart: Option<Uart>,
    /// Most verbose level that is emitted at all.
    pub max_level: LevelFilter,
    /// Levels up to this one get a `LEVEL | ` prefix.
    pub display_level: LevelFilter,
    /// Levels up to this one get a `file:line - ` prefix.
    pub display_source: LevelFilter,
}

impl UartLogger {
    pub const fn new() -> Self {
        UartLogger {
            uart: None,
            max_level: LevelFilter::Info,
            display_level: LevelFilter::Trace,
            display_source: LevelFilter::Warn,
        }
    }

    /// Set the logger to use the given UART.
    pub fn set_uart(&mut self, uart: Uart) {
        self.uart = Some(uart);
    }
}

impl Default for UartLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Attach `uart` to [`LOGGER`] and install it as the `log` backend.
///
/// # Safety
/// Using this function and logger is only safe if there is only one thread of execution.
/// This function is used to assign the `Uart` instance to a global (`static mut`), but `Uart` is
/// not `Send` or `Sync`. It must not run while a log record is being written.
pub unsafe fn init(uart: Uart, max_level: LevelFilter) -> Result<(), log::SetLoggerError> {
    let logger = &mut *core::ptr::addr_of_mut!(LOGGER);
    logger.set_uart(uart);
    logger.max_level = max_level;
    log::set_max_level(max_level);
    log::set_logger(&*core::ptr::addr_of!(LOGGER))
}

/// Write `record` as a single `LEVEL | file:line - message` line. Either prefix is left out
/// when the record is more verbose than `display_level` or `display_source`.
pub fn write_record<W: Write>(
    w: &mut W,
    record: &log::Record,
    display_level: LevelFilter,
    display_source: LevelFilter,
) -> core::fmt::Result {
    if record.level() <= display_level {
        write!(w, "{} | ", record.level())?;
    }
    if record.level() <= display_source {
        write!(
            w,
            "{}:{} - ",
            record.file().unwrap_or("?"),
            record.line().unwrap_or(0)
        )?;
    }
    write!(w, "{}\r\n", record.args())
}

impl log::Log for UartLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(uart) = &self.uart {
            let mut uart = uart.clone();
            // Nowhere to report a failing console.
            let _ = write_record(&mut uart, record, self.display_level, self.display_source);
        }
    }

    fn flush(&self) {}
}

unsafe impl core::marker::Send for UartLogger {}
unsafe impl core::marker::Sync for UartLogger {}
