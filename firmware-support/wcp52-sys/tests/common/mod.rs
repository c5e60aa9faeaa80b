// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use wcp52_hal::gpio::{ControlLines, Line};
use wcp52_hal::spi::SpiMaster;
use wcp52_sys::config::SynthConfig;
use wcp52_sys::synth::Synth;

/// Everything the driver does to the hardware, in order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    Byte(u8),
    WaitIdle,
    Set(Line, bool),
    DelayNs(u32),
    DelayUs(u32),
    DelayMs(u32),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

pub struct RecordingBus(pub EventLog);

impl SpiMaster for RecordingBus {
    fn transmit_byte(&mut self, data: u8) {
        self.0.borrow_mut().push(Event::Byte(data));
    }

    fn is_idle(&self) -> bool {
        true
    }

    fn wait_idle(&mut self) {
        self.0.borrow_mut().push(Event::WaitIdle);
    }
}

/// Records every level change. Driving `fail_on` reports an error instead.
pub struct RecordingLines {
    pub log: EventLog,
    pub fail_on: Option<Line>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PinFault(pub Line);

impl ControlLines for RecordingLines {
    type Error = PinFault;

    fn set_line(&mut self, line: Line, high: bool) -> Result<(), PinFault> {
        if self.fail_on == Some(line) {
            return Err(PinFault(line));
        }
        self.log.borrow_mut().push(Event::Set(line, high));
        Ok(())
    }
}

pub struct RecordingDelay(pub EventLog);

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(Event::DelayNs(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().push(Event::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(Event::DelayMs(ms));
    }
}

pub type TestSynth = Synth<RecordingBus, RecordingLines, RecordingDelay>;

pub fn synth_with(config: SynthConfig, fail_on: Option<Line>) -> (TestSynth, EventLog) {
    let log = EventLog::default();
    let synth = Synth::new(
        RecordingBus(log.clone()),
        RecordingLines {
            log: log.clone(),
            fail_on,
        },
        RecordingDelay(log.clone()),
        config,
    );
    (synth, log)
}

pub fn synth() -> (TestSynth, EventLog) {
    synth_with(SynthConfig::default(), None)
}

/// Take the recorded events, leaving the log empty.
pub fn drain(log: &EventLog) -> Vec<Event> {
    std::mem::take(&mut *log.borrow_mut())
}

pub fn bytes(events: &[Event]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Byte(byte) => Some(*byte),
            _ => None,
        })
        .collect()
}

/// Collects console output.
#[derive(Default)]
pub struct Output(pub String);

impl ufmt::uWrite for Output {
    type Error = std::convert::Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.0.push_str(s);
        Ok(())
    }
}
