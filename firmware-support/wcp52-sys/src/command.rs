// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0
//! Parser for the console command set.
//!
//! Headers follow the SCPI mnemonic rules: every colon separated node matches
//! either its short form (the leading uppercase part of the pattern) or the
//! complete long form, ignoring case. Parameters follow the header after
//! whitespace and are separated by commas.

use ufmt::derive::uDebug;
use ufmt::{uDisplay, uWrite, uwrite};
use wcp52_hal::gpio::Line;

#[derive(uDebug, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CommandError {
    UndefinedHeader,
    MissingParameter,
    DataTypeError,
    ParameterNotAllowed,
    IllegalParameterValue,
    TooMuchData,
    HardwareError,
}

impl CommandError {
    /// SCPI error number.
    pub const fn code(self) -> i16 {
        match self {
            CommandError::UndefinedHeader => -113,
            CommandError::MissingParameter => -109,
            CommandError::DataTypeError => -104,
            CommandError::ParameterNotAllowed => -108,
            CommandError::IllegalParameterValue => -224,
            CommandError::TooMuchData => -223,
            CommandError::HardwareError => -240,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            CommandError::UndefinedHeader => "Undefined header",
            CommandError::MissingParameter => "Missing parameter",
            CommandError::DataTypeError => "Data type error",
            CommandError::ParameterNotAllowed => "Parameter not allowed",
            CommandError::IllegalParameterValue => "Illegal parameter value",
            CommandError::TooMuchData => "Too much data",
            CommandError::HardwareError => "Hardware error",
        }
    }
}

impl uDisplay for CommandError {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uwrite!(f, "{}, \"{}\"", self.code(), self.message())
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Command {
    Identify,
    InitializeInterface,
    InitializeClock,
    SetFrequency { channel: u8, freq_hz: f64 },
    SetPhase { channel: u8, phase_deg: f64 },
    SetAmplitude { channel: u8, fraction: f64 },
    TransmitByte(u8),
    DriveLine { line: Line, high: bool },
    ReadLine(Line),
    ListPins,
}

#[derive(Copy, Clone)]
enum Kind {
    Identify,
    InitializeInterface,
    InitializeClock,
    Frequency,
    Phase,
    Amplitude,
    Spi,
    DriveFixedLine(Line),
    SetPin,
    ClearPin,
    GetPin,
    ListPins,
}

const COMMANDS: [(&str, Kind); 15] = [
    ("*IDN?", Kind::Identify),
    ("TEST:INIF", Kind::InitializeInterface),
    ("TEST:INCK", Kind::InitializeClock),
    ("TEST:FREQuency", Kind::Frequency),
    ("TEST:PHASe", Kind::Phase),
    ("TEST:AMPLitude", Kind::Amplitude),
    ("TEST:SPI", Kind::Spi),
    ("TEST:SETNCS", Kind::DriveFixedLine(Line::ChipSelect)),
    ("TEST:SETIOUP", Kind::DriveFixedLine(Line::IoUpdate)),
    ("TEST:SETPWRDN", Kind::DriveFixedLine(Line::PowerDown)),
    ("TEST:SETMRST", Kind::DriveFixedLine(Line::MasterReset)),
    ("LOWlevel:SETpin", Kind::SetPin),
    ("LOWlevel:CLRpin", Kind::ClearPin),
    ("LOWlevel:GETpin", Kind::GetPin),
    ("LOWlevel:PINS?", Kind::ListPins),
];

const FREQUENCY_UNITS: [(&str, f64); 4] = [("GHZ", 1e9), ("MHZ", 1e6), ("KHZ", 1e3), ("HZ", 1.0)];
const PHASE_UNITS: [(&str, f64); 1] = [("DEG", 1.0)];

/// Parse one console line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (header, rest) = match line.find(|c: char| c.is_ascii_whitespace()) {
        Some(split) => (&line[..split], &line[split..]),
        None => (line, ""),
    };
    let kind = COMMANDS
        .iter()
        .find(|(pattern, _)| header_matches(pattern, header))
        .map(|&(_, kind)| kind)
        .ok_or(CommandError::UndefinedHeader)?;

    let mut params = Params::new(rest);
    let command = match kind {
        Kind::Identify => Command::Identify,
        Kind::InitializeInterface => Command::InitializeInterface,
        Kind::InitializeClock => Command::InitializeClock,
        Kind::Frequency => Command::SetFrequency {
            channel: parse_channel(params.next()?)?,
            freq_hz: parse_quantity(params.next()?, &FREQUENCY_UNITS)?,
        },
        Kind::Phase => Command::SetPhase {
            channel: parse_channel(params.next()?)?,
            phase_deg: parse_quantity(params.next()?, &PHASE_UNITS)?,
        },
        Kind::Amplitude => Command::SetAmplitude {
            channel: parse_channel(params.next()?)?,
            fraction: parse_quantity(params.next()?, &[])?,
        },
        Kind::Spi => {
            let value = parse_integer(params.next()?)?;
            let byte = u8::try_from(value).map_err(|_| CommandError::IllegalParameterValue)?;
            Command::TransmitByte(byte)
        }
        Kind::DriveFixedLine(line) => Command::DriveLine {
            line,
            high: parse_integer(params.next()?)? != 0,
        },
        Kind::SetPin => Command::DriveLine {
            line: parse_pin(params.next()?)?,
            high: true,
        },
        Kind::ClearPin => Command::DriveLine {
            line: parse_pin(params.next()?)?,
            high: false,
        },
        Kind::GetPin => Command::ReadLine(parse_pin(params.next()?)?),
        Kind::ListPins => Command::ListPins,
    };
    params.finish()?;
    Ok(Some(command))
}

/// Does `header` match the command `pattern`?
pub fn header_matches(pattern: &str, header: &str) -> bool {
    let mut pattern_nodes = pattern.split(':');
    let mut header_nodes = header.split(':');
    loop {
        match (pattern_nodes.next(), header_nodes.next()) {
            (None, None) => return true,
            (Some(pattern), Some(node)) if node_matches(pattern, node) => {}
            _ => return false,
        }
    }
}

fn node_matches(pattern: &str, node: &str) -> bool {
    let (pattern, query) = match pattern.strip_suffix('?') {
        Some(stripped) => (stripped, true),
        None => (pattern, false),
    };
    let node = match (node.strip_suffix('?'), query) {
        (Some(stripped), true) => stripped,
        (None, false) => node,
        _ => return false,
    };
    let short_len = pattern
        .find(|c: char| c.is_ascii_lowercase())
        .unwrap_or(pattern.len());
    node.eq_ignore_ascii_case(pattern) || node.eq_ignore_ascii_case(&pattern[..short_len])
}

struct Params<'a> {
    items: Option<core::str::Split<'a, char>>,
}

impl<'a> Params<'a> {
    fn new(text: &'a str) -> Self {
        let text = text.trim();
        Self {
            items: (!text.is_empty()).then(|| text.split(',')),
        }
    }

    fn next(&mut self) -> Result<&'a str, CommandError> {
        match self.items.as_mut().and_then(Iterator::next).map(str::trim) {
            Some(item) if !item.is_empty() => Ok(item),
            _ => Err(CommandError::MissingParameter),
        }
    }

    fn finish(mut self) -> Result<(), CommandError> {
        match self.items.as_mut().and_then(Iterator::next) {
            Some(_) => Err(CommandError::ParameterNotAllowed),
            None => Ok(()),
        }
    }
}

fn parse_integer(text: &str) -> Result<i64, CommandError> {
    text.parse().map_err(|_| CommandError::DataTypeError)
}

fn parse_channel(text: &str) -> Result<u8, CommandError> {
    u8::try_from(parse_integer(text)?).map_err(|_| CommandError::IllegalParameterValue)
}

/// A decimal number with an optional unit suffix, scaled to the base unit.
fn parse_quantity(text: &str, units: &[(&str, f64)]) -> Result<f64, CommandError> {
    let (number, scale) = units
        .iter()
        .find_map(|&(suffix, scale)| {
            let split = text.len().checked_sub(suffix.len())?;
            let unit = text.get(split..)?;
            unit.eq_ignore_ascii_case(suffix)
                .then(|| (&text[..split], scale))
        })
        .unwrap_or((text, 1.0));
    let value: f64 = number
        .trim_end()
        .parse()
        .map_err(|_| CommandError::DataTypeError)?;
    Ok(value * scale)
}

fn parse_pin(text: &str) -> Result<Line, CommandError> {
    let name = text
        .strip_prefix('"')
        .and_then(|quoted| quoted.strip_suffix('"'))
        .unwrap_or(text);
    Line::from_name(name).ok_or(CommandError::IllegalParameterValue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonic_forms() {
        assert!(header_matches("TEST:FREQuency", "TEST:FREQ"));
        assert!(header_matches("TEST:FREQuency", "test:frequency"));
        assert!(!header_matches("TEST:FREQuency", "TEST:FREQU"));
        assert!(!header_matches("TEST:FREQuency", "TEST"));
        assert!(header_matches("LOWlevel:PINS?", "low:pins?"));
        assert!(!header_matches("LOWlevel:PINS?", "LOW:PINS"));
        assert!(!header_matches("TEST:INIF", "TEST:INIF?"));
        assert!(header_matches("*IDN?", "*idn?"));
    }

    #[test]
    fn frequency_with_units() {
        assert_eq!(
            parse_command("TEST:FREQ 0, 125 MHz"),
            Ok(Some(Command::SetFrequency {
                channel: 0,
                freq_hz: 125e6
            }))
        );
        assert_eq!(
            parse_command("test:freq 1,2.5KHZ"),
            Ok(Some(Command::SetFrequency {
                channel: 1,
                freq_hz: 2500.0
            }))
        );
        assert_eq!(
            parse_command("TEST:FREQ 1,1e6"),
            Ok(Some(Command::SetFrequency {
                channel: 1,
                freq_hz: 1e6
            }))
        );
    }

    #[test]
    fn parameter_errors() {
        assert_eq!(parse_command("TEST:FREQ 0"), Err(CommandError::MissingParameter));
        assert_eq!(parse_command("TEST:FREQ"), Err(CommandError::MissingParameter));
        assert_eq!(parse_command("TEST:FREQ x,1"), Err(CommandError::DataTypeError));
        assert_eq!(
            parse_command("TEST:FREQ 0,1,2"),
            Err(CommandError::ParameterNotAllowed)
        );
        assert_eq!(parse_command("*IDN? 3"), Err(CommandError::ParameterNotAllowed));
        assert_eq!(
            parse_command("TEST:FREQ 300,1"),
            Err(CommandError::IllegalParameterValue)
        );
        assert_eq!(
            parse_command("TEST:SPI 256"),
            Err(CommandError::IllegalParameterValue)
        );
        assert_eq!(parse_command("TEST:BOGUS"), Err(CommandError::UndefinedHeader));
    }

    #[test]
    fn pin_commands() {
        assert_eq!(
            parse_command("LOW:SET GPIO_DDS_nCS"),
            Ok(Some(Command::DriveLine {
                line: Line::ChipSelect,
                high: true
            }))
        );
        assert_eq!(
            parse_command("LOWLEVEL:GETPIN \"GPIO_DDS_PWRDN\""),
            Ok(Some(Command::ReadLine(Line::PowerDown)))
        );
        assert_eq!(
            parse_command("LOW:CLR GPIO_LED0"),
            Err(CommandError::IllegalParameterValue)
        );
        assert_eq!(
            parse_command("TEST:SETMRST 0"),
            Ok(Some(Command::DriveLine {
                line: Line::MasterReset,
                high: false
            }))
        );
    }

    #[test]
    fn blank_line() {
        assert_eq!(parse_command("   "), Ok(None));
    }
}
