use core::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of pulse durations in a frame
pub const RAW_LEN: usize = 50;
/// Number of bits carried by a frame
pub const BIN_LEN: usize = 12;
/// Footer gap, in multiples of the base pulse length
pub const PULSE_DIV: u32 = 34;

/// Timing constants shared by the encoder and the demodulator
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub struct Timing {
    /// Base pulse length in microseconds
    pub plslen: u32,
    /// Long pulse multiplier
    pub pulse: u32,
    /// Footer multiplier
    pub footer_div: u32,
    /// Slot in each 4-slot group that carries the bit
    pub lsb: usize,
}

impl Timing {
    /// Protocol timing with another base pulse length. The footer gap, the
    /// longest duration, has to fit a `u32`.
    pub fn new(plslen: u32) -> Result<Self> {
        if plslen == 0 || plslen.checked_mul(PULSE_DIV).is_none() {
            return Err(Error::PulseLength(plslen));
        }
        Ok(Timing::unchecked(plslen))
    }

    const fn unchecked(plslen: u32) -> Self {
        Timing {
            plslen,
            pulse: PROTOCOL.pulse,
            footer_div: PULSE_DIV,
            lsb: PROTOCOL.lsb,
        }
    }

    pub fn short(&self) -> u32 {
        self.plslen
    }

    pub fn long(&self) -> u32 {
        self.pulse.saturating_mul(self.plslen)
    }

    pub fn footer(&self) -> [u32; 2] {
        [self.plslen, self.footer_div.saturating_mul(self.plslen)]
    }

    /// Durations above this are long pulses
    pub fn threshold(&self) -> u32 {
        let sum = u64::from(self.short()) + u64::from(self.long());
        (sum / 2) as u32
    }
}

impl Default for Timing {
    fn default() -> Self {
        Timing::unchecked(PROTOCOL.plslen)
    }
}

#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeviceType {
    Switch,
}

#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum HardwareType {
    /// 433MHz on/off keyed
    Rf433,
}

#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ArgKind {
    HasValue,
    NoValue,
}

#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ConfigKind {
    Id,
    State,
}

#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq)]
pub struct OptionSpec {
    pub short: char,
    pub long: &'static str,
    pub arg: ArgKind,
    pub kind: ConfigKind,
    /// Accepted values, when the option takes one
    pub pattern: Option<&'static str>,
    pub help: &'static str,
}

/// Static protocol description
#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq)]
pub struct ProtocolInfo {
    pub id: &'static str,
    pub device: (&'static str, &'static str),
    pub devtype: DeviceType,
    pub hwtype: HardwareType,
    pub plslen: u32,
    pub pulse: u32,
    pub rawlen: usize,
    pub binlen: usize,
    pub lsb: usize,
    pub states: &'static str,
    pub readonly: bool,
    pub options: &'static [OptionSpec],
}

const CODE_PATTERN: &str = "^(3[01]|[12]?[0-9])$";

pub const PROTOCOL: ProtocolInfo = ProtocolInfo {
    id: "mumbi",
    device: ("mumbi", "Mumbi Switches"),
    devtype: DeviceType::Switch,
    hwtype: HardwareType::Rf433,
    plslen: 312,
    pulse: 3,
    rawlen: RAW_LEN,
    binlen: BIN_LEN,
    lsb: 3,
    states: "on,off",
    readonly: false,
    options: &[
        OptionSpec {
            short: 's',
            long: "systemcode",
            arg: ArgKind::HasValue,
            kind: ConfigKind::Id,
            pattern: Some(CODE_PATTERN),
            help: "control a device with this systemcode",
        },
        OptionSpec {
            short: 'u',
            long: "unitcode",
            arg: ArgKind::HasValue,
            kind: ConfigKind::Id,
            pattern: Some(CODE_PATTERN),
            help: "control a device with this unitcode",
        },
        OptionSpec {
            short: 't',
            long: "on",
            arg: ArgKind::NoValue,
            kind: ConfigKind::State,
            pattern: None,
            help: "send an on signal",
        },
        OptionSpec {
            short: 'f',
            long: "off",
            arg: ArgKind::NoValue,
            kind: ConfigKind::State,
            pattern: None,
            help: "send an off signal",
        },
    ],
};

impl ProtocolInfo {
    pub fn option(&self, long: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|opt| opt.long == long)
    }

    /// Usage lines for the protocol options
    pub fn help(&self) -> String {
        let mut s = String::new();
        for opt in self.options {
            // Writing to a String can't fail
            let _ = writeln!(s, "{}", opt);
        }
        s
    }
}

impl fmt::Display for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = match self.arg {
            ArgKind::HasValue => format!("-{} --{}={}", self.short, self.long, self.long),
            ArgKind::NoValue => format!("-{} --{}", self.short, self.long),
        };
        write!(f, "\t {:<28}{}", flag, self.help)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timing() {
        let timing = Timing::default();
        assert_eq!(timing.short(), 312);
        assert_eq!(timing.long(), 936);
        assert_eq!(timing.footer(), [312, 34 * 312]);
        assert!(timing.threshold() > timing.short());
        assert!(timing.threshold() < timing.long());
    }

    #[test]
    fn pulse_length_limits() {
        assert_eq!(Timing::new(250).unwrap().footer(), [250, 34 * 250]);

        let max = u32::MAX / PULSE_DIV;
        let timing = Timing::new(max).unwrap();
        assert_eq!(timing.footer()[1], max * PULSE_DIV);
        assert!(timing.threshold() > timing.short());

        assert_eq!(Timing::new(0), Err(Error::PulseLength(0)));
        assert_eq!(Timing::new(max + 1), Err(Error::PulseLength(max + 1)));
        assert_eq!(
            Timing::new(200_000_000),
            Err(Error::PulseLength(200_000_000))
        );
    }

    #[test]
    fn hand_built_timing_saturates() {
        let timing = Timing {
            plslen: 2_000_000_000,
            ..Timing::default()
        };
        assert_eq!(timing.long(), u32::MAX);
        assert_eq!(timing.footer()[1], u32::MAX);
        assert!(timing.threshold() > timing.short());
    }

    #[test]
    fn options() {
        let opt = PROTOCOL.option("unitcode").unwrap();
        assert_eq!(opt.short, 'u');
        assert_eq!(opt.arg, ArgKind::HasValue);
        assert_eq!(PROTOCOL.option("off").unwrap().kind, ConfigKind::State);
        assert!(PROTOCOL.option("dimlevel").is_none());

        let help = PROTOCOL.help();
        assert_eq!(help.lines().count(), 4);
        assert!(help.contains("--systemcode=systemcode"));
        assert!(help.contains("send an off signal"));
    }
}
