use core::convert::TryFrom;
use core::fmt;
use core::ops::Not;

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize,
};

use crate::error::{Error, Result};

/// Highest systemcode or unitcode, the largest value that fits in 5 bits
pub const MAX_CODE: u8 = 31;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Field {
    Systemcode,
    Unitcode,
    State,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Systemcode => "systemcode",
            Field::Unitcode => "unitcode",
            Field::State => "state",
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum State {
    On,
    Off,
}

impl Not for State {
    type Output = State;

    fn not(self) -> State {
        match self {
            State::On => State::Off,
            State::Off => State::On,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::On => "on",
            State::Off => "off",
        })
    }
}

/// An addressed switch action with both codes in range
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Command {
    systemcode: u8,
    unitcode: u8,
    state: State,
}

impl Command {
    pub fn new(systemcode: i64, unitcode: i64, state: State) -> Result<Self> {
        Ok(Command {
            systemcode: check_range(Field::Systemcode, systemcode)?,
            unitcode: check_range(Field::Unitcode, unitcode)?,
            state,
        })
    }

    pub fn systemcode(&self) -> u8 {
        self.systemcode
    }

    pub fn unitcode(&self) -> u8 {
        self.unitcode
    }

    pub fn state(&self) -> State {
        self.state
    }
}

fn check_range(field: Field, value: i64) -> Result<u8> {
    if (0..=i64::from(MAX_CODE)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(Error::OutOfRange { field, value })
    }
}

/// Candidate command as handed over by the caller, not yet validated.
///
/// The state is given by the presence of either an `on` or an `off` key.
/// A key counts as present when it holds a number or `true`; `false` and
/// `null` count as absent, any other value is rejected.
#[derive(Deserialize, Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct RawCommand {
    #[serde(default)]
    pub systemcode: Option<i64>,
    #[serde(default)]
    pub unitcode: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub on: bool,
    #[serde(default, deserialize_with = "present")]
    pub off: bool,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> core::result::Result<bool, D::Error> {
    deserializer.deserialize_any(FlagVisitor)
}

struct FlagVisitor;

impl<'de> Visitor<'de> for FlagVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a boolean or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> core::result::Result<bool, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> core::result::Result<bool, E> {
        Ok(true)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> core::result::Result<bool, E> {
        Ok(true)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> core::result::Result<bool, E> {
        Ok(true)
    }

    fn visit_unit<E: de::Error>(self) -> core::result::Result<bool, E> {
        Ok(false)
    }

    fn visit_none<E: de::Error>(self) -> core::result::Result<bool, E> {
        Ok(false)
    }
}

impl RawCommand {
    pub fn state(&self) -> Option<State> {
        match (self.on, self.off) {
            (true, false) => Some(State::On),
            (false, true) => Some(State::Off),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<Command> {
        let res = self.check();
        if let Err(err) = &res {
            log::error!("{}: {}", crate::PROTOCOL.id, err);
        }
        res
    }

    fn check(&self) -> Result<Command> {
        let systemcode = self.systemcode.ok_or(Error::MissingField(Field::Systemcode))?;
        let unitcode = self.unitcode.ok_or(Error::MissingField(Field::Unitcode))?;
        let state = self.state().ok_or(Error::MissingField(Field::State))?;

        Command::new(systemcode, unitcode, state)
    }
}

impl TryFrom<RawCommand> for Command {
    type Error = Error;

    fn try_from(raw: RawCommand) -> Result<Self> {
        raw.validate()
    }
}

/// The structured form of a command exchanged with the rest of the system
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub struct CommandMessage {
    pub systemcode: u8,
    pub unitcode: u8,
    pub state: State,
}

impl From<Command> for CommandMessage {
    fn from(cmd: Command) -> Self {
        CommandMessage {
            systemcode: cmd.systemcode,
            unitcode: cmd.unitcode,
            state: cmd.state,
        }
    }
}

impl TryFrom<CommandMessage> for Command {
    type Error = Error;

    fn try_from(msg: CommandMessage) -> Result<Self> {
        Command::new(msg.systemcode.into(), msg.unitcode.into(), msg.state)
    }
}
