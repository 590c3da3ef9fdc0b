use thiserror::Error;

use crate::command::Field;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("insufficient number of arguments: missing {0}")]
    MissingField(Field),
    #[error("invalid {field} range: {value}")]
    OutOfRange { field: Field, value: i64 },
    #[error("expected 12 bits, got {0}")]
    BitLength(usize),
    #[error("invalid bit {0:?}")]
    InvalidBit(char),
    #[error("invalid pulse length {0}")]
    PulseLength(u32),
    #[error("pulse frame too short: {0} slots")]
    FrameLength(usize),
}

pub type Result<T> = core::result::Result<T, Error>;
