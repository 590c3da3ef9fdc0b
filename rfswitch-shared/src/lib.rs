//! Codec for Mumbi 433MHz remote switches.
//!
//! A [`Command`] is turned into a 50 slot [`PulseFrame`] by the
//! [`PulseEncoder`], and a 12 bit [`BitVector`] captured from the air is
//! turned back into a [`Command`] by the [`BitDecoder`].

pub mod binary;
pub mod command;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod protocol;

pub use command::{Command, CommandMessage, Field, RawCommand, State};
pub use decoder::{demodulate, BitDecoder, BitVector};
pub use encoder::{PulseEncoder, PulseFrame};
pub use error::{Error, Result};
pub use protocol::{Timing, PROTOCOL};
