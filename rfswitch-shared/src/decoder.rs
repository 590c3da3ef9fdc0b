use core::convert::TryFrom;
use core::ops::Deref;
use core::str::FromStr;

use crate::{
    binary::{BitOrder, LsbFirst},
    command::{Command, State},
    error::{Error, Result},
    protocol::{Timing, BIN_LEN, RAW_LEN},
};

/// The demodulated payload of a frame, first received bit first
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BitVector([u8; BIN_LEN]);

impl BitVector {
    pub fn new(bits: [u8; BIN_LEN]) -> Self {
        BitVector(bits)
    }
}

impl Deref for BitVector {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; BIN_LEN]> for BitVector {
    fn from(bits: [u8; BIN_LEN]) -> Self {
        BitVector(bits)
    }
}

impl TryFrom<&[u8]> for BitVector {
    type Error = Error;

    fn try_from(bits: &[u8]) -> Result<Self> {
        let bits = <[u8; BIN_LEN]>::try_from(bits).map_err(|_| Error::BitLength(bits.len()))?;
        Ok(BitVector(bits))
    }
}

impl FromStr for BitVector {
    type Err = Error;

    /// Parse a string of `0` and `1`. Whitespace and commas are skipped.
    fn from_str(s: &str) -> Result<Self> {
        let mut bits = [0; BIN_LEN];
        let mut len = 0;

        for c in s.chars().filter(|c| !c.is_whitespace() && *c != ',') {
            let bit = match c {
                '0' => 0,
                '1' => 1,
                other => return Err(Error::InvalidBit(other)),
            };
            if len < BIN_LEN {
                bits[len] = bit;
            }
            len += 1;
        }

        if len != BIN_LEN {
            return Err(Error::BitLength(len));
        }
        Ok(BitVector(bits))
    }
}

/// Threshold a pulse frame into bits.
///
/// The bit of each 4-slot group is read from slot `timing.lsb`: a long pulse
/// is a 1. The footer is ignored, so 48 slots are enough.
pub fn demodulate(frame: &[u32], timing: &Timing) -> Result<BitVector> {
    if frame.len() < BIN_LEN * 4 {
        return Err(Error::FrameLength(frame.len()));
    }

    let threshold = timing.threshold();
    let mut bits = [0; BIN_LEN];
    for (bit, group) in bits.iter_mut().zip(frame.chunks_exact(4)) {
        *bit = (group[timing.lsb] > threshold) as u8;
    }
    Ok(BitVector(bits))
}

/// Split captured pulse durations into frames, ending each at a footer gap.
///
/// Leading pulses beyond one frame length are dropped; chunks too short to
/// be a frame are skipped.
pub fn frames<'a>(pulses: &'a [u32], timing: &Timing) -> impl Iterator<Item = &'a [u32]> + 'a {
    let gap = timing.footer()[1] / 2;

    pulses
        .split_inclusive(move |duration| *duration > gap)
        .filter_map(|chunk| {
            if chunk.len() < RAW_LEN {
                log::debug!("Skipping {} pulses", chunk.len());
                None
            } else {
                Some(&chunk[chunk.len() - RAW_LEN..])
            }
        })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BitDecoder;

impl BitDecoder {
    /// Decode the command fields. A capture that addresses unit 0 is
    /// treated as noise and yields nothing.
    pub fn decode(&self, bits: &BitVector) -> Option<Command> {
        let systemcode = LsbFirst::from_bits(bits, 0, 4);
        let unitcode = LsbFirst::from_bits(bits, 5, 9);
        let state = if bits[11] == 0 { State::On } else { State::Off };

        if unitcode == 0 {
            log::trace!("Suppressed capture without unitcode: {:?}", bits);
            return None;
        }

        // Five bits always fit the range
        Command::new(systemcode.into(), unitcode.into(), state).ok()
    }
}
