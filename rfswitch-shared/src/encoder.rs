//! Pulse train encoder
//!
//! Every bit takes four slots. Both patterns start with a short and a long
//! pulse, the value is told apart by where the short pulse sits in the last
//! two slots:
//!
//! ```text
//!  Low:  short long long  short
//!  High: short long short long
//! ```
//!
//! Frame layout:
//!
//! | slots   | content                  |
//! |---------|--------------------------|
//! | 0..=19  | systemcode, lsb first    |
//! | 20..=43 | unitcode, lsb first      |
//! | 44..=47 | state, High when on      |
//! | 48..=49 | footer                   |

use core::convert::TryFrom;
use core::ops::Deref;

use crate::{
    binary::{BitOrder, LsbFirst},
    command::{Command, RawCommand, State},
    error::Result,
    protocol::{Timing, RAW_LEN},
};

pub const SYSTEMCODE_OFFSET: usize = 0;
pub const UNITCODE_OFFSET: usize = 20;
pub const STATE_OFFSET: usize = 44;
pub const FOOTER_OFFSET: usize = 48;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Pulse {
    Low,
    High,
}

impl Pulse {
    pub fn template(self, timing: &Timing) -> [u32; 4] {
        let (short, long) = (timing.short(), timing.long());
        match self {
            Pulse::Low => [short, long, long, short],
            Pulse::High => [short, long, short, long],
        }
    }
}

/// Frame slots holding bit `bit_index` of the field starting at `field_offset`
pub fn slot_window(field_offset: usize, bit_index: usize) -> [usize; 4] {
    let start = field_offset + bit_index * 4;
    [start, start + 1, start + 2, start + 3]
}

/// One complete on-air frame of pulse durations
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PulseFrame([u32; RAW_LEN]);

impl PulseFrame {
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn into_inner(self) -> [u32; RAW_LEN] {
        self.0
    }

    fn write(&mut self, window: [usize; 4], pulse: Pulse, timing: &Timing) {
        for (slot, duration) in window.iter().zip(pulse.template(timing).iter()) {
            self.0[*slot] = *duration;
        }
    }
}

impl Deref for PulseFrame {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.0
    }
}

impl AsRef<[u32]> for PulseFrame {
    fn as_ref(&self) -> &[u32] {
        &self.0
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PulseEncoder {
    timing: Timing,
}

impl PulseEncoder {
    pub fn new(timing: Timing) -> Self {
        PulseEncoder { timing }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn encode(&self, cmd: &Command) -> PulseFrame {
        let timing = &self.timing;
        let mut frame = PulseFrame([0; RAW_LEN]);

        for offset in (0..FOOTER_OFFSET).step_by(4) {
            frame.write(slot_window(offset, 0), Pulse::Low, timing);
        }

        self.write_code(&mut frame, SYSTEMCODE_OFFSET, cmd.systemcode());
        self.write_code(&mut frame, UNITCODE_OFFSET, cmd.unitcode());

        if cmd.state() == State::On {
            frame.write(slot_window(STATE_OFFSET, 0), Pulse::High, timing);
        }

        frame.0[FOOTER_OFFSET..].copy_from_slice(&timing.footer());

        log::trace!("encoded {:?}: {:?}", cmd, frame.as_slice());
        frame
    }

    /// Validate and encode in one go. Nothing is built for an invalid command.
    pub fn encode_raw(&self, raw: &RawCommand) -> Result<PulseFrame> {
        let cmd = Command::try_from(*raw)?;
        Ok(self.encode(&cmd))
    }

    fn write_code(&self, frame: &mut PulseFrame, offset: usize, code: u8) {
        let bits = LsbFirst::to_bits(code.into());
        for (bit_index, _) in bits.iter().enumerate().filter(|(_, bit)| **bit == 1) {
            frame.write(slot_window(offset, bit_index), Pulse::High, &self.timing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{command::Field, error::Error};

    const S: u32 = 312;
    const L: u32 = 936;
    const LOW: [u32; 4] = [S, L, L, S];
    const HIGH: [u32; 4] = [S, L, S, L];

    fn encode(systemcode: i64, unitcode: i64, state: State) -> PulseFrame {
        let cmd = Command::new(systemcode, unitcode, state).unwrap();
        PulseEncoder::default().encode(&cmd)
    }

    fn window(frame: &PulseFrame, offset: usize, bit: usize) -> [u32; 4] {
        let w = slot_window(offset, bit);
        [frame[w[0]], frame[w[1]], frame[w[2]], frame[w[3]]]
    }

    #[test]
    fn windows() {
        assert_eq!(slot_window(0, 0), [0, 1, 2, 3]);
        assert_eq!(slot_window(0, 4), [16, 17, 18, 19]);
        assert_eq!(slot_window(UNITCODE_OFFSET, 2), [28, 29, 30, 31]);
        assert_eq!(slot_window(STATE_OFFSET, 0), [44, 45, 46, 47]);
    }

    #[test]
    fn templates() {
        let timing = Timing::default();
        assert_eq!(Pulse::Low.template(&timing), LOW);
        assert_eq!(Pulse::High.template(&timing), HIGH);

        let fast = Timing::new(100).unwrap();
        assert_eq!(Pulse::High.template(&fast), [100, 300, 100, 300]);
    }

    #[test]
    fn unit_five_on() {
        let frame = encode(0, 5, State::On);
        assert_eq!(frame.len(), 50);

        for bit in 0..5 {
            assert_eq!(window(&frame, SYSTEMCODE_OFFSET, bit), LOW);
        }
        assert_eq!(window(&frame, UNITCODE_OFFSET, 0), HIGH);
        assert_eq!(window(&frame, UNITCODE_OFFSET, 1), LOW);
        assert_eq!(window(&frame, UNITCODE_OFFSET, 2), HIGH);
        for bit in 3..6 {
            assert_eq!(window(&frame, UNITCODE_OFFSET, bit), LOW);
        }
        assert_eq!(window(&frame, STATE_OFFSET, 0), HIGH);
        assert_eq!(&frame[48..], &[S, 34 * S]);
    }

    #[test]
    fn off_is_low() {
        let frame = encode(31, 31, State::Off);
        for bit in 0..5 {
            assert_eq!(window(&frame, SYSTEMCODE_OFFSET, bit), HIGH);
            assert_eq!(window(&frame, UNITCODE_OFFSET, bit), HIGH);
        }
        // Unitcode field has room for a sixth bit that is never set
        assert_eq!(window(&frame, UNITCODE_OFFSET, 5), LOW);
        assert_eq!(window(&frame, STATE_OFFSET, 0), LOW);
    }

    #[test]
    fn zero_codes() {
        let frame = encode(0, 0, State::Off);
        for offset in (0..FOOTER_OFFSET).step_by(4) {
            assert_eq!(window(&frame, offset, 0), LOW);
        }
    }

    #[test]
    fn footer_is_constant() {
        for &(s, u, state) in &[(0, 0, State::On), (17, 3, State::Off), (31, 31, State::On)] {
            let frame = encode(s, u, state);
            assert_eq!(frame.as_slice().len(), 50);
            assert_eq!(&frame[48..], &[S, 34 * S]);
        }

        let timing = Timing::new(400).unwrap();
        let cmd = Command::new(1, 1, State::On).unwrap();
        let frame = PulseEncoder::new(timing).encode(&cmd);
        assert_eq!(&frame[48..], &[400, 34 * 400]);
    }

    #[test]
    fn no_frame_for_invalid() {
        let raw = RawCommand {
            systemcode: Some(33),
            unitcode: Some(1),
            on: true,
            off: false,
        };
        assert_eq!(
            PulseEncoder::default().encode_raw(&raw),
            Err(Error::OutOfRange {
                field: Field::Systemcode,
                value: 33
            })
        );

        let raw = RawCommand {
            systemcode: Some(1),
            unitcode: Some(1),
            ..RawCommand::default()
        };
        assert_eq!(
            PulseEncoder::default().encode_raw(&raw),
            Err(Error::MissingField(Field::State))
        );
    }
}
