use std::convert::TryFrom;
use std::fs::File;
use std::io::{
    self, BufReader,
    ErrorKind::{InvalidData, InvalidInput},
};
use std::path::Path;

use vcd::{self, SimulationCommand, TimescaleUnit, Value};

pub struct VcdWriter<'a> {
    vcd: vcd::Writer<&'a mut File>,
    timestamp: u64,
    wire_id: vcd::IdCode,
}

impl<'a> VcdWriter<'a> {
    /// Create a new vcd writer
    pub fn new(file: &'a mut File) -> Self {
        let vcd = vcd::Writer::new(file);

        Self {
            vcd,
            timestamp: 0,
            wire_id: vcd::IdCode::FIRST,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        let writer = &mut self.vcd;

        // One tick per microsecond
        writer.timescale(1, TimescaleUnit::US)?;
        writer.add_module("top")?;

        let id = writer.add_wire(1, "rf")?;
        self.wire_id = id;

        writer.upscope()?;
        writer.enddefinitions()?;

        // Idle low
        writer.begin(SimulationCommand::Dumpvars)?;
        writer.change_scalar(id, Value::V0)?;
        writer.end()?;

        Ok(())
    }

    /// Write pulse durations as alternating high and low levels, starting
    /// high. The end of the last duration is only marked by the next write
    /// or by `finish`.
    pub fn write_pulses(&mut self, pulses: &[u32]) -> io::Result<()> {
        let mut ts = 0;
        let mut high = true;

        self.write_value(ts, high)?;
        for (i, duration) in pulses.iter().enumerate() {
            ts += u64::from(*duration);
            high = !high;
            if i + 1 < pulses.len() {
                self.write_value(ts, high)?;
            }
        }

        self.add_offset(ts);

        Ok(())
    }

    pub fn write_value(&mut self, ts: u64, high: bool) -> io::Result<()> {
        let offseted_ts = self.timestamp + ts;

        self.vcd.timestamp(offseted_ts)?;
        let value = if high { Value::V1 } else { Value::V0 };
        self.vcd.change_scalar(self.wire_id, value)?;

        Ok(())
    }

    /// Close the last written duration
    pub fn finish(&mut self) -> io::Result<()> {
        self.vcd.timestamp(self.timestamp)
    }

    pub fn add_offset(&mut self, offset: u64) {
        self.timestamp += offset;
    }
}

/// Read the level changes of wire top.rf and return the time between them,
/// in microseconds
pub fn vcdfile_to_pulses(path: &Path) -> io::Result<Vec<u32>> {
    let file = File::open(path)?;
    let mut parser = vcd::Parser::new(BufReader::new(file));

    // Parse the header and find the wire
    let header = parser.parse_header()?;
    let data = header
        .find_var(&["top", "rf"])
        .ok_or_else(|| io::Error::new(InvalidInput, "no wire top.rf"))?
        .code;

    let (timescale, unit) = header.timescale.unwrap_or((1, TimescaleUnit::US));
    // Time since the last change, in microseconds
    let elapsed_us = |from: u64, to: u64| -> io::Result<u32> {
        let ticks = to
            .checked_sub(from)
            .ok_or_else(|| io::Error::new(InvalidData, "timestamps going backwards"))?;
        let ticks = ticks.checked_mul(u64::from(timescale));
        let us = match unit {
            TimescaleUnit::S => ticks.and_then(|t| t.checked_mul(1_000_000)),
            TimescaleUnit::MS => ticks.and_then(|t| t.checked_mul(1_000)),
            TimescaleUnit::US => ticks,
            TimescaleUnit::NS => ticks.map(|t| t / 1_000),
            TimescaleUnit::PS => ticks.map(|t| t / 1_000_000),
            TimescaleUnit::FS => ticks.map(|t| t / 1_000_000_000),
        };
        us.and_then(|us| u32::try_from(us).ok())
            .ok_or_else(|| io::Error::new(InvalidData, "pulse too long"))
    };

    log::debug!("timescale: {} {:?}", timescale, unit);

    let mut current_ts = 0;
    let mut last_change: Option<(u64, Value)> = None;
    let mut pulses = Vec::new();

    for command_result in parser {
        use vcd::Command::*;
        let command = command_result?;
        match command {
            ChangeScalar(i, v) if i == data => {
                match last_change {
                    // Dumpvars and repeated values are not edges
                    Some((_, prev)) if prev == v => continue,
                    // The idle level before the first pulse isn't a duration
                    Some((_, Value::V0)) if pulses.is_empty() => {}
                    Some((ts, _)) => pulses.push(elapsed_us(ts, current_ts)?),
                    None => {}
                }
                last_change = Some((current_ts, v));
            }
            Timestamp(ts) => current_ts = ts,
            _ => (),
        }
    }

    // A trailing timestamp closes the last level
    if let Some((ts, _)) = last_change {
        if current_ts > ts {
            pulses.push(elapsed_us(ts, current_ts)?);
        }
    }

    Ok(pulses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfswitch_shared::{Command, PulseEncoder, State};

    #[test]
    fn write_and_read_back() {
        let cmd = Command::new(9, 22, State::On).unwrap();
        let frame = PulseEncoder::default().encode(&cmd);

        let path = std::env::temp_dir().join(format!("rfswitch-{}.vcd", std::process::id()));
        {
            let mut file = File::create(&path).unwrap();
            let mut vcd = VcdWriter::new(&mut file);
            vcd.init().unwrap();
            vcd.write_pulses(&frame).unwrap();
            vcd.write_pulses(&frame).unwrap();
            vcd.finish().unwrap();
        }

        let pulses = vcdfile_to_pulses(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(pulses.len(), 100);
        assert_eq!(&pulses[..50], frame.as_slice());
        assert_eq!(&pulses[50..], frame.as_slice());
    }

    fn read_back(name: &str, changes: &[(u64, bool)]) -> io::Result<Vec<u32>> {
        let path = std::env::temp_dir()
            .join(format!("rfswitch-{}-{}.vcd", name, std::process::id()));
        {
            let mut file = File::create(&path)?;
            let mut vcd = VcdWriter::new(&mut file);
            vcd.init()?;
            for &(ts, high) in changes {
                vcd.write_value(ts, high)?;
            }
        }

        let res = vcdfile_to_pulses(&path);
        std::fs::remove_file(&path)?;
        res
    }

    #[test]
    fn timestamps_going_backwards() {
        let err = read_back("backwards", &[(100, true), (50, false)]).unwrap_err();
        assert_eq!(err.kind(), InvalidData);
    }

    #[test]
    fn pulse_longer_than_u32() {
        let changes = [(0, true), (u64::from(u32::MAX) + 1, false)];
        let err = read_back("long", &changes).unwrap_err();
        assert_eq!(err.kind(), InvalidData);

        let pulses = read_back("short", &[(0, true), (312, false), (1248, true)]).unwrap();
        assert_eq!(pulses, vec![312, 936]);
    }
}
