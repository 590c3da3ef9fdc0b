use std::path::Path;

use anyhow::Context;
use rfswitch_shared::{decoder::frames, demodulate, BitDecoder, BitVector, CommandMessage, Timing};

use crate::vcdutils::vcdfile_to_pulses;

pub fn command_decode(bits: &str) -> anyhow::Result<()> {
    let bits: BitVector = bits.parse()?;
    print_decoded(&bits)
}

pub fn command_decode_vcd(path: &Path, timing: Timing) -> anyhow::Result<()> {
    let pulses = vcdfile_to_pulses(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    log::debug!("Read {} pulses", pulses.len());

    let mut nframes = 0;
    for frame in frames(&pulses, &timing) {
        nframes += 1;
        let bits = demodulate(frame, &timing)?;
        log::debug!("Frame {}: {:?}", nframes, &bits[..]);
        print_decoded(&bits)?;
    }

    if nframes == 0 {
        println!("No frames found");
    }
    Ok(())
}

fn print_decoded(bits: &BitVector) -> anyhow::Result<()> {
    match BitDecoder.decode(bits) {
        Some(cmd) => println!("{}", serde_json::to_string(&CommandMessage::from(cmd))?),
        None => println!("No command decoded"),
    }
    Ok(())
}
