use std::fs::File;
use std::path::Path;

use anyhow::Context;
use rfswitch_shared::{CommandMessage, PulseEncoder, RawCommand, Timing};

use crate::vcdutils::VcdWriter;

pub fn command_encode(
    raw: &RawCommand,
    timing: Timing,
    vcd_path: Option<&Path>,
    repeats: usize,
) -> anyhow::Result<bool> {
    // Already logged by the validator
    let cmd = match raw.validate() {
        Ok(cmd) => cmd,
        Err(_) => return Ok(false),
    };
    let frame = PulseEncoder::new(timing).encode(&cmd);

    log::info!("Encoded command: {:?}", cmd);

    println!("{}", serde_json::to_string(&CommandMessage::from(cmd))?);
    println!(
        "{}",
        frame
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    );

    if let Some(path) = vcd_path {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut vcd = VcdWriter::new(&mut file);
        vcd.init()?;
        for _ in 0..repeats {
            vcd.write_pulses(&frame)?;
        }
        vcd.finish()?;
        log::info!("Wrote {} frame(s) to {}", repeats, path.display());
    }

    Ok(true)
}
