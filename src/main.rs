use std::path::PathBuf;
use std::process::ExitCode;
use structopt::StructOpt;

mod decode;
mod encode;
mod vcdutils;

use rfswitch_shared::{Timing, PROTOCOL};

#[derive(Debug, StructOpt)]
#[structopt(name = "rfswitch", about = "Mumbi 433MHz switch codec")]
struct Opt {
    #[structopt(short, long)]
    debug: bool,
    /// Base pulse length in microseconds, 312 when not given
    #[structopt(long)]
    plslen: Option<u32>,
    #[structopt(subcommand)]
    cmd: CliCommand,
}

#[derive(StructOpt, Debug)]
enum CliCommand {
    /// Encode a command into a pulse frame
    Encode {
        #[structopt(short, long)]
        systemcode: Option<i64>,
        #[structopt(short, long)]
        unitcode: Option<i64>,
        /// Send an on signal
        #[structopt(short = "t", long)]
        on: bool,
        /// Send an off signal
        #[structopt(short = "f", long)]
        off: bool,
        /// Command as json, instead of the flags
        #[structopt(long, conflicts_with_all = &["systemcode", "unitcode", "on", "off"])]
        json: Option<String>,
        /// Write the frame to a vcd file
        #[structopt(long, parse(from_os_str))]
        vcd: Option<PathBuf>,
        /// Number of times the frame is repeated in the vcd file
        #[structopt(long, default_value = "1")]
        repeats: usize,
    },
    /// Decode 12 demodulated bits, e.g. 101000101000
    Decode { bits: String },
    /// Decode the frames in a vcd capture
    DecodeVcd {
        #[structopt(parse(from_os_str))]
        path: PathBuf,
    },
    /// Show the protocol description
    Info {},
}

fn main() -> anyhow::Result<ExitCode> {
    let opt = Opt::from_args();

    let loglevel = if opt.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new().filter_level(loglevel).init();

    let timing = match opt.plslen {
        Some(plslen) => Timing::new(plslen)?,
        None => Timing::default(),
    };
    log::debug!("Using {:?}", timing);

    match opt.cmd {
        CliCommand::Encode {
            systemcode,
            unitcode,
            on,
            off,
            json,
            vcd,
            repeats,
        } => {
            let raw = match json {
                Some(json) => serde_json::from_str(&json)?,
                None => rfswitch_shared::RawCommand {
                    systemcode,
                    unitcode,
                    on,
                    off,
                },
            };
            if !encode::command_encode(&raw, timing, vcd.as_deref(), repeats)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        CliCommand::Decode { bits } => decode::command_decode(&bits)?,
        CliCommand::DecodeVcd { path } => decode::command_decode_vcd(&path, timing)?,
        CliCommand::Info {} => {
            println!("{}", serde_json::to_string_pretty(&PROTOCOL)?);
            print!("{}", PROTOCOL.help());
        }
    }

    Ok(ExitCode::SUCCESS)
}
