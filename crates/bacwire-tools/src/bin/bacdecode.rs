use bacwire_core::Frame;
use bacwire_tools::{parse_hex, OutputFormat};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bacdecode", about = "Decode one BACnet/IP frame and print its message tree")]
struct Args {
    /// Frame octets in hex; may be split across several arguments.
    hex: Vec<String>,
    /// Read the hex from a file instead (`#` starts a comment).
    #[arg(long, conflicts_with = "hex")]
    file: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Debug)]
    format: OutputFormat,
    /// Input starts at the NPDU version octet rather than the BVLC header.
    #[arg(long)]
    skip_bvlc: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => args.hex.join(" "),
    };
    let bytes = parse_hex(&text)?;
    log::debug!("decoding {} octets", bytes.len());

    let decoded = if args.skip_bvlc {
        Frame::decode_npdu(&bytes)
    } else {
        Frame::decode(&bytes)
    };
    let frame = match decoded {
        Ok(frame) => frame,
        Err(e) => {
            eprintln!("decode failed: {e}");
            std::process::exit(1);
        }
    };

    match args.format {
        OutputFormat::Debug => println!("{frame:#?}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&frame)?),
    }
    Ok(())
}
