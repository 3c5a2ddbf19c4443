// Licensed under the Apache-2.0 license

//! Asphodel Stream Decode Binary
//!
//! Decodes a raw stream packet capture with a TOML stream layout and
//! prints per channel totals, optionally every sample, and the streaming
//! counts the layout would be planned with.

use anyhow::{Context, Result};
use asphodel_stream_decode::{decode_capture, load_layout, plan, summary_toml};
use clap::Parser;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stream-decode")]
#[command(about = "Decode captured Asphodel stream packets using a stream layout")]
#[command(version)]
struct Args {
    /// Stream layout (TOML)
    #[arg(short, long, help = "Path to TOML stream layout file")]
    layout: PathBuf,

    /// Raw capture of back to back stream packets
    #[arg(short, long, help = "Path to a raw packet capture to decode")]
    capture: Option<PathBuf>,

    /// Print every decoded sample
    #[arg(short, long)]
    samples: bool,

    /// Seconds between streaming callbacks for the planner
    #[arg(long, default_value_t = 0.05)]
    response_time: f64,

    /// Seconds of packets kept in flight for the planner
    #[arg(long, default_value_t = 0.5)]
    buffer_time: f64,

    /// Print the capture summary as TOML instead of a table
    #[arg(long)]
    toml: bool,

    /// Enable verbose output
    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = SimpleLogger::new().with_level(level).init();

    info!("Loading stream layout from {:?}", args.layout);
    let layout = load_layout(&args.layout)?;

    println!("Asphodel Stream Decode");
    println!("======================\n");
    println!(
        "{} streams, {} byte packets, id bits {}",
        layout.streams.len(),
        layout.packet_length,
        layout.id_bits
    );

    let params = plan(&layout, args.response_time, args.buffer_time)?;
    println!(
        "Streaming counts: {} packets per transfer, {} transfers, {} ms timeout\n",
        params.packet_count, params.transfer_count, params.timeout_ms
    );

    let Some(capture) = args.capture else {
        return Ok(());
    };
    let data = std::fs::read(&capture)
        .with_context(|| format!("Failed to read capture file: {:?}", capture))?;
    info!("Decoding {} bytes from {:?}", data.len(), capture);

    let summary = decode_capture(&layout, &data, args.samples)?;
    if args.toml {
        print!("{}", summary_toml(&summary)?);
        return Ok(());
    }

    println!(
        "\n{} packets, {} lost, {} unknown ids, {} trailing bytes",
        summary.packets, summary.lost_packets, summary.unknown_ids, summary.trailing_bytes
    );
    for channel in &summary.channels {
        println!(
            "  [{}] {:<24} {:>8} samples  {} last {:?}",
            channel.stream_id, channel.name, channel.samples, channel.unit, channel.last
        );
    }
    Ok(())
}
