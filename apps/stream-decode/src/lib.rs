// Licensed under the Apache-2.0 license

//! Offline stream capture decoding
//!
//! Decodes a file of back to back stream packets with a TOML stream layout
//! and reports what was found. Used by the `stream-decode` binary.

use anyhow::{bail, Context, Result};
use asphodel_decode::{streaming_counts, StreamLayout};
use asphodel_protocol::{unit_type_name, StreamingParams};
use log::{debug, warn};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Per channel totals of a decoded capture
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelSummary {
    pub stream_id: u8,
    pub name: String,
    pub unit: &'static str,
    pub subchannels: Vec<String>,
    pub samples: u64,
    /// Value of each subchannel in the last sample
    pub last: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaptureSummary {
    pub packets: usize,
    /// Bytes after the last whole packet
    pub trailing_bytes: usize,
    pub lost_packets: u64,
    pub unknown_ids: u64,
    pub channels: Vec<ChannelSummary>,
}

/// Load a stream layout and check that a decoder can be built from it
pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<StreamLayout> {
    let contents = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read layout file: {:?}", path.as_ref()))?;
    parse_layout(&contents)
}

pub fn parse_layout(contents: &str) -> Result<StreamLayout> {
    let layout: StreamLayout =
        toml::from_str(contents).with_context(|| "Failed to parse TOML stream layout")?;
    if layout.packet_length == 0 {
        bail!("Stream layout has no packet_length");
    }

    let decoder = layout
        .decoder()
        .map_err(|e| anyhow::anyhow!("Unusable stream layout: {}", e))?;
    if decoder.used_bits() > layout.packet_length * 8 {
        bail!(
            "Stream layout needs {} bits but packets are {} bytes",
            decoder.used_bits(),
            layout.packet_length
        );
    }
    Ok(layout)
}

/// Decode every whole packet of `data`. With `print_samples` each decoded
/// sample is written to stdout.
pub fn decode_capture(
    layout: &StreamLayout,
    data: &[u8],
    print_samples: bool,
) -> Result<CaptureSummary> {
    let mut decoder = layout
        .decoder()
        .map_err(|e| anyhow::anyhow!("Unusable stream layout: {}", e))?;

    let lost = Arc::new(Mutex::new(0u64));
    let unknown = Arc::new(Mutex::new(0u64));
    let mut channels = Vec::new();

    {
        let unknown = unknown.clone();
        decoder.add_unknown_id_callback(move |id, known| {
            warn!("Packet with unknown stream id {} (known: {:?})", id, known);
            *unknown.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        });
    }

    for (entry, stream) in layout.streams.iter().zip(decoder.streams_mut()) {
        let stream_id = entry.stream_id;
        let width = stream.counter_width();
        let lost = lost.clone();
        stream.add_lost_packet_callback(move |current, last| {
            let missing = width.gap(current, last);
            debug!("Stream {}: lost {} packets before {}", stream_id, missing, current);
            let mut total = lost.lock().unwrap_or_else(|e| e.into_inner());
            *total = total.saturating_add(missing);
        });

        for (info, channel) in entry.channels.iter().zip(stream.channels_mut()) {
            let summary = Arc::new(Mutex::new(ChannelSummary {
                stream_id,
                name: info.name.clone(),
                unit: unit_type_name(info.unit_type),
                subchannels: channel.subchannel_names().to_vec(),
                ..Default::default()
            }));
            let sink = summary.clone();
            let name = info.name.clone();
            channel.add_callback(move |counter, values, samples, subchannels| {
                let mut summary = sink.lock().unwrap_or_else(|e| e.into_inner());
                summary.samples += samples as u64;
                if let Some(last) = values.chunks(subchannels).last() {
                    summary.last = last.to_vec();
                }
                if print_samples {
                    for sample in values.chunks(subchannels) {
                        println!("{:>10} {:<24} {:?}", counter, name, sample);
                    }
                }
            });
            channels.push(summary);
        }
    }

    let packet_length = layout.packet_length;
    decoder.decode_batch(data, packet_length);

    let channels = channels
        .iter()
        .map(|summary| summary.lock().unwrap_or_else(|e| e.into_inner()).clone())
        .collect();
    let lost_packets = *lost.lock().unwrap_or_else(|e| e.into_inner());
    let unknown_ids = *unknown.lock().unwrap_or_else(|e| e.into_inner());

    Ok(CaptureSummary {
        packets: data.len() / packet_length,
        trailing_bytes: data.len() % packet_length,
        lost_packets,
        unknown_ids,
        channels,
    })
}

/// Capture summary as a TOML document
pub fn summary_toml(summary: &CaptureSummary) -> Result<String> {
    toml::to_string(summary).with_context(|| "Failed to serialize capture summary")
}

/// Streaming counts for every stream of the layout
pub fn plan(layout: &StreamLayout, response_time: f64, buffer_time: f64) -> Result<StreamingParams> {
    streaming_counts(&layout.stream_infos(), response_time, buffer_time)
        .map_err(|e| anyhow::anyhow!("Cannot plan streaming counts: {}", e))
}
