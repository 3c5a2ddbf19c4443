// Licensed under the Apache-2.0 license

//! Stream Descriptors

use serde::{Deserialize, Serialize};

/// Format of one stream as reported by the device
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamInfo {
    /// Indices into the device's channel table, in packet order
    pub channel_index_list: Vec<u8>,
    /// Padding before the counter
    pub filler_bits: u8,
    /// Width of the per packet counter
    pub counter_bits: u8,
    /// Packets per second
    pub rate: f32,
    pub rate_error: f32,
    /// Seconds before data is valid after enabling
    pub warm_up_delay: f32,
}

impl StreamInfo {
    pub fn channel_count(&self) -> usize {
        self.channel_index_list.len()
    }
}

/// Reply of GET_STREAM_COUNT_AND_ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreamCountAndId {
    pub count: u8,
    /// Padding before the stream id in every packet
    pub filler_bits: u8,
    /// Width of the stream id, zero when only one stream exists
    pub id_bits: u8,
}

/// Enable and warm up state of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreamStatus {
    pub enable: bool,
    pub warm_up: bool,
}

/// Relation between a stream's rate and one of its channels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamRateInfo {
    pub available: bool,
    pub channel_index: u8,
    pub invert: bool,
    pub scale: f32,
    pub offset: f32,
}
