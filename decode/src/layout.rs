// Licensed under the Apache-2.0 license

//! Owned stream layout
//!
//! Holds every descriptor a [`DeviceDecoder`] borrows, so a decoder tree
//! can be built from one snapshot and never outlive it.

use crate::device::{DeviceDecoder, StreamAndChannels};
use asphodel_protocol::{AsphodelError, AsphodelResult, ChannelInfo, StreamInfo};
use serde::{Deserialize, Serialize};

/// One stream and the channels listed by its `channel_index_list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEntry {
    pub stream_id: u8,
    pub stream: StreamInfo,
    pub channels: Vec<ChannelInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamLayout {
    /// Device level filler bits before the stream id
    #[serde(default)]
    pub filler_bits: u8,
    #[serde(default)]
    pub id_bits: u8,
    /// Size of one packet; informational for captures
    #[serde(default)]
    pub packet_length: usize,
    #[serde(default)]
    pub streams: Vec<StreamEntry>,
}

impl StreamLayout {
    /// Resolve each stream's channel indices against the device's channel
    /// table
    pub fn from_device_tables(
        filler_bits: u8,
        id_bits: u8,
        packet_length: usize,
        streams: Vec<StreamInfo>,
        channels: &[ChannelInfo],
    ) -> AsphodelResult<Self> {
        let streams = streams
            .into_iter()
            .enumerate()
            .map(|(index, stream)| {
                let stream_channels = stream
                    .channel_index_list
                    .iter()
                    .map(|&i| {
                        channels
                            .get(usize::from(i))
                            .cloned()
                            .ok_or(AsphodelError::BadParameter)
                    })
                    .collect::<AsphodelResult<Vec<_>>>()?;
                let stream_id = u8::try_from(index).map_err(|_| AsphodelError::BadParameter)?;
                Ok(StreamEntry {
                    stream_id,
                    stream,
                    channels: stream_channels,
                })
            })
            .collect::<AsphodelResult<Vec<_>>>()?;

        Ok(Self {
            filler_bits,
            id_bits,
            packet_length,
            streams,
        })
    }

    pub fn stream_infos(&self) -> Vec<&StreamInfo> {
        self.streams.iter().map(|entry| &entry.stream).collect()
    }

    /// Build a decoder tree borrowing this layout
    pub fn decoder(&self) -> AsphodelResult<DeviceDecoder<'_>> {
        let entries: Vec<StreamAndChannels<'_>> = self
            .streams
            .iter()
            .map(|entry| StreamAndChannels {
                stream_id: entry.stream_id,
                stream: &entry.stream,
                channels: entry.channels.iter().collect(),
            })
            .collect();
        DeviceDecoder::new(&entries, self.filler_bits, self.id_bits)
    }
}
