// Licensed under the Apache-2.0 license

//! Device Decoding
//!
//! Routes packets carrying several streams to the matching stream decoder
//! by the stream id that follows the device level filler bits.

use crate::stream::StreamDecoder;
use asphodel_protocol::{AsphodelError, AsphodelResult, ChannelInfo, StreamInfo};
use log::warn;

/// Unknown id callback: the id found and the ids this decoder knows
pub type UnknownIdCallback = Box<dyn FnMut(u8, &[u8]) + Send>;

/// One stream with the descriptors of its channels
#[derive(Debug, Clone)]
pub struct StreamAndChannels<'a> {
    pub stream_id: u8,
    pub stream: &'a StreamInfo,
    pub channels: Vec<&'a ChannelInfo>,
}

pub struct DeviceDecoder<'a> {
    id_byte_offset: Option<usize>,
    stream_ids: Vec<u8>,
    streams: Vec<StreamDecoder<'a>>,
    unknown_id_callbacks: Vec<UnknownIdCallback>,
    used_bits: usize,
}

impl<'a> DeviceDecoder<'a> {
    /// `id_bits` is 0 when the device has a single stream and no id field,
    /// otherwise 8 with the id starting on a byte boundary.
    pub fn new(
        entries: &[StreamAndChannels<'a>],
        filler_bits: u8,
        id_bits: u8,
    ) -> AsphodelResult<Self> {
        if entries.is_empty() {
            return Err(AsphodelError::BadParameter);
        }

        let filler_bits = usize::from(filler_bits);
        let (id_byte_offset, stream_offset) = match id_bits {
            0 if entries.len() == 1 => (None, filler_bits),
            8 if filler_bits % 8 == 0 => (Some(filler_bits / 8), filler_bits + 8),
            _ => return Err(AsphodelError::StreamIdFormatUnsupported),
        };

        let mut stream_ids = Vec::with_capacity(entries.len());
        let mut streams = Vec::with_capacity(entries.len());
        for entry in entries {
            if stream_ids.contains(&entry.stream_id) {
                return Err(AsphodelError::BadParameter);
            }
            streams.push(StreamDecoder::new(
                entry.stream,
                &entry.channels,
                stream_offset,
            )?);
            stream_ids.push(entry.stream_id);
        }

        let used_bits = streams
            .iter()
            .map(StreamDecoder::used_bits)
            .max()
            .unwrap_or(stream_offset);

        Ok(Self {
            id_byte_offset,
            stream_ids,
            streams,
            unknown_id_callbacks: Vec::new(),
            used_bits,
        })
    }

    pub fn id_byte_offset(&self) -> Option<usize> {
        self.id_byte_offset
    }

    pub fn stream_ids(&self) -> &[u8] {
        &self.stream_ids
    }

    /// Highest bit consumed by any stream
    pub fn used_bits(&self) -> usize {
        self.used_bits
    }

    pub fn streams(&self) -> &[StreamDecoder<'a>] {
        &self.streams
    }

    pub fn streams_mut(&mut self) -> &mut [StreamDecoder<'a>] {
        &mut self.streams
    }

    pub fn stream_mut(&mut self, stream_id: u8) -> Option<&mut StreamDecoder<'a>> {
        let index = self.stream_ids.iter().position(|&id| id == stream_id)?;
        self.streams.get_mut(index)
    }

    pub fn add_unknown_id_callback<F>(&mut self, callback: F)
    where
        F: FnMut(u8, &[u8]) + Send + 'static,
    {
        self.unknown_id_callbacks.push(Box::new(callback));
    }

    pub fn clear_unknown_id_callbacks(&mut self) {
        self.unknown_id_callbacks.clear();
    }

    pub fn reset(&mut self) {
        for stream in self.streams.iter_mut() {
            stream.reset();
        }
    }

    /// Decode one packet. Unknown ids go to the unknown id callbacks and
    /// the packet is dropped.
    pub fn decode(&mut self, packet: &[u8]) {
        let Some(id_offset) = self.id_byte_offset else {
            if let Some(stream) = self.streams.first_mut() {
                stream.decode(packet);
            }
            return;
        };

        let Some(&id) = packet.get(id_offset) else {
            warn!("Dropping {} byte packet with no stream id", packet.len());
            return;
        };

        match self.stream_ids.iter().position(|&known| known == id) {
            Some(index) => {
                self.streams[index].decode(packet);
            }
            None => {
                for callback in self.unknown_id_callbacks.iter_mut() {
                    callback(id, &self.stream_ids);
                }
            }
        }
    }

    /// Decode a batch of back to back packets of `packet_length` bytes
    pub fn decode_batch(&mut self, data: &[u8], packet_length: usize) {
        if packet_length == 0 {
            return;
        }
        for packet in data.chunks_exact(packet_length) {
            self.decode(packet);
        }
    }
}
