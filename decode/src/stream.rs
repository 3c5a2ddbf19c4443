// Licensed under the Apache-2.0 license

//! Stream Decoding
//!
//! Packet layout from the stream's bit offset: filler bits, the counter,
//! then each channel (its own filler followed by its data bits) in
//! `channel_index_list` order.

use crate::channel::ChannelDecoder;
use crate::counter::{CounterDecoder, CounterUpdate, CounterWidth};
use asphodel_protocol::{AsphodelError, AsphodelResult, ChannelInfo, StreamInfo};
use log::warn;

/// Lost packet callback: current count and last count
pub type LostPacketCallback = Box<dyn FnMut(u64, u64) + Send>;

pub struct StreamDecoder<'a> {
    info: &'a StreamInfo,
    bit_offset: usize,
    counter: CounterDecoder,
    channels: Vec<ChannelDecoder<'a>>,
    lost_packet_callbacks: Vec<LostPacketCallback>,
    used_bits: usize,
}

impl<'a> StreamDecoder<'a> {
    /// `channels` holds the descriptors of `info.channel_index_list`, in
    /// the same order
    pub fn new(
        info: &'a StreamInfo,
        channels: &[&'a ChannelInfo],
        bit_offset: usize,
    ) -> AsphodelResult<Self> {
        if channels.len() != info.channel_count() {
            return Err(AsphodelError::BadParameter);
        }

        let counter = CounterDecoder::new(
            info.counter_bits,
            bit_offset + usize::from(info.filler_bits),
        )?;

        let mut next = counter.end_bit();
        let mut decoders = Vec::with_capacity(channels.len());
        for channel in channels {
            let decoder = ChannelDecoder::new(channel, next)?;
            next = decoder.end_bit();
            decoders.push(decoder);
        }

        Ok(Self {
            info,
            bit_offset,
            counter,
            channels: decoders,
            lost_packet_callbacks: Vec::new(),
            used_bits: next,
        })
    }

    pub fn info(&self) -> &'a StreamInfo {
        self.info
    }

    pub fn bit_offset(&self) -> usize {
        self.bit_offset
    }

    pub fn counter_byte_offset(&self) -> usize {
        self.counter.byte_offset()
    }

    /// First bit after the last channel
    pub fn used_bits(&self) -> usize {
        self.used_bits
    }

    pub fn counter_width(&self) -> CounterWidth {
        self.counter.width()
    }

    pub fn last_count(&self) -> Option<u64> {
        self.counter.last_count()
    }

    pub fn channels(&self) -> &[ChannelDecoder<'a>] {
        &self.channels
    }

    pub fn channels_mut(&mut self) -> &mut [ChannelDecoder<'a>] {
        &mut self.channels
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut ChannelDecoder<'a>> {
        self.channels.get_mut(index)
    }

    pub fn add_lost_packet_callback<F>(&mut self, callback: F)
    where
        F: FnMut(u64, u64) + Send + 'static,
    {
        self.lost_packet_callbacks.push(Box::new(callback));
    }

    pub fn clear_lost_packet_callbacks(&mut self) {
        self.lost_packet_callbacks.clear();
    }

    /// Forget the last counter so the next packet starts a new sequence
    pub fn reset(&mut self) {
        self.counter.reset();
        for channel in self.channels.iter_mut() {
            channel.reset();
        }
    }

    /// Decode one packet. Packets too short for the layout are dropped.
    pub fn decode(&mut self, packet: &[u8]) -> Option<CounterUpdate> {
        if packet.len() * 8 < self.used_bits {
            warn!(
                "Dropping {} byte packet, stream layout needs {} bits",
                packet.len(),
                self.used_bits
            );
            return None;
        }

        let update = self.counter.update(self.counter.read(packet));
        if let Some(last) = update.last {
            if update.lost() != 0 {
                for callback in self.lost_packet_callbacks.iter_mut() {
                    callback(update.current, last);
                }
            }
        }

        for channel in self.channels.iter_mut() {
            channel.decode(update.current, packet);
        }
        Some(update)
    }
}
