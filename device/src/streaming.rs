// Licensed under the Apache-2.0 license

//! Stream packet plumbing of a device handle

use crate::Device;
use asphodel_protocol::{AsphodelError, AsphodelResult, StreamingParams};
use log::{info, warn};
use std::time::Duration;

/// Receives batches of whole stream packets: the batch (or the error that
/// ended it), the packet size and the packet count.
pub type StreamCallback = Box<dyn FnMut(AsphodelResult<&[u8]>, usize, usize) + Send>;

pub(crate) struct StreamingState {
    callback: StreamCallback,
    packet_length: usize,
}

impl Device {
    /// Start continuous packet transfers; batches arrive through `callback`
    /// during [`Device::poll`]
    pub fn start_streaming_packets<F>(
        &mut self,
        params: &StreamingParams,
        callback: F,
    ) -> AsphodelResult<()>
    where
        F: FnMut(AsphodelResult<&[u8]>, usize, usize) + Send + 'static,
    {
        self.ensure_open()?;
        if params.packet_count == 0 || params.transfer_count == 0 {
            return Err(AsphodelError::BadParameter);
        }
        if self.streaming.is_some() {
            return Err(AsphodelError::Busy);
        }

        let packet_length = self.transport.stream_packet_length();
        if packet_length == 0 {
            return Err(AsphodelError::BadStreamPacketSize);
        }

        self.transport.start_streaming(params)?;
        self.streaming = Some(StreamingState {
            callback: Box::new(callback),
            packet_length,
        });
        info!(
            "Streaming started: {} packets x {} transfers, timeout {} ms",
            params.packet_count, params.transfer_count, params.timeout_ms
        );
        Ok(())
    }

    pub fn stop_streaming_packets(&mut self) -> AsphodelResult<()> {
        if self.streaming.take().is_some() {
            self.transport.stop_streaming()?;
            info!("Streaming stopped");
        }
        Ok(())
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming.is_some()
    }

    /// Read stream packets without a callback. `byte_count` must be a
    /// whole number of packets.
    pub fn get_stream_packets_blocking(
        &mut self,
        byte_count: usize,
        timeout: Duration,
    ) -> AsphodelResult<Vec<u8>> {
        self.ensure_open()?;
        let packet_length = self.transport.stream_packet_length();
        if packet_length == 0 || byte_count % packet_length != 0 {
            return Err(AsphodelError::BadParameter);
        }

        let mut buffer = vec![0u8; byte_count];
        let read = self.transport.read_stream_packets(&mut buffer, timeout)?;
        if read % packet_length != 0 {
            return Err(AsphodelError::BadStreamPacketSize);
        }
        buffer.truncate(read);
        self.stats.stream_packets_received += (read / packet_length) as u64;
        Ok(buffer)
    }

    pub(crate) fn deliver_stream(&mut self, batch: AsphodelResult<Vec<u8>>) {
        let Some(state) = self.streaming.as_mut() else {
            warn!("Dropping stream data with no streaming callback");
            return;
        };
        let packet_length = state.packet_length;

        match batch {
            Ok(data) if data.len() % packet_length != 0 => {
                warn!(
                    "Stream batch of {} bytes is not a multiple of {}",
                    data.len(),
                    packet_length
                );
                (state.callback)(Err(AsphodelError::BadStreamPacketSize), packet_length, 0);
            }
            Ok(data) => {
                let count = data.len() / packet_length;
                self.stats.stream_packets_received += count as u64;
                (state.callback)(Ok(&data), packet_length, count);
            }
            Err(error) => {
                warn!("Stream transfer failed: {}", error);
                (state.callback)(Err(error), packet_length, 0);
            }
        }
    }
}
