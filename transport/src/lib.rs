// Licensed under the Apache-2.0 license

//! Asphodel Transport Layer
//!
//! The seam between the transaction layer and a concrete link (USB bulk
//! endpoints, TCP sockets, a radio relaying to a remote). Implementations
//! live outside this workspace; the host library only drives this trait.

pub mod error;

pub use error::{TransportError, TransportResult};

use asphodel_protocol::{ProtocolType, StreamingParams};
use std::time::Duration;

/// Kind of link a device is attached through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Usb,
    Tcp,
    Remote,
    Virtual,
}

impl TransportKind {
    pub fn name(&self) -> &'static str {
        match self {
            TransportKind::Usb => "USB",
            TransportKind::Tcp => "TCP",
            TransportKind::Remote => "Remote",
            TransportKind::Virtual => "Virtual",
        }
    }
}

/// Completion surfaced by [`Transport::poll`], in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A complete reply frame
    Reply(Vec<u8>),

    /// One or more whole stream packets
    StreamPackets(Vec<u8>),

    /// A streaming transfer failed
    StreamFault(TransportError),

    /// Remote connection state changed
    Connected(bool),

    /// The transport closed underneath the device
    Disconnected,

    /// An outgoing frame failed after it was accepted by `send`. The
    /// transaction id is the first byte of the frame when known.
    SendFailed {
        transaction_id: Option<u8>,
        error: TransportError,
    },
}

/// Which firmware image to reconnect to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectTarget {
    Any,
    Bootloader,
    Application,
}

/// Outcome of [`Transport::reconnect`]
pub enum Reconnected {
    /// The same transport is usable again and already open
    Same,
    /// A different, not yet opened transport for the same device
    New(Box<dyn Transport>),
}

/// Transport trait for device communication.
///
/// All asynchronous completions are delivered from [`Transport::poll`]; a
/// transport never calls back into the host on its own thread.
pub trait Transport: Send {
    fn kind(&self) -> TransportKind;

    fn protocol_type(&self) -> ProtocolType;

    /// Stable while the device stays connected
    fn location(&self) -> String;

    fn max_incoming_param_length(&self) -> usize;

    fn max_outgoing_param_length(&self) -> usize;

    /// Size of one stream packet on this link
    fn stream_packet_length(&self) -> usize;

    fn open(&mut self) -> TransportResult<()>;

    fn close(&mut self) -> TransportResult<()>;

    fn serial_number(&mut self) -> TransportResult<String>;

    /// Whether a remote link currently reaches its device. Direct links are
    /// always connected.
    fn is_connected(&self) -> bool {
        true
    }

    /// Queue one request frame
    fn send(&mut self, frame: &[u8]) -> TransportResult<()>;

    /// Wait up to `timeout` for completions and append them to `events`
    fn poll(&mut self, timeout: Duration, events: &mut Vec<TransportEvent>) -> TransportResult<()>;

    /// Begin continuous packet transfers
    fn start_streaming(&mut self, params: &StreamingParams) -> TransportResult<()>;

    fn stop_streaming(&mut self) -> TransportResult<()>;

    /// Blocking read of whole stream packets into `buf`; returns the byte
    /// count read
    fn read_stream_packets(&mut self, buf: &mut [u8], timeout: Duration)
        -> TransportResult<usize>;

    /// Transport for the remote device behind a radio
    fn remote(&mut self) -> TransportResult<Box<dyn Transport>> {
        Err(TransportError::NotSupported("remote devices"))
    }

    /// Find the device again after a reset or disconnect
    fn reconnect(
        &mut self,
        target: ReconnectTarget,
        timeout: Duration,
    ) -> TransportResult<Reconnected>;
}
