// Licensed under the Apache-2.0 license

//! Asphodel Device Handle
//!
//! One open device and its transaction layer. Requests are framed with a
//! transaction id, sent through the [`Transport`], and matched to replies
//! while the caller drives [`Device::poll`]. Blocking calls simply loop on
//! `poll` until their transaction resolves.
//!
//! ```text
//!   caller ──► start_transfer / transfer ──► TransactionTable ──► Transport::send
//!                                                  ▲
//!   caller ──► poll ──► Transport::poll ──► replies, stream packets, connect state
//! ```
//!
//! All completions run on the caller's thread from inside `poll`.

pub mod config;
pub mod streaming;
pub mod transaction;

pub use config::DeviceConfig;
pub use streaming::StreamCallback;
pub use transaction::{Transaction, TransactionTable};

use asphodel_protocol::{
    encode_request, parse_reply, AsphodelError, AsphodelResult, Command, ProtocolType, ReplyBody,
};
use asphodel_transport::{
    ReconnectTarget, Reconnected, Transport, TransportError, TransportEvent, TransportKind,
};
use log::{debug, info, trace, warn};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Stand-in deadline for timeouts too large to add to `Instant::now()`
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// `now + timeout`, saturating at a far future deadline so `Duration::MAX`
/// can mean "wait forever"
pub fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Completion of a callback style transfer
pub type TransferCallback = Box<dyn FnOnce(AsphodelResult<Vec<u8>>) + Send>;

/// Connect state notification: status and whether the device is reachable
pub type ConnectCallback = Box<dyn FnMut(AsphodelResult<()>, bool) + Send>;

/// Errors that belong to no particular call
pub type ErrorCallback = Box<dyn FnMut(AsphodelError) + Send>;

/// Lifecycle of a device handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Closed,
    Open,
    /// The transport went away; the handle must be reconnected
    Disconnected,
}

/// How a transfer treats the transport closing before the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Normal,
    /// Command that makes the device drop off the bus; a disconnect counts
    /// as success
    Reset,
}

enum Completion {
    Callback(TransferCallback),
    Blocking,
}

// per transaction bookkeeping kept in the table
struct Pending {
    kind: TransferKind,
    completion: Completion,
}

/// Device statistics
#[derive(Debug, Clone, Default)]
pub struct DeviceStatistics {
    pub transfers_sent: u64,
    pub transfers_succeeded: u64,
    pub transfers_failed: u64,
    pub transfers_timed_out: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub unmatched_replies: u64,
    pub stream_packets_received: u64,
}

/// Result of reconnecting a device
#[derive(Debug)]
pub struct Reconnection {
    pub device: Device,
    /// True when the old handle itself was reused
    pub reused: bool,
}

pub struct Device {
    transport: Box<dyn Transport>,
    config: DeviceConfig,
    state: DeviceState,
    table: TransactionTable<Pending>,
    finished: HashMap<u8, AsphodelResult<Vec<u8>>>,
    events: Vec<TransportEvent>,
    connected: bool,
    connect_callback: Option<ConnectCallback>,
    error_callback: Option<ErrorCallback>,
    streaming: Option<streaming::StreamingState>,
    stats: DeviceStatistics,
}

impl core::fmt::Debug for Device {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Device")
            .field("location", &self.transport.location())
            .field("kind", &self.transport.kind())
            .field("state", &self.state)
            .field("outstanding", &self.table.len())
            .finish()
    }
}

impl Device {
    /// Wrap a transport. The device starts closed.
    pub fn new(transport: Box<dyn Transport>, config: DeviceConfig) -> AsphodelResult<Self> {
        config.validate()?;
        let connected = transport.is_connected();

        Ok(Self {
            table: TransactionTable::new(config.transaction_table_size),
            transport,
            config,
            state: DeviceState::Closed,
            finished: HashMap::new(),
            events: Vec::new(),
            connected,
            connect_callback: None,
            error_callback: None,
            streaming: None,
            stats: DeviceStatistics::default(),
        })
    }

    pub fn open(&mut self) -> AsphodelResult<()> {
        if self.state == DeviceState::Open {
            return Ok(());
        }
        self.transport.open()?;
        self.state = DeviceState::Open;
        self.connected = self.transport.is_connected();
        info!("Opened device at {}", self.transport.location());
        Ok(())
    }

    /// Close the device. Outstanding transactions fail with `DeviceClosed`.
    pub fn close(&mut self) -> AsphodelResult<()> {
        if self.state == DeviceState::Closed {
            return Ok(());
        }

        if self.streaming.take().is_some() {
            warn!("Closing device with streaming still active");
            if let Err(error) = self.transport.stop_streaming() {
                warn!("Failed to stop streaming on close: {}", error);
            }
        }

        for (id, transaction) in self.table.drain() {
            self.complete(id, transaction, Err(AsphodelError::DeviceClosed));
        }
        self.finished.clear();

        self.state = DeviceState::Closed;
        info!("Closed device at {}", self.transport.location());
        self.transport.close().map_err(AsphodelError::from)
    }

    /// Release the handle and its transport
    pub fn free(self) {
        drop(self);
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn statistics(&self) -> &DeviceStatistics {
        &self.stats
    }

    pub fn outstanding_transactions(&self) -> usize {
        self.table.len()
    }

    pub fn transport_kind(&self) -> TransportKind {
        self.transport.kind()
    }

    pub fn location(&self) -> String {
        self.transport.location()
    }

    pub fn protocol_type(&self) -> ProtocolType {
        self.transport.protocol_type()
    }

    pub fn supports_rf_power_commands(&self) -> bool {
        self.protocol_type().rf_power()
    }

    pub fn supports_radio_commands(&self) -> bool {
        self.protocol_type().radio()
    }

    pub fn supports_remote_commands(&self) -> bool {
        self.protocol_type().remote()
    }

    pub fn supports_bootloader_commands(&self) -> bool {
        self.protocol_type().bootloader()
    }

    pub fn max_incoming_param_length(&self) -> usize {
        self.transport.max_incoming_param_length()
    }

    pub fn max_outgoing_param_length(&self) -> usize {
        self.transport.max_outgoing_param_length()
    }

    pub fn stream_packet_length(&self) -> usize {
        self.transport.stream_packet_length()
    }

    pub fn serial_number(&mut self) -> AsphodelResult<String> {
        self.ensure_open()?;
        Ok(self.transport.serial_number()?)
    }

    fn ensure_open(&self) -> AsphodelResult<()> {
        match self.state {
            DeviceState::Open => Ok(()),
            DeviceState::Closed => Err(AsphodelError::DeviceClosed),
            DeviceState::Disconnected => Err(AsphodelError::NoDevice),
        }
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    /// Send `command` and invoke `callback` from a later [`Device::poll`]
    pub fn start_transfer<F>(&mut self, command: u8, params: &[u8], callback: F) -> AsphodelResult<()>
    where
        F: FnOnce(AsphodelResult<Vec<u8>>) + Send + 'static,
    {
        let deadline = deadline_after(self.config.transaction_timeout());
        self.issue(
            command,
            params,
            TransferKind::Normal,
            Completion::Callback(Box::new(callback)),
            deadline,
        )
        .map(|_| ())
    }

    /// Like [`Device::start_transfer`] for commands that reset the device
    pub fn start_transfer_reset<F>(
        &mut self,
        command: u8,
        params: &[u8],
        callback: F,
    ) -> AsphodelResult<()>
    where
        F: FnOnce(AsphodelResult<Vec<u8>>) + Send + 'static,
    {
        let deadline = deadline_after(self.config.transaction_timeout());
        self.issue(
            command,
            params,
            TransferKind::Reset,
            Completion::Callback(Box::new(callback)),
            deadline,
        )
        .map(|_| ())
    }

    /// Blocking transfer with the configured timeout
    pub fn transfer(&mut self, command: u8, params: &[u8]) -> AsphodelResult<Vec<u8>> {
        let timeout = self.config.transfer_timeout();
        self.transfer_with_timeout(command, params, timeout)
    }

    pub fn transfer_with_timeout(
        &mut self,
        command: u8,
        params: &[u8],
        timeout: Duration,
    ) -> AsphodelResult<Vec<u8>> {
        self.blocking(command, params, TransferKind::Normal, timeout)
    }

    /// Blocking reset style transfer; the device disconnecting is success
    pub fn transfer_reset(&mut self, command: u8, params: &[u8]) -> AsphodelResult<()> {
        let timeout = self.config.transfer_timeout();
        self.blocking(command, params, TransferKind::Reset, timeout)
            .map(|_| ())
    }

    /// Blocking transfer of a known command, choosing the reset style
    /// variant for commands that drop the device off the bus
    pub fn command(&mut self, command: Command, params: &[u8]) -> AsphodelResult<Vec<u8>> {
        if command.is_reset_style() {
            self.transfer_reset(command.code(), params)?;
            return Ok(Vec::new());
        }
        self.transfer(command.code(), params)
    }

    fn blocking(
        &mut self,
        command: u8,
        params: &[u8],
        kind: TransferKind,
        timeout: Duration,
    ) -> AsphodelResult<Vec<u8>> {
        let deadline = deadline_after(timeout);
        let id = self.issue(command, params, kind, Completion::Blocking, deadline)?;

        loop {
            if let Some(result) = self.finished.remove(&id) {
                return result;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if let Err(error) = self.poll(remaining.min(self.config.poll_interval())) {
                self.table.take(id);
                self.finished.remove(&id);
                return Err(error);
            }
        }
    }

    fn issue(
        &mut self,
        command: u8,
        params: &[u8],
        kind: TransferKind,
        completion: Completion,
        deadline: Instant,
    ) -> AsphodelResult<u8> {
        self.ensure_open()?;
        if params.len() > self.transport.max_outgoing_param_length() {
            return Err(AsphodelError::OutgoingPacketTooLong);
        }

        let id = self.table.allocate(Transaction {
            command,
            deadline,
            data: Pending { kind, completion },
        })?;
        let frame = encode_request(id, command, params);
        trace!("tx {:02X?}", frame);

        self.stats.transfers_sent += 1;
        self.stats.bytes_sent += frame.len() as u64;

        if let Err(error) = self.transport.send(&frame) {
            let transaction = self.table.take(id);
            if error.is_disconnect() {
                if let Some(transaction) = transaction.filter(|t| t.data.kind == TransferKind::Reset)
                {
                    debug!("Reset command 0x{:02X} closed the transport on send", command);
                    self.complete(id, transaction, Ok(Vec::new()));
                    self.mark_disconnected();
                    return Ok(id);
                }
                self.mark_disconnected();
            }
            self.stats.transfers_failed += 1;
            warn!("Failed to send command 0x{:02X}: {}", command, error);
            return Err(error.into());
        }

        debug!("Issued command 0x{:02X} as transaction {}", command, id);
        Ok(id)
    }

    fn complete(
        &mut self,
        id: u8,
        transaction: Transaction<Pending>,
        result: AsphodelResult<Vec<u8>>,
    ) {
        match &result {
            Ok(_) => self.stats.transfers_succeeded += 1,
            Err(AsphodelError::Timeout) => {
                self.stats.transfers_failed += 1;
                self.stats.transfers_timed_out += 1;
            }
            Err(_) => self.stats.transfers_failed += 1,
        }
        debug!(
            "Transaction {} (command 0x{:02X}) finished: {:?}",
            id,
            transaction.command,
            result.as_ref().map(|params| params.len())
        );

        match transaction.data.completion {
            Completion::Callback(callback) => callback(result),
            Completion::Blocking => {
                self.finished.insert(id, result);
            }
        }
    }

    // ========================================================================
    // Polling
    // ========================================================================

    /// Wait up to `timeout` for transport activity and run every completion
    /// it produced. Expired transactions fail with `Timeout`.
    pub fn poll(&mut self, timeout: Duration) -> AsphodelResult<()> {
        let polled = match self.state {
            DeviceState::Closed => return Err(AsphodelError::DeviceClosed),
            DeviceState::Disconnected => Ok(()),
            DeviceState::Open => {
                let mut events = std::mem::take(&mut self.events);
                let polled = self.transport.poll(timeout, &mut events);
                for event in events.drain(..) {
                    self.handle_event(event);
                }
                self.events = events;
                polled
            }
        };

        for (id, transaction) in self.table.take_expired(Instant::now()) {
            warn!(
                "Transaction {} (command 0x{:02X}) timed out",
                id, transaction.command
            );
            self.complete(id, transaction, Err(AsphodelError::Timeout));
        }

        match polled {
            Ok(()) => Ok(()),
            Err(TransportError::Disconnected) | Err(TransportError::NoDevice) => {
                self.mark_disconnected();
                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }

    fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Reply(frame) => self.handle_reply(&frame),
            TransportEvent::StreamPackets(data) => self.deliver_stream(Ok(data)),
            TransportEvent::StreamFault(error) => self.deliver_stream(Err(error.into())),
            TransportEvent::Connected(connected) => self.set_connected(connected),
            TransportEvent::Disconnected => self.mark_disconnected(),
            TransportEvent::SendFailed {
                transaction_id,
                error,
            } => {
                let pending = transaction_id.and_then(|id| self.table.take(id).map(|t| (id, t)));
                match pending {
                    Some((id, transaction)) => {
                        let result =
                            if transaction.data.kind == TransferKind::Reset && error.is_disconnect() {
                                Ok(Vec::new())
                            } else {
                                Err(error.into())
                            };
                        self.complete(id, transaction, result);
                    }
                    None => self.report_error(error.into()),
                }
            }
        }
    }

    fn handle_reply(&mut self, frame: &[u8]) {
        trace!("rx {:02X?}", frame);
        self.stats.bytes_received += frame.len() as u64;

        let Some(reply) = parse_reply(frame) else {
            warn!("Dropping empty reply frame");
            self.report_error(AsphodelError::MalformedReply);
            return;
        };

        let Some(transaction) = self.table.take(reply.transaction_id) else {
            warn!("Reply for unknown transaction {}", reply.transaction_id);
            self.stats.unmatched_replies += 1;
            self.report_error(AsphodelError::MismatchedTransaction);
            return;
        };

        let result = match reply.body {
            ReplyBody::Error(error) => Err(error),
            ReplyBody::Payload { command, .. } if command != transaction.command => {
                warn!(
                    "Transaction {} expected command 0x{:02X}, got 0x{:02X}",
                    reply.transaction_id, transaction.command, command
                );
                Err(AsphodelError::MismatchedCommand)
            }
            ReplyBody::Payload { params, .. } => Ok(params),
        };
        self.complete(reply.transaction_id, transaction, result);
    }

    fn mark_disconnected(&mut self) {
        if self.state == DeviceState::Open {
            info!("Device at {} disconnected", self.transport.location());
            self.state = DeviceState::Disconnected;
        }
        if self.streaming.take().is_some() {
            warn!("Streaming stopped by disconnect");
        }
        for (id, transaction) in self.table.drain() {
            let result = match transaction.data.kind {
                TransferKind::Reset => Ok(Vec::new()),
                TransferKind::Normal => Err(AsphodelError::NoDevice),
            };
            self.complete(id, transaction, result);
        }
        self.set_connected(false);
    }

    fn report_error(&mut self, error: AsphodelError) {
        warn!("Device error outside of a transfer: {}", error);
        if let Some(callback) = self.error_callback.as_mut() {
            callback(error);
        }
    }

    // ========================================================================
    // Connect and error callbacks
    // ========================================================================

    /// Register a connect callback. It is invoked once right away with the
    /// current state and again whenever the state changes.
    pub fn set_connect_callback<F>(&mut self, callback: F)
    where
        F: FnMut(AsphodelResult<()>, bool) + Send + 'static,
    {
        let mut callback: ConnectCallback = Box::new(callback);
        callback(Ok(()), self.connected);
        self.connect_callback = Some(callback);
    }

    pub fn clear_connect_callback(&mut self) {
        self.connect_callback = None;
    }

    pub fn set_error_callback<F>(&mut self, callback: F)
    where
        F: FnMut(AsphodelError) + Send + 'static,
    {
        self.error_callback = Some(Box::new(callback));
    }

    pub fn clear_error_callback(&mut self) {
        self.error_callback = None;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    fn set_connected(&mut self, connected: bool) {
        if self.connected == connected {
            return;
        }
        self.connected = connected;
        debug!("Connect state of {} is now {}", self.transport.location(), connected);
        if let Some(callback) = self.connect_callback.as_mut() {
            callback(Ok(()), connected);
        }
    }

    /// Poll until the device reports connected
    pub fn wait_for_connect(&mut self, timeout: Duration) -> AsphodelResult<()> {
        let deadline = deadline_after(timeout);
        loop {
            self.ensure_open()?;
            if self.connected {
                return Ok(());
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(AsphodelError::Timeout);
            }
            self.poll(remaining.min(self.config.poll_interval()))?;
        }
    }

    // ========================================================================
    // Remote and reconnect
    // ========================================================================

    /// Handle for the remote device reached through this radio. The new
    /// handle starts closed.
    pub fn remote_device(&mut self) -> AsphodelResult<Device> {
        if !self.supports_radio_commands() {
            return Err(AsphodelError::NotSupported);
        }
        let transport = self.transport.remote()?;
        Device::new(transport, self.config.clone())
    }

    /// Find the device again after a reset. Consumes the handle; the
    /// returned [`Reconnection`] says whether it was reused.
    pub fn reconnect(self) -> AsphodelResult<Reconnection> {
        let timeout = self.config.connect_timeout();
        self.reconnect_to(ReconnectTarget::Any, timeout)
    }

    pub fn reconnect_bootloader(self) -> AsphodelResult<Reconnection> {
        let timeout = self.config.connect_timeout();
        self.reconnect_to(ReconnectTarget::Bootloader, timeout)
    }

    pub fn reconnect_application(self) -> AsphodelResult<Reconnection> {
        let timeout = self.config.connect_timeout();
        self.reconnect_to(ReconnectTarget::Application, timeout)
    }

    pub fn reconnect_to(
        mut self,
        target: ReconnectTarget,
        timeout: Duration,
    ) -> AsphodelResult<Reconnection> {
        self.streaming = None;
        for (id, transaction) in self.table.drain() {
            let result = match transaction.data.kind {
                TransferKind::Reset => Ok(Vec::new()),
                TransferKind::Normal => Err(AsphodelError::NoDevice),
            };
            self.complete(id, transaction, result);
        }
        self.finished.clear();

        match self.transport.reconnect(target, timeout)? {
            Reconnected::Same => {
                self.state = DeviceState::Open;
                self.connected = self.transport.is_connected();
                info!("Reconnected device at {} in place", self.transport.location());
                Ok(Reconnection {
                    device: self,
                    reused: true,
                })
            }
            Reconnected::New(transport) => {
                let mut device = Device::new(transport, self.config.clone())?;
                device.open()?;
                info!(
                    "Reconnected device from {} to {}",
                    self.transport.location(),
                    device.location()
                );
                drop(self);
                Ok(Reconnection {
                    device,
                    reused: false,
                })
            }
        }
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        if let Err(error) = self.close() {
            warn!("Error closing device on drop: {}", error);
        }
    }
}
