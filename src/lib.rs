// Licensed under the Apache-2.0 license

//! Asphodel Host Library
//!
//! Host side of the Asphodel sensor protocol: transactions over a pluggable
//! transport, typed device commands, and decoding of streaming packets into
//! calibrated samples.
//!
//! - **protocol**: Command table, error taxonomy, framing and wire layouts
//! - **transport**: The transport capability a device handle drives
//! - **device**: Device handle, transaction table and streaming plumbing
//! - **commands**: High-level API functions for device commands
//! - **decode**: Stream, channel and device packet decoders plus the
//!   streaming planner
//!
//! ## Architecture Overview
//!
//! ```text
//!     ┌─────────────────┐    ┌─────────────────┐
//!     │ asphodel-       │    │ asphodel-       │
//!     │ commands        │    │ decode          │
//!     │ (High-level API)│    │ (Packet decode) │
//!     └─────────────────┘    └─────────────────┘
//!              │                       │
//!     ┌──────────────────┐             │
//!     │ asphodel-device  │             │
//!     │ (Transactions)   │             │
//!     └──────────────────┘             │
//!              │                       │
//!     ┌──────────────────┐    ┌─────────────────┐
//!     │ asphodel-        │    │ asphodel-       │
//!     │ transport        │    │ protocol        │
//!     │ (USB, TCP, ...)  │    │ (Type Defs)     │
//!     └──────────────────┘    └─────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use asphodel_host::{api, Device, DeviceConfig};
//!
//! let mut device = Device::new(Box::new(my_transport), DeviceConfig::default())?;
//! device.open()?;
//!
//! let version = api::get_protocol_version(&mut device)?;
//! let layout = api::fetch_stream_layout(&mut device)?;
//! let mut decoder = layout.decoder()?;
//! ```

pub use asphodel_commands::{api, packing};
pub use asphodel_decode::{
    streaming_counts, ChannelDecoder, CounterDecoder, DeviceDecoder, StreamDecoder, StreamLayout,
};
pub use asphodel_device::{Device, DeviceConfig, DeviceState, DeviceStatistics, Reconnection};
pub use asphodel_protocol::{
    error_name, AsphodelError, AsphodelResult, ChannelInfo, Command, StreamInfo, StreamingParams,
};
pub use asphodel_transport::{Transport, TransportError, TransportEvent, TransportKind};
