// Licensed under the Apache-2.0 license

//! Asphodel Stream Decoding
//!
//! Three level decoding of stream packets:
//!
//! ```text
//!   DeviceDecoder   reads the stream id, routes the packet
//!        │
//!   StreamDecoder   unwraps the counter, reports lost packets
//!        │
//!   ChannelDecoder  extracts bits, calibrates, emits samples
//! ```
//!
//! Decoders borrow the stream and channel descriptors they were built
//! from; [`StreamLayout`] owns a full set of descriptors for that purpose.

pub mod channel;
pub mod channel_specific;
pub mod counter;
pub mod device;
pub mod layout;
pub mod planner;
pub mod stream;

pub use channel::{ChannelDecoder, SampleCallback};
pub use channel_specific::*;
pub use counter::{CounterDecoder, CounterUpdate, CounterWidth};
pub use device::{DeviceDecoder, StreamAndChannels, UnknownIdCallback};
pub use layout::{StreamEntry, StreamLayout};
pub use planner::streaming_counts;
pub use stream::{LostPacketCallback, StreamDecoder};
