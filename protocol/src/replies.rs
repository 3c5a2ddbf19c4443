// Licensed under the Apache-2.0 license

//! Fixed Size Payloads
//!
//! Request and reply payloads with a fixed layout. Multi-byte fields are
//! big-endian on the wire.

use crate::{
    ChannelCalibration, CtrlVarInfo, ExtraScanResult, ProtocolType, RadioStatus, RemoteStatus,
    StreamCountAndId, StreamInfo, StreamRateInfo, StreamStatus, SupplyCheck, SupplyInfo,
};
use zerocopy::byteorder::big_endian::{F32, I16, I32, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

// ============================================================================
// Streams (0x20-0x26)
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct StreamCountAndIdReply {
    pub count: u8,
    pub filler_bits: u8,
    pub id_bits: u8,
}

impl From<StreamCountAndIdReply> for StreamCountAndId {
    fn from(reply: StreamCountAndIdReply) -> Self {
        Self {
            count: reply.count,
            filler_bits: reply.filler_bits,
            id_bits: reply.id_bits,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct StreamFormatReply {
    pub filler_bits: u8,
    pub counter_bits: u8,
    pub rate: F32,
    pub rate_error: F32,
    pub warm_up_delay: F32,
}

impl StreamFormatReply {
    /// Combine with the separately fetched channel list
    pub fn into_stream_info(self, channel_index_list: Vec<u8>) -> StreamInfo {
        StreamInfo {
            channel_index_list,
            filler_bits: self.filler_bits,
            counter_bits: self.counter_bits,
            rate: self.rate.get(),
            rate_error: self.rate_error.get(),
            warm_up_delay: self.warm_up_delay.get(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct StreamStatusReply {
    pub enable: u8,
    pub warm_up: u8,
}

impl From<StreamStatusReply> for StreamStatus {
    fn from(reply: StreamStatusReply) -> Self {
        Self {
            enable: reply.enable != 0,
            warm_up: reply.warm_up != 0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct StreamRateInfoReply {
    pub available: u8,
    pub channel_index: u8,
    pub invert: u8,
    pub scale: F32,
    pub offset: F32,
}

impl From<StreamRateInfoReply> for StreamRateInfo {
    fn from(reply: StreamRateInfoReply) -> Self {
        Self {
            available: reply.available != 0,
            channel_index: reply.channel_index,
            invert: reply.invert != 0,
            scale: reply.scale.get(),
            offset: reply.offset.get(),
        }
    }
}

// ============================================================================
// Channels (0x30-0x36)
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct ChannelInfoReply {
    pub channel_type: u8,
    pub unit_type: u8,
    pub filler_bits: U16,
    pub data_bits: U16,
    pub samples: u8,
    pub bits_per_sample: I16,
    pub minimum: F32,
    pub maximum: F32,
    pub resolution: F32,
    pub coefficients_length: u8,
    pub chunk_count: u8,
}

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct CoefficientsRequest {
    pub index: u8,
    pub start: u8,
}

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct ChunkRequest {
    pub index: u8,
    pub chunk_number: u8,
    pub start: u8,
}

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct ChannelCalibrationReply {
    pub base_setting_index: u8,
    pub resolution_setting_index: u8,
    pub scale: F32,
    pub offset: F32,
    pub minimum: F32,
    pub maximum: F32,
}

impl From<ChannelCalibrationReply> for ChannelCalibration {
    fn from(reply: ChannelCalibrationReply) -> Self {
        Self {
            base_setting_index: reply.base_setting_index,
            resolution_setting_index: reply.resolution_setting_index,
            scale: reply.scale.get(),
            offset: reply.offset.get(),
            minimum: reply.minimum.get(),
            maximum: reply.maximum.get(),
        }
    }
}

// ============================================================================
// Supplies (0x40-0x43)
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct SupplyInfoReply {
    pub unit_type: u8,
    pub is_battery: u8,
    pub nominal: I32,
    pub scale: F32,
    pub offset: F32,
}

impl SupplyInfoReply {
    pub fn into_supply_info(self, name: String) -> SupplyInfo {
        SupplyInfo {
            name,
            unit_type: self.unit_type,
            is_battery: self.is_battery != 0,
            nominal: self.nominal.get(),
            scale: self.scale.get(),
            offset: self.offset.get(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct CheckSupplyReply {
    pub measurement: I32,
    pub result: u8,
}

impl From<CheckSupplyReply> for SupplyCheck {
    fn from(reply: CheckSupplyReply) -> Self {
        Self {
            measurement: reply.measurement.get(),
            result: reply.result.into(),
        }
    }
}

// ============================================================================
// Control variables (0x50-0x54)
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct CtrlVarInfoReply {
    pub unit_type: u8,
    pub minimum: I32,
    pub maximum: I32,
    pub scale: F32,
    pub offset: F32,
}

impl CtrlVarInfoReply {
    pub fn into_ctrl_var_info(self, name: String) -> CtrlVarInfo {
        CtrlVarInfo {
            name,
            unit_type: self.unit_type,
            minimum: self.minimum.get(),
            maximum: self.maximum.get(),
            scale: self.scale.get(),
            offset: self.offset.get(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct SetCtrlVarRequest {
    pub index: u8,
    pub value: I32,
}

// ============================================================================
// LEDs and NVM
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct SetRgbRequest {
    pub index: u8,
    pub values: [u8; 3],
}

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct SetLedRequest {
    pub index: u8,
    pub value: u8,
}

/// Address prefix of READ_NVM and WRITE_NVM
#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct NvmAddress {
    pub address: U16,
}

// ============================================================================
// Radio, remote and RF power (0x80-0x9F)
// ============================================================================

/// Serial number parameter of CONNECT_RADIO and CONNECT_RADIO_BOOT
#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct SerialNumberRequest {
    pub serial_number: U32,
}

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct RadioStatusReply {
    pub connected: u8,
    pub serial_number: U32,
    pub protocol_type: u8,
    pub scanning: u8,
}

impl From<RadioStatusReply> for RadioStatus {
    fn from(reply: RadioStatusReply) -> Self {
        Self {
            connected: reply.connected != 0,
            serial_number: reply.serial_number.get(),
            protocol_type: ProtocolType::from(reply.protocol_type),
            scanning: reply.scanning != 0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct RemoteStatusReply {
    pub connected: u8,
    pub serial_number: U32,
    pub protocol_type: u8,
}

impl From<RemoteStatusReply> for RemoteStatus {
    fn from(reply: RemoteStatusReply) -> Self {
        Self {
            connected: reply.connected != 0,
            serial_number: reply.serial_number.get(),
            protocol_type: ProtocolType::from(reply.protocol_type),
        }
    }
}

/// One entry of GET_RADIO_EXTRA_SCAN_RESULTS
#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct ExtraScanResultEntry {
    pub serial_number: U32,
    pub asphodel_type: u8,
    pub device_mode: u8,
    pub reserved: U16,
}

impl From<&ExtraScanResultEntry> for ExtraScanResult {
    fn from(entry: &ExtraScanResultEntry) -> Self {
        Self {
            serial_number: entry.serial_number.get(),
            asphodel_type: entry.asphodel_type,
            device_mode: entry.device_mode,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct RfPowerTimeoutRequest {
    pub timeout: U32,
}

// ============================================================================
// Bootloader (0xA0-0xA6)
// ============================================================================

/// Fixed prefix of START_BOOTLOADER_PAGE; the nonce follows
#[repr(C)]
#[derive(Debug, Clone, IntoBytes, FromBytes, Immutable, KnownLayout, Unaligned)]
pub struct StartBootloaderPageRequest {
    pub page_number: U32,
}
