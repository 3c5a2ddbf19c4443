// Licensed under the Apache-2.0 license

//! Channel Descriptors

use crate::{AsphodelError, AsphodelResult};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::EnumCount;

/// Decode strategy selector of a channel
#[repr(u8)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    strum_macros::EnumCount,
    strum_macros::IntoStaticStr,
)]
pub enum ChannelType {
    #[strum(serialize = "CHANNEL_TYPE_LINEAR")]
    Linear = 0,
    #[strum(serialize = "CHANNEL_TYPE_NTC")]
    Ntc = 1,
    #[strum(serialize = "CHANNEL_TYPE_ARRAY")]
    Array = 2,
    #[strum(serialize = "CHANNEL_TYPE_SLOW_STRAIN")]
    SlowStrain = 3,
    #[strum(serialize = "CHANNEL_TYPE_FAST_STRAIN")]
    FastStrain = 4,
    #[strum(serialize = "CHANNEL_TYPE_SLOW_ACCEL")]
    SlowAccel = 5,
    #[strum(serialize = "CHANNEL_TYPE_PACKED_ACCEL")]
    PackedAccel = 6,
    #[strum(serialize = "CHANNEL_TYPE_COMPOSITE_STRAIN")]
    CompositeStrain = 7,
    #[strum(serialize = "CHANNEL_TYPE_LINEAR_ACCEL")]
    LinearAccel = 8,
    #[strum(serialize = "CHANNEL_TYPE_BIG_ENDIAN_FLOAT32")]
    BigEndianFloat32 = 9,
    #[strum(serialize = "CHANNEL_TYPE_BIG_ENDIAN_FLOAT64")]
    BigEndianFloat64 = 10,
    #[strum(serialize = "CHANNEL_TYPE_LITTLE_ENDIAN_FLOAT32")]
    LittleEndianFloat32 = 11,
    #[strum(serialize = "CHANNEL_TYPE_LITTLE_ENDIAN_FLOAT64")]
    LittleEndianFloat64 = 12,
}

impl ChannelType {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn is_strain(self) -> bool {
        matches!(
            self,
            ChannelType::SlowStrain | ChannelType::FastStrain | ChannelType::CompositeStrain
        )
    }

    pub fn is_accel(self) -> bool {
        matches!(
            self,
            ChannelType::SlowAccel | ChannelType::PackedAccel | ChannelType::LinearAccel
        )
    }
}

pub fn channel_type_count() -> usize {
    ChannelType::COUNT
}

/// Name of a raw channel type byte, `"CHANNEL_TYPE_UNKNOWN"` when out of range
pub fn channel_type_name(channel_type: u8) -> &'static str {
    ChannelType::try_from(channel_type)
        .map(ChannelType::name)
        .unwrap_or("CHANNEL_TYPE_UNKNOWN")
}

/// Channel description as fetched from the device.
///
/// `channel_type` is kept as the raw byte; an unknown type is only rejected
/// when a decoder is built for the channel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelInfo {
    pub name: String,
    pub channel_type: u8,
    pub unit_type: u8,
    /// Padding before the channel's samples
    pub filler_bits: u16,
    /// Bits occupied by the channel's samples
    pub data_bits: u16,
    pub samples: u8,
    /// Negative when samples are two's complement
    pub bits_per_sample: i16,
    pub minimum: f32,
    pub maximum: f32,
    pub resolution: f32,
    pub coefficients: Vec<f32>,
    pub chunks: Vec<Vec<u8>>,
}

impl ChannelInfo {
    pub fn channel_type(&self) -> AsphodelResult<ChannelType> {
        ChannelType::try_from(self.channel_type).map_err(|_| AsphodelError::BadChannelType)
    }

    /// Width of one sample
    pub fn sample_bits(&self) -> u32 {
        u32::from(self.bits_per_sample.unsigned_abs())
    }

    pub fn is_signed(&self) -> bool {
        self.bits_per_sample < 0
    }
}

/// Calibration of a channel against device settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelCalibration {
    /// Setting holding the unit
    pub base_setting_index: u8,
    /// Setting holding the resolution, 255 when there is none
    pub resolution_setting_index: u8,
    pub scale: f32,
    pub offset: f32,
    pub minimum: f32,
    pub maximum: f32,
}

pub const NO_SETTING_INDEX: u8 = 255;

impl ChannelCalibration {
    pub fn resolution_setting(&self) -> Option<u8> {
        (self.resolution_setting_index != NO_SETTING_INDEX).then_some(self.resolution_setting_index)
    }

    /// Lower domain limit, `None` when unconfigured
    pub fn minimum(&self) -> Option<f32> {
        self.minimum.is_finite().then_some(self.minimum)
    }

    /// Upper domain limit, `None` when unconfigured
    pub fn maximum(&self) -> Option<f32> {
        self.maximum.is_finite().then_some(self.maximum)
    }
}
