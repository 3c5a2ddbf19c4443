// Licensed under the Apache-2.0 license

//! Supply, control variable and board descriptors

use crate::ProtocolType;
use bitfield::bitfield;
use serde::{Deserialize, Serialize};

pub const SUPPLY_LOW_BATTERY: u8 = 0x01;
pub const SUPPLY_TOO_LOW: u8 = 0x02;
pub const SUPPLY_TOO_HIGH: u8 = 0x04;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SupplyInfo {
    pub name: String,
    pub unit_type: u8,
    pub is_battery: bool,
    /// Nominal value in raw units
    pub nominal: i32,
    pub scale: f32,
    pub offset: f32,
}

bitfield! {
    /// Result flags of a supply check
    #[derive(Copy, Clone, PartialEq, Eq, Default)]
    pub struct SupplyResult(u8);
    impl Debug;
    pub low_battery, _: 0;
    pub too_low, _: 1;
    pub too_high, _: 2;
}

impl SupplyResult {
    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_ok(&self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for SupplyResult {
    fn from(bits: u8) -> Self {
        SupplyResult(bits)
    }
}

/// Outcome of CHECK_SUPPLY
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyCheck {
    pub measurement: i32,
    pub result: SupplyResult,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CtrlVarInfo {
    pub name: String,
    pub unit_type: u8,
    pub minimum: i32,
    pub maximum: i32,
    pub scale: f32,
    pub offset: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardInfo {
    pub revision: u8,
    pub name: String,
}

/// State of a radio and the remote it is connected to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RadioStatus {
    pub connected: bool,
    /// Serial number of the connected or connecting remote, 0 when idle
    pub serial_number: u32,
    pub protocol_type: ProtocolType,
    pub scanning: bool,
}

/// State of a remote as seen through its radio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoteStatus {
    pub connected: bool,
    pub serial_number: u32,
    pub protocol_type: ProtocolType,
}

/// Radio scan result with the advertised device details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtraScanResult {
    pub serial_number: u32,
    pub asphodel_type: u8,
    pub device_mode: u8,
}

/// A run of `page_count` bootloader pages of `page_size` bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BootloaderPageInfo {
    pub page_count: u32,
    pub page_size: u32,
}
