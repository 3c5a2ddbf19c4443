// Licensed under the Apache-2.0 license

use bitfield::bitfield;

pub const PROTOCOL_TYPE_BASIC: u8 = 0x00;
pub const PROTOCOL_TYPE_RF_POWER: u8 = 0x01;
pub const PROTOCOL_TYPE_RADIO: u8 = 0x02;
pub const PROTOCOL_TYPE_REMOTE: u8 = 0x04;
pub const PROTOCOL_TYPE_BOOTLOADER: u8 = 0x08;

bitfield! {
    /// Capability bitmask advertised by a device.
    /// Bit 0: RF power extension
    /// Bit 1: radio controlling a remote
    /// Bit 2: remote controlled by a radio
    /// Bit 3: firmware bootloader
    #[derive(Copy, Clone, PartialEq, Eq, Default)]
    pub struct ProtocolType(u8);
    impl Debug;
    pub rf_power, set_rf_power: 0;
    pub radio, set_radio: 1;
    pub remote, set_remote: 2;
    pub bootloader, set_bootloader: 3;
}

impl ProtocolType {
    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_basic(&self) -> bool {
        self.0 == PROTOCOL_TYPE_BASIC
    }
}

impl From<u8> for ProtocolType {
    fn from(bits: u8) -> Self {
        ProtocolType(bits)
    }
}

bitfield! {
    /// Protocol version reply: major 15..8, minor 7..4, subminor 3..0
    #[derive(Copy, Clone, PartialEq, Eq, Default)]
    pub struct ProtocolVersion(u16);
    impl Debug;
    pub u8, major, set_major: 15, 8;
    pub u8, minor, set_minor: 7, 4;
    pub u8, subminor, set_subminor: 3, 0;
}

impl From<u16> for ProtocolVersion {
    fn from(raw: u16) -> Self {
        ProtocolVersion(raw)
    }
}

impl core::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", self.major(), self.minor(), self.subminor())
    }
}
