// Licensed under the Apache-2.0 license

//! Asphodel Protocol Types
//!
//! Command codes, error taxonomy, wire frames, reply layouts and the
//! stream/channel descriptors shared by every layer of the host library.

pub mod bits;
pub mod channel_info;
pub mod device_info;
pub mod error;
pub mod frame;
pub mod protocol_type;
pub mod replies;
pub mod stream_info;
pub mod streaming;
pub mod units;

pub use bits::*;
pub use channel_info::*;
pub use device_info::*;
pub use error::*;
pub use frame::*;
pub use protocol_type::*;
pub use stream_info::*;
pub use streaming::*;
pub use units::*;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Protocol version implemented by this library (major.minor.subminor).
pub const PROTOCOL_VERSION_MAJOR: u8 = 2;
pub const PROTOCOL_VERSION_MINOR: u8 = 3;
pub const PROTOCOL_VERSION_SUBMINOR: u8 = 3;
pub const PROTOCOL_VERSION_STRING: &str = "2.3.3";

/// Command byte used by the device to frame an error reply.
pub const CMD_REPLY_ERROR: u8 = 0xFF;

/// Channel specific sub-command: set strain bridge output state.
pub const STRAIN_SET_OUTPUTS: u8 = 0x01;

/// Channel specific sub-command: enable accelerometer self test.
pub const ACCEL_ENABLE_SELF_TEST: u8 = 0x01;

/// Asphodel command codes
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
    strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    // General information (0x00-0x07)
    GetProtocolVersion = 0x00,
    GetBoardInfo = 0x01,
    GetUserTagLocations = 0x02,
    GetBuildInfo = 0x03,
    GetBuildDate = 0x04,
    GetChipFamily = 0x05,
    GetChipModel = 0x06,
    GetChipId = 0x07,

    // NVM (0x08-0x0B)
    GetNvmSize = 0x08,
    EraseNvm = 0x09,
    WriteNvm = 0x0A,
    ReadNvm = 0x0B,

    Flush = 0x0C,

    // Reset and bootloader entry
    Reset = 0x0D,
    GetBootloaderInfo = 0x0E,
    BootloaderJump = 0x0F,

    // LEDs (0x10-0x17)
    GetRgbCount = 0x10,
    GetRgbValues = 0x11,
    SetRgb = 0x12,
    SetRgbInstant = 0x13,
    GetLedCount = 0x14,
    GetLedValue = 0x15,
    SetLed = 0x16,
    SetLedInstant = 0x17,

    // State
    GetResetFlag = 0x18,
    ClearResetFlag = 0x19,
    GetNvmModified = 0x1A,
    GetNvmHash = 0x1B,
    GetSettingHash = 0x1C,

    // Source control
    GetCommitId = 0x1D,
    GetRepoBranch = 0x1E,
    GetRepoName = 0x1F,

    // Streams (0x20-0x26)
    GetStreamCountAndId = 0x20,
    GetStreamChannels = 0x21,
    GetStreamFormat = 0x22,
    EnableStream = 0x23,
    WarmUpStream = 0x24,
    GetStreamStatus = 0x25,
    GetStreamRateInfo = 0x26,

    // Channels (0x30-0x36)
    GetChannelCount = 0x30,
    GetChannelName = 0x31,
    GetChannelInfo = 0x32,
    GetChannelCoefficients = 0x33,
    GetChannelChunk = 0x34,
    ChannelSpecific = 0x35,
    GetChannelCalibration = 0x36,

    // Supplies (0x40-0x43)
    GetSupplyCount = 0x40,
    GetSupplyName = 0x41,
    GetSupplyInfo = 0x42,
    CheckSupply = 0x43,

    // Control variables (0x50-0x54)
    GetCtrlVarCount = 0x50,
    GetCtrlVarName = 0x51,
    GetCtrlVarInfo = 0x52,
    GetCtrlVar = 0x53,
    SetCtrlVar = 0x54,

    // Settings (0x60-0x68)
    GetSettingCount = 0x60,
    GetSettingName = 0x61,
    GetSettingInfo = 0x62,
    GetSettingDefault = 0x63,
    GetCustomEnumCounts = 0x64,
    GetCustomEnumValueName = 0x65,
    GetSettingCategoryCount = 0x66,
    GetSettingCategoryName = 0x67,
    GetSettingCategorySettings = 0x68,

    // Device mode
    SetDeviceMode = 0x70,
    GetDeviceMode = 0x71,

    // RF power (0x80-0x83)
    EnableRfPower = 0x80,
    GetRfPowerStatus = 0x81,
    GetRfPowerCtrlVars = 0x82,
    ResetRfPowerTimeout = 0x83,

    // Radio (0x90-0x99, 0x9F)
    StopRadio = 0x90,
    StartRadioScan = 0x91,
    GetRadioScanResults = 0x92,
    ConnectRadio = 0x93,
    GetRadioStatus = 0x94,
    GetRadioCtrlVars = 0x95,
    GetRadioDefaultSerial = 0x96,
    StartRadioScanBoot = 0x97,
    ConnectRadioBoot = 0x98,
    GetRadioExtraScanResults = 0x99,
    GetRadioScanPower = 0x9F,

    // Remote (0x9A-0x9E)
    StopRemote = 0x9A,
    RestartRemote = 0x9B,
    GetRemoteStatus = 0x9C,
    RestartRemoteApp = 0x9D,
    RestartRemoteBoot = 0x9E,

    // Bootloader (0xA0-0xA6)
    BootloaderStartProgram = 0xA0,
    GetBootloaderPageInfo = 0xA1,
    GetBootloaderBlockSizes = 0xA2,
    StartBootloaderPage = 0xA3,
    WriteBootloaderCodeBlock = 0xA4,
    FinishBootloaderPage = 0xA5,
    VerifyBootloaderPage = 0xA6,

    // GPIO, buses and radio tests (0xE0-0xED)
    GetGpioPortCount = 0xE0,
    GetGpioPortName = 0xE1,
    GetGpioPortInfo = 0xE2,
    GetGpioPortValues = 0xE3,
    SetGpioPortModes = 0xE4,
    DisableGpioPortOverrides = 0xE5,
    GetBusCounts = 0xE6,
    SetSpiCsMode = 0xE7,
    DoSpiTransfer = 0xE8,
    DoI2cWrite = 0xE9,
    DoI2cRead = 0xEA,
    DoI2cWriteRead = 0xEB,
    DoRadioFixedTest = 0xEC,
    DoRadioSweepTest = 0xED,

    // Info regions (0xF0-0xF2)
    GetInfoRegionCount = 0xF0,
    GetInfoRegionName = 0xF1,
    GetInfoRegion = 0xF2,

    GetStackInfo = 0xF3,

    // Echo (0xFC-0xFE)
    EchoRaw = 0xFC,
    EchoTransaction = 0xFD,
    EchoParams = 0xFE,
}

impl Command {
    /// Wire byte for this command
    pub fn code(self) -> u8 {
        self.into()
    }

    /// Canonical `CMD_*` name without the prefix
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Commands that make the device drop off the bus before replying
    pub fn is_reset_style(self) -> bool {
        matches!(
            self,
            Command::Reset
                | Command::BootloaderJump
                | Command::BootloaderStartProgram
                | Command::RestartRemote
                | Command::RestartRemoteApp
                | Command::RestartRemoteBoot
        )
    }
}
