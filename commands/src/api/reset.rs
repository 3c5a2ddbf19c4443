// Licensed under the Apache-2.0 license

//! Reset, bootloader and state flag API functions

use crate::packing::{unpack_bool, unpack_empty};
use asphodel_device::Device;
use asphodel_protocol::{AsphodelResult, Command};

/// Flush any pending transfers and partially received packets on the device
pub fn flush(device: &mut Device) -> AsphodelResult<()> {
    let reply = device.command(Command::Flush, &[])?;
    unpack_empty(&reply)
}

/// Reset the device. The handle must be reconnected afterwards.
pub fn reset(device: &mut Device) -> AsphodelResult<()> {
    device.transfer_reset(Command::Reset.code(), &[])
}

/// Jump to the bootloader. The handle must be reconnected afterwards.
pub fn bootloader_jump(device: &mut Device) -> AsphodelResult<()> {
    device.transfer_reset(Command::BootloaderJump.code(), &[])
}

/// True if the device has not been cleared since its last reset
pub fn get_reset_flag(device: &mut Device) -> AsphodelResult<bool> {
    let reply = device.command(Command::GetResetFlag, &[])?;
    unpack_bool(&reply)
}

pub fn clear_reset_flag(device: &mut Device) -> AsphodelResult<()> {
    let reply = device.command(Command::ClearResetFlag, &[])?;
    unpack_empty(&reply)
}

/// True if NVM was written since the last reset
pub fn get_nvm_modified(device: &mut Device) -> AsphodelResult<bool> {
    let reply = device.command(Command::GetNvmModified, &[])?;
    unpack_bool(&reply)
}
