// Licensed under the Apache-2.0 license

//! Device mode API functions

use crate::packing::{unpack_empty, unpack_u8};
use asphodel_device::Device;
use asphodel_protocol::{AsphodelResult, Command};

pub fn set_device_mode(device: &mut Device, mode: u8) -> AsphodelResult<()> {
    let reply = device.command(Command::SetDeviceMode, &[mode])?;
    unpack_empty(&reply)
}

pub fn get_device_mode(device: &mut Device) -> AsphodelResult<u8> {
    let reply = device.command(Command::GetDeviceMode, &[])?;
    unpack_u8(&reply)
}
