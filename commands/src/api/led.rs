// Licensed under the Apache-2.0 license

//! RGB and LED API functions

use crate::packing::{unpack_empty, unpack_u8};
use asphodel_device::Device;
use asphodel_protocol::replies::{SetLedRequest, SetRgbRequest};
use asphodel_protocol::{AsphodelError, AsphodelResult, Command};
use zerocopy::IntoBytes;

pub fn get_rgb_count(device: &mut Device) -> AsphodelResult<u8> {
    let reply = device.command(Command::GetRgbCount, &[])?;
    unpack_u8(&reply)
}

pub fn get_rgb_values(device: &mut Device, index: u8) -> AsphodelResult<[u8; 3]> {
    let reply = device.command(Command::GetRgbValues, &[index])?;
    reply
        .as_slice()
        .try_into()
        .map_err(|_| AsphodelError::BadReplyLength)
}

/// Set an RGB LED. `instant` skips the device's fade.
pub fn set_rgb_values(
    device: &mut Device,
    index: u8,
    values: [u8; 3],
    instant: bool,
) -> AsphodelResult<()> {
    let command = if instant {
        Command::SetRgbInstant
    } else {
        Command::SetRgb
    };
    let request = SetRgbRequest { index, values };
    let reply = device.command(command, request.as_bytes())?;
    unpack_empty(&reply)
}

/// Same as [`set_rgb_values`] with a packed `0xRRGGBB` value
pub fn set_rgb_values_hex(
    device: &mut Device,
    index: u8,
    color: u32,
    instant: bool,
) -> AsphodelResult<()> {
    let [_, r, g, b] = color.to_be_bytes();
    set_rgb_values(device, index, [r, g, b], instant)
}

pub fn get_led_count(device: &mut Device) -> AsphodelResult<u8> {
    let reply = device.command(Command::GetLedCount, &[])?;
    unpack_u8(&reply)
}

pub fn get_led_value(device: &mut Device, index: u8) -> AsphodelResult<u8> {
    let reply = device.command(Command::GetLedValue, &[index])?;
    unpack_u8(&reply)
}

pub fn set_led_value(device: &mut Device, index: u8, value: u8, instant: bool) -> AsphodelResult<()> {
    let command = if instant {
        Command::SetLedInstant
    } else {
        Command::SetLed
    };
    let request = SetLedRequest { index, value };
    let reply = device.command(command, request.as_bytes())?;
    unpack_empty(&reply)
}
