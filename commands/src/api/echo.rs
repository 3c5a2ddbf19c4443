// Licensed under the Apache-2.0 license

//! Echo API functions
//!
//! Diagnostics for the transfer path. `echo_raw` returns the device's view
//! of the raw frame, the others return what was sent.

use asphodel_device::Device;
use asphodel_protocol::{AsphodelResult, Command};

pub fn echo_raw(device: &mut Device, data: &[u8]) -> AsphodelResult<Vec<u8>> {
    device.command(Command::EchoRaw, data)
}

pub fn echo_transaction(device: &mut Device, data: &[u8]) -> AsphodelResult<Vec<u8>> {
    device.command(Command::EchoTransaction, data)
}

pub fn echo_params(device: &mut Device, data: &[u8]) -> AsphodelResult<Vec<u8>> {
    device.command(Command::EchoParams, data)
}
