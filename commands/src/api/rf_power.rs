// Licensed under the Apache-2.0 license

//! RF power API functions

use crate::packing::{unpack_bool, unpack_empty};
use asphodel_device::Device;
use asphodel_protocol::replies::RfPowerTimeoutRequest;
use asphodel_protocol::{AsphodelError, AsphodelResult, Command};
use zerocopy::byteorder::big_endian::U32;
use zerocopy::IntoBytes;

fn rf_power_command(
    device: &mut Device,
    command: Command,
    params: &[u8],
) -> AsphodelResult<Vec<u8>> {
    if !device.supports_rf_power_commands() {
        return Err(AsphodelError::NotSupported);
    }
    device.command(command, params)
}

pub fn enable_rf_power(device: &mut Device, enable: bool) -> AsphodelResult<()> {
    let reply = rf_power_command(device, Command::EnableRfPower, &[u8::from(enable)])?;
    unpack_empty(&reply)
}

/// True while RF power is enabled
pub fn get_rf_power_status(device: &mut Device) -> AsphodelResult<bool> {
    let reply = rf_power_command(device, Command::GetRfPowerStatus, &[])?;
    unpack_bool(&reply)
}

/// Control variable indices owned by the RF power output
pub fn get_rf_power_ctrl_vars(device: &mut Device) -> AsphodelResult<Vec<u8>> {
    rf_power_command(device, Command::GetRfPowerCtrlVars, &[])
}

/// Restart the device's RF power timeout. `timeout` is in milliseconds;
/// 0 disables the timeout.
pub fn reset_rf_power_timeout(device: &mut Device, timeout: u32) -> AsphodelResult<()> {
    let request = RfPowerTimeoutRequest {
        timeout: U32::new(timeout),
    };
    let reply = rf_power_command(device, Command::ResetRfPowerTimeout, request.as_bytes())?;
    unpack_empty(&reply)
}
