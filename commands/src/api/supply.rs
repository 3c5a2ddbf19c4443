// Licensed under the Apache-2.0 license

//! Supply API functions

use crate::packing::{unpack_reply, unpack_string, unpack_u8};
use asphodel_device::Device;
use asphodel_protocol::replies::{CheckSupplyReply, SupplyInfoReply};
use asphodel_protocol::{
    AsphodelError, AsphodelResult, Command, DeviceErrorCode, SupplyCheck, SupplyInfo,
};
use log::debug;

pub fn get_supply_count(device: &mut Device) -> AsphodelResult<u8> {
    let reply = device.command(Command::GetSupplyCount, &[])?;
    unpack_u8(&reply)
}

pub fn get_supply_name(device: &mut Device, index: u8) -> AsphodelResult<String> {
    let reply = device.command(Command::GetSupplyName, &[index])?;
    Ok(unpack_string(&reply))
}

pub fn get_supply_info(device: &mut Device, index: u8) -> AsphodelResult<SupplyInfo> {
    let name = get_supply_name(device, index)?;
    let reply = device.command(Command::GetSupplyInfo, &[index])?;
    unpack_reply::<SupplyInfoReply>(&reply).map(|info| info.into_supply_info(name))
}

/// Measure a supply
///
/// The device answers `ERROR_CODE_INCOMPLETE` while the measurement is in
/// progress; the check is retried up to `tries` times before failing with
/// `TooManyTries`.
pub fn check_supply(device: &mut Device, index: u8, tries: u32) -> AsphodelResult<SupplyCheck> {
    if tries == 0 {
        return Err(AsphodelError::BadParameter);
    }
    for attempt in 1..=tries {
        match device.command(Command::CheckSupply, &[index]) {
            Err(AsphodelError::Device(DeviceErrorCode::Incomplete)) => {
                debug!("Supply {index} check incomplete (attempt {attempt}/{tries})");
            }
            Err(e) => return Err(e),
            Ok(reply) => return unpack_reply::<CheckSupplyReply>(&reply).map(SupplyCheck::from),
        }
    }
    Err(AsphodelError::TooManyTries)
}
