// Licensed under the Apache-2.0 license

//! Control variable API functions

use crate::packing::{unpack_empty, unpack_i32, unpack_reply, unpack_string, unpack_u8};
use asphodel_device::Device;
use asphodel_protocol::replies::{CtrlVarInfoReply, SetCtrlVarRequest};
use asphodel_protocol::{AsphodelResult, Command, CtrlVarInfo};
use zerocopy::IntoBytes;

pub fn get_ctrl_var_count(device: &mut Device) -> AsphodelResult<u8> {
    let reply = device.command(Command::GetCtrlVarCount, &[])?;
    unpack_u8(&reply)
}

pub fn get_ctrl_var_name(device: &mut Device, index: u8) -> AsphodelResult<String> {
    let reply = device.command(Command::GetCtrlVarName, &[index])?;
    Ok(unpack_string(&reply))
}

pub fn get_ctrl_var_info(device: &mut Device, index: u8) -> AsphodelResult<CtrlVarInfo> {
    let name = get_ctrl_var_name(device, index)?;
    let reply = device.command(Command::GetCtrlVarInfo, &[index])?;
    unpack_reply::<CtrlVarInfoReply>(&reply).map(|info| info.into_ctrl_var_info(name))
}

pub fn get_ctrl_var(device: &mut Device, index: u8) -> AsphodelResult<i32> {
    let reply = device.command(Command::GetCtrlVar, &[index])?;
    unpack_i32(&reply)
}

pub fn set_ctrl_var(device: &mut Device, index: u8, value: i32) -> AsphodelResult<()> {
    let request = SetCtrlVarRequest {
        index,
        value: value.into(),
    };
    let reply = device.command(Command::SetCtrlVar, request.as_bytes())?;
    unpack_empty(&reply)
}
