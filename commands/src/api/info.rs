// Licensed under the Apache-2.0 license

//! Device information API functions

use crate::packing::{unpack_string, unpack_u16};
use asphodel_device::Device;
use asphodel_protocol::{AsphodelError, AsphodelResult, BoardInfo, Command, ProtocolVersion};

/// Get the protocol version implemented by the device firmware
///
/// # Returns
///
/// - `Ok(ProtocolVersion)` packed as major:8, minor:4, subminor:4
/// - `Err(AsphodelError::BadReplyLength)` if the reply is not 2 bytes
pub fn get_protocol_version(device: &mut Device) -> AsphodelResult<ProtocolVersion> {
    let reply = device.command(Command::GetProtocolVersion, &[])?;
    unpack_u16(&reply).map(ProtocolVersion::from)
}

/// Protocol version formatted as `major.minor.subminor`
pub fn get_protocol_version_string(device: &mut Device) -> AsphodelResult<String> {
    get_protocol_version(device).map(|version| version.to_string())
}

/// Get the board revision and name
pub fn get_board_info(device: &mut Device) -> AsphodelResult<BoardInfo> {
    let reply = device.command(Command::GetBoardInfo, &[])?;
    let (&revision, name) = reply.split_first().ok_or(AsphodelError::BadReplyLength)?;
    Ok(BoardInfo {
        revision,
        name: unpack_string(name),
    })
}

fn get_string(device: &mut Device, command: Command) -> AsphodelResult<String> {
    let reply = device.command(command, &[])?;
    Ok(unpack_string(&reply))
}

pub fn get_build_info(device: &mut Device) -> AsphodelResult<String> {
    get_string(device, Command::GetBuildInfo)
}

pub fn get_build_date(device: &mut Device) -> AsphodelResult<String> {
    get_string(device, Command::GetBuildDate)
}

pub fn get_chip_family(device: &mut Device) -> AsphodelResult<String> {
    get_string(device, Command::GetChipFamily)
}

pub fn get_chip_model(device: &mut Device) -> AsphodelResult<String> {
    get_string(device, Command::GetChipModel)
}

pub fn get_chip_id(device: &mut Device) -> AsphodelResult<String> {
    get_string(device, Command::GetChipId)
}

pub fn get_commit_id(device: &mut Device) -> AsphodelResult<String> {
    get_string(device, Command::GetCommitId)
}

pub fn get_repo_branch(device: &mut Device) -> AsphodelResult<String> {
    get_string(device, Command::GetRepoBranch)
}

pub fn get_repo_name(device: &mut Device) -> AsphodelResult<String> {
    get_string(device, Command::GetRepoName)
}

/// Bootloader description; empty on devices without one
pub fn get_bootloader_info(device: &mut Device) -> AsphodelResult<String> {
    get_string(device, Command::GetBootloaderInfo)
}

pub fn get_nvm_hash(device: &mut Device) -> AsphodelResult<String> {
    get_string(device, Command::GetNvmHash)
}

pub fn get_setting_hash(device: &mut Device) -> AsphodelResult<String> {
    get_string(device, Command::GetSettingHash)
}
