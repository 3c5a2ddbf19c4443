// Licensed under the Apache-2.0 license

//! NVM API functions
//!
//! Writes carry a 2 byte big-endian address followed by whole 4 byte words.
//! The section helpers split larger buffers into as many transfers as the
//! device's parameter lengths require.

use crate::packing::{unpack_empty, unpack_u16};
use asphodel_device::Device;
use asphodel_protocol::replies::NvmAddress;
use asphodel_protocol::{AsphodelError, AsphodelResult, Command};
use zerocopy::IntoBytes;

const NVM_WORD: usize = 4;

/// Size of the device NVM in bytes
pub fn get_nvm_size(device: &mut Device) -> AsphodelResult<usize> {
    let reply = device.command(Command::GetNvmSize, &[])?;
    unpack_u16(&reply).map(usize::from)
}

pub fn erase_nvm(device: &mut Device) -> AsphodelResult<()> {
    let reply = device.command(Command::EraseNvm, &[])?;
    unpack_empty(&reply)
}

/// Write whole words starting at `address`
///
/// `data` must be a multiple of 4 bytes and fit in one transfer.
pub fn write_nvm_raw(device: &mut Device, address: u16, data: &[u8]) -> AsphodelResult<()> {
    if data.len() % NVM_WORD != 0 {
        return Err(AsphodelError::BadParameter);
    }
    let mut params = NvmAddress {
        address: address.into(),
    }
    .as_bytes()
    .to_vec();
    params.extend_from_slice(data);
    let reply = device.command(Command::WriteNvm, &params)?;
    unpack_empty(&reply)
}

/// Read as many bytes as the device returns in one transfer
pub fn read_nvm_raw(device: &mut Device, address: u16) -> AsphodelResult<Vec<u8>> {
    let params = NvmAddress {
        address: address.into(),
    };
    device.command(Command::ReadNvm, params.as_bytes())
}

/// Write an arbitrary word-aligned section, one transfer per chunk
pub fn write_nvm_section(device: &mut Device, address: u16, data: &[u8]) -> AsphodelResult<()> {
    if data.len() % NVM_WORD != 0 || usize::from(address) % NVM_WORD != 0 {
        return Err(AsphodelError::BadParameter);
    }
    let max_chunk = device
        .max_outgoing_param_length()
        .saturating_sub(core::mem::size_of::<NvmAddress>())
        / NVM_WORD
        * NVM_WORD;
    if max_chunk == 0 {
        return Err(AsphodelError::OutgoingPacketTooLong);
    }

    let mut offset = 0usize;
    for chunk in data.chunks(max_chunk) {
        let chunk_address = section_address(address, offset)?;
        write_nvm_raw(device, chunk_address, chunk)?;
        offset += chunk.len();
    }
    Ok(())
}

/// Read exactly `length` bytes starting at `address`
pub fn read_nvm_section(device: &mut Device, address: u16, length: usize) -> AsphodelResult<Vec<u8>> {
    let mut data = Vec::with_capacity(length);
    while data.len() < length {
        let chunk = read_nvm_raw(device, section_address(address, data.len())?)?;
        if chunk.is_empty() {
            return Err(AsphodelError::BadReplyLength);
        }
        let take = chunk.len().min(length - data.len());
        data.extend_from_slice(&chunk[..take]);
    }
    Ok(data)
}

fn section_address(address: u16, offset: usize) -> AsphodelResult<u16> {
    usize::from(address)
        .checked_add(offset)
        .and_then(|a| u16::try_from(a).ok())
        .ok_or(AsphodelError::BadParameter)
}
