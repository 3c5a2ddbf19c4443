// Licensed under the Apache-2.0 license

//! Bootloader API functions
//!
//! A firmware image is written one page at a time: start the page with its
//! nonce, write the code in blocks of a size the bootloader accepts, then
//! finish and optionally verify it with the page's MAC tag.

use crate::packing::{unpack_empty, unpack_u16_array, unpack_u32_array};
use asphodel_device::Device;
use asphodel_protocol::replies::StartBootloaderPageRequest;
use asphodel_protocol::{AsphodelError, AsphodelResult, BootloaderPageInfo, Command};
use log::{debug, trace};
use zerocopy::byteorder::big_endian::U32;
use zerocopy::IntoBytes;

fn bootloader_command(
    device: &mut Device,
    command: Command,
    params: &[u8],
) -> AsphodelResult<Vec<u8>> {
    if !device.supports_bootloader_commands() {
        return Err(AsphodelError::NotSupported);
    }
    device.command(command, params)
}

/// Leave the bootloader and run the application. The handle must be
/// reconnected afterwards.
pub fn bootloader_start_program(device: &mut Device) -> AsphodelResult<()> {
    if !device.supports_bootloader_commands() {
        return Err(AsphodelError::NotSupported);
    }
    device.transfer_reset(Command::BootloaderStartProgram.code(), &[])
}

/// Flash layout as runs of equally sized pages
pub fn get_bootloader_page_info(device: &mut Device) -> AsphodelResult<Vec<BootloaderPageInfo>> {
    let reply = bootloader_command(device, Command::GetBootloaderPageInfo, &[])?;
    if reply.len() % 8 != 0 {
        return Err(AsphodelError::BadReplyLength);
    }
    let words = unpack_u32_array(&reply)?;
    Ok(words
        .chunks_exact(2)
        .map(|pair| BootloaderPageInfo {
            page_count: pair[0],
            page_size: pair[1],
        })
        .collect())
}

/// Code block sizes the bootloader accepts, in bytes
pub fn get_bootloader_block_sizes(device: &mut Device) -> AsphodelResult<Vec<u16>> {
    let reply = bootloader_command(device, Command::GetBootloaderBlockSizes, &[])?;
    unpack_u16_array(&reply)
}

pub fn start_bootloader_page(
    device: &mut Device,
    page_number: u32,
    nonce: &[u8],
) -> AsphodelResult<()> {
    let request = StartBootloaderPageRequest {
        page_number: U32::new(page_number),
    };
    let mut params = request.as_bytes().to_vec();
    params.extend_from_slice(nonce);
    let reply = bootloader_command(device, Command::StartBootloaderPage, &params)?;
    unpack_empty(&reply)
}

/// Write one code block. `data` must be one of the accepted block sizes.
pub fn write_bootloader_code_block(device: &mut Device, data: &[u8]) -> AsphodelResult<()> {
    let reply = bootloader_command(device, Command::WriteBootloaderCodeBlock, data)?;
    unpack_empty(&reply)
}

/// Write a page's code as a sequence of code blocks, each the largest
/// accepted size that fits both the remaining data and one packet.
/// Fails with `BadParameter` if the remaining data can't be covered.
pub fn write_bootloader_page(
    device: &mut Device,
    data: &[u8],
    block_sizes: &[u16],
) -> AsphodelResult<()> {
    let max_block = device.max_outgoing_param_length();
    let mut remaining = data;
    while !remaining.is_empty() {
        let size = block_sizes
            .iter()
            .map(|&size| usize::from(size))
            .filter(|&size| size != 0 && size <= remaining.len() && size <= max_block)
            .max()
            .ok_or(AsphodelError::BadParameter)?;
        let (block, rest) = remaining.split_at(size);
        trace!("Writing {} byte code block", size);
        write_bootloader_code_block(device, block)?;
        remaining = rest;
    }
    debug!("Wrote {} byte bootloader page", data.len());
    Ok(())
}

pub fn finish_bootloader_page(device: &mut Device, mac_tag: &[u8]) -> AsphodelResult<()> {
    let reply = bootloader_command(device, Command::FinishBootloaderPage, mac_tag)?;
    unpack_empty(&reply)
}

/// Check a finished page against its MAC tag without rewriting it
pub fn verify_bootloader_page(device: &mut Device, mac_tag: &[u8]) -> AsphodelResult<()> {
    let reply = bootloader_command(device, Command::VerifyBootloaderPage, mac_tag)?;
    unpack_empty(&reply)
}
