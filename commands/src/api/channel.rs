// Licensed under the Apache-2.0 license

//! Channel API functions
//!
//! A channel description is assembled from several commands: the fixed
//! info reply, the name, the coefficient array (paged by start index) and
//! each chunk (read until the device returns a short reply).

use crate::packing::{unpack_empty, unpack_f32_array, unpack_reply, unpack_string, unpack_u8};
use asphodel_decode::strain_bridge_subchannel;
use asphodel_device::Device;
use asphodel_protocol::replies::{
    ChannelCalibrationReply, ChannelInfoReply, ChunkRequest, CoefficientsRequest,
};
use asphodel_protocol::{
    AsphodelError, AsphodelResult, ChannelCalibration, ChannelInfo, Command,
    ACCEL_ENABLE_SELF_TEST, STRAIN_SET_OUTPUTS,
};
use log::trace;
use zerocopy::IntoBytes;

pub fn get_channel_count(device: &mut Device) -> AsphodelResult<u8> {
    let reply = device.command(Command::GetChannelCount, &[])?;
    unpack_u8(&reply)
}

pub fn get_channel_name(device: &mut Device, index: u8) -> AsphodelResult<String> {
    let reply = device.command(Command::GetChannelName, &[index])?;
    Ok(unpack_string(&reply))
}

/// Fixed part of the channel description
pub fn get_channel_info_raw(device: &mut Device, index: u8) -> AsphodelResult<ChannelInfoReply> {
    let reply = device.command(Command::GetChannelInfo, &[index])?;
    unpack_reply(&reply)
}

/// Read `count` coefficients, paging on the start index. A page holding
/// more than the remaining count is `BadReplyLength`.
pub fn get_channel_coefficients(
    device: &mut Device,
    index: u8,
    count: usize,
) -> AsphodelResult<Vec<f32>> {
    let mut coefficients = Vec::with_capacity(count);
    while coefficients.len() < count {
        let request = CoefficientsRequest {
            index,
            start: u8::try_from(coefficients.len()).map_err(|_| AsphodelError::BadParameter)?,
        };
        let reply = device.command(Command::GetChannelCoefficients, request.as_bytes())?;
        let page = unpack_f32_array(&reply)?;
        if page.is_empty() || page.len() > count - coefficients.len() {
            return Err(AsphodelError::BadReplyLength);
        }
        coefficients.extend_from_slice(&page);
    }
    Ok(coefficients)
}

/// Read one chunk in full
pub fn get_channel_chunk(device: &mut Device, index: u8, chunk_number: u8) -> AsphodelResult<Vec<u8>> {
    let max_reply = device.max_incoming_param_length();
    let mut chunk = Vec::new();
    loop {
        let Ok(start) = u8::try_from(chunk.len()) else {
            break;
        };
        let request = ChunkRequest {
            index,
            chunk_number,
            start,
        };
        let reply = device.command(Command::GetChannelChunk, request.as_bytes())?;
        trace!("Channel {index} chunk {chunk_number} @{start}: {} bytes", reply.len());
        let done = reply.len() < max_reply || reply.is_empty();
        chunk.extend_from_slice(&reply);
        if done {
            break;
        }
    }
    Ok(chunk)
}

/// Complete channel description including name, coefficients and chunks
pub fn get_channel_info(device: &mut Device, index: u8) -> AsphodelResult<ChannelInfo> {
    let raw = get_channel_info_raw(device, index)?;
    let name = get_channel_name(device, index)?;
    let coefficients = get_channel_coefficients(device, index, usize::from(raw.coefficients_length))?;
    let chunks = (0..raw.chunk_count)
        .map(|chunk_number| get_channel_chunk(device, index, chunk_number))
        .collect::<AsphodelResult<Vec<_>>>()?;

    Ok(ChannelInfo {
        name,
        channel_type: raw.channel_type,
        unit_type: raw.unit_type,
        filler_bits: raw.filler_bits.get(),
        data_bits: raw.data_bits.get(),
        samples: raw.samples,
        bits_per_sample: raw.bits_per_sample.get(),
        minimum: raw.minimum.get(),
        maximum: raw.maximum.get(),
        resolution: raw.resolution.get(),
        coefficients,
        chunks,
    })
}

/// Send a channel specific command and return its raw reply
pub fn channel_specific(device: &mut Device, index: u8, data: &[u8]) -> AsphodelResult<Vec<u8>> {
    let mut params = Vec::with_capacity(data.len() + 1);
    params.push(index);
    params.extend_from_slice(data);
    device.command(Command::ChannelSpecific, &params)
}

/// Calibration against device settings; `None` when the channel has none
pub fn get_channel_calibration(
    device: &mut Device,
    index: u8,
) -> AsphodelResult<Option<ChannelCalibration>> {
    let reply = device.command(Command::GetChannelCalibration, &[index])?;
    if reply.is_empty() {
        return Ok(None);
    }
    unpack_reply::<ChannelCalibrationReply>(&reply).map(|c| Some(c.into()))
}

/// Drive the outputs of one strain bridge
///
/// `info` must describe channel `index`; non-strain channels fail with
/// `BadChannelType`.
pub fn set_strain_outputs(
    device: &mut Device,
    index: u8,
    info: &ChannelInfo,
    bridge: usize,
    positive_side: u8,
    negative_side: u8,
) -> AsphodelResult<()> {
    let bridge = strain_bridge_subchannel(info, bridge)?;
    let bridge = u8::try_from(bridge).map_err(|_| AsphodelError::BadParameter)?;
    let reply = channel_specific(
        device,
        index,
        &[STRAIN_SET_OUTPUTS, bridge, positive_side, negative_side],
    )?;
    unpack_empty(&reply)
}

/// Toggle the accelerometer self test; non-accel channels fail with
/// `BadChannelType`
pub fn enable_accel_self_test(
    device: &mut Device,
    index: u8,
    info: &ChannelInfo,
    enable: bool,
) -> AsphodelResult<()> {
    if !info.channel_type()?.is_accel() {
        return Err(AsphodelError::BadChannelType);
    }
    let reply = channel_specific(device, index, &[ACCEL_ENABLE_SELF_TEST, u8::from(enable)])?;
    unpack_empty(&reply)
}
