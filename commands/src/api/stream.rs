// Licensed under the Apache-2.0 license

//! Stream API functions

use crate::api::channel::{get_channel_count, get_channel_info};
use crate::packing::{unpack_empty, unpack_reply};
use asphodel_decode::StreamLayout;
use asphodel_device::Device;
use asphodel_protocol::replies::{
    StreamCountAndIdReply, StreamFormatReply, StreamRateInfoReply, StreamStatusReply,
};
use asphodel_protocol::{
    AsphodelResult, Command, StreamCountAndId, StreamInfo, StreamRateInfo, StreamStatus,
};
use log::debug;

/// Stream count plus the device level filler and id widths
pub fn get_stream_count_and_id(device: &mut Device) -> AsphodelResult<StreamCountAndId> {
    let reply = device.command(Command::GetStreamCountAndId, &[])?;
    unpack_reply::<StreamCountAndIdReply>(&reply).map(StreamCountAndId::from)
}

/// Channel indices carried by a stream
pub fn get_stream_channels(device: &mut Device, index: u8) -> AsphodelResult<Vec<u8>> {
    device.command(Command::GetStreamChannels, &[index])
}

pub fn get_stream_format(device: &mut Device, index: u8) -> AsphodelResult<StreamFormatReply> {
    let reply = device.command(Command::GetStreamFormat, &[index])?;
    unpack_reply(&reply)
}

/// Full stream description: channel list and format
pub fn get_stream_info(device: &mut Device, index: u8) -> AsphodelResult<StreamInfo> {
    let channels = get_stream_channels(device, index)?;
    let format = get_stream_format(device, index)?;
    Ok(format.into_stream_info(channels))
}

pub fn enable_stream(device: &mut Device, index: u8, enable: bool) -> AsphodelResult<()> {
    let reply = device.command(Command::EnableStream, &[index, u8::from(enable)])?;
    unpack_empty(&reply)
}

pub fn warm_up_stream(device: &mut Device, index: u8, enable: bool) -> AsphodelResult<()> {
    let reply = device.command(Command::WarmUpStream, &[index, u8::from(enable)])?;
    unpack_empty(&reply)
}

pub fn get_stream_status(device: &mut Device, index: u8) -> AsphodelResult<StreamStatus> {
    let reply = device.command(Command::GetStreamStatus, &[index])?;
    unpack_reply::<StreamStatusReply>(&reply).map(StreamStatus::from)
}

pub fn get_stream_rate_info(device: &mut Device, index: u8) -> AsphodelResult<StreamRateInfo> {
    let reply = device.command(Command::GetStreamRateInfo, &[index])?;
    unpack_reply::<StreamRateInfoReply>(&reply).map(StreamRateInfo::from)
}

/// Fetch every stream and channel descriptor into an owned layout
///
/// The result can build a device decoder for this device's packets.
pub fn fetch_stream_layout(device: &mut Device) -> AsphodelResult<StreamLayout> {
    let count_and_id = get_stream_count_and_id(device)?;
    let streams = (0..count_and_id.count)
        .map(|index| get_stream_info(device, index))
        .collect::<AsphodelResult<Vec<_>>>()?;

    let channel_count = get_channel_count(device)?;
    let channels = (0..channel_count)
        .map(|index| get_channel_info(device, index))
        .collect::<AsphodelResult<Vec<_>>>()?;

    debug!(
        "Fetched {} streams and {} channels from {}",
        streams.len(),
        channels.len(),
        device.location()
    );

    StreamLayout::from_device_tables(
        count_and_id.filler_bits,
        count_and_id.id_bits,
        device.stream_packet_length(),
        streams,
        &channels,
    )
}
