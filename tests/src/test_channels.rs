// Licensed under the Apache-2.0 license

//! Channel and stream descriptor commands, and decoding with a fetched
//! layout

use crate::common::{be_floats, open_device, test_constants::*, Script};
use asphodel_commands::api;
use asphodel_protocol::replies::{ChannelCalibrationReply, ChannelInfoReply, StreamFormatReply};
use asphodel_protocol::{write_bits, AsphodelError, ChannelInfo, ChannelType, Command};
use std::sync::{Arc, Mutex};
use zerocopy::byteorder::big_endian::{F32, I16, U16};
use zerocopy::IntoBytes;

fn info_reply(
    channel_type: ChannelType,
    bits_per_sample: i16,
    samples: u8,
    coefficients: u8,
    chunks: u8,
) -> Vec<u8> {
    ChannelInfoReply {
        channel_type: channel_type.into(),
        unit_type: 1,
        filler_bits: U16::new(0),
        data_bits: U16::new(bits_per_sample.unsigned_abs() * u16::from(samples)),
        samples,
        bits_per_sample: I16::new(bits_per_sample),
        minimum: F32::new(-10.0),
        maximum: F32::new(10.0),
        resolution: F32::new(0.01),
        coefficients_length: coefficients,
        chunk_count: chunks,
    }
    .as_bytes()
    .to_vec()
}

fn channel(channel_type: ChannelType, coefficients: usize) -> ChannelInfo {
    ChannelInfo {
        channel_type: channel_type.into(),
        samples: 1,
        bits_per_sample: 24,
        data_bits: 72,
        coefficients: vec![1.0; coefficients],
        ..Default::default()
    }
}

#[test]
fn test_channel_info_assembly() {
    let (mut device, mock) = open_device();
    mock.set_reply(
        Command::GetChannelInfo,
        &info_reply(ChannelType::SlowStrain, -24, 1, 3, 1),
    );
    mock.set_reply(Command::GetChannelName, b"Strain");
    mock.queue(
        Command::GetChannelCoefficients,
        Script::Reply(be_floats(&[1.0, 2.0])),
    );
    mock.queue(
        Command::GetChannelCoefficients,
        Script::Reply(be_floats(&[3.0])),
    );
    let chunk: Vec<u8> = (0..35).collect();
    mock.queue(Command::GetChannelChunk, Script::Reply(chunk[..30].to_vec()));
    mock.queue(Command::GetChannelChunk, Script::Reply(chunk[30..].to_vec()));

    let info = api::get_channel_info(&mut device, 4).unwrap();
    println!("Channel: {:?}", info);
    assert_eq!(info.name, "Strain");
    assert_eq!(info.channel_type().unwrap(), ChannelType::SlowStrain);
    assert_eq!(info.bits_per_sample, -24);
    assert_eq!(info.data_bits, 24);
    assert_eq!(info.coefficients, vec![1.0, 2.0, 3.0]);
    assert_eq!(info.chunks, vec![chunk]);

    let requests: Vec<Vec<u8>> = mock
        .sent()
        .into_iter()
        .filter(|frame| {
            frame[1] == Command::GetChannelCoefficients.code()
                || frame[1] == Command::GetChannelChunk.code()
        })
        .map(|frame| frame[2..].to_vec())
        .collect();
    assert_eq!(
        requests,
        vec![vec![4, 0], vec![4, 2], vec![4, 0, 0], vec![4, 0, 30]]
    );
}

#[test]
fn test_coefficients_bad_page() {
    let (mut device, mock) = open_device();
    mock.queue(Command::GetChannelCoefficients, Script::Reply(vec![0; 6]));
    assert_eq!(
        api::get_channel_coefficients(&mut device, 0, 2),
        Err(AsphodelError::BadReplyLength)
    );

    mock.queue(Command::GetChannelCoefficients, Script::Reply(vec![]));
    assert_eq!(
        api::get_channel_coefficients(&mut device, 0, 2),
        Err(AsphodelError::BadReplyLength)
    );
    assert_eq!(api::get_channel_coefficients(&mut device, 0, 0), Ok(vec![]));

    // More coefficients than were asked for
    mock.queue(
        Command::GetChannelCoefficients,
        Script::Reply(be_floats(&[1.0, 2.0, 3.0])),
    );
    assert_eq!(
        api::get_channel_coefficients(&mut device, 0, 2),
        Err(AsphodelError::BadReplyLength)
    );

    mock.queue(Command::GetChannelCoefficients, Script::Reply(be_floats(&[1.0])));
    mock.queue(
        Command::GetChannelCoefficients,
        Script::Reply(be_floats(&[2.0, 3.0])),
    );
    assert_eq!(
        api::get_channel_coefficients(&mut device, 0, 2),
        Err(AsphodelError::BadReplyLength)
    );
}

#[test]
fn test_channel_calibration() {
    let (mut device, mock) = open_device();
    mock.queue(Command::GetChannelCalibration, Script::Reply(vec![]));
    assert_eq!(api::get_channel_calibration(&mut device, 0), Ok(None));

    let reply = ChannelCalibrationReply {
        base_setting_index: 3,
        resolution_setting_index: 255,
        scale: F32::new(2.0),
        offset: F32::new(-1.0),
        minimum: F32::new(f32::NEG_INFINITY),
        maximum: F32::new(50.0),
    };
    mock.queue(
        Command::GetChannelCalibration,
        Script::Reply(reply.as_bytes().to_vec()),
    );
    let calibration = api::get_channel_calibration(&mut device, 0)
        .unwrap()
        .unwrap();
    assert_eq!(calibration.base_setting_index, 3);
    assert_eq!(calibration.resolution_setting(), None);
    assert_eq!(calibration.minimum(), None);
    assert_eq!(calibration.maximum(), Some(50.0));
    assert_eq!(calibration.scale, 2.0);

    mock.queue(Command::GetChannelCalibration, Script::Reply(vec![0; 17]));
    assert_eq!(
        api::get_channel_calibration(&mut device, 0),
        Err(AsphodelError::BadReplyLength)
    );
}

#[test]
fn test_strain_outputs() {
    let (mut device, mock) = open_device();
    mock.set_reply(Command::ChannelSpecific, &[]);
    let strain = channel(ChannelType::SlowStrain, 4);

    api::set_strain_outputs(&mut device, 2, &strain, 1, 1, 0).unwrap();
    assert_eq!(&mock.sent()[0][1..], &[0x35, 2, 0x01, 1, 1, 0]);

    assert_eq!(
        api::set_strain_outputs(&mut device, 2, &strain, 2, 1, 0),
        Err(AsphodelError::BadParameter)
    );
    assert_eq!(
        api::set_strain_outputs(&mut device, 2, &channel(ChannelType::Linear, 2), 0, 1, 0),
        Err(AsphodelError::BadChannelType)
    );
    assert_eq!(mock.sent().len(), 1);
}

#[test]
fn test_accel_self_test_command() {
    let (mut device, mock) = open_device();
    mock.set_reply(Command::ChannelSpecific, &[]);
    let accel = channel(ChannelType::LinearAccel, 6);

    api::enable_accel_self_test(&mut device, 1, &accel, true).unwrap();
    assert_eq!(&mock.sent()[0][1..], &[0x35, 1, 0x01, 1]);

    assert_eq!(
        api::enable_accel_self_test(&mut device, 1, &channel(ChannelType::Ntc, 6), true),
        Err(AsphodelError::BadChannelType)
    );
}

#[test]
fn test_stream_commands() {
    let (mut device, mock) = open_device();
    mock.set_reply(Command::GetStreamStatus, &[1, 0]);
    mock.set_reply(Command::EnableStream, &[]);
    mock.set_reply(Command::WarmUpStream, &[]);
    let mut rate_info = vec![1, 0, 0];
    rate_info.extend(be_floats(&[2.0, 0.5]));
    mock.set_reply(Command::GetStreamRateInfo, &rate_info);

    let status = api::get_stream_status(&mut device, 0).unwrap();
    assert!(status.enable);
    assert!(!status.warm_up);

    api::enable_stream(&mut device, 0, true).unwrap();
    api::warm_up_stream(&mut device, 1, false).unwrap();
    let sent = mock.sent();
    assert_eq!(&sent[1][1..], &[0x23, 0, 1]);
    assert_eq!(&sent[2][1..], &[0x24, 1, 0]);

    let rate = api::get_stream_rate_info(&mut device, 0).unwrap();
    assert!(rate.available);
    assert_eq!((rate.scale, rate.offset), (2.0, 0.5));
}

#[test]
fn test_fetch_layout_and_decode() {
    let (mut device, mock) = open_device();
    let format = StreamFormatReply {
        filler_bits: 0,
        counter_bits: 8,
        rate: F32::new(STREAM_RATE),
        rate_error: F32::new(0.0),
        warm_up_delay: F32::new(0.0),
    };
    mock.set_reply(Command::GetStreamCountAndId, &[1, 0, 0]);
    mock.set_reply(Command::GetStreamChannels, &[0]);
    mock.set_reply(Command::GetStreamFormat, format.as_bytes());
    mock.set_reply(Command::GetChannelCount, &[1]);
    mock.set_reply(
        Command::GetChannelInfo,
        &info_reply(ChannelType::Linear, 16, 2, 2, 0),
    );
    mock.set_reply(Command::GetChannelName, b"Pressure");
    mock.set_reply(Command::GetChannelCoefficients, &be_floats(&[0.5, 1.0]));

    let layout = api::fetch_stream_layout(&mut device).unwrap();
    assert_eq!(layout.streams.len(), 1);
    assert_eq!(layout.packet_length, 32);
    assert_eq!(layout.streams[0].channels[0].name, "Pressure");
    assert_eq!(layout.streams[0].stream.rate, STREAM_RATE);

    let mut decoder = layout.decoder().unwrap();
    assert_eq!(decoder.used_bits(), 40);

    let samples = Arc::new(Mutex::new(Vec::new()));
    let seen = samples.clone();
    decoder.streams_mut()[0].channels_mut()[0].add_callback(
        move |counter, values, sample_count, subchannels| {
            seen.lock()
                .unwrap()
                .push((counter, values.to_vec(), sample_count, subchannels));
        },
    );

    let mut packet = vec![0u8; layout.packet_length];
    write_bits(&mut packet, 0, 8, 7);
    write_bits(&mut packet, 8, 16, 100);
    write_bits(&mut packet, 24, 16, 200);
    decoder.decode(&packet);

    assert_eq!(
        *samples.lock().unwrap(),
        vec![(7, vec![51.0, 101.0], 2, 1)]
    );
}
