// Licensed under the Apache-2.0 license

//! Device information, NVM, LED, control variable and mode commands

use crate::common::{open_device, test_constants::*};
use asphodel_commands::api;
use asphodel_protocol::replies::CtrlVarInfoReply;
use asphodel_protocol::{AsphodelError, Command};
use zerocopy::byteorder::big_endian::{F32, I32};
use zerocopy::IntoBytes;

#[test]
fn test_board_info_and_strings() {
    let (mut device, mock) = open_device();
    let mut board = vec![3u8];
    board.extend_from_slice(BOARD_NAME.as_bytes());
    mock.set_reply(Command::GetBoardInfo, &board);
    mock.set_reply(Command::GetBuildInfo, b"release build");
    mock.set_reply(Command::GetChipFamily, b"XMega");
    mock.set_reply(Command::GetBootloaderInfo, b"");
    mock.set_reply(
        Command::GetProtocolVersion,
        &PROTOCOL_VERSION.to_be_bytes(),
    );

    let info = api::get_board_info(&mut device).unwrap();
    println!("Board: {:?}", info);
    assert_eq!(info.revision, 3);
    assert_eq!(info.name, BOARD_NAME);

    assert_eq!(api::get_build_info(&mut device).unwrap(), "release build");
    assert_eq!(api::get_chip_family(&mut device).unwrap(), "XMega");
    assert_eq!(api::get_bootloader_info(&mut device).unwrap(), "");

    let version = api::get_protocol_version(&mut device).unwrap();
    assert_eq!(
        (version.major(), version.minor(), version.subminor()),
        (2, 3, 3)
    );

    mock.set_reply(Command::GetBoardInfo, &[]);
    assert_eq!(
        api::get_board_info(&mut device).err(),
        Some(AsphodelError::BadReplyLength)
    );
}

#[test]
fn test_nvm_section_read() {
    let (mut device, mock) = open_device();
    mock.set_reply(Command::GetNvmSize, &[0x08, 0x00]);
    mock.set_reply(Command::ReadNvm, &[0, 1, 2, 3, 4, 5, 6, 7]);

    assert_eq!(api::get_nvm_size(&mut device), Ok(2048));

    let data = api::read_nvm_section(&mut device, 0x10, 20).unwrap();
    assert_eq!(
        data,
        vec![0, 1, 2, 3, 4, 5, 6, 7, 0, 1, 2, 3, 4, 5, 6, 7, 0, 1, 2, 3]
    );

    let addresses: Vec<Vec<u8>> = mock
        .sent()
        .iter()
        .filter(|frame| frame[1] == Command::ReadNvm.code())
        .map(|frame| frame[2..].to_vec())
        .collect();
    assert_eq!(addresses, vec![vec![0x00, 0x10], vec![0x00, 0x18], vec![0x00, 0x20]]);
}

#[test]
fn test_nvm_section_write() {
    let (mut device, mock) = open_device();
    mock.set_reply(Command::WriteNvm, &[]);
    mock.set_reply(Command::EraseNvm, &[]);

    api::erase_nvm(&mut device).unwrap();

    let data: Vec<u8> = (0..40).collect();
    api::write_nvm_section(&mut device, 0x40, &data).unwrap();

    let writes: Vec<Vec<u8>> = mock
        .sent()
        .into_iter()
        .filter(|frame| frame[1] == Command::WriteNvm.code())
        .collect();
    // 30 byte parameters leave room for 7 words after the address
    assert_eq!(writes.len(), 2);
    assert_eq!(&writes[0][2..4], &[0x00, 0x40]);
    assert_eq!(&writes[0][4..], &data[..28]);
    assert_eq!(&writes[1][2..4], &[0x00, 0x5C]);
    assert_eq!(&writes[1][4..], &data[28..]);

    assert_eq!(
        api::write_nvm_raw(&mut device, 0, &[1, 2, 3]),
        Err(AsphodelError::BadParameter)
    );
    assert_eq!(
        api::write_nvm_section(&mut device, 2, &[0; 4]),
        Err(AsphodelError::BadParameter)
    );
}

#[test]
fn test_state_flags() {
    let (mut device, mock) = open_device();
    mock.set_reply(Command::GetResetFlag, &[1]);
    mock.set_reply(Command::ClearResetFlag, &[]);
    mock.set_reply(Command::GetNvmModified, &[0]);
    mock.set_reply(Command::Flush, &[]);

    assert_eq!(api::get_reset_flag(&mut device), Ok(true));
    assert_eq!(api::clear_reset_flag(&mut device), Ok(()));
    assert_eq!(api::get_nvm_modified(&mut device), Ok(false));
    assert_eq!(api::flush(&mut device), Ok(()));
}

#[test]
fn test_leds() {
    let (mut device, mock) = open_device();
    mock.set_reply(Command::GetRgbCount, &[2]);
    mock.set_reply(Command::GetRgbValues, &[0x10, 0x20, 0x30]);
    mock.set_reply(Command::SetRgb, &[]);
    mock.set_reply(Command::SetRgbInstant, &[]);
    mock.set_reply(Command::GetLedCount, &[1]);
    mock.set_reply(Command::GetLedValue, &[0x80]);
    mock.set_reply(Command::SetLed, &[]);

    assert_eq!(api::get_rgb_count(&mut device), Ok(2));
    assert_eq!(api::get_rgb_values(&mut device, 1), Ok([0x10, 0x20, 0x30]));
    api::set_rgb_values(&mut device, 1, [1, 2, 3], false).unwrap();
    api::set_rgb_values_hex(&mut device, 0, 0x102030, true).unwrap();
    assert_eq!(api::get_led_count(&mut device), Ok(1));
    assert_eq!(api::get_led_value(&mut device, 0), Ok(0x80));
    api::set_led_value(&mut device, 0, 0x40, false).unwrap();

    let sent = mock.sent();
    assert_eq!(&sent[2][1..], &[0x12, 1, 1, 2, 3]);
    assert_eq!(&sent[3][1..], &[0x13, 0, 0x10, 0x20, 0x30]);
    assert_eq!(&sent[6][1..], &[0x16, 0, 0x40]);

    mock.set_reply(Command::GetRgbValues, &[0x10, 0x20]);
    assert_eq!(
        api::get_rgb_values(&mut device, 1),
        Err(AsphodelError::BadReplyLength)
    );
}

#[test]
fn test_ctrl_vars() {
    let (mut device, mock) = open_device();
    let info = CtrlVarInfoReply {
        unit_type: 4,
        minimum: I32::new(-100),
        maximum: I32::new(100),
        scale: F32::new(0.5),
        offset: F32::new(0.0),
    };
    mock.set_reply(Command::GetCtrlVarCount, &[1]);
    mock.set_reply(Command::GetCtrlVarName, b"Gain");
    mock.set_reply(Command::GetCtrlVarInfo, info.as_bytes());
    mock.set_reply(Command::GetCtrlVar, &(-5i32).to_be_bytes());
    mock.set_reply(Command::SetCtrlVar, &[]);

    assert_eq!(api::get_ctrl_var_count(&mut device), Ok(1));
    let info = api::get_ctrl_var_info(&mut device, 0).unwrap();
    assert_eq!(info.name, "Gain");
    assert_eq!((info.minimum, info.maximum), (-100, 100));
    assert_eq!(info.scale, 0.5);

    assert_eq!(api::get_ctrl_var(&mut device, 0), Ok(-5));
    api::set_ctrl_var(&mut device, 2, -5).unwrap();
    let last = mock.sent().pop().unwrap();
    assert_eq!(&last[1..], &[0x54, 2, 0xFF, 0xFF, 0xFF, 0xFB]);
}

#[test]
fn test_device_mode() {
    let (mut device, mock) = open_device();
    mock.set_reply(Command::SetDeviceMode, &[]);
    mock.set_reply(Command::GetDeviceMode, &[3]);

    api::set_device_mode(&mut device, 3).unwrap();
    assert_eq!(api::get_device_mode(&mut device), Ok(3));
    assert_eq!(&mock.sent()[0][1..], &[0x70, 3]);
}

