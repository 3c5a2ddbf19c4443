// Licensed under the Apache-2.0 license

//! Bootloader page programming and remote restarts

use crate::common::{open_device, MockHandle, Script};
use asphodel_commands::api;
use asphodel_device::{Device, DeviceState};
use asphodel_protocol::replies::RemoteStatusReply;
use asphodel_protocol::{
    AsphodelError, BootloaderPageInfo, Command, ProtocolType, PROTOCOL_TYPE_BOOTLOADER,
    PROTOCOL_TYPE_REMOTE,
};
use zerocopy::byteorder::big_endian::U32;
use zerocopy::IntoBytes;

fn open_with_type(protocol_type: u8) -> (Device, MockHandle) {
    let (device, mock) = open_device();
    mock.state().protocol_type = ProtocolType::from(protocol_type);
    (device, mock)
}

#[test]
fn test_bootloader_commands_need_bootloader() {
    let (mut device, mock) = open_with_type(PROTOCOL_TYPE_REMOTE);
    assert_eq!(
        api::get_bootloader_page_info(&mut device),
        Err(AsphodelError::NotSupported)
    );
    assert_eq!(
        api::bootloader_start_program(&mut device),
        Err(AsphodelError::NotSupported)
    );
    assert_eq!(
        api::write_bootloader_page(&mut device, &[0; 16], &[16]),
        Err(AsphodelError::NotSupported)
    );
    assert!(mock.sent().is_empty());
}

#[test]
fn test_bootloader_page_info_and_block_sizes() {
    let (mut device, mock) = open_with_type(PROTOCOL_TYPE_BOOTLOADER);
    let words: Vec<u8> = [4u32, 1024, 2, 4096]
        .iter()
        .flat_map(|v| v.to_be_bytes())
        .collect();
    mock.set_reply(Command::GetBootloaderPageInfo, &words);
    mock.set_reply(Command::GetBootloaderBlockSizes, &[0x00, 0x10, 0x01, 0x00]);

    let pages = api::get_bootloader_page_info(&mut device).unwrap();
    assert_eq!(
        pages,
        vec![
            BootloaderPageInfo {
                page_count: 4,
                page_size: 1024
            },
            BootloaderPageInfo {
                page_count: 2,
                page_size: 4096
            },
        ]
    );
    assert_eq!(api::get_bootloader_block_sizes(&mut device), Ok(vec![16, 256]));

    // A count without its size
    mock.queue(
        Command::GetBootloaderPageInfo,
        Script::Reply(words[..12].to_vec()),
    );
    assert_eq!(
        api::get_bootloader_page_info(&mut device),
        Err(AsphodelError::BadReplyLength)
    );
    mock.queue(Command::GetBootloaderBlockSizes, Script::Reply(vec![0; 3]));
    assert_eq!(
        api::get_bootloader_block_sizes(&mut device),
        Err(AsphodelError::BadReplyLength)
    );
}

#[test]
fn test_bootloader_page_sequence() {
    let (mut device, mock) = open_with_type(PROTOCOL_TYPE_BOOTLOADER);
    mock.state().max_outgoing_param_length = 40;
    mock.set_reply(Command::StartBootloaderPage, &[]);
    mock.set_reply(Command::WriteBootloaderCodeBlock, &[]);
    mock.set_reply(Command::FinishBootloaderPage, &[]);
    mock.set_reply(Command::VerifyBootloaderPage, &[]);

    let data: Vec<u8> = (0..80).collect();
    api::start_bootloader_page(&mut device, 3, &[0xA, 0xB, 0xC, 0xD]).unwrap();
    // 64 byte blocks exceed the packet, so 32 + 32 + 16
    api::write_bootloader_page(&mut device, &data, &[16, 32, 64]).unwrap();
    api::finish_bootloader_page(&mut device, &[0xEE; 8]).unwrap();
    api::verify_bootloader_page(&mut device, &[0xEE; 8]).unwrap();

    let sent = mock.sent();
    println!("Sent commands: {:02X?}", mock.sent_commands());
    assert_eq!(
        mock.sent_commands(),
        vec![0xA3, 0xA4, 0xA4, 0xA4, 0xA5, 0xA6]
    );
    assert_eq!(&sent[0][1..], &[0xA3, 0, 0, 0, 3, 0xA, 0xB, 0xC, 0xD]);
    assert_eq!(&sent[1][2..], &data[..32]);
    assert_eq!(&sent[2][2..], &data[32..64]);
    assert_eq!(&sent[3][2..], &data[64..]);
    assert_eq!(&sent[4][2..], &[0xEE; 8]);
}

#[test]
fn test_bootloader_page_without_fitting_block() {
    let (mut device, mock) = open_with_type(PROTOCOL_TYPE_BOOTLOADER);
    mock.set_reply(Command::WriteBootloaderCodeBlock, &[]);

    // 16 bytes go out, the remaining 4 fit no block size
    assert_eq!(
        api::write_bootloader_page(&mut device, &[0; 20], &[16]),
        Err(AsphodelError::BadParameter)
    );
    assert_eq!(mock.sent_commands(), vec![0xA4]);

    assert_eq!(
        api::write_bootloader_page(&mut device, &[0; 8], &[]),
        Err(AsphodelError::BadParameter)
    );
    assert_eq!(api::write_bootloader_page(&mut device, &[], &[]), Ok(()));
    assert_eq!(mock.sent().len(), 1);
}

#[test]
fn test_bootloader_start_program_resets() {
    let (mut device, mock) = open_with_type(PROTOCOL_TYPE_BOOTLOADER);
    mock.queue(Command::BootloaderStartProgram, Script::DisconnectOnSend);

    assert_eq!(api::bootloader_start_program(&mut device), Ok(()));
    assert_eq!(mock.sent_commands(), vec![0xA0]);
    assert_eq!(device.state(), DeviceState::Disconnected);
}

#[test]
fn test_remote_restarts() {
    let (mut device, mock) = open_with_type(PROTOCOL_TYPE_REMOTE);
    mock.queue(Command::RestartRemote, Script::DisconnectOnSend);
    assert_eq!(api::restart_remote(&mut device), Ok(()));
    assert_eq!(device.state(), DeviceState::Disconnected);

    let (mut device, mock) = open_with_type(PROTOCOL_TYPE_REMOTE);
    mock.queue(Command::RestartRemoteApp, Script::DisconnectAfterSend);
    assert_eq!(api::restart_remote_app(&mut device), Ok(()));
    assert_eq!(device.state(), DeviceState::Disconnected);

    let (mut device, mock) = open_with_type(PROTOCOL_TYPE_REMOTE);
    mock.queue(Command::RestartRemoteBoot, Script::Reply(vec![]));
    assert_eq!(api::restart_remote_boot(&mut device), Ok(()));
    assert_eq!(device.state(), DeviceState::Open);
    assert_eq!(mock.sent_commands(), vec![0x9E]);

    let (mut device, mock) = open_device();
    assert_eq!(
        api::restart_remote(&mut device),
        Err(AsphodelError::NotSupported)
    );
    assert!(mock.sent().is_empty());
}

#[test]
fn test_remote_stop_and_status() {
    let (mut device, mock) = open_with_type(PROTOCOL_TYPE_REMOTE);
    let status = RemoteStatusReply {
        connected: 1,
        serial_number: U32::new(77),
        protocol_type: PROTOCOL_TYPE_BOOTLOADER | PROTOCOL_TYPE_REMOTE,
    };
    mock.set_reply(Command::StopRemote, &[]);
    mock.set_reply(Command::GetRemoteStatus, status.as_bytes());

    api::stop_remote(&mut device).unwrap();
    let status = api::get_remote_status(&mut device).unwrap();
    assert!(status.connected);
    assert_eq!(status.serial_number, 77);
    assert!(status.protocol_type.bootloader());
    assert_eq!(mock.sent_commands(), vec![0x9A, 0x9C]);

    mock.queue(Command::GetRemoteStatus, Script::Reply(vec![0; 7]));
    assert_eq!(
        api::get_remote_status(&mut device),
        Err(AsphodelError::BadReplyLength)
    );
}
