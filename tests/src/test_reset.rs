// Licensed under the Apache-2.0 license

//! Reset style transfers and reconnecting afterwards

use crate::common::{open_device, ReconnectMode, Script};
use asphodel_commands::api;
use asphodel_device::DeviceState;
use asphodel_protocol::{AsphodelError, Command};
use std::sync::{Arc, Mutex};

#[test]
fn test_reset_tolerates_disconnect_on_send() {
    let (mut device, mock) = open_device();
    mock.queue(Command::Reset, Script::DisconnectOnSend);
    let states = Arc::new(Mutex::new(Vec::new()));
    let seen = states.clone();
    device.set_connect_callback(move |_, connected| seen.lock().unwrap().push(connected));

    assert_eq!(api::reset(&mut device), Ok(()));
    assert_eq!(mock.sent_commands(), vec![Command::Reset.code()]);
    assert_eq!(device.outstanding_transactions(), 0);
    assert_eq!(device.state(), DeviceState::Disconnected);
    assert!(!device.is_connected());
    assert_eq!(*states.lock().unwrap(), vec![true, false]);
}

#[test]
fn test_reset_tolerates_disconnect_before_reply() {
    let (mut device, mock) = open_device();
    mock.queue(Command::BootloaderJump, Script::DisconnectAfterSend);

    assert_eq!(api::bootloader_jump(&mut device), Ok(()));
    assert_eq!(device.state(), DeviceState::Disconnected);
    assert!(!device.is_connected());

    // The handle stays unusable until reconnected
    assert_eq!(api::get_led_count(&mut device), Err(AsphodelError::NoDevice));
}

#[test]
fn test_reset_with_reply() {
    let (mut device, mock) = open_device();
    mock.queue(Command::Reset, Script::Reply(vec![]));

    assert_eq!(api::reset(&mut device), Ok(()));
    assert_eq!(device.state(), DeviceState::Open);
}

#[test]
fn test_normal_transfer_fails_on_disconnect() {
    let (mut device, mock) = open_device();
    mock.queue(Command::GetLedCount, Script::DisconnectAfterSend);
    assert_eq!(api::get_led_count(&mut device), Err(AsphodelError::NoDevice));
    assert_eq!(device.state(), DeviceState::Disconnected);

    let (mut device, mock) = open_device();
    mock.queue(Command::GetLedCount, Script::DisconnectOnSend);
    assert_eq!(api::get_led_count(&mut device), Err(AsphodelError::NoDevice));
    assert_eq!(device.state(), DeviceState::Disconnected);
    assert!(!device.is_connected());

    // Nothing else reaches the transport until the handle is reconnected
    mock.set_reply(Command::GetLedCount, &[2]);
    assert_eq!(api::get_led_count(&mut device), Err(AsphodelError::NoDevice));
    assert_eq!(mock.sent_commands(), vec![Command::GetLedCount.code()]);
}

#[test]
fn test_reconnect_same_transport() {
    let (mut device, mock) = open_device();
    mock.queue(Command::Reset, Script::DisconnectAfterSend);
    api::reset(&mut device).unwrap();
    assert_eq!(device.state(), DeviceState::Disconnected);

    let reconnection = device.reconnect().unwrap();
    assert!(reconnection.reused);
    let mut device = reconnection.device;
    assert_eq!(device.state(), DeviceState::Open);
    assert_eq!(mock.state().reconnects, 1);

    mock.set_reply(Command::GetLedCount, &[2]);
    assert_eq!(api::get_led_count(&mut device), Ok(2));
}

#[test]
fn test_reconnect_new_transport() {
    let (mut device, mock) = open_device();
    mock.state().reconnect_mode = ReconnectMode::New;
    mock.queue(Command::BootloaderJump, Script::DisconnectOnSend);
    api::bootloader_jump(&mut device).unwrap();

    let reconnection = device.reconnect_bootloader().unwrap();
    assert!(!reconnection.reused);
    let mut device = reconnection.device;
    println!("Reconnected at {}", device.location());
    assert_eq!(device.location(), "mock:0+");
    assert_eq!(device.state(), DeviceState::Open);

    mock.set_reply(Command::GetLedCount, &[3]);
    assert_eq!(api::get_led_count(&mut device), Ok(3));
}

#[test]
fn test_reconnect_failure() {
    let (device, mock) = open_device();
    mock.state().reconnect_mode = ReconnectMode::Fail;

    assert_eq!(
        device.reconnect_application().err(),
        Some(AsphodelError::NoDevice)
    );
}
