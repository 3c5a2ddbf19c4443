// Licensed under the Apache-2.0 license

//! Connect callbacks, error callbacks and remote devices

use crate::common::{open_device, test_config, MockTransport};
use asphodel_device::{Device, DeviceState};
use asphodel_protocol::{AsphodelError, ProtocolType, PROTOCOL_TYPE_RADIO};
use asphodel_transport::{TransportError, TransportEvent, TransportKind};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[test]
fn test_connect_callback() {
    let (mut device, mock) = open_device();
    let states = Arc::new(Mutex::new(Vec::new()));
    let seen = states.clone();
    device.set_connect_callback(move |status, connected| {
        assert!(status.is_ok());
        seen.lock().unwrap().push(connected);
    });

    // Direct devices are connected as soon as they are open
    assert_eq!(*states.lock().unwrap(), vec![true]);
    assert_eq!(device.wait_for_connect(Duration::from_millis(10)), Ok(()));

    mock.push_event(TransportEvent::Connected(false));
    device.poll(Duration::from_millis(1)).unwrap();
    mock.push_event(TransportEvent::Connected(true));
    device.poll(Duration::from_millis(1)).unwrap();

    assert_eq!(*states.lock().unwrap(), vec![true, false, true]);

    device.clear_connect_callback();
    mock.push_event(TransportEvent::Connected(false));
    device.poll(Duration::from_millis(1)).unwrap();
    assert_eq!(states.lock().unwrap().len(), 3);
}

#[test]
fn test_wait_for_connect_timeout() {
    let (mut device, mock) = open_device();
    mock.push_event(TransportEvent::Connected(false));
    device.poll(Duration::from_millis(1)).unwrap();

    assert_eq!(
        device.wait_for_connect(Duration::from_millis(20)),
        Err(AsphodelError::Timeout)
    );
}

#[test]
fn test_error_callback_for_unroutable_frames() {
    let (mut device, mock) = open_device();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let seen = errors.clone();
    device.set_error_callback(move |error| seen.lock().unwrap().push(error));

    mock.push_event(TransportEvent::Reply(vec![]));
    mock.push_event(TransportEvent::Reply(vec![42, 0x10, 1]));
    mock.push_event(TransportEvent::SendFailed {
        transaction_id: None,
        error: TransportError::Pipe,
    });
    device.poll(Duration::from_millis(1)).unwrap();

    assert_eq!(
        *errors.lock().unwrap(),
        vec![
            AsphodelError::MalformedReply,
            AsphodelError::MismatchedTransaction,
            AsphodelError::Pipe,
        ]
    );
}

#[test]
fn test_transport_disconnect_event() {
    let (mut device, mock) = open_device();
    mock.push_event(TransportEvent::Disconnected);
    device.poll(Duration::from_millis(1)).unwrap();

    assert_eq!(device.state(), DeviceState::Disconnected);
    assert_eq!(device.serial_number(), Err(AsphodelError::NoDevice));
}

#[test]
fn test_device_surface() {
    let (mut device, _mock) = open_device();

    assert_eq!(device.transport_kind(), TransportKind::Virtual);
    assert_eq!(device.location(), "mock:0");
    assert_eq!(device.serial_number(), Ok("WM1234".to_string()));
    assert!(device.protocol_type().is_basic());
    assert!(!device.supports_radio_commands());
    assert!(!device.supports_bootloader_commands());
    assert_eq!(device.max_incoming_param_length(), 30);
    assert_eq!(device.stream_packet_length(), 32);
    assert_eq!(
        device.remote_device().err(),
        Some(AsphodelError::NotSupported)
    );
}

#[test]
fn test_remote_device() {
    let (transport, mock) = MockTransport::new();
    mock.state().protocol_type = ProtocolType::from(PROTOCOL_TYPE_RADIO);
    let mut radio = Device::new(Box::new(transport), test_config()).unwrap();
    radio.open().unwrap();
    assert!(radio.supports_radio_commands());

    let mut remote = radio.remote_device().unwrap();
    assert_eq!(remote.state(), DeviceState::Closed);
    assert_eq!(remote.transport_kind(), TransportKind::Remote);
    assert_eq!(remote.location(), "mock:0-remote");

    remote.open().unwrap();
    assert!(!remote.is_connected());
    assert_eq!(
        remote.wait_for_connect(Duration::from_millis(20)),
        Err(AsphodelError::Timeout)
    );
}

#[test]
fn test_closed_device_surface() {
    let (transport, _mock) = MockTransport::new();
    let mut device = Device::new(Box::new(transport), test_config()).unwrap();

    assert_eq!(device.state(), DeviceState::Closed);
    assert_eq!(device.serial_number(), Err(AsphodelError::DeviceClosed));
    device.free();
}
