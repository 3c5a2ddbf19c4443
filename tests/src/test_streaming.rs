// Licensed under the Apache-2.0 license

//! Stream packet delivery through the device handle

use crate::common::open_device;
use asphodel_protocol::{AsphodelError, StreamingParams};
use asphodel_transport::{TransportError, TransportEvent};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Batches = Arc<Mutex<Vec<(Result<usize, AsphodelError>, usize, usize)>>>;

fn recorder() -> (
    Batches,
    impl FnMut(Result<&[u8], AsphodelError>, usize, usize) + Send + 'static,
) {
    let batches: Batches = Arc::new(Mutex::new(Vec::new()));
    let seen = batches.clone();
    let callback = move |data: Result<&[u8], AsphodelError>, size: usize, count: usize| {
        seen.lock()
            .unwrap()
            .push((data.map(|d| d.len()), size, count));
    };
    (batches, callback)
}

#[test]
fn test_stream_batches() {
    let (mut device, mock) = open_device();
    let (batches, callback) = recorder();
    let params = StreamingParams {
        packet_count: 2,
        transfer_count: 4,
        timeout_ms: 100,
    };

    device.start_streaming_packets(&params, callback).unwrap();
    assert!(device.is_streaming());
    assert_eq!(mock.state().streaming, Some(params));

    mock.push_stream_packets(&[0xAB; 64]);
    mock.push_stream_packets(&[0xCD; 40]);
    mock.push_event(TransportEvent::StreamFault(TransportError::Timeout));
    device.poll(Duration::from_millis(1)).unwrap();

    assert_eq!(
        *batches.lock().unwrap(),
        vec![
            (Ok(64), 32, 2),
            (Err(AsphodelError::BadStreamPacketSize), 32, 0),
            (Err(AsphodelError::Timeout), 32, 0),
        ]
    );
    assert_eq!(device.statistics().stream_packets_received, 2);

    device.stop_streaming_packets().unwrap();
    assert!(!device.is_streaming());
    assert_eq!(mock.state().streaming, None);
}

#[test]
fn test_stream_start_rules() {
    let (mut device, mock) = open_device();

    let zero = StreamingParams {
        packet_count: 0,
        ..StreamingParams::default()
    };
    assert_eq!(
        device.start_streaming_packets(&zero, |_, _, _| {}),
        Err(AsphodelError::BadParameter)
    );

    let params = StreamingParams::default();
    device.start_streaming_packets(&params, |_, _, _| {}).unwrap();
    assert_eq!(
        device.start_streaming_packets(&params, |_, _, _| {}),
        Err(AsphodelError::Busy)
    );
    device.stop_streaming_packets().unwrap();

    mock.state().stream_packet_length = 0;
    assert_eq!(
        device.start_streaming_packets(&params, |_, _, _| {}),
        Err(AsphodelError::BadStreamPacketSize)
    );
}

#[test]
fn test_disconnect_stops_streaming() {
    let (mut device, mock) = open_device();
    device
        .start_streaming_packets(&StreamingParams::default(), |_, _, _| {})
        .unwrap();

    mock.push_event(TransportEvent::Disconnected);
    device.poll(Duration::from_millis(1)).unwrap();
    assert!(!device.is_streaming());
}

#[test]
fn test_blocking_stream_reads() {
    let (mut device, mock) = open_device();
    let timeout = Duration::from_millis(10);

    assert_eq!(
        device.get_stream_packets_blocking(33, timeout),
        Err(AsphodelError::BadParameter)
    );

    mock.state().stream_buffer = vec![7; 64];
    let data = device.get_stream_packets_blocking(96, timeout).unwrap();
    assert_eq!(data, vec![7; 64]);
    assert_eq!(device.statistics().stream_packets_received, 2);

    mock.state().stream_buffer = vec![7; 40];
    assert_eq!(
        device.get_stream_packets_blocking(64, timeout),
        Err(AsphodelError::BadStreamPacketSize)
    );
}
