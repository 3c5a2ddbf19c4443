// Licensed under the Apache-2.0 license

//! Supply commands and the bounded supply check retry

use crate::common::{open_device, Script};
use asphodel_commands::api;
use asphodel_protocol::replies::{CheckSupplyReply, SupplyInfoReply};
use asphodel_protocol::{AsphodelError, Command, DeviceErrorCode, SUPPLY_TOO_LOW};
use zerocopy::byteorder::big_endian::{F32, I32};
use zerocopy::IntoBytes;

fn check_reply(measurement: i32, result: u8) -> Vec<u8> {
    CheckSupplyReply {
        measurement: I32::new(measurement),
        result,
    }
    .as_bytes()
    .to_vec()
}

#[test]
fn test_supply_info() {
    let (mut device, mock) = open_device();
    let info = SupplyInfoReply {
        unit_type: 2,
        is_battery: 1,
        nominal: I32::new(3300),
        scale: F32::new(0.001),
        offset: F32::new(0.0),
    };
    mock.set_reply(Command::GetSupplyCount, &[1]);
    mock.set_reply(Command::GetSupplyName, b"Battery");
    mock.set_reply(Command::GetSupplyInfo, info.as_bytes());

    assert_eq!(api::get_supply_count(&mut device), Ok(1));
    let info = api::get_supply_info(&mut device, 0).unwrap();
    println!("Supply: {:?}", info);
    assert_eq!(info.name, "Battery");
    assert!(info.is_battery);
    assert_eq!(info.nominal, 3300);
}

#[test]
fn test_check_supply_retries_incomplete() {
    let (mut device, mock) = open_device();
    mock.queue(Command::CheckSupply, Script::Error(DeviceErrorCode::Incomplete));
    mock.queue(Command::CheckSupply, Script::Error(DeviceErrorCode::Incomplete));
    mock.queue(
        Command::CheckSupply,
        Script::Reply(check_reply(3280, SUPPLY_TOO_LOW)),
    );

    let check = api::check_supply(&mut device, 0, 5).unwrap();
    assert_eq!(check.measurement, 3280);
    assert!(check.result.too_low());
    assert!(!check.result.is_ok());
    assert_eq!(mock.sent().len(), 3);
}

#[test]
fn test_check_supply_too_many_tries() {
    let (mut device, mock) = open_device();
    for _ in 0..3 {
        mock.queue(Command::CheckSupply, Script::Error(DeviceErrorCode::Incomplete));
    }

    assert_eq!(
        api::check_supply(&mut device, 0, 2),
        Err(AsphodelError::TooManyTries)
    );
    assert_eq!(mock.sent().len(), 2);
    assert_eq!(
        api::check_supply(&mut device, 0, 0),
        Err(AsphodelError::BadParameter)
    );
}

#[test]
fn test_check_supply_other_errors() {
    let (mut device, mock) = open_device();
    mock.queue(Command::CheckSupply, Script::Error(DeviceErrorCode::BadIndex));

    assert_eq!(
        api::check_supply(&mut device, 9, 5),
        Err(AsphodelError::Device(DeviceErrorCode::BadIndex))
    );
    assert_eq!(mock.sent().len(), 1);

    mock.queue(Command::CheckSupply, Script::Reply(vec![0; 4]));
    assert_eq!(
        api::check_supply(&mut device, 0, 5),
        Err(AsphodelError::BadReplyLength)
    );
}
