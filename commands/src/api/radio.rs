// Licensed under the Apache-2.0 license

//! Radio API functions
//!
//! Only devices advertising the radio protocol type accept these. A radio
//! scans for remotes and connects to one by serial number; the remote is
//! then reached through [`Device::remote_device`].

use crate::packing::{unpack_empty, unpack_reply, unpack_u32, unpack_u32_array};
use asphodel_device::Device;
use asphodel_protocol::replies::{ExtraScanResultEntry, RadioStatusReply, SerialNumberRequest};
use asphodel_protocol::{AsphodelError, AsphodelResult, Command, ExtraScanResult, RadioStatus};
use log::debug;
use zerocopy::byteorder::big_endian::U32;
use zerocopy::{FromBytes, IntoBytes};

fn ensure_radio(device: &Device) -> AsphodelResult<()> {
    if device.supports_radio_commands() {
        Ok(())
    } else {
        Err(AsphodelError::NotSupported)
    }
}

fn radio_command(device: &mut Device, command: Command, params: &[u8]) -> AsphodelResult<Vec<u8>> {
    ensure_radio(device)?;
    device.command(command, params)
}

/// Stop scanning and drop any remote connection
pub fn stop_radio(device: &mut Device) -> AsphodelResult<()> {
    let reply = radio_command(device, Command::StopRadio, &[])?;
    unpack_empty(&reply)
}

pub fn start_radio_scan(device: &mut Device) -> AsphodelResult<()> {
    let reply = radio_command(device, Command::StartRadioScan, &[])?;
    unpack_empty(&reply)
}

/// Scan for remotes running their bootloader
pub fn start_radio_scan_boot(device: &mut Device) -> AsphodelResult<()> {
    let reply = radio_command(device, Command::StartRadioScanBoot, &[])?;
    unpack_empty(&reply)
}

/// One page of scan results as returned by the device
pub fn get_raw_radio_scan_results(device: &mut Device) -> AsphodelResult<Vec<u32>> {
    let reply = radio_command(device, Command::GetRadioScanResults, &[])?;
    unpack_u32_array(&reply)
}

/// Every serial number found so far, sorted and without duplicates.
/// Pages are read until the device returns an empty one.
pub fn get_radio_scan_results(device: &mut Device) -> AsphodelResult<Vec<u32>> {
    let mut serials = Vec::new();
    loop {
        let page = get_raw_radio_scan_results(device)?;
        if page.is_empty() {
            break;
        }
        serials.extend(page);
    }
    serials.sort_unstable();
    serials.dedup();
    debug!("Radio scan found {} remotes", serials.len());
    Ok(serials)
}

pub fn get_raw_radio_extra_scan_results(
    device: &mut Device,
) -> AsphodelResult<Vec<ExtraScanResult>> {
    let reply = radio_command(device, Command::GetRadioExtraScanResults, &[])?;
    let entries = <[ExtraScanResultEntry]>::ref_from_bytes(&reply)
        .map_err(|_| AsphodelError::BadReplyLength)?;
    Ok(entries.iter().map(ExtraScanResult::from).collect())
}

/// Every extra scan result, sorted by serial number and keeping the first
/// entry seen for each
pub fn get_radio_extra_scan_results(
    device: &mut Device,
) -> AsphodelResult<Vec<ExtraScanResult>> {
    let mut results: Vec<ExtraScanResult> = Vec::new();
    loop {
        let page = get_raw_radio_extra_scan_results(device)?;
        if page.is_empty() {
            break;
        }
        for result in page {
            if !results.iter().any(|r| r.serial_number == result.serial_number) {
                results.push(result);
            }
        }
    }
    results.sort_by_key(|r| r.serial_number);
    Ok(results)
}

/// Received signal strength (dBm) of each serial number from the last scan.
/// Large lists are split across several requests.
pub fn get_radio_scan_power(device: &mut Device, serials: &[u32]) -> AsphodelResult<Vec<i8>> {
    ensure_radio(device)?;
    let per_request =
        (device.max_outgoing_param_length() / 4).min(device.max_incoming_param_length());
    if per_request == 0 {
        return Err(AsphodelError::OutgoingPacketTooLong);
    }

    let mut powers = Vec::with_capacity(serials.len());
    for batch in serials.chunks(per_request) {
        let params: Vec<U32> = batch.iter().copied().map(U32::new).collect();
        let reply = device.command(Command::GetRadioScanPower, params.as_slice().as_bytes())?;
        if reply.len() != batch.len() {
            return Err(AsphodelError::BadReplyLength);
        }
        powers.extend(reply.iter().map(|&power| power as i8));
    }
    Ok(powers)
}

pub fn connect_radio(device: &mut Device, serial_number: u32) -> AsphodelResult<()> {
    let request = SerialNumberRequest {
        serial_number: U32::new(serial_number),
    };
    let reply = radio_command(device, Command::ConnectRadio, request.as_bytes())?;
    unpack_empty(&reply)
}

/// Connect to a remote and keep it in its bootloader
pub fn connect_radio_boot(device: &mut Device, serial_number: u32) -> AsphodelResult<()> {
    let request = SerialNumberRequest {
        serial_number: U32::new(serial_number),
    };
    let reply = radio_command(device, Command::ConnectRadioBoot, request.as_bytes())?;
    unpack_empty(&reply)
}

pub fn get_radio_status(device: &mut Device) -> AsphodelResult<RadioStatus> {
    let reply = radio_command(device, Command::GetRadioStatus, &[])?;
    unpack_reply::<RadioStatusReply>(&reply).map(RadioStatus::from)
}

/// Control variable indices owned by the radio
pub fn get_radio_ctrl_vars(device: &mut Device) -> AsphodelResult<Vec<u8>> {
    radio_command(device, Command::GetRadioCtrlVars, &[])
}

/// Serial number the radio connects to on its own, 0 for none
pub fn get_radio_default_serial(device: &mut Device) -> AsphodelResult<u32> {
    let reply = radio_command(device, Command::GetRadioDefaultSerial, &[])?;
    unpack_u32(&reply)
}
