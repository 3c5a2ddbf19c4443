// Licensed under the Apache-2.0 license

//! Remote API functions
//!
//! Sent to a remote's own handle. The restart commands take the remote off
//! the radio link, so they complete when the link drops as well as on a
//! reply.

use crate::packing::{unpack_empty, unpack_reply};
use asphodel_device::Device;
use asphodel_protocol::replies::RemoteStatusReply;
use asphodel_protocol::{AsphodelError, AsphodelResult, Command, RemoteStatus};

fn ensure_remote(device: &Device) -> AsphodelResult<()> {
    if device.supports_remote_commands() {
        Ok(())
    } else {
        Err(AsphodelError::NotSupported)
    }
}

fn restart(device: &mut Device, command: Command) -> AsphodelResult<()> {
    ensure_remote(device)?;
    device.transfer_reset(command.code(), &[])
}

/// Disconnect the radio from its remote
pub fn stop_remote(device: &mut Device) -> AsphodelResult<()> {
    ensure_remote(device)?;
    let reply = device.command(Command::StopRemote, &[])?;
    unpack_empty(&reply)
}

/// Reconnect to the same remote in whatever mode it boots into
pub fn restart_remote(device: &mut Device) -> AsphodelResult<()> {
    restart(device, Command::RestartRemote)
}

/// Reconnect to the same remote and run its application
pub fn restart_remote_app(device: &mut Device) -> AsphodelResult<()> {
    restart(device, Command::RestartRemoteApp)
}

/// Reconnect to the same remote and hold it in its bootloader
pub fn restart_remote_boot(device: &mut Device) -> AsphodelResult<()> {
    restart(device, Command::RestartRemoteBoot)
}

pub fn get_remote_status(device: &mut Device) -> AsphodelResult<RemoteStatus> {
    ensure_remote(device)?;
    let reply = device.command(Command::GetRemoteStatus, &[])?;
    unpack_reply::<RemoteStatusReply>(&reply).map(RemoteStatus::from)
}
