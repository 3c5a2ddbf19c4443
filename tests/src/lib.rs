// Licensed under the Apache-2.0 license

//! Integration tests for asphodel-host
//!
//! This module organizes all integration tests in a single library
//! to avoid the need to list each test file in Cargo.toml



#[cfg(test)]
pub mod test_reset;

#[cfg(test)]
pub mod test_connect;

#[cfg(test)]
pub mod test_device_info;

#[cfg(test)]
pub mod test_channels;

#[cfg(test)]
pub mod test_supply;

#[cfg(test)]
pub mod test_streaming;



#[cfg(test)]
pub mod test_bootloader;
