// Licensed under the Apache-2.0 license

//! Asphodel Commands Layer
//!
//! Typed command functions over a [`Device`](asphodel_device::Device),
//! built on blocking transfers with strict reply length checks.

pub use asphodel_protocol::*;

pub mod api;
pub mod packing;

pub use packing::*;
