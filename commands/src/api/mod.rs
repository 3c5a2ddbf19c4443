// Licensed under the Apache-2.0 license

//! High-level command API
//!
//! One module per feature area. Every function takes the device handle,
//! performs blocking transfers and validates reply lengths.

pub mod bootloader;
pub mod channel;
pub mod ctrl_var;
pub mod device_mode;
pub mod echo;
pub mod info;
pub mod led;
pub mod nvm;
pub mod radio;
pub mod remote;
pub mod reset;
pub mod rf_power;
pub mod stream;
pub mod supply;

pub use bootloader::*;
pub use channel::*;
pub use ctrl_var::*;
pub use device_mode::*;
pub use echo::*;
pub use info::*;
pub use led::*;
pub use nvm::*;
pub use radio::*;
pub use remote::*;
pub use reset::*;
pub use rf_power::*;
pub use stream::*;
pub use supply::*;
