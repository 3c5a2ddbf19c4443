// Licensed under the Apache-2.0 license

//! Transport error types

use asphodel_protocol::AsphodelError;
use core::fmt;

pub type TransportResult<T> = Result<T, TransportError>;

/// Faults raised by a transport implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Input/output failure
    Io(Option<&'static str>),

    /// Permission denied by the operating system
    Access,

    /// Device vanished or was never attached
    NoDevice,

    /// Endpoint held by someone else
    Busy,

    /// Operation timeout
    Timeout,

    /// Device sent more data than requested
    Overflow,

    /// Endpoint halted
    Pipe,

    /// Interrupted by a signal
    Interrupted,

    /// Operation not supported by this transport
    NotSupported(&'static str),

    /// Endpoint stalled
    Stall,

    /// Transfer was cancelled before completing
    Cancelled,

    /// Transport closed underneath an operation
    Disconnected,

    /// Host or network unreachable
    Unreachable,

    /// Not enough host resources
    NoResources,

    /// Unclassified transport error
    Custom(&'static str),
}

impl TransportError {
    /// True for faults that mean the device went away. A reset style
    /// transfer treats these as success.
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            TransportError::NoDevice
                | TransportError::Disconnected
                | TransportError::Pipe
                | TransportError::Cancelled
        )
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Io(msg) => {
                write!(f, "I/O error")?;
                if let Some(msg) = msg {
                    write!(f, ": {}", msg)?;
                }
                Ok(())
            }
            TransportError::Access => write!(f, "Access denied"),
            TransportError::NoDevice => write!(f, "No device"),
            TransportError::Busy => write!(f, "Busy"),
            TransportError::Timeout => write!(f, "Timeout"),
            TransportError::Overflow => write!(f, "Overflow"),
            TransportError::Pipe => write!(f, "Pipe error"),
            TransportError::Interrupted => write!(f, "Interrupted"),
            TransportError::NotSupported(msg) => write!(f, "Not supported: {}", msg),
            TransportError::Stall => write!(f, "Stall"),
            TransportError::Cancelled => write!(f, "Cancelled"),
            TransportError::Disconnected => write!(f, "Transport disconnected"),
            TransportError::Unreachable => write!(f, "Unreachable"),
            TransportError::NoResources => write!(f, "No resources"),
            TransportError::Custom(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for AsphodelError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Io(_) => AsphodelError::Io,
            TransportError::Access => AsphodelError::Access,
            TransportError::NoDevice | TransportError::Disconnected => AsphodelError::NoDevice,
            TransportError::Busy => AsphodelError::Busy,
            TransportError::Timeout => AsphodelError::Timeout,
            TransportError::Overflow => AsphodelError::Overflow,
            TransportError::Pipe => AsphodelError::Pipe,
            TransportError::Interrupted => AsphodelError::Interrupted,
            TransportError::NotSupported(_) => AsphodelError::NotSupported,
            TransportError::Stall => AsphodelError::Stall,
            TransportError::Cancelled => AsphodelError::Cancelled,
            TransportError::Unreachable => AsphodelError::Unreachable,
            TransportError::NoResources => AsphodelError::NoResources,
            TransportError::Custom(_) => AsphodelError::TransportError,
        }
    }
}
