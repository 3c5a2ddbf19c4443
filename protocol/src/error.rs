// Licensed under the Apache-2.0 license

//! Error Types
//!
//! One flat error enumeration for every fallible host operation. Negative
//! codes are generated on the host, positive codes come from the device's
//! own error table and zero is success.

use num_enum::{FromPrimitive, IntoPrimitive};
use thiserror::Error;

/// Error codes reported by the device inside an error reply frame
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
pub enum DeviceErrorCode {
    Unspecified = 0x01,
    MalformedCommand = 0x02,
    UnimplementedCommand = 0x03,
    BadCmdLength = 0x04,
    BadAddress = 0x05,
    BadIndex = 0x06,
    InvalidData = 0x07,
    Unsupported = 0x08,
    BadState = 0x09,
    I2cError = 0x0A,
    Incomplete = 0x0B,
    #[num_enum(catch_all)]
    Other(u8),
}

impl DeviceErrorCode {
    pub fn name(&self) -> &'static str {
        match self {
            DeviceErrorCode::Unspecified => "ERROR_CODE_UNSPECIFIED",
            DeviceErrorCode::MalformedCommand => "ERROR_CODE_MALFORMED_COMMAND",
            DeviceErrorCode::UnimplementedCommand => "ERROR_CODE_UNIMPLEMENTED_COMMAND",
            DeviceErrorCode::BadCmdLength => "ERROR_CODE_BAD_CMD_LENGTH",
            DeviceErrorCode::BadAddress => "ERROR_CODE_BAD_ADDRESS",
            DeviceErrorCode::BadIndex => "ERROR_CODE_BAD_INDEX",
            DeviceErrorCode::InvalidData => "ERROR_CODE_INVALID_DATA",
            DeviceErrorCode::Unsupported => "ERROR_CODE_UNSUPPORTED",
            DeviceErrorCode::BadState => "ERROR_CODE_BAD_STATE",
            DeviceErrorCode::I2cError => "ERROR_CODE_I2C_ERROR",
            DeviceErrorCode::Incomplete => "ERROR_CODE_INCOMPLETE",
            DeviceErrorCode::Other(_) => "ERROR_CODE_UNKNOWN",
        }
    }
}

impl core::fmt::Display for DeviceErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DeviceErrorCode::Other(code) => write!(f, "{} (0x{:02X})", self.name(), code),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Host library error enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AsphodelError {
    // Transport faults
    #[error("I/O error")]
    Io,
    #[error("access denied")]
    Access,
    #[error("no device")]
    NoDevice,
    #[error("device busy")]
    Busy,
    #[error("timeout")]
    Timeout,
    #[error("overflow")]
    Overflow,
    #[error("pipe error")]
    Pipe,
    #[error("interrupted")]
    Interrupted,
    #[error("not supported")]
    NotSupported,
    #[error("transport error")]
    TransportError,
    #[error("stall")]
    Stall,
    #[error("cancelled")]
    Cancelled,

    // Library faults
    #[error("out of memory")]
    NoMem,
    #[error("bad reply length")]
    BadReplyLength,
    #[error("malformed reply")]
    MalformedReply,
    #[error("malformed error reply")]
    MalformedError,
    #[error("mismatched transaction")]
    MismatchedTransaction,
    #[error("mismatched command")]
    MismatchedCommand,
    #[error("transfer error")]
    TransferError,
    #[error("invalid descriptor")]
    InvalidDescriptor,
    #[error("transaction table full")]
    FullTransactionTable,
    #[error("device closed")]
    DeviceClosed,
    #[error("bad parameter")]
    BadParameter,
    #[error("counter format unsupported")]
    CounterFormatUnsupported,
    #[error("channel format unsupported")]
    ChannelFormatUnsupported,
    #[error("stream id format unsupported")]
    StreamIdFormatUnsupported,
    #[error("too many tries")]
    TooManyTries,
    #[error("bad stream packet size")]
    BadStreamPacketSize,
    #[error("bad channel type")]
    BadChannelType,
    #[error("outgoing packet too long")]
    OutgoingPacketTooLong,
    #[error("bad stream rate")]
    BadStreamRate,
    #[error("not found")]
    NotFound,
    #[error("no resources")]
    NoResources,
    #[error("unreachable")]
    Unreachable,
    #[error("uninitialized")]
    Uninitialized,

    /// Error reported by the device itself
    #[error("device error: {0}")]
    Device(DeviceErrorCode),
}

/// Result type used throughout the host library
pub type AsphodelResult<T> = Result<T, AsphodelError>;

// (error, code, name) for every host generated error
const HOST_ERRORS: &[(AsphodelError, i32, &str)] = &[
    (AsphodelError::Io, -1, "ASPHODEL_ERROR_IO"),
    (AsphodelError::Access, -3, "ASPHODEL_ACCESS_ERROR"),
    (AsphodelError::NoDevice, -4, "ASPHODEL_NO_DEVICE"),
    (AsphodelError::Busy, -6, "ASPHODEL_BUSY"),
    (AsphodelError::Timeout, -7, "ASPHODEL_TIMEOUT"),
    (AsphodelError::Overflow, -8, "ASPHODEL_OVERFLOW"),
    (AsphodelError::Pipe, -9, "ASPHODEL_PIPE_ERROR"),
    (AsphodelError::Interrupted, -10, "ASPHODEL_INTERRUPTED"),
    (AsphodelError::NotSupported, -12, "ASPHODEL_NOT_SUPPORTED"),
    (AsphodelError::TransportError, -50, "ASPHODEL_TRANSPORT_ERROR"),
    (AsphodelError::Stall, -51, "ASPHODEL_STALL"),
    (AsphodelError::Cancelled, -52, "ASPHODEL_CANCELLED"),
    (AsphodelError::NoMem, -101, "ASPHODEL_NO_MEM"),
    (AsphodelError::BadReplyLength, -102, "ASPHODEL_BAD_REPLY_LENGTH"),
    (AsphodelError::MalformedReply, -103, "ASPHODEL_MALFORMED_REPLY"),
    (AsphodelError::MalformedError, -104, "ASPHODEL_MALFORMED_ERROR"),
    (AsphodelError::MismatchedTransaction, -105, "ASPHODEL_MISMATCHED_TRANSACTION"),
    (AsphodelError::MismatchedCommand, -106, "ASPHODEL_MISMATCHED_COMMAND"),
    (AsphodelError::TransferError, -107, "ASPHODEL_TRANSFER_ERROR"),
    (AsphodelError::InvalidDescriptor, -108, "ASPHODEL_INVALID_DESCRIPTOR"),
    (AsphodelError::FullTransactionTable, -109, "ASPHODEL_FULL_TRANSACTION_TABLE"),
    (AsphodelError::DeviceClosed, -110, "ASPHODEL_DEVICE_CLOSED"),
    (AsphodelError::BadParameter, -111, "ASPHODEL_BAD_PARAMETER"),
    (AsphodelError::CounterFormatUnsupported, -112, "ASPHODEL_COUNTER_FORMAT_UNSUPPORTED"),
    (AsphodelError::ChannelFormatUnsupported, -113, "ASPHODEL_CHANNEL_FORMAT_UNSUPPORTED"),
    (AsphodelError::StreamIdFormatUnsupported, -114, "ASPHODEL_STREAM_ID_FORMAT_UNSUPPORTED"),
    (AsphodelError::TooManyTries, -115, "ASPHODEL_TOO_MANY_TRIES"),
    (AsphodelError::BadStreamPacketSize, -116, "ASPHODEL_BAD_STREAM_PACKET_SIZE"),
    (AsphodelError::BadChannelType, -117, "ASPHODEL_BAD_CHANNEL_TYPE"),
    (AsphodelError::OutgoingPacketTooLong, -118, "ASPHODEL_OUTGOING_PACKET_TOO_LONG"),
    (AsphodelError::BadStreamRate, -119, "ASPHODEL_BAD_STREAM_RATE"),
    (AsphodelError::NotFound, -120, "ASPHODEL_NOT_FOUND"),
    (AsphodelError::NoResources, -121, "ASPHODEL_NO_RESOURCES"),
    (AsphodelError::Unreachable, -122, "ASPHODEL_UNREACHABLE"),
    (AsphodelError::Uninitialized, -123, "ASPHODEL_UNINITIALIZED"),
];

impl AsphodelError {
    /// Signed integer code of this error. Never zero.
    pub fn code(&self) -> i32 {
        match self {
            AsphodelError::Device(code) => u8::from(*code) as i32,
            other => HOST_ERRORS
                .iter()
                .find(|(error, _, _)| error == other)
                .map(|(_, code, _)| *code)
                .unwrap_or(-1),
        }
    }

    /// Inverse of [`AsphodelError::code`]. Returns `None` for success and
    /// for negative codes outside the table.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => None,
            1..=255 => Some(AsphodelError::Device(DeviceErrorCode::from(code as u8))),
            _ => HOST_ERRORS
                .iter()
                .find(|(_, c, _)| *c == code)
                .map(|(error, _, _)| *error),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AsphodelError::Device(code) => code.name(),
            other => HOST_ERRORS
                .iter()
                .find(|(error, _, _)| error == other)
                .map(|(_, _, name)| *name)
                .unwrap_or("ASPHODEL_UNKNOWN_ERROR"),
        }
    }

    /// True when the handle that produced this error must not be used for
    /// further transactions until it is reconnected.
    pub fn is_fatal_to_handle(&self) -> bool {
        matches!(self, AsphodelError::DeviceClosed | AsphodelError::NoDevice)
    }
}

/// Name of an integer error code, including `ASPHODEL_SUCCESS` for zero
pub fn error_name(code: i32) -> &'static str {
    match AsphodelError::from_code(code) {
        Some(error) => error.name(),
        None if code == 0 => "ASPHODEL_SUCCESS",
        None => "ASPHODEL_UNKNOWN_ERROR",
    }
}

impl From<DeviceErrorCode> for AsphodelError {
    fn from(code: DeviceErrorCode) -> Self {
        AsphodelError::Device(code)
    }
}
