// Licensed under the Apache-2.0 license

//! Wire Frames
//!
//! Request: `[transaction_id, command, params...]`
//! Reply:   `[transaction_id, command, payload...]`
//! Error:   `[transaction_id, 0xFF, device_error_code, ...]`

use crate::{AsphodelError, DeviceErrorCode, CMD_REPLY_ERROR};

/// Length of the transaction id and command header
pub const FRAME_HEADER_LEN: usize = 2;

/// Transaction id zero is never issued
pub const FIRST_TRANSACTION_ID: u8 = 1;

/// Build a request frame
pub fn encode_request(transaction_id: u8, command: u8, params: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + params.len());
    frame.push(transaction_id);
    frame.push(command);
    frame.extend_from_slice(params);
    frame
}

/// Decoded body of a reply frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyBody {
    /// Success reply echoing `command`
    Payload { command: u8, params: Vec<u8> },
    /// Device reported error or a reply too short to interpret
    Error(AsphodelError),
}

/// A reply frame that carried at least a transaction id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyFrame {
    pub transaction_id: u8,
    pub body: ReplyBody,
}

/// Split a raw reply. Returns `None` for an empty frame, which cannot be
/// routed to any transaction.
pub fn parse_reply(frame: &[u8]) -> Option<ReplyFrame> {
    let (&transaction_id, rest) = frame.split_first()?;

    let body = match rest {
        [] => ReplyBody::Error(AsphodelError::MalformedReply),
        [CMD_REPLY_ERROR] | [CMD_REPLY_ERROR, 0, ..] => {
            ReplyBody::Error(AsphodelError::MalformedError)
        }
        [CMD_REPLY_ERROR, code, ..] => {
            ReplyBody::Error(AsphodelError::Device(DeviceErrorCode::from(*code)))
        }
        [command, params @ ..] => ReplyBody::Payload {
            command: *command,
            params: params.to_vec(),
        },
    };

    Some(ReplyFrame {
        transaction_id,
        body,
    })
}

/// Build a success reply frame (device side, used by mock transports)
pub fn encode_reply(transaction_id: u8, command: u8, payload: &[u8]) -> Vec<u8> {
    encode_request(transaction_id, command, payload)
}

/// Build an error reply frame (device side, used by mock transports)
pub fn encode_error_reply(transaction_id: u8, code: DeviceErrorCode) -> Vec<u8> {
    vec![transaction_id, CMD_REPLY_ERROR, code.into()]
}
