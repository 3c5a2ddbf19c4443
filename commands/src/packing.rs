// Licensed under the Apache-2.0 license

//! Reply Unpacking
//!
//! Every reply must have exactly the length its command defines; anything
//! else is `BadReplyLength`, never a truncated or padded value.

use asphodel_protocol::{AsphodelError, AsphodelResult};
use zerocopy::FromBytes;

/// Unpack a fixed layout reply using zerocopy
pub fn unpack_reply<T: FromBytes>(data: &[u8]) -> AsphodelResult<T> {
    T::read_from_bytes(data).map_err(|_| AsphodelError::BadReplyLength)
}

pub fn unpack_empty(data: &[u8]) -> AsphodelResult<()> {
    if data.is_empty() {
        Ok(())
    } else {
        Err(AsphodelError::BadReplyLength)
    }
}

pub fn unpack_u8(data: &[u8]) -> AsphodelResult<u8> {
    match data {
        [value] => Ok(*value),
        _ => Err(AsphodelError::BadReplyLength),
    }
}

pub fn unpack_bool(data: &[u8]) -> AsphodelResult<bool> {
    unpack_u8(data).map(|value| value != 0)
}

pub fn unpack_u16(data: &[u8]) -> AsphodelResult<u16> {
    let bytes: [u8; 2] = data.try_into().map_err(|_| AsphodelError::BadReplyLength)?;
    Ok(u16::from_be_bytes(bytes))
}

pub fn unpack_i32(data: &[u8]) -> AsphodelResult<i32> {
    let bytes: [u8; 4] = data.try_into().map_err(|_| AsphodelError::BadReplyLength)?;
    Ok(i32::from_be_bytes(bytes))
}

pub fn unpack_u32(data: &[u8]) -> AsphodelResult<u32> {
    let bytes: [u8; 4] = data.try_into().map_err(|_| AsphodelError::BadReplyLength)?;
    Ok(u32::from_be_bytes(bytes))
}

/// Big-endian u16 array; the length must be even
pub fn unpack_u16_array(data: &[u8]) -> AsphodelResult<Vec<u16>> {
    if data.len() % 2 != 0 {
        return Err(AsphodelError::BadReplyLength);
    }
    Ok(data
        .chunks_exact(2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .collect())
}

/// Big-endian u32 array; the length must be a multiple of 4
pub fn unpack_u32_array(data: &[u8]) -> AsphodelResult<Vec<u32>> {
    if data.len() % 4 != 0 {
        return Err(AsphodelError::BadReplyLength);
    }
    Ok(data
        .chunks_exact(4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Big-endian f32 array; the length must be a multiple of 4
pub fn unpack_f32_array(data: &[u8]) -> AsphodelResult<Vec<f32>> {
    if data.len() % 4 != 0 {
        return Err(AsphodelError::BadReplyLength);
    }
    Ok(data
        .chunks_exact(4)
        .map(|b| f32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Device strings are UTF-8 without a terminator
pub fn unpack_string(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}
