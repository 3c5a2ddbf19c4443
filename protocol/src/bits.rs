// Licensed under the Apache-2.0 license

//! Bit Packing Primitive
//!
//! Stream packets are packed MSB-first: bit 0 is the most significant bit
//! of byte 0. Every decoder reads through these functions; byte order is
//! an explicit parameter and never depends on the host.

/// Byte order of a multi-byte field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

/// Read `count` bits (0..=64) starting at `bit_offset`. Bits past the end
/// of `buf` read as zero.
pub fn read_bits(buf: &[u8], bit_offset: usize, count: u32) -> u64 {
    debug_assert!(count <= 64);
    let mut value = 0u64;
    let mut position = bit_offset;
    let mut remaining = count as usize;

    while remaining > 0 {
        let byte = buf.get(position / 8).copied().unwrap_or(0);
        let available = 8 - position % 8;
        let take = available.min(remaining);
        let shift = available - take;
        let mask = ((1u16 << take) - 1) as u8;
        value = (value << take) | u64::from((byte >> shift) & mask);
        position += take;
        remaining -= take;
    }

    value
}

/// Write the low `count` bits of `value` starting at `bit_offset`. Bits
/// that fall outside `buf` are dropped.
pub fn write_bits(buf: &mut [u8], bit_offset: usize, count: u32, value: u64) {
    debug_assert!(count <= 64);
    let mut position = bit_offset;
    let mut remaining = count as usize;

    while remaining > 0 {
        let available = 8 - position % 8;
        let take = available.min(remaining);
        let shift = available - take;
        let mask = ((1u16 << take) - 1) as u8;
        let chunk = ((value >> (remaining - take)) as u8) & mask;
        if let Some(byte) = buf.get_mut(position / 8) {
            *byte = (*byte & !(mask << shift)) | (chunk << shift);
        }
        position += take;
        remaining -= take;
    }
}

/// Sign extend the low `bits` bits of `value`
pub fn sign_extend(value: u64, bits: u32) -> i64 {
    match bits {
        0 => 0,
        64..=u32::MAX => value as i64,
        _ => {
            let shift = 64 - bits;
            ((value << shift) as i64) >> shift
        }
    }
}

/// Read an unsigned field of `bits` bits. Little endian fields must be a
/// whole number of bytes; the bytes are read in packet order and swapped.
pub fn read_uint(buf: &[u8], bit_offset: usize, bits: u32, order: ByteOrder) -> u64 {
    let raw = read_bits(buf, bit_offset, bits);
    match order {
        ByteOrder::Big => raw,
        ByteOrder::Little => swap_field_bytes(raw, bits),
    }
}

/// Counterpart of [`read_uint`]
pub fn write_uint(buf: &mut [u8], bit_offset: usize, bits: u32, value: u64, order: ByteOrder) {
    let raw = match order {
        ByteOrder::Big => value,
        ByteOrder::Little => swap_field_bytes(value, bits),
    };
    write_bits(buf, bit_offset, bits, raw);
}

pub fn read_f32(buf: &[u8], bit_offset: usize, order: ByteOrder) -> f32 {
    f32::from_bits(read_uint(buf, bit_offset, 32, order) as u32)
}

pub fn read_f64(buf: &[u8], bit_offset: usize, order: ByteOrder) -> f64 {
    f64::from_bits(read_uint(buf, bit_offset, 64, order))
}

fn swap_field_bytes(value: u64, bits: u32) -> u64 {
    if bits == 0 {
        return 0;
    }
    value.swap_bytes() >> (64 - bits)
}
