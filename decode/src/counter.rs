// Licensed under the Apache-2.0 license

//! Packet Counter Decoding
//!
//! The wire counter wraps at 2^counter_bits. It is unwrapped into a 64 bit
//! count using the previous value so callers see a monotonic sequence.

use asphodel_protocol::{read_uint, AsphodelError, AsphodelResult, ByteOrder};

/// Supported counter widths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterWidth {
    U8,
    U16,
    U32,
    U64,
}

impl CounterWidth {
    pub fn from_bits(bits: u8) -> AsphodelResult<Self> {
        match bits {
            8 => Ok(CounterWidth::U8),
            16 => Ok(CounterWidth::U16),
            32 => Ok(CounterWidth::U32),
            64 => Ok(CounterWidth::U64),
            _ => Err(AsphodelError::StreamIdFormatUnsupported),
        }
    }

    pub fn bits(&self) -> u32 {
        match self {
            CounterWidth::U8 => 8,
            CounterWidth::U16 => 16,
            CounterWidth::U32 => 32,
            CounterWidth::U64 => 64,
        }
    }

    /// 2^bits - 1
    pub fn mask(&self) -> u64 {
        match self {
            CounterWidth::U64 => u64::MAX,
            other => (1u64 << other.bits()) - 1,
        }
    }

    /// Packets missing between two counts, `(current - last - 1) mod 2^bits`.
    /// A repeated count is a gap of `2^bits - 1`.
    pub fn gap(&self, current: u64, last: u64) -> u64 {
        current.wrapping_sub(last).wrapping_sub(1) & self.mask()
    }
}

/// Result of feeding one wire counter to the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterUpdate {
    pub width: CounterWidth,
    pub current: u64,
    /// Previous count, `None` for the first packet after a reset
    pub last: Option<u64>,
}

impl CounterUpdate {
    /// Packets missing between `last` and `current`
    pub fn lost(&self) -> u64 {
        match self.last {
            Some(last) => self.width.gap(self.current, last),
            None => 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CounterDecoder {
    width: CounterWidth,
    bit_offset: usize,
    last: Option<u64>,
}

impl CounterDecoder {
    /// The counter must start on a byte boundary
    pub fn new(counter_bits: u8, bit_offset: usize) -> AsphodelResult<Self> {
        let width = CounterWidth::from_bits(counter_bits)?;
        if bit_offset % 8 != 0 {
            return Err(AsphodelError::CounterFormatUnsupported);
        }
        Ok(Self {
            width,
            bit_offset,
            last: None,
        })
    }

    pub fn width(&self) -> CounterWidth {
        self.width
    }

    pub fn byte_offset(&self) -> usize {
        self.bit_offset / 8
    }

    pub fn end_bit(&self) -> usize {
        self.bit_offset + self.width.bits() as usize
    }

    pub fn last_count(&self) -> Option<u64> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Raw counter field of `packet`
    pub fn read(&self, packet: &[u8]) -> u64 {
        read_uint(packet, self.bit_offset, self.width.bits(), ByteOrder::Big)
    }

    /// Unwrap a wire counter against the previous count
    pub fn update(&mut self, wire: u64) -> CounterUpdate {
        let mask = self.width.mask();
        let current = match self.last {
            None => wire & mask,
            Some(last) => last.wrapping_add(wire.wrapping_sub(last) & mask),
        };
        let update = CounterUpdate {
            width: self.width,
            current,
            last: self.last,
        };
        self.last = Some(current);
        update
    }
}
