// Licensed under the Apache-2.0 license

//! Channel Decoding
//!
//! A channel decoder turns the bits of one channel inside a stream packet
//! into calibrated samples. The decode strategy is chosen once from the
//! channel type when the decoder is built.

use asphodel_protocol::{
    read_bits, read_f32, read_f64, sign_extend, AsphodelError, AsphodelResult, ByteOrder,
    ChannelInfo, ChannelType,
};

/// Sample callback: counter, samples (`samples * subchannels` values,
/// sample major), sample count and subchannel count.
pub type SampleCallback = Box<dyn FnMut(u64, &[f64], usize, usize) + Send>;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Linear {
    scale: f64,
    offset: f64,
}

impl Linear {
    const IDENTITY: Linear = Linear {
        scale: 1.0,
        offset: 0.0,
    };

    fn from_coefficients(coefficients: &[f32]) -> Self {
        Self {
            scale: coefficients.first().map_or(1.0, |&c| f64::from(c)),
            offset: coefficients.get(1).map_or(0.0, |&c| f64::from(c)),
        }
    }

    fn apply(&self, raw: f64) -> f64 {
        raw * self.scale + self.offset
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Strategy {
    /// One value per sample
    Linear(Linear),
    /// Thermistor: linear step followed by Steinhart-Hart
    Ntc { linear: Linear, terms: [f64; 4] },
    /// All samples form the subchannels of a single output sample
    Array(Linear),
    /// Interleaved bridges, optionally followed by a sum subchannel
    Bridges { bridges: Vec<Linear>, sum: bool },
    /// Interleaved X, Y, Z
    Accel([Linear; 3]),
    Float { bits: u32, order: ByteOrder },
}

pub struct ChannelDecoder<'a> {
    info: &'a ChannelInfo,
    channel_type: ChannelType,
    strategy: Strategy,
    bit_offset: usize,
    data_offset: usize,
    bits: u32,
    signed: bool,
    samples: usize,
    subchannels: usize,
    subchannel_names: Vec<String>,
    conversion: Linear,
    output: Vec<f64>,
    callbacks: Vec<SampleCallback>,
}

impl<'a> ChannelDecoder<'a> {
    /// Build a decoder for `info` whose bits begin at `bit_offset` within
    /// the packet (filler included).
    pub fn new(info: &'a ChannelInfo, bit_offset: usize) -> AsphodelResult<Self> {
        let channel_type = ChannelType::try_from(info.channel_type)
            .map_err(|_| AsphodelError::ChannelFormatUnsupported)?;
        let bits = info.sample_bits();
        let raw_samples = usize::from(info.samples);
        if bits == 0 || bits > 64 || raw_samples == 0 {
            return Err(AsphodelError::ChannelFormatUnsupported);
        }

        let coefficients = info.coefficients.as_slice();
        let strategy = match channel_type {
            ChannelType::Linear => Strategy::Linear(Linear::from_coefficients(coefficients)),
            ChannelType::FastStrain => {
                Strategy::Linear(Linear::from_coefficients(coefficients))
            }
            ChannelType::Ntc => {
                if coefficients.len() < 6 {
                    return Err(AsphodelError::ChannelFormatUnsupported);
                }
                Strategy::Ntc {
                    linear: Linear::from_coefficients(coefficients),
                    terms: [
                        f64::from(coefficients[2]),
                        f64::from(coefficients[3]),
                        f64::from(coefficients[4]),
                        f64::from(coefficients[5]),
                    ],
                }
            }
            ChannelType::Array => Strategy::Array(Linear::from_coefficients(coefficients)),
            ChannelType::SlowStrain => Strategy::Bridges {
                bridges: bridge_coefficients(coefficients),
                sum: false,
            },
            ChannelType::CompositeStrain => Strategy::Bridges {
                bridges: bridge_coefficients(coefficients),
                sum: true,
            },
            ChannelType::SlowAccel | ChannelType::PackedAccel | ChannelType::LinearAccel => {
                Strategy::Accel(accel_coefficients(coefficients)?)
            }
            ChannelType::BigEndianFloat32 | ChannelType::LittleEndianFloat32 if bits == 32 => {
                Strategy::Float {
                    bits,
                    order: float_order(channel_type),
                }
            }
            ChannelType::BigEndianFloat64 | ChannelType::LittleEndianFloat64 if bits == 64 => {
                Strategy::Float {
                    bits,
                    order: float_order(channel_type),
                }
            }
            _ => return Err(AsphodelError::ChannelFormatUnsupported),
        };

        let (samples, subchannels, values_per_sample) = match &strategy {
            Strategy::Array(_) => (1, raw_samples, raw_samples),
            Strategy::Bridges { bridges, sum } => {
                (raw_samples, bridges.len() + usize::from(*sum), bridges.len())
            }
            Strategy::Accel(_) => (raw_samples, 3, 3),
            _ => (raw_samples, 1, 1),
        };

        let raw_values = samples * values_per_sample;
        if raw_values * bits as usize > usize::from(info.data_bits) {
            return Err(AsphodelError::ChannelFormatUnsupported);
        }

        let subchannel_names = subchannel_names(info, &strategy, subchannels);
        let signed = info.is_signed() && !matches!(strategy, Strategy::Float { .. });

        Ok(Self {
            info,
            channel_type,
            strategy,
            bit_offset,
            data_offset: bit_offset + usize::from(info.filler_bits),
            bits,
            signed,
            samples,
            subchannels,
            subchannel_names,
            conversion: Linear::IDENTITY,
            output: vec![0.0; samples * subchannels],
            callbacks: Vec::new(),
        })
    }

    pub fn info(&self) -> &'a ChannelInfo {
        self.info
    }

    pub fn channel_type(&self) -> ChannelType {
        self.channel_type
    }

    pub fn channel_name(&self) -> &str {
        &self.info.name
    }

    /// Where this channel (filler included) starts in the packet
    pub fn channel_bit_offset(&self) -> usize {
        self.bit_offset
    }

    /// First bit after this channel
    pub fn end_bit(&self) -> usize {
        self.data_offset + usize::from(self.info.data_bits)
    }

    /// Output samples per packet
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn subchannels(&self) -> usize {
        self.subchannels
    }

    pub fn subchannel_names(&self) -> &[String] {
        &self.subchannel_names
    }

    /// Extra `value * scale + offset` applied to every output value, e.g. a
    /// unit conversion chosen by the caller
    pub fn set_conversion_factor(&mut self, scale: f64, offset: f64) {
        self.conversion = Linear { scale, offset };
    }

    pub fn add_callback<F>(&mut self, callback: F)
    where
        F: FnMut(u64, &[f64], usize, usize) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    pub fn clear_callbacks(&mut self) {
        self.callbacks.clear();
    }

    pub fn reset(&mut self) {
        self.output.iter_mut().for_each(|value| *value = 0.0);
    }

    /// Decode this channel's part of `packet` and deliver it to every
    /// registered callback
    pub fn decode(&mut self, counter: u64, packet: &[u8]) {
        self.fill_output(packet);
        for callback in self.callbacks.iter_mut() {
            callback(counter, &self.output, self.samples, self.subchannels);
        }
    }

    /// Decode without callbacks, returning the calibrated values
    pub fn decode_values(&mut self, packet: &[u8]) -> &[f64] {
        self.fill_output(packet);
        &self.output
    }

    fn raw(&self, packet: &[u8], index: usize) -> f64 {
        let value = read_bits(packet, self.data_offset + index * self.bits as usize, self.bits);
        if self.signed {
            sign_extend(value, self.bits) as f64
        } else {
            value as f64
        }
    }

    fn fill_output(&mut self, packet: &[u8]) {
        let mut output = std::mem::take(&mut self.output);

        match &self.strategy {
            Strategy::Linear(linear) | Strategy::Array(linear) => {
                for (index, value) in output.iter_mut().enumerate() {
                    *value = linear.apply(self.raw(packet, index));
                }
            }
            Strategy::Ntc { linear, terms } => {
                for (index, value) in output.iter_mut().enumerate() {
                    *value = steinhart_hart(linear.apply(self.raw(packet, index)), terms);
                }
            }
            Strategy::Bridges { bridges, sum } => {
                for sample in 0..self.samples {
                    let row = &mut output[sample * self.subchannels..(sample + 1) * self.subchannels];
                    let mut total = 0.0;
                    for (bridge, linear) in bridges.iter().enumerate() {
                        let value = linear.apply(self.raw(packet, sample * bridges.len() + bridge));
                        row[bridge] = value;
                        total += value;
                    }
                    if *sum {
                        row[bridges.len()] = total;
                    }
                }
            }
            Strategy::Accel(axes) => {
                for (index, value) in output.iter_mut().enumerate() {
                    *value = axes[index % 3].apply(self.raw(packet, index));
                }
            }
            Strategy::Float { bits, order } => {
                for (index, value) in output.iter_mut().enumerate() {
                    let offset = self.data_offset + index * *bits as usize;
                    *value = match *bits {
                        32 => f64::from(read_f32(packet, offset, *order)),
                        _ => read_f64(packet, offset, *order),
                    };
                }
            }
        }

        if self.conversion != Linear::IDENTITY {
            for value in output.iter_mut() {
                *value = self.conversion.apply(*value);
            }
        }
        self.output = output;
    }
}

fn float_order(channel_type: ChannelType) -> ByteOrder {
    match channel_type {
        ChannelType::LittleEndianFloat32 | ChannelType::LittleEndianFloat64 => ByteOrder::Little,
        _ => ByteOrder::Big,
    }
}

fn bridge_coefficients(coefficients: &[f32]) -> Vec<Linear> {
    if coefficients.len() < 2 {
        return vec![Linear::from_coefficients(coefficients)];
    }
    coefficients
        .chunks_exact(2)
        .map(Linear::from_coefficients)
        .collect()
}

fn accel_coefficients(coefficients: &[f32]) -> AsphodelResult<[Linear; 3]> {
    match coefficients.len() {
        0 => Ok([Linear::IDENTITY; 3]),
        2 => Ok([Linear::from_coefficients(coefficients); 3]),
        n if n >= 6 => Ok([
            Linear::from_coefficients(&coefficients[0..2]),
            Linear::from_coefficients(&coefficients[2..4]),
            Linear::from_coefficients(&coefficients[4..6]),
        ]),
        _ => Err(AsphodelError::ChannelFormatUnsupported),
    }
}

/// Resistance to degrees Celsius
fn steinhart_hart(resistance: f64, terms: &[f64; 4]) -> f64 {
    if resistance <= 0.0 {
        return f64::NAN;
    }
    let ln = resistance.ln();
    let inverse = terms[0] + terms[1] * ln + terms[2] * ln * ln + terms[3] * ln * ln * ln;
    1.0 / inverse - 273.15
}

fn subchannel_names(info: &ChannelInfo, strategy: &Strategy, subchannels: usize) -> Vec<String> {
    let name = info.name.as_str();
    match strategy {
        Strategy::Array(_) => (0..subchannels).map(|i| format!("{} [{}]", name, i)).collect(),
        Strategy::Bridges { bridges, sum } if bridges.len() > 1 || *sum => {
            let mut names: Vec<String> = (0..bridges.len())
                .map(|i| format!("{} bridge {}", name, i))
                .collect();
            if *sum {
                names.push(format!("{} total", name));
            }
            names
        }
        Strategy::Accel(_) => ["X", "Y", "Z"]
            .iter()
            .map(|axis| format!("{} {}", name, axis))
            .collect(),
        _ => vec![name.to_string()],
    }
}
