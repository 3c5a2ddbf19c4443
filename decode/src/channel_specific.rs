// Licensed under the Apache-2.0 license

//! Strain bridge and accelerometer self test helpers that read a channel's
//! coefficients and chunks.

use asphodel_protocol::{AsphodelError, AsphodelResult, ChannelInfo, ChannelType};

/// Calibration of one strain bridge, stored big-endian in the bridge's chunk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrainBridgeValues {
    pub positive_sense: f32,
    pub negative_sense: f32,
    pub nominal: f32,
    pub minimum: f32,
    pub maximum: f32,
}

/// Allowed self test deltas per axis, stored big-endian in chunk 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelSelfTestLimits {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

fn be_floats<const N: usize>(chunk: &[u8]) -> AsphodelResult<[f32; N]> {
    if chunk.len() != N * 4 {
        return Err(AsphodelError::BadParameter);
    }
    let mut values = [0.0f32; N];
    for (value, bytes) in values.iter_mut().zip(chunk.chunks_exact(4)) {
        *value = f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
    Ok(values)
}

pub fn strain_bridge_count(info: &ChannelInfo) -> AsphodelResult<usize> {
    match info.channel_type()? {
        ChannelType::FastStrain => Ok(1),
        ChannelType::SlowStrain | ChannelType::CompositeStrain => {
            Ok((info.coefficients.len() / 2).max(1))
        }
        _ => Err(AsphodelError::BadChannelType),
    }
}

/// Subchannel of the decoded output that carries `bridge`
pub fn strain_bridge_subchannel(info: &ChannelInfo, bridge: usize) -> AsphodelResult<usize> {
    if bridge >= strain_bridge_count(info)? {
        return Err(AsphodelError::BadParameter);
    }
    Ok(bridge)
}

pub fn strain_bridge_values(info: &ChannelInfo, bridge: usize) -> AsphodelResult<StrainBridgeValues> {
    strain_bridge_subchannel(info, bridge)?;
    let chunk = info.chunks.get(bridge).ok_or(AsphodelError::BadParameter)?;
    let [positive_sense, negative_sense, nominal, minimum, maximum] = be_floats::<5>(chunk)?;
    Ok(StrainBridgeValues {
        positive_sense,
        negative_sense,
        nominal,
        minimum,
        maximum,
    })
}

pub fn accel_self_test_limits(info: &ChannelInfo) -> AsphodelResult<AccelSelfTestLimits> {
    if !info.channel_type()?.is_accel() {
        return Err(AsphodelError::BadChannelType);
    }
    let chunk = info.chunks.first().ok_or(AsphodelError::BadParameter)?;
    let [x_min, x_max, y_min, y_max, z_min, z_max] = be_floats::<6>(chunk)?;
    Ok(AccelSelfTestLimits {
        x_min,
        x_max,
        y_min,
        y_max,
        z_min,
        z_max,
    })
}

/// True when the change between self test disabled and enabled readings
/// is within limits on every axis
pub fn check_accel_self_test(
    info: &ChannelInfo,
    disabled: [f64; 3],
    enabled: [f64; 3],
) -> AsphodelResult<bool> {
    let limits = accel_self_test_limits(info)?;
    let bounds = [
        (limits.x_min, limits.x_max),
        (limits.y_min, limits.y_max),
        (limits.z_min, limits.z_max),
    ];
    Ok(bounds
        .iter()
        .zip(disabled.iter().zip(enabled.iter()))
        .all(|(&(min, max), (&off, &on))| {
            let delta = on - off;
            delta >= f64::from(min) && delta <= f64::from(max)
        }))
}
