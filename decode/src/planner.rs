// Licensed under the Apache-2.0 license

//! Streaming Parameter Planner
//!
//! Picks how many packets to batch per transfer, how many transfers to keep
//! in flight and the transfer timeout from the latency budget and the rates
//! of the streams that will run together.

use asphodel_protocol::{AsphodelError, AsphodelResult, StreamInfo, StreamingParams};

// absorbs float noise such as 0.1 * 110 = 11.000000000000002
const CEIL_TOLERANCE: f64 = 1e-9;

fn ceil_count(value: f64) -> u32 {
    let rounded = (value - CEIL_TOLERANCE).ceil();
    if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        (rounded as u32).max(1)
    }
}

/// `response_time` is the desired period between batches and
/// `buffer_time` how long the in flight transfers must cover, both in
/// seconds.
pub fn streaming_counts(
    streams: &[&StreamInfo],
    response_time: f64,
    buffer_time: f64,
) -> AsphodelResult<StreamingParams> {
    if streams.is_empty()
        || !response_time.is_finite()
        || !buffer_time.is_finite()
        || response_time < 0.0
        || buffer_time < 0.0
    {
        return Err(AsphodelError::BadParameter);
    }

    let mut total_rate = 0.0f64;
    let mut fastest_rate = 0.0f64;
    for stream in streams {
        let rate = f64::from(stream.rate);
        if !rate.is_finite() || rate <= 0.0 {
            return Err(AsphodelError::BadStreamRate);
        }
        total_rate += rate;
        fastest_rate = fastest_rate.max(rate);
    }

    let packet_count = ceil_count(response_time * total_rate);
    let transfer_count = ceil_count(buffer_time * total_rate / f64::from(packet_count));

    let batch_period = 2.0 * f64::from(packet_count) / total_rate;
    let jitter_floor = 2.0 / fastest_rate;
    let timeout_ms = ceil_count(1000.0 * batch_period.max(jitter_floor));

    Ok(StreamingParams {
        packet_count,
        transfer_count,
        timeout_ms,
    })
}
