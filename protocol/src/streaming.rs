// Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};

/// Transfer batching parameters for continuous packet streaming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingParams {
    /// Packets delivered per callback
    pub packet_count: u32,
    /// Transfers kept in flight at once
    pub transfer_count: u32,
    /// Per transfer timeout
    pub timeout_ms: u32,
}

impl Default for StreamingParams {
    fn default() -> Self {
        Self {
            packet_count: 1,
            transfer_count: 1,
            timeout_ms: 1000,
        }
    }
}
