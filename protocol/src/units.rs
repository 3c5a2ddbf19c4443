// Licensed under the Apache-2.0 license

//! Unit Types
//!
//! Physical units attached to channels, supplies and control variables.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::EnumCount;

#[repr(u8)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    strum_macros::EnumCount,
    strum_macros::EnumIter,
    strum_macros::IntoStaticStr,
)]
pub enum UnitType {
    #[strum(serialize = "UNIT_TYPE_NONE")]
    None = 0,
    #[strum(serialize = "UNIT_TYPE_LSB")]
    Lsb = 1,
    #[strum(serialize = "UNIT_TYPE_PERCENT")]
    Percent = 2,
    #[strum(serialize = "UNIT_TYPE_VOLT")]
    Volt = 3,
    #[strum(serialize = "UNIT_TYPE_AMPERE")]
    Ampere = 4,
    #[strum(serialize = "UNIT_TYPE_WATT")]
    Watt = 5,
    #[strum(serialize = "UNIT_TYPE_OHM")]
    Ohm = 6,
    #[strum(serialize = "UNIT_TYPE_CELSIUS")]
    Celsius = 7,
    #[strum(serialize = "UNIT_TYPE_PASCAL")]
    Pascal = 8,
    #[strum(serialize = "UNIT_TYPE_NEWTON")]
    Newton = 9,
    #[strum(serialize = "UNIT_TYPE_M_PER_S")]
    MeterPerSecond = 10,
    #[strum(serialize = "UNIT_TYPE_M_PER_S2")]
    MeterPerSecondSquared = 11,
    #[strum(serialize = "UNIT_TYPE_DB")]
    Decibel = 12,
    #[strum(serialize = "UNIT_TYPE_DBM")]
    DecibelMilliwatt = 13,
    #[strum(serialize = "UNIT_TYPE_STRAIN")]
    Strain = 14,
    #[strum(serialize = "UNIT_TYPE_HZ")]
    Hertz = 15,
    #[strum(serialize = "UNIT_TYPE_SECOND")]
    Second = 16,
    #[strum(serialize = "UNIT_TYPE_LSB_PER_CELSIUS")]
    LsbPerCelsius = 17,
    #[strum(serialize = "UNIT_TYPE_GRAM_PER_S")]
    GramPerSecond = 18,
    #[strum(serialize = "UNIT_TYPE_L_PER_S")]
    LiterPerSecond = 19,
    #[strum(serialize = "UNIT_TYPE_NEWTON_METER")]
    NewtonMeter = 20,
    #[strum(serialize = "UNIT_TYPE_METER")]
    Meter = 21,
    #[strum(serialize = "UNIT_TYPE_GRAM")]
    Gram = 22,
    #[strum(serialize = "UNIT_TYPE_M3_PER_S")]
    CubicMeterPerSecond = 23,
}

impl UnitType {
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Number of known unit types
pub fn unit_type_count() -> usize {
    UnitType::COUNT
}

/// Name of a raw unit type byte, `"UNIT_TYPE_UNKNOWN"` when out of range
pub fn unit_type_name(unit_type: u8) -> &'static str {
    UnitType::try_from(unit_type)
        .map(UnitType::name)
        .unwrap_or("UNIT_TYPE_UNKNOWN")
}
