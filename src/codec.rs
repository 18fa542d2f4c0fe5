//! Register codec
//!
//! Encodes and decodes the fields of the 16-bit SETTING register:
//!
//! | Bits    | Field            |
//! |---------|------------------|
//! | [12:11] | gain             |
//! | [9:6]   | integration time |
//! | [0]     | shutdown         |
//!
//! All functions here are pure bit arithmetic. Every field shares the same
//! register address, so a field update always starts from the register value
//! freshly read from the device (see [`set_field`]).

use crate::{Result, VEML6030Error};

/// Bits kept when writing the gain field.
pub const GAIN_MASK: u16 = 0xE7FF;
/// Bits kept when writing the integration time field.
pub const INTEGRATION_TIME_MASK: u16 = 0xFC3F;
/// Bits kept when writing the shutdown bit.
pub const SHUTDOWN_MASK: u16 = 0xFFFE;

/// Position of the gain field.
pub const GAIN_POS: u8 = 11;
/// Position of the integration time field.
pub const INTEGRATION_TIME_POS: u8 = 6;
/// Position of the shutdown bit.
pub const SHUTDOWN_POS: u8 = 0;

const POWER_ON: u16 = 0x0;
const SHUTDOWN: u16 = 0x1;

/// The gain of the VEML6030 sensor.
///
/// The discriminant is the value of the gain field in the SETTING register.
/// Note that the field ordering does not follow the physical ordering.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Gain {
    /// ×1 (power-on default)
    One = 0b00,
    /// ×2
    Two = 0b01,
    /// ×1/8
    OneEighth = 0b10,
    /// ×1/4
    OneQuarter = 0b11,
}

impl Gain {
    /// Looks up the gain matching a physical gain factor.
    ///
    /// Only exactly 2.0, 1.0, 0.25 and 0.125 are accepted.
    pub fn from_factor(factor: f32) -> Option<Self> {
        if factor == 1.0 {
            Some(Gain::One)
        } else if factor == 2.0 {
            Some(Gain::Two)
        } else if factor == 0.125 {
            Some(Gain::OneEighth)
        } else if factor == 0.25 {
            Some(Gain::OneQuarter)
        } else {
            None
        }
    }

    /// Converts Gain value into the corresponding register field value
    pub fn into_reg_value(self) -> u16 {
        self as u16
    }
}

impl From<Gain> for f32 {
    fn from(gain: Gain) -> Self {
        match gain {
            Gain::Two => 2.0,
            Gain::One => 1.0,
            Gain::OneQuarter => 0.25,
            Gain::OneEighth => 0.125,
        }
    }
}

impl TryFrom<u16> for Gain {
    type Error = VEML6030Error;

    fn try_from(bits: u16) -> Result<Self> {
        match bits {
            0b00 => Ok(Gain::One),
            0b01 => Ok(Gain::Two),
            0b10 => Ok(Gain::OneEighth),
            0b11 => Ok(Gain::OneQuarter),
            _ => Err(VEML6030Error::UnknownGain),
        }
    }
}

/// The integration time of the VEML6030 sensor.
///
/// The discriminant is the value of the integration time field in the
/// SETTING register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum IntegrationTime {
    /// 25 ms
    Ms25 = 0b1100,
    /// 50 ms
    Ms50 = 0b1000,
    /// 100 ms (power-on default)
    Ms100 = 0b0000,
    /// 200 ms
    Ms200 = 0b0001,
    /// 400 ms
    Ms400 = 0b0010,
    /// 800 ms
    Ms800 = 0b0011,
}

impl IntegrationTime {
    /// Looks up the integration time matching a duration in milliseconds.
    pub fn from_ms(ms: u16) -> Option<Self> {
        match ms {
            25 => Some(IntegrationTime::Ms25),
            50 => Some(IntegrationTime::Ms50),
            100 => Some(IntegrationTime::Ms100),
            200 => Some(IntegrationTime::Ms200),
            400 => Some(IntegrationTime::Ms400),
            800 => Some(IntegrationTime::Ms800),
            _ => None,
        }
    }

    /// Return the integration time in milliseconds
    pub fn as_ms(self) -> u16 {
        match self {
            IntegrationTime::Ms25 => 25,
            IntegrationTime::Ms50 => 50,
            IntegrationTime::Ms100 => 100,
            IntegrationTime::Ms200 => 200,
            IntegrationTime::Ms400 => 400,
            IntegrationTime::Ms800 => 800,
        }
    }

    /// Converts IntegrationTime value into the corresponding register field value
    pub fn into_reg_value(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for IntegrationTime {
    type Error = VEML6030Error;

    fn try_from(bits: u16) -> Result<Self> {
        match bits {
            0b0000 => Ok(IntegrationTime::Ms100),
            0b0001 => Ok(IntegrationTime::Ms200),
            0b0010 => Ok(IntegrationTime::Ms400),
            0b0011 => Ok(IntegrationTime::Ms800),
            0b1000 => Ok(IntegrationTime::Ms50),
            0b1100 => Ok(IntegrationTime::Ms25),
            _ => Err(VEML6030Error::UnknownIntegrationTime),
        }
    }
}

/// Encodes a gain factor into its field bits, `None` if the factor is not supported.
pub fn encode_gain(factor: f32) -> Option<u16> {
    Gain::from_factor(factor).map(Gain::into_reg_value)
}

/// Decodes gain field bits into the gain factor.
pub fn decode_gain(bits: u16) -> Result<f32> {
    Gain::try_from(bits).map(f32::from)
}

/// Encodes an integration time in milliseconds into its field bits, `None`
/// if the duration is not supported.
pub fn encode_integration_time(ms: u16) -> Option<u16> {
    IntegrationTime::from_ms(ms).map(IntegrationTime::into_reg_value)
}

/// Decodes integration time field bits into milliseconds.
pub fn decode_integration_time(bits: u16) -> Result<u16> {
    IntegrationTime::try_from(bits).map(IntegrationTime::as_ms)
}

/// Places `bits` at `shift` inside `register_value`, keeping everything selected by `mask`.
pub fn set_field(register_value: u16, mask: u16, bits: u16, shift: u8) -> u16 {
    (register_value & mask) | (bits << shift)
}

/// Returns `register_value` with the shutdown bit cleared.
pub fn power_on_word(register_value: u16) -> u16 {
    set_field(register_value, SHUTDOWN_MASK, POWER_ON, SHUTDOWN_POS)
}

/// Returns `register_value` with the shutdown bit set.
pub fn shutdown_word(register_value: u16) -> u16 {
    set_field(register_value, SHUTDOWN_MASK, SHUTDOWN, SHUTDOWN_POS)
}

/// Returns `register_value` with the gain field replaced.
///
/// An unsupported factor leaves the register value untouched.
pub fn with_gain(register_value: u16, factor: f32) -> u16 {
    match encode_gain(factor) {
        Some(bits) => set_field(register_value, GAIN_MASK, bits, GAIN_POS),
        None => register_value,
    }
}

/// Returns `register_value` with the integration time field replaced.
///
/// An unsupported duration leaves the register value untouched.
pub fn with_integration_time(register_value: u16, ms: u16) -> u16 {
    match encode_integration_time(ms) {
        Some(bits) => set_field(
            register_value,
            INTEGRATION_TIME_MASK,
            bits,
            INTEGRATION_TIME_POS,
        ),
        None => register_value,
    }
}

/// Extracts the gain field bits from a SETTING register value.
pub fn gain_bits(register_value: u16) -> u16 {
    (register_value & !GAIN_MASK) >> GAIN_POS
}

/// Extracts the integration time field bits from a SETTING register value.
pub fn integration_time_bits(register_value: u16) -> u16 {
    (register_value & !INTEGRATION_TIME_MASK) >> INTEGRATION_TIME_POS
}

/// Whether the shutdown bit of a SETTING register value is clear.
pub fn is_powered_on(register_value: u16) -> bool {
    (register_value & !SHUTDOWN_MASK) == POWER_ON
}
