//! Lux engine
//!
//! Converts a raw ambient light sample into lux, based on the gain and
//! integration time the sample was taken with.

use crate::codec::{Gain, IntegrationTime};
use crate::{Result, VEML6030Error};

/// Raw lux values above this show non-linearity and get compensated.
pub const COMPENSATION_THRESHOLD_LUX: u32 = 1000;

/// Lux per count, for every combination of integration time and gain.
///
/// Rows are integration times (800, 400, 200, 100, 50, 25 ms), columns are
/// gains (×2, ×1, ×1/4, ×1/8). Each halving of either setting doubles the
/// constant.
pub struct ConversionTable;

impl ConversionTable {
    const VALUES: [[f32; 4]; 6] = [
        [0.0036, 0.0072, 0.0288, 0.0576],
        [0.0072, 0.0144, 0.0576, 0.1152],
        [0.0144, 0.0288, 0.1152, 0.2304],
        [0.0288, 0.0576, 0.2304, 0.4608],
        [0.0576, 0.1152, 0.4608, 0.9216],
        [0.1152, 0.2304, 0.9216, 1.8432],
    ];

    /// Row of the table holding the constants for an integration time.
    pub const fn row(integration_time: IntegrationTime) -> usize {
        match integration_time {
            IntegrationTime::Ms800 => 0,
            IntegrationTime::Ms400 => 1,
            IntegrationTime::Ms200 => 2,
            IntegrationTime::Ms100 => 3,
            IntegrationTime::Ms50 => 4,
            IntegrationTime::Ms25 => 5,
        }
    }

    /// Column of the table holding the constants for a gain.
    ///
    /// This is not the gain field value: the column follows the physical gain
    /// from highest to lowest.
    pub const fn column(gain: Gain) -> usize {
        match gain {
            Gain::Two => 0,
            Gain::One => 1,
            Gain::OneQuarter => 2,
            Gain::OneEighth => 3,
        }
    }

    /// Lux per count for the given settings.
    pub const fn lookup(gain: Gain, integration_time: IntegrationTime) -> f32 {
        Self::VALUES[Self::row(integration_time)][Self::column(gain)]
    }
}

/// Lux per count for a typed gain and integration time.
pub fn conversion_constant(gain: Gain, integration_time: IntegrationTime) -> f32 {
    ConversionTable::lookup(gain, integration_time)
}

/// Selects the lux per count for a gain factor and an integration time in milliseconds.
///
/// Values the sensor does not support yield [`VEML6030Error::UnknownGain`]
/// or [`VEML6030Error::UnknownIntegrationTime`].
pub fn select_conversion_constant(gain: f32, integration_time_ms: u16) -> Result<f32> {
    let gain = Gain::from_factor(gain).ok_or(VEML6030Error::UnknownGain)?;
    let integration_time = IntegrationTime::from_ms(integration_time_ms)
        .ok_or(VEML6030Error::UnknownIntegrationTime)?;

    Ok(conversion_constant(gain, integration_time))
}

/// Converts a raw sample into lux, without compensation. The result is truncated.
pub fn raw_to_lux(raw: u16, gain: f32, integration_time_ms: u16) -> Result<u32> {
    let resolution = select_conversion_constant(gain, integration_time_ms)?;
    Ok(scale(raw, resolution))
}

/// Applies the non-linearity correction polynomial from the datasheet.
///
/// `6.0135e-13·lux⁴ − 9.3924e-9·lux³ + 8.1488e-5·lux² + 1.0023·lux`
///
/// The fit is only meant for the rated range of the sensor.
pub fn compensate(lux: u32) -> u32 {
    let lux = f64::from(lux);
    let compensated = (((6.0135e-13 * lux - 9.3924e-9) * lux + 8.1488e-5) * lux + 1.0023) * lux;
    compensated as u32
}

/// Computes the final lux value of a raw sample.
///
/// Values above [`COMPENSATION_THRESHOLD_LUX`] are run through [`compensate`].
pub fn measure(raw: u16, gain: f32, integration_time_ms: u16) -> Result<u32> {
    raw_to_lux(raw, gain, integration_time_ms).map(apply_compensation)
}

/// Computes the final lux value of a raw sample taken with typed settings.
pub fn measure_with(raw: u16, gain: Gain, integration_time: IntegrationTime) -> u32 {
    apply_compensation(scale(raw, conversion_constant(gain, integration_time)))
}

fn scale(raw: u16, resolution: f32) -> u32 {
    (resolution * f32::from(raw)) as u32
}

fn apply_compensation(lux: u32) -> u32 {
    if lux > COMPENSATION_THRESHOLD_LUX {
        let compensated = compensate(lux);
        log::debug!("Compensated {} lux to {} lux", lux, compensated);
        compensated
    } else {
        lux
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAINS: [Gain; 4] = [Gain::Two, Gain::One, Gain::OneQuarter, Gain::OneEighth];
    const INTEGRATION_TIMES: [IntegrationTime; 6] = [
        IntegrationTime::Ms800,
        IntegrationTime::Ms400,
        IntegrationTime::Ms200,
        IntegrationTime::Ms100,
        IntegrationTime::Ms50,
        IntegrationTime::Ms25,
    ];

    #[test]
    fn test_table_indices() {
        for (row, integration_time) in INTEGRATION_TIMES.iter().enumerate() {
            assert_eq!(ConversionTable::row(*integration_time), row);
        }
        for (column, gain) in GAINS.iter().enumerate() {
            assert_eq!(ConversionTable::column(*gain), column);
        }

        // The column is not the gain field value
        assert_ne!(ConversionTable::column(Gain::One), Gain::One as usize);
    }

    #[test]
    fn test_table_corners() {
        assert_eq!(conversion_constant(Gain::Two, IntegrationTime::Ms800), 0.0036);
        assert_eq!(conversion_constant(Gain::OneEighth, IntegrationTime::Ms800), 0.0576);
        assert_eq!(conversion_constant(Gain::Two, IntegrationTime::Ms25), 0.1152);
        assert_eq!(conversion_constant(Gain::OneEighth, IntegrationTime::Ms25), 1.8432);
        assert_eq!(conversion_constant(Gain::One, IntegrationTime::Ms100), 0.0576);
    }

    #[test]
    fn test_table_doubles_per_step() {
        for gain in GAINS {
            for pair in INTEGRATION_TIMES.windows(2) {
                let longer = conversion_constant(gain, pair[0]);
                let shorter = conversion_constant(gain, pair[1]);
                assert!((shorter - 2.0 * longer).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_select_conversion_constant() {
        assert_eq!(select_conversion_constant(1.0, 100), Ok(0.0576));
        assert_eq!(select_conversion_constant(0.25, 200), Ok(0.1152));
        assert_eq!(
            select_conversion_constant(0.5, 100),
            Err(VEML6030Error::UnknownGain)
        );
        assert_eq!(
            select_conversion_constant(1.0, 150),
            Err(VEML6030Error::UnknownIntegrationTime)
        );
        assert_eq!(
            raw_to_lux(1000, 3.0, 100),
            Err(VEML6030Error::UnknownGain)
        );
        assert_eq!(measure(1000, 1.0, 0), Err(VEML6030Error::UnknownIntegrationTime));
    }

    #[test]
    fn test_measure_scenarios() {
        // ×1 at 100 ms is 0.0576 lux per count, ×2 at 100 ms is 0.0288
        assert_eq!(measure(1000, 1.0, 100), Ok(57));
        assert_eq!(measure(500, 1.0, 100), Ok(28));
        assert_eq!(measure(1000, 2.0, 100), Ok(28));
        assert_eq!(measure(10000, 2.0, 800), Ok(36));

        // Above the threshold the polynomial kicks in
        assert_eq!(raw_to_lux(1000, 0.125, 25), Ok(1843));
        assert_eq!(measure(1000, 0.125, 25), Ok(compensate(1843)));
        assert_eq!(measure(1000, 0.125, 25), Ok(2072));
    }

    #[test]
    fn test_compensation_threshold() {
        // 0.9216 lux per count puts 1086 counts at 1000 lux and 1087 counts at 1001 lux
        assert_eq!(raw_to_lux(1086, 0.25, 25), Ok(1000));
        assert_eq!(measure(1086, 0.25, 25), Ok(1000));

        assert_eq!(raw_to_lux(1087, 0.25, 25), Ok(1001));
        assert_eq!(measure(1087, 0.25, 25), Ok(compensate(1001)));
        assert_eq!(compensate(1001), 1076);
    }

    #[test]
    fn test_compensate() {
        assert_eq!(compensate(0), 0);
        assert_eq!(compensate(2000), 2265);
        assert_eq!(compensate(10000), 14792);
        assert_eq!(compensate(65535), 8864331);
    }

    #[test]
    fn test_raw_to_lux_monotonic() {
        for gain in GAINS {
            for integration_time in INTEGRATION_TIMES {
                let mut last = 0;
                for raw in (0..=u16::MAX).step_by(97) {
                    let lux = raw_to_lux(raw, gain.into(), integration_time.as_ms()).unwrap();
                    assert!(lux >= last);
                    last = lux;
                }
            }
        }
    }

    #[test]
    fn test_measure_with_matches_untyped() {
        for gain in GAINS {
            for integration_time in INTEGRATION_TIMES {
                for raw in [0, 1, 1234, 40000, u16::MAX] {
                    assert_eq!(
                        Ok(measure_with(raw, gain, integration_time)),
                        measure(raw, gain.into(), integration_time.as_ms())
                    );
                }
            }
        }
    }
}
