//! This crate provides a platform agnostic no_std driver for the VEML6030 ambient light sensor.
//! The driver is compatible with the [`embedded-hal`](https://crates.io/crates/embedded-hal) traits.
//!
//! ## Supported features
//! * Configurable gain and integration time
//! * Power on and shut down
//! * Reading the raw ambient light value
//! * Converting the raw value into the ambient light intensity in lux, including the
//!   non-linearity compensation for values above 1000 lux
//! * Async (behind the `async` feature)
//!
//! ## Unsupported features
//! * Interrupt and threshold functionality
//! * Power saving modes
//! * White channel
//!
//! The register codec ([`codec`]) and the lux engine ([`lux`]) are pure functions
//! and can be used without a sensor attached.
//!
//! ## Usage
//!
//! ### Creating a driver instance and reading the ambient light intensity
//!
//! ```rust,no_run
//! use embedded_hal::blocking::delay::DelayMs;
//! use embedded_hal::blocking::i2c::{Write, WriteRead};
//! use veml6030::{SlaveAddress, VEML6030, VEML6030Error};
//!
//! fn read_lux<I2C, D>(delay: &mut D, i2c: &mut I2C) -> Result<u32, VEML6030Error>
//! where
//!     D: DelayMs<u32>,
//!     I2C: Write + WriteRead,
//! {
//!     // Powers the sensor on and checks that it answers on the bus
//!     let mut sensor = VEML6030::new(SlaveAddress::Default, delay, i2c)?;
//!
//!     // Lowest gain and shortest integration time cover the brightest light
//!     sensor.set_gain(0.125, i2c)?;
//!     sensor.set_integration_time(25, i2c)?;
//!
//!     sensor.read_light(i2c)
//! }
//! ```
//!
//! Unsupported gains or integration times are ignored and leave the sensor configuration as it
//! was.

#![cfg_attr(not(test), no_std)]

pub mod codec;
pub mod lux;

#[cfg(feature = "async")]
mod r#async;

pub use codec::{Gain, IntegrationTime};

use codec::{
    gain_bits, integration_time_bits, power_on_word, set_field, shutdown_word, GAIN_MASK,
    GAIN_POS, INTEGRATION_TIME_MASK, INTEGRATION_TIME_POS,
};

/// Default I2C address (ADDR pin low).
pub const VEML6030_ADDR: u8 = 0x48;

/// Alternative I2C address (ADDR pin high).
pub const VEML6030_ALT_ADDR: u8 = 0x10;

/// Oscillator and signal processor start-up time after power on.
const POWER_ON_DELAY_MS: u32 = 4;

/// I2C address selection of the sensor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlaveAddress {
    /// 0x48
    Default,
    /// 0x10
    Alternative,
}

impl From<SlaveAddress> for u8 {
    fn from(address: SlaveAddress) -> Self {
        match address {
            SlaveAddress::Default => VEML6030_ADDR,
            SlaveAddress::Alternative => VEML6030_ALT_ADDR,
        }
    }
}

/// Represents an I2C-connected VEML6030 sensor.
///
/// The driver keeps no copy of the sensor configuration, every getter reads it back from the
/// sensor.
#[derive(Copy, Clone, Debug)]
pub struct VEML6030<I2C, D> {
    /// Marker to satisfy the compiler.
    _delay: core::marker::PhantomData<D>,

    /// I2C Interface for communcating with the sensor.
    _i2c: core::marker::PhantomData<I2C>,

    /// I2C address of the sensor.
    address: u8,
}

impl<I2C, D> VEML6030<I2C, D> {
    /// I2C address this driver talks to.
    pub fn address(&self) -> u8 {
        self.address
    }
}

impl<I2C, D> VEML6030<I2C, D>
where
    D: embedded_hal::blocking::delay::DelayMs<u32>,
    I2C: embedded_hal::blocking::i2c::Write + embedded_hal::blocking::i2c::WriteRead,
{
    /// Creates a connection with a VEML6030 sensor via I2C.
    ///
    /// The sensor is shut down after power-up, so this powers it on and then checks that it
    /// acknowledges its address.
    pub fn new(address: SlaveAddress, delay: &mut D, i2c: &mut I2C) -> Result<Self> {
        let mut sensor = Self {
            _delay: core::marker::PhantomData,
            _i2c: core::marker::PhantomData,
            address: address.into(),
        };

        sensor.power_on(delay, i2c)?;

        i2c.write(sensor.address, &[])
            .map_err(|_| VEML6030Error::DeviceNotFound)?;

        log::info!("VEML6030 found at 0x{:02X}", sensor.address);

        Ok(sensor)
    }

    /// Set the gain of the sensor. Supported values are 2, 1, 1/4 and 1/8.
    ///
    /// Any other value is ignored and the sensor keeps its current gain.
    pub fn set_gain(&mut self, gain: f32, i2c: &mut I2C) -> Result<()> {
        let Some(bits) = codec::encode_gain(gain) else {
            log::warn!("Ignoring unsupported gain {}", gain);
            return Ok(());
        };

        self.update_register(DataRegister::Setting, GAIN_MASK, bits, GAIN_POS, i2c)
    }

    /// Read the gain of the sensor.
    pub fn get_gain(&mut self, i2c: &mut I2C) -> Result<Gain> {
        let setting = self.read_register(DataRegister::Setting, i2c)?;
        Gain::try_from(gain_bits(setting))
    }

    /// Write the integration time to the sensor. Supported values are 25, 50, 100, 200, 400 and
    /// 800 ms.
    ///
    /// Any other value is ignored and the sensor keeps its current integration time.
    pub fn set_integration_time(&mut self, time_ms: u16, i2c: &mut I2C) -> Result<()> {
        let Some(bits) = codec::encode_integration_time(time_ms) else {
            log::warn!("Ignoring unsupported integration time {} ms", time_ms);
            return Ok(());
        };

        self.update_register(
            DataRegister::Setting,
            INTEGRATION_TIME_MASK,
            bits,
            INTEGRATION_TIME_POS,
            i2c,
        )
    }

    /// Read the integration time of the sensor.
    pub fn get_integration_time(&mut self, i2c: &mut I2C) -> Result<IntegrationTime> {
        let setting = self.read_register(DataRegister::Setting, i2c)?;
        IntegrationTime::try_from(integration_time_bits(setting))
    }

    /// Power on the sensor and wait for it to start up.
    ///
    /// The first sample after power on overwrites whatever was measured before shut down.
    pub fn power_on(&mut self, delay: &mut D, i2c: &mut I2C) -> Result<()> {
        self.modify_register(DataRegister::Setting, power_on_word, i2c)?;
        delay.delay_ms(POWER_ON_DELAY_MS);

        log::info!("VEML6030 powered on");
        Ok(())
    }

    /// Shut down the sensor.
    pub fn shut_down(&mut self, i2c: &mut I2C) -> Result<()> {
        self.modify_register(DataRegister::Setting, shutdown_word, i2c)
    }

    /// Whether the sensor is currently powered on.
    pub fn is_powered_on(&mut self, i2c: &mut I2C) -> Result<bool> {
        let setting = self.read_register(DataRegister::Setting, i2c)?;
        Ok(codec::is_powered_on(setting))
    }

    /// Reads the raw ambient light value.
    pub fn read_raw_light(&mut self, i2c: &mut I2C) -> Result<u16> {
        let raw = self.read_register(DataRegister::AmbientLight, i2c)?;

        log::info!("Read raw value: {}", raw);

        Ok(raw)
    }

    /// Reads the ambient light intensity in lux.
    ///
    /// The raw value is converted with the gain and integration time currently configured on
    /// the sensor. Values above 1000 lux are compensated for non-linearity.
    pub fn read_light(&mut self, i2c: &mut I2C) -> Result<u32> {
        let raw = self.read_raw_light(i2c)?;

        let setting = self.read_register(DataRegister::Setting, i2c)?;
        let gain = Gain::try_from(gain_bits(setting)).inspect_err(|_| {
            log::warn!("Unknown gain in setting register 0x{:04X}", setting);
        })?;
        let integration_time = IntegrationTime::try_from(integration_time_bits(setting))
            .inspect_err(|_| {
                log::warn!("Unknown integration time in setting register 0x{:04X}", setting);
            })?;

        Ok(lux::measure_with(raw, gain, integration_time))
    }

    /// Writes `bits` at `shift` into a register, keeping the bits selected by `mask`.
    ///
    /// The register is read first so the other fields are left untouched.
    pub fn update_register(
        &mut self,
        register: DataRegister,
        mask: u16,
        bits: u16,
        shift: u8,
        i2c: &mut I2C,
    ) -> Result<()> {
        self.modify_register(register, |value| set_field(value, mask, bits, shift), i2c)
    }

    fn modify_register<F>(&mut self, register: DataRegister, f: F, i2c: &mut I2C) -> Result<()>
    where
        F: FnOnce(u16) -> u16,
    {
        let current = self.read_register(register, i2c)?;
        self.write_register(register, f(current), i2c)
    }

    /// Writes a new value to a specific register
    pub fn write_register(
        &mut self,
        register: DataRegister,
        data: u16,
        i2c: &mut I2C,
    ) -> Result<()> {
        let [lsb, msb] = data.to_le_bytes();

        i2c.write(self.address, &[register as u8, lsb, msb])
            .map_err(|_| VEML6030Error::WriteI2CError)?;

        log::debug!("Wrote 0x{:04X} to {:?}", data, register);

        Ok(())
    }

    /// Reads the value of a specific register
    pub fn read_register(&mut self, register: DataRegister, i2c: &mut I2C) -> Result<u16> {
        let mut read_data = [0; 2];

        i2c.write_read(self.address, &[register as u8], &mut read_data)
            .map_err(|_| VEML6030Error::ReadI2CError)?;

        let value = u16::from_le_bytes(read_data);
        log::debug!("Read 0x{:04X} from {:?}", value, register);

        Ok(value)
    }
}

/// Shorthand for all functions returning an error in this module.
type Result<T> = core::result::Result<T, VEML6030Error>;

/// Represents any error that may happen during communication or conversion.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum VEML6030Error {
    /// An error occurred while reading from the sensor.
    ReadI2CError,
    /// An error occurred while writing to the sensor.
    WriteI2CError,
    /// The sensor did not acknowledge its address.
    DeviceNotFound,
    /// The gain is not one the sensor supports.
    UnknownGain,
    /// The integration time is not one the sensor supports.
    UnknownIntegrationTime,
}

/// All 16-bit registers of the VEML6030 sensor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DataRegister {
    /// Gain, integration time, persistence, interrupt enable and shutdown
    Setting = 0x00,

    /// High threshold window
    HighThreshold = 0x01,

    /// Low threshold window
    LowThreshold = 0x02,

    /// Power saving mode
    PowerSave = 0x03,

    /// Ambient light output
    AmbientLight = 0x04,

    /// White channel output
    WhiteLight = 0x05,

    /// Interrupt status
    Interrupt = 0x06,
}
