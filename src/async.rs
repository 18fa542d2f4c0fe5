//! Async API
//!
//! This module contains the async API for the VEML6030 sensor. It mirrors the blocking API,
//! with every method suffixed by `_async`.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::codec::{
    self, gain_bits, integration_time_bits, power_on_word, set_field, shutdown_word, GAIN_MASK,
    GAIN_POS, INTEGRATION_TIME_MASK, INTEGRATION_TIME_POS,
};
use crate::{
    lux, DataRegister, Gain, IntegrationTime, Result, SlaveAddress, VEML6030, VEML6030Error,
    POWER_ON_DELAY_MS,
};

impl<I2C, D> VEML6030<I2C, D>
where
    D: DelayNs,
    I2C: I2c<SevenBitAddress>,
{
    /// Creates a connection with a VEML6030 sensor via I2C.
    ///
    /// The sensor is shut down after power-up, so this powers it on and then checks that it
    /// acknowledges its address.
    pub async fn new_async(address: SlaveAddress, delay: &mut D, i2c: &mut I2C) -> Result<Self> {
        let mut sensor = Self {
            _delay: core::marker::PhantomData,
            _i2c: core::marker::PhantomData,
            address: address.into(),
        };

        sensor.power_on_async(delay, i2c).await?;

        i2c.write(sensor.address, &[])
            .await
            .map_err(|_| VEML6030Error::DeviceNotFound)?;

        log::info!("VEML6030 found at 0x{:02X}", sensor.address);

        Ok(sensor)
    }

    /// Set the gain of the sensor. Supported values are 2, 1, 1/4 and 1/8.
    ///
    /// Any other value is ignored and the sensor keeps its current gain.
    pub async fn set_gain_async(&mut self, gain: f32, i2c: &mut I2C) -> Result<()> {
        let Some(bits) = codec::encode_gain(gain) else {
            log::warn!("Ignoring unsupported gain {}", gain);
            return Ok(());
        };

        self.update_register_async(DataRegister::Setting, GAIN_MASK, bits, GAIN_POS, i2c)
            .await
    }

    /// Read the gain of the sensor.
    pub async fn get_gain_async(&mut self, i2c: &mut I2C) -> Result<Gain> {
        let setting = self.read_register_async(DataRegister::Setting, i2c).await?;
        Gain::try_from(gain_bits(setting))
    }

    /// Write the integration time to the sensor. Supported values are 25, 50, 100, 200, 400 and
    /// 800 ms.
    ///
    /// Any other value is ignored and the sensor keeps its current integration time.
    pub async fn set_integration_time_async(&mut self, time_ms: u16, i2c: &mut I2C) -> Result<()> {
        let Some(bits) = codec::encode_integration_time(time_ms) else {
            log::warn!("Ignoring unsupported integration time {} ms", time_ms);
            return Ok(());
        };

        self.update_register_async(
            DataRegister::Setting,
            INTEGRATION_TIME_MASK,
            bits,
            INTEGRATION_TIME_POS,
            i2c,
        )
        .await
    }

    /// Read the integration time of the sensor.
    pub async fn get_integration_time_async(&mut self, i2c: &mut I2C) -> Result<IntegrationTime> {
        let setting = self.read_register_async(DataRegister::Setting, i2c).await?;
        IntegrationTime::try_from(integration_time_bits(setting))
    }

    /// Power on the sensor and wait for it to start up.
    pub async fn power_on_async(&mut self, delay: &mut D, i2c: &mut I2C) -> Result<()> {
        let setting = self.read_register_async(DataRegister::Setting, i2c).await?;
        self.write_register_async(DataRegister::Setting, power_on_word(setting), i2c)
            .await?;
        delay.delay_ms(POWER_ON_DELAY_MS).await;

        log::info!("VEML6030 powered on");
        Ok(())
    }

    /// Shut down the sensor.
    pub async fn shut_down_async(&mut self, i2c: &mut I2C) -> Result<()> {
        let setting = self.read_register_async(DataRegister::Setting, i2c).await?;
        self.write_register_async(DataRegister::Setting, shutdown_word(setting), i2c)
            .await
    }

    /// Whether the sensor is currently powered on.
    pub async fn is_powered_on_async(&mut self, i2c: &mut I2C) -> Result<bool> {
        let setting = self.read_register_async(DataRegister::Setting, i2c).await?;
        Ok(codec::is_powered_on(setting))
    }

    /// Reads the raw ambient light value.
    pub async fn read_raw_light_async(&mut self, i2c: &mut I2C) -> Result<u16> {
        let raw = self
            .read_register_async(DataRegister::AmbientLight, i2c)
            .await?;

        log::info!("Read raw value: {}", raw);

        Ok(raw)
    }

    /// Reads the ambient light intensity in lux.
    pub async fn read_light_async(&mut self, i2c: &mut I2C) -> Result<u32> {
        let raw = self.read_raw_light_async(i2c).await?;

        let setting = self.read_register_async(DataRegister::Setting, i2c).await?;
        let gain = Gain::try_from(gain_bits(setting))?;
        let integration_time = IntegrationTime::try_from(integration_time_bits(setting))?;

        Ok(lux::measure_with(raw, gain, integration_time))
    }

    /// Writes `bits` at `shift` into a register, keeping the bits selected by `mask`.
    pub async fn update_register_async(
        &mut self,
        register: DataRegister,
        mask: u16,
        bits: u16,
        shift: u8,
        i2c: &mut I2C,
    ) -> Result<()> {
        let current = self.read_register_async(register, i2c).await?;
        self.write_register_async(register, set_field(current, mask, bits, shift), i2c)
            .await
    }

    /// Writes a new value to a specific register
    pub async fn write_register_async(
        &mut self,
        register: DataRegister,
        data: u16,
        i2c: &mut I2C,
    ) -> Result<()> {
        let [lsb, msb] = data.to_le_bytes();

        i2c.write(self.address, &[register as u8, lsb, msb])
            .await
            .map_err(|_| VEML6030Error::WriteI2CError)?;

        log::debug!("Wrote 0x{:04X} to {:?}", data, register);

        Ok(())
    }

    /// Reads the value of a specific register
    pub async fn read_register_async(
        &mut self,
        register: DataRegister,
        i2c: &mut I2C,
    ) -> Result<u16> {
        let mut read_data = [0; 2];

        i2c.write_read(self.address, &[register as u8], &mut read_data)
            .await
            .map_err(|_| VEML6030Error::ReadI2CError)?;

        let value = u16::from_le_bytes(read_data);
        log::debug!("Read 0x{:04X} from {:?}", value, register);

        Ok(value)
    }
}

// async mocking of I2C currently not supported by embedded-hal-mock
// so no UT right now
