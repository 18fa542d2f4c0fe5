// This example demonstrates how to use the VEML6030 sensor with a Raspberry Pi.
// It polls the ambient light intensity once per second.

#[cfg(target_arch = "arm")]
fn main() {
    use embedded_hal::blocking::delay::DelayMs;
    use linux_embedded_hal as hal;
    use veml6030::{SlaveAddress, VEML6030};

    let mut i2c = hal::I2cdev::new("/dev/i2c-1").unwrap();
    let mut delay = hal::Delay;

    // Create a new VEML6030 instance, this powers the sensor on
    let mut veml6030 = match VEML6030::new(SlaveAddress::Default, &mut delay, &mut i2c) {
        Ok(sensor) => sensor,
        Err(e) => {
            log::error!("Sensor not found: {:?}", e);
            return;
        }
    };

    // Low gain and short integration time cover direct sunlight
    if let Err(e) = veml6030.set_gain(0.125, &mut i2c) {
        log::error!("Error setting gain: {:?}", e);
    }
    if let Err(e) = veml6030.set_integration_time(100, &mut i2c) {
        log::error!("Error setting integration time: {:?}", e);
    }

    match (
        veml6030.get_gain(&mut i2c),
        veml6030.get_integration_time(&mut i2c),
    ) {
        (Ok(gain), Ok(integration_time)) => log::info!(
            "Gain: {}, integration time: {} ms",
            f32::from(gain),
            integration_time.as_ms()
        ),
        (gain, integration_time) => log::error!(
            "Error reading configuration: {:?} {:?}",
            gain,
            integration_time
        ),
    }

    for _ in 0..300 {
        match veml6030.read_light(&mut i2c) {
            Ok(reading) => log::info!("Lux Value: {}", reading),
            Err(e) => log::error!("Error reading sensor: {:?}", e),
        }
        delay.delay_ms(1000u32);
    }

    match veml6030.shut_down(&mut i2c) {
        Ok(_) => log::info!("Sensor shut down"),
        Err(e) => log::error!("Error shutting down sensor: {:?}", e),
    }
}

#[cfg(not(target_arch = "arm"))]
fn main() {
    log::error!("This demo only runs on a Raspberry Pi");
}
