#![no_std]
#![no_main]

use co2_color_monitor::{
    ChannelId, Monitor, Toggles,
    config::{
        AMBIENT_PRESSURE_MBAR, DISPLAY_POWER_UP_DELAY, MEASUREMENT_INTERVAL_SECS, SENSOR_POWER_UP_DELAY,
        STARTUP_RETRY,
    },
    scd30::Scd30,
    startup::{self, Peripheral},
};
use defmt::{error, info};
use defmt_rtt as _;
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_rp::{
    bind_interrupts,
    block::ImageDef,
    config::Config,
    gpio::{Input, Pull},
    i2c::{Async, Config as I2cConfig, I2c, InterruptHandler},
    peripherals::{I2C0, PIO0},
    pio::{InterruptHandler as PioInterruptHandler, Pio},
    pio_programs::ws2812::PioWs2812Program,
};
use embassy_sync::{blocking_mutex::raw::NoopRawMutex, mutex::Mutex};
use embassy_time::{Delay, Timer};
use panic_probe as _;
use static_cell::StaticCell;

use crate::board::{SystemClock, buttons::button_task, neopixel::NeoPixel, oled::Oled, wake::WakeSources};

mod board;

// Firmware image type for bootloader
#[unsafe(link_section = ".start_block")]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
        I2C0_IRQ => InterruptHandler<I2C0>;
        PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
    }
);

/// Toggle channels shared by the button tasks and the main loop
static TOGGLES: Toggles = Toggles::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());

    // I2C setup, the SCD30 stays below 100 kHz
    let sda = p.PIN_16;
    let scl = p.PIN_17;
    let i2c = I2c::new_async(p.I2C0, scl, sda, Irqs, I2cConfig::default());
    static I2C_BUS: StaticCell<Mutex<NoopRawMutex, I2c<'static, I2C0, Async>>> = StaticCell::new();
    let i2c_bus = I2C_BUS.init(Mutex::new(i2c));

    let i2c_device_scd30 = I2cDevice::new(i2c_bus);
    let i2c_device_ssd1306 = I2cDevice::new(i2c_bus);

    // SCD30 RDY, driven push-pull by the sensor
    let data_ready = Input::new(p.PIN_18, Pull::Down);

    // NeoPixel on PIO0
    let Pio { mut common, sm0, .. } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let mut pixel = NeoPixel::new(&mut common, sm0, p.DMA_CH0, p.PIN_21, &program);

    spawner.must_spawn(button_task(
        Input::new(p.PIN_19, Pull::Up),
        ChannelId::Display,
        &TOGGLES,
    ));
    spawner.must_spawn(button_task(
        Input::new(p.PIN_20, Pull::Up),
        ChannelId::Indicator,
        &TOGGLES,
    ));

    startup::announce_power_up(&mut pixel).await;
    let mut delay = Delay;

    Timer::after(SENSOR_POWER_UP_DELAY).await;
    let mut scd30 = Scd30::new(i2c_device_scd30);
    let sensor = startup::acquire(Peripheral::Sensor, STARTUP_RETRY, &mut pixel, &mut delay, async || {
        scd30.begin(MEASUREMENT_INTERVAL_SECS, AMBIENT_PRESSURE_MBAR).await
    })
    .await;
    if let Err(e) = sensor {
        error!("{} - halting", e);
        return;
    }

    Timer::after(DISPLAY_POWER_UP_DELAY).await;
    let mut oled = Oled::new(i2c_device_ssd1306);
    let display = startup::acquire(Peripheral::Display, STARTUP_RETRY, &mut pixel, &mut delay, async || {
        oled.init().await
    })
    .await;
    if let Err(e) = display {
        error!("{} - halting", e);
        return;
    }

    startup::announce_ready(&mut pixel, &mut oled).await;
    info!("Peripherals ready, waiting for the first reading");

    let mut monitor = Monitor::new(scd30, pixel, oled, &TOGGLES);
    let mut wake = WakeSources::new(data_ready);
    monitor.run(&SystemClock, &mut wake).await
}
