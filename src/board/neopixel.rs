//! WS2812 status pixel driven by PIO0

use co2_color_monitor::{classifier::Rgb, indicator::Indicator};
use embassy_rp::{
    Peripheral,
    dma::Channel,
    peripherals::PIO0,
    pio::{Common, PioPin, StateMachine},
    pio_programs::ws2812::{PioWs2812, PioWs2812Program},
};
use smart_leds::{RGB8, brightness};

/// The single NeoPixel on state machine 0
pub struct NeoPixel {
    /// PIO driver for one LED
    ws2812: PioWs2812<'static, PIO0, 0, 1>,
}

impl NeoPixel {
    /// Drives `pin` from state machine 0 with the WS2812 program
    pub fn new(
        common: &mut Common<'static, PIO0>,
        sm: StateMachine<'static, PIO0, 0>,
        dma: impl Peripheral<P = impl Channel> + 'static,
        pin: impl PioPin,
        program: &PioWs2812Program<'static, PIO0>,
    ) -> Self {
        Self {
            ws2812: PioWs2812::new(common, sm, dma, pin, program),
        }
    }
}

impl Indicator for NeoPixel {
    async fn set(&mut self, color: Rgb, level: u8) {
        let raw = RGB8::new(color.r, color.g, color.b);
        let scaled = brightness(core::iter::once(raw), level).next().unwrap_or_default();
        self.ws2812.write(&[scaled]).await;
    }
}
