//! SSD1306 128x32 text panel

use co2_color_monitor::{
    config::{DISPLAY_LEFT_MARGIN, LINE_HEIGHT},
    display::{Line, TextDisplay},
};
use defmt::{Debug2Format, error, info};
use embedded_graphics::{
    mono_font::{MonoTextStyle, MonoTextStyleBuilder, ascii::FONT_5X8},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use ssd1306_async::{I2CDisplayInterface, Ssd1306, mode::BufferedGraphicsMode, prelude::*};

use super::{PeripheralFault, SharedI2c};

/// Buffered driver type for the panel
type Panel = Ssd1306<I2CInterface<SharedI2c>, DisplaySize128x32, BufferedGraphicsMode<DisplaySize128x32>>;

/// Text display on the shared I2C bus
pub struct Oled {
    /// Driver with its frame buffer
    display: Panel,
    /// Style used for every line
    style: MonoTextStyle<'static, BinaryColor>,
}

impl Oled {
    /// Sets up the buffered driver, nothing is sent to the panel yet
    pub fn new(i2c_device: SharedI2c) -> Self {
        let interface = I2CDisplayInterface::new(i2c_device);
        let display =
            Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0).into_buffered_graphics_mode();
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_5X8)
            .text_color(BinaryColor::On)
            .build();

        Self { display, style }
    }

    /// Initializes the controller and blanks the panel
    pub async fn init(&mut self) -> Result<(), PeripheralFault> {
        if let Err(e) = self.display.init().await {
            error!("Failed to initialize display: {}", Debug2Format(&e));
            return Err(PeripheralFault);
        }
        self.display.clear();
        if let Err(e) = self.display.flush().await {
            error!("Failed to initial display flush: {}", Debug2Format(&e));
            return Err(PeripheralFault);
        }
        info!("Display initialized successfully");
        Ok(())
    }

    /// Draws one text row into the frame buffer
    fn draw_row(&mut self, row: usize, text: &str) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let y = row as i32 * LINE_HEIGHT;
        Text::with_baseline(text, Point::new(DISPLAY_LEFT_MARGIN, y), self.style, Baseline::Top)
            .draw(&mut self.display)
            .unwrap_or_default();
    }

    /// Sends the frame buffer, failures are logged and dropped
    async fn flush(&mut self) {
        if let Err(e) = self.display.flush().await {
            error!("Failed to flush display (continuing): {}", Debug2Format(&e));
        }
    }
}

impl TextDisplay for Oled {
    async fn clear(&mut self) {
        self.display.clear();
        self.flush().await;
    }

    async fn render(&mut self, lines: &[Line]) {
        self.display.clear();
        for (row, line) in lines.iter().enumerate() {
            self.draw_row(row, line);
        }
        self.flush().await;
    }

    async fn show_message(&mut self, text: &str) {
        self.display.clear();
        self.draw_row(0, text);
        self.flush().await;
    }
}
