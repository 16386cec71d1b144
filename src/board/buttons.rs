use co2_color_monitor::{ChannelId, Toggles};
use defmt::{info, trace};
use embassy_rp::gpio::Input;
use embassy_time::Instant;

use super::wake::BUTTON_WAKE;

/// Feeds falling edges of one push button into its toggle channel
#[embassy_executor::task(pool_size = 2)]
pub async fn button_task(mut button: Input<'static>, channel: ChannelId, toggles: &'static Toggles) {
    info!("{} button task initialized successfully", channel);

    loop {
        button.wait_for_falling_edge().await;

        if toggles.on_edge(channel, Instant::now()) {
            trace!("{} button edge accepted", channel);
            BUTTON_WAKE.signal(());
        }
    }
}
