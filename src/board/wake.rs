//! Wake sources of the main loop

use co2_color_monitor::{config::READY_RECHECK_INTERVAL, monitor::Wake};
use embassy_futures::select::select3;
use embassy_rp::gpio::Input;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::{Instant, Timer};

/// Raised by the button tasks after an accepted edge
pub static BUTTON_WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Data-ready pin, buttons and an optional settle deadline
pub struct WakeSources {
    /// SCD30 RDY output, high while a sample waits to be read
    ready: Input<'static>,
}

impl WakeSources {
    /// Wakes on `ready` going high
    pub const fn new(ready: Input<'static>) -> Self {
        Self { ready }
    }
}

impl Wake for WakeSources {
    async fn sleep_until_wake(&mut self, deadline: Option<Instant>) {
        let timer = async {
            match deadline {
                Some(at) => Timer::at(at).await,
                None => core::future::pending().await,
            }
        };

        if self.ready.is_high() {
            // Sample still unread, recheck later
            let recheck = Timer::after(READY_RECHECK_INTERVAL);
            select3(recheck, BUTTON_WAKE.wait(), timer).await;
        } else {
            select3(self.ready.wait_for_high(), BUTTON_WAKE.wait(), timer).await;
        }
    }
}
