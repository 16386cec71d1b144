//! Debounced toggle requests from the two buttons
//!
//! Each button owns a [`ToggleChannel`]. The button context calls
//! [`ToggleChannel::on_edge`] for every falling edge, the main loop calls
//! [`ToggleChannel::consume`] once per iteration. The edge side only ever sets
//! `pending` and moves the timestamp forward, the consumer only clears
//! `pending`. Both sides go through a critical section so the
//! timestamp/flag pair is never observed half-written.

use core::cell::Cell;

use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use embassy_time::{Duration, Instant};

use crate::config::DEBOUNCE_INTERVAL;

/// Identifies one of the two toggle buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelId {
    /// Turns the text display on and off
    Display,
    /// Turns the RGB indicator on and off
    Indicator,
}

/// A clean, debounced toggle request ready to be acted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToggleEvent {
    /// The button that was pressed
    pub channel: ChannelId,
    /// When the edge was accepted
    pub at: Instant,
}

/// Debounce state shared between the edge context and the main loop
#[derive(Debug, Clone, Copy)]
struct ChannelState {
    /// Time of the last edge that was accepted, `None` before the first press
    last_accepted_edge: Option<Instant>,
    /// A toggle was requested and not yet consumed
    pending: bool,
}

/// Single-producer/single-consumer toggle slot for one button
pub struct ToggleChannel {
    /// Which button this channel belongs to
    id: ChannelId,
    /// Minimum spacing between accepted edges and settling time before consumption
    interval: Duration,
    /// State guarded by a critical section
    state: Mutex<CriticalSectionRawMutex, Cell<ChannelState>>,
}

impl ToggleChannel {
    /// Creates a channel with the configured debounce interval
    pub const fn new(id: ChannelId) -> Self {
        Self::with_interval(id, DEBOUNCE_INTERVAL)
    }

    /// Creates a channel with a custom debounce interval
    pub const fn with_interval(id: ChannelId, interval: Duration) -> Self {
        Self {
            id,
            interval,
            state: Mutex::new(Cell::new(ChannelState {
                last_accepted_edge: None,
                pending: false,
            })),
        }
    }

    /// The button this channel belongs to
    pub const fn id(&self) -> ChannelId {
        self.id
    }

    /// Records an edge, returns whether it was accepted
    ///
    /// Edges closer than the debounce interval to the last accepted edge are
    /// dropped as contact bounce. A press that lands while an earlier toggle is
    /// still pending collapses into that toggle.
    pub fn on_edge(&self, now: Instant) -> bool {
        self.state.lock(|cell| {
            let mut state = cell.get();
            if !self.settled(state.last_accepted_edge, now) {
                return false;
            }
            state.last_accepted_edge = Some(now);
            state.pending = true;
            cell.set(state);
            true
        })
    }

    /// Takes the pending toggle once its edge has settled
    pub fn consume(&self, now: Instant) -> Option<ToggleEvent> {
        self.state.lock(|cell| {
            let mut state = cell.get();
            let at = state.last_accepted_edge?;
            if !state.pending || !self.settled(Some(at), now) {
                return None;
            }
            state.pending = false;
            cell.set(state);
            Some(ToggleEvent { channel: self.id, at })
        })
    }

    /// Whether a toggle is waiting to be consumed
    pub fn is_pending(&self) -> bool {
        self.state.lock(|cell| cell.get().pending)
    }

    /// Earliest instant at which a pending toggle can be consumed
    pub fn settle_deadline(&self) -> Option<Instant> {
        self.state.lock(|cell| {
            let state = cell.get();
            state
                .last_accepted_edge
                .filter(|_| state.pending)
                .map(|at| at + self.interval + Duration::from_millis(1))
        })
    }

    /// Whether more than the debounce interval has passed since `last`
    fn settled(&self, last: Option<Instant>, now: Instant) -> bool {
        last.is_none_or(|last| now.saturating_duration_since(last) > self.interval)
    }
}

/// Both toggle channels of the device
pub struct Toggles {
    /// Display on/off button
    pub display: ToggleChannel,
    /// Indicator on/off button
    pub indicator: ToggleChannel,
}

impl Toggles {
    /// Creates both channels with the configured debounce interval
    pub const fn new() -> Self {
        Self {
            display: ToggleChannel::new(ChannelId::Display),
            indicator: ToggleChannel::new(ChannelId::Indicator),
        }
    }

    /// The channel for a button
    pub const fn channel(&self, id: ChannelId) -> &ToggleChannel {
        match id {
            ChannelId::Display => &self.display,
            ChannelId::Indicator => &self.indicator,
        }
    }

    /// Records an edge on the given button
    pub fn on_edge(&self, id: ChannelId, now: Instant) -> bool {
        self.channel(id).on_edge(now)
    }

    /// Earliest settle deadline over both channels
    pub fn settle_deadline(&self) -> Option<Instant> {
        match (self.display.settle_deadline(), self.indicator.settle_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl Default for Toggles {
    fn default() -> Self {
        Self::new()
    }
}
