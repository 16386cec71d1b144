//! Integration tests driving the main loop with scripted collaborators.

use std::{cell::Cell, collections::VecDeque};

use co2_color_monitor::{
    ChannelId, ColorBand, Monitor, Phase, ReadError, Reading, Rgb, Step, Toggles,
    config::{BRIGHT, DIM, READ_ERROR_MESSAGE},
    display::{Line, TextDisplay},
    indicator::Indicator,
    monitor::{Clock, Sensor, Wake},
};
use embassy_futures::block_on;
use embassy_time::Instant;

/// What the sensor does on one wake-up
enum Poll {
    NotReady,
    Ready(Result<Reading, ReadError>),
}

#[derive(Default)]
struct ScriptedSensor {
    script: VecDeque<Poll>,
    pending: Option<Result<Reading, ReadError>>,
}

impl ScriptedSensor {
    fn then(mut self, poll: Poll) -> Self {
        self.script.push_back(poll);
        self
    }
}

impl Sensor for ScriptedSensor {
    async fn data_ready(&mut self) -> bool {
        match self.script.pop_front() {
            Some(Poll::Ready(result)) => {
                self.pending = Some(result);
                true
            }
            Some(Poll::NotReady) | None => false,
        }
    }

    async fn read(&mut self) -> Result<Reading, ReadError> {
        self.pending.take().unwrap_or(Err(ReadError::Bus))
    }
}

#[derive(Default)]
struct Pixel {
    writes: Vec<(Rgb, u8)>,
}

impl Indicator for &mut Pixel {
    async fn set(&mut self, color: Rgb, brightness: u8) {
        self.writes.push((color, brightness));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Screen {
    Blank,
    Lines(Vec<String>),
    Message(String),
}

#[derive(Default)]
struct Panel {
    frames: Vec<Screen>,
}

impl TextDisplay for &mut Panel {
    async fn clear(&mut self) {
        self.frames.push(Screen::Blank);
    }

    async fn render(&mut self, lines: &[Line]) {
        self.frames
            .push(Screen::Lines(lines.iter().map(|l| l.as_str().to_owned()).collect()));
    }

    async fn show_message(&mut self, text: &str) {
        self.frames.push(Screen::Message(text.to_owned()));
    }
}

/// Clock the test moves by hand
struct ManualClock(Cell<Instant>);

impl ManualClock {
    fn at(millis: u64) -> Self {
        Self(Cell::new(ms(millis)))
    }

    fn set(&self, millis: u64) {
        self.0.set(ms(millis));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

/// Records the deadline of every sleep and returns at once
#[derive(Default)]
struct RecordingWake {
    deadlines: Vec<Option<Instant>>,
}

impl Wake for RecordingWake {
    async fn sleep_until_wake(&mut self, deadline: Option<Instant>) {
        self.deadlines.push(deadline);
    }
}

fn air(co2_ppm: f32) -> Poll {
    Poll::Ready(Ok(Reading {
        co2_ppm,
        temperature_c: 22.0,
        relative_humidity_pct: 40.0,
    }))
}

fn ms(millis: u64) -> Instant {
    Instant::from_millis(millis)
}

#[test]
fn nothing_is_shown_before_the_first_read() {
    let toggles = Toggles::new();
    let mut pixel = Pixel::default();
    let mut panel = Panel::default();
    let sensor = ScriptedSensor::default().then(Poll::NotReady);
    let mut monitor = Monitor::new(sensor, &mut pixel, &mut panel, &toggles);

    assert_eq!(block_on(monitor.step(ms(0))), Step::WaitingForFirstRead);
    assert_eq!(block_on(monitor.step(ms(10))), Step::WaitingForFirstRead);
    assert_eq!(monitor.phase(), Phase::WaitingForFirstRead);
    drop(monitor);

    assert!(pixel.writes.is_empty());
    assert!(panel.frames.is_empty());
}

#[test]
fn first_read_renders_and_flashes() {
    let toggles = Toggles::new();
    let mut pixel = Pixel::default();
    let mut panel = Panel::default();
    let sensor = ScriptedSensor::default().then(air(612.4));
    let mut monitor = Monitor::new(sensor, &mut pixel, &mut panel, &toggles);

    assert_eq!(block_on(monitor.step(ms(0))), Step::Processed { sequence: 1 });
    assert_eq!(monitor.phase(), Phase::Running);
    drop(monitor);

    assert_eq!(pixel.writes, [(Rgb::GREEN, BRIGHT)]);
    assert_eq!(
        panel.frames,
        [Screen::Lines(vec![
            "612 ppm CO2".to_owned(),
            "22.0 C | 71.6 F".to_owned(),
            "40% relative humidity".to_owned(),
            "Good indoor air".to_owned(),
        ])]
    );
}

#[test]
fn duplicate_wake_does_not_touch_outputs() {
    let toggles = Toggles::new();
    let mut pixel = Pixel::default();
    let mut panel = Panel::default();
    let sensor = ScriptedSensor::default().then(air(450.0)).then(Poll::NotReady);
    let mut monitor = Monitor::new(sensor, &mut pixel, &mut panel, &toggles);

    block_on(monitor.step(ms(0)));
    assert_eq!(block_on(monitor.step(ms(5))), Step::Duplicate);
    assert_eq!(block_on(monitor.step(ms(9))), Step::Duplicate);
    drop(monitor);

    assert_eq!(pixel.writes.len(), 1);
    assert_eq!(panel.frames.len(), 1);
}

#[test]
fn brightness_follows_band_changes() {
    let toggles = Toggles::new();
    let mut pixel = Pixel::default();
    let mut panel = Panel::default();
    let sensor = ScriptedSensor::default()
        .then(air(300.0))
        .then(air(320.0))
        .then(air(450.0));
    let mut monitor = Monitor::new(sensor, &mut pixel, &mut panel, &toggles);

    for t in 0..3 {
        block_on(monitor.step(ms(t * 2000)));
    }
    drop(monitor);

    assert_eq!(
        pixel.writes,
        [(Rgb::WHITE, BRIGHT), (Rgb::WHITE, DIM), (Rgb::GREEN, BRIGHT)]
    );
}

#[test]
fn failed_read_keeps_sequence_and_outputs() {
    let toggles = Toggles::new();
    let mut pixel = Pixel::default();
    let mut panel = Panel::default();
    let sensor = ScriptedSensor::default()
        .then(air(450.0))
        .then(Poll::Ready(Err(ReadError::Crc)))
        .then(Poll::NotReady)
        .then(air(460.0));
    let mut monitor = Monitor::new(sensor, &mut pixel, &mut panel, &toggles);

    block_on(monitor.step(ms(0)));
    assert_eq!(block_on(monitor.step(ms(2000))), Step::ReadFailed(ReadError::Crc));
    assert_eq!(monitor.latest().map(|m| m.sequence), Some(1));
    assert_eq!(block_on(monitor.step(ms(2100))), Step::Duplicate);
    assert_eq!(block_on(monitor.step(ms(4000))), Step::Processed { sequence: 2 });
    assert_eq!(
        monitor.indicator_controller().state().previous_band,
        Some(ColorBand::Green)
    );
    drop(monitor);

    assert_eq!(pixel.writes, [(Rgb::GREEN, BRIGHT), (Rgb::GREEN, DIM)]);
    assert_eq!(panel.frames[1], Screen::Message(READ_ERROR_MESSAGE.to_owned()));
    assert!(matches!(panel.frames[2], Screen::Lines(_)));
    assert_eq!(panel.frames.len(), 3);
}

#[test]
fn indicator_toggle_off_and_back_on_flashes() {
    let toggles = Toggles::new();
    let mut pixel = Pixel::default();
    let mut panel = Panel::default();
    let sensor = ScriptedSensor::default()
        .then(air(450.0))
        .then(air(455.0))
        .then(Poll::NotReady)
        .then(air(460.0))
        .then(Poll::NotReady)
        .then(air(465.0));
    let mut monitor = Monitor::new(sensor, &mut pixel, &mut panel, &toggles);

    block_on(monitor.step(ms(0)));
    block_on(monitor.step(ms(2000)));

    toggles.on_edge(ChannelId::Indicator, ms(2500));
    // Still settling, the toggle waits.
    assert_eq!(block_on(monitor.step(ms(2520))), Step::Duplicate);
    assert_eq!(toggles.settle_deadline(), Some(ms(2601)));
    assert_eq!(block_on(monitor.step(ms(4000))), Step::Processed { sequence: 3 });
    assert!(!monitor.indicator_controller().state().enabled);

    toggles.on_edge(ChannelId::Indicator, ms(4500));
    assert_eq!(block_on(monitor.step(ms(4700))), Step::Toggled);
    assert_eq!(block_on(monitor.step(ms(6000))), Step::Processed { sequence: 4 });
    drop(monitor);

    assert_eq!(
        pixel.writes,
        [
            (Rgb::GREEN, BRIGHT),
            (Rgb::GREEN, DIM),
            (Rgb::BLACK, 0),
            (Rgb::GREEN, BRIGHT),
            (Rgb::GREEN, DIM),
        ]
    );
    // The display kept rendering every reading.
    assert_eq!(panel.frames.len(), 4);
}

#[test]
fn display_toggle_blanks_and_suppresses_banners() {
    let toggles = Toggles::new();
    let mut pixel = Pixel::default();
    let mut panel = Panel::default();
    let sensor = ScriptedSensor::default()
        .then(air(450.0))
        .then(Poll::NotReady)
        .then(Poll::Ready(Err(ReadError::Bus)))
        .then(air(700.0));
    let mut monitor = Monitor::new(sensor, &mut pixel, &mut panel, &toggles);

    block_on(monitor.step(ms(0)));
    toggles.on_edge(ChannelId::Display, ms(100));
    assert_eq!(block_on(monitor.step(ms(300))), Step::Toggled);
    assert_eq!(block_on(monitor.step(ms(2000))), Step::ReadFailed(ReadError::Bus));
    assert_eq!(block_on(monitor.step(ms(4000))), Step::Processed { sequence: 2 });
    assert!(!monitor.display_controller().state().enabled);
    drop(monitor);

    assert_eq!(panel.frames.len(), 2);
    assert_eq!(panel.frames[1], Screen::Blank);
    assert_eq!(pixel.writes.len(), 2);
}

#[test]
fn toggles_wait_for_the_first_reading() {
    let toggles = Toggles::new();
    let mut pixel = Pixel::default();
    let mut panel = Panel::default();
    let sensor = ScriptedSensor::default().then(Poll::NotReady).then(air(380.0));
    let mut monitor = Monitor::new(sensor, &mut pixel, &mut panel, &toggles);

    toggles.on_edge(ChannelId::Indicator, ms(0));
    assert_eq!(block_on(monitor.step(ms(500))), Step::WaitingForFirstRead);
    assert!(toggles.indicator.is_pending());
    assert_eq!(block_on(monitor.step(ms(2000))), Step::Processed { sequence: 1 });
    drop(monitor);

    assert_eq!(pixel.writes, [(Rgb::BLACK, 0)]);
}

#[test]
fn pending_toggle_before_first_reading_does_not_shorten_sleep() {
    let toggles = Toggles::new();
    let mut pixel = Pixel::default();
    let mut panel = Panel::default();
    let mut monitor = Monitor::new(ScriptedSensor::default(), &mut pixel, &mut panel, &toggles);
    let clock = ManualClock::at(500);
    let mut wake = RecordingWake::default();

    toggles.on_edge(ChannelId::Indicator, ms(0));
    for _ in 0..5 {
        assert_eq!(block_on(monitor.cycle(&clock, &mut wake)), Step::WaitingForFirstRead);
    }

    assert!(toggles.indicator.is_pending());
    assert_eq!(wake.deadlines, [None; 5]);
}

#[test]
fn pending_toggle_after_failed_read_does_not_shorten_sleep() {
    let toggles = Toggles::new();
    let mut pixel = Pixel::default();
    let mut panel = Panel::default();
    let sensor = ScriptedSensor::default()
        .then(air(450.0))
        .then(Poll::Ready(Err(ReadError::Bus)))
        .then(Poll::Ready(Err(ReadError::Bus)));
    let mut monitor = Monitor::new(sensor, &mut pixel, &mut panel, &toggles);
    let clock = ManualClock::at(0);
    let mut wake = RecordingWake::default();

    block_on(monitor.cycle(&clock, &mut wake));
    toggles.on_edge(ChannelId::Display, ms(100));
    clock.set(2000);
    assert_eq!(
        block_on(monitor.cycle(&clock, &mut wake)),
        Step::ReadFailed(ReadError::Bus)
    );
    clock.set(4000);
    assert_eq!(
        block_on(monitor.cycle(&clock, &mut wake)),
        Step::ReadFailed(ReadError::Bus)
    );

    assert_eq!(wake.deadlines, [None, None, None]);
    assert!(toggles.display.is_pending());
}

#[test]
fn settling_toggle_wakes_at_a_future_deadline() {
    let toggles = Toggles::new();
    let mut pixel = Pixel::default();
    let mut panel = Panel::default();
    let sensor = ScriptedSensor::default().then(air(450.0)).then(Poll::NotReady);
    let mut monitor = Monitor::new(sensor, &mut pixel, &mut panel, &toggles);
    let clock = ManualClock::at(0);
    let mut wake = RecordingWake::default();

    block_on(monitor.cycle(&clock, &mut wake));
    toggles.on_edge(ChannelId::Indicator, ms(2500));
    clock.set(2520);
    assert_eq!(block_on(monitor.cycle(&clock, &mut wake)), Step::Duplicate);

    assert_eq!(wake.deadlines, [None, Some(ms(2601))]);
    assert!(wake.deadlines.iter().flatten().all(|deadline| *deadline > clock.now()));
}
