use std::{ops::ControlFlow, time::Duration};

use chrono::{NaiveTime, Timelike};

use crate::{
    communication::{UiSender, Update},
    error::AlarmTimeError,
    ticker::{TaskSlot, Ticker},
};

pub const ALARM_POLL_PERIOD: Duration = Duration::from_secs(1);

/// the format alarms are typed in and shown with
pub const ALARM_TIME_FORMAT: &str = "%I:%M %p";

/// parses `08:30 PM` style input (12 hour clock, AM/PM required, any case)
pub fn parse_alarm_time(input: &str) -> Result<NaiveTime, AlarmTimeError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AlarmTimeError::Empty);
    }
    let input = input.to_uppercase();
    if !has_alarm_shape(&input) {
        return Err(AlarmTimeError::Format);
    }
    // chrono checks the ranges, it is too lenient about the layout
    NaiveTime::parse_from_str(&input, ALARM_TIME_FORMAT).map_err(|_| AlarmTimeError::Format)
}

/// exactly `HH:MM AM` or `HH:MM PM`
fn has_alarm_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 8
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[2] == b':'
        && bytes[3..5].iter().all(u8::is_ascii_digit)
        && bytes[5] == b' '
        && (&bytes[6..] == b"AM" || &bytes[6..] == b"PM")
}

/// only hour and minute are compared, so a time that already passed today rings tomorrow
#[must_use]
pub fn alarm_due(target: NaiveTime, now: NaiveTime) -> bool {
    now.hour() == target.hour() && now.minute() == target.minute()
}

/// a one shot alarm, arming a new one replaces the old one
#[derive(Debug)]
pub struct AlarmScheduler {
    slot: TaskSlot,
    target: Option<NaiveTime>,
    period: Duration,
}

impl Default for AlarmScheduler {
    fn default() -> Self {
        Self::with_period(ALARM_POLL_PERIOD)
    }
}

impl AlarmScheduler {
    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        Self {
            slot: TaskSlot::default(),
            target: None,
            period,
        }
    }

    pub fn arm(&mut self, target: NaiveTime, ui: &UiSender) -> u64 {
        self.arm_with_clock(target, ui, || chrono::Local::now().time())
    }

    /// like [`Self::arm`] but with the wall clock supplied by the caller
    pub fn arm_with_clock<F>(&mut self, target: NaiveTime, ui: &UiSender, now: F) -> u64
    where
        F: Fn() -> NaiveTime + Send + 'static,
    {
        let generation = self.slot.next_generation();
        self.target = Some(target);
        let ui = ui.clone();
        log::info!("alarm armed for {}", target.format(ALARM_TIME_FORMAT));
        self.slot.install(Ticker::spawn(
            "alarm",
            Duration::ZERO,
            self.period,
            move || {
                if !alarm_due(target, now()) {
                    return ControlFlow::Continue(());
                }
                ui.post(Update::AlarmFired { generation });
                ControlFlow::Break(())
            },
        ));
        generation
    }

    /// called on the ui thread when the alarm rang, false if the update is stale
    pub fn fired(&mut self, generation: u64) -> bool {
        if !self.slot.is_current(generation) {
            return false;
        }
        log::info!("alarm fired");
        self.target = None;
        self.slot.cancel();
        true
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.slot.generation()
    }

    #[must_use]
    pub const fn target(&self) -> Option<NaiveTime> {
        self.target
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.slot.is_running()
    }
}
