use std::{ops::ControlFlow, time::Duration};

use chrono::NaiveDateTime;

use crate::{
    communication::{UiSender, Update},
    ticker::Ticker,
};

pub const CLOCK_PERIOD: Duration = Duration::from_millis(250);

/// what the header shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClockSnapshot {
    /// `hh:mm:ss AM`
    pub time: String,
    pub weekday: String,
    pub day_of_month: String,
    pub month: String,
}

impl ClockSnapshot {
    #[must_use]
    pub fn from_datetime(now: &NaiveDateTime) -> Self {
        Self {
            time: now.format("%I:%M:%S %p").to_string(),
            weekday: now.format("%a").to_string().to_uppercase(),
            day_of_month: now.format("%d").to_string(),
            month: now.format("%b").to_string().to_uppercase(),
        }
    }

    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(&chrono::Local::now().naive_local())
    }
}

/// runs for as long as the returned ticker (or the ui) is alive
#[must_use]
pub fn start_clock_driver(ui: UiSender) -> Ticker {
    Ticker::spawn("clock", Duration::ZERO, CLOCK_PERIOD, move || {
        if ui.post(Update::Clock(ClockSnapshot::now())) {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    })
}
