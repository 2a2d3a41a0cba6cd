use std::{ops::ControlFlow, time::Duration};

use crate::{
    communication::{UiSender, Update},
    error::SecondsError,
    ticker::{TaskSlot, Ticker},
};

pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// parses the timer field, whole seconds greater than zero
pub fn parse_seconds(input: &str) -> Result<u32, SecondsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SecondsError::Empty);
    }
    let seconds: i32 = input.parse().map_err(|_| SecondsError::Format)?;
    u32::try_from(seconds)
        .ok()
        .filter(|seconds| *seconds > 0)
        .ok_or(SecondsError::Range)
}

/// `MM:SS`, minutes are not wrapped into hours
#[must_use]
pub fn format_seconds(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    total: u32,
    elapsed: u32,
}

impl CountdownState {
    #[must_use]
    pub const fn new(total: u32) -> Self {
        Self { total, elapsed: 0 }
    }

    /// advances one second, returns true once the countdown is done
    pub fn tick(&mut self) -> bool {
        if self.elapsed < self.total {
            self.elapsed += 1;
        }
        self.is_finished()
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.elapsed >= self.total
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub const fn elapsed(&self) -> u32 {
        self.elapsed
    }

    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.elapsed)
    }

    /// progress bar value in `0.0..=1.0`
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.total() == 0 {
            return 1.0;
        }
        (f64::from(self.elapsed()) / f64::from(self.total())) as f32
    }
}

#[derive(Debug)]
pub struct CountdownTimer {
    slot: TaskSlot,
    /// what the ui shows, follows the tick task through [`Update::Countdown`]
    shown: Option<CountdownState>,
    period: Duration,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::with_period(COUNTDOWN_PERIOD)
    }
}

impl CountdownTimer {
    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        Self {
            slot: TaskSlot::default(),
            shown: None,
            period,
        }
    }

    /// cancels a running countdown and starts a new one, first tick is one period from now
    pub fn start(&mut self, total: u32, ui: &UiSender) -> u64 {
        let generation = self.slot.next_generation();
        let mut state = CountdownState::new(total);
        self.shown = Some(state);
        let ui = ui.clone();
        log::info!("countdown started for {total}s");
        self.slot.install(Ticker::spawn(
            "countdown",
            self.period,
            self.period,
            move || {
                let finished = state.tick();
                if !ui.post(Update::Countdown { generation, state }) {
                    return ControlFlow::Break(());
                }
                if finished {
                    ui.post(Update::CountdownFinished { generation });
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            },
        ));
        generation
    }

    pub fn progress(&mut self, generation: u64, state: CountdownState) {
        if self.slot.is_current(generation) {
            self.shown = Some(state);
        }
    }

    /// false if the update came from a replaced countdown
    pub fn finished(&mut self, generation: u64) -> bool {
        if !self.slot.is_current(generation) {
            return false;
        }
        log::info!("countdown finished");
        self.slot.cancel();
        true
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.slot.generation()
    }

    #[must_use]
    pub const fn shown(&self) -> Option<CountdownState> {
        self.shown
    }

    #[must_use]
    pub fn remaining_label(&self) -> String {
        format_seconds(self.shown.map_or(0, |state| state.remaining()))
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.slot.is_running()
    }
}
