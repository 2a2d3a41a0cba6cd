use std::{
    fmt,
    ops::ControlFlow,
    time::{Duration, Instant},
};

use crate::{
    communication::{UiSender, Update},
    ticker::{TaskSlot, Ticker},
};

pub const STOPWATCH_PERIOD: Duration = Duration::from_millis(50);

/// `MM:SS.CC`, minutes are not wrapped into hours
#[must_use]
pub fn format_stopwatch(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    format!(
        "{:02}:{:02}.{:02}",
        ms / 60_000,
        (ms / 1000) % 60,
        (ms % 1000) / 10
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lap {
    /// 1 based
    pub index: usize,
    pub elapsed: Duration,
}

impl fmt::Display for Lap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lap {} {}", self.index, format_stopwatch(self.elapsed))
    }
}

#[derive(Debug)]
pub struct Stopwatch {
    slot: TaskSlot,
    started_at: Option<Instant>,
    /// last value shown
    elapsed: Duration,
    laps: Vec<Lap>,
    period: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::with_period(STOPWATCH_PERIOD)
    }
}

impl Stopwatch {
    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        Self {
            slot: TaskSlot::default(),
            started_at: None,
            elapsed: Duration::ZERO,
            laps: vec![],
            period,
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// returns false (and does nothing) when already running
    pub fn start(&mut self, ui: &UiSender) -> bool {
        if self.is_running() {
            return false;
        }
        let started_at = Instant::now();
        let generation = self.slot.next_generation();
        self.started_at = Some(started_at);
        let ui = ui.clone();
        log::info!("stopwatch started");
        self.slot.install(Ticker::spawn(
            "stopwatch",
            Duration::ZERO,
            self.period,
            move || {
                let elapsed = started_at.elapsed();
                if ui.post(Update::Stopwatch {
                    generation,
                    elapsed,
                }) {
                    ControlFlow::Continue(())
                } else {
                    ControlFlow::Break(())
                }
            },
        ));
        true
    }

    /// returns false (and does nothing) when not running
    pub fn stop(&mut self) -> bool {
        let Some(started_at) = self.started_at.take() else {
            return false;
        };
        self.slot.retire();
        self.elapsed = started_at.elapsed();
        log::info!("stopwatch stopped at {}", format_stopwatch(self.elapsed));
        true
    }

    /// records a lap, `None` when not running
    pub fn lap(&mut self) -> Option<Lap> {
        let started_at = self.started_at?;
        let lap = Lap {
            index: self.laps.len() + 1,
            elapsed: started_at.elapsed(),
        };
        self.laps.push(lap);
        Some(lap)
    }

    /// always clears, running or not
    pub fn reset(&mut self) {
        self.started_at = None;
        self.slot.retire();
        self.elapsed = Duration::ZERO;
        self.laps.clear();
        log::info!("stopwatch reset");
    }

    pub fn tick(&mut self, generation: u64, elapsed: Duration) {
        if self.is_running() && self.slot.is_current(generation) {
            self.elapsed = elapsed;
        }
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn elapsed_label(&self) -> String {
        format_stopwatch(self.elapsed)
    }

    #[must_use]
    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn formatting() {
        assert_eq!(format_stopwatch(Duration::ZERO), "00:00.00");
        assert_eq!(format_stopwatch(Duration::from_millis(61_230)), "01:01.23");
        assert_eq!(format_stopwatch(Duration::from_millis(999)), "00:00.99");
        assert_eq!(
            format_stopwatch(Duration::from_millis(100 * 60_000 + 5_070)),
            "100:05.07"
        );
    }

    #[test]
    fn lap_label() {
        let lap = Lap {
            index: 2,
            elapsed: Duration::from_millis(61_230),
        };
        assert_eq!(lap.to_string(), "Lap 2 01:01.23");
    }

    #[test]
    fn stopped_stopwatch_ignores_stop_and_lap() {
        let mut stopwatch = Stopwatch::default();
        assert!(!stopwatch.stop());
        assert_eq!(stopwatch.lap(), None);
        assert!(stopwatch.laps().is_empty());
    }

    #[test]
    fn start_is_noop_while_running() {
        let (tx, _rx) = mpsc::channel();
        let ui = UiSender::new(tx);
        let mut stopwatch = Stopwatch::with_period(Duration::from_millis(5));
        assert!(stopwatch.start(&ui));
        assert!(!stopwatch.start(&ui));
        assert!(stopwatch.stop());
        assert!(!stopwatch.is_running());
    }

    #[test]
    fn laps_are_numbered_in_order() {
        let (tx, _rx) = mpsc::channel();
        let ui = UiSender::new(tx);
        let mut stopwatch = Stopwatch::with_period(Duration::from_millis(5));
        stopwatch.start(&ui);
        let first = stopwatch.lap().unwrap();
        let second = stopwatch.lap().unwrap();
        assert_eq!(first.index, 1);
        assert_eq!(second.index, 2);
        assert!(second.elapsed >= first.elapsed);

        stopwatch.stop();
        assert_eq!(stopwatch.lap(), None);
        assert_eq!(stopwatch.laps().len(), 2);
    }

    #[test]
    fn reset_clears_everything_whether_running_or_not() {
        let (tx, _rx) = mpsc::channel();
        let ui = UiSender::new(tx);

        let mut stopwatch = Stopwatch::with_period(Duration::from_millis(5));
        stopwatch.start(&ui);
        stopwatch.lap();
        stopwatch.reset();
        assert!(!stopwatch.is_running());
        assert!(stopwatch.laps().is_empty());
        assert_eq!(stopwatch.elapsed_label(), "00:00.00");

        stopwatch.start(&ui);
        stopwatch.lap();
        stopwatch.stop();
        stopwatch.reset();
        assert!(stopwatch.laps().is_empty());
        assert_eq!(stopwatch.elapsed(), Duration::ZERO);
    }

    #[test]
    fn display_grows_while_running_and_freezes_when_stopped() {
        let (tx, rx) = mpsc::channel();
        let ui = UiSender::new(tx);
        let mut stopwatch = Stopwatch::with_period(Duration::from_millis(2));
        stopwatch.start(&ui);

        let mut last = Duration::ZERO;
        for _ in 0..5 {
            if let Update::Stopwatch {
                generation,
                elapsed,
            } = rx.recv_timeout(Duration::from_secs(2)).unwrap()
            {
                stopwatch.tick(generation, elapsed);
                assert!(stopwatch.elapsed() >= last);
                last = stopwatch.elapsed();
            }
        }

        stopwatch.stop();
        let frozen = stopwatch.elapsed();
        // anything still queued from the cancelled task is ignored
        while let Ok(Update::Stopwatch {
            generation,
            elapsed,
        }) = rx.recv_timeout(Duration::from_millis(20))
        {
            stopwatch.tick(generation, elapsed);
        }
        assert_eq!(stopwatch.elapsed(), frozen);
    }
}
