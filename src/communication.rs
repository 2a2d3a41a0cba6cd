use std::{sync::mpsc::Sender, time::Duration};

use eframe::egui;

use crate::{clock::ClockSnapshot, countdown::CountdownState};

/// what a background tick hands back to the ui thread
///
/// every driver but the clock tags its updates with the generation of the task that made them,
/// the ui drops updates from a task that has since been replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    Clock(ClockSnapshot),
    AlarmFired { generation: u64 },
    Countdown { generation: u64, state: CountdownState },
    CountdownFinished { generation: u64 },
    Stopwatch { generation: u64, elapsed: Duration },
}

/// posts updates to the ui thread and wakes it up
#[derive(Clone)]
pub struct UiSender {
    sender: Sender<Update>,
    ctx: Option<egui::Context>,
}

impl UiSender {
    #[must_use]
    pub const fn new(sender: Sender<Update>) -> Self {
        Self { sender, ctx: None }
    }

    #[must_use]
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.ctx = Some(ctx);
        self
    }

    /// returns false once the ui is gone, tick tasks use that to stop
    pub fn post(&self, update: Update) -> bool {
        let delivered = self.sender.send(update).is_ok();
        if let Some(ctx) = &self.ctx {
            ctx.request_repaint();
        }
        delivered
    }
}
