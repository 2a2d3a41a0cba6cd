use std::time::{Duration, Instant};

use eframe::egui::{self, Align2, Color32, Frame, Id, Margin, Order, RichText};

/// how long a toast stays on screen
pub const TOAST_DURATION: Duration = Duration::from_millis(1400);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub expires_at: Instant,
}

/// short lived messages drawn on top of the window, they don't queue and may overlap
#[derive(Debug, Default)]
pub struct Toasts {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl Toasts {
    pub fn push(&mut self, message: impl Into<String>) {
        self.push_at(message, Instant::now());
    }

    pub fn push_at(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        log::info!("notify: {message}");
        self.next_id += 1;
        self.toasts.push(Toast {
            id: self.next_id,
            message,
            expires_at: now + TOAST_DURATION,
        });
    }

    /// drops expired toasts
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.expires_at > now);
    }

    #[must_use]
    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.prune(now);
        // stacked a bit above the middle of the window
        for (i, toast) in self.toasts.iter().enumerate() {
            egui::Area::new(Id::new(("toast", toast.id)))
                .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, -80.0 + 44.0 * i as f32))
                .order(Order::Foreground)
                .interactable(false)
                .show(ctx, |ui| {
                    Frame::none()
                        .fill(Color32::from_rgb(40, 44, 50))
                        .rounding(8.0)
                        .inner_margin(Margin::symmetric(18.0, 10.0))
                        .show(ui, |ui| {
                            ui.label(RichText::new(&toast.message).color(Color32::WHITE));
                        });
                });
        }
        // wake up again to take the oldest toast down
        if let Some(first) = self.toasts.iter().map(|toast| toast.expires_at).min() {
            ctx.request_repaint_after(first.saturating_duration_since(now));
        }
    }
}
