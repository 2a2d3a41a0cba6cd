#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![deny(clippy::use_self, rust_2018_idioms)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    sync::mpsc,
};

use alarm::{parse_alarm_time, AlarmScheduler, ALARM_TIME_FORMAT};
use clock::ClockSnapshot;
use communication::{UiSender, Update};
use config::{Config, SoundCue};
use countdown::{parse_seconds, CountdownTimer};
use eframe::egui::{
    self, Button, CentralPanel, Color32, Grid, Key, ProgressBar, RichText, ScrollArea, TextEdit,
    TopBottomPanel,
};
use notify::Toasts;
use sound::SoundPlayer;
use stopwatch::Stopwatch;
use ticker::Ticker;
use widgets::{Icon, NavButton};

pub mod alarm;
pub mod clock;
pub mod communication;
pub mod config;
pub mod countdown;
pub mod error;
pub mod notify;
pub mod sound;
pub mod stopwatch;
pub mod ticker;
/// painted icons for the navigation bar
pub mod widgets;

const ACCENT: Color32 = Color32::from_rgb(95, 180, 255);
const AUDIO_EXTENSIONS: [&str; 4] = ["wav", "aiff", "au", "mp3"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Alarm,
    Timer,
    Stopwatch,
    Audio,
}

impl Panel {
    const ALL: [Self; 4] = [Self::Alarm, Self::Timer, Self::Stopwatch, Self::Audio];

    const fn icon(self) -> Icon {
        match self {
            Self::Alarm => Icon::Bell,
            Self::Timer => Icon::Hourglass,
            Self::Stopwatch => Icon::Stopwatch,
            Self::Audio => Icon::Speaker,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Alarm => "Alarm",
            Self::Timer => "Timer",
            Self::Stopwatch => "Stopwatch",
            Self::Audio => "Audio",
        }
    }
}

pub fn configure_visuals(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = Color32::from_rgb(18, 20, 24);
    visuals.window_fill = Color32::from_rgb(24, 27, 32);
    visuals.selection.bg_fill = ACCENT.gamma_multiply(0.6);
    ctx.set_visuals(visuals);
}

/// the whole app, owned by the ui thread
///
/// the clock, alarm, countdown and stopwatch each tick on their own thread and only talk to this
/// through [`Update`]s, which are applied at the start of every frame
pub struct Clock {
    config: Config,
    config_path: PathBuf,
    panel: Panel,
    snapshot: ClockSnapshot,
    updates: mpsc::Receiver<Update>,
    ui: UiSender,
    _clock_driver: Ticker,
    alarm: AlarmScheduler,
    alarm_input: String,
    countdown: CountdownTimer,
    countdown_input: String,
    stopwatch: Stopwatch,
    toasts: Toasts,
    sounds: SoundPlayer,
}

impl Clock {
    /// `repaint` is the context to wake up when a background tick posts something
    #[must_use]
    pub fn new(
        config: Config,
        config_path: PathBuf,
        sounds: SoundPlayer,
        repaint: Option<egui::Context>,
    ) -> Self {
        let (sender, updates) = mpsc::channel();
        let mut ui = UiSender::new(sender);
        if let Some(ctx) = repaint {
            ui = ui.with_repaint(ctx);
        }
        Self {
            config,
            config_path,
            panel: Panel::default(),
            snapshot: ClockSnapshot::now(),
            updates,
            _clock_driver: clock::start_clock_driver(ui.clone()),
            ui,
            alarm: AlarmScheduler::default(),
            alarm_input: String::new(),
            countdown: CountdownTimer::default(),
            countdown_input: String::new(),
            stopwatch: Stopwatch::default(),
            toasts: Toasts::default(),
            sounds,
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.toasts.push(message);
    }

    fn play(&self, cue: SoundCue) {
        self.sounds.play(self.config.sounds.get(cue));
    }

    pub fn set_alarm(&mut self) {
        match parse_alarm_time(&self.alarm_input) {
            Ok(target) => {
                self.alarm.arm(target, &self.ui);
                self.notify(format!("Alarm set for {}", target.format(ALARM_TIME_FORMAT)));
            }
            Err(e) => {
                log::warn!("rejected alarm time {:?}: {e}", self.alarm_input);
                self.notify(e.to_string());
            }
        }
    }

    pub fn start_countdown(&mut self) {
        match parse_seconds(&self.countdown_input) {
            Ok(seconds) => {
                self.countdown.start(seconds, &self.ui);
                self.notify(format!("Timer started for {seconds}s"));
            }
            Err(e) => {
                log::warn!("rejected timer seconds {:?}: {e}", self.countdown_input);
                self.notify(e.to_string());
            }
        }
    }

    pub fn start_stopwatch(&mut self) {
        if self.stopwatch.start(&self.ui) {
            self.play(SoundCue::Click);
        }
    }

    pub fn stop_stopwatch(&mut self) {
        if self.stopwatch.stop() {
            self.play(SoundCue::Click);
        }
    }

    pub fn lap_stopwatch(&mut self) {
        if let Some(lap) = self.stopwatch.lap() {
            log::info!("{lap}");
        }
    }

    pub fn reset_stopwatch(&mut self) {
        self.stopwatch.reset();
        self.play(SoundCue::Reset);
    }

    /// stores a new sound for `cue`, it is used the next time the cue plays
    pub fn set_sound(&mut self, cue: SoundCue, path: PathBuf) {
        self.config.sounds.set(cue, path);
        if let Err(e) = self.config.save(&self.config_path) {
            log::error!("{e}");
        }
        self.notify(format!("{} sound set", cue.label()));
    }

    fn choose_sound(&mut self, cue: SoundCue) {
        if let Some(path) = pick_sound_file(self.config.sounds.get(cue)) {
            self.set_sound(cue, path);
        }
    }

    pub fn apply(&mut self, update: Update) {
        match update {
            Update::Clock(snapshot) => self.snapshot = snapshot,
            Update::AlarmFired { generation } => {
                if self.alarm.fired(generation) {
                    self.notify("Alarm");
                    self.play(SoundCue::Alarm);
                }
            }
            Update::Countdown { generation, state } => self.countdown.progress(generation, state),
            Update::CountdownFinished { generation } => {
                if self.countdown.finished(generation) {
                    self.notify("Timer finished");
                    self.play(SoundCue::Timer);
                }
            }
            Update::Stopwatch {
                generation,
                elapsed,
            } => self.stopwatch.tick(generation, elapsed),
        }
    }

    fn drain_updates(&mut self) {
        while let Ok(update) = self.updates.try_recv() {
            self.apply(update);
        }
    }

    fn render_header(&self, ctx: &egui::Context) {
        TopBottomPanel::top("time").show(ctx, |ui| {
            ui.add_space(12.0);
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(&self.snapshot.time)
                        .size(52.0)
                        .strong()
                        .color(Color32::WHITE),
                );
            });
            ui.add_space(6.0);
            ui.columns(3, |columns| {
                info_card(&mut columns[0], "DAY", &self.snapshot.weekday);
                info_card(&mut columns[1], "DATE", &self.snapshot.day_of_month);
                info_card(&mut columns[2], "MONTH", &self.snapshot.month);
            });
            ui.add_space(12.0);
        });
    }

    fn render_nav(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("nav").show(ctx, |ui| {
            ui.columns(Panel::ALL.len(), |columns| {
                for (column, panel) in columns.iter_mut().zip(Panel::ALL) {
                    column.vertical_centered(|ui| {
                        let button =
                            NavButton::new(panel.icon(), panel.label(), self.panel == panel)
                                .accent(ACCENT);
                        if ui.add(button).clicked() {
                            self.panel = panel;
                        }
                    });
                }
            });
        });
    }

    fn render_alarm_panel(&mut self, ui: &mut egui::Ui) {
        ui.label("Alarm time (HH:MM AM/PM)");
        let field = ui.add(TextEdit::singleline(&mut self.alarm_input).hint_text("08:30 PM"));
        let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        if ui.button("Set Alarm").clicked() || submitted {
            self.set_alarm();
        }
        if let Some(target) = self.alarm.target() {
            ui.label(format!("Next alarm: {}", target.format(ALARM_TIME_FORMAT)));
        }
        ui.add_space(8.0);
        sound_hint(ui, &format!("Sound file used: {}", self.config.sounds.alarm.display()));
    }

    fn render_timer_panel(&mut self, ui: &mut egui::Ui) {
        ui.label("Timer seconds");
        let field = ui.add(TextEdit::singleline(&mut self.countdown_input).hint_text("90"));
        let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        if ui.button("Start").clicked() || submitted {
            self.start_countdown();
        }
        ui.add_space(8.0);
        let fraction = self.countdown.shown().map_or(0.0, |state| state.fraction());
        ui.add(ProgressBar::new(fraction).fill(ACCENT));
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(self.countdown.remaining_label()).size(36.0).strong());
        });
        ui.add_space(8.0);
        sound_hint(
            ui,
            &format!("Sound file used: {}", self.config.sounds.timer_finish.display()),
        );
    }

    fn render_stopwatch_panel(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(self.stopwatch.elapsed_label()).size(40.0).strong());
        });
        ui.horizontal(|ui| {
            let running = self.stopwatch.is_running();
            if ui.add_enabled(!running, Button::new("Start")).clicked() {
                self.start_stopwatch();
            }
            if ui.add_enabled(running, Button::new("Stop")).clicked() {
                self.stop_stopwatch();
            }
            if ui.add_enabled(running, Button::new("Lap")).clicked() {
                self.lap_stopwatch();
            }
            if ui.button("Reset").clicked() {
                self.reset_stopwatch();
            }
        });
        ui.separator();
        ScrollArea::vertical()
            .max_height(160.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for lap in self.stopwatch.laps() {
                    ui.label(lap.to_string());
                }
            });
        ui.add_space(8.0);
        sound_hint(
            ui,
            &format!(
                "Sounds: {} | {}",
                self.config.sounds.stopwatch_click.display(),
                self.config.sounds.stopwatch_reset.display()
            ),
        );
    }

    fn render_audio_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Select audio files");
        ui.add_space(8.0);
        let mut chosen = None;
        Grid::new("sounds")
            .num_columns(3)
            .spacing([12.0, 10.0])
            .show(ui, |ui| {
                for cue in SoundCue::ALL {
                    ui.label(format!("{}:", cue.label()));
                    ui.label(
                        RichText::new(self.config.sounds.get(cue).display().to_string()).weak(),
                    );
                    if ui.button("Choose...").clicked() {
                        chosen = Some(cue);
                    }
                    ui.end_row();
                }
            });
        if let Some(cue) = chosen {
            self.choose_sound(cue);
        }
    }
}

fn info_card(ui: &mut egui::Ui, title: &str, value: &str) {
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(title).small().weak());
        ui.label(RichText::new(value).size(22.0).strong().color(ACCENT));
    });
}

fn sound_hint(ui: &mut egui::Ui, text: &str) {
    ui.label(RichText::new(text).small().weak());
}

/// modal file picker for audio files, starts next to the current file when possible
fn pick_sound_file(current: &Path) -> Option<PathBuf> {
    let current = sound::resolve(current);
    let file_dialog = rfd::FileDialog::new()
        .set_title("Select audio file")
        .add_filter("Audio files (wav, aiff, au, mp3)", &AUDIO_EXTENSIONS);
    let start_dir = current
        .parent()
        .filter(|dir| dir.is_dir())
        .map(Path::to_path_buf)
        .or_else(|| {
            directories::UserDirs::new().and_then(|u| u.audio_dir().map(Path::to_path_buf))
        });
    let file_dialog = match start_dir {
        Some(dir) => file_dialog.set_directory(dir),
        None => file_dialog,
    };
    let file_dialog = match current.file_name().and_then(OsStr::to_str) {
        Some(name) if current.is_file() => file_dialog.set_file_name(name),
        _ => file_dialog,
    };
    file_dialog.pick_file()
}

impl eframe::App for Clock {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_updates();
        self.render_header(ctx);
        self.render_nav(ctx);
        CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            match self.panel {
                Panel::Alarm => self.render_alarm_panel(ui),
                Panel::Timer => self.render_timer_panel(ui),
                Panel::Stopwatch => self.render_stopwatch_panel(ui),
                Panel::Audio => self.render_audio_panel(ui),
            }
        });
        self.toasts.show(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::format_seconds;
    use std::time::Duration;

    struct Fixture {
        clock: Clock,
        played: mpsc::Receiver<PathBuf>,
        dir: PathBuf,
    }

    impl Fixture {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "desk_clock_app_{}_{name}",
                std::process::id()
            ));
            std::fs::create_dir_all(&dir).unwrap();
            let mut config = Config::new();
            for cue in SoundCue::ALL {
                let path = dir.join(format!("{}.wav", cue.key()));
                std::fs::write(&path, b"RIFF").unwrap();
                config.sounds.set(cue, path);
            }
            let (tx, played) = mpsc::channel();
            let clock = Clock::new(
                config,
                dir.join("config.toml"),
                SoundPlayer::from_sender(tx),
                None,
            );
            Self { clock, played, dir }
        }

        fn played(&self) -> Vec<PathBuf> {
            self.played.try_iter().collect()
        }

        fn messages(&self) -> Vec<String> {
            self.clock
                .toasts
                .active()
                .iter()
                .map(|toast| toast.message.clone())
                .collect()
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    #[test]
    fn bad_alarm_input_is_reported_and_nothing_is_armed() {
        let mut f = Fixture::new("bad_alarm");
        f.clock.set_alarm();
        f.clock.alarm_input = "25:00".to_string();
        f.clock.set_alarm();
        assert_eq!(
            f.messages(),
            ["Enter alarm time like 08:30 PM", "Invalid format. Use HH:MM AM/PM"]
        );
        assert_eq!(f.clock.alarm.target(), None);
    }

    #[test]
    fn alarm_fires_with_the_latest_chosen_sound() {
        let mut f = Fixture::new("alarm_sound");
        f.clock.alarm_input = "08:30 pm".to_string();
        f.clock.set_alarm();
        assert_eq!(f.messages(), ["Alarm set for 08:30 PM"]);

        let replacement = f.dir.join("new_alarm.wav");
        std::fs::write(&replacement, b"RIFF").unwrap();
        f.clock.set_sound(SoundCue::Alarm, replacement.clone());
        // persisted as well
        assert_eq!(
            Config::load(&f.dir.join("config.toml")).sounds.alarm,
            replacement
        );

        let generation = f.clock.alarm.generation();
        f.clock.apply(Update::AlarmFired { generation });
        assert_eq!(f.played(), [replacement]);
        assert!(f.messages().contains(&"Alarm".to_string()));
        assert_eq!(f.clock.alarm.target(), None);

        // a second delivery of the same alarm doesn't ring again
        f.clock.apply(Update::AlarmFired { generation });
        assert!(f.played().is_empty());
    }

    #[test]
    fn countdown_validation_messages() {
        let mut f = Fixture::new("countdown_input");
        for input in ["", "abc", "0", "-5"] {
            f.clock.countdown_input = input.to_string();
            f.clock.start_countdown();
        }
        assert_eq!(
            f.messages(),
            [
                "Enter seconds",
                "Enter a valid integer",
                "Enter a positive number",
                "Enter a positive number"
            ]
        );
        assert!(!f.clock.countdown.is_running());

        f.clock.countdown_input = "125".to_string();
        f.clock.start_countdown();
        assert!(f.clock.countdown.is_running());
        assert_eq!(f.clock.countdown.remaining_label(), format_seconds(125));
        assert!(f.messages().contains(&"Timer started for 125s".to_string()));
    }

    #[test]
    fn stale_countdown_finish_is_ignored() {
        let mut f = Fixture::new("countdown_stale");
        f.clock.countdown_input = "30".to_string();
        f.clock.start_countdown();
        let old = f.clock.countdown.generation();
        f.clock.start_countdown();
        f.clock.apply(Update::CountdownFinished { generation: old });
        assert!(f.played().is_empty());

        let current = f.clock.countdown.generation();
        f.clock.apply(Update::CountdownFinished {
            generation: current,
        });
        assert_eq!(f.played(), [f.clock.config.sounds.timer_finish.clone()]);
        assert!(f.messages().contains(&"Timer finished".to_string()));
    }

    #[test]
    fn stopwatch_sounds() {
        let mut f = Fixture::new("stopwatch");
        let click = f.clock.config.sounds.stopwatch_click.clone();
        let reset = f.clock.config.sounds.stopwatch_reset.clone();

        // stop and lap do nothing while stopped, reset always plays
        f.clock.stop_stopwatch();
        f.clock.lap_stopwatch();
        assert!(f.played().is_empty());
        assert!(f.clock.stopwatch.laps().is_empty());

        f.clock.start_stopwatch();
        f.clock.start_stopwatch();
        f.clock.lap_stopwatch();
        f.clock.stop_stopwatch();
        f.clock.reset_stopwatch();
        f.clock.reset_stopwatch();
        assert_eq!(f.played(), [click.clone(), click, reset.clone(), reset]);
        assert!(f.clock.stopwatch.laps().is_empty());
        assert_eq!(f.clock.stopwatch.elapsed_label(), "00:00.00");
    }

    #[test]
    fn missing_sound_does_not_stop_the_flow() {
        let mut f = Fixture::new("missing_sound");
        let gone = f.dir.join("gone.wav");
        f.clock.set_sound(SoundCue::Click, gone);
        f.clock.start_stopwatch();
        assert!(f.clock.stopwatch.is_running());
        assert!(f.played().is_empty());
        f.clock.reset_stopwatch();
        assert_eq!(f.played().len(), 1);
    }

    #[test]
    fn clock_driver_updates_snapshot() {
        let mut f = Fixture::new("clock_driver");
        f.clock.snapshot = ClockSnapshot::default();
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while f.clock.snapshot.time.is_empty() && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
            f.clock.drain_updates();
        }
        assert!(f.clock.snapshot.time.ends_with('M'));
    }
}
