use std::{
    fmt,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// a named slot that plays a user configurable sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum SoundCue {
    Alarm,
    Timer,
    /// stopwatch start and stop
    Click,
    /// stopwatch reset
    Reset,
}

impl SoundCue {
    pub const ALL: [Self; 4] = [Self::Alarm, Self::Timer, Self::Click, Self::Reset];

    /// key in the config file
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Alarm => "alarmSound",
            Self::Timer => "timerSound",
            Self::Click => "stopwatchClick",
            Self::Reset => "stopwatchReset",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Alarm => "Alarm",
            Self::Timer => "Timer",
            Self::Click => "Stopwatch click",
            Self::Reset => "Stopwatch reset",
        }
    }
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SoundPaths {
    #[serde(rename = "alarmSound", default = "SoundPaths::default_alarm")]
    pub alarm: PathBuf,
    #[serde(rename = "timerSound", default = "SoundPaths::default_timer")]
    pub timer_finish: PathBuf,
    #[serde(rename = "stopwatchClick", default = "SoundPaths::default_click")]
    pub stopwatch_click: PathBuf,
    #[serde(rename = "stopwatchReset", default = "SoundPaths::default_reset")]
    pub stopwatch_reset: PathBuf,
}

impl Default for SoundPaths {
    fn default() -> Self {
        Self {
            alarm: Self::default_alarm(),
            timer_finish: Self::default_timer(),
            stopwatch_click: Self::default_click(),
            stopwatch_reset: Self::default_reset(),
        }
    }
}

impl SoundPaths {
    fn default_alarm() -> PathBuf {
        PathBuf::from("sounds/alarm.wav")
    }

    fn default_timer() -> PathBuf {
        PathBuf::from("sounds/timer_finish.wav")
    }

    fn default_click() -> PathBuf {
        PathBuf::from("sounds/click.wav")
    }

    fn default_reset() -> PathBuf {
        PathBuf::from("sounds/reset.wav")
    }

    #[must_use]
    pub fn get(&self, cue: SoundCue) -> &Path {
        match cue {
            SoundCue::Alarm => &self.alarm,
            SoundCue::Timer => &self.timer_finish,
            SoundCue::Click => &self.stopwatch_click,
            SoundCue::Reset => &self.stopwatch_reset,
        }
    }

    pub fn set(&mut self, cue: SoundCue, path: PathBuf) {
        *match cue {
            SoundCue::Alarm => &mut self.alarm,
            SoundCue::Timer => &mut self.timer_finish,
            SoundCue::Click => &mut self.stopwatch_click,
            SoundCue::Reset => &mut self.stopwatch_reset,
        } = path;
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(flatten)]
    pub sounds: SoundPaths,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// missing or broken config files fall back to the defaults
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let config = match std::fs::read_to_string(path) {
            Ok(config) => config,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no config at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("couldn't read config file {}: {e}", path.display());
                return Self::default();
            }
        };
        toml::from_str(&config).unwrap_or_else(|e| {
            log::warn!("couldn't parse config file {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let config = toml::to_string(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, config)?;
        log::info!("saved config to {}", path.display());
        Ok(())
    }

    #[must_use]
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "desk_clock").map_or_else(
            || PathBuf::from("desk_clock.toml"),
            |dirs| dirs.config_dir().join("config.toml"),
        )
    }

    #[must_use]
    pub fn is_config_present(path: &Path) -> bool {
        path.exists()
    }
}
