use std::{io, path::PathBuf};

use thiserror::Error;

/// bad text in the alarm field, the message is what the user sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AlarmTimeError {
    #[error("Enter alarm time like 08:30 PM")]
    Empty,
    #[error("Invalid format. Use HH:MM AM/PM")]
    Format,
}

/// bad text in the timer field, the message is what the user sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SecondsError {
    #[error("Enter seconds")]
    Empty,
    #[error("Enter a valid integer")]
    Format,
    #[error("Enter a positive number")]
    Range,
}

#[derive(Debug, Error)]
pub enum SoundError {
    #[error("sound file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("audio playback failed for {}: {reason}", path.display())]
    Playback { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't write config file: {0}")]
    Io(#[from] io::Error),
    #[error("couldn't serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            AlarmTimeError::Empty.to_string(),
            "Enter alarm time like 08:30 PM"
        );
        assert_eq!(
            AlarmTimeError::Format.to_string(),
            "Invalid format. Use HH:MM AM/PM"
        );
        assert_eq!(SecondsError::Empty.to_string(), "Enter seconds");
        assert_eq!(SecondsError::Format.to_string(), "Enter a valid integer");
        assert_eq!(SecondsError::Range.to_string(), "Enter a positive number");
    }

    #[test]
    fn sound_errors_show_the_path() {
        let missing = SoundError::NotFound(PathBuf::from("sounds/alarm.wav"));
        assert_eq!(missing.to_string(), "sound file not found: sounds/alarm.wav");
        let broken = SoundError::Playback {
            path: PathBuf::from("click.wav"),
            reason: "unrecognized format".to_string(),
        };
        assert_eq!(
            broken.to_string(),
            "audio playback failed for click.wav: unrecognized format"
        );
    }

    #[test]
    fn config_errors_keep_their_cause() {
        let e = ConfigError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(e.to_string(), "couldn't write config file: denied");
        assert!(e.source().is_some());
    }
}
