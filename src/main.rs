use std::{error::Error, path::PathBuf};

use clap::{Parser, Subcommand};
use desk_clock::{
    config::{Config, SoundCue},
    sound::SoundPlayer,
    Clock,
};
use eframe::{egui::ViewportBuilder, run_native};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// use this config file instead of the one in the user config directory
    #[clap(long, short)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Option<Command>,
}
#[derive(Subcommand)]
enum Command {
    /// write a default config file
    Init {
        #[clap(long, short)]
        force: bool,
    },
    /// set the sound file played for a cue
    SetSound { cue: SoundCue, path: PathBuf },
    /// print the configured sound files and exit
    ShowSounds,
}

fn main() -> Result<(), Box<dyn Error>> {
    // initilize the logger
    if simple_file_logger::init_logger!("desk_clock").is_err() {
        eprintln!("couldn't initialize logger");
    }

    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(Config::config_path);
    let mut config = Config::load(&config_path);
    match args.command {
        Some(Command::Init { force }) => {
            if force || !Config::is_config_present(&config_path) {
                config = Config::new();
                config.save(&config_path)?;
            }
        }
        Some(Command::SetSound { cue, path }) => {
            config.sounds.set(cue, path);
            config.save(&config_path)?;
        }
        Some(Command::ShowSounds) => {
            for cue in SoundCue::ALL {
                println!(
                    "{cue} ({}): {}",
                    cue.key(),
                    config.sounds.get(cue).display()
                );
            }
            return Ok(());
        }
        None => {}
    }

    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("Desk Clock")
            .with_inner_size([520.0, 640.0])
            .with_min_inner_size([420.0, 540.0]),
        ..Default::default()
    };
    let sounds = SoundPlayer::spawn();
    // run the gui
    run_native(
        "Desk Clock",
        native_options,
        Box::new(move |cc| {
            desk_clock::configure_visuals(&cc.egui_ctx);
            Ok(Box::new(Clock::new(
                config,
                config_path,
                sounds,
                Some(cc.egui_ctx.clone()),
            )))
        }),
    )
    .map_err(|e| e.into())
}
