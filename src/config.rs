use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene-engine", version, about = "Headless driver for the audio-reactive scene engine")]
pub struct Config {
    /// Scene index or name fragment.
    #[arg(long, default_value = "cube")]
    pub scene: String,

    #[arg(long, default_value_t = 600)]
    pub ticks: u64,

    #[arg(long, default_value_t = 60.0)]
    pub fps: f32,

    /// Beats per minute of the synthetic beat source.
    #[arg(long, default_value_t = 120.0)]
    pub tempo: f32,

    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..=32))]
    pub grid_size: u16,

    #[arg(long, default_value_t = 128, value_parser = clap::value_parser!(u16).range(1..=2048))]
    pub resolution: u16,

    /// Log a state report every N ticks (0 disables).
    #[arg(long, default_value_t = 60)]
    pub report_every: u64,

    /// Tuning file; defaults to the per-user config location.
    #[arg(long)]
    pub tuning: Option<PathBuf>,

    /// Write the effective tuning back to the tuning file and exit.
    #[arg(long, default_value_t = false)]
    pub save_tuning: bool,

    #[arg(long, default_value_t = false)]
    pub list_scenes: bool,
}
