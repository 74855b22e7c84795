//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

use crate::{alert::AlertTiming, engine::EngineOptions};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "countdown-alarm")]
#[command(about = "A countdown timer with a persistent alarm behind a local HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// File holding the last-used duration and the auto-repeat flag
    #[arg(long, default_value = "countdown-alarm.json")]
    pub settings: PathBuf,

    /// Alert flash interval in milliseconds
    #[arg(long, default_value = "500")]
    pub flash_ms: u64,

    /// Interval between alert tones in milliseconds
    #[arg(long, default_value = "2000")]
    pub tone_repeat_ms: u64,

    /// Seconds after which an undismissed alert is ended
    #[arg(long, default_value = "60")]
    pub alert_ceiling: u64,

    /// Caption shown while an alert is active
    #[arg(long, default_value = "Time's up!")]
    pub alert_message: String,

    /// Caption shown while no countdown runs
    #[arg(long, default_value = "Timer")]
    pub idle_caption: String,

    /// Do not play alert tones
    #[arg(short, long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Engine tunables derived from the command line
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            alert: AlertTiming {
                flash_interval: Duration::from_millis(self.flash_ms.max(1)),
                tone_repeat_interval: Duration::from_millis(self.tone_repeat_ms.max(1)),
                max_duration: Duration::from_secs(self.alert_ceiling.max(1)),
            },
            idle_caption: self.idle_caption.clone(),
            alert_message: self.alert_message.clone(),
            ..EngineOptions::default()
        }
    }
}
